use canvart::config::{Background, BranchOverrides, CanvasSettings, HarmonographOverrides};
use canvart::help::{show_help_modal, LIVE_HELP};
use canvart::settings::Settings;
use canvart::terminal::TerminalCanvas;
use canvart::trace_init::init_tracing;
use canvart::{
    BranchTree, Colormap, Error, Harmonograph, Model, RasterCanvas, Randomize, Result, Size, Studio,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use crossterm::event::KeyCode;
use rand::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "canvart")]
#[command(author = "Terminal Art Generator")]
#[command(version)]
#[command(about = "Generative drawings: branching trees and harmonographs", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/canvart/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a recursive branching tree
    Branch {
        #[command(flatten)]
        params: BranchOverrides,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Trace a four-pendulum harmonograph
    Harmonograph {
        #[command(flatten)]
        params: HarmonographOverrides,

        #[command(flatten)]
        run: RunArgs,
    },

    /// List the available colormaps
    Colormaps,
}

/// Options shared by every model subcommand
#[derive(Args)]
struct RunArgs {
    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Canvas background
    #[arg(short, long, value_enum)]
    background: Option<Background>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Randomize the parameters before drawing
    #[arg(short, long)]
    randomize: bool,

    /// Output PNG (default: <model>.png)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Interactive preview in the terminal
    #[arg(short, long, conflicts_with = "print")]
    live: bool,

    /// Print the drawing to stdout as braille (no interactive display)
    #[arg(long)]
    print: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    dump: bool,
}

impl RunArgs {
    /// Command line over config file, with the seed resolved.
    fn canvas(&self, file: &CanvasSettings) -> Result<CanvasSettings> {
        let width = self.width.unwrap_or(file.width);
        let height = self.height.unwrap_or(file.height);
        for (name, value) in [("width", width), ("height", height)] {
            if value == 0 {
                return Err(Error::InvalidParameter {
                    name,
                    value: 0.0,
                    expected: "at least 1",
                });
            }
        }

        let seed = self.seed.or(file.seed).unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0) // Fallback seed for misconfigured system clocks
        });

        Ok(CanvasSettings {
            width,
            height,
            background: self.background.unwrap_or(file.background),
            seed: Some(seed),
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("canvart: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Colormaps => {
            for name in Colormap::names() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Branch { params, run } => {
            let canvas = run.canvas(&settings.canvas)?;
            let mut tree = BranchTree::new(Size::new(canvas.width, canvas.height));
            tree.apply(&params.or(settings.branch))?;
            let mut rng = seeded_rng(&canvas);
            if run.randomize {
                tree.randomize(&mut rng);
            }
            if run.dump {
                return dump(Settings {
                    canvas,
                    branch: tree.overrides(),
                    ..Default::default()
                });
            }
            draw(Box::new(tree), &canvas, &run, rng)
        }
        Commands::Harmonograph { params, run } => {
            let canvas = run.canvas(&settings.canvas)?;
            let mut harmonograph = Harmonograph::new(Size::new(canvas.width, canvas.height));
            harmonograph.apply(&params.or(settings.harmonograph))?;
            let mut rng = seeded_rng(&canvas);
            if run.randomize {
                harmonograph.randomize(&mut rng);
            }
            if run.dump {
                return dump(Settings {
                    canvas,
                    harmonograph: harmonograph.overrides(),
                    ..Default::default()
                });
            }
            draw(Box::new(harmonograph), &canvas, &run, rng)
        }
    }
}

fn seeded_rng(canvas: &CanvasSettings) -> StdRng {
    let seed = canvas.seed.unwrap_or(0);
    info!(seed, "random seed");
    StdRng::seed_from_u64(seed)
}

fn dump(settings: Settings) -> Result<()> {
    print!("{}", toml::to_string(&settings)?);
    Ok(())
}

fn draw(model: Box<dyn Model>, canvas: &CanvasSettings, run: &RunArgs, rng: StdRng) -> Result<()> {
    let name = model.name();
    let background = canvas.background.color();
    let mut studio = Studio::new(canvas.background, rng);

    if run.live {
        // Every model is one key away; the configured one replaces its default.
        let size = Size::new(canvas.width, canvas.height);
        studio.register(Box::new(BranchTree::new(size)));
        studio.register(Box::new(Harmonograph::new(size)));
        studio.register(model);
        studio.select(name)?;
        return live(&mut studio, canvas);
    }
    studio.register(model);

    if run.print {
        let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        let mut term =
            TerminalCanvas::with_cells(canvas.width, canvas.height, cols, rows.saturating_sub(1).max(1), background);
        studio.go(&mut term)?;
        term.print_to_stdout();
        return Ok(());
    }

    let out = run
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{name}.png")));
    let mut raster = RasterCanvas::new(canvas.width, canvas.height, background);
    studio.go(&mut raster)?;
    raster.save(&out)?;
    info!(path = %out.display(), "saved");
    println!("{}", out.display());
    Ok(())
}

fn live(studio: &mut Studio, canvas: &CanvasSettings) -> Result<()> {
    let mut term = TerminalCanvas::new(canvas.width, canvas.height, canvas.background.color())?;
    let keys = |name: &str| format!("{name}  g:go r:randomize m:model b:background t:restart ?:help q:quit");
    let mut name = studio.current()?.name();
    term.set_status(keys(name));

    studio.go(&mut term)?;
    term.render()?;

    loop {
        let Some(code) = term.wait_key(100)? else {
            continue;
        };
        match code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('g') => {
                term.set_status(keys(name));
                studio.go(&mut term)?;
            }
            KeyCode::Char('r') => {
                if studio.randomize()? {
                    term.set_status(keys(name));
                } else {
                    term.set_status(format!("{name} cannot be randomized"));
                }
                studio.go(&mut term)?;
            }
            KeyCode::Char('m') => {
                name = studio.next_model()?;
                term.set_status(keys(name));
                studio.go(&mut term)?;
            }
            KeyCode::Char('b') => {
                studio.set_background(studio.background().next());
                studio.go(&mut term)?;
            }
            KeyCode::Char('t') => {
                studio.restart()?;
                studio.resume(&mut term)?;
            }
            KeyCode::Char('s') => {
                studio.reset()?;
                term.set_status(format!("{name}: parameters reset, g to draw"));
            }
            KeyCode::Char('c') => {
                studio.clear(&mut term)?;
            }
            KeyCode::Char('?') => {
                if show_help_modal(&mut term, LIVE_HELP)? {
                    break;
                }
                continue;
            }
            _ => continue,
        }
        term.render()?;
    }

    Ok(())
}
