use crate::error::Result;
use crate::terminal::TerminalCanvas;
use crossterm::cursor::MoveTo;
use crossterm::event::KeyCode;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{stdout, Write};

/// Key bindings of the live preview
pub const LIVE_HELP: &str = "\
canvart live preview

g        run the model
r        randomize, then run
m        switch to the next model and run it
b        cycle the background, then run
t        restart the run over the current picture
s        reset parameters to defaults
c        clear the canvas
?        toggle this help
q / Esc  quit";

/// Show a modal help overlay on top of the current frame.
/// Returns true if the user requested quit (q/Esc) while the overlay is open.
pub fn show_help_modal(term: &mut TerminalCanvas, help_text: &str) -> Result<bool> {
    if help_text.is_empty() {
        return Ok(false);
    }

    let (width, height) = term.size();
    render_help_overlay(width, height, help_text)?;

    loop {
        if let Some(code) = term.wait_key(50)? {
            match code {
                KeyCode::Char('?') => break,
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                _ => {}
            }
        }
    }

    // Restore the frame underneath
    term.render()?;
    Ok(false)
}

/// Top-left corner and size of the help box, centered on the screen.
fn overlay_box(width: u16, height: u16, help_text: &str) -> (usize, usize, usize, usize) {
    let lines = help_text.lines().count();
    let max_width = help_text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4;
    let box_height = lines + 2;
    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;
    (start_x, start_y, box_width, box_height)
}

fn render_help_overlay(width: u16, height: u16, help_text: &str) -> Result<()> {
    let (start_x, start_y, box_width, box_height) = overlay_box(width, height, help_text);
    let inner = box_width - 4;
    let border_color = Color::White;
    let text_color = Color::Grey;

    let mut out = stdout();
    let horizontal = "─".repeat(box_width - 2);

    queue!(
        out,
        MoveTo(start_x as u16, start_y as u16),
        SetForegroundColor(border_color),
        Print(format!("┌{}┐", horizontal))
    )?;

    for (i, line) in help_text.lines().enumerate() {
        let y = (start_y + 1 + i) as u16;
        let padding = inner.saturating_sub(line.chars().count());
        queue!(
            out,
            MoveTo(start_x as u16, y),
            SetForegroundColor(border_color),
            Print('│'),
            SetForegroundColor(text_color),
            Print(format!(" {}{} ", line, " ".repeat(padding))),
            SetForegroundColor(border_color),
            Print('│')
        )?;
    }

    let bottom_y = (start_y + box_height - 1) as u16;
    queue!(
        out,
        MoveTo(start_x as u16, bottom_y),
        Print(format!("└{}┘", horizontal)),
        SetAttribute(Attribute::Reset),
        ResetColor
    )?;
    out.flush()?;
    Ok(())
}
