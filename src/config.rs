use crate::canvas::Color;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Canvas background choices offered by the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Background {
    #[default]
    White,
    LightGray,
    DarkGray,
    Black,
}

impl Background {
    pub fn color(self) -> Color {
        match self {
            Background::White => image::Rgb([0xFF, 0xFF, 0xFF]),
            Background::LightGray => image::Rgb([0xDD, 0xDD, 0xDD]),
            Background::DarkGray => image::Rgb([0x22, 0x22, 0x22]),
            Background::Black => image::Rgb([0x00, 0x00, 0x00]),
        }
    }

    /// The following palette entry, wrapping after black.
    pub fn next(self) -> Self {
        match self {
            Background::White => Background::LightGray,
            Background::LightGray => Background::DarkGray,
            Background::DarkGray => Background::Black,
            Background::Black => Background::White,
        }
    }
}

/// Canvas size, background and seed
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    pub background: Background,
    pub seed: Option<u64>,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        // 60% x 80% of a 1920x1080 screen
        Self {
            width: 1152,
            height: 864,
            background: Background::White,
            seed: None,
        }
    }
}

/// Branching tree parameters to apply on top of the defaults.
///
/// Shared by the `[branch]` config section and the `branch` subcommand.
#[derive(Args, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BranchOverrides {
    /// Colormap used for depth coloring
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colormap: Option<String>,

    /// Children per node (1-99)
    #[arg(short = 'n', long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<u32>,

    /// Maximum branch depth (2-64)
    #[arg(short = 'd', long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    /// Draw stems between nodes
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_lines: Option<bool>,

    /// Root disc radius (1-100)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    /// Size ratio child/parent (0.1-2.0)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_grow: Option<f64>,

    /// First branch length (1-400)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,

    /// Length ratio child/parent (0.1-2.0)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_grow: Option<f64>,

    /// Angle added per generation, degrees (-180-180)
    #[arg(long, allow_negative_numbers = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<f64>,

    /// Angle spread between first and last child, degrees (0-360)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan: Option<f64>,

    /// Base probability that a child slot grows (0-1)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_prob: Option<f64>,

    /// Bias toward central child slots (0-1)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centerness: Option<f64>,
}

impl BranchOverrides {
    /// Field-wise merge, `self` winning over `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            colormap: self.colormap.or(fallback.colormap),
            children: self.children.or(fallback.children),
            max_depth: self.max_depth.or(fallback.max_depth),
            draw_lines: self.draw_lines.or(fallback.draw_lines),
            size: self.size.or(fallback.size),
            size_grow: self.size_grow.or(fallback.size_grow),
            length: self.length.or(fallback.length),
            length_grow: self.length_grow.or(fallback.length_grow),
            curve: self.curve.or(fallback.curve),
            fan: self.fan.or(fallback.fan),
            branch_prob: self.branch_prob.or(fallback.branch_prob),
            centerness: self.centerness.or(fallback.centerness),
        }
    }
}

/// Settings for one pendulum, in control units, numbered 1-4
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PendulumOverride {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay: Option<f64>,
}

impl FromStr for PendulumOverride {
    type Err = String;

    /// Parse `N:key=value,...`, e.g. `2:on,amp=150,freq=4,phase=90,decay=5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected N:key=value,... but got '{s}'"))?;
        let index: usize = index
            .trim()
            .parse()
            .map_err(|_| format!("bad pendulum number '{index}'"))?;
        if !(1..=4).contains(&index) {
            return Err(format!("pendulum number must be 1-4, got {index}"));
        }

        let mut out = PendulumOverride { index, ..Default::default() };
        for item in rest.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            match item {
                "on" => out.enabled = Some(true),
                "off" => out.enabled = Some(false),
                _ => {
                    let (key, value) = item
                        .split_once('=')
                        .ok_or_else(|| format!("expected key=value, got '{item}'"))?;
                    let value: f64 = value
                        .trim()
                        .parse()
                        .map_err(|_| format!("bad number for {key}: '{value}'"))?;
                    match key.trim() {
                        "amp" | "amplitude" => out.amplitude = Some(value),
                        "freq" | "frequency" => out.frequency = Some(value),
                        "phase" => out.phase = Some(value),
                        "decay" => out.decay = Some(value),
                        other => return Err(format!("unknown pendulum key '{other}'")),
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Harmonograph parameters to apply on top of the defaults
#[derive(Args, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarmonographOverrides {
    /// Colormap cycled along the curve
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colormap: Option<String>,

    /// Pen width in pixels (1-100)
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pen_size: Option<f64>,

    /// Pendulum settings, e.g. `2:on,amp=150,freq=4,phase=90,decay=5` (repeatable)
    #[arg(short = 'p', long = "pendulum", value_name = "N:SETTINGS")]
    #[serde(rename = "pendulum", skip_serializing_if = "Vec::is_empty")]
    pub pendulums: Vec<PendulumOverride>,
}

impl HarmonographOverrides {
    /// Merge with `fallback`; pendulum entries are applied fallback-first so
    /// ours land last.
    pub fn or(self, fallback: Self) -> Self {
        let mut pendulums = fallback.pendulums;
        pendulums.extend(self.pendulums);
        Self {
            colormap: self.colormap.or(fallback.colormap),
            pen_size: self.pen_size.or(fallback.pen_size),
            pendulums,
        }
    }
}
