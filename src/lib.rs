//! Generative drawing models (a recursive branching tree and a
//! four-pendulum harmonograph) painting onto pluggable canvases.

pub mod branch;
pub mod canvas;
pub mod colormap;
pub mod config;
pub mod error;
pub mod harmonograph;
pub mod help;
pub mod model;
pub mod raster;
pub mod settings;
pub mod studio;
pub mod terminal;
pub mod trace_init;

pub use branch::BranchTree;
pub use canvas::{Canvas, Color, RasterCanvas, RecordingCanvas, Size};
pub use colormap::Colormap;
pub use error::{Error, Result};
pub use harmonograph::Harmonograph;
pub use model::{Model, Progress, Randomize};
pub use studio::Studio;
