use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the host by models, canvases and settings
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown colormap '{0}' (see `canvart colormaps`)")]
    UnknownColormap(String),

    #[error("unknown model '{0}'")]
    UnknownModel(String),

    #[error("no model registered")]
    NoModel,

    #[error("{name} = {value} is out of range (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("no pendulum with index {0} (expected 0-3)")]
    NoSuchPendulum(usize),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reject `value` unless it is finite and inside `[min, max]`.
pub(crate) fn check_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    expected: &'static str,
) -> Result<f64> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(Error::InvalidParameter { name, value, expected })
    }
}
