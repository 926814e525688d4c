use crate::config::{BranchOverrides, CanvasSettings, HarmonographOverrides};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Contents of `config.toml`
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub canvas: CanvasSettings,
    pub branch: BranchOverrides,
    pub harmonograph: HarmonographOverrides,
}

impl Settings {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file means defaults; a file that fails to parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings = Self::parse(&content).map_err(|source| Error::Config {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(settings)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("canvart")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Background;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn parses_all_sections() {
        let text = r#"
            [canvas]
            width = 640
            height = 480
            background = "dark-gray"
            seed = 7

            [branch]
            children = 3
            colormap = "plasma"
            curve = -20.0

            [harmonograph]
            pen_size = 2.0

            [[harmonograph.pendulum]]
            index = 2
            enabled = true
            amplitude = 200.0
        "#;
        let s = Settings::parse(text).unwrap();
        assert_eq!(s.canvas.width, 640);
        assert_eq!(s.canvas.background, Background::DarkGray);
        assert_eq!(s.canvas.seed, Some(7));
        assert_eq!(s.branch.children, Some(3));
        assert_eq!(s.branch.colormap.as_deref(), Some("plasma"));
        assert_eq!(s.harmonograph.pen_size, Some(2.0));
        assert_eq!(s.harmonograph.pendulums.len(), 1);
        assert_eq!(s.harmonograph.pendulums[0].index, 2);
        assert_eq!(s.harmonograph.pendulums[0].enabled, Some(true));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::parse("[branch]\nleaves = 3\n").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("canvart-definitely-missing.toml");
        assert_eq!(Settings::load(Some(&path)).unwrap(), Settings::default());
    }

    #[test]
    fn broken_file_reports_path() {
        let path = std::env::temp_dir().join(format!("canvart-broken-{}.toml", std::process::id()));
        fs::write(&path, "[canvas\nwidth = ").unwrap();
        let err = Settings::load(Some(&path)).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("canvart-broken"));
    }
}
