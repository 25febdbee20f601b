//! Host configuration and the commands the host loop accepts.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cubefall_core::config::SessionConfig;
use cubefall_core::constants::{DISPLAY_HZ, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use cubefall_core::error::ConfigError;

/// Commands sent to the host loop thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// The window changed size.
    Resize { width: u32, height: u32 },
    /// Stop the loop and release every resource.
    Shutdown,
}

/// Why the host loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Shutdown,
    Disconnected,
    FrameLimit,
}

/// Everything the headless host needs, loaded from one TOML file.
///
/// Host keys sit at the top level; the simulation itself is configured
/// under `[session]`, `[session.frame]` and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub session: SessionConfig,
    /// Simulated display refresh rate (render callbacks per second).
    #[serde(default = "default_display_hz")]
    pub display_hz: u32,
    /// Stop after this many render callbacks. Runs until shut down if unset.
    #[serde(default)]
    pub max_frames: Option<u64>,
    #[serde(default = "default_width")]
    pub viewport_width: u32,
    #[serde(default = "default_height")]
    pub viewport_height: u32,
    /// How often the loop logs a statistics line.
    #[serde(default = "default_stats_period_ms")]
    pub stats_period_ms: u64,
}

fn default_display_hz() -> u32 {
    DISPLAY_HZ
}
fn default_width() -> u32 {
    VIEWPORT_WIDTH
}
fn default_height() -> u32 {
    VIEWPORT_HEIGHT
}
fn default_stats_period_ms() -> u64 {
    1000
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            display_hz: default_display_hz(),
            max_frames: None,
            viewport_width: default_width(),
            viewport_height: default_height(),
            stats_period_ms: default_stats_period_ms(),
        }
    }
}

impl HostConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: HostConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_hz == 0 {
            return Err(ConfigError::invalid("display_hz", "must be at least 1"));
        }
        if self.stats_period_ms == 0 {
            return Err(ConfigError::invalid("stats_period_ms", "must be at least 1"));
        }
        self.session.validate()
    }

    /// Time between render callbacks.
    pub fn frame_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.display_hz.max(1) as u64)
    }

    pub fn stats_period(&self) -> Duration {
        Duration::from_millis(self.stats_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_host_config() {
        let cfg = HostConfig::default();
        assert_eq!(cfg.display_hz, 60);
        assert_eq!(cfg.max_frames, None);
        assert_eq!((cfg.viewport_width, cfg.viewport_height), (1280, 720));
        assert_eq!(cfg.frame_period(), Duration::from_nanos(16_666_666));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_toml_with_nested_session() {
        let text = r#"
            display_hz = 144
            max_frames = 600

            [session]
            seed = 9

            [session.spawn]
            interval_ms = 250
        "#;
        let cfg = HostConfig::from_toml_str(text).unwrap();
        assert_eq!(cfg.display_hz, 144);
        assert_eq!(cfg.max_frames, Some(600));
        assert_eq!(cfg.session.seed, 9);
        assert_eq!(cfg.session.spawn.interval_ms, 250);
        assert_eq!(cfg.session.frame.fixed_hz, 60);
    }

    #[test]
    fn test_invalid_session_fails_host_validation() {
        let text = "[session.frame]\nfixed_hz = 0\n";
        assert!(matches!(
            HostConfig::from_toml_str(text),
            Err(ConfigError::Invalid { field: "frame.fixed_hz", .. })
        ));
        assert!(HostConfig::from_toml_str("display_hz = 0").is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = HostConfig::load(Path::new("/nonexistent/cubefall.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
