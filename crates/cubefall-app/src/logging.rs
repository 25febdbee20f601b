//! Console logger setup.

use std::io::Write;

use env_logger::{Builder, WriteStyle};
use log::LevelFilter;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LevelFilter,
    pub colors: bool,
    pub include_target: bool,
}

impl LoggerConfig {
    /// `CUBEFALL_LOG` sets the level (default `info`), `CUBEFALL_LOG_COLORS=0`
    /// disables colors and `CUBEFALL_LOG_TARGET=0` drops the target column.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let level = var("CUBEFALL_LOG")
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let colors = var("CUBEFALL_LOG_COLORS").map(|v| v != "0").unwrap_or(true);
        let include_target = var("CUBEFALL_LOG_TARGET").map(|v| v != "0").unwrap_or(true);
        Self {
            level,
            colors,
            include_target,
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Install the global logger. Fails if one is already installed.
pub fn init(config: &LoggerConfig) -> anyhow::Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(config.level);
    builder.write_style(if config.colors {
        WriteStyle::Auto
    } else {
        WriteStyle::Never
    });

    let include_target = config.include_target;
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if include_target {
            writeln!(
                buf,
                "[{style}{:<5}{style:#}] {:<24} {}",
                record.level(),
                record.target(),
                record.args()
            )
        } else {
            writeln!(buf, "[{style}{:<5}{style:#}] {}", record.level(), record.args())
        }
    });

    builder
        .try_init()
        .map_err(|e| anyhow::anyhow!("logger init failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let cfg = LoggerConfig::from_vars(|_| None);
        assert_eq!(cfg.level, LevelFilter::Info);
        assert!(cfg.colors);
        assert!(cfg.include_target);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = LoggerConfig::from_vars(|name| match name {
            "CUBEFALL_LOG" => Some("trace".into()),
            "CUBEFALL_LOG_COLORS" => Some("0".into()),
            _ => None,
        });
        assert_eq!(cfg.level, LevelFilter::Trace);
        assert!(!cfg.colors);
        assert!(cfg.include_target);
    }

    #[test]
    fn test_unparseable_level_falls_back_to_info() {
        let cfg = LoggerConfig::from_vars(|name| {
            (name == "CUBEFALL_LOG").then(|| "loud".to_string())
        });
        assert_eq!(cfg.level, LevelFilter::Info);
    }
}
