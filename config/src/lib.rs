//! Configuration for Quill.
//!
//! Read from `~/.quill/config.toml`. A missing file is not an error: every
//! field has a default.
//!
//! ```toml
//! [typing]
//! delay_ms = 20
//! exit_on_done = false
//!
//! [ui]
//! ascii_only = false
//! high_contrast = false
//! reduced_motion = false
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use toml::de;
use thiserror::Error;

use quill_types::SessionOptions;
use quill_types::ui::UiOptions;

/// Environment variable overriding `typing.delay_ms`.
pub const DELAY_ENV_VAR: &str = "QUILL_DELAY_MS";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuillConfig {
    pub typing: Option<TypingConfig>,
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypingConfig {
    /// Milliseconds between two typed characters. Default: 20.
    pub delay_ms: Option<u64>,
    /// Quit once the reveal has finished.
    #[serde(default)]
    pub exit_on_done: bool,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    /// Use ASCII-only glyphs.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Keep the cursor solid instead of blinking.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: de::Error,
    },
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl QuillConfig {
    /// Load the config from its default location.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    /// Load the config at `path`. `Ok(None)` when the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {}: {}", path.display(), source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {}: {}", path.display(), source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        config.validate()?;
        Ok(Some(config))
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(TypingConfig {
            delay_ms: Some(0), ..
        }) = &self.typing
        {
            return Err(ConfigError::Invalid {
                field: "typing.delay_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Typing delay from the file, if set.
    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        self.typing
            .as_ref()
            .and_then(|typing| typing.delay_ms)
            .map(Duration::from_millis)
    }

    #[must_use]
    pub fn exit_on_done(&self) -> bool {
        self.typing.as_ref().is_some_and(|typing| typing.exit_on_done)
    }

    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        self.delay()
            .map_or_else(SessionOptions::default, SessionOptions::with_delay)
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        let ui = self.ui.unwrap_or_default();
        UiOptions {
            ascii_only: ui.ascii_only,
            high_contrast: ui.high_contrast,
            reduced_motion: ui.reduced_motion,
        }
    }
}

/// Parse a millisecond delay as given on the command line or in the environment.
pub fn parse_delay_ms(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        field: DELAY_ENV_VAR,
        reason,
    };
    let ms: u64 = raw
        .trim()
        .parse()
        .map_err(|e| invalid(format!("{raw:?} is not a number of milliseconds: {e}")))?;
    if ms == 0 {
        return Err(invalid("must be at least 1".to_string()));
    }
    Ok(Duration::from_millis(ms))
}

/// Delay override from `QUILL_DELAY_MS`, if set.
pub fn delay_from_env() -> Result<Option<Duration>, ConfigError> {
    match env::var(DELAY_ENV_VAR) {
        Ok(raw) => parse_delay_ms(&raw).map(Some),
        Err(_) => Ok(None),
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".quill").join("config.toml"))
}
