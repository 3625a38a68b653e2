//! Callback configuration.
//!
//! Display options for the prettify renderer, loaded from multiple sources
//! with proper precedence:
//!
//! 1. Default values (lowest priority)
//! 2. Configuration file (TOML or YAML)
//! 3. Environment variables
//! 4. Explicit builder calls (highest priority)
//!
//! # Environment Variables
//!
//! - `ANSIBLE_PRETTIFY_SHOW_TIMING` - Show per-task elapsed time (default: true)
//! - `ANSIBLE_PRETTIFY_SHOW_TIMESTAMPS` - Show per-task wall-clock timestamps (default: false)
//! - `ANSIBLE_PRETTIFY_GROUP_BY_ROLE` - Group tasks under role headers (default: true)
//! - `NO_COLOR` - Disable colored output when set (any value)
//!
//! Boolean variables accept `true/false`, `1/0`, `yes/no` and `on/off`,
//! case-insensitively. Unparseable values are ignored with a warning so a
//! typo never aborts a run.
//!
//! # Configuration File Format (TOML)
//!
//! ```toml
//! show_timing = true
//! show_timestamps = false
//! group_by_role = true
//! use_colors = true
//! terminal_width = 100
//! ```

use std::env;
use std::fs;
use std::path::Path;

use is_terminal::IsTerminal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Environment variable toggling the elapsed-time annotation.
pub const ENV_SHOW_TIMING: &str = "ANSIBLE_PRETTIFY_SHOW_TIMING";
/// Environment variable toggling the wall-clock timestamp annotation.
pub const ENV_SHOW_TIMESTAMPS: &str = "ANSIBLE_PRETTIFY_SHOW_TIMESTAMPS";
/// Environment variable toggling role grouping headers.
pub const ENV_GROUP_BY_ROLE: &str = "ANSIBLE_PRETTIFY_GROUP_BY_ROLE";

/// Display configuration for the prettify callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrettifyConfig {
    /// Whether to append per-task elapsed time to result lines
    pub show_timing: bool,
    /// Whether to prefix result lines with a wall-clock timestamp
    pub show_timestamps: bool,
    /// Whether to emit a header when the defining role changes
    pub group_by_role: bool,
    /// Whether to use ANSI colors
    pub use_colors: bool,
    /// Fixed terminal width; when unset the width is detected at runtime
    pub terminal_width: Option<usize>,
}

impl Default for PrettifyConfig {
    fn default() -> Self {
        Self {
            show_timing: true,
            show_timestamps: false,
            group_by_role: true,
            use_colors: std::io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none(),
            terminal_width: None,
        }
    }
}

/// Partial configuration as read from a file; unset keys keep their
/// previous value during merging.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileOverrides {
    show_timing: Option<bool>,
    show_timestamps: Option<bool>,
    group_by_role: Option<bool>,
    use_colors: Option<bool>,
    terminal_width: Option<usize>,
}

impl PrettifyConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load with full precedence: defaults, then an optional file, then
    /// the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            config.merge_file(path)?;
        }
        config.apply_env();
        Ok(config)
    }

    /// Set the timing toggle.
    pub fn with_timing(mut self, enabled: bool) -> Self {
        self.show_timing = enabled;
        self
    }

    /// Set the timestamp toggle.
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.show_timestamps = enabled;
        self
    }

    /// Set role grouping.
    pub fn with_role_grouping(mut self, enabled: bool) -> Self {
        self.group_by_role = enabled;
        self
    }

    /// Enable or disable colors.
    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.use_colors = enabled;
        self
    }

    /// Fix the terminal width instead of detecting it.
    pub fn with_terminal_width(mut self, width: usize) -> Self {
        self.terminal_width = Some(width);
        self
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let overrides: FileOverrides = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            // TOML is the default format
            _ => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
        };

        debug!(path = %path.display(), "Loaded prettify config file");

        if let Some(v) = overrides.show_timing {
            self.show_timing = v;
        }
        if let Some(v) = overrides.show_timestamps {
            self.show_timestamps = v;
        }
        if let Some(v) = overrides.group_by_role {
            self.group_by_role = v;
        }
        if let Some(v) = overrides.use_colors {
            self.use_colors = v;
        }
        if let Some(v) = overrides.terminal_width {
            self.terminal_width = Some(v);
        }
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Some(v) = bool_from_env(ENV_SHOW_TIMING) {
            self.show_timing = v;
        }
        if let Some(v) = bool_from_env(ENV_SHOW_TIMESTAMPS) {
            self.show_timestamps = v;
        }
        if let Some(v) = bool_from_env(ENV_GROUP_BY_ROLE) {
            self.group_by_role = v;
        }
        if env::var_os("NO_COLOR").is_some() {
            self.use_colors = false;
        }
    }
}

/// Parse a boolean environment variable, ignoring unparseable values.
fn bool_from_env(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    match parse_bool(&raw) {
        Some(v) => Some(v),
        None => {
            warn!(var = name, value = %raw, "Ignoring unparseable boolean environment variable");
            None
        }
    }
}

/// Parse a boolean from its common textual spellings.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
