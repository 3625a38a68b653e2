//! Plugin factory for the callback system.
//!
//! Creates callback plugins by name string. This is what gives the
//! `stdout_callback = prettify` configuration key its meaning: the host
//! engine reads the key and asks the factory for the plugin.
//!
//! # Example
//!
//! ```rust,ignore
//! use prettify::callback::factory;
//! use prettify::callback::config::PrettifyConfig;
//!
//! let callback = factory::create("prettify", &PrettifyConfig::from_env())?;
//! ```

use std::sync::Arc;

use crate::callback::config::PrettifyConfig;
use crate::callback::plugins::{NullCallback, PrettifyCallback};
use crate::error::{Error, Result};
use crate::traits::ExecutionCallback;

/// Names of all built-in plugins, in display order.
pub fn available_plugin_names() -> Vec<&'static str> {
    vec!["prettify", "null"]
}

/// Whether a plugin with the given name exists.
pub fn plugin_exists(name: &str) -> bool {
    resolve_alias(name).is_some()
}

/// Create a callback plugin by name.
///
/// Names are matched case-insensitively; `pretty` is accepted as an
/// alias for `prettify`. Unknown names produce an error listing the
/// available plugins.
pub fn create(name: &str, config: &PrettifyConfig) -> Result<Arc<dyn ExecutionCallback>> {
    match resolve_alias(name) {
        Some("prettify") => Ok(Arc::new(PrettifyCallback::with_config(config.clone()))),
        Some("null") => Ok(Arc::new(NullCallback::new())),
        _ => Err(Error::UnknownPlugin {
            name: name.to_string(),
            available: available_plugin_names().join(", "),
        }),
    }
}

fn resolve_alias(name: &str) -> Option<&'static str> {
    match name.trim().to_lowercase().as_str() {
        "prettify" | "pretty" => Some("prettify"),
        "null" | "none" => Some("null"),
        _ => None,
    }
}
