//! Host configuration setup.
//!
//! The Rust rendition of the role's auto-configure step: ensure the host
//! engine's configuration file selects prettify as its stdout callback by
//! writing two keys into the `[defaults]` section:
//!
//! ```ini
//! [defaults]
//! stdout_callback = prettify
//! callback_plugins = ~/.ansible/plugins/callback
//! ```
//!
//! The edit is line-based and conservative: unrelated lines and sections
//! are preserved, keys already present are rewritten in place, missing
//! keys are appended to the section, and a missing file is created.
//! Re-running against an already-configured file reports
//! [`SetupOutcome::Unchanged`] without touching the file.
//!
//! The target file is resolved the way the host engine itself looks for
//! configuration: an explicit path wins, then the `ANSIBLE_CONFIG`
//! environment variable, then `./ansible.cfg` if it exists, then
//! `~/.ansible.cfg`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Section the callback keys live in.
const SECTION: &str = "defaults";
/// Key selecting the stdout callback plugin.
const KEY_STDOUT_CALLBACK: &str = "stdout_callback";
/// Key pointing the engine at its callback plugin directory.
const KEY_CALLBACK_PLUGINS: &str = "callback_plugins";
/// The callback name written into the configuration.
const CALLBACK_NAME: &str = "prettify";

/// Default callback plugin directory, written verbatim (the engine
/// expands the tilde itself).
pub const DEFAULT_PLUGIN_DIR: &str = "~/.ansible/plugins/callback";

/// Options for the setup step.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Whether to write the configuration at all; when false the step is
    /// a no-op (mirrors the `prettify_auto_configure` role variable)
    pub auto_configure: bool,
    /// Explicit configuration file path, bypassing resolution
    pub config_path: Option<PathBuf>,
    /// Value written for the callback plugin directory key
    pub plugin_dir: String,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            auto_configure: true,
            config_path: None,
            plugin_dir: DEFAULT_PLUGIN_DIR.to_string(),
        }
    }
}

impl SetupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the configuration write.
    pub fn with_auto_configure(mut self, enabled: bool) -> Self {
        self.auto_configure = enabled;
        self
    }

    /// Target a specific configuration file.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Override the plugin directory value.
    pub fn with_plugin_dir(mut self, dir: impl Into<String>) -> Self {
        self.plugin_dir = dir.into();
        self
    }
}

/// Outcome of the setup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The configuration file was created or updated.
    Written {
        /// Path that was written
        path: PathBuf,
    },
    /// The file already contained the desired keys.
    Unchanged {
        /// Path that was inspected
        path: PathBuf,
    },
    /// Auto-configuration is disabled; nothing was touched.
    Skipped,
}

/// Ensure the host configuration selects the prettify callback.
pub fn configure_host(options: &SetupOptions) -> Result<SetupOutcome> {
    if !options.auto_configure {
        debug!("Auto-configuration disabled, leaving host config untouched");
        return Ok(SetupOutcome::Skipped);
    }

    let path = resolve_config_path(options.config_path.as_deref())?;
    let content = if path.exists() {
        fs::read_to_string(&path).map_err(|e| Error::ConfigWrite {
            path: path.clone(),
            message: e.to_string(),
        })?
    } else {
        String::new()
    };

    let (updated, changed) = apply_settings(&content, &options.plugin_dir);
    if !changed {
        debug!(path = %path.display(), "Host config already selects prettify");
        return Ok(SetupOutcome::Unchanged { path });
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::ConfigWrite {
                path: path.clone(),
                message: e.to_string(),
            })?;
        }
    }
    fs::write(&path, updated).map_err(|e| Error::ConfigWrite {
        path: path.clone(),
        message: e.to_string(),
    })?;

    info!(path = %path.display(), "Wrote prettify callback configuration");
    Ok(SetupOutcome::Written { path })
}

/// Resolve the configuration file to edit.
fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var("ANSIBLE_CONFIG") {
        let env_path = env_path.trim();
        if !env_path.is_empty() {
            return Ok(PathBuf::from(shellexpand::tilde(env_path).into_owned()));
        }
    }
    let local = PathBuf::from("ansible.cfg");
    if local.exists() {
        return Ok(local);
    }
    dirs::home_dir()
        .map(|home| home.join(".ansible.cfg"))
        .ok_or(Error::ConfigPathUnresolved)
}

/// Apply the two callback keys to an INI-style document, returning the
/// updated text and whether anything changed. The original text is
/// returned untouched when no edit is needed.
fn apply_settings(content: &str, plugin_dir: &str) -> (String, bool) {
    let desired = [
        (KEY_STDOUT_CALLBACK, CALLBACK_NAME),
        (KEY_CALLBACK_PLUGINS, plugin_dir),
    ];

    let mut lines: Vec<String> = content.lines().map(String::from).collect();
    let mut changed = false;

    let (section_start, mut section_end) = find_section(&lines, SECTION);

    match section_start {
        None => {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("[{SECTION}]"));
            for (key, value) in &desired {
                lines.push(format!("{key} = {value}"));
            }
            changed = true;
        }
        Some(start) => {
            for (key, value) in &desired {
                match find_key(&lines, start + 1, section_end, key) {
                    Some(index) => {
                        let replacement = format!("{key} = {value}");
                        if lines[index].trim() != replacement {
                            lines[index] = replacement;
                            changed = true;
                        }
                    }
                    None => {
                        // Insert before any blank lines that pad the
                        // section's end
                        let mut insert_at = section_end;
                        while insert_at > start + 1 && lines[insert_at - 1].trim().is_empty() {
                            insert_at -= 1;
                        }
                        lines.insert(insert_at, format!("{key} = {value}"));
                        section_end += 1;
                        changed = true;
                    }
                }
            }
        }
    }

    if !changed {
        return (content.to_string(), false);
    }

    let mut output = lines.join("\n");
    output.push('\n');
    (output, true)
}

/// Locate a section's header index and exclusive end index.
fn find_section(lines: &[String], name: &str) -> (Option<usize>, usize) {
    let mut start = None;
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            if start.is_some() {
                return (start, i);
            }
            if trimmed[1..trimmed.len() - 1].trim().eq_ignore_ascii_case(name) {
                start = Some(i);
            }
        }
    }
    (start, lines.len())
}

/// Find the line assigning `key` inside a section's body.
fn find_key(lines: &[String], from: usize, to: usize, key: &str) -> Option<usize> {
    for (i, line) in lines.iter().enumerate().take(to).skip(from) {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(key) {
            if rest.trim_start().starts_with('=') {
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_to_empty_content() {
        let (updated, changed) = apply_settings("", DEFAULT_PLUGIN_DIR);
        assert!(changed);
        assert_eq!(
            updated,
            "[defaults]\nstdout_callback = prettify\ncallback_plugins = ~/.ansible/plugins/callback\n"
        );
    }

    #[test]
    fn test_apply_preserves_other_sections() {
        let content = "[ssh_connection]\npipelining = true\n";
        let (updated, changed) = apply_settings(content, DEFAULT_PLUGIN_DIR);
        assert!(changed);
        assert!(updated.starts_with("[ssh_connection]\npipelining = true\n"));
        assert!(updated.contains("[defaults]"));
        assert!(updated.contains("stdout_callback = prettify"));
    }

    #[test]
    fn test_apply_appends_to_existing_defaults() {
        let content = "[defaults]\nforks = 20\n\n[colors]\nok = green\n";
        let (updated, changed) = apply_settings(content, DEFAULT_PLUGIN_DIR);
        assert!(changed);
        // Keys land inside [defaults], before [colors]
        let defaults_end = updated.find("[colors]").unwrap();
        let defaults = &updated[..defaults_end];
        assert!(defaults.contains("forks = 20"));
        assert!(defaults.contains("stdout_callback = prettify"));
        assert!(defaults.contains("callback_plugins = ~/.ansible/plugins/callback"));
    }

    #[test]
    fn test_apply_rewrites_conflicting_value() {
        let content = "[defaults]\nstdout_callback = yaml\ncallback_plugins = /opt/plugins\n";
        let (updated, changed) = apply_settings(content, DEFAULT_PLUGIN_DIR);
        assert!(changed);
        assert!(updated.contains("stdout_callback = prettify"));
        assert!(updated.contains("callback_plugins = ~/.ansible/plugins/callback"));
        assert!(!updated.contains("yaml"));
    }

    #[test]
    fn test_apply_idempotent() {
        let (first, changed) = apply_settings("", DEFAULT_PLUGIN_DIR);
        assert!(changed);
        let (second, changed) = apply_settings(&first, DEFAULT_PLUGIN_DIR);
        assert!(!changed);
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_custom_plugin_dir() {
        let (updated, _) = apply_settings("", "/usr/share/callbacks");
        assert!(updated.contains("callback_plugins = /usr/share/callbacks"));
    }

    #[test]
    fn test_find_key_ignores_lookalikes() {
        let lines: Vec<String> = [
            "[defaults]",
            "# stdout_callback = commented",
            "stdout_callback_extra = x",
            "stdout_callback = yaml",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(find_key(&lines, 1, lines.len(), KEY_STDOUT_CALLBACK), Some(3));
    }

    #[test]
    fn test_skipped_when_disabled() {
        let options = SetupOptions::new()
            .with_auto_configure(false)
            .with_config_path("/nonexistent/dir/ansible.cfg");
        assert_eq!(configure_host(&options).unwrap(), SetupOutcome::Skipped);
    }

    #[test]
    fn test_configure_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ansible.cfg");
        let options = SetupOptions::new().with_config_path(&path);

        let outcome = configure_host(&options).unwrap();
        assert_eq!(outcome, SetupOutcome::Written { path: path.clone() });

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("stdout_callback = prettify"));

        // Second run is a no-op
        let outcome = configure_host(&options).unwrap();
        assert_eq!(outcome, SetupOutcome::Unchanged { path });
    }
}
