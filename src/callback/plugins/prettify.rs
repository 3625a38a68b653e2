//! Compact, Artisan-style output callback.
//!
//! The default stdout callback. Renders each completed task as a single
//! right-aligned status line
//!
//! ```text
//!   ✓ Install nginx ......................................... 412ms DONE
//! ```
//!
//! grouping consecutive tasks under a header when their defining role
//! changes, and closing the run with a per-host recap and a completion
//! message. Display toggles come from [`PrettifyConfig`]; all alignment
//! math lives in [`crate::callback::layout`].

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use colored::{Color, Colorize};
use parking_lot::{Mutex, RwLock};

use crate::callback::config::PrettifyConfig;
use crate::callback::layout::{self, NameLayout};
use crate::callback::types::TaskStatus;
use crate::traits::{ExecutionCallback, ExecutionResult, ExecutionStats};

/// Status symbol shown in front of the task name.
pub fn symbol(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Ok => "✓",
        TaskStatus::Changed => "~",
        TaskStatus::Failed => "✗",
        TaskStatus::Skipped => "→",
        TaskStatus::Unreachable => "⚠",
    }
}

/// Right-aligned status label, padded to a fixed width so lines align.
pub fn status_label(status: TaskStatus) -> String {
    let label = match status {
        TaskStatus::Ok => "DONE",
        TaskStatus::Changed => "CHANGED",
        TaskStatus::Failed => "FAILED",
        TaskStatus::Skipped => "SKIPPED",
        TaskStatus::Unreachable => "UNREACH",
    };
    let width = layout::STATUS_LABEL_WIDTH;
    format!("{label:<width$}")
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Ok => Color::Green,
        TaskStatus::Changed => Color::Yellow,
        TaskStatus::Failed => Color::Red,
        TaskStatus::Skipped => Color::Cyan,
        TaskStatus::Unreachable => Color::BrightRed,
    }
}

fn timing_annotation(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}

/// The prettify stdout callback.
///
/// Cloning is cheap and clones share all mutable state, so the same
/// logical callback can be handed to multiple executor tasks.
pub struct PrettifyCallback {
    config: PrettifyConfig,
    start_time: Arc<RwLock<Option<Instant>>>,
    playbook_name: Arc<RwLock<String>>,
    last_role: Arc<RwLock<Option<String>>>,
    host_stats: Arc<RwLock<HashMap<String, ExecutionStats>>>,
    cached_width: Arc<RwLock<Option<usize>>>,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl PrettifyCallback {
    /// Create a callback configured from the environment.
    pub fn new() -> Self {
        Self::with_config(PrettifyConfig::from_env())
    }

    /// Create a callback with an explicit configuration.
    pub fn with_config(config: PrettifyConfig) -> Self {
        Self {
            config,
            start_time: Arc::new(RwLock::new(None)),
            playbook_name: Arc::new(RwLock::new(String::new())),
            last_role: Arc::new(RwLock::new(None)),
            host_stats: Arc::new(RwLock::new(HashMap::new())),
            cached_width: Arc::new(RwLock::new(None)),
            writer: Arc::new(Mutex::new(Box::new(io::stdout()))),
        }
    }

    /// Redirect output, mainly for capturing it in tests.
    pub fn with_writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.writer = Arc::new(Mutex::new(writer));
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &PrettifyConfig {
        &self.config
    }

    // Output must never abort the run, so write errors are swallowed.
    fn emit(&self, line: &str) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "{line}");
    }

    /// Terminal width, measured once per play.
    fn width(&self) -> usize {
        if let Some(width) = *self.cached_width.read() {
            return width;
        }
        let width = layout::terminal_width(self.config.terminal_width);
        *self.cached_width.write() = Some(width);
        width
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if text.is_empty() || !self.config.use_colors {
            return text.to_string();
        }
        text.color(color).to_string()
    }

    fn dim(&self, text: &str) -> String {
        if text.is_empty() || !self.config.use_colors {
            return text.to_string();
        }
        text.dimmed().to_string()
    }

    fn timestamp_prefix(&self, started_at: Option<DateTime<Local>>) -> String {
        let at = started_at.unwrap_or_else(Local::now);
        format!("[{}]", at.format("%H:%M:%S"))
    }

    /// Render one completed task into its output lines.
    ///
    /// Width arithmetic runs on the uncolored text; colors are applied
    /// piecewise afterwards so escape sequences never shift alignment.
    fn render_result(&self, result: &ExecutionResult, width: usize) -> Vec<String> {
        let status = result.result.status();
        let sym = symbol(status);
        let label = status_label(status);

        let name = if result.task_name.trim().is_empty() {
            format!("[{}]", result.action)
        } else {
            result.task_name.clone()
        };

        let timestamp = if self.config.show_timestamps {
            self.timestamp_prefix(result.started_at)
        } else {
            String::new()
        };
        let timing = if self.config.show_timing {
            timing_annotation(result.duration)
        } else {
            String::new()
        };

        let suffix_plain = if timing.is_empty() {
            format!(" {label}")
        } else {
            format!(" {timing} {label}")
        };
        let suffix = if timing.is_empty() {
            format!(" {}", self.paint(&label, status_color(status)))
        } else {
            format!(
                " {} {}",
                self.dim(&timing),
                self.paint(&label, status_color(status))
            )
        };

        let available =
            layout::max_task_width(width).saturating_sub(layout::display_width(&timestamp));

        let mut lines = Vec::new();
        match layout::layout_task_name(&name, available) {
            NameLayout::Single(fitted) => {
                let prefix_plain = format!("{timestamp}  {sym} {fitted} ");
                let dots = layout::dot_leader(
                    layout::display_width(&prefix_plain),
                    layout::display_width(&suffix_plain),
                    width,
                );
                lines.push(format!(
                    "{}  {} {} {}{}",
                    self.dim(&timestamp),
                    self.paint(sym, status_color(status)),
                    fitted,
                    self.dim(&dots),
                    suffix
                ));
            }
            NameLayout::Wrapped { first, second } => {
                lines.push(format!(
                    "{}  {} {}",
                    self.dim(&timestamp),
                    self.paint(sym, status_color(status)),
                    first
                ));
                let cont_plain = format!("    {second} ");
                let dots = layout::dot_leader(
                    layout::display_width(&cont_plain),
                    layout::display_width(&suffix_plain),
                    width,
                );
                lines.push(format!("    {second} {}{}", self.dim(&dots), suffix));
            }
        }

        if status == TaskStatus::Failed && !result.result.message.is_empty() {
            lines.push(self.paint(
                &format!("    Error: {}", result.result.message),
                Color::Red,
            ));
        }

        lines
    }

    /// Emit a role header when the defining role changes.
    ///
    /// Tasks without a role neither get a header nor reset the current
    /// one, so interleaved role-less tasks do not repeat headers.
    fn maybe_emit_role_header(&self, result: &ExecutionResult) {
        if !self.config.group_by_role {
            return;
        }
        let Some(role) = result.effective_role() else {
            return;
        };
        {
            let last = self.last_role.read();
            if last.as_deref() == Some(role.as_str()) {
                return;
            }
        }
        *self.last_role.write() = Some(role.clone());
        self.emit("");
        self.emit(&self.paint(&format!("┌─ {role}"), Color::Blue));
    }

    /// Render the final per-host recap and the completion message.
    fn render_recap(&self, stats: &HashMap<String, ExecutionStats>) -> Vec<String> {
        let mut lines = vec![String::new()];

        let mut hosts: Vec<&String> = stats.keys().collect();
        hosts.sort();
        for host in hosts {
            let s = &stats[host];
            lines.push(self.paint(&format!("  {host}"), Color::Blue));
            if s.ok > 0 {
                lines.push(format!(
                    "    {} {} successful",
                    self.paint("✓", Color::Green),
                    s.ok
                ));
            }
            if s.changed > 0 {
                lines.push(format!(
                    "    {} {} changed",
                    self.paint("~", Color::Yellow),
                    s.changed
                ));
            }
            if s.failed > 0 {
                lines.push(format!(
                    "    {} {} failed",
                    self.paint("✗", Color::Red),
                    s.failed
                ));
            }
            if s.unreachable > 0 {
                lines.push(format!(
                    "    {} {} unreachable",
                    self.paint("⚠", Color::BrightRed),
                    s.unreachable
                ));
            }
            if s.skipped > 0 {
                lines.push(format!(
                    "    {} {} skipped",
                    self.paint("→", Color::Cyan),
                    s.skipped
                ));
            }
        }

        lines.push(String::new());

        let elapsed = match *self.start_time.read() {
            Some(started) => started.elapsed().as_secs_f64(),
            None => 0.0,
        };
        let failed = stats.values().any(ExecutionStats::has_failures);
        let completion = if failed {
            self.paint(
                &format!("✗ Playbook finished with failures in {elapsed:.1}s"),
                Color::Red,
            )
        } else {
            let name = self.playbook_name.read().clone();
            let message = if name.contains("deploy") {
                format!("🚀 Deployment completed successfully in {elapsed:.1}s")
            } else if name.contains("provision") {
                format!("⚙️ Provisioning completed successfully in {elapsed:.1}s")
            } else {
                format!("✅ Playbook completed successfully in {elapsed:.1}s")
            };
            self.paint(&message, Color::Green)
        };
        lines.push(completion);

        lines
    }
}

impl Default for PrettifyCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PrettifyCallback {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            start_time: Arc::clone(&self.start_time),
            playbook_name: Arc::clone(&self.playbook_name),
            last_role: Arc::clone(&self.last_role),
            host_stats: Arc::clone(&self.host_stats),
            cached_width: Arc::clone(&self.cached_width),
            writer: Arc::clone(&self.writer),
        }
    }
}

impl fmt::Debug for PrettifyCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettifyCallback")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ExecutionCallback for PrettifyCallback {
    async fn on_playbook_start(&self, name: &str) {
        *self.playbook_name.write() = name.to_lowercase();
        *self.start_time.write() = Some(Instant::now());
        self.host_stats.write().clear();
        *self.last_role.write() = None;
    }

    async fn on_play_start(&self, name: &str, _hosts: &[String]) {
        // The terminal may have been resized between plays
        *self.cached_width.write() = None;
        *self.last_role.write() = None;

        let display = if name.trim().is_empty() {
            "Unnamed Play"
        } else {
            name
        };
        self.emit("");
        self.emit(&self.paint(&format!("PLAY [{display}]"), Color::Blue));
    }

    async fn on_task_complete(&self, result: &ExecutionResult) {
        let status = result.result.status();
        self.host_stats
            .write()
            .entry(result.host.clone())
            .or_default()
            .record(status);

        let width = self.width();
        self.maybe_emit_role_header(result);
        for line in self.render_result(result, width) {
            self.emit(&line);
        }
    }

    async fn on_handler_triggered(&self, name: &str) {
        self.emit("");
        self.emit(&self.paint(&format!("HANDLER [{name}]"), Color::Blue));
    }

    async fn on_stats(&self, stats: &HashMap<String, ExecutionStats>) {
        // Engines that do not aggregate stats themselves send an empty
        // map; fall back to what we counted along the way.
        let accumulated;
        let effective = if stats.is_empty() {
            accumulated = self.host_stats.read().clone();
            &accumulated
        } else {
            stats
        };
        for line in self.render_recap(effective) {
            self.emit(&line);
        }
    }
}
