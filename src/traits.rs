//! Core traits defining the callback surface of Prettify.
//!
//! This module contains the primary trait and result types that playbook
//! engines use to drive output plugins. An engine emits lifecycle events
//! (playbook/play/task start and end, handler notifications, final stats)
//! and a callback renders them however it sees fit.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// ============================================================================
// Result Types
// ============================================================================

/// Result of a single module invocation on a host.
///
/// This is the payload an engine attaches to every completed task. The
/// boolean flags fully determine the task's display status; see
/// [`ModuleResult::status`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleResult {
    /// Whether the module completed successfully
    pub success: bool,
    /// Whether the module changed anything on the host
    pub changed: bool,
    /// Whether the task was skipped (condition not met)
    pub skipped: bool,
    /// Whether the host could not be reached at all
    pub unreachable: bool,
    /// Human-readable message from the module
    pub message: String,
    /// Module-specific result data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Warnings emitted during execution
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ModuleResult {
    /// A successful result without changes.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            ..Default::default()
        }
    }

    /// A successful result that changed host state.
    pub fn changed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            changed: true,
            message: message.into(),
            ..Default::default()
        }
    }

    /// A failed result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Default::default()
        }
    }

    /// A skipped result (condition not met).
    pub fn skipped(message: impl Into<String>) -> Self {
        Self {
            success: true,
            skipped: true,
            message: message.into(),
            ..Default::default()
        }
    }

    /// A result for a host that could not be reached.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            success: false,
            unreachable: true,
            message: message.into(),
            ..Default::default()
        }
    }

    /// Derives the display status from the result flags.
    ///
    /// Unreachable takes precedence over failure, failure over skip, and
    /// skip over change.
    pub fn status(&self) -> crate::callback::types::TaskStatus {
        use crate::callback::types::TaskStatus;
        if self.unreachable {
            TaskStatus::Unreachable
        } else if !self.success {
            TaskStatus::Failed
        } else if self.skipped {
            TaskStatus::Skipped
        } else if self.changed {
            TaskStatus::Changed
        } else {
            TaskStatus::Ok
        }
    }
}

/// Result of task execution on a single host, as delivered to callbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The host this was executed on
    pub host: String,
    /// Name of the task (may be empty; renderers fall back to the action)
    pub task_name: String,
    /// The module/action that was executed
    pub action: String,
    /// Role that defined the task, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Source path of the task in the playbook tree, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_path: Option<String>,
    /// The module result
    pub result: ModuleResult,
    /// Duration of execution
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Wall-clock time at which the task started, if the engine tracked it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Local>>,
}

impl ExecutionResult {
    /// Create a result with the minimum required fields.
    pub fn new(
        host: impl Into<String>,
        task_name: impl Into<String>,
        action: impl Into<String>,
        result: ModuleResult,
    ) -> Self {
        Self {
            host: host.into(),
            task_name: task_name.into(),
            action: action.into(),
            role: None,
            task_path: None,
            result,
            duration: Duration::ZERO,
            started_at: None,
        }
    }

    /// Set the role that defined the task.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the task's source path.
    pub fn with_task_path(mut self, path: impl Into<String>) -> Self {
        self.task_path = Some(path.into());
        self
    }

    /// Set the execution duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the wall-clock start time.
    pub fn with_started_at(mut self, at: DateTime<Local>) -> Self {
        self.started_at = Some(at);
        self
    }

    /// The role to group this result under, if any.
    ///
    /// Prefers the explicit role field; falls back to extracting the
    /// segment after `/roles/` in the task path, the way roles are laid
    /// out on disk (`roles/<name>/tasks/main.yml`).
    pub fn effective_role(&self) -> Option<String> {
        if let Some(role) = &self.role {
            if !role.is_empty() {
                return Some(role.clone());
            }
        }
        let path = self.task_path.as_deref()?;
        let rest = path.split("/roles/").nth(1)?;
        let name = rest.split('/').next()?;
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// Per-host execution statistics for the final recap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStats {
    pub ok: usize,
    pub changed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub unreachable: usize,
}

impl ExecutionStats {
    /// Record one task result in the appropriate bucket.
    pub fn record(&mut self, status: crate::callback::types::TaskStatus) {
        use crate::callback::types::TaskStatus;
        match status {
            TaskStatus::Ok => self.ok += 1,
            TaskStatus::Changed => self.changed += 1,
            TaskStatus::Failed => self.failed += 1,
            TaskStatus::Skipped => self.skipped += 1,
            TaskStatus::Unreachable => self.unreachable += 1,
        }
    }

    pub fn merge(&mut self, other: &ExecutionStats) {
        self.ok += other.ok;
        self.changed += other.changed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.unreachable += other.unreachable;
    }

    /// Whether this host saw any failure or unreachability.
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.unreachable > 0
    }
}

// ============================================================================
// Callback Trait
// ============================================================================

/// Callback for receiving execution events.
///
/// Callbacks allow customizing the output and handling of execution
/// events such as task start, completion, and failure. All methods have
/// no-op defaults, so implementors only override what they render.
///
/// Rendering must never abort the run: methods return nothing and are
/// expected to swallow their own output errors.
#[async_trait]
pub trait ExecutionCallback: Send + Sync {
    /// Called when a playbook starts.
    async fn on_playbook_start(&self, name: &str) {
        let _ = name;
    }

    /// Called when a playbook ends.
    async fn on_playbook_end(&self, name: &str, success: bool) {
        let _ = (name, success);
    }

    /// Called when a play starts.
    async fn on_play_start(&self, name: &str, hosts: &[String]) {
        let _ = (name, hosts);
    }

    /// Called when a play ends.
    async fn on_play_end(&self, name: &str, success: bool) {
        let _ = (name, success);
    }

    /// Called when a task starts on a host.
    async fn on_task_start(&self, name: &str, host: &str) {
        let _ = (name, host);
    }

    /// Called when a task completes on a host.
    async fn on_task_complete(&self, result: &ExecutionResult) {
        let _ = result;
    }

    /// Called when a handler is triggered.
    async fn on_handler_triggered(&self, name: &str) {
        let _ = name;
    }

    /// Called once at the end of the run with per-host statistics.
    async fn on_stats(&self, stats: &HashMap<String, ExecutionStats>) {
        let _ = stats;
    }
}

// ============================================================================
// Serde Helpers
// ============================================================================

/// Serde module for Duration serialization.
pub(crate) mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    #[derive(Serialize, Deserialize)]
    struct DurationHelper {
        secs: u64,
        nanos: u32,
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let helper = DurationHelper {
            secs: duration.as_secs(),
            nanos: duration.subsec_nanos(),
        };
        helper.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helper = DurationHelper::deserialize(deserializer)?;
        Ok(Duration::new(helper.secs, helper.nanos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::types::TaskStatus;

    #[test]
    fn test_module_result_status() {
        assert_eq!(ModuleResult::ok("done").status(), TaskStatus::Ok);
        assert_eq!(ModuleResult::changed("done").status(), TaskStatus::Changed);
        assert_eq!(ModuleResult::failed("boom").status(), TaskStatus::Failed);
        assert_eq!(ModuleResult::skipped("cond").status(), TaskStatus::Skipped);
        assert_eq!(
            ModuleResult::unreachable("no route").status(),
            TaskStatus::Unreachable
        );
    }

    #[test]
    fn test_unreachable_takes_precedence() {
        let result = ModuleResult {
            success: false,
            unreachable: true,
            ..Default::default()
        };
        assert_eq!(result.status(), TaskStatus::Unreachable);
    }

    #[test]
    fn test_effective_role_prefers_explicit() {
        let result = ExecutionResult::new("web1", "Install nginx", "package", ModuleResult::ok(""))
            .with_role("webserver")
            .with_task_path("/srv/playbooks/roles/database/tasks/main.yml");
        assert_eq!(result.effective_role(), Some("webserver".to_string()));
    }

    #[test]
    fn test_effective_role_from_path() {
        let result = ExecutionResult::new("web1", "Install nginx", "package", ModuleResult::ok(""))
            .with_task_path("/srv/playbooks/roles/webserver/tasks/main.yml");
        assert_eq!(result.effective_role(), Some("webserver".to_string()));
    }

    #[test]
    fn test_effective_role_absent() {
        let result = ExecutionResult::new("web1", "Install nginx", "package", ModuleResult::ok(""))
            .with_task_path("/srv/playbooks/site.yml");
        assert_eq!(result.effective_role(), None);
    }

    #[test]
    fn test_stats_record_and_merge() {
        let mut stats = ExecutionStats::default();
        stats.record(TaskStatus::Ok);
        stats.record(TaskStatus::Changed);
        stats.record(TaskStatus::Failed);

        let mut other = ExecutionStats::default();
        other.record(TaskStatus::Ok);
        other.record(TaskStatus::Unreachable);

        stats.merge(&other);
        assert_eq!(stats.ok, 2);
        assert_eq!(stats.changed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.unreachable, 1);
        assert!(stats.has_failures());
    }

    #[test]
    fn test_execution_result_serde_roundtrip() {
        let result = ExecutionResult::new(
            "web1",
            "Install nginx",
            "package",
            ModuleResult::changed("installed"),
        )
        .with_role("webserver")
        .with_duration(Duration::from_millis(1500));

        let json = serde_json::to_string(&result).unwrap();
        let back: ExecutionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.host, "web1");
        assert_eq!(back.result.status(), TaskStatus::Changed);
        assert_eq!(back.duration, Duration::from_millis(1500));
    }
}
