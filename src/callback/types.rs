//! Callback event types for the plugin system.
//!
//! This module defines the event types used to notify plugins about
//! playbook execution lifecycle events, and the serialized form of those
//! events as a JSONL stream (one JSON object per line). The stream format
//! is what the `prettify replay` command consumes.
//!
//! ## Event Categories
//!
//! - **Playbook Events**: Start/end of entire playbook execution
//! - **Play Events**: Start of individual plays
//! - **Task Events**: Task start and per-host results
//! - **Handler Events**: Handler triggering
//! - **Stats Events**: Final execution statistics

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::traits::{ExecutionCallback, ExecutionResult, ExecutionStats};

// ============================================================================
// Task Status
// ============================================================================

/// Display status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task completed successfully without changes
    Ok,
    /// Task completed successfully with changes
    Changed,
    /// Task failed
    Failed,
    /// Task was skipped (condition not met)
    Skipped,
    /// Host was unreachable
    Unreachable,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Ok
    }
}

// ============================================================================
// Core Event Enum
// ============================================================================

/// All possible callback events during playbook execution.
///
/// Events are emitted at various lifecycle points and carry context-specific
/// information about the current state of execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CallbackEvent {
    /// Emitted when a playbook starts execution.
    ///
    /// This is the first event for any playbook run.
    PlaybookStart {
        /// Name of the playbook (usually its file name)
        name: String,
    },

    /// Emitted when a playbook completes execution (success or failure).
    ///
    /// This is the last event for any playbook run.
    PlaybookEnd {
        /// Name of the playbook
        name: String,
        /// Whether the playbook completed successfully
        success: bool,
    },

    /// Emitted when a play starts execution.
    PlayStart {
        /// Name of the play (may be empty for unnamed plays)
        name: String,
        /// Resolved hosts for this play
        hosts: Vec<String>,
    },

    /// Emitted when a task starts execution on a host.
    TaskStart {
        /// Name of the task
        name: String,
        /// Host the task is starting on
        host: String,
    },

    /// Emitted when a task completes on a host, whatever the outcome.
    ///
    /// The display status is derived from the result flags; see
    /// [`crate::traits::ModuleResult::status`].
    TaskResult {
        /// The full per-host result
        result: ExecutionResult,
    },

    /// Emitted when a handler is triggered by a task notification.
    HandlerTriggered {
        /// Name of the handler that was triggered
        name: String,
    },

    /// Emitted at the end of execution with final statistics.
    Stats {
        /// Final statistics per host
        stats: HashMap<String, ExecutionStats>,
    },
}

impl CallbackEvent {
    /// Returns the event type name as a string.
    pub fn event_type(&self) -> &'static str {
        match self {
            CallbackEvent::PlaybookStart { .. } => "playbook_start",
            CallbackEvent::PlaybookEnd { .. } => "playbook_end",
            CallbackEvent::PlayStart { .. } => "play_start",
            CallbackEvent::TaskStart { .. } => "task_start",
            CallbackEvent::TaskResult { .. } => "task_result",
            CallbackEvent::HandlerTriggered { .. } => "handler_triggered",
            CallbackEvent::Stats { .. } => "stats",
        }
    }

    /// Returns the host associated with this event, if any.
    pub fn host(&self) -> Option<&str> {
        match self {
            CallbackEvent::TaskStart { host, .. } => Some(host),
            CallbackEvent::TaskResult { result } => Some(&result.host),
            _ => None,
        }
    }

    /// Returns whether this is a failure event.
    pub fn is_failure(&self) -> bool {
        match self {
            CallbackEvent::TaskResult { result } => {
                matches!(
                    result.result.status(),
                    TaskStatus::Failed | TaskStatus::Unreachable
                )
            }
            CallbackEvent::PlaybookEnd { success, .. } => !success,
            _ => false,
        }
    }

    /// Feed this event into a callback, invoking the matching trait method.
    pub async fn dispatch(&self, callback: &dyn ExecutionCallback) {
        match self {
            CallbackEvent::PlaybookStart { name } => callback.on_playbook_start(name).await,
            CallbackEvent::PlaybookEnd { name, success } => {
                callback.on_playbook_end(name, *success).await;
            }
            CallbackEvent::PlayStart { name, hosts } => {
                callback.on_play_start(name, hosts).await;
            }
            CallbackEvent::TaskStart { name, host } => {
                callback.on_task_start(name, host).await;
            }
            CallbackEvent::TaskResult { result } => callback.on_task_complete(result).await,
            CallbackEvent::HandlerTriggered { name } => {
                callback.on_handler_triggered(name).await;
            }
            CallbackEvent::Stats { stats } => callback.on_stats(stats).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ModuleResult;

    fn task_result(host: &str, result: ModuleResult) -> CallbackEvent {
        CallbackEvent::TaskResult {
            result: ExecutionResult::new(host, "Test task", "debug", result),
        }
    }

    #[test]
    fn test_event_type() {
        let event = CallbackEvent::PlaybookStart {
            name: "site.yml".to_string(),
        };
        assert_eq!(event.event_type(), "playbook_start");
    }

    #[test]
    fn test_event_host() {
        let event = task_result("server1", ModuleResult::ok("done"));
        assert_eq!(event.host(), Some("server1"));

        let event = CallbackEvent::HandlerTriggered {
            name: "restart nginx".to_string(),
        };
        assert_eq!(event.host(), None);
    }

    #[test]
    fn test_is_failure() {
        assert!(task_result("h1", ModuleResult::failed("boom")).is_failure());
        assert!(task_result("h1", ModuleResult::unreachable("gone")).is_failure());
        assert!(!task_result("h1", ModuleResult::ok("fine")).is_failure());
        assert!(!task_result("h1", ModuleResult::skipped("cond")).is_failure());

        let end = CallbackEvent::PlaybookEnd {
            name: "site.yml".to_string(),
            success: false,
        };
        assert!(end.is_failure());
    }

    #[test]
    fn test_event_serialization_tag() {
        let event = task_result("localhost", ModuleResult::changed("updated"));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event_type\":\"task_result\""));

        let back: CallbackEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_type(), "task_result");
    }

    #[test]
    fn test_stats_event_roundtrip() {
        let mut stats = HashMap::new();
        stats.insert(
            "web1".to_string(),
            ExecutionStats {
                ok: 3,
                changed: 1,
                ..Default::default()
            },
        );
        let event = CallbackEvent::Stats { stats };
        let json = serde_json::to_string(&event).unwrap();
        let back: CallbackEvent = serde_json::from_str(&json).unwrap();
        match back {
            CallbackEvent::Stats { stats } => {
                assert_eq!(stats["web1"].ok, 3);
                assert_eq!(stats["web1"].changed, 1);
            }
            other => panic!("unexpected event: {}", other.event_type()),
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_trait_method() {
        use parking_lot::Mutex;
        use std::sync::Arc;

        #[derive(Default)]
        struct Recorder {
            seen: Arc<Mutex<Vec<String>>>,
        }

        #[async_trait::async_trait]
        impl ExecutionCallback for Recorder {
            async fn on_playbook_start(&self, name: &str) {
                self.seen.lock().push(format!("start:{name}"));
            }
            async fn on_task_complete(&self, result: &ExecutionResult) {
                self.seen.lock().push(format!("result:{}", result.host));
            }
        }

        let recorder = Recorder::default();
        let seen = Arc::clone(&recorder.seen);

        CallbackEvent::PlaybookStart {
            name: "deploy.yml".to_string(),
        }
        .dispatch(&recorder)
        .await;
        task_result("web1", ModuleResult::ok("done"))
            .dispatch(&recorder)
            .await;

        assert_eq!(*seen.lock(), vec!["start:deploy.yml", "result:web1"]);
    }
}
