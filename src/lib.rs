//! # Prettify - Compact Playbook Output
//!
//! Prettify reformats playbook execution output into a compact, colorized
//! console display, optionally grouping tasks by the role that defines
//! them. It is a stdout callback: a passive observer that receives
//! per-task result events from a playbook engine and renders them as
//! right-aligned, Artisan-style status lines.
//!
//! ```text
//! PLAY [Deploy application]
//!
//! ┌─ webserver
//!   ✓ Install nginx ......................................... 412ms DONE
//!   ~ Write vhost config ..................................... 38ms CHANGED
//!
//! ✅ Playbook completed successfully in 3.2s
//! ```
//!
//! ## Core Concepts
//!
//! - **Callback**: an implementation of [`traits::ExecutionCallback`]
//!   that receives lifecycle events (playbook/play/task start and end,
//!   handler notifications, final stats)
//! - **Event stream**: the serialized form of those events as JSONL,
//!   defined in [`callback::types`] and consumed by `prettify replay`
//! - **Configuration**: display toggles in [`callback::config`], driven
//!   by `ANSIBLE_PRETTIFY_*` environment variables
//! - **Setup**: [`setup`] writes the `stdout_callback = prettify` and
//!   `callback_plugins` keys into the host configuration file
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use prettify::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let callback = PrettifyCallback::new();
//!
//!     callback.on_playbook_start("deploy.yml").await;
//!     callback.on_play_start("Deploy application", &hosts).await;
//!     // ... engine drives on_task_start / on_task_complete ...
//!     callback.on_stats(&stats).await;
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod callback;
pub mod error;
pub mod setup;
pub mod traits;

pub use error::{Error, Result};

/// Convenient re-exports of commonly used types and traits.
pub mod prelude {
    pub use crate::callback::config::PrettifyConfig;
    pub use crate::callback::plugins::{NullCallback, PrettifyCallback};
    pub use crate::callback::types::{CallbackEvent, TaskStatus};
    pub use crate::callback::{BoxedCallback, SharedCallback};
    pub use crate::error::{Error, Result};
    pub use crate::setup::{configure_host, SetupOptions, SetupOutcome};
    pub use crate::traits::{ExecutionCallback, ExecutionResult, ExecutionStats, ModuleResult};
}
