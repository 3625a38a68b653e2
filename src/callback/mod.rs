//! Callback plugin system for playbook execution events.
//!
//! This module provides the infrastructure for receiving and rendering
//! execution events during playbook runs:
//!
//! 1. **[`ExecutionCallback`]** trait: core trait for receiving events
//! 2. **[`config`]**: display options and their environment variables
//! 3. **[`layout`]**: pure line-layout math for the compact format
//! 4. **[`factory`]**: create plugins by configuration-key name
//! 5. **Built-in plugins** in the [`plugins`] submodule
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use prettify::callback::prelude::*;
//!
//! // Configured from ANSIBLE_PRETTIFY_* environment variables
//! let callback = PrettifyCallback::new();
//!
//! // Or explicitly
//! let callback = PrettifyCallback::with_config(
//!     PrettifyConfig::new().with_timestamps(true),
//! );
//! ```
//!
//! # Creating Custom Callbacks
//!
//! Implement [`ExecutionCallback`] to create custom callbacks:
//!
//! ```rust,ignore
//! use prettify::callback::prelude::*;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Debug, Default)]
//! struct CountingCallback {
//!     tasks: AtomicUsize,
//! }
//!
//! #[async_trait]
//! impl ExecutionCallback for CountingCallback {
//!     async fn on_task_complete(&self, result: &ExecutionResult) {
//!         self.tasks.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//! ```
//!
//! [`ExecutionCallback`]: crate::traits::ExecutionCallback

pub mod config;
pub mod factory;
pub mod layout;
pub mod plugins;
pub mod types;

pub use config::PrettifyConfig;
pub use plugins::{NullCallback, PrettifyCallback};
pub use types::{CallbackEvent, TaskStatus};

/// A boxed callback for dynamic dispatch.
pub type BoxedCallback = Box<dyn crate::traits::ExecutionCallback>;

/// A shared callback wrapped in Arc for thread-safe shared ownership.
///
/// This is the recommended pattern for callbacks used across multiple tasks.
pub type SharedCallback = std::sync::Arc<dyn crate::traits::ExecutionCallback>;

/// Convenient re-exports for callback development and usage.
pub mod prelude {
    pub use crate::traits::{ExecutionCallback, ExecutionResult, ExecutionStats, ModuleResult};

    pub use super::config::PrettifyConfig;
    pub use super::plugins::{NullCallback, PrettifyCallback};
    pub use super::types::{CallbackEvent, TaskStatus};
    pub use super::{BoxedCallback, SharedCallback};

    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
