//! Null callback plugin - suppresses all output.
//!
//! A true no-op callback: every method is a default no-op, so a run
//! produces nothing on the console. Useful for scripting scenarios where
//! only the exit code matters, and for tests that need silent execution.
//!
//! # Example
//!
//! ```rust,ignore
//! use prettify::callback::plugins::NullCallback;
//!
//! let callback = NullCallback;
//! executor.add_callback(Arc::new(callback));
//! ```

use async_trait::async_trait;

use crate::traits::ExecutionCallback;

/// Null callback plugin that suppresses all output.
///
/// A zero-sized type; all methods fall through to the trait's no-op
/// defaults, so the compiler can eliminate the calls entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullCallback;

impl NullCallback {
    /// Create a new null callback.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExecutionCallback for NullCallback {}
