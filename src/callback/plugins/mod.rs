//! Built-in callback plugins.
//!
//! - [`PrettifyCallback`] - compact, Artisan-style output with role
//!   grouping, task timing, and colorized status lines (the default)
//! - [`NullCallback`] - no output at all (useful for testing)

pub mod null;
pub mod prettify;

pub use null::NullCallback;
pub use prettify::PrettifyCallback;

// Re-export the trait so plugin users need only one import
pub use crate::traits::ExecutionCallback;
