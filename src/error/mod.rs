//! Error handling for cluster-complete.
//!
//! Errors only surface from setup work such as loading configuration or a
//! cluster snapshot. The completion path itself treats every fetch failure as
//! "no data" so the user's shell never sees an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use cluster_complete::error::{ConfigError, Result};
//!
//! fn require_namespace(namespace: &str) -> Result<()> {
//!     if namespace.is_empty() {
//!         return Err(ConfigError::MissingField("session.namespace".into()).into());
//!     }
//!     Ok(())
//! }
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{CompletionError, ConfigError, FetchError, Result};
