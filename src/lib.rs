//! Cluster completion library
//!
//! Context-aware shell completion for a cluster-facing developer CLI: given
//! the words typed so far and the active namespace, application and
//! component, it suggests service classes, plans, parameter keys, link and
//! unlink targets and resource names.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and shell hook generation
//! - `cluster`: Resource model and the cluster client seam
//! - `completion`: Argument state, resolvers and suggestion assembly
//! - `config`: Configuration management
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cluster_complete::{CompletionEngine, CompletionRequest, Config, SnapshotClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = SnapshotClient::from_path("cluster.json".as_ref())?;
//!     let engine = CompletionEngine::new(Arc::new(client))
//!         .with_settings(config.completion.clone());
//!
//!     let request = CompletionRequest::from_words(&["service", "create", ""]);
//!     for name in engine.complete(&request, &config.session.scope()).await.into_vec() {
//!         println!("{}", name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod cluster;
pub mod completion;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use cluster::{ClusterClient, ClusterSnapshot, SessionScope, SnapshotClient};
pub use completion::{CompletionEngine, CompletionRequest, Suggestions};
pub use config::Config;
pub use error::{CompletionError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
