//! Completion resolution for the cluster CLI
//!
//! Given the words typed so far and the active session scope, this module
//! decides what the shell should offer next. Every resolver follows the same
//! flow: check the argument state, fetch a few resource collections, filter
//! or correlate them, and hand back a duplicate-free suggestion set.
//!
//! # Architecture
//!
//! - **ArgumentState**: typed view of the tokens and flags on the line
//! - **Context**: maps a command path and flag to a completion kind
//! - **Resolvers**: plan, parameter, link, unlink and bare-name lookups
//! - **Linkage**: secret reference to link target correlation
//! - **Suggestions**: absent-vs-empty result and the final assembly pass
//! - **Engine**: orchestrates the whole flow
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use cluster_complete::cluster::{ClusterSnapshot, SessionScope, SnapshotClient};
//! use cluster_complete::completion::{CompletionEngine, CompletionRequest};
//!
//! # async fn run() {
//! let client = Arc::new(SnapshotClient::new(ClusterSnapshot::default()));
//! let engine = CompletionEngine::new(client);
//! let scope = SessionScope::new("project", "app", "frontend");
//!
//! // `link <TAB>`
//! let request = CompletionRequest::from_words(&["link", ""]);
//! let suggestions = engine.complete(&request, &scope).await;
//! # }
//! ```

mod args;
mod context;
mod engine;
mod link;
mod linkage;
mod names;
mod resolver;
mod service;
mod suggestions;


pub use args::{ArgumentState, ArgumentStateBuilder, parse_parameter_list};
pub use context::{CompletionContext, CompletionRequest};
pub use engine::CompletionEngine;
pub use link::{LinkResolver, UnlinkResolver};
pub use linkage::{
    LinkCandidates, LinkEdge, LinkTarget, LinkageResolver, SecretNameConvention,
    strip_port_suffix,
};
pub use names::{NameKind, NameResolver};
pub use resolver::{ResolveContext, Resolver};
pub use service::{ServiceParameterResolver, ServicePlanResolver};
pub use suggestions::{SuggestionSet, Suggestions, assemble};
