//! Common shape of every completion resolver

use async_trait::async_trait;

use super::args::ArgumentState;
use super::linkage::LinkageResolver;
use super::suggestions::Suggestions;
use crate::cluster::{ResourceFetcher, SessionScope};

/// Inputs handed to a resolver for one invocation.
pub struct ResolveContext<'a> {
    pub args: &'a ArgumentState,
    pub scope: &'a SessionScope,
    pub fetcher: &'a ResourceFetcher<'a>,
    pub linkage: &'a dyn LinkageResolver,
    /// Only provisioned-successfully instances count as link targets
    pub require_provisioned: bool,
}

/// A completion resolver.
///
/// Resolvers keep no state between calls: the answer depends only on the
/// argument state, the scope and what the fetcher returns.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, ctx: &ResolveContext<'_>) -> Suggestions;
}
