//! Correlation between secret references and the resources that expose them
//!
//! A workload that is linked to something carries a secret reference in its
//! environment. For a service instance the reference is the instance name.
//! For a sibling component it is a secret the sibling exposes, named
//! `<component>-<port>` and optionally labelled with the owning component.
//! That contract belongs to the platform, so it sits behind
//! [`LinkageResolver`] and can be swapped without touching the resolvers.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::debug;

use crate::cluster::{ResourceFetcher, SessionScope, Workload};

/// What a secret reference points at.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LinkTarget {
    /// A service instance, by name
    Service(String),
    /// A sibling component, by component name
    Component(String),
}

impl LinkTarget {
    pub fn name(&self) -> &str {
        match self {
            LinkTarget::Service(name) | LinkTarget::Component(name) => name,
        }
    }
}

/// An existing link from a workload to a target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LinkEdge {
    /// Component name of the linking workload
    pub source: String,
    pub target: LinkTarget,
}

/// Names a secret reference may resolve to.
#[derive(Debug, Clone, Default)]
pub struct LinkCandidates {
    pub services: BTreeSet<String>,
    pub components: BTreeSet<String>,
}

/// Maps one secret reference to the resource it links to.
#[async_trait]
pub trait LinkageResolver: Send + Sync {
    /// Resolve `secret_ref`, or `None` when it points at nothing known.
    ///
    /// Implementations must not fail: a missing or renamed secret is simply
    /// not a link.
    async fn resolve(
        &self,
        fetcher: &ResourceFetcher<'_>,
        scope: &SessionScope,
        secret_ref: &str,
        candidates: &LinkCandidates,
    ) -> Option<LinkTarget>;
}

/// Default convention: services by exact name, components through the
/// secret's owner label or its `<component>-<port>` name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretNameConvention;

#[async_trait]
impl LinkageResolver for SecretNameConvention {
    async fn resolve(
        &self,
        fetcher: &ResourceFetcher<'_>,
        scope: &SessionScope,
        secret_ref: &str,
        candidates: &LinkCandidates,
    ) -> Option<LinkTarget> {
        if candidates.services.contains(secret_ref) {
            return Some(LinkTarget::Service(secret_ref.to_string()));
        }

        let Some(secret) = fetcher.secret(scope, secret_ref).await else {
            debug!("Secret '{secret_ref}' not found, not a link");
            return None;
        };

        let owner = secret
            .component
            .filter(|component| candidates.components.contains(component))
            .or_else(|| {
                strip_port_suffix(&secret.name)
                    .filter(|base| candidates.components.contains(*base))
                    .map(str::to_string)
            })?;

        Some(LinkTarget::Component(owner))
    }
}

/// `backend-8080` -> `backend`; names without a numeric suffix give `None`.
pub fn strip_port_suffix(secret_name: &str) -> Option<&str> {
    let (base, port) = secret_name.rsplit_once('-')?;
    if base.is_empty() || port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(base)
}

/// Existing links of `workload`, one lookup per distinct secret reference.
pub async fn linked_edges(
    linkage: &dyn LinkageResolver,
    fetcher: &ResourceFetcher<'_>,
    scope: &SessionScope,
    workload: &Workload,
    candidates: &LinkCandidates,
) -> BTreeSet<LinkEdge> {
    let refs: BTreeSet<&str> = workload.secret_refs.iter().map(String::as_str).collect();

    let mut edges = BTreeSet::new();
    for secret_ref in refs {
        if let Some(target) = linkage.resolve(fetcher, scope, secret_ref, candidates).await {
            edges.insert(LinkEdge {
                source: workload.component.clone(),
                target,
            });
        }
    }
    edges
}
