//! Link and unlink target resolvers
//!
//! `link` offers what the current component could depend on: other
//! components and service instances. `unlink` offers only what the current
//! component already depends on, read back from the secret references in its
//! workload.

use async_trait::async_trait;
use tracing::debug;

use super::linkage::{LinkCandidates, LinkTarget, linked_edges};
use super::resolver::{ResolveContext, Resolver};
use super::suggestions::{SuggestionSet, Suggestions};
use crate::cluster::{ServiceInstance, Workload};

/// Suggests components and service instances the current component can link to.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkResolver;

/// Suggests components and service instances the current component is linked to.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnlinkResolver;

/// Component names of ready workloads, excluding `current`.
pub fn sibling_components<'w>(
    workloads: &'w [Workload],
    current: &'w str,
) -> impl Iterator<Item = &'w str> + 'w {
    workloads
        .iter()
        .filter(move |workload| workload.ready && workload.component != current)
        .map(|workload| workload.component.as_str())
}

/// Instance names eligible as link targets.
pub fn eligible_services(
    instances: &[ServiceInstance],
    require_provisioned: bool,
) -> impl Iterator<Item = &str> {
    instances
        .iter()
        .filter(move |instance| !require_provisioned || instance.status.is_provisioned())
        .map(|instance| instance.name.as_str())
}

/// Everything the current component could link to.
pub fn link_targets(
    workloads: &[Workload],
    instances: &[ServiceInstance],
    current: &str,
    require_provisioned: bool,
) -> Vec<String> {
    let mut targets: SuggestionSet = sibling_components(workloads, current).collect();
    targets.extend(eligible_services(instances, require_provisioned));
    // A service sharing the component's name must not sneak it back in
    targets
        .into_vec()
        .into_iter()
        .filter(|name| name != current)
        .collect()
}

#[async_trait]
impl Resolver for LinkResolver {
    async fn resolve(&self, ctx: &ResolveContext<'_>) -> Suggestions {
        let workloads = ctx.fetcher.workloads(ctx.scope).await;
        let instances = ctx.fetcher.service_instances(ctx.scope).await;

        Suggestions::Candidates(link_targets(
            &workloads,
            &instances,
            &ctx.scope.component,
            ctx.require_provisioned,
        ))
    }
}

#[async_trait]
impl Resolver for UnlinkResolver {
    async fn resolve(&self, ctx: &ResolveContext<'_>) -> Suggestions {
        let current = ctx.scope.component.as_str();

        let workloads = ctx.fetcher.workloads(ctx.scope).await;
        let instances = ctx.fetcher.service_instances(ctx.scope).await;

        let Some(workload) = ctx.fetcher.workload(ctx.scope, current).await else {
            debug!("No workload for component '{current}', nothing to unlink");
            return Suggestions::empty();
        };

        let candidates = LinkCandidates {
            services: eligible_services(&instances, ctx.require_provisioned)
                .map(str::to_string)
                .collect(),
            components: sibling_components(&workloads, current)
                .map(str::to_string)
                .collect(),
        };

        let edges = linked_edges(ctx.linkage, ctx.fetcher, ctx.scope, &workload, &candidates).await;

        let targets: SuggestionSet = edges
            .iter()
            .filter(|edge| edge.target.name() != current)
            .filter(|edge| match &edge.target {
                LinkTarget::Service(name) => candidates.services.contains(name),
                LinkTarget::Component(name) => candidates.components.contains(name),
            })
            .map(|edge| edge.target.name().to_string())
            .collect();

        targets.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::ProvisionStatus;

    fn workload(component: &str, ready: bool) -> Workload {
        Workload {
            name: format!("{component}-app"),
            namespace: "project".to_string(),
            application: "app".to_string(),
            component: component.to_string(),
            component_type: "nodejs".to_string(),
            ready,
            secret_refs: Vec::new(),
        }
    }

    fn instance(name: &str, status: ProvisionStatus) -> ServiceInstance {
        ServiceInstance {
            name: name.to_string(),
            namespace: "project".to_string(),
            application: "app".to_string(),
            class_name: name.to_string(),
            plan_name: "default".to_string(),
            status,
        }
    }

    fn sorted(mut items: Vec<String>) -> Vec<String> {
        items.sort();
        items
    }

    #[test]
    fn test_link_targets_exclude_current() {
        let workloads = vec![workload("backend", true), workload("frontend", true)];
        let instances = vec![
            instance("mysql-persistent", ProvisionStatus::Provisioned),
            instance("postgresql-ephemeral", ProvisionStatus::Pending),
        ];

        assert_eq!(
            sorted(link_targets(&workloads, &instances, "frontend", false)),
            vec!["backend", "mysql-persistent", "postgresql-ephemeral"]
        );
    }

    #[test]
    fn test_link_targets_strict_provisioning() {
        let workloads = vec![workload("frontend", true)];
        let instances = vec![
            instance("mysql-persistent", ProvisionStatus::Provisioned),
            instance("postgresql-ephemeral", ProvisionStatus::Pending),
            instance("broken", ProvisionStatus::Failed),
        ];

        assert_eq!(
            link_targets(&workloads, &instances, "frontend", true),
            vec!["mysql-persistent"]
        );
    }

    #[test]
    fn test_link_targets_skip_unready_workloads() {
        let workloads = vec![workload("backend", false), workload("worker", true)];
        assert_eq!(link_targets(&workloads, &[], "frontend", false), vec!["worker"]);
    }

    #[test]
    fn test_link_targets_dedupe_across_kinds() {
        let workloads = vec![workload("cache", true)];
        let instances = vec![instance("cache", ProvisionStatus::Provisioned)];
        assert_eq!(link_targets(&workloads, &instances, "frontend", false), vec!["cache"]);
    }

    #[test]
    fn test_service_named_like_current_is_excluded() {
        let instances = vec![instance("frontend", ProvisionStatus::Provisioned)];
        assert!(link_targets(&[], &instances, "frontend", false).is_empty());
    }
}
