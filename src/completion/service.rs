//! Service catalog resolvers: plans and parameters of a service class
//!
//! Both read the class name from the first positional after the subcommand
//! (`service create <class>`).

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::debug;

use super::args::ArgumentState;
use super::resolver::{ResolveContext, Resolver};
use super::suggestions::{SuggestionSet, Suggestions};
use crate::cluster::{ResourceFetcher, ServiceClass, ServicePlan};

/// Position of the class name among the completed tokens.
const CLASS_NAME_POSITION: usize = 1;

/// Suggests plan names of the class being created.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServicePlanResolver;

/// Suggests parameter keys not yet supplied for the selected plan.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServiceParameterResolver;

/// Find a class by exact external name.
pub fn find_class<'c>(classes: &'c [ServiceClass], name: &str) -> Option<&'c ServiceClass> {
    classes.iter().find(|class| class.external_name == name)
}

/// Plans owned by `class`, tolerating adapters that return extra plans.
pub fn plans_of<'p>(class: &ServiceClass, plans: &'p [ServicePlan]) -> Vec<&'p ServicePlan> {
    plans
        .iter()
        .filter(|plan| plan.class_reference == class.reference)
        .collect()
}

/// External names of the plans of `class`.
pub fn plan_names(class: &ServiceClass, plans: &[ServicePlan]) -> Vec<String> {
    plans_of(class, plans)
        .into_iter()
        .map(|plan| plan.external_name.clone())
        .collect::<SuggestionSet>()
        .into_vec()
}

/// Pick the plan parameter completion applies to.
///
/// Without a requested plan the class must have exactly one plan; with one,
/// the name must match exactly.
pub fn select_plan<'p>(
    candidates: &[&'p ServicePlan],
    requested: Option<&str>,
) -> Option<&'p ServicePlan> {
    match requested {
        Some(name) => candidates
            .iter()
            .find(|plan| plan.external_name == name)
            .copied(),
        None => match candidates {
            [only] => Some(*only),
            _ => None,
        },
    }
}

/// Plan keys and class defaults, minus the keys already supplied.
pub fn remaining_parameters(
    class: &ServiceClass,
    plan: &ServicePlan,
    supplied: &BTreeSet<String>,
) -> Vec<String> {
    plan.parameters
        .iter()
        .chain(class.default_parameters.iter())
        .filter(|key| !supplied.contains(*key))
        .cloned()
        .collect::<SuggestionSet>()
        .into_vec()
}

/// Resolve the class named on the command line and fetch its plans.
async fn class_and_plans(
    args: &ArgumentState,
    fetcher: &ResourceFetcher<'_>,
) -> Option<(ServiceClass, Vec<ServicePlan>)> {
    let class_name = args.token_at(CLASS_NAME_POSITION)?;

    let classes = fetcher.service_classes().await;
    let Some(class) = find_class(&classes, class_name).cloned() else {
        debug!("No service class named '{class_name}'");
        return None;
    };

    let plans = fetcher.service_plans(&class.reference).await;
    Some((class, plans))
}

#[async_trait]
impl Resolver for ServicePlanResolver {
    async fn resolve(&self, ctx: &ResolveContext<'_>) -> Suggestions {
        match class_and_plans(ctx.args, ctx.fetcher).await {
            Some((class, plans)) => Suggestions::Candidates(plan_names(&class, &plans)),
            None => Suggestions::empty(),
        }
    }
}

#[async_trait]
impl Resolver for ServiceParameterResolver {
    async fn resolve(&self, ctx: &ResolveContext<'_>) -> Suggestions {
        let Some((class, plans)) = class_and_plans(ctx.args, ctx.fetcher).await else {
            return Suggestions::empty();
        };

        let candidates = plans_of(&class, &plans);
        let Some(plan) = select_plan(&candidates, ctx.args.plan()) else {
            debug!(
                "No plan of '{}' selected ({} candidates, requested {:?})",
                class.external_name,
                candidates.len(),
                ctx.args.plan()
            );
            return Suggestions::empty();
        };

        let supplied = ctx.args.supplied_parameters();
        Suggestions::Candidates(remaining_parameters(&class, plan, &supplied))
    }
}
