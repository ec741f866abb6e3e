//! Bare resource name resolvers for commands such as `service delete`

use async_trait::async_trait;

use super::args::ArgumentState;
use super::resolver::{ResolveContext, Resolver};
use super::suggestions::{SuggestionSet, Suggestions};

/// Which collection a [`NameResolver`] lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Service instances in scope
    Service,
    /// Service classes of the catalog
    ServiceClass,
    /// Components in scope
    Component,
}

/// Suggests the names of one resource collection.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver {
    kind: NameKind,
}

impl NameResolver {
    pub fn new(kind: NameKind) -> Self {
        Self { kind }
    }
}

/// Candidate names, or absent once one of them is already typed in full,
/// either as a completed positional or as the word under the cursor.
pub fn names_unless_typed<I, S>(args: &ArgumentState, names: I) -> Suggestions
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let current = args.current_token();
    let mut set = SuggestionSet::new();
    for name in names {
        let name = name.into();
        if args.is_typed(&name) || (!current.is_empty() && name == current) {
            return Suggestions::Absent;
        }
        set.insert(name);
    }
    set.into()
}

#[async_trait]
impl Resolver for NameResolver {
    async fn resolve(&self, ctx: &ResolveContext<'_>) -> Suggestions {
        match self.kind {
            NameKind::Service => {
                let instances = ctx.fetcher.service_instances(ctx.scope).await;
                names_unless_typed(ctx.args, instances.into_iter().map(|i| i.name))
            }
            NameKind::ServiceClass => {
                let classes = ctx.fetcher.service_classes().await;
                names_unless_typed(ctx.args, classes.into_iter().map(|c| c.external_name))
            }
            NameKind::Component => {
                let workloads = ctx.fetcher.workloads(ctx.scope).await;
                names_unless_typed(ctx.args, workloads.into_iter().map(|w| w.component))
            }
        }
    }
}
