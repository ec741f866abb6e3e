//! Completion engine - orchestrates the completion flow
//!
//! This module ties the completion components together: context lookup,
//! resolver dispatch, fetching through a bounded [`ResourceFetcher`], and the
//! final suggestion assembly.

use std::sync::Arc;

use tracing::debug;

use super::context::{CompletionContext, CompletionRequest};
use super::link::{LinkResolver, UnlinkResolver};
use super::linkage::{LinkageResolver, SecretNameConvention};
use super::names::{NameKind, NameResolver};
use super::resolver::{ResolveContext, Resolver};
use super::service::{ServiceParameterResolver, ServicePlanResolver};
use super::suggestions::{Suggestions, assemble};
use crate::cluster::{ClusterClient, ResourceFetcher, SessionScope};
use crate::config::CompletionConfig;

/// Main completion engine
pub struct CompletionEngine {
    /// Cluster client the resolvers read from
    client: Arc<dyn ClusterClient>,
    /// Secret reference correlation used by unlink
    linkage: Arc<dyn LinkageResolver>,
    /// Timeout, filtering and ordering settings
    settings: CompletionConfig,
}

impl CompletionEngine {
    /// Create a new completion engine with default settings
    ///
    /// # Arguments
    /// * `client` - Cluster client for fetching resources
    pub fn new(client: Arc<dyn ClusterClient>) -> Self {
        Self {
            client,
            linkage: Arc::new(SecretNameConvention),
            settings: CompletionConfig::default(),
        }
    }

    /// Replace the completion settings
    pub fn with_settings(mut self, settings: CompletionConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the secret reference correlation
    pub fn with_linkage(mut self, linkage: Arc<dyn LinkageResolver>) -> Self {
        self.linkage = linkage;
        self
    }

    /// Complete a request within a session scope
    ///
    /// # Arguments
    /// * `request` - Command path, flag being completed and argument state
    /// * `scope` - Namespace, application and current component
    ///
    /// # Returns
    /// * `Suggestions` - Absent when the position warrants no completion
    pub async fn complete(&self, request: &CompletionRequest, scope: &SessionScope) -> Suggestions {
        let context = request.context();
        let raw = self.resolve(context, request, scope).await;
        let suggestions = assemble(raw, &request.args, &self.settings);

        debug!(
            "Completed {} for '{}': {:?}",
            context,
            request.command.join(" "),
            suggestions
        );
        suggestions
    }

    /// Run the resolver of `context` without the assembly pass
    pub async fn resolve(
        &self,
        context: CompletionContext,
        request: &CompletionRequest,
        scope: &SessionScope,
    ) -> Suggestions {
        let Some(resolver) = Self::resolver_for(context) else {
            return Suggestions::Absent;
        };

        let fetcher = ResourceFetcher::new(self.client.as_ref(), self.settings.fetch_timeout());
        let ctx = ResolveContext {
            args: &request.args,
            scope,
            fetcher: &fetcher,
            linkage: self.linkage.as_ref(),
            require_provisioned: self.settings.require_provisioned_services,
        };

        resolver.resolve(&ctx).await
    }

    /// Resolver handling `context`
    fn resolver_for(context: CompletionContext) -> Option<Box<dyn Resolver>> {
        let resolver: Box<dyn Resolver> = match context {
            CompletionContext::ServiceClassName => {
                Box::new(NameResolver::new(NameKind::ServiceClass))
            }
            CompletionContext::ServicePlan => Box::new(ServicePlanResolver),
            CompletionContext::ServiceParameter => Box::new(ServiceParameterResolver),
            CompletionContext::ServiceName => Box::new(NameResolver::new(NameKind::Service)),
            CompletionContext::LinkTarget => Box::new(LinkResolver),
            CompletionContext::UnlinkTarget => Box::new(UnlinkResolver),
            CompletionContext::ComponentName => Box::new(NameResolver::new(NameKind::Component)),
            CompletionContext::None => return None,
        };
        Some(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ClusterSnapshot, ServiceClass, SnapshotClient};

    fn create_test_engine() -> CompletionEngine {
        let snapshot = ClusterSnapshot {
            service_classes: vec![
                ServiceClass {
                    external_name: "mysql-persistent".to_string(),
                    reference: "c1".to_string(),
                    default_parameters: Vec::new(),
                },
                ServiceClass {
                    external_name: "mongodb".to_string(),
                    reference: "c2".to_string(),
                    default_parameters: Vec::new(),
                },
            ],
            ..Default::default()
        };
        CompletionEngine::new(Arc::new(SnapshotClient::new(snapshot)))
    }

    fn scope() -> SessionScope {
        SessionScope::new("project", "app", "frontend")
    }

    #[test]
    fn test_every_context_but_none_has_a_resolver() {
        for context in [
            CompletionContext::ServiceClassName,
            CompletionContext::ServicePlan,
            CompletionContext::ServiceParameter,
            CompletionContext::ServiceName,
            CompletionContext::LinkTarget,
            CompletionContext::UnlinkTarget,
            CompletionContext::ComponentName,
        ] {
            assert!(CompletionEngine::resolver_for(context).is_some(), "{context}");
        }
        assert!(CompletionEngine::resolver_for(CompletionContext::None).is_none());
    }

    #[tokio::test]
    async fn test_unknown_command_is_absent() {
        let engine = create_test_engine();
        let request = CompletionRequest::from_words(&["storage", "create", ""]);
        assert!(engine.complete(&request, &scope()).await.is_absent());
    }

    #[tokio::test]
    async fn test_class_names_sorted() {
        let engine = create_test_engine();
        let request = CompletionRequest::from_words(&["service", "create", ""]);
        let out = engine.complete(&request, &scope()).await;
        assert_eq!(
            out,
            Suggestions::Candidates(vec!["mongodb".to_string(), "mysql-persistent".to_string()])
        );
    }

    #[tokio::test]
    async fn test_class_names_prefix() {
        let engine = create_test_engine();
        let request = CompletionRequest::from_words(&["service", "create", "my"]);
        let out = engine.complete(&request, &scope()).await;
        assert_eq!(
            out,
            Suggestions::Candidates(vec!["mysql-persistent".to_string()])
        );
    }

    #[tokio::test]
    async fn test_typed_class_name_is_absent() {
        let engine = create_test_engine();
        let request = CompletionRequest::from_words(&["service", "create", "mongodb", ""]);
        assert!(engine.complete(&request, &scope()).await.is_absent());
    }

    #[tokio::test]
    async fn test_settings_disable_sorting() {
        let engine = create_test_engine().with_settings(CompletionConfig {
            sort: false,
            ..CompletionConfig::default()
        });
        let request = CompletionRequest::from_words(&["service", "create", ""]);
        let out = engine.complete(&request, &scope()).await;
        assert_eq!(
            out,
            Suggestions::Candidates(vec!["mysql-persistent".to_string(), "mongodb".to_string()])
        );
    }
}
