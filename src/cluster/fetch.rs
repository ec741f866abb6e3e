//! Timeout-bounded, failure-tolerant access to a [`ClusterClient`]

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::{
    ClusterClient, Secret, ServiceClass, ServiceInstance, ServicePlan, SessionScope, Workload,
};
use crate::error::{FetchError, Result};

/// Fetch front end used by the resolvers.
///
/// Each call is bounded by `timeout`. Errors and timeouts are logged at debug
/// level and come back as an empty collection (lists) or `None` (gets), so
/// one failed fetch never stops the others from contributing.
pub struct ResourceFetcher<'a> {
    client: &'a dyn ClusterClient,
    timeout: Duration,
}

impl<'a> ResourceFetcher<'a> {
    /// Create a fetcher
    ///
    /// # Arguments
    /// * `client` - Cluster client to read from
    /// * `timeout` - Upper bound for every single call
    pub fn new(client: &'a dyn ClusterClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn service_classes(&self) -> Vec<ServiceClass> {
        self.bounded("list_service_classes", self.client.list_service_classes())
            .await
            .unwrap_or_default()
    }

    pub async fn service_plans(&self, class_reference: &str) -> Vec<ServicePlan> {
        self.bounded(
            "list_service_plans",
            self.client.list_service_plans(class_reference),
        )
        .await
        .unwrap_or_default()
    }

    pub async fn service_instances(&self, scope: &SessionScope) -> Vec<ServiceInstance> {
        self.bounded(
            "list_service_instances",
            self.client.list_service_instances(scope),
        )
        .await
        .unwrap_or_default()
    }

    pub async fn workloads(&self, scope: &SessionScope) -> Vec<Workload> {
        self.bounded("list_workloads", self.client.list_workloads(scope))
            .await
            .unwrap_or_default()
    }

    pub async fn workload(&self, scope: &SessionScope, component: &str) -> Option<Workload> {
        self.bounded("get_workload", self.client.get_workload(scope, component))
            .await
    }

    pub async fn secret(&self, scope: &SessionScope, name: &str) -> Option<Secret> {
        self.bounded("get_secret", self.client.get_secret(scope, name))
            .await
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                debug!("{operation} failed: {e}");
                None
            }
            Err(_) => {
                debug!("{}", FetchError::Timeout { operation });
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ClusterSnapshot, SnapshotClient};
    use async_trait::async_trait;

    struct SlowClient;

    #[async_trait]
    impl ClusterClient for SlowClient {
        async fn list_service_classes(&self) -> Result<Vec<ServiceClass>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![ServiceClass {
                external_name: "late".to_string(),
                reference: "late".to_string(),
                default_parameters: Vec::new(),
            }])
        }

        async fn list_service_plans(&self, _class_reference: &str) -> Result<Vec<ServicePlan>> {
            Err(FetchError::Backend("catalog unavailable".to_string()).into())
        }

        async fn list_service_instances(
            &self,
            _scope: &SessionScope,
        ) -> Result<Vec<ServiceInstance>> {
            Ok(Vec::new())
        }

        async fn list_workloads(&self, _scope: &SessionScope) -> Result<Vec<Workload>> {
            Ok(Vec::new())
        }

        async fn get_workload(&self, _scope: &SessionScope, component: &str) -> Result<Workload> {
            Err(FetchError::NotFound {
                kind: "workload",
                name: component.to_string(),
            }
            .into())
        }

        async fn get_secret(&self, _scope: &SessionScope, name: &str) -> Result<Secret> {
            Err(FetchError::NotFound {
                kind: "secret",
                name: name.to_string(),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_timeout_yields_empty() {
        let client = SlowClient;
        let fetcher = ResourceFetcher::new(&client, Duration::from_millis(20));
        assert!(fetcher.service_classes().await.is_empty());
    }

    #[tokio::test]
    async fn test_backend_error_yields_empty() {
        let client = SlowClient;
        let fetcher = ResourceFetcher::new(&client, Duration::from_secs(1));
        assert!(fetcher.service_plans("c1").await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_get_yields_none() {
        let client = SlowClient;
        let fetcher = ResourceFetcher::new(&client, Duration::from_secs(1));
        let scope = SessionScope::new("project", "app", "frontend");
        assert!(fetcher.workload(&scope, "frontend").await.is_none());
        assert!(fetcher.secret(&scope, "backend-8080").await.is_none());
    }

    #[tokio::test]
    async fn test_successful_fetch_passes_through() {
        let snapshot = ClusterSnapshot {
            service_classes: vec![ServiceClass {
                external_name: "redis".to_string(),
                reference: "r1".to_string(),
                default_parameters: Vec::new(),
            }],
            ..Default::default()
        };
        let client = SnapshotClient::new(snapshot);
        let fetcher = ResourceFetcher::new(&client, Duration::from_secs(1));
        let classes = fetcher.service_classes().await;
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].external_name, "redis");
    }
}
