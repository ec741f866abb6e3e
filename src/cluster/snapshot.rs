//! Snapshot-backed cluster client
//!
//! Serves every fetch from an in-memory copy of cluster state, usually loaded
//! from a JSON file exported by the host CLI.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    ClusterClient, Secret, ServiceClass, ServiceInstance, ServicePlan, SessionScope, Workload,
};
use crate::error::{ConfigError, FetchError, Result};

/// Point-in-time copy of the resources completion reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub service_classes: Vec<ServiceClass>,
    #[serde(default)]
    pub service_plans: Vec<ServicePlan>,
    #[serde(default)]
    pub service_instances: Vec<ServiceInstance>,
    #[serde(default)]
    pub workloads: Vec<Workload>,
    #[serde(default)]
    pub secrets: Vec<Secret>,
}

impl ClusterSnapshot {
    /// Parse a snapshot from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a snapshot file
    ///
    /// # Arguments
    /// * `path` - Path to a JSON snapshot
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        let text = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&text)?;
        debug!(
            "Loaded snapshot {}: {} classes, {} instances, {} workloads",
            path.display(),
            snapshot.service_classes.len(),
            snapshot.service_instances.len(),
            snapshot.workloads.len()
        );
        Ok(snapshot)
    }
}

/// [`ClusterClient`] answering from a [`ClusterSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct SnapshotClient {
    snapshot: ClusterSnapshot,
}

impl SnapshotClient {
    pub fn new(snapshot: ClusterSnapshot) -> Self {
        Self { snapshot }
    }

    /// Build a client from a snapshot file
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(ClusterSnapshot::load(path)?))
    }

    fn in_scope(namespace: &str, application: &str, scope: &SessionScope) -> bool {
        namespace == scope.namespace && application == scope.application
    }
}

#[async_trait]
impl ClusterClient for SnapshotClient {
    async fn list_service_classes(&self) -> Result<Vec<ServiceClass>> {
        Ok(self.snapshot.service_classes.clone())
    }

    async fn list_service_plans(&self, class_reference: &str) -> Result<Vec<ServicePlan>> {
        Ok(self
            .snapshot
            .service_plans
            .iter()
            .filter(|plan| plan.class_reference == class_reference)
            .cloned()
            .collect())
    }

    async fn list_service_instances(&self, scope: &SessionScope) -> Result<Vec<ServiceInstance>> {
        Ok(self
            .snapshot
            .service_instances
            .iter()
            .filter(|instance| Self::in_scope(&instance.namespace, &instance.application, scope))
            .cloned()
            .collect())
    }

    async fn list_workloads(&self, scope: &SessionScope) -> Result<Vec<Workload>> {
        Ok(self
            .snapshot
            .workloads
            .iter()
            .filter(|workload| Self::in_scope(&workload.namespace, &workload.application, scope))
            .cloned()
            .collect())
    }

    async fn get_workload(&self, scope: &SessionScope, component: &str) -> Result<Workload> {
        self.snapshot
            .workloads
            .iter()
            .find(|workload| {
                workload.component == component
                    && Self::in_scope(&workload.namespace, &workload.application, scope)
            })
            .cloned()
            .ok_or_else(|| {
                FetchError::NotFound {
                    kind: "workload",
                    name: component.to_string(),
                }
                .into()
            })
    }

    async fn get_secret(&self, scope: &SessionScope, name: &str) -> Result<Secret> {
        self.snapshot
            .secrets
            .iter()
            .find(|secret| secret.name == name && secret.namespace == scope.namespace)
            .cloned()
            .ok_or_else(|| {
                FetchError::NotFound {
                    kind: "secret",
                    name: name.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompletionError;

    const SNAPSHOT: &str = r#"{
        "service_classes": [
            {"external_name": "mysql-persistent", "reference": "c1"}
        ],
        "service_plans": [
            {"external_name": "default", "class_reference": "c1", "parameters": ["MYSQL_USER"]},
            {"external_name": "other", "class_reference": "c2"}
        ],
        "service_instances": [
            {"name": "db", "namespace": "project", "application": "app",
             "class_name": "mysql-persistent", "plan_name": "default",
             "status": "ProvisionedSuccessfully"},
            {"name": "elsewhere", "namespace": "project", "application": "other-app",
             "class_name": "mysql-persistent", "plan_name": "default",
             "status": "Provisioning"}
        ],
        "workloads": [
            {"name": "frontend-app", "namespace": "project", "application": "app",
             "component": "frontend", "secret_refs": ["db"]}
        ],
        "secrets": [
            {"name": "db", "namespace": "project"}
        ]
    }"#;

    fn scope() -> SessionScope {
        SessionScope::new("project", "app", "frontend")
    }

    fn client() -> SnapshotClient {
        SnapshotClient::new(ClusterSnapshot::from_json(SNAPSHOT).unwrap())
    }

    #[test]
    fn test_plans_filtered_by_class() {
        let plans = tokio_test::block_on(client().list_service_plans("c1")).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].external_name, "default");
    }

    #[test]
    fn test_instances_scoped_to_application() {
        let instances = tokio_test::block_on(client().list_service_instances(&scope())).unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].name, "db");
        assert!(instances[0].status.is_provisioned());
    }

    #[test]
    fn test_get_workload_by_component() {
        let workload = tokio_test::block_on(client().get_workload(&scope(), "frontend")).unwrap();
        assert_eq!(workload.name, "frontend-app");
        assert_eq!(workload.secret_refs, vec!["db".to_string()]);
    }

    #[test]
    fn test_missing_secret_is_not_found() {
        let err = tokio_test::block_on(client().get_secret(&scope(), "nope")).unwrap_err();
        assert!(matches!(
            err,
            CompletionError::Fetch(FetchError::NotFound { kind: "secret", .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClusterSnapshot::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CompletionError::Config(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ClusterSnapshot::from_json("{not json"),
            Err(CompletionError::Json(_))
        ));
    }
}
