//! Cluster resource model and fetch adapter interface
//!
//! The completion engine never talks to a cluster directly. It reads through
//! the [`ClusterClient`] trait, which lists and gets the handful of resource
//! kinds completion needs:
//!
//! - service classes and their plans (the catalog)
//! - provisioned service instances
//! - deployed workloads (components)
//! - secrets referenced by workloads
//!
//! [`ResourceFetcher`] wraps a client with a per-call timeout and turns every
//! failure into "no data". [`SnapshotClient`] is a client backed by a JSON
//! snapshot of cluster state.

mod fetch;
mod snapshot;

pub use fetch::ResourceFetcher;
pub use snapshot::{ClusterSnapshot, SnapshotClient};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Scope every listing is made against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScope {
    /// Active namespace (project)
    pub namespace: String,
    /// Active application name
    pub application: String,
    /// Component the command operates on
    pub component: String,
}

impl SessionScope {
    pub fn new(
        namespace: impl Into<String>,
        application: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            application: application.into(),
            component: component.into(),
        }
    }
}

/// Catalog entry describing an offerable backing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceClass {
    /// User-facing name, the completion string
    pub external_name: String,
    /// Internal reference id plans point at
    pub reference: String,
    /// Parameter keys every plan of this class accepts
    #[serde(default)]
    pub default_parameters: Vec<String>,
}

/// A tier of a service class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePlan {
    pub external_name: String,
    /// Reference id of the owning [`ServiceClass`]
    pub class_reference: String,
    /// Declared parameter keys, in declaration order
    #[serde(default)]
    pub parameters: Vec<String>,
}

/// Provisioning state of a service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProvisionStatus {
    Pending,
    Provisioned,
    Failed,
    Other(String),
}

impl ProvisionStatus {
    /// Map a backend condition reason to a status.
    pub fn from_reason(reason: &str) -> Self {
        match reason {
            "ProvisionedSuccessfully" => ProvisionStatus::Provisioned,
            "Provisioning" | "ProvisionRequestInFlight" => ProvisionStatus::Pending,
            r if r.contains("Failed") || r.contains("Error") => ProvisionStatus::Failed,
            other => ProvisionStatus::Other(other.to_string()),
        }
    }

    /// The condition reason this status was read from.
    pub fn as_reason(&self) -> &str {
        match self {
            ProvisionStatus::Pending => "Provisioning",
            ProvisionStatus::Provisioned => "ProvisionedSuccessfully",
            ProvisionStatus::Failed => "ProvisionCallFailed",
            ProvisionStatus::Other(reason) => reason,
        }
    }

    pub fn is_provisioned(&self) -> bool {
        matches!(self, ProvisionStatus::Provisioned)
    }
}

impl From<String> for ProvisionStatus {
    fn from(reason: String) -> Self {
        ProvisionStatus::from_reason(&reason)
    }
}

impl From<ProvisionStatus> for String {
    fn from(status: ProvisionStatus) -> Self {
        status.as_reason().to_string()
    }
}

/// A provisioned binding of a service class and plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub name: String,
    pub namespace: String,
    pub application: String,
    pub class_name: String,
    pub plan_name: String,
    pub status: ProvisionStatus,
}

/// A deployed component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// Resource name, e.g. `backend-app`
    pub name: String,
    pub namespace: String,
    pub application: String,
    /// Component label, the user-facing name
    pub component: String,
    #[serde(default)]
    pub component_type: String,
    /// All replicas available; a snapshot without the field counts as ready
    #[serde(default = "default_ready")]
    pub ready: bool,
    /// Names of secrets injected into the environment
    #[serde(default)]
    pub secret_refs: Vec<String>,
}

fn default_ready() -> bool {
    true
}

/// A secret a workload may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub name: String,
    pub namespace: String,
    /// Component that exposes this secret, when labelled
    #[serde(default)]
    pub component: Option<String>,
}

/// Read interface to the cluster.
///
/// Every call may fail. Callers go through [`ResourceFetcher`], which bounds
/// each call with a timeout and maps failures to empty results.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// List the service catalog
    async fn list_service_classes(&self) -> Result<Vec<ServiceClass>>;

    /// List plans owned by the class with the given reference id
    async fn list_service_plans(&self, class_reference: &str) -> Result<Vec<ServicePlan>>;

    /// List service instances in scope
    async fn list_service_instances(&self, scope: &SessionScope) -> Result<Vec<ServiceInstance>>;

    /// List workloads in scope
    async fn list_workloads(&self, scope: &SessionScope) -> Result<Vec<Workload>>;

    /// Get the workload of a component
    async fn get_workload(&self, scope: &SessionScope, component: &str) -> Result<Workload>;

    /// Get a secret by name
    async fn get_secret(&self, scope: &SessionScope, name: &str) -> Result<Secret>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_reason() {
        assert_eq!(
            ProvisionStatus::from_reason("ProvisionedSuccessfully"),
            ProvisionStatus::Provisioned
        );
        assert_eq!(
            ProvisionStatus::from_reason("Provisioning"),
            ProvisionStatus::Pending
        );
        assert_eq!(
            ProvisionStatus::from_reason("ProvisionCallFailed"),
            ProvisionStatus::Failed
        );
        assert_eq!(
            ProvisionStatus::from_reason("Deprovisioning"),
            ProvisionStatus::Other("Deprovisioning".to_string())
        );
    }

    #[test]
    fn test_status_serde_uses_reason() {
        let json = serde_json::to_string(&ProvisionStatus::Provisioned).unwrap();
        assert_eq!(json, "\"ProvisionedSuccessfully\"");

        let status: ProvisionStatus = serde_json::from_str("\"Provisioning\"").unwrap();
        assert_eq!(status, ProvisionStatus::Pending);
        assert!(!status.is_provisioned());
    }

    #[test]
    fn test_workload_defaults() {
        let workload: Workload = serde_json::from_str(
            r#"{"name":"backend-app","namespace":"project","application":"app","component":"backend"}"#,
        )
        .unwrap();
        assert!(workload.ready);
        assert!(workload.secret_refs.is_empty());
        assert_eq!(workload.component_type, "");
    }
}
