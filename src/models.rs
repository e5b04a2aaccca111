//! Wire models for the deployment and team endpoints.
//!
//! Fixed-shape serde structs, pure data. Timestamps travel as RFC 3339
//! strings; identifiers as UUID strings. Unknown deployment statuses are
//! preserved rather than rejected so newer control planes keep decoding.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Lifecycle state of a deployment, with an escape hatch for states this
/// SDK predates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeploymentStatus {
    Pending,
    Running,
    Scaling,
    Stopped,
    Failed,
    Other(String),
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::Running => "running",
            DeploymentStatus::Scaling => "scaling",
            DeploymentStatus::Stopped => "stopped",
            DeploymentStatus::Failed => "failed",
            DeploymentStatus::Other(other) => other.as_str(),
        }
    }
}

impl From<&str> for DeploymentStatus {
    fn from(value: &str) -> Self {
        DeploymentStatus::from(value.to_string())
    }
}

impl From<String> for DeploymentStatus {
    fn from(value: String) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "pending" => DeploymentStatus::Pending,
            "running" => DeploymentStatus::Running,
            "scaling" => DeploymentStatus::Scaling,
            "stopped" => DeploymentStatus::Stopped,
            "failed" => DeploymentStatus::Failed,
            other => DeploymentStatus::Other(other.to_string()),
        }
    }
}

impl From<DeploymentStatus> for String {
    fn from(value: DeploymentStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A deployment running on a cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deployment {
    pub id: Uuid,
    pub name: String,
    pub status: DeploymentStatus,
    pub image: String,
    pub replicas: u32,
    /// Public inference endpoint, absent until the deployment is reachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(rename = "created_at", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(
        default,
        rename = "updated_at",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

/// Request payload for creating a deployment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DeploymentSpec {
    pub name: String,
    pub image: String,
    pub replicas: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

/// Envelope for `GET .../deployments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentListResponse {
    pub deployments: Vec<Deployment>,
}

/// A team a user belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(
        default,
        rename = "created_at",
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
}

/// Request payload for `PUT /users/{login_name}/teams/{name}`.
///
/// Unset fields are omitted on the wire and left untouched by the server.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TeamUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}
