use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::core::{ops, ClientCore, Config, Operation};
use crate::errors::{Error, Result, TransportError, TransportErrorKind};
use crate::inference::InferenceResponse;
use crate::models::{
    Deployment, DeploymentListResponse, DeploymentSpec, TeamSpec, TeamUpdateRequest,
};
use crate::request::RequestDescriptor;
use crate::response::{classify, ensure_status, RawResponse, Response};
use crate::wire::Payload;

/// Blocking client for the ModelZ control plane.
///
/// Same configuration, same endpoints, same observable behavior as
/// [`Client`]; calls occupy the calling thread until the transport returns.
///
/// [`Client`]: crate::Client
#[derive(Clone)]
pub struct BlockingClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    core: ClientCore,
    http: HttpClient,
}

impl BlockingClient {
    pub fn new(cfg: Config) -> Result<Self> {
        let core = ClientCore::new(cfg)?;
        let http = HttpClient::builder()
            .connect_timeout(core.connect_timeout)
            .build()
            .map_err(|err| TransportError {
                kind: TransportErrorKind::Connect,
                message: "failed to build http client".to_string(),
                source: Some(err),
            })?;
        Ok(Self {
            inner: Arc::new(ClientInner { core, http }),
        })
    }

    /// Builds a client on an injected blocking transport.
    pub fn with_http_client(cfg: Config, http: HttpClient) -> Result<Self> {
        let core = ClientCore::new(cfg)?;
        Ok(Self {
            inner: Arc::new(ClientInner { core, http }),
        })
    }

    pub fn deployments(&self) -> BlockingDeploymentsClient {
        BlockingDeploymentsClient {
            inner: self.inner.clone(),
        }
    }

    pub fn teams(&self) -> BlockingTeamsClient {
        BlockingTeamsClient {
            inner: self.inner.clone(),
        }
    }

    /// Runs inference against the project's serving endpoint.
    pub fn inference(
        &self,
        params: Payload,
        timeout: Option<Duration>,
    ) -> Result<InferenceResponse> {
        let desc =
            self.inner
                .core
                .descriptor_with_payload(&ops::INFERENCE, &[], &params, timeout)?;
        let raw = self.inner.send(desc)?;
        ensure_status(&raw, &ops::INFERENCE.policy)?;
        Ok(InferenceResponse::new(
            raw.status,
            raw.headers,
            raw.body,
            self.inner.core.format,
        ))
    }

    /// Fetches the project's serving metrics as plain text.
    pub fn metrics(&self, timeout: Option<Duration>) -> Result<String> {
        let desc = self.inner.core.descriptor(&ops::METRICS, &[], timeout)?;
        let raw = self.inner.send(desc)?;
        ensure_status(&raw, &ops::METRICS.policy)?;
        Ok(String::from_utf8_lossy(&raw.body).into_owned())
    }
}

/// Deployment operations on a user's cluster.
#[derive(Clone)]
pub struct BlockingDeploymentsClient {
    inner: Arc<ClientInner>,
}

impl BlockingDeploymentsClient {
    /// List the deployments.
    pub fn list_detailed(
        &self,
        login_name: &str,
        cluster_id: &str,
    ) -> Result<Response<DeploymentListResponse>> {
        if login_name.trim().is_empty() {
            return Err(Error::Config("login_name is required".into()));
        }
        if cluster_id.trim().is_empty() {
            return Err(Error::Config("cluster_id is required".into()));
        }
        self.inner.execute(
            &ops::DEPLOYMENTS_LIST,
            &[("login_name", login_name), ("cluster_id", cluster_id)],
        )
    }

    /// List the deployments, keeping only the decoded value.
    pub fn list(
        &self,
        login_name: &str,
        cluster_id: &str,
    ) -> Result<Option<DeploymentListResponse>> {
        Ok(self.list_detailed(login_name, cluster_id)?.into_parsed())
    }

    /// Get one deployment.
    pub fn get_detailed(
        &self,
        login_name: &str,
        cluster_id: &str,
        deployment_id: Uuid,
    ) -> Result<Response<Deployment>> {
        if login_name.trim().is_empty() {
            return Err(Error::Config("login_name is required".into()));
        }
        if cluster_id.trim().is_empty() {
            return Err(Error::Config("cluster_id is required".into()));
        }
        let id = deployment_id.to_string();
        self.inner.execute(
            &ops::DEPLOYMENTS_GET,
            &[
                ("login_name", login_name),
                ("cluster_id", cluster_id),
                ("deployment_id", &id),
            ],
        )
    }

    pub fn get(
        &self,
        login_name: &str,
        cluster_id: &str,
        deployment_id: Uuid,
    ) -> Result<Option<Deployment>> {
        Ok(self
            .get_detailed(login_name, cluster_id, deployment_id)?
            .into_parsed())
    }

    /// Create a deployment on the cluster.
    pub fn create_detailed(
        &self,
        login_name: &str,
        cluster_id: &str,
        spec: &DeploymentSpec,
    ) -> Result<Response<Deployment>> {
        if login_name.trim().is_empty() {
            return Err(Error::Config("login_name is required".into()));
        }
        if cluster_id.trim().is_empty() {
            return Err(Error::Config("cluster_id is required".into()));
        }
        if spec.name.trim().is_empty() {
            return Err(Error::Config("deployment name is required".into()));
        }
        if spec.image.trim().is_empty() {
            return Err(Error::Config("deployment image is required".into()));
        }
        self.inner.execute_with_body(
            &ops::DEPLOYMENTS_CREATE,
            &[("login_name", login_name), ("cluster_id", cluster_id)],
            spec,
        )
    }

    pub fn create(
        &self,
        login_name: &str,
        cluster_id: &str,
        spec: &DeploymentSpec,
    ) -> Result<Option<Deployment>> {
        Ok(self
            .create_detailed(login_name, cluster_id, spec)?
            .into_parsed())
    }
}

/// Team operations.
#[derive(Clone)]
pub struct BlockingTeamsClient {
    inner: Arc<ClientInner>,
}

impl BlockingTeamsClient {
    /// Get the team.
    pub fn get_detailed(&self, login_name: &str, name: &str) -> Result<Response<TeamSpec>> {
        if login_name.trim().is_empty() {
            return Err(Error::Config("login_name is required".into()));
        }
        if name.trim().is_empty() {
            return Err(Error::Config("team name is required".into()));
        }
        self.inner.execute(
            &ops::TEAMS_GET,
            &[("login_name", login_name), ("name", name)],
        )
    }

    pub fn get(&self, login_name: &str, name: &str) -> Result<Option<TeamSpec>> {
        Ok(self.get_detailed(login_name, name)?.into_parsed())
    }

    /// Update the team.
    pub fn update_detailed(
        &self,
        login_name: &str,
        name: &str,
        req: &TeamUpdateRequest,
    ) -> Result<Response<TeamSpec>> {
        if login_name.trim().is_empty() {
            return Err(Error::Config("login_name is required".into()));
        }
        if name.trim().is_empty() {
            return Err(Error::Config("team name is required".into()));
        }
        self.inner.execute_with_body(
            &ops::TEAMS_UPDATE,
            &[("login_name", login_name), ("name", name)],
            req,
        )
    }

    pub fn update(
        &self,
        login_name: &str,
        name: &str,
        req: &TeamUpdateRequest,
    ) -> Result<Option<TeamSpec>> {
        Ok(self.update_detailed(login_name, name, req)?.into_parsed())
    }
}

impl ClientInner {
    fn execute<T: DeserializeOwned>(
        &self,
        op: &Operation,
        params: &[(&str, &str)],
    ) -> Result<Response<T>> {
        let desc = self.core.descriptor(op, params, None)?;
        let raw = self.send(desc)?;
        classify(
            &raw,
            op.policy,
            self.core.format,
            self.core.raise_on_unexpected_status,
        )
    }

    fn execute_with_body<B: Serialize, T: DeserializeOwned>(
        &self,
        op: &Operation,
        params: &[(&str, &str)],
        body: &B,
    ) -> Result<Response<T>> {
        let desc = self.core.descriptor_with_value(op, params, body, None)?;
        let raw = self.send(desc)?;
        classify(
            &raw,
            op.policy,
            self.core.format,
            self.core.raise_on_unexpected_status,
        )
    }

    fn send(&self, desc: RequestDescriptor) -> Result<RawResponse> {
        let RequestDescriptor {
            method,
            url,
            headers,
            body,
            timeout,
        } = desc;
        let timeout = self.core.effective_timeout(timeout);
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let resp = match builder.send() {
            Ok(resp) => resp,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(method = %method, url = %url, error = %err, "transport error");
                return Err(TransportError::from_reqwest(err).into());
            }
        };

        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let body = resp
            .bytes()
            .map_err(|err| Error::from(TransportError::from_reqwest(err)))?;

        #[cfg(feature = "tracing")]
        if status.is_success() {
            tracing::debug!(method = %method, url = %url, status = %status, "request completed");
        } else {
            tracing::warn!(method = %method, url = %url, status = %status, "non-success status");
        }

        Ok(RawResponse {
            status,
            headers: resp_headers,
            body,
        })
    }
}
