//! Shared runtime-agnostic logic for the async and blocking clients.
//!
//! Both surfaces resolve their configuration into a [`ClientCore`] and build
//! every request through it. The only code that differs between the surfaces
//! is the transport send; everything observable (URLs, headers, encoded
//! bodies, status handling) is decided here.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;

use crate::auth::ApiKey;
use crate::env::EnvConfig;
use crate::errors::{Error, Result};
use crate::request::{resolve_template, RequestDescriptor};
use crate::response::StatusPolicy;
use crate::wire::{Payload, WireFormat};
use crate::{
    CLIENT_HEADER, DEFAULT_CLIENT_HEADER, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST,
    DEFAULT_REQUEST_TIMEOUT,
};

/// Client configuration shared by the async and blocking surfaces.
///
/// Unset fields fall back to the injected [`EnvConfig`] and then to the
/// defaults in the crate root. The configuration is resolved once, at client
/// construction; clients never re-read it.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Project whose endpoints this client talks to.
    pub project: String,
    /// Host override. Defaults to `https://{project}.modelz.io`; a `{project}`
    /// placeholder is resolved through the path template engine.
    pub host: Option<String>,
    /// API key. Falls back to `env.api_key` (`MODELZ_API_KEY`).
    pub api_key: Option<String>,
    /// Environment fallbacks, read once via [`EnvConfig::from_env`].
    pub env: EnvConfig,
    /// Wire format applied to request and response bodies.
    pub format: WireFormat,
    /// When set, an unexpected status on a resource endpoint is an error
    /// instead of an explicit absence.
    pub raise_on_unexpected_status: bool,
    /// Override the connect timeout (defaults to 5s).
    pub connect_timeout: Option<Duration>,
    /// Override the request timeout (defaults to 30s).
    pub timeout: Option<Duration>,
    /// Override the `X-ModelZ-Client` header value.
    pub client_header: Option<String>,
}

impl Config {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            ..Self::default()
        }
    }

    /// Installs environment fallbacks. Explicit fields always win.
    pub fn apply_env(mut self, env: EnvConfig) -> Self {
        self.env = env;
        self
    }
}

/// A resource endpoint: method, path template, and the statuses it accepts.
#[derive(Debug, Clone)]
pub(crate) struct Operation {
    pub(crate) method: Method,
    pub(crate) path: &'static str,
    pub(crate) policy: StatusPolicy,
}

/// Endpoint table. Every call on either surface goes through one of these.
pub(crate) mod ops {
    use super::{Method, Operation, StatusCode, StatusPolicy};

    pub(crate) const INFERENCE: Operation = Operation {
        method: Method::POST,
        path: "/api/v1/mosec/{project}/inference",
        policy: StatusPolicy::Exact(StatusCode::OK),
    };

    pub(crate) const METRICS: Operation = Operation {
        method: Method::GET,
        path: "/api/v1/mosec/{project}/metrics",
        policy: StatusPolicy::Exact(StatusCode::OK),
    };

    pub(crate) const DEPLOYMENTS_LIST: Operation = Operation {
        method: Method::GET,
        path: "/users/{login_name}/clusters/{cluster_id}/deployments",
        policy: StatusPolicy::Mapped(&[StatusCode::OK]),
    };

    pub(crate) const DEPLOYMENTS_GET: Operation = Operation {
        method: Method::GET,
        path: "/users/{login_name}/clusters/{cluster_id}/deployments/{deployment_id}",
        policy: StatusPolicy::Mapped(&[StatusCode::OK]),
    };

    pub(crate) const DEPLOYMENTS_CREATE: Operation = Operation {
        method: Method::POST,
        path: "/users/{login_name}/clusters/{cluster_id}/deployments",
        policy: StatusPolicy::Mapped(&[StatusCode::OK, StatusCode::CREATED]),
    };

    pub(crate) const TEAMS_GET: Operation = Operation {
        method: Method::GET,
        path: "/users/{login_name}/teams/{name}",
        policy: StatusPolicy::Mapped(&[StatusCode::OK]),
    };

    pub(crate) const TEAMS_UPDATE: Operation = Operation {
        method: Method::PUT,
        path: "/users/{login_name}/teams/{name}",
        policy: StatusPolicy::Mapped(&[StatusCode::OK]),
    };
}

/// Resolved, immutable state shared by both surfaces.
pub(crate) struct ClientCore {
    pub(crate) base_url: Url,
    pub(crate) project: String,
    pub(crate) api_key: ApiKey,
    pub(crate) format: WireFormat,
    pub(crate) raise_on_unexpected_status: bool,
    pub(crate) connect_timeout: Duration,
    pub(crate) request_timeout: Duration,
    pub(crate) client_header: String,
}

impl ClientCore {
    pub(crate) fn new(cfg: Config) -> Result<Self> {
        let project = cfg.project.trim().to_string();
        if project.is_empty() {
            return Err(Error::Config("project is required".to_string()));
        }

        let host_source = cfg
            .host
            .or_else(|| cfg.env.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = resolve_template(
            host_source.trim_end_matches('/'),
            &[("project", project.as_str())],
        )?;
        let base_url =
            Url::parse(&host).map_err(|err| Error::Config(format!("invalid host: {err}")))?;

        let api_key = ApiKey::resolve(cfg.api_key.as_deref(), &cfg.env)?;

        let client_header = cfg
            .client_header
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CLIENT_HEADER.to_string());

        Ok(Self {
            base_url,
            project,
            api_key,
            format: cfg.format,
            raise_on_unexpected_status: cfg.raise_on_unexpected_status,
            connect_timeout: cfg.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            request_timeout: cfg.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            client_header,
        })
    }

    /// Descriptor for a body-less call.
    pub(crate) fn descriptor(
        &self,
        op: &Operation,
        params: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<RequestDescriptor> {
        self.build(op, params, None, timeout)
    }

    /// Descriptor for a call with a typed body, encoded under the active
    /// wire format.
    pub(crate) fn descriptor_with_value<T: Serialize>(
        &self,
        op: &Operation,
        params: &[(&str, &str)],
        body: &T,
        timeout: Option<Duration>,
    ) -> Result<RequestDescriptor> {
        let encoded = self.format.encode_value(body)?;
        self.build(op, params, Some(encoded), timeout)
    }

    /// Descriptor for a call with a [`Payload`] body (the inference surface).
    pub(crate) fn descriptor_with_payload(
        &self,
        op: &Operation,
        params: &[(&str, &str)],
        payload: &Payload,
        timeout: Option<Duration>,
    ) -> Result<RequestDescriptor> {
        let encoded = self.format.encode(payload)?;
        self.build(op, params, Some(encoded), timeout)
    }

    fn build(
        &self,
        op: &Operation,
        params: &[(&str, &str)],
        body: Option<Vec<u8>>,
        timeout: Option<Duration>,
    ) -> Result<RequestDescriptor> {
        // Caller parameters win; the client's project fills the rest.
        let mut all_params = params.to_vec();
        all_params.push(("project", self.project.as_str()));
        let path = resolve_template(op.path, &all_params)?;

        let url = self
            .base_url
            .join(&path)
            .map_err(|err| Error::Config(format!("invalid path: {err}")))?;

        let mut headers = HeaderMap::new();
        if let Some(accept) = self.format.accept() {
            headers.insert(ACCEPT, HeaderValue::from_static(accept));
        }
        let client_header = HeaderValue::from_str(&self.client_header)
            .map_err(|err| Error::Config(format!("invalid client header value: {err}")))?;
        headers.insert(CLIENT_HEADER, client_header);
        self.api_key.apply(&mut headers)?;
        if body.is_some() {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(self.format.content_type()),
            );
        }

        Ok(RequestDescriptor {
            method: op.method.clone(),
            url,
            headers,
            body,
            timeout,
        })
    }

    /// Timeout the transport should apply to one request.
    pub(crate) fn effective_timeout(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::API_KEY_HEADER;

    use super::*;

    fn config() -> Config {
        Config {
            project: "llama".to_string(),
            api_key: Some("mzi-abc123".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn default_host_substitutes_the_project() {
        let core = ClientCore::new(config()).unwrap();
        assert_eq!(core.base_url.as_str(), "https://llama.modelz.io/");
    }

    #[test]
    fn custom_host_passes_through_unchanged() {
        let mut cfg = config();
        cfg.host = Some("http://localhost:8080/".to_string());
        let core = ClientCore::new(cfg).unwrap();
        assert_eq!(core.base_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn custom_host_may_use_the_project_placeholder() {
        let mut cfg = config();
        cfg.host = Some("https://{project}.staging.modelz.io".to_string());
        let core = ClientCore::new(cfg).unwrap();
        assert_eq!(core.base_url.as_str(), "https://llama.staging.modelz.io/");
    }

    #[test]
    fn env_host_fills_the_gap() {
        let mut cfg = config();
        cfg.env = EnvConfig {
            api_key: None,
            host: Some("http://env-host:9000".to_string()),
        };
        let core = ClientCore::new(cfg).unwrap();
        assert_eq!(core.base_url.as_str(), "http://env-host:9000/");
    }

    #[test]
    fn blank_project_is_a_config_error() {
        let mut cfg = config();
        cfg.project = "  ".to_string();
        assert!(matches!(
            ClientCore::new(cfg),
            Err(Error::Config(message)) if message.contains("project")
        ));
    }

    #[test]
    fn missing_api_key_fails_at_construction() {
        let mut cfg = config();
        cfg.api_key = None;
        assert!(matches!(ClientCore::new(cfg), Err(Error::AuthConfig(_))));
    }

    #[test]
    fn descriptor_carries_auth_and_client_headers() {
        let core = ClientCore::new(config()).unwrap();
        let desc = core
            .descriptor(&ops::METRICS, &[], None)
            .unwrap();
        assert_eq!(desc.method, Method::GET);
        assert_eq!(
            desc.url.as_str(),
            "https://llama.modelz.io/api/v1/mosec/llama/metrics"
        );
        assert_eq!(desc.headers.get(API_KEY_HEADER).unwrap(), "mzi-abc123");
        assert_eq!(
            desc.headers.get(CLIENT_HEADER).unwrap(),
            DEFAULT_CLIENT_HEADER
        );
        assert!(desc.body.is_none());
        assert!(desc.headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn body_sets_the_matching_content_type() {
        let core = ClientCore::new(config()).unwrap();
        let payload = Payload::Value(json!({"x": 1}));
        let desc = core
            .descriptor_with_payload(&ops::INFERENCE, &[], &payload, None)
            .unwrap();
        assert_eq!(desc.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(desc.body.as_deref(), Some(br#"{"x":1}"#.as_slice()));

        let mut cfg = config();
        cfg.format = WireFormat::Msgpack;
        let core = ClientCore::new(cfg).unwrap();
        let desc = core
            .descriptor_with_payload(&ops::INFERENCE, &[], &payload, None)
            .unwrap();
        assert_eq!(
            desc.headers.get(CONTENT_TYPE).unwrap(),
            "application/msgpack"
        );
        let body = desc.body.unwrap();
        assert_eq!(WireFormat::Msgpack.decode(&body).unwrap(), payload);
    }

    #[test]
    fn identical_inputs_build_identical_descriptors() {
        let core = ClientCore::new(config()).unwrap();
        let params = [("login_name", "ada"), ("cluster_id", "c-7")];
        let first = core
            .descriptor(&ops::DEPLOYMENTS_LIST, &params, Some(Duration::from_secs(9)))
            .unwrap();
        let second = core
            .descriptor(&ops::DEPLOYMENTS_LIST, &params, Some(Duration::from_secs(9)))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_path_parameter_fails_before_any_network_use() {
        let core = ClientCore::new(config()).unwrap();
        let err = core
            .descriptor(&ops::DEPLOYMENTS_LIST, &[("login_name", "ada")], None)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Template(err) if err.name == "cluster_id"
        ));
    }

    #[test]
    fn per_call_timeout_overrides_the_default() {
        let core = ClientCore::new(config()).unwrap();
        assert_eq!(core.effective_timeout(None), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(
            core.effective_timeout(Some(Duration::from_secs(3))),
            Duration::from_secs(3)
        );
    }
}
