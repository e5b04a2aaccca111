//! Rust SDK for the ModelZ machine learning platform.
#![cfg_attr(docsrs, feature(doc_cfg))]
// Allow large error types - refactoring to Box<Error> would be a breaking change
#![allow(clippy::result_large_err)]

/// Default host template; `{project}` is resolved from the client's project.
pub const DEFAULT_HOST: &str = "https://{project}.modelz.io";

/// Default SDK identification header value.
pub(crate) const DEFAULT_CLIENT_HEADER: &str = concat!("modelz-rust/", env!("CARGO_PKG_VERSION"));

/// Default connection timeout (5 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Default request timeout (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// HTTP header name for API key authentication.
pub(crate) const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP header name identifying the SDK.
pub(crate) const CLIENT_HEADER: &str = "X-ModelZ-Client";

mod auth;
#[cfg(feature = "blocking")]
mod blocking;
mod client;
mod core;
mod env;
mod errors;
mod inference;
mod models;
mod request;
mod response;
mod wire;

pub use auth::ApiKey;
#[cfg(feature = "blocking")]
pub use blocking::{BlockingClient, BlockingDeploymentsClient, BlockingTeamsClient};
pub use client::{Client, DeploymentsClient, TeamsClient};
pub use self::core::Config;
pub use env::{EnvConfig, ENV_PREFIX};
pub use errors::{
    DecodeError, Error, Result, TemplateError, TransportError, TransportErrorKind,
    UnexpectedStatus,
};
pub use inference::InferenceResponse;
pub use models::{
    Deployment, DeploymentListResponse, DeploymentSpec, DeploymentStatus, TeamSpec,
    TeamUpdateRequest,
};
pub use request::{resolve_template, RequestDescriptor};
pub use response::{classify, RawResponse, Response, StatusPolicy};
pub use wire::{Payload, WireFormat};
