use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::env::EnvConfig;
use crate::errors::{Error, Result};
use crate::API_KEY_HEADER;

/// An API key for the ModelZ control plane.
///
/// Keys are attached to every request as the `X-API-Key` header. A client
/// cannot be constructed without one; there are no anonymous clients.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(Error::AuthConfig("API key must not be empty".to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolves the key to use: explicit configuration first, then the
    /// injected environment fallback. Blank values count as absent.
    pub fn resolve(explicit: Option<&str>, env: &EnvConfig) -> Result<Self> {
        let candidate = explicit
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .or(env.api_key.as_deref());
        match candidate {
            Some(key) => Self::parse(key),
            None => Err(Error::AuthConfig(
                "set `api_key` in the config or export MODELZ_API_KEY".to_string(),
            )),
        }
    }

    /// Injects the `X-API-Key` header. Bodies are never touched.
    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<()> {
        let value = HeaderValue::from_str(&self.0)
            .map_err(|err| Error::Config(format!("API key is not a valid header value: {err}")))?;
        headers.insert(API_KEY_HEADER, value);
        Ok(())
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
