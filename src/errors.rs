use std::fmt;

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

use crate::wire::WireFormat;

/// Convenience alias for fallible SDK results.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Bodies longer than this are truncated in error messages.
const BODY_DISPLAY_LIMIT: usize = 256;

fn body_for_display(body: &Bytes) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= BODY_DISPLAY_LIMIT {
        return text.into_owned();
    }
    // Back off to a char boundary so multibyte content cannot split.
    let mut end = BODY_DISPLAY_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes total)", &text[..end], body.len())
}

/// A path template referenced a parameter the caller did not supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateError {
    pub template: String,
    pub name: String,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "missing value for parameter `{}` in template `{}`",
            self.name, self.template
        )
    }
}

impl std::error::Error for TemplateError {}

/// A response body that could not be decoded under the configured wire format.
///
/// The offending bytes are preserved on the error for diagnostics.
#[derive(Debug, Clone)]
pub struct DecodeError {
    pub format: WireFormat,
    pub message: String,
    pub body: Bytes,
}

impl DecodeError {
    pub fn new(format: WireFormat, message: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            format,
            message: message.into(),
            body: body.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} payload: {}", self.format, self.message)
    }
}

impl std::error::Error for DecodeError {}

/// The server answered with a status code the endpoint's policy does not accept.
///
/// The raw body is kept verbatim; `Display` includes it so the server's own
/// diagnostics are never lost.
#[derive(Debug, Clone)]
pub struct UnexpectedStatus {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UnexpectedStatus {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response body decoded as lossy UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl fmt::Display for UnexpectedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "unexpected status {}", self.status)
        } else {
            write!(
                f,
                "unexpected status {}: {}",
                self.status,
                body_for_display(&self.body)
            )
        }
    }
}

impl std::error::Error for UnexpectedStatus {}

/// Transport-level error (timeouts, DNS/TLS/connectivity).
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    #[source]
    pub source: Option<reqwest::Error>,
}

impl TransportError {
    /// Classifies a reqwest failure into a broad transport kind.
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_request() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };

        TransportError {
            kind,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Broad transport error kinds for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Request,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Other => "transport",
        };
        write!(f, "{label}")
    }
}

/// Unified error type surfaced by the SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid client configuration (bad host, bad header value, missing project).
    #[error("configuration error: {0}")]
    Config(String),

    /// No API key was found in the configuration or the environment.
    #[error("cannot find the API key: {0}")]
    AuthConfig(String),

    #[error("{0}")]
    Template(#[from] TemplateError),

    /// The request body cannot be represented in the configured wire format.
    #[error("cannot encode {format} request: {message}")]
    Encode {
        format: WireFormat,
        message: String,
    },

    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("{0}")]
    UnexpectedStatus(#[from] UnexpectedStatus),

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_error_names_the_parameter() {
        let err = TemplateError {
            template: "/users/{login_name}/teams/{name}".to_string(),
            name: "login_name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "missing value for parameter `login_name` in template `/users/{login_name}/teams/{name}`"
        );
    }

    #[test]
    fn unexpected_status_display_includes_body() {
        let err = UnexpectedStatus::new(StatusCode::INTERNAL_SERVER_ERROR, "boom".as_bytes());
        assert_eq!(err.to_string(), "unexpected status 500 Internal Server Error: boom");
        assert_eq!(err.body_text(), "boom");
    }

    #[test]
    fn unexpected_status_truncates_long_bodies() {
        let body = "x".repeat(1024);
        let err = UnexpectedStatus::new(StatusCode::BAD_GATEWAY, body.into_bytes());
        let rendered = err.to_string();
        assert!(rendered.contains("... (1024 bytes total)"));
        assert!(rendered.len() < 1024);
    }

    #[test]
    fn decode_error_keeps_offending_bytes() {
        let err = DecodeError::new(WireFormat::Json, "expected value", "not json".as_bytes());
        assert_eq!(err.body, Bytes::from_static(b"not json"));
        assert_eq!(err.to_string(), "invalid json payload: expected value");
    }
}
