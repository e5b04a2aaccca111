//! Status classification and the typed response envelope.
//!
//! The classifier is a pure function from a [`RawResponse`] plus an
//! endpoint's [`StatusPolicy`] to a typed outcome: a decoded value, an
//! explicit absence, or an error. It never touches the network and never
//! mutates the raw response.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::errors::{Result, UnexpectedStatus};
use crate::wire::WireFormat;

/// A wire response before classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Which status codes an endpoint accepts, and what the rest mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Documented success codes for a resource endpoint. Any other status is
    /// "unexpected": the client's `raise_on_unexpected_status` flag decides
    /// between an error and an explicit absence.
    Mapped(&'static [StatusCode]),
    /// Exactly one acceptable code. Any other status errors regardless of
    /// the strictness flag.
    Exact(StatusCode),
}

impl StatusPolicy {
    pub fn accepts(&self, status: StatusCode) -> bool {
        match self {
            StatusPolicy::Mapped(table) => table.contains(&status),
            StatusPolicy::Exact(code) => *code == status,
        }
    }
}

/// Classified response envelope: wire-level facts plus the decoded value.
///
/// The raw body is kept alongside `parsed` so callers can always reach the
/// exact bytes the server sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub content: Bytes,
    /// Decoded value; absent only when a lenient client saw an unexpected
    /// status.
    pub parsed: Option<T>,
}

impl<T> Response<T> {
    /// Projection used by the plain call variants.
    pub fn into_parsed(self) -> Option<T> {
        self.parsed
    }
}

/// Classifies a raw response under an endpoint's status policy.
///
/// An accepted status decodes the body under `format`; a decode failure is
/// surfaced as-is, never as a partial value. An unexpected status either
/// errors ([`UnexpectedStatus`], with the body preserved) or, for a lenient
/// client under a `Mapped` policy, yields an envelope with `parsed: None`.
pub fn classify<T: DeserializeOwned>(
    raw: &RawResponse,
    policy: StatusPolicy,
    format: WireFormat,
    raise_on_unexpected_status: bool,
) -> Result<Response<T>> {
    if policy.accepts(raw.status) {
        let parsed = format.decode_as::<T>(&raw.body)?;
        return Ok(Response {
            status: raw.status,
            headers: raw.headers.clone(),
            content: raw.body.clone(),
            parsed: Some(parsed),
        });
    }

    let strict = raise_on_unexpected_status || matches!(policy, StatusPolicy::Exact(_));
    if strict {
        return Err(UnexpectedStatus::new(raw.status, raw.body.clone()).into());
    }

    Ok(Response {
        status: raw.status,
        headers: raw.headers.clone(),
        content: raw.body.clone(),
        parsed: None,
    })
}

/// Hard status check for the hand-written surfaces (inference, metrics).
/// Errors on any status the policy rejects, lenient flag or not.
pub(crate) fn ensure_status(raw: &RawResponse, policy: &StatusPolicy) -> Result<()> {
    if policy.accepts(raw.status) {
        Ok(())
    } else {
        Err(UnexpectedStatus::new(raw.status, raw.body.clone()).into())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use crate::errors::Error;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Widget {
        name: String,
    }

    fn raw(status: StatusCode, body: &[u8]) -> RawResponse {
        RawResponse {
            status,
            headers: HeaderMap::new(),
            body: Bytes::copy_from_slice(body),
        }
    }

    const OK_ONLY: StatusPolicy = StatusPolicy::Mapped(&[StatusCode::OK]);
    const OK_OR_CREATED: StatusPolicy =
        StatusPolicy::Mapped(&[StatusCode::OK, StatusCode::CREATED]);

    #[test]
    fn accepted_status_decodes_the_body() {
        let resp = classify::<Widget>(
            &raw(StatusCode::OK, br#"{"name":"resnet"}"#),
            OK_ONLY,
            WireFormat::Json,
            false,
        )
        .unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(
            resp.parsed,
            Some(Widget {
                name: "resnet".to_string()
            })
        );
        assert_eq!(&resp.content[..], br#"{"name":"resnet"}"#);
    }

    #[test]
    fn every_code_in_the_table_is_accepted() {
        let resp = classify::<Widget>(
            &raw(StatusCode::CREATED, br#"{"name":"resnet"}"#),
            OK_OR_CREATED,
            WireFormat::Json,
            true,
        )
        .unwrap();
        assert!(resp.parsed.is_some());
    }

    #[test]
    fn strict_unexpected_status_errors_with_body() {
        let err = classify::<Widget>(
            &raw(StatusCode::NOT_FOUND, b"no such cluster"),
            OK_ONLY,
            WireFormat::Json,
            true,
        )
        .unwrap_err();
        match err {
            Error::UnexpectedStatus(err) => {
                assert_eq!(err.status, StatusCode::NOT_FOUND);
                assert_eq!(err.body_text(), "no such cluster");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[test]
    fn lenient_unexpected_status_is_an_explicit_absence() {
        let resp = classify::<Widget>(
            &raw(StatusCode::NOT_FOUND, b"no such cluster"),
            OK_ONLY,
            WireFormat::Json,
            false,
        )
        .unwrap();
        assert_eq!(resp.parsed, None);
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(&resp.content[..], b"no such cluster");
    }

    #[test]
    fn exact_policy_ignores_the_lenient_flag() {
        let err = classify::<Widget>(
            &raw(StatusCode::BAD_GATEWAY, b"boom"),
            StatusPolicy::Exact(StatusCode::OK),
            WireFormat::Json,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus(_)));
    }

    #[test]
    fn decode_failure_on_accepted_status_is_a_decode_error() {
        let err = classify::<Widget>(
            &raw(StatusCode::OK, b"<html>"),
            OK_ONLY,
            WireFormat::Json,
            false,
        )
        .unwrap_err();
        match err {
            Error::Decode(err) => assert_eq!(&err.body[..], b"<html>"),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn into_parsed_projects_the_value() {
        let resp = Response {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            content: Bytes::new(),
            parsed: Some(7u32),
        };
        assert_eq!(resp.into_parsed(), Some(7));
    }
}
