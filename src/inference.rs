//! Result object for the inference endpoint.

use std::path::Path;

use bytes::Bytes;
use once_cell::sync::OnceCell;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::errors::{Error, Result};
use crate::wire::{Payload, WireFormat};

/// Response from one inference call.
///
/// The body is kept as the exact bytes the server sent. [`data`] decodes it
/// under the client's wire format on first use and memoizes the payload;
/// callers that only want the bytes (or to persist them) never pay for a
/// decode.
///
/// [`data`]: InferenceResponse::data
#[derive(Debug, Clone)]
pub struct InferenceResponse {
    status: StatusCode,
    headers: HeaderMap,
    content: Bytes,
    format: WireFormat,
    decoded: OnceCell<Payload>,
}

impl InferenceResponse {
    pub(crate) fn new(
        status: StatusCode,
        headers: HeaderMap,
        content: Bytes,
        format: WireFormat,
    ) -> Self {
        Self {
            status,
            headers,
            content,
            format,
            decoded: OnceCell::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes, untouched.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Wire format the body will be decoded under.
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Decodes the body under the client's wire format.
    ///
    /// The first call performs the decode; later calls return the memoized
    /// payload. A body that does not parse fails on every call.
    pub fn data(&self) -> Result<&Payload> {
        self.decoded
            .get_or_try_init(|| self.format.decode(&self.content).map_err(Error::from))
    }

    /// Writes the raw body to `path` (images, tensors, model artifacts).
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.content)?;
        Ok(())
    }
}
