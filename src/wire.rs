//! Wire formats and the payload values they carry.
//!
//! The client speaks one [`WireFormat`] at a time, selected in [`Config`].
//! `Json` and `Msgpack` move structured values; `Raw` moves opaque bytes
//! untouched (model weights, images, tensors). Every request body and every
//! decoded response goes through the format configured on the client.
//!
//! [`Config`]: crate::Config

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{DecodeError, Error, Result};

/// Serialization strategy applied to request and response bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    #[default]
    Json,
    Msgpack,
    Raw,
}

impl WireFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireFormat::Json => "json",
            WireFormat::Msgpack => "msgpack",
            WireFormat::Raw => "raw",
        }
    }

    /// `Content-Type` sent with request bodies in this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            WireFormat::Json => "application/json",
            WireFormat::Msgpack => "application/msgpack",
            WireFormat::Raw => "application/octet-stream",
        }
    }

    /// `Accept` value for responses, when the format implies one.
    pub(crate) fn accept(&self) -> Option<&'static str> {
        match self {
            WireFormat::Json | WireFormat::Msgpack => Some(self.content_type()),
            WireFormat::Raw => None,
        }
    }

    /// Encodes a payload into body bytes.
    ///
    /// Structured formats only accept [`Payload::Value`]; `Raw` only accepts
    /// [`Payload::Bytes`]. Mixing the two is an [`Error::Encode`].
    pub fn encode(&self, payload: &Payload) -> Result<Vec<u8>> {
        match (self, payload) {
            (WireFormat::Json, Payload::Value(value))
            | (WireFormat::Msgpack, Payload::Value(value)) => self.encode_value(value),
            (WireFormat::Raw, Payload::Bytes(bytes)) => Ok(bytes.clone()),
            (WireFormat::Raw, Payload::Value(_)) => Err(Error::Encode {
                format: *self,
                message: "raw format carries opaque bytes, not structured values".to_string(),
            }),
            (_, Payload::Bytes(_)) => Err(Error::Encode {
                format: *self,
                message: "structured formats carry values, not opaque bytes".to_string(),
            }),
        }
    }

    /// Encodes any serializable value. Not available under `Raw`.
    pub fn encode_value<T: Serialize>(&self, value: &T) -> Result<Vec<u8>> {
        match self {
            WireFormat::Json => serde_json::to_vec(value).map_err(|err| Error::Encode {
                format: *self,
                message: err.to_string(),
            }),
            WireFormat::Msgpack => rmp_serde::to_vec_named(value).map_err(|err| Error::Encode {
                format: *self,
                message: err.to_string(),
            }),
            WireFormat::Raw => Err(Error::Encode {
                format: *self,
                message: "raw format carries opaque bytes, not structured values".to_string(),
            }),
        }
    }

    /// Decodes body bytes into a payload.
    ///
    /// `decode(encode(p))` returns a payload equal to `p` for every payload
    /// the format can encode.
    pub fn decode(&self, body: &[u8]) -> Result<Payload, DecodeError> {
        match self {
            WireFormat::Json => serde_json::from_slice::<serde_json::Value>(body)
                .map(Payload::Value)
                .map_err(|err| DecodeError::new(*self, err.to_string(), body.to_vec())),
            WireFormat::Msgpack => rmp_serde::from_slice::<serde_json::Value>(body)
                .map(Payload::Value)
                .map_err(|err| DecodeError::new(*self, err.to_string(), body.to_vec())),
            WireFormat::Raw => Ok(Payload::Bytes(body.to_vec())),
        }
    }

    /// Decodes body bytes straight into a typed model.
    ///
    /// `Raw` cannot satisfy a typed shape; asking it to is a decode error.
    pub fn decode_as<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, DecodeError> {
        match self {
            WireFormat::Json => serde_json::from_slice(body)
                .map_err(|err| DecodeError::new(*self, err.to_string(), body.to_vec())),
            WireFormat::Msgpack => rmp_serde::from_slice(body)
                .map_err(|err| DecodeError::new(*self, err.to_string(), body.to_vec())),
            WireFormat::Raw => Err(DecodeError::new(
                *self,
                "raw responses are opaque bytes and cannot produce a typed value",
                body.to_vec(),
            )),
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An in-memory body before encoding or after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Structured value, moved by the `json` and `msgpack` formats.
    Value(serde_json::Value),
    /// Opaque bytes, moved verbatim by the `raw` format.
    Bytes(Vec<u8>),
}

impl Payload {
    /// Builds a structured payload from any serializable value.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(|err| Error::Encode {
            format: WireFormat::Json,
            message: err.to_string(),
        })?;
        Ok(Payload::Value(value))
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Value(value) => Some(value),
            Payload::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Bytes(bytes) => Some(bytes),
            Payload::Value(_) => None,
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Value(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}
