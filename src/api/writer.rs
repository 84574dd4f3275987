use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use super::encoding::Encoding;
use super::envelope::{Message, Outcome, Status};
use super::format::{is_valid_date_format, reformat_dates};
use crate::config::{ResponseConfig, LONG_DATE_FORMAT};
use crate::transform::{gzip, Cipher, TransformError};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Renders envelopes into HTTP responses and decodes raw request bodies.
///
/// Built once from [`ResponseConfig`] and shared by every handler; it holds
/// no mutable state.
#[derive(Debug, Clone)]
pub struct ResponseWriter {
    encoding: Encoding,
    date_format: String,
    encrypted: bool,
    compressed: bool,
    cipher: Cipher,
}

impl ResponseWriter {
    pub fn new(config: &ResponseConfig) -> Self {
        let date_format = if is_valid_date_format(&config.date_format) {
            config.date_format.clone()
        } else {
            warn!("Invalid date format '{}', falling back to '{}'", config.date_format, LONG_DATE_FORMAT);
            LONG_DATE_FORMAT.to_string()
        };
        Self {
            encoding: config.encoding,
            date_format,
            encrypted: config.encrypted,
            compressed: config.compressed,
            cipher: Cipher::new(&config.cipher_key),
        }
    }

    pub fn cipher(&self) -> &Cipher {
        &self.cipher
    }

    /// Serialize `body` to JSON text and apply encoding, compression and the
    /// byte transform in that order.
    pub fn render<T: Serialize>(&self, body: &T) -> Result<Vec<u8>, WriteError> {
        let mut value = serde_json::to_value(body)?;
        reformat_dates(&mut value, &self.date_format);
        let content = serde_json::to_string(&value)?;
        info!("==> write out result --> {}", content);

        let mut bytes = self.encoding.encode(&content)?;
        if self.compressed {
            bytes = gzip::compress(&bytes)?;
        }
        if self.encrypted {
            bytes = self.cipher.encrypt(&bytes);
        }
        Ok(bytes)
    }

    /// Always answers `200 OK`; a body that cannot be rendered is replaced by
    /// an ERROR envelope describing the failure.
    pub fn write<T: Serialize>(&self, body: &T) -> Response {
        match self.render(body) {
            Ok(bytes) => self.respond(bytes),
            Err(e) => {
                error!("Failed to write response: {:?}", e);
                let fallback = Message::<()>::new(Status::Error, Some(e.to_string()), None);
                match self.render(&fallback) {
                    Ok(bytes) => self.respond(bytes),
                    Err(e) => {
                        error!("Failed to write error envelope: {:?}", e);
                        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
                    }
                }
            }
        }
    }

    pub fn write_outcome<T: Serialize>(&self, outcome: Outcome<T>) -> Response {
        self.write(&Message::from(outcome))
    }

    /// Reverse the transport transform on a request body and decode it to text.
    pub fn read_request(&self, raw: &[u8]) -> Result<String, TransformError> {
        let text = if self.encrypted {
            self.encoding.decode(&self.cipher.decrypt(raw))?
        } else {
            self.encoding.decode(raw)?
        };
        info!("==> received param --> {}", text);
        Ok(text)
    }

    fn respond(&self, bytes: Vec<u8>) -> Response {
        let content_type = format!("application/json;charset={}", self.encoding.label());
        ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
    }
}
