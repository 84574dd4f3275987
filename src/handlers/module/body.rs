use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    response::Response,
    Form,
};
use tracing::debug;

use crate::api::Outcome;
use crate::app::AppState;
use crate::database::ModuleRecord;
use crate::error::ModuleError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A module record bound from a mutation request body.
///
/// Form posts bind directly. Any other body is taken as JSON text and runs
/// through the transport decoding first; an empty body binds an empty record
/// and is left for validation to reject. Rejections are written as ERROR
/// envelopes with status 200 like every other module response.
#[derive(Debug)]
pub struct ModuleBody(pub ModuleRecord);

#[async_trait]
impl FromRequest<AppState> for ModuleBody {
    type Rejection = Response;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let reject = |e: ModuleError| {
            debug!("rejecting request body: {}", e);
            state.writer.write_outcome::<()>(Outcome::from(e))
        };

        if is_form(&req) {
            let Form(record) = Form::<ModuleRecord>::from_request(req, state)
                .await
                .map_err(|e| reject(ModuleError::bad_request(e.body_text())))?;
            return Ok(ModuleBody(record));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| reject(ModuleError::bad_request(e.body_text())))?;
        decode_json(state, &bytes).map(ModuleBody).map_err(reject)
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.starts_with(FORM_CONTENT_TYPE))
}

fn decode_json(state: &AppState, raw: &[u8]) -> Result<ModuleRecord, ModuleError> {
    if raw.is_empty() {
        return Ok(ModuleRecord::default());
    }
    let text = state.writer.read_request(raw)?;
    if text.trim().is_empty() {
        return Ok(ModuleRecord::default());
    }
    serde_json::from_str(&text).map_err(|e| ModuleError::bad_request(e.to_string()))
}
