pub mod body;
pub mod children;
pub mod list;
pub mod mutate;
pub mod record;
pub mod validate;

pub use body::ModuleBody;
pub use children::get_children;
pub use list::get_module;
pub use mutate::{add, delete, update};
pub use record::get_by_id;

use axum::response::Response;
use serde::Serialize;
use tracing::{debug, error};

use crate::api::{Outcome, ResponseWriter};
use crate::error::ModuleError;

/// Write a handler result as a single-object envelope.
///
/// Faults are logged with their full chain; expected negatives only at debug.
pub(crate) fn respond<T: Serialize>(
    writer: &ResponseWriter,
    endpoint: &str,
    result: Result<Outcome<T>, ModuleError>,
) -> Response {
    let outcome = result.unwrap_or_else(|e| {
        if e.is_fault() {
            error!("{} failed: {:?}", endpoint, e);
        } else {
            debug!("{} rejected: {}", endpoint, e);
        }
        e.into()
    });
    writer.write_outcome(outcome)
}
