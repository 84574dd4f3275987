use axum::{
    extract::{Path, State},
    response::Response,
};
use tracing::{debug, error};

use crate::api::Outcome;
use crate::app::AppState;
use crate::database::ModuleRecord;
use crate::error::ModuleError;

/// Reported instead of the fault text, which stays in the server log
pub const LOAD_FAILED: &str = "failed to load module";

/// GET get/:id - single module by id
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    debug!("server receive: moduleId={}", id);

    let outcome = match state.store.find(&id).await {
        Ok(Some(module)) => Outcome::found(module),
        Ok(None) => Outcome::from(ModuleError::NotFound(format!("module {}", id))),
        Err(e) => {
            error!("get module {} failed: {:?}", id, e);
            Outcome::<ModuleRecord>::error(LOAD_FAILED)
        }
    };
    state.writer.write_outcome(outcome)
}
