use axum::{extract::State, response::Response};
use tracing::debug;

use super::body::ModuleBody;
use super::respond;
use super::validate::validate;
use crate::api::Outcome;
use crate::app::AppState;
use crate::database::{ModuleRecord, ModuleStore};
use crate::error::ModuleError;

pub const ID_EXISTS: &str = "module id already exists";
pub const ADDED: &str = "module added";
pub const ADD_FAILED: &str = "module was not added";
pub const UPDATED: &str = "module updated";
pub const UPDATE_FAILED: &str = "module was not updated";
pub const DELETED: &str = "module deleted";
pub const DELETE_FAILED: &str = "module was not deleted";

/// POST add
pub async fn add(State(state): State<AppState>, ModuleBody(module): ModuleBody) -> Response {
    debug!("server receive: module={:?}", module);
    respond(&state.writer, "add", create_module(state.store.as_ref(), &module).await)
}

/// POST update
pub async fn update(State(state): State<AppState>, ModuleBody(module): ModuleBody) -> Response {
    debug!("server receive: module={:?}", module);
    respond(&state.writer, "update", update_module(state.store.as_ref(), &module).await)
}

/// POST delete
pub async fn delete(State(state): State<AppState>, ModuleBody(module): ModuleBody) -> Response {
    debug!("server receive: module={:?}", module);
    respond(&state.writer, "delete", delete_module(state.store.as_ref(), &module).await)
}

/// Validate, refuse known ids, then insert.
///
/// The existence check and the insert are separate store calls, so two
/// concurrent creators of one id can both pass the check; the loser then
/// fails on the store's key constraint and is reported as ERROR.
pub async fn create_module(store: &dyn ModuleStore, module: &ModuleRecord) -> Result<Outcome<()>, ModuleError> {
    let id = validate(module)?;
    if store.find(id).await?.is_some() {
        return Err(ModuleError::validation(ID_EXISTS));
    }
    Ok(by_rows(store.add(module).await?, ADDED, ADD_FAILED))
}

pub async fn update_module(store: &dyn ModuleStore, module: &ModuleRecord) -> Result<Outcome<()>, ModuleError> {
    validate(module)?;
    Ok(by_rows(store.update(module).await?, UPDATED, UPDATE_FAILED))
}

pub async fn delete_module(store: &dyn ModuleStore, module: &ModuleRecord) -> Result<Outcome<()>, ModuleError> {
    Ok(by_rows(store.delete(module).await?, DELETED, DELETE_FAILED))
}

fn by_rows(rows: u64, done: &str, not_done: &str) -> Outcome<()> {
    if rows > 0 {
        Outcome::success(done)
    } else {
        Outcome::failure(not_done)
    }
}
