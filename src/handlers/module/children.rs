use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Response,
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::api::{JsonStore, Outcome};
use crate::app::AppState;
use crate::database::{ModuleRecord, ModuleStore, ROOT_PARENT_ID};
use crate::error::ModuleError;

/// Token naming the top of the tree
pub const ROOT_TOKEN: &str = "root";

#[derive(Debug, Deserialize)]
pub struct ChildrenQuery {
    /// `root` or the numeric id of the parent whose children are wanted
    pub node: Option<String>,
}

/// GET get-children?node=root|<id> - lazy tree loading
pub async fn get_children(
    State(state): State<AppState>,
    query: Result<Query<ChildrenQuery>, QueryRejection>,
) -> Response {
    let result = match query {
        Ok(Query(query)) => {
            debug!("server receive: node={:?}", query.node);
            load_children(state.store.as_ref(), query.node.as_deref()).await
        }
        Err(rejection) => Err(ModuleError::bad_request(rejection.body_text())),
    };

    match result {
        Ok(children) => state.writer.write(&children),
        Err(e) => {
            error!("get-children failed: {:?}", e);
            state.writer.write_outcome::<()>(Outcome::from(e))
        }
    }
}

/// Children of the node named by `token`; the total is the size of the list itself.
pub async fn load_children(
    store: &dyn ModuleStore,
    token: Option<&str>,
) -> Result<JsonStore<ModuleRecord>, ModuleError> {
    let parent_id = parse_node(token)?;
    let records = store.find_by_parent_id(parent_id).await?;
    Ok(JsonStore::counted(records))
}

pub fn parse_node(token: Option<&str>) -> Result<i64, ModuleError> {
    match token {
        None => Err(ModuleError::MissingParameter("node")),
        Some(ROOT_TOKEN) => Ok(ROOT_PARENT_ID),
        Some(t) => t.parse::<i64>().map_err(|source| ModuleError::InvalidNode {
            token: t.to_string(),
            source,
        }),
    }
}
