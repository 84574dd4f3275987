use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Response,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::api::{JsonStore, Outcome};
use crate::app::AppState;
use crate::database::{ModuleCondition, ModuleRecord, ModuleStore};
use crate::error::ModuleError;
use crate::filter::filter_order::FilterOrder;
use crate::filter::{FilterOrderInfo, SortDirection};

/// Level the conditioned listing is pinned to
pub const LISTING_LEVEL: i32 = 1;

/// Query string of `get-module`: template fields plus paging, ordering and
/// a fuzzy name filter. Numbers arrive as text and are parsed leniently.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub order_no: Option<String>,
    pub parent_id: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    /// Case-insensitive substring of `name`
    pub query: Option<String>,
    pub start: Option<String>,
    pub limit: Option<String>,
    /// Property name, or a JSON array of `{property, direction}` sorters
    pub sort: Option<String>,
    pub dir: Option<String>,
}

/// GET get-module - paged grid listing of level-1 modules
pub async fn get_module(
    State(state): State<AppState>,
    query: Result<Query<ModuleQuery>, QueryRejection>,
) -> Response {
    let result = match query {
        Ok(Query(query)) => {
            debug!("server receive: query={:?}", query);
            match query.into_condition() {
                Ok(condition) => list_modules(state.store.as_ref(), &condition).await,
                Err(e) => Err(e),
            }
        }
        Err(rejection) => Err(ModuleError::bad_request(rejection.body_text())),
    };

    match result {
        Ok(page) => state.writer.write(&page),
        Err(e) => {
            error!("get-module failed: {:?}", e);
            state.writer.write_outcome::<()>(Outcome::from(e))
        }
    }
}

/// List one page and count the whole match in two separate store calls.
pub async fn list_modules(
    store: &dyn ModuleStore,
    condition: &ModuleCondition,
) -> Result<JsonStore<ModuleRecord>, ModuleError> {
    let records = store.find_by_condition(condition).await?;
    let total = store.count_by_condition(condition).await?;
    Ok(JsonStore::new(records, total))
}

impl ModuleQuery {
    pub fn into_condition(self) -> Result<ModuleCondition, ModuleError> {
        let order = parse_sort(self.sort.as_deref(), self.dir.as_deref())?;
        let template = ModuleRecord {
            id: non_blank(self.id),
            name: non_blank(self.name),
            order_no: parse_number("orderNo", self.order_no)?,
            parent_id: parse_number("parentId", self.parent_id)?,
            level: Some(LISTING_LEVEL),
            url: non_blank(self.url),
            icon: non_blank(self.icon),
            ..Default::default()
        };
        Ok(ModuleCondition {
            template,
            name_like: non_blank(self.query),
            order,
            start: parse_number("start", self.start)?,
            limit: parse_number("limit", self.limit)?,
        })
    }
}

/// Resolve grid sorters onto storage columns.
pub fn parse_sort(sort: Option<&str>, dir: Option<&str>) -> Result<Vec<FilterOrderInfo>, ModuleError> {
    let sort = match sort.map(str::trim) {
        None | Some("") => return Ok(Vec::new()),
        Some(s) => s,
    };

    let requested = if sort.starts_with('[') {
        let sorters: Value = serde_json::from_str(sort).map_err(|e| ModuleError::InvalidSort(e.to_string()))?;
        FilterOrder::validate_and_parse(&sorters)?
    } else {
        vec![FilterOrderInfo {
            column: sort.to_string(),
            sort: SortDirection::parse(dir.unwrap_or("asc")),
        }]
    };

    requested
        .into_iter()
        .map(|info| match ModuleRecord::column_for(&info.column) {
            Some(column) => Ok(FilterOrderInfo { column: column.to_string(), sort: info.sort }),
            None => Err(ModuleError::InvalidSort(info.column)),
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: Option<String>) -> Result<Option<T>, ModuleError>
where
    T::Err: std::fmt::Display,
{
    match non_blank(value) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ModuleError::bad_request(format!("{}: {}", field, e))),
    }
}
