use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::FromRow;

use crate::filter::{FilterData, FilterOrderInfo, SortDirection};

/// One node of the module tree.
///
/// Every field is optional because records are bound straight from request
/// parameters; the handlers decide which absences are errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub order_no: Option<i32>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub parent_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub level: Option<i32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, skip_deserializing)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_deserializing)]
    pub update_time: Option<DateTime<Utc>>,
}

/// Parent id of top-level nodes
pub const ROOT_PARENT_ID: i64 = 0;

impl ModuleRecord {
    /// Columns read back from storage; the soft-delete marker is never exposed
    pub const COLUMNS: [&'static str; 9] = [
        "id", "name", "order_no", "parent_id", "level", "url", "icon", "create_time", "update_time",
    ];

    /// Map a wire property (`orderNo`) or column name (`order_no`) to its column.
    pub fn column_for(property: &str) -> Option<&'static str> {
        Some(match property {
            "id" => "id",
            "name" => "name",
            "orderNo" | "order_no" => "order_no",
            "parentId" | "parent_id" => "parent_id",
            "level" => "level",
            "url" => "url",
            "icon" => "icon",
            "createTime" | "create_time" => "create_time",
            "updateTime" | "update_time" => "update_time",
            _ => return None,
        })
    }

    /// Same record without the store-maintained timestamps
    pub fn editable(&self) -> ModuleRecord {
        ModuleRecord { create_time: None, update_time: None, ..self.clone() }
    }

    /// Equality conditions for every populated editable field, keyed by column.
    pub fn template_where(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(ref id) = self.id { map.insert("id".into(), json!(id)); }
        if let Some(ref name) = self.name { map.insert("name".into(), json!(name)); }
        if let Some(order_no) = self.order_no { map.insert("order_no".into(), json!(order_no)); }
        if let Some(parent_id) = self.parent_id { map.insert("parent_id".into(), json!(parent_id)); }
        if let Some(level) = self.level { map.insert("level".into(), json!(level)); }
        if let Some(ref url) = self.url { map.insert("url".into(), json!(url)); }
        if let Some(ref icon) = self.icon { map.insert("icon".into(), json!(icon)); }
        map
    }

    /// True when every populated field of `template` equals this record's value.
    pub fn matches_template(&self, template: &ModuleRecord) -> bool {
        fn eq<T: PartialEq>(wanted: &Option<T>, actual: &Option<T>) -> bool {
            wanted.is_none() || wanted == actual
        }
        eq(&template.id, &self.id)
            && eq(&template.name, &self.name)
            && eq(&template.order_no, &self.order_no)
            && eq(&template.parent_id, &self.parent_id)
            && eq(&template.level, &self.level)
            && eq(&template.url, &self.url)
            && eq(&template.icon, &self.icon)
    }

    /// Compare two records on a storage column; `None` sorts before any value.
    pub fn compare_on(&self, other: &ModuleRecord, column: &str) -> Ordering {
        match column {
            "id" => self.id.cmp(&other.id),
            "name" => self.name.cmp(&other.name),
            "order_no" => self.order_no.cmp(&other.order_no),
            "parent_id" => self.parent_id.cmp(&other.parent_id),
            "level" => self.level.cmp(&other.level),
            "url" => self.url.cmp(&other.url),
            "icon" => self.icon.cmp(&other.icon),
            "create_time" => self.create_time.cmp(&other.create_time),
            "update_time" => self.update_time.cmp(&other.update_time),
            _ => Ordering::Equal,
        }
    }
}

/// Template plus filtering, ordering and paging for list and count queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleCondition {
    pub template: ModuleRecord,
    /// Case-insensitive substring match on `name`
    pub name_like: Option<String>,
    /// Storage columns; empty means sibling order
    pub order: Vec<FilterOrderInfo>,
    pub start: Option<i32>,
    pub limit: Option<i32>,
}

impl ModuleCondition {
    pub fn new(template: ModuleRecord) -> Self {
        Self { template, ..Default::default() }
    }

    /// Order applied when the caller gave none
    pub fn default_order() -> Vec<FilterOrderInfo> {
        vec![FilterOrderInfo::asc("order_no"), FilterOrderInfo::asc("id")]
    }

    pub fn effective_order(&self) -> Vec<FilterOrderInfo> {
        if self.order.is_empty() { Self::default_order() } else { self.order.clone() }
    }

    pub fn where_data(&self) -> Value {
        let mut map = self.template.template_where();
        if let Some(ref needle) = self.name_like {
            let pattern = format!("%{}%", escape_like(needle));
            match map.remove("name") {
                Some(exact) => { map.insert("name".into(), json!({ "$eq": exact, "$ilike": pattern })); }
                None => { map.insert("name".into(), json!({ "$ilike": pattern })); }
            }
        }
        Value::Object(map)
    }

    /// Translate into the filter language used by the SQL store.
    pub fn to_filter_data(&self) -> FilterData {
        let order = self
            .effective_order()
            .iter()
            .map(|o| Value::String(format!("{} {}", o.column, o.sort.to_sql())))
            .collect();
        FilterData {
            select: Some(ModuleRecord::COLUMNS.iter().map(|c| c.to_string()).collect()),
            where_clause: Some(self.where_data()),
            order: Some(Value::Array(order)),
            limit: self.limit,
            offset: self.start,
        }
    }

    pub fn matches(&self, record: &ModuleRecord) -> bool {
        if !record.matches_template(&self.template) {
            return false;
        }
        match (&self.name_like, &record.name) {
            (None, _) => true,
            (Some(needle), Some(name)) => name.to_lowercase().contains(&needle.to_lowercase()),
            (Some(_), None) => false,
        }
    }

    /// Order records in place using the effective order.
    pub fn sort(&self, records: &mut [ModuleRecord]) {
        let order = self.effective_order();
        records.sort_by(|a, b| {
            order.iter().fold(Ordering::Equal, |acc, o| {
                acc.then_with(|| match o.sort {
                    SortDirection::Asc => a.compare_on(b, &o.column),
                    SortDirection::Desc => b.compare_on(a, &o.column),
                })
            })
        });
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Form posts deliver every value as text while JSON clients send numbers;
/// both shapes bind, and blank text binds as absent.
mod lenient {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    pub fn number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<i64> + FromStr,
        <T as TryFrom<i64>>::Error: Display,
        <T as FromStr>::Err: Display,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Int(n)) => T::try_from(n).map(Some).map_err(de::Error::custom),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Raw::Text(s)) => s.trim().parse::<T>().map(Some).map_err(de::Error::custom),
        }
    }

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => None,
            Some(Raw::Int(n)) => Some(n.to_string()),
            Some(Raw::Text(s)) => Some(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(id: &str, name: &str, order_no: i32, parent_id: i64) -> ModuleRecord {
        ModuleRecord {
            id: Some(id.into()),
            name: Some(name.into()),
            order_no: Some(order_no),
            parent_id: Some(parent_id),
            level: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn binds_camel_case_json_with_numbers_or_text() {
        let from_numbers: ModuleRecord =
            serde_json::from_str(r#"{"id":5,"name":"Users","orderNo":1,"parentId":0}"#).unwrap();
        let from_text: ModuleRecord =
            serde_json::from_str(r#"{"id":"5","name":"Users","orderNo":"1","parentId":"0","level":""}"#).unwrap();
        assert_eq!(from_numbers, from_text);
        assert_eq!(from_numbers.id.as_deref(), Some("5"));
        assert_eq!(from_numbers.order_no, Some(1));
        assert_eq!(from_text.level, None);
    }

    #[test]
    fn ignores_client_supplied_timestamps() {
        let record: ModuleRecord =
            serde_json::from_str(r#"{"id":"1","createTime":"2020-01-01T00:00:00Z"}"#).unwrap();
        assert!(record.create_time.is_none());
    }

    #[test]
    fn rejects_out_of_range_order_numbers() {
        let parsed = serde_json::from_str::<ModuleRecord>(r#"{"orderNo": 9999999999}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn condition_merges_exact_and_fuzzy_name() {
        let mut condition = ModuleCondition::new(ModuleRecord {
            name: Some("Users".into()),
            level: Some(1),
            ..Default::default()
        });
        condition.name_like = Some("50%_off".into());
        assert_eq!(
            condition.where_data(),
            json!({ "level": 1, "name": { "$eq": "Users", "$ilike": "%50\\%\\_off%" } })
        );
    }

    #[test]
    fn sorts_by_default_sibling_order() {
        let condition = ModuleCondition::default();
        let mut records = vec![module("b", "B", 2, 0), module("c", "C", 1, 0), module("a", "A", 2, 0)];
        condition.sort(&mut records);
        let ids: Vec<_> = records.iter().map(|r| r.id.clone().unwrap()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn sorts_descending_on_requested_column() {
        let condition = ModuleCondition {
            order: vec![FilterOrderInfo { column: "name".into(), sort: SortDirection::Desc }],
            ..Default::default()
        };
        let mut records = vec![module("1", "Alpha", 1, 0), module("2", "Gamma", 1, 0), module("3", "Beta", 1, 0)];
        condition.sort(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["Gamma", "Beta", "Alpha"]);
    }

    #[test]
    fn matches_template_and_fuzzy_name() {
        let mut condition = ModuleCondition::new(ModuleRecord { level: Some(1), ..Default::default() });
        condition.name_like = Some("use".into());
        assert!(condition.matches(&module("5", "Users", 1, 0)));
        assert!(!condition.matches(&module("6", "Roles", 1, 0)));
        let mut nested = module("7", "User groups", 1, 5);
        nested.level = Some(2);
        assert!(!condition.matches(&nested));
    }
}
