use serde::{Deserialize, Serialize};

/// Result family reported in every single-object envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Failure,
    Error,
}

/// Wire shape `{ "status", "msg", "data" }`; absent fields serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<T> {
    pub status: Status,
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> Message<T> {
    pub fn new(status: Status, msg: Option<String>, data: Option<T>) -> Self {
        Self { status, msg, data }
    }
}

/// Outcome of one handler invocation.
///
/// `Failure` is an expected negative (validation, not found, zero rows),
/// `Error` an unexpected fault whose message is passed through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success { msg: Option<String>, data: Option<T> },
    Failure { msg: Option<String> },
    Error { msg: String },
}

impl<T> Outcome<T> {
    pub fn success(msg: impl Into<String>) -> Self {
        Outcome::Success { msg: Some(msg.into()), data: None }
    }

    pub fn found(data: T) -> Self {
        Outcome::Success { msg: None, data: Some(data) }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Outcome::Failure { msg: Some(msg.into()) }
    }

    pub fn not_found() -> Self {
        Outcome::Failure { msg: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Outcome::Error { msg: msg.into() }
    }

    pub fn status(&self) -> Status {
        match self {
            Outcome::Success { .. } => Status::Success,
            Outcome::Failure { .. } => Status::Failure,
            Outcome::Error { .. } => Status::Error,
        }
    }
}

impl<T> From<Outcome<T>> for Message<T> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Success { msg, data } => Message::new(Status::Success, msg, data),
            Outcome::Failure { msg } => Message::new(Status::Failure, msg, None),
            Outcome::Error { msg } => Message::new(Status::Error, Some(msg), None),
        }
    }
}

/// List envelope `{ "records", "total" }` consumed by tree and grid stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonStore<T> {
    pub records: Vec<T>,
    pub total: i64,
}

impl<T> JsonStore<T> {
    pub fn new(records: Vec<T>, total: i64) -> Self {
        Self { records, total }
    }

    /// Total taken from the page itself rather than a separate count
    pub fn counted(records: Vec<T>) -> Self {
        let total = records.len() as i64;
        Self { records, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_serializes_null_msg_and_data() {
        let message: Message<String> = Outcome::not_found().into();
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "status": "FAILURE", "msg": null, "data": null })
        );
    }

    #[test]
    fn error_carries_message_without_data() {
        let message: Message<i32> = Outcome::error("boom").into();
        assert_eq!(message.status, Status::Error);
        assert_eq!(message.msg.as_deref(), Some("boom"));
        assert!(message.data.is_none());
    }

    #[test]
    fn counted_store_uses_record_count() {
        let store = JsonStore::counted(vec!["a", "b", "c"]);
        assert_eq!(serde_json::to_value(&store).unwrap(), json!({ "records": ["a", "b", "c"], "total": 3 }));
    }
}
