//! Output record shapes consumed by the browser viewer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Column holding the serialized vaccine type list
pub const VACCINE_TYPES: &str = "vaccine_types";

/// Column linking rows to a discussion thread
pub const THREAD_ID: &str = "thread_id";

static NULL: Value = Value::Null;

/// One annotated row as a JSON object, keys in source column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotatedRecord(Map<String, Value>);

impl AnnotatedRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn thread_id(&self) -> &Value {
        self.0.get(THREAD_ID).unwrap_or(&NULL)
    }

    pub fn vaccine_types(&self) -> &Value {
        self.0.get(VACCINE_TYPES).unwrap_or(&NULL)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// One post inside a thread. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadPost {
    pub post_id: Option<i64>,
    pub author_role: Option<String>,
    pub timestamp: Option<String>,
    pub content: String,
    pub sentiment: String,
    pub has_vaccine_keyword: bool,
    pub replies_to_post_number: Option<i64>,
}

impl Default for ThreadPost {
    fn default() -> Self {
        Self {
            post_id: None,
            author_role: None,
            timestamp: None,
            content: String::new(),
            sentiment: "neutral".to_string(),
            has_vaccine_keyword: false,
            replies_to_post_number: None,
        }
    }
}

/// Posts grouped by thread id.
///
/// Serializes as a JSON object keyed by the decimal string of the id, in
/// ascending numeric order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadMap(BTreeMap<i64, Vec<ThreadPost>>);

impl ThreadMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a post to its thread, creating the thread on first use
    pub fn push(&mut self, thread_id: i64, post: ThreadPost) {
        self.0.entry(thread_id).or_default().push(post);
    }

    pub fn get(&self, key: &str) -> Option<&[ThreadPost]> {
        key.parse::<i64>()
            .ok()
            .and_then(|id| self.0.get(&id))
            .map(Vec::as_slice)
    }

    pub fn contains_thread(&self, thread_id: i64) -> bool {
        self.0.contains_key(&thread_id)
    }

    /// Number of threads
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of posts across all threads
    pub fn total_posts(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// A `vaccine_types` cell that could not be decoded and was replaced by
/// its fallback value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 0-based row index in the source table
    pub row: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Row {}: {} parse error - {}",
            self.row, VACCINE_TYPES, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_thread_post_default_fields() {
        let value = serde_json::to_value(ThreadPost::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "post_id": null,
                "author_role": null,
                "timestamp": null,
                "content": "",
                "sentiment": "neutral",
                "has_vaccine_keyword": false,
                "replies_to_post_number": null
            })
        );
    }

    #[test]
    fn test_thread_map_serializes_string_keys_in_numeric_order() {
        let mut threads = ThreadMap::new();
        threads.push(100, ThreadPost::default());
        threads.push(9, ThreadPost::default());
        threads.push(9, ThreadPost::default());

        let text = serde_json::to_string(&threads).unwrap();
        assert!(text.starts_with("{\"9\":["));
        assert!(text.find("\"9\"").unwrap() < text.find("\"100\"").unwrap());
        assert_eq!(threads.total_posts(), 3);
        assert_eq!(threads.get("9").unwrap().len(), 2);
        assert!(threads.get("100").is_some());
        assert!(threads.get("x").is_none());
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            row: 4,
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Row 4: vaccine_types parse error - expected value at line 1 column 1"
        );
    }
}
