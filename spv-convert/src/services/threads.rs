//! Thread table → posts grouped by thread id
//!
//! Rows are stable-sorted by (thread_id, timestamp) and then appended to
//! their thread, so posts within a thread are in ascending timestamp order
//! and rows with equal keys keep their input order. Missing timestamps sort
//! last within a thread.

use crate::error::{ConvertError, Result};
use crate::models::{Table, TabularRow, ThreadMap, ThreadPost, THREAD_ID};

/// Group all posts under their thread.
///
/// A row whose `thread_id` is missing or not an integral number is rejected
/// with [`ConvertError::InvalidThreadId`] (0-based row index).
pub fn convert_threads(table: &Table) -> Result<ThreadMap> {
    let mut keyed: Vec<(i64, TabularRow<'_>)> = Vec::with_capacity(table.len());
    for (index, row) in table.rows().enumerate() {
        let cell = row.get(THREAD_ID);
        let thread_id = cell.as_exact_i64().ok_or_else(|| ConvertError::InvalidThreadId {
            row: index,
            value: cell.to_string(),
        })?;
        keyed.push((thread_id, row));
    }

    // Vec::sort_by is stable
    keyed.sort_by(|(a_id, a_row), (b_id, b_row)| {
        a_id.cmp(b_id)
            .then_with(|| a_row.get("timestamp").sort_cmp(b_row.get("timestamp")))
    });

    let mut threads = ThreadMap::new();
    for (thread_id, row) in keyed {
        threads.push(thread_id, build_post(&row));
    }
    Ok(threads)
}

/// Apply the per-field defaults
fn build_post(row: &TabularRow<'_>) -> ThreadPost {
    let defaults = ThreadPost::default();
    ThreadPost {
        post_id: row.get("post_id").as_i64(),
        author_role: row.get("author_role").as_text(),
        timestamp: row.get("timestamp").as_text(),
        content: row.get("content").as_text().unwrap_or(defaults.content),
        sentiment: row.get("sentiment").as_text().unwrap_or(defaults.sentiment),
        has_vaccine_keyword: row
            .get("has_vaccine_keyword")
            .as_bool()
            .unwrap_or(defaults.has_vaccine_keyword),
        replies_to_post_number: row.get("replies_to_post_number").as_i64(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    const COLUMNS: [&str; 8] = [
        "thread_id",
        "post_id",
        "author_role",
        "timestamp",
        "content",
        "sentiment",
        "has_vaccine_keyword",
        "replies_to_post_number",
    ];

    fn post_row(thread_id: CellValue, post_id: i64, timestamp: &str) -> Vec<CellValue> {
        vec![
            thread_id,
            CellValue::Int(post_id),
            CellValue::String("member".into()),
            CellValue::String(timestamp.into()),
            CellValue::String(format!("post {}", post_id)),
            CellValue::String("positive".into()),
            CellValue::Bool(true),
            CellValue::Null,
        ]
    }

    fn threads_table(rows: Vec<Vec<CellValue>>) -> Table {
        Table::new("threads", COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn post_ids(threads: &ThreadMap, key: &str) -> Vec<Option<i64>> {
        threads.get(key).unwrap().iter().map(|p| p.post_id).collect()
    }

    #[test]
    fn test_posts_sorted_by_timestamp_within_thread() {
        let table = threads_table(vec![
            post_row(CellValue::Int(10), 2, "2024-01-02 10:00:00"),
            post_row(CellValue::Int(11), 3, "2024-01-01 09:00:00"),
            post_row(CellValue::Int(10), 1, "2024-01-01 08:00:00"),
        ]);
        let threads = convert_threads(&table).unwrap();

        assert_eq!(threads.len(), 2);
        assert_eq!(post_ids(&threads, "10"), vec![Some(1), Some(2)]);
        assert_eq!(post_ids(&threads, "11"), vec![Some(3)]);
        assert_eq!(threads.total_posts(), table.len());
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let table = threads_table(vec![
            post_row(CellValue::Int(5), 30, "2024-03-01"),
            post_row(CellValue::Int(5), 10, "2024-03-01"),
            post_row(CellValue::Int(5), 20, "2024-03-01"),
        ]);
        let threads = convert_threads(&table).unwrap();
        assert_eq!(post_ids(&threads, "5"), vec![Some(30), Some(10), Some(20)]);
    }

    #[test]
    fn test_float_thread_id_keyed_as_integer_string() {
        let table = threads_table(vec![post_row(CellValue::Float(42.0), 1, "t")]);
        let threads = convert_threads(&table).unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(post_ids(&threads, "42"), vec![Some(1)]);
    }

    #[test]
    fn test_missing_timestamp_sorts_last() {
        let mut untimed = post_row(CellValue::Int(1), 9, "");
        untimed[3] = CellValue::Null;
        let table = threads_table(vec![untimed, post_row(CellValue::Int(1), 1, "2024-01-01")]);
        let threads = convert_threads(&table).unwrap();

        let posts = threads.get("1").unwrap();
        assert_eq!(posts[0].post_id, Some(1));
        assert_eq!(posts[1].post_id, Some(9));
        assert_eq!(posts[1].timestamp, None);
    }

    #[test]
    fn test_defaults_applied_to_missing_cells() {
        let row = vec![
            CellValue::Int(7),
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
            CellValue::Null,
        ];
        let threads = convert_threads(&threads_table(vec![row])).unwrap();
        assert_eq!(threads.get("7").unwrap()[0], ThreadPost::default());
    }

    #[test]
    fn test_numeric_cells_converted() {
        let row = vec![
            CellValue::Int(3),
            CellValue::Float(12.0),
            CellValue::String("moderator".into()),
            CellValue::Int(1_700_000_000),
            CellValue::Float(2.0),
            CellValue::String("negative".into()),
            CellValue::Int(0),
            CellValue::Float(4.0),
        ];
        let threads = convert_threads(&threads_table(vec![row])).unwrap();
        let post = &threads.get("3").unwrap()[0];

        assert_eq!(post.post_id, Some(12));
        assert_eq!(post.timestamp.as_deref(), Some("1700000000"));
        assert_eq!(post.content, "2.0");
        assert!(!post.has_vaccine_keyword);
        assert_eq!(post.replies_to_post_number, Some(4));
    }

    #[test]
    fn test_missing_thread_id_rejected() {
        let table = threads_table(vec![
            post_row(CellValue::Int(1), 1, "t"),
            post_row(CellValue::Null, 2, "t"),
        ]);
        match convert_threads(&table) {
            Err(ConvertError::InvalidThreadId { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, "null");
            }
            other => panic!("expected InvalidThreadId, got {:?}", other),
        }
    }

    #[test]
    fn test_fractional_thread_id_rejected() {
        let table = threads_table(vec![post_row(CellValue::Float(1.5), 1, "t")]);
        assert!(matches!(
            convert_threads(&table),
            Err(ConvertError::InvalidThreadId { row: 0, .. })
        ));
    }
}
