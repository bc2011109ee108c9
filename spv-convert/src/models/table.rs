//! In-memory tables with a fixed column list

use super::CellValue;

/// Fully materialized table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table.
    ///
    /// # Panics
    /// If any row does not have exactly one cell per column.
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        if let Some(index) = rows.iter().position(|r| r.len() != columns.len()) {
            panic!(
                "row {} has {} cells, expected {}",
                index,
                rows[index].len(),
                columns.len()
            );
        }
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<TabularRow<'_>> {
        self.rows.get(index).map(|cells| TabularRow {
            columns: &self.columns,
            cells,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = TabularRow<'_>> + '_ {
        self.rows.iter().map(move |cells| TabularRow {
            columns: &self.columns,
            cells,
        })
    }
}

/// Borrowed view of one row, ordered like the table header
#[derive(Debug, Clone, Copy)]
pub struct TabularRow<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> TabularRow<'a> {
    /// Cell by column name. Absent columns read as missing.
    pub fn get(&self, column: &str) -> &'a CellValue {
        const MISSING: &CellValue = &CellValue::Null;
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.cells.get(i))
            .unwrap_or(MISSING)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        self.columns.iter().map(String::as_str).zip(self.cells.iter())
    }
}
