use std::borrow::Cow;
use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

static EMPTY: Value = Value::Empty;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A single scalar cell as loaded from a CSV file or a workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Value {
    /// String form used for identifier equality and address comparison.
    /// Empty cells have no text.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Empty => None,
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Number(n) => Some(Cow::Owned(format_number(*n))),
            Self::Bool(b) => Some(Cow::Borrowed(if *b { "TRUE" } else { "FALSE" })),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s)
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Integral numbers print without a decimal part, so an enterprise number
/// read from a workbook as `123456789.0` compares equal to `"123456789"`.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// An in-memory table: ordered column names plus rows of cells.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from string cells. Empty strings become empty cells.
    pub fn from_strings(name: &str, columns: &[&str], rows: &[&[&str]]) -> Self {
        let mut dataset = Self::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            dataset.push_row(row.iter().map(|cell| Value::from(*cell)).collect());
        }
        dataset
    }

    pub fn push_row(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            index,
            columns: &self.columns,
            values,
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Row<'_>> + '_ {
        self.rows.iter().enumerate().map(|(index, values)| Row {
            index,
            columns: &self.columns,
            values,
        })
    }

    /// Parallel row iterator; `collect` keeps row order.
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item = Row<'_>> + '_ {
        self.rows.par_iter().enumerate().map(|(index, values)| Row {
            index,
            columns: &self.columns,
            values,
        })
    }
}

// ---------------------------------------------------------------------------
// Row view
// ---------------------------------------------------------------------------

/// Borrowed view of one dataset row. Cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: usize,
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Zero-based position of the row in its dataset (header excluded).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell for `column`. `None` only when the column does not exist;
    /// a short row reads as empty in its missing trailing cells.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let position = self.columns.iter().position(|c| c == column)?;
        Some(self.values.get(position).unwrap_or(&EMPTY))
    }

    /// Stringified cell for `column`; `None` for a missing column or empty cell.
    pub fn text(&self, column: &str) -> Option<Cow<'a, str>> {
        self.get(column).and_then(Value::to_text)
    }

    /// `(column, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        let (columns, values) = (self.columns, self.values);
        columns
            .iter()
            .enumerate()
            .map(move |(i, column)| (column.as_str(), values.get(i).unwrap_or(&EMPTY)))
    }
}
