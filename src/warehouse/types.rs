//! Query result types for snowlet.
//!
//! Defines the dataframe structure used to represent the result of the one
//! query this program runs.

use std::fmt;
use std::time::Duration;

/// The tabular, fully materialized result of one query.
///
/// A dataframe exists for the duration of one page render; nothing is
/// persisted between invocations.
#[derive(Debug, Clone, Default)]
pub struct Dataframe {
    /// Column metadata for the result set.
    pub columns: Vec<ColumnInfo>,

    /// Rows of data.
    pub rows: Vec<Row>,

    /// Time taken to execute the query and fetch all partitions.
    pub execution_time: Duration,

    /// Number of rows in the result.
    pub row_count: usize,
}

impl Dataframe {
    /// Creates a new empty dataframe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dataframe with the given columns and rows.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            execution_time: Duration::ZERO,
            row_count,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of columns in the result.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type as reported by the warehouse (e.g. `text`, `fixed`).
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A row of data from a query result.
pub type Row = Vec<Value>;

/// A single decoded value from a query result.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text value. Dates and timestamps are decoded into this variant in
    /// human-readable form.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Converts the value to a string representation for display.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

// Conversion implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_display_string(), "NULL");
        assert_eq!(Value::Bool(true).to_display_string(), "true");
        assert_eq!(Value::Int(42).to_display_string(), "42");
        assert_eq!(Value::Float(2.71).to_display_string(), "2.71");
        assert_eq!(
            Value::String("GIT_INT_DB".to_string()).to_display_string(),
            "GIT_INT_DB"
        );
        assert_eq!(Value::Bytes(vec![1, 2, 3]).to_display_string(), "<3 bytes>");
    }

    #[test]
    fn test_value_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(false).is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i64), Value::Int(42));
        assert_eq!(Value::from(2.71f64), Value::Float(2.71));
        assert_eq!(
            Value::from("TABLES".to_string()),
            Value::String("TABLES".to_string())
        );
        assert_eq!(Value::from("TABLES"), Value::String("TABLES".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(42i64)), Value::Int(42));
        assert_eq!(Value::from(vec![0u8, 1u8]), Value::Bytes(vec![0, 1]));
    }

    #[test]
    fn test_dataframe_new() {
        let dataframe = Dataframe::new();
        assert!(dataframe.is_empty());
        assert_eq!(dataframe.row_count, 0);
        assert_eq!(dataframe.column_count(), 0);
    }

    #[test]
    fn test_dataframe_with_data() {
        let columns = vec![
            ColumnInfo::new("TABLE_NAME", "text"),
            ColumnInfo::new("ROW_COUNT", "fixed"),
        ];
        let rows = vec![
            vec![Value::String("ACCOUNTS".to_string()), Value::Int(42)],
            vec![Value::String("EVENTS".to_string()), Value::Null],
        ];

        let dataframe = Dataframe::with_data(columns, rows);

        assert!(!dataframe.is_empty());
        assert_eq!(dataframe.row_count, 2);
        assert_eq!(dataframe.column_count(), 2);
        assert_eq!(dataframe.rows.len(), 2);
    }

    #[test]
    fn test_dataframe_with_execution_time() {
        let dataframe = Dataframe::new().with_execution_time(Duration::from_millis(100));
        assert_eq!(dataframe.execution_time, Duration::from_millis(100));
    }

    #[test]
    fn test_column_info_new() {
        let col = ColumnInfo::new("CREATED", "timestamp_ltz");
        assert_eq!(col.name, "CREATED");
        assert_eq!(col.data_type, "timestamp_ltz");
    }
}
