use crate::*;
use itertools::Itertools as _;
use sqlx::{
    Column as _, Row as _, TypeInfo as _, ValueRef as _,
    sqlite::{SqliteRow, SqliteValueRef},
};
use std::fmt::{self, Display};

/// A single value as stored by the engine.
#[derive(Clone, Debug, PartialEq, derive_more::Display)]
pub enum Value {
    #[display("NULL")]
    Null,
    #[display("{_0}")]
    Integer(i64),
    #[display("{_0}")]
    Real(f64),
    #[display("{_0}")]
    Text(String),
    #[display("<{} bytes>", _0.len())]
    Blob(Vec<u8>),
}

pub type Row = Vec<Value>;

/// Every row a statement produced, materialized eagerly. Empty is a valid result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn from_rows(rows: &[SqliteRow]) -> Result<Self> {
        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>>>()?;
        Ok(Self { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// The only value of a one-row, one-column result (e.g. an aggregate).
    pub fn scalar(&self) -> Option<&Value> {
        match self.rows.as_slice() {
            [row] if row.len() == 1 => row.first(),
            _ => None,
        }
    }
}

impl Display for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.columns.is_empty() {
            writeln!(f, "{}", self.columns.iter().join(" | "))?;
        }
        for row in &self.rows {
            writeln!(f, "{}", row.iter().join(" | "))?;
        }
        write!(f, "({} rows)", self.rows.len())
    }
}

fn decode_row(row: &SqliteRow) -> Result<Row> {
    (0..row.len())
        .map(|index| {
            let raw = row.try_get_raw(index)?;
            decode_value(row, index, &raw)
        })
        .collect()
}

// SQLite is dynamically typed: decode by the storage class of the value
// itself, not the column's declared type.
fn decode_value(row: &SqliteRow, index: usize, raw: &SqliteValueRef<'_>) -> Result<Value> {
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let value = match raw.type_info().name() {
        "INTEGER" | "BOOLEAN" => Value::Integer(row.try_get_unchecked(index)?),
        "REAL" => Value::Real(row.try_get_unchecked(index)?),
        "BLOB" => Value::Blob(row.try_get_unchecked(index)?),
        _ => Value::Text(row.try_get_unchecked(index)?),
    };
    Ok(value)
}
