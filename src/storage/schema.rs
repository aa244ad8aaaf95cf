//! Table schema derivation
//!
//! The exported table has no fixed SQL schema: column names come from the
//! CSV header and column types are inferred from the cell text, the way a
//! dataframe loader would coerce them.

use rusqlite::types::Value as SqlValue;

/// Storage class chosen for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    /// Stored as INTEGER 0/1
    Boolean,
    Text,
}

impl ColumnType {
    /// SQL declared type
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Integer | Self::Boolean => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
        }
    }

    fn of_cell(cell: &str) -> Option<Self> {
        if cell.is_empty() {
            return None;
        }
        if parse_bool(cell).is_some() {
            return Some(Self::Boolean);
        }
        if cell.parse::<i64>().is_ok() {
            return Some(Self::Integer);
        }
        match cell.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(Self::Real),
            _ => Some(Self::Text),
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Integer, Self::Real) | (Self::Real, Self::Integer) => Self::Real,
            _ => Self::Text,
        }
    }

    /// Converts one cell to a SQL value; empty cells become NULL
    pub fn to_sql(&self, cell: &str) -> SqlValue {
        if cell.is_empty() {
            return SqlValue::Null;
        }
        let text = || SqlValue::Text(cell.to_string());
        match self {
            Self::Integer => cell.parse().map(SqlValue::Integer).unwrap_or_else(|_| text()),
            Self::Real => cell.parse().map(SqlValue::Real).unwrap_or_else(|_| text()),
            Self::Boolean => parse_bool(cell)
                .map(|b| SqlValue::Integer(i64::from(b)))
                .unwrap_or_else(text),
            Self::Text => text(),
        }
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Infers a column type from its cells
///
/// Empty cells are ignored; a column with no values at all is TEXT.
pub fn infer_column_type<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnType {
    cells
        .into_iter()
        .filter_map(ColumnType::of_cell)
        .reduce(ColumnType::merge)
        .unwrap_or(ColumnType::Text)
}

/// Quotes an SQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Builds the CREATE TABLE statement for a set of typed columns
pub fn create_table_sql(table: &str, columns: &[(String, ColumnType)]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|(name, ty)| format!("{} {}", quote_identifier(name), ty.sql_type()))
        .collect();
    format!("CREATE TABLE {} ({})", quote_identifier(table), defs.join(", "))
}

/// Builds the INSERT statement for a table with `width` columns
pub fn insert_sql(table: &str, width: usize) -> String {
    let placeholders: Vec<String> = (1..=width).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} VALUES ({})",
        quote_identifier(table),
        placeholders.join(", ")
    )
}
