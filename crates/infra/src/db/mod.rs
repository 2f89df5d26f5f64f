//! Database gateway boundary.
//!
//! The rest of the workspace talks to SQL only through [`Gateway`]: a
//! statement template with positional `?` placeholders plus an ordered list
//! of scalar parameters. One call is one autonomous statement; nothing here
//! retries or opens transactions.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod sql;

pub use sql::SqlGateway;

/// One result row: column name -> scalar JSON value (`null` for SQL NULL).
pub type Row = Map<String, Value>;

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

impl SqlParam {
    /// Map a JSON body value onto a bind parameter.
    ///
    /// Arrays and objects are bound as their JSON text; the column type decides
    /// whether the database accepts them.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => SqlParam::Null,
            Value::Bool(b) => SqlParam::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlParam::Int(i),
                None => n.as_f64().map_or(SqlParam::Null, SqlParam::Real),
            },
            Value::String(s) => SqlParam::Text(s.clone()),
            other => SqlParam::Text(other.to_string()),
        }
    }
}

impl From<cinedex_core::RecordId> for SqlParam {
    fn from(value: cinedex_core::RecordId) -> Self {
        SqlParam::Int(value.get())
    }
}

/// Metadata of a statement that returns no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecOutcome {
    /// Rows matched by an UPDATE/DELETE, or inserted by an INSERT.
    pub rows_affected: u64,
    /// Surrogate key generated by an INSERT, when the driver reports one.
    pub last_insert_id: Option<i64>,
}

/// Any failure coming out of the persistence layer.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("failed to connect to the database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("statement failed: {0}")]
    Statement(#[from] sqlx::Error),

    #[error("column `{column}` could not be decoded: {reason}")]
    Decode { column: String, reason: String },

    #[error("row does not match the record shape: {0}")]
    Record(#[from] serde_json::Error),

    #[error("insert did not report a generated id")]
    MissingInsertId,

    /// Raised by gateway doubles and adapters that are not backed by sqlx.
    #[error("{0}")]
    Other(String),
}

/// Parameterised statement execution against a connection pool.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Run a row-returning statement.
    async fn fetch_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, DatabaseError>;

    /// Run a statement for its side effect and report what it touched.
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<ExecOutcome, DatabaseError>;
}

#[async_trait]
impl<G> Gateway for Arc<G>
where
    G: Gateway + ?Sized,
{
    async fn fetch_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, DatabaseError> {
        (**self).fetch_all(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<ExecOutcome, DatabaseError> {
        (**self).execute(sql, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_map_to_params() {
        assert_eq!(SqlParam::from_json(&json!(null)), SqlParam::Null);
        assert_eq!(SqlParam::from_json(&json!(true)), SqlParam::Bool(true));
        assert_eq!(SqlParam::from_json(&json!(1979)), SqlParam::Int(1979));
        assert_eq!(SqlParam::from_json(&json!(2.5)), SqlParam::Real(2.5));
        assert_eq!(SqlParam::from_json(&json!("Paris")), SqlParam::Text("Paris".into()));
    }

    #[test]
    fn structured_values_bind_as_json_text() {
        assert_eq!(
            SqlParam::from_json(&json!(["a", 1])),
            SqlParam::Text(r#"["a",1]"#.into())
        );
    }

    #[test]
    fn record_id_binds_as_integer() {
        let id = cinedex_core::RecordId::new(9);
        assert_eq!(SqlParam::from(id), SqlParam::Int(9));
    }
}
