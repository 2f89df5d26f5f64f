//! sqlx-backed gateway.
//!
//! Uses the `Any` driver so the same statements run on MySQL (production)
//! and SQLite (tests, local development). Both engines use `?` placeholders.
//!
//! Columns are decoded by trying integer, real, boolean, then text. SQL NULL
//! becomes JSON `null`; any other column type is a [`DatabaseError::Decode`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::any::{AnyArguments, AnyPoolOptions, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Column, Row as _};
use tracing::instrument;

use super::{DatabaseError, ExecOutcome, Gateway, Row, SqlParam};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const SQLITE_BACKEND: &str = "SQLite";

/// Gateway over a shared sqlx `AnyPool`.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct SqlGateway {
    pool: AnyPool,
}

impl SqlGateway {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Open a pool for `url` (`mysql://…` or `sqlite://…`).
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DatabaseError> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await
            .map_err(DatabaseError::Connect)?;

        Ok(Self::new(pool))
    }

    /// Wait for checked-out connections and close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Gateway for SqlGateway {
    #[instrument(skip(self, params), fields(params = params.len()), err)]
    async fn fetch_all(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, DatabaseError> {
        let rows = bind_params(sql, params).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_json).collect()
    }

    #[instrument(skip(self, params), fields(params = params.len()), err)]
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<ExecOutcome, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let result = bind_params(sql, params).execute(&mut *conn).await?;

        let last_insert_id = match result.last_insert_id() {
            Some(id) => Some(id),
            // The SQLite `Any` backend never fills the insert id; the rowid is
            // per-connection, so ask the connection that ran the INSERT.
            None if conn.backend_name() == SQLITE_BACKEND && is_insert(sql) => Some(
                sqlx::query_scalar::<_, i64>("SELECT last_insert_rowid()")
                    .fetch_one(&mut *conn)
                    .await?,
            ),
            None => None,
        };

        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id,
        })
    }
}

fn is_insert(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|verb| verb.eq_ignore_ascii_case("insert"))
}

fn bind_params<'q>(sql: &'q str, params: &'q [SqlParam]) -> Query<'q, Any, AnyArguments<'q>> {
    params.iter().fold(sqlx::query(sql), |query, param| match param {
        SqlParam::Null => query.bind(None::<String>),
        SqlParam::Bool(b) => query.bind(*b),
        SqlParam::Int(i) => query.bind(*i),
        SqlParam::Real(f) => query.bind(*f),
        SqlParam::Text(s) => query.bind(s.as_str()),
    })
}

fn row_to_json(row: &AnyRow) -> Result<Row, DatabaseError> {
    let mut out = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, idx).map_err(|e| DatabaseError::Decode {
            column: column.name().to_string(),
            reason: e.to_string(),
        })?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn decode_column(row: &AnyRow, idx: usize) -> Result<Value, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(v.map_or(Value::Null, Value::from));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return Ok(v.map_or(Value::Null, Value::from));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return Ok(v.map_or(Value::Null, Value::Bool));
    }
    row.try_get::<Option<String>, _>(idx)
        .map(|v| v.map_or(Value::Null, Value::String))
}
