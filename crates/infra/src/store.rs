//! Generic CRUD persistence over the gateway.
//!
//! One `ResourceStore<R>` per entity. Every method issues exactly one
//! statement and reports outcomes in domain terms (`Option`, `bool`); mapping
//! to HTTP happens in the API crate.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value};

use cinedex_core::{RecordId, Resource};

use crate::db::{DatabaseError, Gateway, SqlParam};
use crate::statements::Statements;

pub struct ResourceStore<R> {
    gateway: Arc<dyn Gateway>,
    statements: Statements,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            statements: self.statements.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            statements: Statements::for_resource::<R>(),
            _record: PhantomData,
        }
    }

    /// Every row of the table, in database order.
    pub async fn list(&self) -> Result<Vec<R>, DatabaseError> {
        let rows = self.gateway.fetch_all(&self.statements.select_all, &[]).await?;
        rows.into_iter().map(decode_record).collect()
    }

    /// The row with `id`, or `None` when no row matches.
    pub async fn get(&self, id: RecordId) -> Result<Option<R>, DatabaseError> {
        let rows = self
            .gateway
            .fetch_all(&self.statements.select_one, &[id.into()])
            .await?;

        match rows.len() {
            0 => Ok(None),
            1 => rows.into_iter().next().map(decode_record).transpose(),
            n => Err(DatabaseError::Other(format!(
                "{n} {} rows share id {id}",
                R::NAME
            ))),
        }
    }

    /// Insert a row built from `body` and return the generated id.
    pub async fn insert(&self, body: &Map<String, Value>) -> Result<RecordId, DatabaseError> {
        let params = column_params(R::COLUMNS, body);
        let outcome = self.gateway.execute(&self.statements.insert, &params).await?;
        outcome
            .last_insert_id
            .map(RecordId::new)
            .ok_or(DatabaseError::MissingInsertId)
    }

    /// Overwrite every column of row `id`. Returns `false` when no row matched.
    pub async fn update(&self, id: RecordId, body: &Map<String, Value>) -> Result<bool, DatabaseError> {
        let mut params = column_params(R::COLUMNS, body);
        params.push(id.into());
        let outcome = self.gateway.execute(&self.statements.update, &params).await?;
        Ok(outcome.rows_affected > 0)
    }

    /// Remove row `id`. Returns `false` when no row matched.
    pub async fn delete(&self, id: RecordId) -> Result<bool, DatabaseError> {
        let outcome = self
            .gateway
            .execute(&self.statements.delete, &[id.into()])
            .await?;
        Ok(outcome.rows_affected > 0)
    }
}

/// Bind list for `columns`, in order. Absent fields bind SQL NULL.
fn column_params(columns: &[&str], body: &Map<String, Value>) -> Vec<SqlParam> {
    columns
        .iter()
        .map(|c| body.get(*c).map_or(SqlParam::Null, SqlParam::from_json))
        .collect()
}

fn decode_record<R: Resource>(row: Map<String, Value>) -> Result<R, DatabaseError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}
