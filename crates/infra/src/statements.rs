//! SQL templates for a resource.
//!
//! Built only from the compile-time table and column names a [`Resource`]
//! declares; request data never reaches the SQL text, only the bind list.

use cinedex_core::Resource;

/// The five statements a CRUD resource needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statements {
    pub select_all: String,
    pub select_one: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
}

impl Statements {
    pub fn for_resource<R: Resource>() -> Self {
        Self::new(R::TABLE, R::COLUMNS)
    }

    pub fn new(table: &str, columns: &[&str]) -> Self {
        let placeholders = vec!["?"; columns.len()].join(", ");
        let assignments = columns
            .iter()
            .map(|c| format!("{c} = ?"))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            select_all: format!("SELECT * FROM {table}"),
            select_one: format!("SELECT * FROM {table} WHERE id = ?"),
            insert: format!("INSERT INTO {table}({}) VALUES ({placeholders})", columns.join(", ")),
            update: format!("UPDATE {table} SET {assignments} WHERE id = ?"),
            delete: format!("DELETE FROM {table} WHERE id = ?"),
        }
    }
}
