//! Infrastructure layer: database gateway, resource persistence, config.

pub mod config;
pub mod db;
pub mod statements;
pub mod store;

pub use config::{ConfigError, Settings};
pub use db::{DatabaseError, ExecOutcome, Gateway, Row, SqlGateway, SqlParam};
pub use statements::Statements;
pub use store::ResourceStore;
