//! `cinedex-core`: domain records and request validation.
//!
//! This crate contains **pure domain** code (no HTTP, no SQL execution).

pub mod error;
pub mod id;
pub mod movie;
pub mod resource;
pub mod user;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use movie::Movie;
pub use resource::Resource;
pub use user::User;
pub use validation::{Check, Rule, Violation, validate};
