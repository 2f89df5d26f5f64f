use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::resource::Resource;
use crate::validation::{Check, Rule};

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub city: String,
    pub language: String,
}

// Only shape is checked here. Missing columns are left to the table's
// NOT NULL constraints, which surface as a 500 from the store.
static USER_RULES: &[Rule] = &[
    Rule::new("email", Check::Email, "email must be a valid email address"),
    Rule::new("firstname", Check::MaxLength(255), "firstname must be at most 255 characters"),
    Rule::new("lastname", Check::MaxLength(255), "lastname must be at most 255 characters"),
];

impl Resource for User {
    const NAME: &'static str = "user";
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["firstname", "lastname", "email", "city", "language"];

    fn rules() -> &'static [Rule] {
        USER_RULES
    }
}
