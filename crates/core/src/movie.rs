use serde::{Deserialize, Serialize};

use crate::id::RecordId;
use crate::resource::Resource;
use crate::validation::{Check, Rule};

/// Earliest year a film could have been released.
pub const MIN_YEAR: i64 = 1888;
pub const MAX_YEAR: i64 = 2100;

/// A row of the `movies` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: RecordId,
    pub title: String,
    pub director: String,
    pub year: i64,
}

static MOVIE_RULES: &[Rule] = &[
    Rule::new("title", Check::Required, "title is required"),
    Rule::new("title", Check::MaxLength(255), "title must be at most 255 characters"),
    Rule::new("director", Check::Required, "director is required"),
    Rule::new("director", Check::MaxLength(255), "director must be at most 255 characters"),
    Rule::new("year", Check::Required, "year is required"),
    Rule::new(
        "year",
        Check::IntegerRange {
            min: MIN_YEAR,
            max: MAX_YEAR,
        },
        "year must be an integer between 1888 and 2100",
    ),
];

impl Resource for Movie {
    const NAME: &'static str = "movie";
    const TABLE: &'static str = "movies";
    const COLUMNS: &'static [&'static str] = &["title", "director", "year"];

    fn rules() -> &'static [Rule] {
        MOVIE_RULES
    }
}
