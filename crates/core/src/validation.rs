//! Declarative request-body validation.
//!
//! Each resource owns a static rule table (`field -> check -> message`).
//! [`validate`] evaluates every rule against a JSON object and returns *all*
//! failures; it never stops at the first one.
//!
//! Only [`Check::Required`] looks at absence. Every other check passes when
//! the field is missing or `null`, so a rule table constrains the shape of
//! what is sent without forcing every column to be present.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// Longest address accepted by [`Check::Email`] (RFC 5321 path limit).
const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

/// A single predicate applied to one body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Field must be present, not `null`, and not a blank string.
    Required,
    /// String with email-address syntax.
    Email,
    /// At most this many characters once rendered as text.
    MaxLength(usize),
    /// Integer (JSON number or numeric string) within `min..=max`.
    IntegerRange { min: i64, max: i64 },
}

impl Check {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Check::Required => is_filled(value),
            Check::Email => value.as_str().is_some_and(is_email),
            Check::MaxLength(max) => scalar_text(value).is_some_and(|s| s.chars().count() <= max),
            Check::IntegerRange { min, max } => {
                as_integer(value).is_some_and(|n| (min..=max).contains(&n))
            }
        }
    }
}

/// One row of a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            check,
            message,
        }
    }
}

/// A failed rule, reported back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value,
        }
    }
}

/// Evaluate every rule against `body`, in table order.
pub fn validate(rules: &[Rule], body: &Map<String, Value>) -> Vec<Violation> {
    rules
        .iter()
        .filter_map(|rule| {
            let value = body.get(rule.field).filter(|v| !v.is_null());
            let passed = match (rule.check, value) {
                (Check::Required, v) => v.is_some_and(is_filled),
                (_, None) => true,
                (check, Some(v)) => check.accepts(v),
            };
            (!passed).then(|| Violation::new(rule.field, rule.message, value.cloned()))
        })
        .collect()
}

/// Email-address syntax check used by [`Check::Email`].
pub fn is_email(s: &str) -> bool {
    s.len() <= MAX_EMAIL_LEN && EMAIL_RE.is_match(s)
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
