//! Candidate values checked against the schema.
//!
//! Purely syntactic: nothing here looks at the filesystem or asks snapper
//! anything. An accepted value remembers which setting it was checked
//! against, so the writer cannot put it under a different key.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use super::schema::{self, SettingSpec, ValueType};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SettingValue {
    Bool(bool),
    Integer(u64),
    Unlimited,
    Seconds(u64),
    Choice(&'static str),
}

/// Canonical text written between the quotes.
impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(true) => f.write_str("yes"),
            SettingValue::Bool(false) => f.write_str("no"),
            SettingValue::Integer(n) | SettingValue::Seconds(n) => write!(f, "{n}"),
            SettingValue::Unlimited => f.write_str("unlimited"),
            SettingValue::Choice(c) => f.write_str(c),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    #[error("expected 'yes' or 'no'")]
    NotBoolean,

    #[error("expected a whole number")]
    NotInteger,

    #[error("must be at least {min}")]
    BelowMinimum { min: u64 },

    #[error("number too large")]
    TooLarge,

    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    #[error("expected one of: {}", allowed.join(", "))]
    NotAllowed { allowed: &'static [&'static str] },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accepted {
    pub spec: &'static SettingSpec,
    pub value: SettingValue,
}

impl Accepted {
    pub fn key(&self) -> &'static str {
        self.spec.key
    }
}

/// Validate `raw` for `key`, failing with `UnknownKey` for keys outside
/// the schema.
pub fn validate(key: &str, raw: &str) -> Result<Accepted> {
    let spec = schema::lookup(key).ok_or_else(|| Error::UnknownKey(key.to_string()))?;

    let value = check(spec.value_type, raw).map_err(|violation| Error::ValidationFailed {
        key: key.to_string(),
        value: raw.to_string(),
        violation,
    })?;

    Ok(Accepted { spec, value })
}

pub fn check(value_type: ValueType, raw: &str) -> std::result::Result<SettingValue, Violation> {
    match value_type {
        ValueType::Boolean => match raw {
            "yes" => Ok(SettingValue::Bool(true)),
            "no" => Ok(SettingValue::Bool(false)),
            _ => Err(Violation::NotBoolean),
        },
        ValueType::PositiveInteger { unlimited } => {
            if unlimited && raw == "unlimited" {
                return Ok(SettingValue::Unlimited);
            }
            at_least(raw, 1).map(SettingValue::Integer)
        }
        ValueType::NonNegativeInteger => at_least(raw, 0).map(SettingValue::Integer),
        ValueType::Duration => seconds(raw).map(SettingValue::Seconds),
        ValueType::Enum(allowed) => allowed
            .iter()
            .copied()
            .find(|a| *a == raw)
            .map(SettingValue::Choice)
            .ok_or(Violation::NotAllowed { allowed }),
    }
}

fn at_least(raw: &str, min: u64) -> std::result::Result<u64, Violation> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Violation::NotInteger);
    }
    if negative {
        return Err(Violation::BelowMinimum { min });
    }

    let n = digits.parse::<u64>().map_err(|_| Violation::TooLarge)?;
    if n < min {
        return Err(Violation::BelowMinimum { min });
    }
    Ok(n)
}

fn seconds(raw: &str) -> std::result::Result<u64, Violation> {
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<u64>().map_err(|_| Violation::TooLarge);
    }

    let span: Duration = humantime::parse_duration(raw)
        .map_err(|e| Violation::InvalidDuration(e.to_string()))?;
    if span.subsec_nanos() != 0 {
        return Err(Violation::InvalidDuration("must be whole seconds".to_string()));
    }
    Ok(span.as_secs())
}
