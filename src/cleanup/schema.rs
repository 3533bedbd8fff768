//! Every cleanup setting snapkeep knows how to edit.
//!
//! This table is the only place keys and their constraints are declared;
//! validation and the "editable settings" listing both read from it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// literal `yes` or `no`
    Boolean,
    /// `> 0`, optionally also the literal `unlimited`
    PositiveInteger { unlimited: bool },
    NonNegativeInteger,
    /// whole seconds, written back as a plain number
    Duration,
    Enum(&'static [&'static str]),
}

impl ValueType {
    pub fn describe(&self) -> String {
        match self {
            ValueType::Boolean => "yes|no".to_string(),
            ValueType::PositiveInteger { unlimited: true } => "integer > 0 or 'unlimited'".to_string(),
            ValueType::PositiveInteger { unlimited: false } => "integer > 0".to_string(),
            ValueType::NonNegativeInteger => "integer >= 0".to_string(),
            ValueType::Duration => "seconds or span (e.g. 30m)".to_string(),
            ValueType::Enum(allowed) => allowed.join("|"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingSpec {
    pub key: &'static str,
    pub value_type: ValueType,
    /// snapper's own default when the key is absent
    pub default: &'static str,
    pub description: &'static str,
}

const fn spec(
    key: &'static str,
    value_type: ValueType,
    default: &'static str,
    description: &'static str,
) -> SettingSpec {
    SettingSpec {
        key,
        value_type,
        default,
        description,
    }
}

const LIMIT: ValueType = ValueType::PositiveInteger { unlimited: true };

pub static SCHEMA: &[SettingSpec] = &[
    spec("TIMELINE_CREATE", ValueType::Boolean, "yes", "create hourly timeline snapshots"),
    spec("TIMELINE_CLEANUP", ValueType::Boolean, "yes", "run the timeline cleanup algorithm"),
    spec("TIMELINE_MIN_AGE", ValueType::Duration, "1800", "minimum age before a timeline snapshot may be removed"),
    spec("TIMELINE_LIMIT_HOURLY", ValueType::NonNegativeInteger, "10", "hourly timeline snapshots to keep"),
    spec("TIMELINE_LIMIT_DAILY", ValueType::NonNegativeInteger, "10", "daily timeline snapshots to keep"),
    spec("TIMELINE_LIMIT_WEEKLY", ValueType::NonNegativeInteger, "0", "weekly timeline snapshots to keep"),
    spec("TIMELINE_LIMIT_MONTHLY", ValueType::NonNegativeInteger, "10", "monthly timeline snapshots to keep"),
    spec("TIMELINE_LIMIT_YEARLY", ValueType::NonNegativeInteger, "10", "yearly timeline snapshots to keep"),
    spec("NUMBER_CLEANUP", ValueType::Boolean, "yes", "run the number cleanup algorithm"),
    spec("NUMBER_MIN_AGE", ValueType::Duration, "1800", "minimum age before a numbered snapshot may be removed"),
    spec("NUMBER_LIMIT", LIMIT, "50", "numbered snapshots to keep"),
    spec("NUMBER_LIMIT_IMPORTANT", LIMIT, "10", "important numbered snapshots to keep"),
    spec("EMPTY_PRE_POST_CLEANUP", ValueType::Boolean, "yes", "remove pre/post pairs without changes"),
    spec("EMPTY_PRE_POST_MIN_AGE", ValueType::NonNegativeInteger, "1800", "minimum age in seconds before an empty pair may be removed"),
];

pub fn lookup(key: &str) -> Option<&'static SettingSpec> {
    SCHEMA.iter().find(|s| s.key == key)
}

pub fn is_known(key: &str) -> bool {
    lookup(key).is_some()
}
