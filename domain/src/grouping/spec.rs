//! Grouping configuration supplied by the caller

use super::field::FieldAccess;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in a grouping configuration, raised before dispatch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupSpecError {
    #[error("unknown group field '{field}' (accepted: {})", .accepted.join(", "))]
    UnknownField {
        field: String,
        accepted: Vec<String>,
    },

    #[error("invalid order '{value}' (accepted: {})", GroupOrder::ACCEPTED.join(", "))]
    InvalidOrder { value: String },
}

/// Output ordering of groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupOrder {
    /// Ascending by key
    #[default]
    KeyAscending,
    /// Descending by element count, ties by ascending key
    CountDescending,
}

impl GroupOrder {
    pub const ACCEPTED: &'static [&'static str] = &["key", "count"];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupOrder::KeyAscending => "key",
            GroupOrder::CountDescending => "count",
        }
    }
}

impl std::fmt::Display for GroupOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GroupOrder {
    type Err = GroupSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "key" | "key-ascending" => Ok(GroupOrder::KeyAscending),
            "count" | "count-descending" => Ok(GroupOrder::CountDescending),
            _ => Err(GroupSpecError::InvalidOrder {
                value: s.to_string(),
            }),
        }
    }
}

/// Which payload field to group by, and how to order the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub field: String,
    pub order: GroupOrder,
}

impl GroupSpec {
    pub fn new(field: impl Into<String>, order: GroupOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn by_key(field: impl Into<String>) -> Self {
        Self::new(field, GroupOrder::KeyAscending)
    }

    pub fn by_count(field: impl Into<String>) -> Self {
        Self::new(field, GroupOrder::CountDescending)
    }

    /// Check the field against the payload type's accessor list
    pub fn validate<P: FieldAccess>(&self) -> Result<(), GroupSpecError> {
        if P::has_field(&self.field) {
            Ok(())
        } else {
            Err(GroupSpecError::UnknownField {
                field: self.field.clone(),
                accepted: P::FIELDS.iter().map(|f| f.to_string()).collect(),
            })
        }
    }
}
