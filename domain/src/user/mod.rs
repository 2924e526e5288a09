//! GitLab user record and search field

use crate::grouping::field::FieldAccess;
use serde::{Deserialize, Serialize};

/// A user account as returned by the GitLab users API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

impl User {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: None,
            name: String::new(),
            state: "active".to_string(),
            web_url: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn is_blocked(&self) -> bool {
        self.state == "blocked"
    }

    /// Exact match on a search field; emails compare case-insensitively
    pub fn matches(&self, field: UserField, value: &str) -> bool {
        match field {
            UserField::Username => self.username == value,
            UserField::Name => self.name == value,
            UserField::Email => self
                .email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(value)),
        }
    }
}

/// Emails are keyed lowercase, the same way [`User::matches`] compares them
impl FieldAccess for User {
    const FIELDS: &'static [&'static str] = &["id", "username", "email", "name", "state"];

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "username" => Some(self.username.clone()),
            "email" => self.email.as_deref().map(str::to_lowercase),
            "name" => Some(self.name.clone()),
            "state" => Some(self.state.clone()),
            _ => None,
        }
    }
}

/// Field a user search is keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserField {
    Email,
    Username,
    Name,
}

impl UserField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::Email => "email",
            UserField::Username => "username",
            UserField::Name => "name",
        }
    }
}

impl std::fmt::Display for UserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user search against one host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserQuery {
    pub by: UserField,
    pub value: String,
}

impl UserQuery {
    pub fn new(by: UserField, value: impl Into<String>) -> Self {
        Self {
            by,
            value: value.into(),
        }
    }

    /// Stable key used for cache lookups
    pub fn cache_key(&self) -> String {
        format!("users-{}-{}", self.by, self.value)
    }
}
