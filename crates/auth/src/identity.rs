use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

use crate::AccountType;

/// Display name used when a credential carries no `name` claim.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Permission identifier (e.g. "users.read").
///
/// Opaque at this layer; only carried through for display and for
/// downstream policy checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The structured user record derived from a credential.
///
/// This is what gets persisted as `user_data` and what the UI displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    pub name: String,

    pub email: String,

    #[serde(alias = "accountType")]
    pub account_type: AccountType,

    /// Numeric role as issued by the backend (e.g. 2 = super admin).
    pub role: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<Permission>>,
}

impl Identity {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|perms| perms.iter().any(|p| p.as_str() == permission))
    }
}

/// Accept ids issued either as JSON strings or as JSON numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Uint(n) => n.to_string(),
    })
}
