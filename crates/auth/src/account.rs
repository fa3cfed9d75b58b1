use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tenant side an identity belongs to.
///
/// Serialized as the bare numeral (`0` / `1`) everywhere: in credential
/// claims, in persisted `user_data`, and as the `account_type` cookie value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccountType {
    Admin = 0,
    Client = 1,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid account type '{0}' (expected 0 or 1)")]
pub struct InvalidAccountType(pub String);

impl AccountType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The literal used as the cookie value.
    pub fn as_cookie_value(self) -> &'static str {
        match self {
            AccountType::Admin => "0",
            AccountType::Client => "1",
        }
    }
}

impl TryFrom<u8> for AccountType {
    type Error = InvalidAccountType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountType::Admin),
            1 => Ok(AccountType::Client),
            other => Err(InvalidAccountType(other.to_string())),
        }
    }
}

impl From<AccountType> for u8 {
    fn from(value: AccountType) -> Self {
        value.as_u8()
    }
}

impl FromStr for AccountType {
    type Err = InvalidAccountType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(AccountType::Admin),
            "1" => Ok(AccountType::Client),
            other => Err(InvalidAccountType(other.to_string())),
        }
    }
}

impl core::fmt::Display for AccountType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_cookie_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_numeral() {
        assert_eq!(serde_json::to_string(&AccountType::Admin).unwrap(), "0");
        assert_eq!(serde_json::to_string(&AccountType::Client).unwrap(), "1");
    }

    #[test]
    fn rejects_unknown_numerals() {
        assert!(serde_json::from_str::<AccountType>("2").is_err());
        assert!("7".parse::<AccountType>().is_err());
        assert!("".parse::<AccountType>().is_err());
    }

    #[test]
    fn parses_cookie_values() {
        assert_eq!("0".parse::<AccountType>().unwrap(), AccountType::Admin);
        assert_eq!(" 1 ".parse::<AccountType>().unwrap(), AccountType::Client);
    }
}
