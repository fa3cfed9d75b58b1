//! The `account_type` cookie contract.
//!
//! The cookie mirrors the persisted session's account type so the edge guard
//! can gate navigation before any page code runs. It is readable from client
//! script (not HttpOnly) because the client also branches on it.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AccountType, InvalidAccountType};

pub const AUTH_COOKIE_NAME: &str = "account_type";

/// Seven days.
pub const AUTH_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// Deployment environment; only production marks the cookie `Secure`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "local" | "test" => Ok(Environment::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// A fully attributed `account_type` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthCookie {
    pub account_type: AccountType,
    pub http_only: bool,
    pub secure: bool,
    pub max_age_secs: u64,
}

impl AuthCookie {
    pub fn new(account_type: AccountType, environment: Environment) -> Self {
        Self {
            account_type,
            http_only: false,
            secure: environment.is_production(),
            max_age_secs: AUTH_COOKIE_MAX_AGE_SECS,
        }
    }

    pub fn value(&self) -> &'static str {
        self.account_type.as_cookie_value()
    }

    /// Render as a `Set-Cookie` header value (also valid for
    /// `document.cookie`).
    pub fn to_header_value(&self) -> String {
        let mut out = format!(
            "{AUTH_COOKIE_NAME}={}; Path=/; Max-Age={}; SameSite=Lax",
            self.value(),
            self.max_age_secs
        );
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        out
    }

    /// Header value that deletes the cookie.
    pub fn removal_header_value(environment: Environment) -> String {
        let mut out = format!("{AUTH_COOKIE_NAME}=; Path=/; Max-Age=0; SameSite=Lax");
        if environment.is_production() {
            out.push_str("; Secure");
        }
        out
    }

    /// Parse a raw cookie value back into the account type it carries.
    pub fn parse_value(raw: &str) -> Result<AccountType, InvalidAccountType> {
        raw.parse()
    }
}

/// Find the `account_type` value in a `Cookie:` header or `document.cookie`
/// string (`a=1; account_type=0; b=2`).
pub fn find_auth_cookie(cookie_header: &str) -> Option<&str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == AUTH_COOKIE_NAME)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
