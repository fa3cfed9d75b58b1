//! In-process credential exchange for local development and tests.
//!
//! Issues unsigned credentials for a fixed set of demo accounts. Nothing
//! leaves the process, and every call is counted so callers can assert that
//! a flow did (or did not) contact the backend.

use std::cell::Cell;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use astexo_auth::{AccountType, CredentialClaims, Permission, encode_unsigned};

use crate::api::{ApiError, CredentialExchange, LoginRequest, LoginResponse};

const CREDENTIAL_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Clone)]
enum Issue {
    Claims(CredentialClaims),
    /// Hand back this exact token (possibly empty or malformed).
    Raw(String),
}

#[derive(Debug, Clone)]
struct MockAccount {
    email: String,
    password: String,
    issue: Issue,
}

#[derive(Debug, Default)]
pub struct MockCredentialExchange {
    accounts: Vec<MockAccount>,
    outage: Option<ApiError>,
    calls: Cell<usize>,
}

impl MockCredentialExchange {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The two demo accounts: `admin@astexo.com` / `admin123` and
    /// `user@astexo.com` / `user123`.
    pub fn with_demo_accounts() -> Self {
        Self::empty()
            .with_account(
                "admin@astexo.com",
                "admin123",
                CredentialClaims {
                    id: "1".to_string(),
                    name: Some("John Admin".to_string()),
                    email: "admin@astexo.com".to_string(),
                    role: 2,
                    account_type: AccountType::Admin,
                    permissions: Some(
                        ["users.read", "users.write", "users.delete", "analytics.read", "settings.write"]
                            .into_iter()
                            .map(Permission::new)
                            .collect(),
                    ),
                    iat: None,
                    exp: None,
                },
            )
            .with_account(
                "user@astexo.com",
                "user123",
                CredentialClaims {
                    id: "2".to_string(),
                    name: Some("John User".to_string()),
                    email: "user@astexo.com".to_string(),
                    role: 0,
                    account_type: AccountType::Client,
                    permissions: None,
                    iat: None,
                    exp: None,
                },
            )
    }

    pub fn with_account(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        claims: CredentialClaims,
    ) -> Self {
        self.accounts.push(MockAccount {
            email: email.into(),
            password: password.into(),
            issue: Issue::Claims(claims),
        });
        self
    }

    /// Accept these credentials but answer with `token` verbatim.
    pub fn with_raw_token(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.accounts.push(MockAccount {
            email: email.into(),
            password: password.into(),
            issue: Issue::Raw(token.into()),
        });
        self
    }

    /// Fail every call with `error`, as an unreachable backend would.
    pub fn with_outage(mut self, error: ApiError) -> Self {
        self.outage = Some(error);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl CredentialExchange for MockCredentialExchange {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.calls.set(self.calls.get() + 1);

        if let Some(err) = &self.outage {
            return Err(err.clone());
        }

        let account = self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(request.email.trim()) && a.password == request.password)
            .ok_or_else(|| ApiError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            })?;

        let token = match &account.issue {
            Issue::Raw(token) => token.clone(),
            Issue::Claims(claims) => {
                let now = Utc::now();
                let mut claims = claims.clone();
                claims.iat = Some(now.timestamp());
                claims.exp = Some((now + Duration::hours(CREDENTIAL_LIFETIME_HOURS)).timestamp());
                encode_unsigned(&claims)
            }
        };

        Ok(LoginResponse {
            token: Some(token),
            message: Some("Login successful".to_string()),
        })
    }
}
