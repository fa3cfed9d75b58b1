//! Session persistence.
//!
//! Durable storage is authoritative for *who* the user is (identity display);
//! the `account_type` cookie is authoritative for navigation-time gating.
//! [`SessionStore::reconcile_with`] is the only place the two are brought into
//! agreement, and both the write path and the resume path go through it.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use astexo_auth::{AccountType, AuthCookie, Identity};

use crate::cookies::{CookieChannel, CookieError};
use crate::storage::{AUTH_TOKEN_KEY, DurableStorage, StorageError, USER_DATA_KEY};

/// Credential plus the identity decoded from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub credential: String,
    pub identity: Identity,
}

/// What reconciliation had to do to bring the cookie in line with storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    InSync,
    /// Storage held a session but the cookie was missing.
    CookieRestored,
    /// The cookie named a different (or unparseable) account type.
    CookieCorrected,
    /// A cookie survived without a stored session.
    StaleCookieCleared,
    NoSession,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cookie(#[from] CookieError),

    #[error("failed to serialize identity: {0}")]
    Serialize(String),
}

pub struct SessionStore {
    storage: Rc<dyn DurableStorage>,
    cookies: Rc<dyn CookieChannel>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn DurableStorage>, cookies: Rc<dyn CookieChannel>) -> Self {
        Self { storage, cookies }
    }

    /// Persist the record, then mirror it into the cookie.
    ///
    /// Returns only after the cookie write completed. On a storage failure the
    /// partial write is rolled back.
    pub async fn write(&self, record: &SessionRecord) -> Result<Reconciliation, SessionError> {
        let user_data = serde_json::to_string(&record.identity)
            .map_err(|e| SessionError::Serialize(e.to_string()))?;

        let stored = self
            .storage
            .set_item(AUTH_TOKEN_KEY, &record.credential)
            .and_then(|()| self.storage.set_item(USER_DATA_KEY, &user_data));

        if let Err(e) = stored {
            if let Err(cleanup) = self.clear_storage() {
                tracing::warn!(error = %cleanup, "failed to roll back partial session write");
            }
            return Err(e.into());
        }

        self.reconcile_with(Some(record)).await
    }

    /// Read the persisted session.
    ///
    /// Missing keys mean "no session". A corrupt `user_data` value is removed
    /// together with the credential and also reads as "no session".
    pub fn read(&self) -> Option<SessionRecord> {
        let credential = self.read_key(AUTH_TOKEN_KEY)?;
        let user_data = self.read_key(USER_DATA_KEY)?;

        match serde_json::from_str::<Identity>(&user_data) {
            Ok(identity) => Some(SessionRecord {
                credential,
                identity,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "persisted session is corrupt; clearing it");
                if let Err(e) = self.clear_storage() {
                    tracing::warn!(error = %e, "failed to clear corrupt session");
                }
                None
            }
        }
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!(key, error = %e, "durable storage read failed");
                None
            }
        }
    }

    /// Remove the persisted session and the cookie. Idempotent.
    ///
    /// Both halves are attempted even if the first fails; the first error is
    /// returned.
    pub async fn clear(&self) -> Result<(), SessionError> {
        let storage = self.clear_storage();
        let cookie = self.cookies.delete_auth_cookie().await;

        storage?;
        cookie?;
        Ok(())
    }

    fn clear_storage(&self) -> Result<(), StorageError> {
        let token = self.storage.remove_item(AUTH_TOKEN_KEY);
        let user = self.storage.remove_item(USER_DATA_KEY);
        token.and(user)
    }

    /// Read storage, then reconcile the cookie against it.
    pub async fn reconcile(&self) -> Result<Reconciliation, SessionError> {
        let record = self.read();
        self.reconcile_with(record.as_ref()).await
    }

    /// Bring the cookie in line with `record` (the stored session, if any).
    pub async fn reconcile_with(
        &self,
        record: Option<&SessionRecord>,
    ) -> Result<Reconciliation, SessionError> {
        let cookie = self.cookies.read_auth_cookie();
        let cookie_account = cookie.as_deref().map(AuthCookie::parse_value);

        let outcome = match (record, cookie_account) {
            (Some(record), Some(Ok(account))) if account == record.identity.account_type => {
                Reconciliation::InSync
            }
            (Some(record), None) => {
                self.set_cookie(record.identity.account_type).await?;
                Reconciliation::CookieRestored
            }
            (Some(record), Some(_)) => {
                self.set_cookie(record.identity.account_type).await?;
                Reconciliation::CookieCorrected
            }
            (None, Some(_)) => {
                self.cookies.delete_auth_cookie().await?;
                Reconciliation::StaleCookieCleared
            }
            (None, None) => Reconciliation::NoSession,
        };

        if !matches!(outcome, Reconciliation::InSync | Reconciliation::NoSession) {
            tracing::info!(?outcome, "reconciled auth cookie with stored session");
        }
        Ok(outcome)
    }

    async fn set_cookie(&self, account_type: AccountType) -> Result<(), CookieError> {
        self.cookies.set_auth_cookie(account_type).await
    }
}
