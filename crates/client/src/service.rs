//! The authentication state machine.
//!
//! ```text
//!   Loading ──init()──▶ Authenticated | Unauthenticated
//!   Unauthenticated ──login()──▶ Loading ──▶ Authenticated   (success)
//!                                        └─▶ Unauthenticated (failure)
//!   * ──logout()──▶ Unauthenticated, navigate to "/"
//! ```
//!
//! One `AuthService` is constructed at application start and handed to the
//! views that need it; there is no module-level auth state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use astexo_auth::{
    Capability, DecodeError, Identity, LANDING, decode_claims, decode_identity, has_capability,
    home_route, is_admin,
};

use crate::api::{ApiError, CredentialExchange, LoginRequest};
use crate::gate::{GateDecision, evaluate_gate};
use crate::session::{SessionError, SessionRecord, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Loading,
    Unauthenticated,
    Authenticated,
}

/// Result of a login attempt as seen by the UI.
///
/// Failures carry no detail: the form shows a generic "invalid credentials"
/// message whatever went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl LoginOutcome {
    pub fn succeeded(redirect_to: impl Into<String>) -> Self {
        Self {
            success: true,
            redirect_to: Some(redirect_to.into()),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            redirect_to: None,
        }
    }
}

/// Client-side navigation.
pub trait Navigator {
    fn navigate(&self, to: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str),
{
    fn navigate(&self, to: &str) {
        self(to)
    }
}

#[derive(Debug, Error)]
enum LoginError {
    #[error("a login is already in flight")]
    InFlight,

    #[error("auth service has been disposed")]
    Disposed,

    #[error("credential exchange failed: {0}")]
    Exchange(#[from] ApiError),

    #[error("credential exchange returned no credential")]
    EmptyCredential,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to persist session: {0}")]
    Session(#[from] SessionError),
}

/// Resets the in-flight flag however the login attempt ends.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct AuthService {
    exchange: Rc<dyn CredentialExchange>,
    session: SessionStore,
    navigator: Rc<dyn Navigator>,
    status: Cell<AuthStatus>,
    identity: RefCell<Option<Identity>>,
    login_in_flight: Cell<bool>,
    disposed: Cell<bool>,
}

impl AuthService {
    /// Starts in [`AuthStatus::Loading`]; call [`AuthService::init`] once
    /// mounted.
    pub fn new(
        exchange: Rc<dyn CredentialExchange>,
        session: SessionStore,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            exchange,
            session,
            navigator,
            status: Cell::new(AuthStatus::Loading),
            identity: RefCell::new(None),
            login_in_flight: Cell::new(false),
            disposed: Cell::new(false),
        }
    }

    /// Silent session resume: restore the identity from durable storage
    /// without contacting the backend, and re-derive the cookie from it.
    pub async fn init(&self) {
        self.status.set(AuthStatus::Loading);

        let record = self.session.read();
        if let Err(e) = self.session.reconcile_with(record.as_ref()).await {
            // Storage stays authoritative for the in-page identity; only the
            // edge guard is affected by a failed cookie write.
            tracing::warn!(error = %e, "failed to reconcile auth cookie during resume");
        }

        match record {
            Some(record) => {
                warn_if_expired(&record.credential);
                tracing::info!(user_id = %record.identity.id, "resumed session");
                *self.identity.borrow_mut() = Some(record.identity);
                self.status.set(AuthStatus::Authenticated);
            }
            None => {
                *self.identity.borrow_mut() = None;
                self.status.set(AuthStatus::Unauthenticated);
            }
        }
    }

    /// Drop in-memory state. The persisted session is left for the next
    /// mount; further logins are refused.
    pub fn dispose(&self) {
        self.disposed.set(true);
        *self.identity.borrow_mut() = None;
        self.status.set(AuthStatus::Unauthenticated);
    }

    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let attempt = Uuid::now_v7();
        let span = tracing::info_span!("login", %attempt);
        self.login_attempt(email, password).instrument(span).await
    }

    async fn login_attempt(&self, email: &str, password: &str) -> LoginOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.login_in_flight) else {
            tracing::warn!(error = %LoginError::InFlight, "login rejected");
            return LoginOutcome::failed();
        };

        let previous = self.status.replace(AuthStatus::Loading);

        match self.exchange_and_persist(email, password).await {
            Ok(identity) => {
                let redirect_to = home_route(identity.account_type);
                tracing::info!(user_id = %identity.id, redirect_to, "login succeeded");
                *self.identity.borrow_mut() = Some(identity);
                self.status.set(AuthStatus::Authenticated);
                LoginOutcome::succeeded(redirect_to)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                if matches!(e, LoginError::Session(_)) {
                    // The half-written session was torn down.
                    *self.identity.borrow_mut() = None;
                    self.status.set(AuthStatus::Unauthenticated);
                } else if previous == AuthStatus::Authenticated && self.identity.borrow().is_some() {
                    self.status.set(AuthStatus::Authenticated);
                } else {
                    self.status.set(AuthStatus::Unauthenticated);
                }
                LoginOutcome::failed()
            }
        }
    }

    async fn exchange_and_persist(&self, email: &str, password: &str) -> Result<Identity, LoginError> {
        if self.disposed.get() {
            return Err(LoginError::Disposed);
        }

        let response = self.exchange.login(&LoginRequest::new(email, password)).await?;

        let credential = response
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or(LoginError::EmptyCredential)?;

        let identity = decode_identity(&credential)?;
        let record = SessionRecord {
            credential,
            identity,
        };

        if let Err(e) = self.session.write(&record).await {
            if let Err(cleanup) = self.session.clear().await {
                tracing::warn!(error = %cleanup, "failed to tear down partial session");
            }
            return Err(e.into());
        }

        Ok(record.identity)
    }

    /// Tear down storage and cookie, forget the identity, then go to `/`.
    ///
    /// Safe to call when already logged out.
    pub async fn logout(&self) {
        if let Err(e) = self.session.clear().await {
            tracing::warn!(error = %e, "session teardown incomplete");
        }

        let previous = self.identity.borrow_mut().take();
        self.status.set(AuthStatus::Unauthenticated);

        if let Some(identity) = previous {
            tracing::info!(user_id = %identity.id, "logged out");
        }
        self.navigator.navigate(LANDING);
    }

    pub fn status(&self) -> AuthStatus {
        self.status.get()
    }

    pub fn is_loading(&self) -> bool {
        self.status() == AuthStatus::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated && self.identity.borrow().is_some()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub fn is_admin(&self) -> bool {
        self.identity.borrow().as_ref().is_some_and(is_admin)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.identity
            .borrow()
            .as_ref()
            .is_some_and(|identity| has_capability(identity, capability))
    }

    /// What a gated view requiring `required` should do right now.
    pub fn gate(&self, required: Option<Capability>) -> GateDecision {
        evaluate_gate(self.status(), self.identity.borrow().as_ref(), required)
    }
}

fn warn_if_expired(credential: &str) {
    let Ok(claims) = decode_claims(credential) else {
        return;
    };
    if claims.is_expired_at(chrono::Utc::now()) {
        tracing::warn!(
            expires_at = ?claims.expires_at(),
            "resumed credential is past its expiry; expiry is not enforced client-side"
        );
    }
}
