//! Reactive wrapper that exposes the [`AuthService`] to components.

use std::rc::Rc;

use leptos::*;
use leptos_router::use_navigate;

use astexo_auth::{Capability, Identity};

use crate::api::{ApiClient, CredentialExchange};
use crate::config::ClientConfig;
use crate::cookies::DocumentCookieChannel;
use crate::gate::{GateDecision, evaluate_gate};
use crate::service::{AuthService, AuthStatus, LoginOutcome, Navigator};
use crate::session::SessionStore;
use crate::storage::LocalStorage;

/// Handle provided through Leptos context.
///
/// The service owns the state; the signals mirror it after every operation
/// so views re-render.
#[derive(Clone)]
pub struct AuthContext {
    service: Rc<AuthService>,
    status: RwSignal<AuthStatus>,
    identity: RwSignal<Option<Identity>>,
}

impl AuthContext {
    pub fn new(service: Rc<AuthService>) -> Self {
        Self {
            status: create_rw_signal(service.status()),
            identity: create_rw_signal(service.identity()),
            service,
        }
    }

    fn sync(&self) {
        self.status.set(self.service.status());
        self.identity.set(self.service.identity());
    }

    pub async fn init(&self) {
        self.service.init().await;
        self.sync();
    }

    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        self.status.set(AuthStatus::Loading);
        let outcome = self.service.login(email, password).await;
        self.sync();
        outcome
    }

    pub async fn logout(&self) {
        self.service.logout().await;
        self.sync();
    }

    pub fn status(&self) -> AuthStatus {
        self.status.get()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.identity.get()
    }

    /// Reactive gate decision.
    pub fn decision(&self, required: Option<Capability>) -> GateDecision {
        let identity = self.identity.get();
        evaluate_gate(self.status.get(), identity.as_ref(), required)
    }
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Builds the single [`AuthService`] for the app, provides it, and starts
/// session resume. Must sit inside the `<Router>`.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid client configuration; using defaults");
        ClientConfig::default()
    });

    let navigate = use_navigate();
    let navigator: Rc<dyn Navigator> = Rc::new(move |to: &str| navigate(to, Default::default()));
    let exchange: Rc<dyn CredentialExchange> = Rc::new(ApiClient::from_config(&config));
    let session = SessionStore::new(
        Rc::new(LocalStorage),
        Rc::new(DocumentCookieChannel::new(config.environment)),
    );

    let auth = AuthContext::new(Rc::new(AuthService::new(exchange, session, navigator)));
    provide_context(auth.clone());

    spawn_local(async move { auth.init().await });

    children()
}
