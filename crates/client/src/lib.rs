//! `astexo-client`
//!
//! **Responsibility:** client-side authentication for the Astexo web app.
//!
//! This crate provides:
//! - Durable session storage (`auth_token` / `user_data`) with self-healing reads
//! - The `account_type` cookie side-channel and its reconciliation with storage
//! - A thin REST client for the credential-exchange backend
//! - The `AuthService` state machine (login, logout, session resume)
//! - The auth-gated view decision and, on `wasm32`, the Leptos front end
//!
//! Everything here runs on the single UI thread: shared state uses `Rc` and
//! interior mutability, and async traits are `?Send`.

pub mod api;
pub mod config;
pub mod cookies;
pub mod gate;
pub mod mock;
pub mod service;
pub mod session;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use api::{ApiClient, ApiError, CredentialExchange, LoginRequest, LoginResponse};
pub use config::{ClientConfig, ConfigError};
pub use cookies::{CookieChannel, CookieError, MemoryCookieChannel};
pub use gate::{GateDecision, evaluate_gate};
pub use mock::MockCredentialExchange;
pub use service::{AuthService, AuthStatus, LoginOutcome, Navigator};
pub use session::{Reconciliation, SessionError, SessionRecord, SessionStore};
pub use storage::{AUTH_TOKEN_KEY, DurableStorage, MemoryStorage, StorageError, USER_DATA_KEY};
