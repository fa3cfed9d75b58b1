//! `astexo-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP, storage and rendering.
//! Client, edge and front end all consume the same decisions from here.

pub mod account;
pub mod capability;
pub mod cookie;
pub mod identity;
pub mod routes;
pub mod token;

pub use account::{AccountType, InvalidAccountType};
pub use capability::{Capability, has_capability, home_route, is_admin};
pub use cookie::{AUTH_COOKIE_MAX_AGE_SECS, AUTH_COOKIE_NAME, AuthCookie, Environment, find_auth_cookie};
pub use identity::{DEFAULT_DISPLAY_NAME, Identity, Permission};
pub use routes::{ADMIN_PREFIX, CLIENT_PREFIX, GuardDecision, LANDING, RouteClass, classify, guard};
pub use token::{CredentialClaims, DecodeError, decode_claims, decode_identity, encode_unsigned};
