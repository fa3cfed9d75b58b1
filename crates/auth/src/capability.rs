//! Capability resolution.
//!
//! Every "may this identity see that area?" question in the workspace goes
//! through [`has_capability`]; nothing re-derives it from the raw account
//! type.
//!
//! - No IO
//! - No panics

use serde::{Deserialize, Serialize};

use crate::routes::{ADMIN_PREFIX, CLIENT_PREFIX};
use crate::{AccountType, Identity};

/// An area of the application an identity may be allowed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// The `/admin` dashboard and everything under it.
    AdminArea,
    /// The `/client` dashboard and everything under it.
    ClientArea,
}

impl Capability {
    /// Capabilities granted to an account type. Admin and client areas are
    /// mutually exclusive.
    pub fn granted_to(account_type: AccountType) -> &'static [Capability] {
        match account_type {
            AccountType::Admin => &[Capability::AdminArea],
            AccountType::Client => &[Capability::ClientArea],
        }
    }
}

pub fn has_capability(identity: &Identity, capability: Capability) -> bool {
    Capability::granted_to(identity.account_type).contains(&capability)
}

pub fn is_admin(identity: &Identity) -> bool {
    has_capability(identity, Capability::AdminArea)
}

/// Landing route for an account type after login or after a role mismatch.
pub fn home_route(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::Admin => ADMIN_PREFIX,
        AccountType::Client => CLIENT_PREFIX,
    }
}
