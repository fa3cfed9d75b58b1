//! Client-side re-check for protected views.
//!
//! The edge guard only sees a cookie, which can be stale or absent on
//! client-only navigations. Protected views therefore re-derive the decision
//! from the auth service before rendering anything.

use serde::Serialize;

use astexo_auth::{Capability, Identity, LANDING, has_capability, home_route};

use crate::service::AuthStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "target")]
pub enum GateDecision {
    /// Session resume has not finished; show a waiting indicator and do not
    /// redirect yet.
    Wait,
    Redirect(&'static str),
    Render,
}

pub fn evaluate_gate(
    status: AuthStatus,
    identity: Option<&Identity>,
    required: Option<Capability>,
) -> GateDecision {
    let identity = match (status, identity) {
        (AuthStatus::Loading, _) => return GateDecision::Wait,
        (AuthStatus::Authenticated, Some(identity)) => identity,
        _ => return GateDecision::Redirect(LANDING),
    };

    match required {
        Some(capability) if !has_capability(identity, capability) => {
            GateDecision::Redirect(home_route(identity.account_type))
        }
        _ => GateDecision::Render,
    }
}

#[cfg(test)]
mod tests {
    use astexo_auth::AccountType;

    use super::*;

    fn identity(account_type: AccountType) -> Identity {
        Identity {
            id: "1".to_string(),
            name: "Someone".to_string(),
            email: "someone@astexo.com".to_string(),
            account_type,
            role: 0,
            permissions: None,
        }
    }

    #[test]
    fn waits_while_loading_even_with_identity() {
        let admin = identity(AccountType::Admin);
        assert_eq!(
            evaluate_gate(AuthStatus::Loading, Some(&admin), Some(Capability::AdminArea)),
            GateDecision::Wait
        );
    }

    #[test]
    fn unauthenticated_goes_to_landing() {
        assert_eq!(
            evaluate_gate(AuthStatus::Unauthenticated, None, None),
            GateDecision::Redirect("/")
        );
        // Authenticated without an identity is treated as logged out.
        assert_eq!(
            evaluate_gate(AuthStatus::Authenticated, None, None),
            GateDecision::Redirect("/")
        );
    }

    #[test]
    fn wrong_area_goes_to_own_home() {
        let client = identity(AccountType::Client);
        assert_eq!(
            evaluate_gate(AuthStatus::Authenticated, Some(&client), Some(Capability::AdminArea)),
            GateDecision::Redirect("/client")
        );

        let admin = identity(AccountType::Admin);
        assert_eq!(
            evaluate_gate(AuthStatus::Authenticated, Some(&admin), Some(Capability::ClientArea)),
            GateDecision::Redirect("/admin")
        );
    }

    #[test]
    fn renders_when_checks_pass() {
        let admin = identity(AccountType::Admin);
        assert_eq!(
            evaluate_gate(AuthStatus::Authenticated, Some(&admin), Some(Capability::AdminArea)),
            GateDecision::Render
        );
        assert_eq!(
            evaluate_gate(AuthStatus::Authenticated, Some(&admin), None),
            GateDecision::Render
        );
    }
}
