//! Route classification and the navigation-time guard.
//!
//! The guard is a pure function of `(path, cookie value)`. It runs before any
//! page code on every navigating request, so it must stay IO-free.

use serde::Serialize;

use crate::AccountType;

pub const ADMIN_PREFIX: &str = "/admin";
pub const CLIENT_PREFIX: &str = "/client";

/// Unauthenticated landing page (hosts the login dialog).
pub const LANDING: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    Public,
    AdminProtected,
    ClientProtected,
}

impl RouteClass {
    pub fn is_protected(self) -> bool {
        !matches!(self, RouteClass::Public)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "target")]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// `true` when `path` is `prefix` itself or lies beneath it (`/admin`,
/// `/admin/...`, but not `/administrator`).
fn under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn classify(path: &str) -> RouteClass {
    if under(path, ADMIN_PREFIX) {
        RouteClass::AdminProtected
    } else if under(path, CLIENT_PREFIX) {
        RouteClass::ClientProtected
    } else {
        RouteClass::Public
    }
}

/// Decide whether a request for `path` may proceed given the raw
/// `account_type` cookie value.
///
/// Unrecognized non-empty cookie values fall through to `Allow`; the
/// client-side gate re-checks the persisted identity after render starts.
pub fn guard(path: &str, account_cookie: Option<&str>) -> GuardDecision {
    let class = classify(path);
    if !class.is_protected() {
        return GuardDecision::Allow;
    }

    let Some(value) = account_cookie.map(str::trim).filter(|v| !v.is_empty()) else {
        return GuardDecision::Redirect(LANDING);
    };

    match (value.parse::<AccountType>(), class) {
        (Ok(AccountType::Admin), RouteClass::ClientProtected) => GuardDecision::Redirect(ADMIN_PREFIX),
        (Ok(AccountType::Client), RouteClass::AdminProtected) => GuardDecision::Redirect(CLIENT_PREFIX),
        _ => GuardDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn classification_is_segment_aware() {
        assert_eq!(classify("/admin"), RouteClass::AdminProtected);
        assert_eq!(classify("/admin/"), RouteClass::AdminProtected);
        assert_eq!(classify("/admin/users/3"), RouteClass::AdminProtected);
        assert_eq!(classify("/client/invoice-management"), RouteClass::ClientProtected);
        assert_eq!(classify("/administrator"), RouteClass::Public);
        assert_eq!(classify("/"), RouteClass::Public);
        assert_eq!(classify("/create-account"), RouteClass::Public);
    }

    #[test]
    fn redirect_table() {
        assert_eq!(guard("/client/x", Some("0")), GuardDecision::Redirect("/admin"));
        assert_eq!(guard("/admin/x", Some("1")), GuardDecision::Redirect("/client"));
        assert_eq!(guard("/admin", None), GuardDecision::Redirect("/"));
        assert_eq!(guard("/client", Some("")), GuardDecision::Redirect("/"));
        assert_eq!(guard("/admin/x", Some("0")), GuardDecision::Allow);
        assert_eq!(guard("/client", Some("1")), GuardDecision::Allow);
    }

    #[test]
    fn unrecognized_cookie_value_is_left_to_the_client_gate() {
        assert_eq!(guard("/admin", Some("7")), GuardDecision::Allow);
    }

    proptest! {
        /// Property: any path outside the protected prefixes is allowed,
        /// whatever the cookie says.
        #[test]
        fn public_paths_always_allowed(
            path in "/[a-z0-9/_-]{0,32}",
            cookie in proptest::option::of("[0-9a-z]{0,3}"),
        ) {
            prop_assume!(!path.starts_with(ADMIN_PREFIX) && !path.starts_with(CLIENT_PREFIX));
            prop_assert_eq!(guard(&path, cookie.as_deref()), GuardDecision::Allow);
        }
    }
}
