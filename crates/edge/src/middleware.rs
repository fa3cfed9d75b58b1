use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use astexo_auth::{AUTH_COOKIE_NAME, GuardDecision, guard};

/// Navigation-time route guard.
///
/// Runs before any handler. Only the `account_type` cookie is consulted, so
/// this is a coarse gate; the client re-checks against the stored session.
pub async fn route_guard(jar: CookieJar, req: Request, next: Next) -> Response {
    let path = req.uri().path();
    let cookie = jar.get(AUTH_COOKIE_NAME).map(|c| c.value());

    match guard(path, cookie) {
        GuardDecision::Allow => next.run(req).await,
        GuardDecision::Redirect(target) => {
            tracing::debug!(path, cookie = ?cookie, target, "route guard redirect");
            Redirect::temporary(target).into_response()
        }
    }
}
