//! Server action that writes the `account_type` cookie from the server side.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use astexo_auth::{AccountType, AuthCookie};

use crate::app::AppState;
use crate::app::errors::json_error;

#[derive(Debug, Deserialize)]
pub struct SetAuthCookieRequest {
    pub account_type: u8,
}

pub async fn set_auth_cookie(
    State(state): State<AppState>,
    body: Result<Json<SetAuthCookieRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text());
        }
    };

    let account_type = match AccountType::try_from(body.account_type) {
        Ok(account_type) => account_type,
        Err(e) => {
            return json_error(StatusCode::BAD_REQUEST, "invalid_account_type", e.to_string());
        }
    };

    let cookie = AuthCookie::new(account_type, state.environment);
    tracing::info!(account_type = cookie.value(), "auth cookie set");

    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cookie.to_header_value())],
    )
        .into_response()
}

pub async fn delete_auth_cookie(State(state): State<AppState>) -> Response {
    tracing::info!("auth cookie removed");
    (
        StatusCode::NO_CONTENT,
        [(
            header::SET_COOKIE,
            AuthCookie::removal_header_value(state.environment),
        )],
    )
        .into_response()
}
