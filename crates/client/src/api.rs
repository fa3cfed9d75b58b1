//! Thin REST client for the credential-exchange backend.
//!
//! Every endpoint speaks JSON. A non-2xx response becomes
//! [`ApiError::Status`] carrying the server's `message` field, or a generic
//! message when the body has none.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ClientConfig;

pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// The message a form may show to the user for non-login endpoints.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Status { message, .. } => message,
            ApiError::Network(_) | ApiError::Decode(_) => DEFAULT_ERROR_MESSAGE,
        }
    }
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Clone, Serialize)]
pub struct CreateVerifiedAccountRequest {
    pub token: String,
    pub password: String,
}

impl core::fmt::Debug for CreateVerifiedAccountRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CreateVerifiedAccountRequest")
            .field("token", &self.token)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Loose response envelope: an optional `message` plus whatever else the
/// endpoint returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// Exchanges user credentials for a signed credential.
#[async_trait(?Send)]
pub trait CredentialExchange {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_response(resp).await
    }

    pub async fn get<T>(&self, endpoint: &str, token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let mut req = self.http.get(self.url(endpoint));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        read_response(resp).await
    }

    pub async fn register(&self, name: &str, email: &str) -> Result<ApiMessage, ApiError> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
        };
        self.post("/auth/register", &body).await
    }

    pub async fn get_token_data(&self, token: &str) -> Result<ApiMessage, ApiError> {
        let body = TokenRequest {
            token: token.to_string(),
        };
        self.post("/auth/get-token-data", &body).await
    }

    pub async fn create_verified_account(
        &self,
        token: &str,
        password: &str,
    ) -> Result<ApiMessage, ApiError> {
        let body = CreateVerifiedAccountRequest {
            token: token.to_string(),
            password: password.to_string(),
        };
        self.post("/auth/create-verified-account", &body).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<ApiMessage, ApiError> {
        let body = TokenRequest {
            token: token.to_string(),
        };
        self.post("/auth/verify-email", &body).await
    }
}

#[async_trait(?Send)]
impl CredentialExchange for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post("/auth/login", request).await
    }
}

async fn read_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp
            .json::<ApiMessage>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string());

        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_debug_hides_password() {
        let req = LoginRequest::new("admin@astexo.com", "admin123");
        let debug = format!("{req:?}");
        assert!(debug.contains("admin@astexo.com"));
        assert!(!debug.contains("admin123"));
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/auth/login"), "http://localhost:8080/auth/login");
    }

    #[test]
    fn user_message_hides_transport_detail() {
        let err = ApiError::Network("connection refused (os error 111)".to_string());
        assert_eq!(err.user_message(), DEFAULT_ERROR_MESSAGE);

        let err = ApiError::Status {
            status: 409,
            message: "Email already registered".to_string(),
        };
        assert_eq!(err.user_message(), "Email already registered");
    }
}
