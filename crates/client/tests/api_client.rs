use std::rc::Rc;

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::{Value, json};

use astexo_auth::{AccountType, CredentialClaims, Environment, encode_unsigned};
use astexo_client::{
    ApiClient, ApiError, AuthService, AuthStatus, CookieChannel, CredentialExchange, LoginRequest,
    MemoryCookieChannel, MemoryStorage, SessionStore,
};

struct TestBackend {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestBackend {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/verify-email", post(verify_email))
            .route("/auth/create-verified-account", post(create_verified_account))
            .route("/auth/get-token-data", post(broken));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some("admin@astexo.com"), Some("admin123")) => {
            let token = encode_unsigned(&CredentialClaims {
                id: "1".to_string(),
                name: Some("John Admin".to_string()),
                email: "admin@astexo.com".to_string(),
                role: 2,
                account_type: AccountType::Admin,
                permissions: None,
                iat: None,
                exp: None,
            });
            (StatusCode::OK, Json(json!({ "token": token, "message": "ok" })))
        }
        (Some("blank@astexo.com"), _) => (StatusCode::OK, Json(json!({ "message": "ok" }))),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        ),
    }
}

async fn register(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == "taken@astexo.com" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already registered" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Check your inbox", "email": body["email"] })),
    )
}

async fn verify_email(Json(body): Json<Value>) -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": "verified", "token": body["token"] })))
}

async fn create_verified_account(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"].as_str().is_none_or(|p| p.len() < 8) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "Password too short" })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Account created", "token": body["token"] })),
    )
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "plain text, no json")
}

#[tokio::test]
async fn login_endpoint_returns_credential() {
    let srv = TestBackend::spawn().await;
    let client = ApiClient::new(&srv.base_url);

    let resp = client
        .login(&LoginRequest::new("admin@astexo.com", "admin123"))
        .await
        .unwrap();

    assert!(resp.token.is_some());
}

#[tokio::test]
async fn non_2xx_surfaces_server_message() {
    let srv = TestBackend::spawn().await;
    let client = ApiClient::new(&srv.base_url);

    let err = client
        .login(&LoginRequest::new("admin@astexo.com", "nope"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 401,
            message: "Invalid credentials".to_string()
        }
    );

    let err = client.register("Taken", "taken@astexo.com").await.unwrap_err();
    assert_eq!(err.user_message(), "Email already registered");
}

#[tokio::test]
async fn missing_message_falls_back_to_generic_text() {
    let srv = TestBackend::spawn().await;
    let client = ApiClient::new(&srv.base_url);

    let err = client.get_token_data("abc").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            message: "Something went wrong".to_string()
        }
    );
}

#[tokio::test]
async fn collaborator_endpoints_return_message_envelope() {
    let srv = TestBackend::spawn().await;
    let client = ApiClient::new(&srv.base_url);

    let registered = client.register("New", "new@astexo.com").await.unwrap();
    assert_eq!(registered.message.as_deref(), Some("Check your inbox"));
    assert_eq!(registered.data["email"], "new@astexo.com");

    let verified = client.verify_email("tok-123").await.unwrap();
    assert_eq!(verified.data["token"], "tok-123");

    let created = client
        .create_verified_account("tok-456", "correct horse")
        .await
        .unwrap();
    assert_eq!(created.message.as_deref(), Some("Account created"));
    assert_eq!(created.data["token"], "tok-456");

    let err = client
        .create_verified_account("tok-456", "short")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 422,
            message: "Password too short".to_string()
        }
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{addr}"));
    let err = client
        .login(&LoginRequest::new("admin@astexo.com", "admin123"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn auth_service_over_http() {
    let srv = TestBackend::spawn().await;

    let storage = MemoryStorage::new();
    let cookies = MemoryCookieChannel::new(Environment::Development);
    let service = AuthService::new(
        Rc::new(ApiClient::new(&srv.base_url)),
        SessionStore::new(Rc::new(storage.clone()), Rc::new(cookies.clone())),
        Rc::new(|_: &str| {}),
    );
    service.init().await;

    let outcome = service.login("admin@astexo.com", "admin123").await;
    assert!(outcome.success);
    assert_eq!(outcome.redirect_to.as_deref(), Some("/admin"));
    assert_eq!(cookies.read_auth_cookie().as_deref(), Some("0"));

    service.logout().await;

    // A 200 without a credential is still a failed login.
    let outcome = service.login("blank@astexo.com", "whatever").await;
    assert!(!outcome.success);
    assert_eq!(service.status(), AuthStatus::Unauthenticated);
    assert!(storage.is_empty());
}
