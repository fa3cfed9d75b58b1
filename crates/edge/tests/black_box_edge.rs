use astexo_auth::Environment;
use astexo_edge::config::EdgeConfig;
use reqwest::{StatusCode, header};
use serde_json::json;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(environment: Environment) -> Self {
        let config = EdgeConfig {
            environment,
            ..EdgeConfig::default()
        };
        let app = astexo_edge::app::build_app(&config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Redirects are what we're asserting on, so never follow them.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url,
            client,
            handle,
        }
    }

    async fn get(&self, path: &str, account_cookie: Option<&str>) -> reqwest::Response {
        let mut req = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(value) = account_cookie {
            req = req.header(header::COOKIE, format!("theme=dark; account_type={value}"));
        }
        req.send().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn location(res: &reqwest::Response) -> &str {
    res.headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn(Environment::Development).await;
    let res = srv.get("/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn landing_page_is_served_without_a_cookie() {
    let srv = TestServer::spawn(Environment::Development).await;
    let res = srv.get("/", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("<title>Astexo</title>"));
}

#[tokio::test]
async fn protected_areas_redirect_to_landing_without_a_cookie() {
    let srv = TestServer::spawn(Environment::Development).await;

    for path in ["/admin", "/admin/users", "/client", "/client/orders/7"] {
        let res = srv.get(path, None).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(location(&res), "/", "{path}");
    }

    let res = srv.get("/admin", Some("")).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/");
}

#[tokio::test]
async fn admin_cookie_on_client_area_redirects_to_admin() {
    let srv = TestServer::spawn(Environment::Development).await;
    let res = srv.get("/client/settings", Some("0")).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/admin");
}

#[tokio::test]
async fn client_cookie_on_admin_area_redirects_to_client() {
    let srv = TestServer::spawn(Environment::Development).await;
    let res = srv.get("/admin", Some("1")).await;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/client");
}

#[tokio::test]
async fn matching_cookie_reaches_the_page() {
    let srv = TestServer::spawn(Environment::Development).await;

    let res = srv.get("/admin/reports", Some("0")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Astexo | Admin"));

    let res = srv.get("/client", Some("1")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Astexo | Client"));
}

#[tokio::test]
async fn lookalike_prefix_is_not_protected() {
    let srv = TestServer::spawn(Environment::Development).await;
    // Not under /admin, so the guard lets it through to a plain 404.
    let res = srv.get("/administrator", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cookie_action_sets_and_removes_the_cookie() {
    let srv = TestServer::spawn(Environment::Development).await;
    let url = format!("{}/actions/auth-cookie", srv.base_url);

    let res = srv
        .client
        .post(&url)
        .json(&json!({ "account_type": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("account_type=1;"));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(!set_cookie.contains("HttpOnly"));
    assert!(!set_cookie.contains("Secure"));

    let res = srv.client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn production_cookie_is_secure() {
    let srv = TestServer::spawn(Environment::Production).await;
    let res = srv
        .client
        .post(format!("{}/actions/auth-cookie", srv.base_url))
        .json(&json!({ "account_type": 0 }))
        .send()
        .await
        .unwrap();

    let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("account_type=0;"));
    assert!(set_cookie.contains("Secure"));
}

#[tokio::test]
async fn cookie_action_rejects_bad_input() {
    let srv = TestServer::spawn(Environment::Development).await;
    let url = format!("{}/actions/auth-cookie", srv.base_url);

    let res = srv
        .client
        .post(&url)
        .json(&json!({ "account_type": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_account_type");

    let res = srv
        .client
        .post(&url)
        .header(header::CONTENT_TYPE, "application/json")
        .body("{")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");
}
