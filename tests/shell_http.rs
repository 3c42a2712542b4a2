use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crm_access::{
    AppState,
    auth::{AuthSession, DemoCredentials},
    cache::MemoryTokenStore,
    client::{Collection, DataClient, MemoryClient},
    config::Config,
    router::create_router,
};

struct Shell {
    state: AppState,
    client: Arc<MemoryClient>,
    tokens: MemoryTokenStore,
}

impl Shell {
    fn new() -> Self {
        let client = Arc::new(MemoryClient::with_demo_data());
        let tokens = MemoryTokenStore::new();
        let session = AuthSession::new(
            client.clone(),
            Arc::new(tokens.clone()),
            Arc::new(DemoCredentials::default()),
            Duration::from_secs(3600),
            "crm-access-tests",
        );
        let data: Arc<dyn DataClient> = client.clone();
        Self {
            state: AppState::new(session, data, Config::default()),
            client,
            tokens,
        }
    }

    /// Past the initial restore with no stored token.
    async fn anonymous() -> Self {
        let shell = Self::new();
        shell.state.session.write().await.restore_session().await;
        shell
    }

    async fn signed_in(email: &str, password: &str) -> Self {
        let shell = Self::anonymous().await;
        let (status, body) = shell
            .call(
                Method::POST,
                "/auth/login",
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0, "{body}");
        shell
    }

    fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = self
            .router()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn shell_reports_loading_before_restore_finishes() {
    let shell = Shell::new();

    let (status, body) = shell.call(Method::GET, "/dashboard", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["msg"], "Loading...");

    let (status, body) = shell.call(Method::GET, "/auth/me", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["isLoading"], true);
}

#[tokio::test]
async fn held_session_lock_reads_as_loading() {
    let shell = Shell::signed_in("admin@company.com", "admin123").await;
    let _restore = shell.state.session.write().await;

    let (status, _) = shell.call(Method::GET, "/contacts", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn anonymous_requests_redirect_to_login() {
    let shell = Shell::anonymous().await;

    let (status, body) = shell.call(Method::GET, "/leads", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["resp_data"]["redirect"], "/login");

    let (status, _) = shell.call(Method::GET, "/navigation", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_reported_generically() {
    let shell = Shell::anonymous().await;

    let (status, body) = shell
        .call(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": "finance@company.com", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 1002);
    assert_eq!(body["resp_data"]["success"], false);
    assert_eq!(body["resp_data"]["error"], "Invalid email or password");
    assert_eq!(shell.tokens.peek(), None);
}

#[tokio::test]
async fn finance_sees_its_modules_and_is_denied_the_rest() {
    let shell = Shell::signed_in("Finance@Company.com", "finance123").await;
    assert!(shell.tokens.peek().is_some());

    let (status, body) = shell.call(Method::GET, "/billing", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["module"], "billing");

    let (status, _) = shell.call(Method::GET, "/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = shell.call(Method::GET, "/leads", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["resp_data"]["required"], "leads - read");
    assert_eq!(body["resp_data"]["role"], "finance");

    let (_, body) = shell.call(Method::GET, "/navigation", None).await;
    let names: Vec<&str> = body["resp_data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Billing"));
    assert!(names.contains(&"Contracts"));
    assert!(!names.contains(&"Leads"));
    assert!(!names.contains(&"Users"));

    let (_, body) = shell.call(Method::GET, "/auth/me", None).await;
    assert_eq!(body["resp_data"]["user"]["email"], "finance@company.com");
    assert_eq!(body["resp_data"]["roleLabel"], "Finance Team");
    assert_eq!(body["resp_data"]["fullName"], "Fiona Finance");
    assert_eq!(body["resp_data"]["initials"], "FF");
}

#[tokio::test]
async fn admin_manages_users() {
    let shell = Shell::signed_in("admin@company.com", "admin123").await;

    let (status, body) = shell
        .call(
            Method::POST,
            "/users",
            Some(json!({
                "email": "New.Hire@Company.com",
                "firstName": "New",
                "lastName": "Hire",
                "role": "sales_team",
                "department": "Field Sales",
                "password": "welcome1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0, "{body}");
    assert_eq!(body["resp_data"]["email"], "new.hire@company.com");
    let id = body["resp_data"]["id"].as_str().unwrap().to_string();

    let stored = shell
        .client
        .records(Collection::Users)
        .into_iter()
        .find(|r| r["id"] == id.as_str())
        .unwrap();
    assert!(stored["passwordHash"].as_str().unwrap().starts_with("$2"));

    let (_, body) = shell
        .call(
            Method::POST,
            "/users",
            Some(json!({
                "email": "new.hire@company.com",
                "firstName": "Again",
                "lastName": "Hire",
                "role": "sales_team"
            })),
        )
        .await;
    assert_eq!(body["code"], 1001);

    let (_, body) = shell
        .call(
            Method::POST,
            "/users",
            Some(json!({
                "email": " @ ",
                "firstName": "Blank",
                "lastName": "Email",
                "role": "sales_team"
            })),
        )
        .await;
    assert_eq!(body["code"], 1000);

    let (_, body) = shell.call(Method::GET, "/users?search=field", None).await;
    let found = body["resp_data"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], id.as_str());

    let (_, body) = shell.call(Method::GET, "/users?role=finance", None).await;
    assert_eq!(body["resp_data"].as_array().unwrap().len(), 1);

    let (_, body) = shell.call(Method::GET, "/users?role=all", None).await;
    assert_eq!(body["resp_data"].as_array().unwrap().len(), 8);

    let (status, body) = shell
        .call(
            Method::PUT,
            &format!("/users/{id}"),
            Some(json!({ "isActive": false, "department": "Inside Sales" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resp_data"]["isActive"], false);
    assert_eq!(body["resp_data"]["department"], "Inside Sales");

    let (status, _) = shell
        .call(Method::DELETE, &format!("/users/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = shell
        .call(Method::DELETE, &format!("/users/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_page_requires_the_users_module() {
    let shell = Shell::signed_in("sales@company.com", "sales123").await;

    let (status, body) = shell.call(Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["resp_data"]["required"], "users - read");

    let (status, _) = shell
        .call(
            Method::DELETE,
            "/users/user_demo_1",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_returns_the_shell_to_the_login_view() {
    let shell = Shell::signed_in("admin@company.com", "admin123").await;

    let (status, _) = shell.call(Method::POST, "/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shell.tokens.peek(), None);
    assert!(shell.client.records(Collection::UserSessions).is_empty());

    let (status, _) = shell.call(Method::GET, "/dashboard", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = shell.call(Method::GET, "/auth/me", None).await;
    assert_eq!(body["resp_data"]["user"], Value::Null);
    assert_eq!(body["resp_data"]["isLoading"], false);
}
