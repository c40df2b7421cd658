use std::sync::Arc;

use auth::Authenticator;
use auth::Clock;
use auth::DemoAccount;
use auth::PasswordHasher;
use auth::SystemClock;
use auth::TokenService;
use auth::TokenSettings;
use library_service::account::service::AccountService;
use library_service::inbound::http::router::create_router;
use library_service::outbound::repositories::InMemoryCredentialStore;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server backed by an in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: InMemoryCredentialStore,
    pub token_service: TokenService,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn with the admin/admin demo fallback enabled
    pub async fn spawn() -> Self {
        Self::spawn_with(true, Arc::new(SystemClock)).await
    }

    /// Spawn without any demo fallback
    pub async fn spawn_without_demo() -> Self {
        Self::spawn_with(false, Arc::new(SystemClock)).await
    }

    pub async fn spawn_with(demo_fallback: bool, clock: Arc<dyn Clock>) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = InMemoryCredentialStore::new();

        let token_service = TokenService::new(&TokenSettings::new(TEST_SECRET), Arc::clone(&clock))
            .expect("Failed to build token service");
        let mut authenticator = Authenticator::new(PasswordHasher::new(), token_service)
            .expect("Failed to build authenticator");
        if demo_fallback {
            authenticator = authenticator
                .with_demo_fallback(DemoAccount {
                    subject: "admin".to_string(),
                    password: "admin".to_string(),
                })
                .expect("Failed to hash demo password");
        }

        let account_service = Arc::new(AccountService::new(
            Arc::new(store.clone()),
            Arc::new(authenticator),
        ));
        let router = create_router(account_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        // Independent validator sharing the server's secret and clock
        let token_service = TokenService::new(&TokenSettings::new(TEST_SECRET), clock)
            .expect("Failed to build token service");

        Self {
            address,
            port,
            store,
            token_service,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// POST /auth/token with form-encoded credentials
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/auth/token")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the access token, panicking on failure
    pub async fn access_token(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }
}
