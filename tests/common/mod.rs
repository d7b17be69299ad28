#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{json, Value};

use todo_api_rust::config::{AppConfig, StorageBackend};
use todo_api_rust::database::MemoryStore;
use todo_api_rust::state::AppState;

pub const PASSWORD: &str = "correct-horse-battery";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub api_url: String,
    pub client: reqwest::Client,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.database.backend = StorageBackend::Memory;
    config.api.enable_request_logging = false;
    config.security.jwt_secret = "integration-test-secret".to_string();
    // bcrypt minimum keeps sign-ups fast
    config.security.password_hash_cost = 4;
    config
}

impl TestServer {
    /// Serves the app on a fresh in-memory store for the lifetime of the
    /// calling test's runtime.
    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let api_url = format!("{}{}", base_url, config.api.route_prefix().unwrap_or_default());

        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, todo_api_rust::app(state)).await;
        });

        let server = Self {
            port,
            base_url,
            api_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub async fn signup(&self, username: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/users"))
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD
            }))
            .send()
            .await?)
    }

    pub async fn signin(&self, username: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/users/signin"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?)
    }

    /// Creates an account and signs it in.
    pub async fn session(&self, username: &str) -> Result<Session> {
        let res = self.signup(username).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "signup failed: {}", res.status());

        let res = self.signin(username, PASSWORD).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "signin failed: {}", res.status());
        let body: Value = res.json().await?;

        let token = |key: &str| -> Result<String> {
            body["tokens"][key]
                .as_str()
                .map(str::to_string)
                .with_context(|| format!("signin response missing tokens.{}: {}", key, body))
        };

        Ok(Session {
            client: self.client.clone(),
            api_url: self.api_url.clone(),
            username: username.to_string(),
            user_id: body["user"]["id"].as_str().unwrap_or_default().to_string(),
            access_token: token("accessToken")?,
            refresh_token: token("refreshToken")?,
            csrf_token: token("csrfToken")?,
        })
    }
}

pub async fn spawn() -> Result<TestServer> {
    TestServer::spawn_with(test_config()).await
}

/// A signed-in account. Requests carry the bearer token and, unless built
/// with `request_without_csrf`, the CSRF header.
pub struct Session {
    client: reqwest::Client,
    api_url: String,
    pub username: String,
    pub user_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub csrf_token: String,
}

impl Session {
    pub fn request_without_csrf(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_url, path))
            .bearer_auth(&self.access_token)
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_without_csrf(method, path)
            .header("x-csrf-token", &self.csrf_token)
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        read(self.request(Method::GET, path)).await
    }

    pub async fn send(&self, method: Method, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        read(self.request(method, path).json(&body)).await
    }

    pub async fn send_empty(&self, method: Method, path: &str) -> Result<(StatusCode, Value)> {
        read(self.request(method, path)).await
    }

    /// POST /todos, returning the created todo.
    pub async fn create_todo(&self, body: Value) -> Result<Value> {
        let (status, body) = self.send(Method::POST, "/todos", body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create todo failed: {} {}", status, body);
        Ok(body["todo"].clone())
    }

    /// POST /lists, returning the created list.
    pub async fn create_list(&self, body: Value) -> Result<Value> {
        let (status, body) = self.send(Method::POST, "/lists", body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create list failed: {} {}", status, body);
        Ok(body["list"].clone())
    }
}

pub async fn read(request: RequestBuilder) -> Result<(StatusCode, Value)> {
    let res = request.send().await?;
    let status = res.status();
    let body = res.json::<Value>().await.unwrap_or(Value::Null);
    Ok((status, body))
}

/// Today as `MM-DD-YYYY`, the day filter's format.
pub fn today() -> String {
    chrono::Utc::now().format("%m-%d-%Y").to_string()
}

pub fn days_from_today(days: i64) -> String {
    (chrono::Utc::now() + chrono::Duration::days(days))
        .format("%m-%d-%Y")
        .to_string()
}
