//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use agency_backend::app_state::AppState;
use agency_backend::build_router;
use agency_backend::config::Config;
use agency_backend::db::Repositories;

pub struct TestApp {
    pub base: String,
    pub http: Client,
}

/// Serves the full router on an ephemeral port over the in-process store.
pub async fn spawn_app() -> TestApp {
    let config = Config::for_tests("integration-secret");
    let state = AppState::new(config, Repositories::in_memory(), None);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    TestApp { base: format!("http://{addr}"), http: Client::new() }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn register(&self, email: &str, role: &str) -> Value {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&json!({ "email": email, "password": "secret1", "name": email, "role": role }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "register {email}");
        body(response).await["data"].clone()
    }

    pub async fn login(&self, email: &str) -> String {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": "secret1" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "login {email}");
        body(response).await["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn get(&self, token: &str, path: &str) -> Response {
        self.http.get(self.url(path)).bearer_auth(token).send().await.unwrap()
    }

    pub async fn post(&self, token: &str, path: &str, payload: Value) -> Response {
        self.http.post(self.url(path)).bearer_auth(token).json(&payload).send().await.unwrap()
    }

    pub async fn put(&self, token: &str, path: &str, payload: Value) -> Response {
        self.http.put(self.url(path)).bearer_auth(token).json(&payload).send().await.unwrap()
    }

    pub async fn patch(&self, token: &str, path: &str, payload: Value) -> Response {
        self.http.patch(self.url(path)).bearer_auth(token).json(&payload).send().await.unwrap()
    }

    pub async fn delete(&self, token: &str, path: &str) -> Response {
        self.http.delete(self.url(path)).bearer_auth(token).send().await.unwrap()
    }
}

pub async fn body(response: Response) -> Value {
    response.json().await.unwrap()
}

/// Admin USER01, client USER02, employees USER03..USER05, with tokens.
pub struct Agency {
    pub app: TestApp,
    pub admin: String,
    pub client: String,
    pub employees: Vec<String>,
}

pub async fn seeded() -> Agency {
    let app = spawn_app().await;
    app.register("root@agency.io", "admin").await;
    app.register("buyer@corp.io", "client").await;
    for n in 3..=5 {
        app.register(&format!("dev{n}@agency.io"), "employee").await;
    }
    let admin = app.login("root@agency.io").await;
    let client = app.login("buyer@corp.io").await;
    let mut employees = Vec::new();
    for n in 3..=5 {
        employees.push(app.login(&format!("dev{n}@agency.io")).await);
    }
    Agency { app, admin, client, employees }
}
