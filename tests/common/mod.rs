//! Shared harness for the end-to-end API tests

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookstore_server::{
    api,
    config::AuthConfig,
    models::{User, UserRole},
    repository::{memory::MemoryStore, Repository},
    AppState,
};

pub struct TestApp {
    router: Router,
}

/// Cheap Argon2 parameters keep the suite fast; verification reads them from the hash
fn hash(password: &str) -> String {
    let params = Params::new(8, 1, 1, None).unwrap();
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

/// App over a freshly seeded in-memory store with an admin and a regular user
pub async fn spawn_app() -> TestApp {
    let repository = Repository::in_memory(MemoryStore::with_reference_data());

    for (username, password, role) in [("admin", "pass1", UserRole::Admin), ("user", "pass2", UserRole::User)] {
        repository
            .users
            .insert(User { id: None, username: username.into(), password: hash(password), role })
            .await
            .unwrap();
    }

    let state = AppState::new(AuthConfig::default(), repository);
    TestApp { router: api::router(state) }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/auth/signin",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "sign-in failed: {}", body);
        body["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.sign_in("admin", "pass1").await
    }

    pub async fn user_token(&self) -> String {
        self.sign_in("user", "pass2").await
    }

    /// Create a book as admin and return its id
    pub async fn create_book(&self, token: &str, title: &str, authors: &[i64], genres: &[i32]) -> i64 {
        let authors: Vec<Value> = authors.iter().map(|id| json!({ "id": id })).collect();
        let genres: Vec<Value> = genres.iter().map(|id| json!({ "id": id })).collect();
        let (status, body) = self
            .request(
                Method::POST,
                "/book",
                Some(token),
                Some(json!({ "title": title, "listOfAuthors": authors, "listOfGenres": genres })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", body);
        body["id"].as_i64().unwrap()
    }
}

/// Titles of a list response, in order
pub fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect()
}
