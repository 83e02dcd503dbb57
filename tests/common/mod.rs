#![allow(dead_code)]

use axum::body::Body;
use axum::Router;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use storefront::router::init_router;
use storefront::state::AppState;
use storefront_core::hash_password_with_cost;
use storefront_db::UserStore;
use storefront_models::{NewUser, User, UserRole};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "password123";

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory())
    }

    pub fn with_state(state: AppState) -> Self {
        let router = init_router(state.clone());
        Self { state, router }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn request(
        &self,
        method: &str,
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

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", uri, token, None).await
    }

    /// Inserts a user straight into the store, then logs in through the API.
    pub async fn create_user(&self, username: &str, role: UserRole) -> TestUser {
        let email = format!("{}@example.com", username);
        let password_hash =
            hash_password_with_cost(TEST_PASSWORD, self.state.app_config.bcrypt_cost).unwrap();

        let user = self
            .state
            .users
            .create(NewUser {
                username: username.to_string(),
                email: email.clone(),
                password_hash,
                role,
            })
            .await
            .unwrap();

        let token = self.login(&email, TEST_PASSWORD).await;
        TestUser { user, token }
    }

    pub async fn admin(&self) -> TestUser {
        self.create_user(&unique_username("admin"), UserRole::Admin).await
    }

    pub async fn regular_user(&self) -> TestUser {
        self.create_user(&unique_username("user"), UserRole::User).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/users/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn create_product(&self, token: &str, body: Value) -> Value {
        let (status, body) = self.post("/api/products", Some(token), body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["data"].clone()
    }
}

pub fn unique_username(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &suffix[..12])
}

pub fn product(name: &str, price: f64, category: &str, stock: i32) -> Value {
    json!({
        "name": name,
        "price": price,
        "category": category,
        "stock": stock,
    })
}
