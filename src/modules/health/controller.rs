use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    #[schema(example = "API is running")]
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[schema(example = "1.0.0")]
    pub version: String,
}

/// Health check
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "API health status", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "API is running".to_string(),
        timestamp: Utc::now(),
        version: state.app_config.version.clone(),
    })
}

/// Summary of the available endpoints
#[utoipa::path(
    get,
    path = "/api/docs",
    responses(
        (status = 200, description = "API documentation information")
    ),
    tag = "Health"
)]
pub async fn api_docs() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API Documentation",
        "endpoints": {
            "health": "GET /api/health",
            "users": {
                "login": "POST /api/users/login",
                "profile": "GET /api/users/profile",
                "create": "POST /api/users (admin only)",
                "list": "GET /api/users (admin only)",
                "get": "GET /api/users/{id} (admin only)",
                "update": "PUT /api/users/{id} (admin only)",
                "delete": "DELETE /api/users/{id} (admin only)"
            },
            "products": {
                "list": "GET /api/products",
                "get": "GET /api/products/{id}",
                "create": "POST /api/products (admin only)",
                "update": "PUT /api/products/{id} (admin only)",
                "delete": "DELETE /api/products/{id} (admin only)",
                "categories": "GET /api/products/categories",
                "stats": "GET /api/products/stats"
            }
        },
        "authentication": {
            "type": "Bearer Token",
            "header": "Authorization: Bearer <token>",
            "login": "POST /api/users/login with email and password"
        },
        "queryParameters": {
            "pagination": "?page=1&limit=10",
            "sorting": "?sort=name&order=ASC",
            "filtering": "?search=keyword&category=Electronics&isActive=true"
        }
    }))
}

/// Welcome message with pointers to the docs
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Welcome to the Storefront API",
        "version": state.app_config.version,
        "documentation": "/swagger-ui",
        "health": "/api/health",
        "endpoints": {
            "swagger": "/swagger-ui",
            "scalar": "/scalar",
            "openapi": "/api-docs/openapi.json",
            "health": "/api/health",
            "users": "/api/users",
            "products": "/api/products"
        }
    }))
}
