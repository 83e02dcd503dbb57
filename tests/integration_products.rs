mod common;

use axum::http::StatusCode;
use common::{TestApp, product};
use serde_json::json;

#[tokio::test]
async fn test_create_product_then_duplicate_conflicts() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, body) = app
        .post(
            "/api/products",
            Some(&admin.token),
            product("Widget", 9.99, "Tools", 5),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product created successfully");
    assert_eq!(body["data"]["isActive"], true);
    assert_eq!(body["data"]["name"], "Widget");
    assert_eq!(body["data"]["price"], 9.99);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/products",
            Some(&admin.token),
            product("Widget", 1.0, "Other", 1),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Product with this name already exists");

    let (_, body) = app.get(&format!("/api/products/{}", id), None).await;
    assert_eq!(body["data"]["price"], 9.99);
    assert_eq!(body["data"]["category"], "Tools");
}

#[tokio::test]
async fn test_create_product_validation_details() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, body) = app
        .post(
            "/api/products",
            Some(&admin.token),
            json!({ "name": "", "price": -1.0, "category": "Tools", "stock": -3 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["error"], "Validation Error");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"price"));
    assert!(fields.contains(&"stock"));
}

#[tokio::test]
async fn test_create_product_wrong_type() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let (status, body) = app
        .post(
            "/api/products",
            Some(&admin.token),
            json!({ "name": "Widget", "price": "cheap", "category": "Tools", "stock": 5 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
}

#[tokio::test]
async fn test_unknown_fields_are_ignored() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let mut body = product("Widget", 9.99, "Tools", 5);
    body["isActive"] = json!(false);
    body["owner"] = json!("mallory");
    let created = app.create_product(&admin.token, body).await;

    assert_eq!(created["isActive"], true);
    assert!(created.get("owner").is_none());
}

#[tokio::test]
async fn test_list_products_is_public_and_paginated() {
    let app = TestApp::new();
    let admin = app.admin().await;
    for i in 0..3 {
        app.create_product(&admin.token, product(&format!("Item {}", i), 1.0, "Misc", 1))
            .await;
    }

    let (status, body) = app.get("/api/products?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Products retrieved successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["hasNext"], true);
}

#[tokio::test]
async fn test_list_products_far_past_last_page() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.create_product(&admin.token, product("Widget", 9.99, "Tools", 5))
        .await;

    let (status, body) = app
        .get("/api/products?page=100000000000000000&limit=100", None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["page"], 100_000_000_000_000_000u64);
    assert_eq!(body["pagination"]["hasNext"], false);
    assert_eq!(body["pagination"]["hasPrev"], true);
}

#[tokio::test]
async fn test_list_products_filters_and_sorts() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.create_product(&admin.token, product("Laptop Pro", 1299.99, "Electronics", 50))
        .await;
    app.create_product(&admin.token, product("Smart Watch", 299.99, "Electronics", 30))
        .await;
    app.create_product(&admin.token, product("Coffee Maker", 89.99, "Appliances", 25))
        .await;

    let (_, body) = app
        .get("/api/products?category=Electronics&sort=price&order=ASC", None)
        .await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Smart Watch", "Laptop Pro"]);

    let (_, body) = app.get("/api/products?search=coffee", None).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Coffee Maker");
}

#[tokio::test]
async fn test_get_product_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .get(&format!("/api/products/{}", uuid::Uuid::new_v4()), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_get_product_accepts_optional_token() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let created = app
        .create_product(&admin.token, product("Widget", 9.99, "Tools", 5))
        .await;
    let uri = format!("/api/products/{}", created["id"].as_str().unwrap());

    let (status, _) = app.get(&uri, Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);

    // A broken token does not block a public read
    let (status, body) = app.get(&uri, Some("garbage")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product retrieved successfully");
}

#[tokio::test]
async fn test_partial_update_changes_only_price() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let created = app
        .create_product(&admin.token, product("Widget", 9.99, "Tools", 5))
        .await;
    let uri = format!("/api/products/{}", created["id"].as_str().unwrap());

    let (status, body) = app
        .put(&uri, Some(&admin.token), json!({ "price": 12.5 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["price"], 12.5);
    assert_eq!(body["data"]["name"], "Widget");
    assert_eq!(body["data"]["category"], "Tools");
    assert_eq!(body["data"]["stock"], 5);
}

#[tokio::test]
async fn test_update_product_name_conflict() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.create_product(&admin.token, product("Widget", 9.99, "Tools", 5))
        .await;
    let gadget = app
        .create_product(&admin.token, product("Gadget", 4.5, "Tools", 2))
        .await;

    let (status, _) = app
        .put(
            &format!("/api/products/{}", gadget["id"].as_str().unwrap()),
            Some(&admin.token),
            json!({ "name": "Widget" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_product_validation() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let created = app
        .create_product(&admin.token, product("Widget", 9.99, "Tools", 5))
        .await;

    let (status, body) = app
        .put(
            &format!("/api/products/{}", created["id"].as_str().unwrap()),
            Some(&admin.token),
            json!({ "stock": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "stock");
}

#[tokio::test]
async fn test_delete_product_is_soft() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let created = app
        .create_product(&admin.token, product("Widget", 9.99, "Tools", 5))
        .await;
    let uri = format!("/api/products/{}", created["id"].as_str().unwrap());

    let (status, body) = app.delete(&uri, Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");
    assert!(body.get("data").is_none());

    let (_, body) = app.get("/api/products", None).await;
    assert_eq!(body["pagination"]["total"], 0);

    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], false);

    let (_, body) = app.get("/api/products?isActive=false", None).await;
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_categories_exclude_inactive_products() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.create_product(&admin.token, product("Laptop Pro", 1299.99, "Electronics", 50))
        .await;
    app.create_product(&admin.token, product("Coffee Maker", 89.99, "Appliances", 25))
        .await;
    let shoes = app
        .create_product(&admin.token, product("Running Shoes", 129.99, "Sports", 75))
        .await;
    app.delete(
        &format!("/api/products/{}", shoes["id"].as_str().unwrap()),
        Some(&admin.token),
    )
    .await;

    let (status, body) = app.get("/api/products/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product categories retrieved successfully");
    assert_eq!(body["data"], json!(["Appliances", "Electronics"]));
}

#[tokio::test]
async fn test_stats_cover_every_product() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.create_product(&admin.token, product("Cheap", 10.0, "Misc", 5))
        .await;
    let pricey = app
        .create_product(&admin.token, product("Pricey", 30.0, "Misc", 15))
        .await;
    app.delete(
        &format!("/api/products/{}", pricey["id"].as_str().unwrap()),
        Some(&admin.token),
    )
    .await;

    let (status, body) = app.get("/api/products/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product statistics retrieved successfully");

    let stats = &body["data"];
    assert_eq!(stats["totalProducts"], 2);
    assert_eq!(stats["activeProducts"], 1);
    assert_eq!(stats["inactiveProducts"], 1);
    assert_eq!(stats["averagePrice"], 20.0);
    assert_eq!(stats["minPrice"], 10.0);
    assert_eq!(stats["maxPrice"], 30.0);
    assert_eq!(stats["totalStock"], 20);
}

#[tokio::test]
async fn test_stats_empty_catalogue() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/products/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalProducts"], 0);
    assert_eq!(body["data"]["averagePrice"], 0.0);
}

#[tokio::test]
async fn test_product_writes_require_admin() {
    let app = TestApp::new();

    let (status, _) = app
        .post("/api/products", None, product("Widget", 9.99, "Tools", 5))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = app.regular_user().await;
    let (status, _) = app
        .delete(
            &format!("/api/products/{}", uuid::Uuid::new_v4()),
            Some(&user.token),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
