/// Integration tests for the HR Desk API
///
/// These tests run the full router against PostgreSQL:
/// - Registration, login and logout with bearer tokens
/// - Company and employee CRUD with image uploads
/// - Image scaling and replacement on disk
/// - Listing, pagination and filtering
///
/// Run with `DATABASE_URL` set and `cargo test -- --ignored`.

mod common;

use axum::http::StatusCode;
use common::{dimensions, json_request, png_part, unique_email, Part, TestContext};
use serde_json::{json, Value};
use uuid::Uuid;

async fn register(ctx: &TestContext, email: &str, password: &str) -> (StatusCode, Value) {
    ctx.post_json(
        "/api/register",
        &json!({
            "name": "Ada Lovelace",
            "email": email,
            "role": "admin",
            "password": password
        }),
    )
    .await
}

async fn create_company(ctx: &TestContext, email: &str, width: u32, height: u32) -> Value {
    let (status, body) = ctx
        .send_multipart(
            "POST",
            "/api/companys",
            &[
                Part::Text("name", "Acme"),
                Part::Text("email", email),
                Part::Text("website", "https://acme.example.com"),
                png_part("logo", width, height),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK, "company create failed: {}", body);
    body["data"].clone()
}

async fn create_employee(ctx: &TestContext, company_id: &str, name: &str, phone: &str) -> Value {
    let email = unique_email("employee");
    let (status, body) = ctx
        .send_multipart(
            "POST",
            "/api/employees",
            &[
                Part::Text("company_id", company_id),
                Part::Text("name", name),
                Part::Text("email", &email),
                Part::Text("phone", phone),
                png_part("profile", 640, 480),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::OK, "employee create failed: {}", body);
    body["data"].clone()
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_register_rejects_duplicate_email() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("register");

    let (status, body) = register(&ctx, &email, "password1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "success");
    assert!(body["token"].as_str().unwrap().starts_with("hrd_"));

    let (status, body) = register(&ctx, &email.to_uppercase(), "password1").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "validation error");
    assert_eq!(body["errors"]["email"][0], "The email has already been taken.");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("login");
    register(&ctx, &email, "password1").await;

    let (wrong_status, wrong_body) = ctx
        .post_json("/api/login", &json!({"email": email, "password": "password2"}))
        .await;
    let (unknown_status, unknown_body) = ctx
        .post_json(
            "/api/login",
            &json!({"email": unique_email("nobody"), "password": "password1"}),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "The provided credentials are incorrect");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_login_and_logout() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("session");
    register(&ctx, &email, "password1").await;

    let (status, body) = ctx
        .post_json("/api/login", &json!({"email": email, "password": "password1"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successfully");
    assert_eq!(body["user"]["email"], email.as_str());
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send(json_request("POST", "/api/logout", &json!({}), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You are logged out");

    // Every token was revoked
    let (status, _) = ctx
        .send(json_request("POST", "/api/logout", &json!({}), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_user_update_rehashes_password() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("update");
    register(&ctx, &email, "password1").await;

    let (_, body) = ctx
        .post_json("/api/login", &json!({"email": email, "password": "password1"}))
        .await;
    let id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send(json_request(
            "PUT",
            &format!("/api/users/{}", id),
            &json!({
                "name": "Ada King",
                "email": email,
                "role": "manager",
                "password": "new-password"
            }),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["role"], "manager");

    let (status, _) = ctx
        .post_json("/api/login", &json!({"email": email, "password": "new-password"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.delete(&format!("/api/users/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Delete successfully");

    let (status, _) = ctx.get(&format!("/api/users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_company_logo_is_scaled_to_300px() {
    let ctx = TestContext::new().await.unwrap();

    let company = create_company(&ctx, &unique_email("wide"), 800, 400).await;
    let key = company["logo"].as_str().unwrap();

    assert!(key.ends_with("_picture.png"));
    assert_eq!(dimensions(&ctx.stored(key)), (300, 150));

    let (status, body) = ctx
        .get(&format!("/api/companys/{}", company["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logo"], key);

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_narrow_logo_keeps_its_width() {
    let ctx = TestContext::new().await.unwrap();

    let company = create_company(&ctx, &unique_email("narrow"), 120, 80).await;
    let key = company["logo"].as_str().unwrap();

    assert_eq!(dimensions(&ctx.stored(key)), (120, 80));

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_company_update_replaces_logo() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("replace");

    let company = create_company(&ctx, &email, 500, 500).await;
    let id = company["id"].as_str().unwrap();
    let old_key = company["logo"].as_str().unwrap().to_string();

    // Without a logo the stored one is kept
    let (status, body) = ctx
        .send_multipart(
            "PUT",
            &format!("/api/companys/{}", id),
            &[
                Part::Text("name", "Acme Renamed"),
                Part::Text("email", &email),
                Part::Text("website", "https://acme.example.com"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["logo"], old_key.as_str());
    assert_eq!(body["data"]["name"], "Acme Renamed");

    // POST alias with a new logo
    let (status, body) = ctx
        .send_multipart(
            "POST",
            &format!("/api/companys/{}", id),
            &[
                Part::Text("name", "Acme Renamed"),
                Part::Text("email", &email),
                Part::Text("website", "https://acme.example.com"),
                png_part("logo", 900, 300),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Company updated successfully");

    let new_key = body["data"]["logo"].as_str().unwrap();
    assert_ne!(new_key, old_key);
    assert!(!ctx.stored(&old_key).exists());
    assert_eq!(dimensions(&ctx.stored(new_key)), (300, 100));

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_company_destroy() {
    let ctx = TestContext::new().await.unwrap();

    let company = create_company(&ctx, &unique_email("destroy"), 50, 50).await;
    let id = company["id"].as_str().unwrap();
    let key = company["logo"].as_str().unwrap();
    assert!(ctx.stored(key).exists());

    let (status, body) = ctx.delete(&format!("/api/companys/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Delete successfully");
    assert!(!ctx.stored(key).exists());

    let (status, body) = ctx.delete(&format!("/api/companys/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], false);

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_missing_records_are_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let id = Uuid::new_v4();

    for uri in [
        format!("/api/companys/{}", id),
        format!("/api/employees/{}", id),
        format!("/api/users/{}", id),
    ] {
        let (status, body) = ctx.delete(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["status"], false);
    }
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_employee_requires_existing_company() {
    let ctx = TestContext::new().await.unwrap();
    let email = unique_email("orphan");

    let (status, body) = ctx
        .send_multipart(
            "POST",
            "/api/employees",
            &[
                Part::Text("company_id", &Uuid::new_v4().to_string()),
                Part::Text("name", "Ann"),
                Part::Text("email", &email),
                Part::Text("phone", "555-0100"),
                png_part("profile", 100, 100),
            ],
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["company_id"][0],
        "The selected company id is invalid."
    );

    let (_, page) = ctx.get(&format!("/api/employees?email={}", email)).await;
    assert_eq!(page["total"], 0);

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_employee_lifecycle() {
    let ctx = TestContext::new().await.unwrap();

    let company = create_company(&ctx, &unique_email("employer"), 300, 300).await;
    let company_id = company["id"].as_str().unwrap();

    let employee = create_employee(&ctx, company_id, "Grace Hopper", "555-0100").await;
    let id = employee["id"].as_str().unwrap();
    let old_key = employee["profile"].as_str().unwrap().to_string();
    assert_eq!(dimensions(&ctx.stored(&old_key)), (300, 225));

    let email = unique_email("grace");
    let (status, body) = ctx
        .send_multipart(
            "PUT",
            &format!("/api/employees/{}", id),
            &[
                Part::Text("name", "Grace B. Hopper"),
                Part::Text("email", &email),
                Part::Text("phone", "555-0199"),
                png_part("profile", 200, 100),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Employee updated successfully");
    assert_eq!(body["data"]["company_id"], company_id);

    let new_key = body["data"]["profile"].as_str().unwrap().to_string();
    assert_ne!(new_key, old_key);
    assert!(!ctx.stored(&old_key).exists());
    assert_eq!(dimensions(&ctx.stored(&new_key)), (200, 100));

    let (status, body) = ctx.delete(&format!("/api/employees/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Delete successfully");
    assert!(!ctx.stored(&new_key).exists());

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_employee_index_filters() {
    let ctx = TestContext::new().await.unwrap();
    let tag = Uuid::new_v4().simple().to_string();

    let company = create_company(&ctx, &unique_email("filters"), 100, 100).await;
    let company_id = company["id"].as_str().unwrap();

    let phone = format!("555-{}", tag);
    create_employee(&ctx, company_id, "Ann Smith", &phone).await;
    create_employee(&ctx, company_id, "ANNE Jones", &phone).await;
    create_employee(&ctx, company_id, "Bob Stone", &phone).await;

    let (status, page) = ctx.get(&format!("/api/employees?phone={}", tag)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["per_page"], 5);
    assert_eq!(page["current_page"], 1);

    // Case-insensitive substring, combined with AND
    let (_, page) = ctx
        .get(&format!("/api/employees?name=ann&phone={}", tag))
        .await;
    assert_eq!(page["total"], 2);

    let (_, page) = ctx
        .get(&format!("/api/employees?name=bob&email=example&phone={}", tag))
        .await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["name"], "Bob Stone");

    ctx.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_listings_are_wrapped_and_paginated() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.get("/api/users?page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["per_page"], 5);
    assert!(body["data"]["data"].as_array().unwrap().len() <= 5);

    let (status, body) = ctx.get("/api/companys?page=garbage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current_page"], 1);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_health_reports_database() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
