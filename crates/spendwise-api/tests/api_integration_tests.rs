//! API Integration Tests
//!
//! Drives the full router over an in-memory store and verifies the
//! request/response cycle, including authentication.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use spendwise_api::{create_test_router, AppState};
use spendwise_auth::{AuthConfig, AuthService};
use std::sync::Arc;
use tower::ServiceExt;

const PASSWORD: &str = "budget-Tracker-91";

/// Test helper to create a router over an empty in-memory store
fn test_router() -> Router {
    let mut config = AuthConfig::default();
    config.jwt.secret = "integration-test-secret-with-enough-bytes".to_string();
    // Keep hashing cheap in tests
    config.password.memory_cost = 1024;
    config.password.time_cost = 1;

    let state = AppState::in_memory(Arc::new(AuthService::new(config)));
    create_test_router(Arc::new(state))
}

/// Test helper to make a request and get JSON response
async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let body = match body {
        Some(json_body) => Body::from(serde_json::to_vec(&json_body).unwrap()),
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));

    (status, json)
}

/// Register and log in, returning the access token
async fn login(router: &Router, email: &str) -> String {
    let credentials = json!({ "email": email, "password": PASSWORD });

    let (status, _) =
        json_request(router, "POST", "/api/v1/auth/register", None, Some(credentials.clone()))
            .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) =
        json_request(router, "POST", "/api/v1/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().unwrap().to_string()
}

/// Create a department, returning its id
async fn create_department(router: &Router, token: &str, name: &str) -> String {
    let (status, json) = json_request(
        router,
        "POST",
        "/api/v1/departments",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

/// Create an employee, returning its id
async fn create_employee(router: &Router, token: &str, department_id: &str, name: &str) -> String {
    let (status, json) = json_request(
        router,
        "POST",
        "/api/v1/employees",
        Some(token),
        Some(json!({ "name": name, "position": "Analyst", "departmentId": department_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

/// Create an expense category, returning its id
async fn create_category(router: &Router, token: &str, name: &str, cap: &str) -> String {
    let (status, json) = json_request(
        router,
        "POST",
        "/api/v1/expense-types",
        Some(token),
        Some(json!({ "name": name, "transactionCap": cap })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

/// Set a monthly limit, returning the status
async fn set_limit(
    router: &Router,
    token: &str,
    department_id: &str,
    year: i32,
    month: u32,
    amount: &str,
) -> (StatusCode, Value) {
    json_request(
        router,
        "POST",
        "/api/v1/limits",
        Some(token),
        Some(json!({
            "departmentId": department_id,
            "year": year,
            "month": month,
            "assignedLimit": amount,
        })),
    )
    .await
}

struct Fixture {
    router: Router,
    token: String,
    department_id: String,
    employee_id: String,
    category_id: String,
}

impl Fixture {
    async fn new() -> Self {
        let router = test_router();
        let token = login(&router, "finance@example.com").await;
        let department_id = create_department(&router, &token, "Research").await;
        let employee_id = create_employee(&router, &token, &department_id, "Ada").await;
        let category_id = create_category(&router, &token, "Travel", "2000.00").await;
        Self {
            router,
            token,
            department_id,
            employee_id,
            category_id,
        }
    }

    async fn submit(&self, amount: &str, date: &str) -> (StatusCode, Value) {
        json_request(
            &self.router,
            "POST",
            "/api/v1/expenses",
            Some(&self.token),
            Some(json!({
                "amount": amount,
                "date": date,
                "categoryId": self.category_id,
                "employeeId": self.employee_id,
                "departmentId": self.department_id,
            })),
        )
        .await
    }
}

// =============================================================================
// Public Endpoint Tests (No Auth Required)
// =============================================================================

mod public_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let router = test_router();
        let (status, json) = json_request(&router, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_pings_store() {
        let router = test_router();
        let (status, json) = json_request(&router, "GET", "/ready", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ready");
        assert_eq!(json["storage"]["status"], "healthy");
    }
}

// =============================================================================
// Authentication Tests
// =============================================================================

mod auth_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_register_returns_user_without_hash() {
        let router = test_router();
        let (status, json) = json_request(
            &router,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "Ops@Example.com", "password": PASSWORD })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["user"]["email"], "ops@example.com");
        assert!(json["user"]["id"].is_string());
        assert!(json["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let router = test_router();
        login(&router, "ops@example.com").await;

        let (status, json) = json_request(
            &router,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "OPS@example.com", "password": PASSWORD })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], -4005);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let router = test_router();
        let (status, json) = json_request(
            &router,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], -1102);

        let (status, _) = json_request(
            &router,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "weak@example.com", "password": "onlyletters" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let router = test_router();
        login(&router, "ops@example.com").await;

        let (status, json) = json_request(
            &router,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "ops@example.com", "password": "wrong-password-1" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], -1005);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let router = test_router();

        let (status, json) = json_request(&router, "GET", "/api/v1/departments", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], -1010);

        let (status, _) =
            json_request(&router, "GET", "/api/v1/departments", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let router = test_router();
        let credentials = json!({ "email": "ops@example.com", "password": PASSWORD });
        json_request(&router, "POST", "/api/v1/auth/register", None, Some(credentials.clone()))
            .await;
        let (_, login) =
            json_request(&router, "POST", "/api/v1/auth/login", None, Some(credentials)).await;
        let refresh = login["refreshToken"].as_str().unwrap().to_string();

        let (status, json) = json_request(
            &router,
            "POST",
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let new_token = json["token"].as_str().unwrap();
        let (status, _) =
            json_request(&router, "GET", "/api/v1/departments", Some(new_token), None).await;
        assert_eq!(status, StatusCode::OK);

        // The old refresh token was consumed
        let (status, _) = json_request(
            &router,
            "POST",
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_revokes_access_token() {
        let router = test_router();
        let token = login(&router, "ops@example.com").await;

        let (status, json) =
            json_request(&router, "POST", "/api/v1/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);

        let (status, _) =
            json_request(&router, "GET", "/api/v1/departments", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_revoked_bearer_does_not_block_public_routes() {
        let router = test_router();
        let credentials = json!({ "email": "ops@example.com", "password": PASSWORD });
        json_request(&router, "POST", "/api/v1/auth/register", None, Some(credentials.clone()))
            .await;
        let (_, session) =
            json_request(&router, "POST", "/api/v1/auth/login", None, Some(credentials.clone()))
                .await;
        let stale = session["token"].as_str().unwrap().to_string();
        let refresh = session["refreshToken"].as_str().unwrap().to_string();
        json_request(&router, "POST", "/api/v1/auth/logout", Some(&stale), None).await;

        // Clients keep sending the old header; public routes ignore it
        let (status, json) = json_request(
            &router,
            "POST",
            "/api/v1/auth/refresh",
            Some(&stale),
            Some(json!({ "refreshToken": refresh })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["token"].is_string());

        let (status, _) =
            json_request(&router, "POST", "/api/v1/auth/login", Some(&stale), Some(credentials))
                .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = json_request(&router, "GET", "/health", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::OK);

        // Routes that need a caller answer with the API error body
        let (status, json) =
            json_request(&router, "GET", "/api/v1/departments", Some(&stale), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], -1010);
        assert!(json.get("error").is_none());

        let (status, json) =
            json_request(&router, "POST", "/api/v1/auth/logout", Some(&stale), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], -1010);
    }

    #[tokio::test]
    async fn test_error_body_carries_request_id() {
        let router = test_router();
        let request = Request::builder()
            .method("GET")
            .uri("/api/v1/departments")
            .header("x-request-id", "req-7f3a")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], -1010);
        assert_eq!(json["requestId"], "req-7f3a");
    }
}

// =============================================================================
// Directory Tests
// =============================================================================

mod directory_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_departments_sorted_with_counts_and_funds() {
        let router = test_router();
        let token = login(&router, "ops@example.com").await;
        let sales = create_department(&router, &token, "Sales").await;
        create_department(&router, &token, "Engineering").await;
        create_employee(&router, &token, &sales, "Grace").await;

        let (status, json) =
            json_request(&router, "GET", "/api/v1/departments", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let departments = json.as_array().unwrap();
        assert_eq!(departments.len(), 2);
        assert_eq!(departments[0]["name"], "Engineering");
        assert_eq!(departments[1]["name"], "Sales");
        assert_eq!(departments[1]["employeeCount"], 1);
        assert_eq!(departments[1]["funds"]["effectiveLimit"], "0");
    }

    #[tokio::test]
    async fn test_duplicate_department_conflicts() {
        let router = test_router();
        let token = login(&router, "ops@example.com").await;
        create_department(&router, &token, "Sales").await;

        let (status, json) = json_request(
            &router,
            "POST",
            "/api/v1/departments",
            Some(&token),
            Some(json!({ "name": "Sales" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], -4003);
    }

    #[tokio::test]
    async fn test_department_with_employees_cannot_be_deleted() {
        let fx = Fixture::new().await;
        let uri = format!("/api/v1/departments/{}", fx.department_id);

        let (status, json) = json_request(&fx.router, "DELETE", &uri, Some(&fx.token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], -4006);
        assert_eq!(json["details"]["employeeCount"], 1);

        let employee_uri = format!("/api/v1/employees/{}", fx.employee_id);
        let (status, _) =
            json_request(&fx.router, "DELETE", &employee_uri, Some(&fx.token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = json_request(&fx.router, "DELETE", &uri, Some(&fx.token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_employee_pagination_and_positions() {
        let router = test_router();
        let token = login(&router, "ops@example.com").await;
        let department = create_department(&router, &token, "Sales").await;
        for name in ["A", "B", "C"] {
            create_employee(&router, &token, &department, name).await;
        }
        json_request(
            &router,
            "POST",
            "/api/v1/employees",
            Some(&token),
            Some(json!({ "name": "D", "position": "Manager", "departmentId": department })),
        )
        .await;

        let (status, json) = json_request(
            &router,
            "GET",
            "/api/v1/employees?page=2&limit=3",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalCount"], 4);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["items"].as_array().unwrap().len(), 1);

        let (_, json) = json_request(
            &router,
            "GET",
            "/api/v1/employees?position=Manager",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["items"][0]["name"], "D");

        let (_, json) = json_request(
            &router,
            "GET",
            "/api/v1/employees/positions",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(json, json!(["Analyst", "Manager"]));
    }

    #[tokio::test]
    async fn test_employee_for_unknown_department_is_not_found() {
        let router = test_router();
        let token = login(&router, "ops@example.com").await;

        let (status, json) = json_request(
            &router,
            "POST",
            "/api/v1/employees",
            Some(&token),
            Some(json!({
                "name": "Ada",
                "position": "Analyst",
                "departmentId": "00000000-0000-0000-0000-000000000001",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], -2002);
    }
}

// =============================================================================
// Limit and Admission Tests
// =============================================================================

mod admission_endpoints {
    use super::*;

    #[tokio::test]
    async fn test_upsert_limit_created_then_replaced() {
        let fx = Fixture::new().await;

        let (status, json) = set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 1, "1000.00").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["assignedLimit"], "1000.00");
        assert_eq!(json["spent"], "0");

        let (status, json) = set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 1, "1200.00").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["assignedLimit"], "1200.00");

        let (_, json) = json_request(
            &fx.router,
            "GET",
            &format!("/api/v1/limits?department={}", fx.department_id),
            Some(&fx.token),
            None,
        )
        .await;
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_month_is_rejected() {
        let fx = Fixture::new().await;
        let (status, _) = set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 13, "1000.00").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_expense_without_limit_is_unprocessable() {
        let fx = Fixture::new().await;

        let (status, json) = fx.submit("100.00", "2024-03-10T12:00:00Z").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], -3002);
        assert_eq!(json["details"]["month"], 3);
    }

    #[tokio::test]
    async fn test_transaction_cap_is_enforced() {
        let fx = Fixture::new().await;
        set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 3, "10000.00").await;

        let (status, json) = fx.submit("2000.01", "2024-03-10T12:00:00Z").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], -3001);
        assert_eq!(json["details"]["cap"], "2000.00");

        // Exactly at the cap is allowed
        let (status, _) = fx.submit("2000.00", "2024-03-10T12:00:00Z").await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_carryover_raises_effective_limit() {
        let fx = Fixture::new().await;
        set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 1, "1000.00").await;
        let (status, _) = fx.submit("500.00", "2024-01-15T09:00:00Z").await;
        assert_eq!(status, StatusCode::CREATED);

        set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 2, "1000.00").await;

        let (status, json) = fx.submit("1400.00", "2024-02-03T09:00:00Z").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["expense"]["amount"], "1400.00");
        assert_eq!(json["limitInfo"]["month"], 2);
        assert_eq!(json["limitInfo"]["carryover"], "500.00");
        assert_eq!(json["limitInfo"]["effectiveLimit"], "1500.00");
        assert_eq!(json["limitInfo"]["spent"], "1400.00");
        assert_eq!(json["limitInfo"]["available"], "100.00");

        let (status, json) = fx.submit("200.00", "2024-02-20T09:00:00Z").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], -3003);
        assert_eq!(json["details"]["effectiveLimit"], "1500.00");
        assert_eq!(json["details"]["remaining"], "100.00");

        // The rejected expense left no trace
        let (_, json) = json_request(
            &fx.router,
            "GET",
            &format!("/api/v1/expenses?department={}", fx.department_id),
            Some(&fx.token),
            None,
        )
        .await;
        assert_eq!(json["totalCount"], 2);
        assert_eq!(json["items"][0]["amount"], "1400.00");
    }

    #[tokio::test]
    async fn test_overspend_carries_negative_balance() {
        let fx = Fixture::new().await;
        set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 1, "1000.00").await;
        fx.submit("900.00", "2024-01-15T09:00:00Z").await;
        // Lowering the limit below spent leaves an overspend
        set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 1, "800.00").await;
        set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 2, "1000.00").await;

        let (status, json) = fx.submit("950.00", "2024-02-10T09:00:00Z").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["details"]["carryover"], "-100.00");
        assert_eq!(json["details"]["effectiveLimit"], "900.00");

        let (status, _) = fx.submit("900.00", "2024-02-10T09:00:00Z").await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_employee_must_belong_to_department() {
        let fx = Fixture::new().await;
        let other = create_department(&fx.router, &fx.token, "Sales").await;
        set_limit(&fx.router, &fx.token, &other, 2024, 3, "1000.00").await;

        let (status, json) = json_request(
            &fx.router,
            "POST",
            "/api/v1/expenses",
            Some(&fx.token),
            Some(json!({
                "amount": "10.00",
                "date": "2024-03-10T12:00:00Z",
                "categoryId": fx.category_id,
                "employeeId": fx.employee_id,
                "departmentId": other,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], -1102);
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected() {
        let fx = Fixture::new().await;
        set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 3, "1000.00").await;

        let (status, _) = fx.submit("0", "2024-03-10T12:00:00Z").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_amounts_beyond_cents_are_rejected() {
        let fx = Fixture::new().await;
        let (status, json) =
            set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 3, "1000.005").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], -1102);

        set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 3, "1000.00").await;
        let (status, json) = fx.submit("0.001", "2024-03-10T12:00:00Z").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], -1102);

        let (status, _) = fx.submit("1000000000000.00", "2024-03-10T12:00:00Z").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_limit_filter_is_bad_request() {
        let fx = Fixture::new().await;
        let (status, json) = json_request(
            &fx.router,
            "GET",
            "/api/v1/limits?department=not-a-uuid",
            Some(&fx.token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], -1100);
    }

    #[tokio::test]
    async fn test_limit_with_expenses_cannot_be_deleted() {
        let fx = Fixture::new().await;
        let (_, entry) = set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 3, "1000.00").await;
        fx.submit("10.00", "2024-03-10T12:00:00Z").await;

        let uri = format!("/api/v1/limits/{}", entry["id"].as_str().unwrap());
        let (status, json) = json_request(&fx.router, "DELETE", &uri, Some(&fx.token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], -4010);
    }

    #[tokio::test]
    async fn test_patch_limit_keeps_spent() {
        let fx = Fixture::new().await;
        let (_, entry) = set_limit(&fx.router, &fx.token, &fx.department_id, 2024, 3, "1000.00").await;
        fx.submit("250.00", "2024-03-10T12:00:00Z").await;

        let uri = format!("/api/v1/limits/{}", entry["id"].as_str().unwrap());
        let (status, json) = json_request(
            &fx.router,
            "PATCH",
            &uri,
            Some(&fx.token),
            Some(json!({ "assignedLimit": "300.00" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["assignedLimit"], "300.00");
        assert_eq!(json["spent"], "250.00");
    }

    #[tokio::test]
    async fn test_dashboard_summary_shape() {
        let fx = Fixture::new().await;
        let (status, json) =
            json_request(&fx.router, "GET", "/api/v1/dashboard/summary", Some(&fx.token), None)
                .await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["period"]["year"].is_number());
        assert_eq!(json["summary"]["totalSpent"], "0");
        assert_eq!(json["byDepartment"][0]["departmentName"], "Research");
        assert!(json["recentExpenses"].as_array().unwrap().is_empty());
    }
}
