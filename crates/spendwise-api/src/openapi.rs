//! OpenAPI Documentation
//!
//! OpenAPI 3.0 document for the Spendwise API, served with Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::dto;
use crate::error::ErrorResponse;
use crate::handlers;

/// Spendwise API Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Spendwise API",
        description = "Departmental expense tracking with monthly limits, carryover between months, and atomic expense admission.",
        version = "1.0.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    paths(
        // Health
        handlers::health::health_check,
        handlers::health::readiness_check,
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh_token,
        handlers::auth::logout,
        // Departments
        handlers::departments::list_departments,
        handlers::departments::create_department,
        handlers::departments::rename_department,
        handlers::departments::delete_department,
        handlers::departments::available_funds,
        // Employees
        handlers::employees::list_employees,
        handlers::employees::create_employee,
        handlers::employees::list_positions,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,
        // Expense types
        handlers::expense_types::list_categories,
        handlers::expense_types::create_category,
        handlers::expense_types::update_category,
        handlers::expense_types::delete_category,
        // Expenses
        handlers::expenses::create_expense,
        handlers::expenses::list_expenses,
        // Limits
        handlers::limits::list_limits,
        handlers::limits::upsert_limit,
        handlers::limits::update_limit,
        handlers::limits::delete_limit,
        // Dashboard
        handlers::dashboard::dashboard_summary,
    ),
    components(
        schemas(
            // Common
            ErrorResponse,
            dto::FundsInfo,
            dto::SuccessResponse,
            dto::EmployeePage,
            dto::ExpensePage,
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
            handlers::health::ComponentStatus,
            // Auth
            dto::RegisterRequest,
            dto::RegisterResponse,
            dto::LoginRequest,
            dto::LoginResponse,
            dto::UserInfo,
            dto::RefreshTokenRequest,
            dto::RefreshTokenResponse,
            // Departments
            dto::DepartmentRequest,
            dto::DepartmentResponse,
            dto::DepartmentFundsResponse,
            // Employees
            dto::CreateEmployeeRequest,
            dto::UpdateEmployeeRequest,
            dto::EmployeeResponse,
            // Expense types
            dto::CreateCategoryRequest,
            dto::UpdateCategoryRequest,
            dto::CategoryResponse,
            // Expenses
            dto::CreateExpenseRequest,
            dto::CreateExpenseResponse,
            dto::ExpenseResponse,
            dto::LimitInfo,
            // Limits
            dto::UpsertLimitRequest,
            dto::UpdateLimitRequest,
            dto::LimitResponse,
            // Dashboard
            dto::DashboardResponse,
            dto::PeriodInfo,
            dto::SummaryTotals,
        )
    ),
    tags(
        (name = "Health", description = "Service health and status"),
        (name = "Authentication", description = "Registration, login and tokens"),
        (name = "Departments", description = "Departments and their available funds"),
        (name = "Employees", description = "Employee directory"),
        (name = "Expense Types", description = "Expense categories and per-transaction caps"),
        (name = "Expenses", description = "Expense admission and history"),
        (name = "Limits", description = "Monthly department limits"),
        (name = "Dashboard", description = "Organisation-wide funds summary")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security scheme modifier
pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serialize the OpenAPI document
pub fn openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Spendwise API");
        assert_eq!(doc.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_json_lists_admission_path() {
        let json = openapi_json().unwrap();
        assert!(json.contains("/api/v1/expenses"));
        assert!(json.contains("/api/v1/departments/{id}/available-funds"));
        assert!(json.contains("\"bearer\""));
    }
}
