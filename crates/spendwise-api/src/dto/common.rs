//! Common DTO types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendwise_ledger::Page;
use spendwise_types::{EffectiveLimit, Period};
use utoipa::ToSchema;

use super::{EmployeeResponse, ExpenseResponse};

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_limit() -> u32 {
    10
}

/// Generic paginated response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(EmployeePage = PaginatedResponse<EmployeeResponse>, ExpensePage = PaginatedResponse<ExpenseResponse>)]
pub struct PaginatedResponse<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Total number of matching items
    pub total_count: u64,
    /// Number of pages at this page size
    pub total_pages: u32,
    /// 1-based page number
    pub current_page: u32,
}

impl<T, U: Into<T>> From<Page<U>> for PaginatedResponse<T> {
    fn from(page: Page<U>) -> Self {
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total_count: page.total_count,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

/// Effective-limit breakdown for one department and period
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FundsInfo {
    pub year: i32,
    pub month: u32,
    /// Limit configured for the period, zero when none is configured
    pub assigned_limit: Decimal,
    pub spent: Decimal,
    /// Balance brought forward from earlier periods; may be negative
    pub carryover: Decimal,
    pub effective_limit: Decimal,
    pub available: Decimal,
}

impl FundsInfo {
    pub fn new(period: Period, limit: EffectiveLimit) -> Self {
        Self {
            year: period.year,
            month: period.month,
            assigned_limit: limit.assigned_limit,
            spent: limit.spent,
            carryover: limit.carryover,
            effective_limit: limit.effective_limit,
            available: limit.available,
        }
    }
}

/// Generic success response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    /// Success indicator
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spendwise_ledger::PageRequest;

    #[test]
    fn test_paginated_response_from_page() {
        let page = PageRequest::new(2, 2).paginate(vec![1, 2, 3, 4, 5]);
        let response: PaginatedResponse<i64> = page.into();
        assert_eq!(response.items, vec![3, 4]);
        assert_eq!(response.total_count, 5);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.current_page, 2);
    }

    #[test]
    fn test_funds_info_serializes_money_as_strings() {
        let info = FundsInfo::new(
            Period::new(2024, 6).unwrap(),
            EffectiveLimit::new(dec!(1000.00), dec!(1100.00), dec!(500.00)),
        );
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["effectiveLimit"], "1500.00");
        assert_eq!(json["available"], "400.00");
        assert_eq!(json["month"], 6);
    }
}
