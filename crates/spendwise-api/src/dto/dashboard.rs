//! Dashboard DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendwise_ledger::DashboardSummary;
use utoipa::ToSchema;

use super::{DepartmentFundsResponse, ExpenseResponse};

/// Reporting month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PeriodInfo {
    pub year: i32,
    pub month: u32,
}

/// Organisation-wide totals
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    /// Current assigned limits plus the balance of every earlier period
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    pub total_available: Decimal,
}

/// Dashboard summary for the current period
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub period: PeriodInfo,
    pub summary: SummaryTotals,
    pub by_department: Vec<DepartmentFundsResponse>,
    pub recent_expenses: Vec<ExpenseResponse>,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            period: PeriodInfo {
                year: summary.period.year,
                month: summary.period.month,
            },
            summary: SummaryTotals {
                total_limit: summary.total_limit,
                total_spent: summary.total_spent,
                total_available: summary.total_available,
            },
            by_department: summary.by_department.into_iter().map(Into::into).collect(),
            recent_expenses: summary.recent_expenses.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spendwise_ledger::DepartmentFunds;
    use spendwise_types::{DepartmentId, EffectiveLimit, Period};

    #[test]
    fn test_dashboard_response_shape() {
        let period = Period::new(2024, 3).unwrap();
        let summary = DashboardSummary {
            period,
            total_limit: dec!(1500.00),
            total_spent: dec!(200.00),
            total_available: dec!(1300.00),
            by_department: vec![DepartmentFunds {
                department_id: DepartmentId::new(),
                department_name: "Research".to_string(),
                period,
                limit: EffectiveLimit::new(dec!(1000.00), dec!(200.00), dec!(500.00)),
            }],
            recent_expenses: Vec::new(),
        };

        let json = serde_json::to_value(DashboardResponse::from(summary)).unwrap();
        assert_eq!(json["period"]["month"], 3);
        assert_eq!(json["summary"]["totalLimit"], "1500.00");
        assert_eq!(json["summary"]["totalAvailable"], "1300.00");
        assert_eq!(json["byDepartment"][0]["departmentName"], "Research");
        assert_eq!(json["byDepartment"][0]["funds"]["carryover"], "500.00");
        assert!(json["recentExpenses"].as_array().unwrap().is_empty());
    }
}
