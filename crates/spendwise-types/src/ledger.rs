//! Monthly limit ledger types
//!
//! One [`LimitLedgerEntry`] per (department, period) records what was
//! assigned and what has been spent. Unused or overspent amounts flow into
//! later periods as carryover.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{validate_money, DepartmentId, LimitEntryId, Period, Result, SpendError};

/// Assigned limit and running spend for one department in one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitLedgerEntry {
    pub id: LimitEntryId,
    pub department_id: DepartmentId,
    pub period: Period,
    /// Non-negative limit assigned for the period
    pub assigned_limit: Decimal,
    /// Sum of admitted expense amounts in the period
    pub spent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LimitLedgerEntry {
    /// New entry with the given opening spend
    pub fn new(
        department_id: DepartmentId,
        period: Period,
        assigned_limit: Decimal,
        spent: Decimal,
    ) -> Result<Self> {
        validate_assigned_limit(assigned_limit)?;
        let now = Utc::now();
        Ok(Self {
            id: LimitEntryId::new(),
            department_id,
            period,
            assigned_limit,
            spent,
            created_at: now,
            updated_at: now,
        })
    }

    /// `assigned_limit - spent`; negative when overspent
    pub fn balance(&self) -> Decimal {
        self.assigned_limit - self.spent
    }

    /// True if this entry is keyed by `department_id` and `period`
    pub fn is_for(&self, department_id: DepartmentId, period: Period) -> bool {
        self.department_id == department_id && self.period == period
    }
}

/// Reject negative and unstorable limits
pub fn validate_assigned_limit(limit: Decimal) -> Result<()> {
    if limit < Decimal::ZERO {
        return Err(SpendError::Validation(format!(
            "assigned limit must not be negative, got {}",
            limit
        )));
    }
    validate_money("assigned limit", limit)
}

/// Budget position of a department for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveLimit {
    pub assigned_limit: Decimal,
    pub spent: Decimal,
    pub carryover: Decimal,
    /// `assigned_limit + carryover`
    pub effective_limit: Decimal,
    /// `effective_limit - spent`
    pub available: Decimal,
}

impl EffectiveLimit {
    pub fn new(assigned_limit: Decimal, spent: Decimal, carryover: Decimal) -> Self {
        let effective_limit = assigned_limit + carryover;
        Self {
            assigned_limit,
            spent,
            carryover,
            effective_limit,
            available: effective_limit - spent,
        }
    }

    /// True if `amount` more can be spent without exceeding the effective limit
    pub fn admits(&self, amount: Decimal) -> bool {
        self.spent + amount <= self.effective_limit
    }

    /// [`admits`](Self::admits), as the rejection the caller sees
    pub fn ensure_admits(&self, amount: Decimal) -> Result<()> {
        if self.admits(amount) {
            return Ok(());
        }
        Err(SpendError::EffectiveLimitExceeded {
            effective_limit: self.effective_limit,
            spent: self.spent,
            remaining: self.available,
            carryover: self.carryover,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_effective_limit_arithmetic() {
        let limit = EffectiveLimit::new(dec!(800), dec!(0), dec!(700));
        assert_eq!(limit.effective_limit, dec!(1500));
        assert_eq!(limit.available, dec!(1500));
        assert!(limit.admits(dec!(1500)));
        assert!(!limit.admits(dec!(1500.01)));
    }

    #[test]
    fn test_negative_carryover_shrinks_limit() {
        let limit = EffectiveLimit::new(dec!(500), dec!(100), dec!(-200));
        assert_eq!(limit.effective_limit, dec!(300));
        assert_eq!(limit.available, dec!(200));
    }

    #[test]
    fn test_entry_rejects_negative_limit() {
        let period = Period::new(2024, 6).unwrap();
        assert!(LimitLedgerEntry::new(DepartmentId::new(), period, dec!(-1), dec!(0)).is_err());

        let entry = LimitLedgerEntry::new(DepartmentId::new(), period, dec!(1000), dec!(300)).unwrap();
        assert_eq!(entry.balance(), dec!(700));
    }

    #[test]
    fn test_ensure_admits_reports_position() {
        let limit = EffectiveLimit::new(dec!(1000), dec!(1400), dec!(500));
        assert!(limit.ensure_admits(dec!(100)).is_ok());
        match limit.ensure_admits(dec!(100.01)) {
            Err(SpendError::EffectiveLimitExceeded {
                effective_limit,
                remaining,
                ..
            }) => {
                assert_eq!(effective_limit, dec!(1500));
                assert_eq!(remaining, dec!(100));
            }
            other => panic!("expected EffectiveLimitExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_assigned_limit_must_fit_storage() {
        assert!(matches!(
            validate_assigned_limit(dec!(1000.125)),
            Err(SpendError::Validation(_))
        ));
        assert!(matches!(
            validate_assigned_limit(dec!(1000000000000)),
            Err(SpendError::Validation(_))
        ));
        assert!(validate_assigned_limit(dec!(1000.50)).is_ok());
        assert!(validate_assigned_limit(dec!(0)).is_ok());
    }
}
