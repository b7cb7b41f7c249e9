//! Carryover calculation
//!
//! Carryover is the signed running balance of every period before the
//! target: `sum(assigned_limit - spent)` over all strictly earlier entries
//! of the department. Overspending in the past shrinks it, so it may be
//! negative. It is never clamped here.

use rust_decimal::Decimal;
use spendwise_types::{DepartmentId, LimitLedgerEntry, Period};

/// Carryover into `target` for `department_id`, given any set of entries
pub fn carryover<'a, I>(entries: I, department_id: DepartmentId, target: Period) -> Decimal
where
    I: IntoIterator<Item = &'a LimitLedgerEntry>,
{
    entries
        .into_iter()
        .filter(|e| e.department_id == department_id && e.period.precedes(&target))
        .map(LimitLedgerEntry::balance)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(dept: DepartmentId, year: i32, month: u32, limit: Decimal, spent: Decimal) -> LimitLedgerEntry {
        LimitLedgerEntry::new(dept, Period::new(year, month).unwrap(), limit, spent).unwrap()
    }

    #[test]
    fn test_no_history_is_zero() {
        let dept = DepartmentId::new();
        let target = Period::new(2024, 6).unwrap();
        let entries: Vec<LimitLedgerEntry> = Vec::new();
        assert_eq!(carryover(&entries, dept, target), Decimal::ZERO);
    }

    #[test]
    fn test_sums_strictly_earlier_periods_only() {
        let dept = DepartmentId::new();
        let entries = vec![
            entry(dept, 2024, 1, dec!(1000), dec!(300)),
            entry(dept, 2024, 2, dec!(500), dec!(450)),
            entry(dept, 2024, 3, dec!(800), dec!(100)),
            entry(dept, 2024, 4, dec!(900), dec!(0)),
        ];

        let target = Period::new(2024, 3).unwrap();
        assert_eq!(carryover(&entries, dept, target), dec!(750));
    }

    #[test]
    fn test_ignores_other_departments() {
        let ops = DepartmentId::new();
        let sales = DepartmentId::new();
        let entries = vec![
            entry(ops, 2024, 5, dec!(1000), dec!(300)),
            entry(sales, 2024, 5, dec!(9999), dec!(0)),
        ];

        let target = Period::new(2024, 6).unwrap();
        assert_eq!(carryover(&entries, ops, target), dec!(700));
    }

    #[test]
    fn test_overspend_goes_negative() {
        let dept = DepartmentId::new();
        let entries = vec![
            entry(dept, 2023, 11, dec!(200), dec!(500)),
            entry(dept, 2023, 12, dec!(100), dec!(0)),
        ];

        let target = Period::new(2024, 1).unwrap();
        assert_eq!(carryover(&entries, dept, target), dec!(-200));
    }

    #[test]
    fn test_year_boundary_ordering() {
        let dept = DepartmentId::new();
        let entries = vec![entry(dept, 2023, 12, dec!(100), dec!(0))];

        assert_eq!(carryover(&entries, dept, Period::new(2024, 1).unwrap()), dec!(100));
        assert_eq!(carryover(&entries, dept, Period::new(2023, 12).unwrap()), dec!(0));
    }
}
