//! Effective limit resolution
//!
//! Combines a period's own ledger entry with the carryover from earlier
//! periods. Pure read; nothing here mutates the ledger.

use spendwise_types::{DepartmentId, EffectiveLimit, LimitLedgerEntry, Period, Result};

use crate::carryover::carryover;
use crate::store::LimitLedger;

/// Resolution result with the entry it was computed from
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The target period's entry, if one is configured
    pub entry: Option<LimitLedgerEntry>,
    pub limit: EffectiveLimit,
}

/// Resolve from an in-hand set of entries. A missing target entry counts
/// as an assigned limit and spend of zero.
pub fn resolve_from(
    entries: &[LimitLedgerEntry],
    department_id: DepartmentId,
    target: Period,
) -> Resolution {
    let entry = entries
        .iter()
        .find(|e| e.is_for(department_id, target))
        .cloned();
    let (assigned_limit, spent) = entry
        .as_ref()
        .map(|e| (e.assigned_limit, e.spent))
        .unwrap_or_default();

    Resolution {
        entry,
        limit: EffectiveLimit::new(assigned_limit, spent, carryover(entries, department_id, target)),
    }
}

/// Resolve against the stored ledger
pub async fn resolve<L>(ledger: &L, department_id: DepartmentId, target: Period) -> Result<Resolution>
where
    L: LimitLedger + ?Sized,
{
    let entries = ledger.list_entries_for(department_id).await?;
    Ok(resolve_from(&entries, department_id, target))
}
