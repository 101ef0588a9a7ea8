use chrono::NaiveDate;

use crate::state::Obligation;
use crate::types::{ResolvedStatus, StoredStatus};

/// effective status of an obligation as of `today`; a pure read-time
/// projection, never persisted, so an obligation becomes overdue the instant
/// its due date passes without any batch job
pub fn resolve(status: StoredStatus, due_date: Option<NaiveDate>, today: NaiveDate) -> ResolvedStatus {
    match status {
        StoredStatus::Paid => ResolvedStatus::Paid,
        StoredStatus::Unpaid => match due_date {
            // strictly before today; due today is not yet overdue
            Some(due) if due < today => ResolvedStatus::Overdue,
            _ => ResolvedStatus::Unpaid,
        },
    }
}

/// convenience over a stored obligation
pub fn resolve_obligation(obligation: &Obligation, today: NaiveDate) -> ResolvedStatus {
    resolve(obligation.status, obligation.due_date, today)
}
