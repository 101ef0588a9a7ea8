use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::account::EnrollmentAccount;
use crate::decimal::Money;
use crate::status::resolve_obligation;
use crate::types::ResolvedStatus;

/// inclusive due-date window for bulk reporting filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueDateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DueDateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// read-only aggregate across many enrollments, for reporting and export
/// collaborators; never mutates obligations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PortfolioSummary {
    pub enrollment_count: usize,
    pub total_fees: Money,
    pub total_paid: Money,
    pub total_outstanding: Money,
    pub paid_obligations: usize,
    pub unpaid_obligations: usize,
    pub overdue_obligations: usize,
}

impl PortfolioSummary {
    /// aggregate balances and resolved-status counts across accounts; when a
    /// due-date range is given, obligation counts only include obligations due
    /// inside it (money totals stay per-enrollment)
    pub fn compute<'a, I>(accounts: I, today: NaiveDate, due_range: Option<DueDateRange>) -> Self
    where
        I: IntoIterator<Item = &'a EnrollmentAccount>,
    {
        let mut summary = PortfolioSummary::default();

        for account in accounts {
            let balance = account.balance(today);
            summary.enrollment_count += 1;
            summary.total_fees += balance.total_fee;
            summary.total_paid += balance.total_paid;
            summary.total_outstanding += balance.outstanding;

            for obligation in account.obligations() {
                if let Some(range) = due_range {
                    match obligation.due_date {
                        Some(due) if range.contains(due) => {}
                        _ => continue,
                    }
                }
                match resolve_obligation(obligation, today) {
                    ResolvedStatus::Paid => summary.paid_obligations += 1,
                    ResolvedStatus::Unpaid => summary.unpaid_obligations += 1,
                    ResolvedStatus::Overdue => summary.overdue_obligations += 1,
                }
            }
        }

        summary
    }
}
