pub mod allocator;
pub mod balance;
pub mod reporting;

use chrono::{DateTime, Utc};

use crate::types::PaymentMethod;

pub use allocator::{AllocationResult, LedgerAllocator, MarkPaidResult};
pub use balance::BalanceSummary;
pub use reporting::{DueDateRange, PortfolioSummary};

/// operator-supplied metadata accompanying a payment event
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDetails {
    /// confirmed moment of payment; must not be in the future
    pub payment_date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub operator: String,
    pub remarks: Option<String>,
}

impl PaymentDetails {
    pub fn new(payment_date: DateTime<Utc>, method: PaymentMethod, operator: impl Into<String>) -> Self {
        Self {
            payment_date,
            method,
            reference: None,
            operator: operator.into(),
            remarks: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}
