pub mod account;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod schedule;
pub mod state;
pub mod status;
pub mod types;

// re-export key types
pub use account::{AccountSnapshot, EnrollmentAccount, EnrollmentTerms};
pub use config::BillingConfig;
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{AuditEvent, EventStore};
pub use ledger::{
    AllocationResult, BalanceSummary, DueDateRange, LedgerAllocator, MarkPaidResult,
    PaymentDetails, PortfolioSummary,
};
pub use schedule::{installment_due_dates, split_even, ScheduleGenerator};
pub use state::{Enrollment, Obligation, Transaction};
pub use status::{resolve, resolve_obligation};
pub use types::{
    EnrollmentId, EnrollmentStatus, ObligationId, PaymentMethod, ResolvedStatus, StoredStatus,
    TransactionId, TransactionKind,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
