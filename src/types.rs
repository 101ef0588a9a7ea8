use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for an enrollment
pub type EnrollmentId = Uuid;

/// unique identifier for a schedule obligation
pub type ObligationId = Uuid;

/// unique identifier for a ledger transaction
pub type TransactionId = Uuid;

/// enrollment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Active,
    Cancelled,
}

/// stored obligation status; the only persisted transition is Unpaid -> Paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredStatus {
    Unpaid,
    Paid,
}

/// obligation status as resolved at read time; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedStatus {
    Paid,
    Unpaid,
    Overdue,
}

/// ledger transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// money received against the enrollment
    Payment,
    /// signed operator correction
    Adjustment,
    /// money returned; recorded as a negative amount, never a status reversal
    Refund,
}

/// how a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    EWallet,
    Check,
    Card,
}
