use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::decimal::Money;
use crate::types::{EnrollmentId, EnrollmentStatus, ObligationId};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("schedule already exists for enrollment {enrollment_id}: {existing} obligations")]
    DuplicateSchedule {
        enrollment_id: EnrollmentId,
        existing: usize,
    },

    /// idempotency guard; an expected race, not a system fault
    #[error("obligation {obligation_id} is already paid")]
    AlreadyPaid {
        obligation_id: ObligationId,
    },

    #[error("invalid allocation amount: {amount}")]
    InvalidAllocationAmount {
        amount: Money,
    },

    #[error("payment dated in the future: payment {payment_date}, now {now}")]
    FutureDatedPayment {
        payment_date: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// rounding invariant violated; a defect, never a recoverable condition
    #[error("generated schedule sums to {scheduled}, enrollment total is {total_fee}")]
    InconsistentTotal {
        scheduled: Money,
        total_fee: Money,
    },

    #[error("obligation not found: {obligation_id}")]
    ObligationNotFound {
        obligation_id: ObligationId,
    },

    #[error("enrollment not active: current status is {status:?}")]
    EnrollmentNotActive {
        status: EnrollmentStatus,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
