use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{
    EnrollmentId, ObligationId, PaymentMethod, StoredStatus, TransactionId, TransactionKind,
};

/// structured audit events handed to the external activity-log collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuditEvent {
    ScheduleCreated {
        enrollment_id: EnrollmentId,
        obligation_count: usize,
        total_scheduled: Money,
        timestamp: DateTime<Utc>,
    },

    /// an obligation flipped Unpaid -> Paid
    ObligationMarkedPaid {
        enrollment_id: EnrollmentId,
        obligation_id: ObligationId,
        installment_index: u32,
        amount_due: Money,
        status_before: StoredStatus,
        status_after: StoredStatus,
        method: PaymentMethod,
        operator: String,
        /// recorded outside the regular edit window
        backdated: bool,
        timestamp: DateTime<Utc>,
    },

    /// one transaction appended to the ledger
    TransactionRecorded {
        enrollment_id: EnrollmentId,
        transaction_id: TransactionId,
        obligation_id: Option<ObligationId>,
        kind: TransactionKind,
        amount: Money,
        method: PaymentMethod,
        operator: String,
        backdated: bool,
        timestamp: DateTime<Utc>,
    },

    /// a waterfall payment was applied across the schedule
    PaymentAllocated {
        enrollment_id: EnrollmentId,
        amount: Money,
        obligations_covered: Vec<ObligationId>,
        unallocated_remainder: Money,
        timestamp: DateTime<Utc>,
    },

    RefundRecorded {
        enrollment_id: EnrollmentId,
        transaction_id: TransactionId,
        amount: Money,
        operator: String,
        timestamp: DateTime<Utc>,
    },

    AdjustmentRecorded {
        enrollment_id: EnrollmentId,
        transaction_id: TransactionId,
        amount: Money,
        operator: String,
        timestamp: DateTime<Utc>,
    },

    EnrollmentOpened {
        enrollment_id: EnrollmentId,
        total_fee: Money,
        downpayment_amount: Money,
        installment_count: u32,
        enrollment_date: NaiveDate,
    },
}

/// event store for collecting audit events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<AuditEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: AuditEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<AuditEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }
}
