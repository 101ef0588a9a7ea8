use hourglass_rs::SafeTimeProvider;

use crate::config::BillingConfig;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{AuditEvent, EventStore};
use crate::state::{Enrollment, Obligation, Transaction};
use crate::types::{ObligationId, StoredStatus, TransactionId, TransactionKind};

use super::PaymentDetails;

/// outcome of a waterfall allocation
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationResult {
    pub transaction_id: TransactionId,
    pub amount_received: Money,
    /// obligations flipped to paid, in installment order
    pub obligations_paid: Vec<ObligationId>,
    /// leftover smaller than the next obligation; recorded in the ledger only,
    /// never attributed to an obligation
    pub unallocated_remainder: Money,
}

/// outcome of the explicit mark-paid path
#[derive(Debug, Clone, PartialEq)]
pub struct MarkPaidResult {
    pub transaction_id: TransactionId,
    pub obligation_id: ObligationId,
    pub amount: Money,
}

/// applies incoming payments against an enrollment's obligations and appends
/// the matching ledger transaction; every mutation is planned against shared
/// state first and committed only once all checks pass, so an error leaves
/// obligations and ledger untouched
pub struct LedgerAllocator {
    config: BillingConfig,
}

impl LedgerAllocator {
    pub fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    /// waterfall path: cover unpaid obligations in ascending installment order
    /// while the remaining amount fully covers them; always append exactly one
    /// payment transaction for the full input amount
    pub fn allocate(
        &self,
        enrollment: &Enrollment,
        obligations: &mut [Obligation],
        transactions: &mut Vec<Transaction>,
        amount: Money,
        details: &PaymentDetails,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<AllocationResult> {
        let now = time_provider.now();
        self.validate(enrollment, details, now)?;
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAllocationAmount { amount });
        }

        // plan: positions of obligations the amount fully covers, in index order
        let mut order: Vec<usize> = (0..obligations.len())
            .filter(|&i| obligations[i].status == StoredStatus::Unpaid)
            .collect();
        order.sort_by_key(|&i| obligations[i].installment_index);

        let mut remaining = amount;
        let mut covered = Vec::new();
        for i in order {
            if remaining >= obligations[i].amount_due {
                remaining -= obligations[i].amount_due;
                covered.push(i);
            } else {
                break;
            }
        }

        // commit
        let backdated = self.is_backdated(details, now);
        let mut paid_ids = Vec::with_capacity(covered.len());
        for i in covered {
            let status_before = obligations[i].status;
            obligations[i].mark_paid(details.payment_date, details.method, details.reference.clone());
            paid_ids.push(obligations[i].obligation_id);

            events.emit(AuditEvent::ObligationMarkedPaid {
                enrollment_id: enrollment.enrollment_id,
                obligation_id: obligations[i].obligation_id,
                installment_index: obligations[i].installment_index,
                amount_due: obligations[i].amount_due,
                status_before,
                status_after: obligations[i].status,
                method: details.method,
                operator: details.operator.clone(),
                backdated,
                timestamp: now,
            });
        }

        let transaction = Transaction::new(
            enrollment.enrollment_id,
            None,
            amount,
            TransactionKind::Payment,
            details.payment_date,
            details.method,
            details.reference.clone(),
            details.operator.clone(),
            details.remarks.clone(),
        );
        let transaction_id = transaction.transaction_id;

        events.emit(AuditEvent::TransactionRecorded {
            enrollment_id: enrollment.enrollment_id,
            transaction_id,
            obligation_id: None,
            kind: TransactionKind::Payment,
            amount,
            method: details.method,
            operator: details.operator.clone(),
            backdated,
            timestamp: now,
        });
        events.emit(AuditEvent::PaymentAllocated {
            enrollment_id: enrollment.enrollment_id,
            amount,
            obligations_covered: paid_ids.clone(),
            unallocated_remainder: remaining,
            timestamp: now,
        });

        transactions.push(transaction);

        Ok(AllocationResult {
            transaction_id,
            amount_received: amount,
            obligations_paid: paid_ids,
            unallocated_remainder: remaining,
        })
    }

    /// explicit path: the operator's "mark this one as paid" action; repeating
    /// it on an already-paid obligation is rejected before anything mutates
    pub fn mark_paid(
        &self,
        enrollment: &Enrollment,
        obligations: &mut [Obligation],
        transactions: &mut Vec<Transaction>,
        obligation_id: ObligationId,
        details: &PaymentDetails,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<MarkPaidResult> {
        let now = time_provider.now();
        self.validate(enrollment, details, now)?;

        let target = obligations
            .iter_mut()
            .find(|o| o.obligation_id == obligation_id)
            .ok_or(LedgerError::ObligationNotFound { obligation_id })?;

        // idempotency guard, re-checked under exclusive access
        if target.is_paid() {
            return Err(LedgerError::AlreadyPaid { obligation_id });
        }

        let backdated = self.is_backdated(details, now);
        let amount = target.amount_due;
        let status_before = target.status;

        target.mark_paid(details.payment_date, details.method, details.reference.clone());

        events.emit(AuditEvent::ObligationMarkedPaid {
            enrollment_id: enrollment.enrollment_id,
            obligation_id,
            installment_index: target.installment_index,
            amount_due: amount,
            status_before,
            status_after: target.status,
            method: details.method,
            operator: details.operator.clone(),
            backdated,
            timestamp: now,
        });

        let transaction = Transaction::new(
            enrollment.enrollment_id,
            Some(obligation_id),
            amount,
            TransactionKind::Payment,
            details.payment_date,
            details.method,
            details.reference.clone(),
            details.operator.clone(),
            details.remarks.clone(),
        );
        let transaction_id = transaction.transaction_id;

        events.emit(AuditEvent::TransactionRecorded {
            enrollment_id: enrollment.enrollment_id,
            transaction_id,
            obligation_id: Some(obligation_id),
            kind: TransactionKind::Payment,
            amount,
            method: details.method,
            operator: details.operator.clone(),
            backdated,
            timestamp: now,
        });

        transactions.push(transaction);

        Ok(MarkPaidResult {
            transaction_id,
            obligation_id,
            amount,
        })
    }

    fn validate(
        &self,
        enrollment: &Enrollment,
        details: &PaymentDetails,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        if !enrollment.is_active() {
            return Err(LedgerError::EnrollmentNotActive {
                status: enrollment.status,
            });
        }
        if details.payment_date > now {
            return Err(LedgerError::FutureDatedPayment {
                payment_date: details.payment_date,
                now,
            });
        }
        Ok(())
    }

    fn is_backdated(&self, details: &PaymentDetails, now: chrono::DateTime<chrono::Utc>) -> bool {
        (now - details.payment_date).num_days() > self.config.edit_window_days
    }
}
