use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::config::BillingConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::events::{AuditEvent, EventStore};
use crate::ledger::{AllocationResult, BalanceSummary, LedgerAllocator, MarkPaidResult, PaymentDetails};
use crate::schedule::ScheduleGenerator;
use crate::state::{Enrollment, Obligation, Transaction};
use crate::status::resolve_obligation;
use crate::types::{ObligationId, ResolvedStatus, TransactionId, TransactionKind};

/// financial terms supplied at registration time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentTerms {
    pub student_id: String,
    pub total_fee: Money,
    pub downpayment_percent: Rate,
    pub installment_count: u32,
    pub enrollment_date: NaiveDate,
}

/// one enrollment's unit of work: the enrollment row, its obligation
/// schedule, its append-only transaction ledger, and the audit event stream.
/// mutating operations take `&mut self`, so per-enrollment serialization is
/// whatever exclusive access the caller already holds; idempotency guards run
/// inside the mutation, after that access is established
pub struct EnrollmentAccount {
    enrollment: Enrollment,
    obligations: Vec<Obligation>,
    transactions: Vec<Transaction>,
    config: BillingConfig,
    pub events: EventStore,
}

impl EnrollmentAccount {
    /// create the enrollment and its full obligation schedule together;
    /// generation failure means no account exists at all
    pub fn open(
        terms: EnrollmentTerms,
        config: BillingConfig,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        let enrollment = Enrollment::new(
            terms.student_id,
            terms.total_fee,
            terms.downpayment_percent,
            terms.installment_count,
            terms.enrollment_date,
        );

        let mut events = EventStore::new();
        let generator = ScheduleGenerator::new(config);
        let obligations = generator.generate(&enrollment, 0, time_provider, &mut events)?;

        events.emit(AuditEvent::EnrollmentOpened {
            enrollment_id: enrollment.enrollment_id,
            total_fee: enrollment.total_fee,
            downpayment_amount: enrollment.downpayment_amount,
            installment_count: enrollment.installment_count,
            enrollment_date: enrollment.enrollment_date,
        });

        Ok(Self {
            enrollment,
            obligations,
            transactions: Vec::new(),
            config,
            events,
        })
    }

    pub fn enrollment(&self) -> &Enrollment {
        &self.enrollment
    }

    pub fn obligations(&self) -> &[Obligation] {
        &self.obligations
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn config(&self) -> BillingConfig {
        self.config
    }

    /// waterfall payment: cover unpaid obligations in installment order,
    /// record exactly one ledger transaction for the full amount
    pub fn record_payment(
        &mut self,
        amount: Money,
        details: &PaymentDetails,
        time_provider: &SafeTimeProvider,
    ) -> Result<AllocationResult> {
        let allocator = LedgerAllocator::new(self.config);
        allocator.allocate(
            &self.enrollment,
            &mut self.obligations,
            &mut self.transactions,
            amount,
            details,
            time_provider,
            &mut self.events,
        )
    }

    /// explicit operator action: mark one obligation paid for its amount due
    pub fn mark_obligation_paid(
        &mut self,
        obligation_id: ObligationId,
        details: &PaymentDetails,
        time_provider: &SafeTimeProvider,
    ) -> Result<MarkPaidResult> {
        let allocator = LedgerAllocator::new(self.config);
        allocator.mark_paid(
            &self.enrollment,
            &mut self.obligations,
            &mut self.transactions,
            obligation_id,
            details,
            time_provider,
            &mut self.events,
        )
    }

    /// append a negative refund transaction; obligation status never reverses
    pub fn record_refund(
        &mut self,
        amount: Money,
        obligation_id: Option<ObligationId>,
        details: &PaymentDetails,
        time_provider: &SafeTimeProvider,
    ) -> Result<TransactionId> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAllocationAmount { amount });
        }
        self.append_correction(-amount, TransactionKind::Refund, obligation_id, details, time_provider)
    }

    /// append a signed adjustment transaction
    pub fn record_adjustment(
        &mut self,
        amount: Money,
        details: &PaymentDetails,
        time_provider: &SafeTimeProvider,
    ) -> Result<TransactionId> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAllocationAmount { amount });
        }
        self.append_correction(amount, TransactionKind::Adjustment, None, details, time_provider)
    }

    fn append_correction(
        &mut self,
        signed_amount: Money,
        kind: TransactionKind,
        obligation_id: Option<ObligationId>,
        details: &PaymentDetails,
        time_provider: &SafeTimeProvider,
    ) -> Result<TransactionId> {
        let now = time_provider.now();
        if !self.enrollment.is_active() {
            return Err(LedgerError::EnrollmentNotActive {
                status: self.enrollment.status,
            });
        }
        if details.payment_date > now {
            return Err(LedgerError::FutureDatedPayment {
                payment_date: details.payment_date,
                now,
            });
        }
        if let Some(id) = obligation_id {
            if !self.obligations.iter().any(|o| o.obligation_id == id) {
                return Err(LedgerError::ObligationNotFound { obligation_id: id });
            }
        }

        let transaction = Transaction::new(
            self.enrollment.enrollment_id,
            obligation_id,
            signed_amount,
            kind,
            details.payment_date,
            details.method,
            details.reference.clone(),
            details.operator.clone(),
            details.remarks.clone(),
        );
        let transaction_id = transaction.transaction_id;

        let event = match kind {
            TransactionKind::Refund => AuditEvent::RefundRecorded {
                enrollment_id: self.enrollment.enrollment_id,
                transaction_id,
                amount: signed_amount,
                operator: details.operator.clone(),
                timestamp: now,
            },
            _ => AuditEvent::AdjustmentRecorded {
                enrollment_id: self.enrollment.enrollment_id,
                transaction_id,
                amount: signed_amount,
                operator: details.operator.clone(),
                timestamp: now,
            },
        };
        self.events.emit(event);
        self.transactions.push(transaction);

        Ok(transaction_id)
    }

    /// financial position as of `today`
    pub fn balance(&self, today: NaiveDate) -> BalanceSummary {
        BalanceSummary::compute(&self.enrollment, &self.obligations, &self.transactions, today)
    }

    /// read-time status of one obligation
    pub fn resolved_status(&self, obligation_id: ObligationId, today: NaiveDate) -> Result<ResolvedStatus> {
        self.obligations
            .iter()
            .find(|o| o.obligation_id == obligation_id)
            .map(|o| resolve_obligation(o, today))
            .ok_or(LedgerError::ObligationNotFound { obligation_id })
    }

    /// drain audit events for the external activity log
    pub fn take_events(&mut self) -> Vec<AuditEvent> {
        self.events.take_events()
    }

    /// point-in-time snapshot of all stored state
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            enrollment: self.enrollment.clone(),
            obligations: self.obligations.clone(),
            transactions: self.transactions.clone(),
            config: self.config,
        }
    }

    /// rebuild an account from a stored snapshot
    pub fn from_snapshot(snapshot: AccountSnapshot) -> Self {
        Self {
            enrollment: snapshot.enrollment,
            obligations: snapshot.obligations,
            transactions: snapshot.transactions,
            config: snapshot.config,
            events: EventStore::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.snapshot())
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::from_snapshot(serde_json::from_str(json)?))
    }
}

/// serializable view of an account's stored state, for export collaborators
/// and persistence round-trips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub enrollment: Enrollment,
    pub obligations: Vec<Obligation>,
    pub transactions: Vec<Transaction>,
    pub config: BillingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap(),
        ))
    }

    fn terms() -> EnrollmentTerms {
        EnrollmentTerms {
            student_id: "S-6001".to_string(),
            total_fee: Money::from_major(10_000),
            downpayment_percent: Rate::from_percentage(20),
            installment_count: 3,
            enrollment_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        }
    }

    #[test]
    fn test_open_creates_enrollment_and_schedule_together() {
        let time = test_time();
        let account = EnrollmentAccount::open(terms(), BillingConfig::default(), &time).unwrap();

        assert_eq!(account.obligations().len(), 4);
        assert_eq!(account.enrollment().downpayment_amount, Money::from_major(2_000));
        assert!(account.transactions().is_empty());

        let opened = account
            .events
            .events()
            .iter()
            .any(|e| matches!(e, AuditEvent::EnrollmentOpened { .. }));
        assert!(opened);
    }

    #[test]
    fn test_full_lifecycle_settles() {
        let time = test_time();
        let mut account = EnrollmentAccount::open(terms(), BillingConfig::default(), &time).unwrap();
        let details = PaymentDetails::new(time.now(), PaymentMethod::BankTransfer, "op-4")
            .with_reference("RCPT-100");

        let result = account
            .record_payment(Money::from_major(10_000), &details, &time)
            .unwrap();
        assert_eq!(result.obligations_paid.len(), 4);
        assert_eq!(result.unallocated_remainder, Money::ZERO);

        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let balance = account.balance(today);
        assert!(balance.is_settled());
        assert_eq!(balance.paid_count, 4);
        assert_eq!(balance.overdue_count, 0);
    }

    #[test]
    fn test_refund_never_reverses_status() {
        let time = test_time();
        let mut account = EnrollmentAccount::open(terms(), BillingConfig::default(), &time).unwrap();
        let details = PaymentDetails::new(time.now(), PaymentMethod::Cash, "op-4");

        let downpayment = account.obligations()[0].obligation_id;
        account.mark_obligation_paid(downpayment, &details, &time).unwrap();
        account
            .record_refund(Money::from_major(2_000), Some(downpayment), &details, &time)
            .unwrap();

        // ledger reflects the refund; the obligation stays paid
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(account.balance(today).total_paid, Money::ZERO);
        assert!(account.obligations()[0].is_paid());
        assert_eq!(
            account.resolved_status(downpayment, today).unwrap(),
            ResolvedStatus::Paid
        );
        assert_eq!(account.transactions().len(), 2);
        assert_eq!(account.transactions()[1].amount, -Money::from_major(2_000));
    }

    #[test]
    fn test_adjustment_rejects_zero() {
        let time = test_time();
        let mut account = EnrollmentAccount::open(terms(), BillingConfig::default(), &time).unwrap();
        let details = PaymentDetails::new(time.now(), PaymentMethod::Cash, "op-4");

        let err = account.record_adjustment(Money::ZERO, &details, &time).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAllocationAmount { .. }));
        assert!(account.transactions().is_empty());
    }

    #[test]
    fn test_json_snapshot_round_trip() {
        let time = test_time();
        let mut account = EnrollmentAccount::open(terms(), BillingConfig::default(), &time).unwrap();
        let details = PaymentDetails::new(time.now(), PaymentMethod::EWallet, "op-4");
        account.record_payment(Money::from_major(2_000), &details, &time).unwrap();

        let json = account.to_json().unwrap();
        let restored = EnrollmentAccount::from_json(&json).unwrap();

        assert_eq!(restored.enrollment().enrollment_id, account.enrollment().enrollment_id);
        assert_eq!(restored.obligations(), account.obligations());
        assert_eq!(restored.transactions(), account.transactions());

        // balances agree after the round trip
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(restored.balance(today), account.balance(today));
    }

    #[test]
    fn test_error_leaves_state_untouched() {
        let time = test_time();
        let mut account = EnrollmentAccount::open(terms(), BillingConfig::default(), &time).unwrap();
        let future = PaymentDetails::new(
            time.now() + chrono::Duration::days(1),
            PaymentMethod::Cash,
            "op-4",
        );

        let before = account.snapshot();
        let err = account.record_payment(Money::from_major(5_000), &future, &time);
        assert!(matches!(err, Err(LedgerError::FutureDatedPayment { .. })));

        assert_eq!(account.obligations(), before.obligations.as_slice());
        assert!(account.transactions().is_empty());
    }
}
