use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::state::{Enrollment, Obligation, Transaction};
use crate::status::resolve_obligation;
use crate::types::ResolvedStatus;

/// per-enrollment financial position; money comes from the transaction
/// ledger, counts come from obligations plus the status resolver, and the
/// two views may legitimately disagree under partial payments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub total_fee: Money,
    /// signed sum over the transaction ledger
    pub total_paid: Money,
    /// total_fee - total_paid
    pub outstanding: Money,
    pub paid_count: usize,
    pub unpaid_count: usize,
    pub overdue_count: usize,
}

impl BalanceSummary {
    pub fn compute(
        enrollment: &Enrollment,
        obligations: &[Obligation],
        transactions: &[Transaction],
        today: NaiveDate,
    ) -> Self {
        // refunds and adjustments carry their sign in the stored amount
        let total_paid: Money = transactions.iter().map(|t| t.amount).sum();

        let mut paid_count = 0;
        let mut unpaid_count = 0;
        let mut overdue_count = 0;
        for obligation in obligations {
            match resolve_obligation(obligation, today) {
                ResolvedStatus::Paid => paid_count += 1,
                ResolvedStatus::Unpaid => unpaid_count += 1,
                ResolvedStatus::Overdue => overdue_count += 1,
            }
        }

        Self {
            total_fee: enrollment.total_fee,
            total_paid,
            outstanding: enrollment.total_fee - total_paid,
            paid_count,
            unpaid_count,
            overdue_count,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.outstanding <= Money::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BillingConfig;
    use crate::decimal::Rate;
    use crate::events::EventStore;
    use crate::ledger::{LedgerAllocator, PaymentDetails};
    use crate::schedule::ScheduleGenerator;
    use crate::types::PaymentMethod;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};

    fn setup() -> (Enrollment, Vec<Obligation>) {
        let enrollment = Enrollment::new(
            "S-4001".to_string(),
            Money::from_str_exact("3333.33").unwrap(),
            Rate::ZERO,
            1,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        let mut events = EventStore::new();
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
        ));
        let obligations = ScheduleGenerator::new(BillingConfig::default())
            .generate(&enrollment, 0, &time, &mut events)
            .unwrap();
        (enrollment, obligations)
    }

    #[test]
    fn test_ledger_and_obligation_views_diverge_under_partial_payment() {
        let (enrollment, mut obligations) = setup();
        let mut transactions = Vec::new();
        let mut events = EventStore::new();
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap(),
        ));
        let allocator = LedgerAllocator::new(BillingConfig::default());

        // 1500 against a 3333.33 installment: recorded but covers nothing
        // (the 0.00 downpayment at index 0 flips trivially)
        allocator
            .allocate(
                &enrollment,
                &mut obligations,
                &mut transactions,
                Money::from_major(1_500),
                &PaymentDetails::new(time.now(), PaymentMethod::BankTransfer, "op-2"),
                &time,
                &mut events,
            )
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        let summary = BalanceSummary::compute(&enrollment, &obligations, &transactions, today);

        assert_eq!(summary.total_paid, Money::from_major(1_500));
        assert_eq!(summary.outstanding, Money::from_str_exact("1833.33").unwrap());
        // the installment itself is still unpaid in the obligation view
        assert!(!obligations[1].is_paid());
        assert_eq!(summary.unpaid_count, 1);
    }

    #[test]
    fn test_refund_reduces_total_paid() {
        let (enrollment, obligations) = setup();
        let now = Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap();
        let transactions = vec![
            Transaction::new(
                enrollment.enrollment_id,
                None,
                Money::from_major(2_000),
                crate::types::TransactionKind::Payment,
                now,
                PaymentMethod::Cash,
                None,
                "op-2".to_string(),
                None,
            ),
            Transaction::new(
                enrollment.enrollment_id,
                None,
                -Money::from_major(500),
                crate::types::TransactionKind::Refund,
                now,
                PaymentMethod::Cash,
                None,
                "op-2".to_string(),
                None,
            ),
        ];

        let today = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        let summary = BalanceSummary::compute(&enrollment, &obligations, &transactions, today);
        assert_eq!(summary.total_paid, Money::from_major(1_500));
        assert_eq!(summary.outstanding, Money::from_str_exact("1833.33").unwrap());
    }

    #[test]
    fn test_counts_follow_resolved_status() {
        let (enrollment, obligations) = setup();
        // due date for the installment is 2024-02-15
        let before = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let after = NaiveDate::from_ymd_opt(2024, 2, 16).unwrap();

        let on_time = BalanceSummary::compute(&enrollment, &obligations, &[], before);
        // downpayment (due 2024-01-10, unpaid) is already overdue
        assert_eq!(on_time.overdue_count, 1);
        assert_eq!(on_time.unpaid_count, 1);

        let late = BalanceSummary::compute(&enrollment, &obligations, &[], after);
        assert_eq!(late.overdue_count, 2);
        assert_eq!(late.unpaid_count, 0);
    }
}
