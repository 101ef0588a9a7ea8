use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::types::{
    EnrollmentId, EnrollmentStatus, ObligationId, PaymentMethod, StoredStatus, TransactionId,
    TransactionKind,
};

/// one student's commitment to one fee package; financial terms are immutable
/// after creation (a correction requires a new enrollment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub student_id: String,
    pub total_fee: Money,
    pub downpayment_percent: Rate,
    /// derived at creation: round(total_fee * percent / 100, 2)
    pub downpayment_amount: Money,
    pub installment_count: u32,
    pub enrollment_date: NaiveDate,
    pub status: EnrollmentStatus,
}

impl Enrollment {
    pub fn new(
        student_id: String,
        total_fee: Money,
        downpayment_percent: Rate,
        installment_count: u32,
        enrollment_date: NaiveDate,
    ) -> Self {
        let downpayment_amount = total_fee.percentage_of(downpayment_percent);
        Self {
            enrollment_id: Uuid::new_v4(),
            student_id,
            total_fee,
            downpayment_percent,
            downpayment_amount,
            installment_count,
            enrollment_date,
            status: EnrollmentStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EnrollmentStatus::Active
    }

    /// balance to be spread across installments after the downpayment
    pub fn installment_balance(&self) -> Money {
        self.total_fee - self.downpayment_amount
    }
}

/// a single dated amount owed: the downpayment (index 0) or one installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    pub obligation_id: ObligationId,
    pub enrollment_id: EnrollmentId,
    /// 0 = downpayment, 1..=N = installments
    pub installment_index: u32,
    pub due_date: Option<NaiveDate>,
    pub amount_due: Money,
    pub status: StoredStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub method: Option<PaymentMethod>,
    pub reference: Option<String>,
}

impl Obligation {
    pub fn new(
        enrollment_id: EnrollmentId,
        installment_index: u32,
        due_date: Option<NaiveDate>,
        amount_due: Money,
    ) -> Self {
        Self {
            obligation_id: Uuid::new_v4(),
            enrollment_id,
            installment_index,
            due_date,
            amount_due,
            status: StoredStatus::Unpaid,
            paid_at: None,
            method: None,
            reference: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == StoredStatus::Paid
    }

    /// the one-way Unpaid -> Paid transition; callers must check is_paid first
    pub fn mark_paid(
        &mut self,
        paid_at: DateTime<Utc>,
        method: PaymentMethod,
        reference: Option<String>,
    ) {
        debug_assert_eq!(self.status, StoredStatus::Unpaid);
        self.status = StoredStatus::Paid;
        self.paid_at = Some(paid_at);
        self.method = Some(method);
        self.reference = reference;
    }
}

/// immutable record of money actually received or adjusted; the system of
/// record for balances, independent of obligation status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub enrollment_id: EnrollmentId,
    pub obligation_id: Option<ObligationId>,
    /// signed: positive for payment, negative for refund
    pub amount: Money,
    pub kind: TransactionKind,
    pub transaction_date: DateTime<Utc>,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub operator: String,
    pub remarks: Option<String>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        enrollment_id: EnrollmentId,
        obligation_id: Option<ObligationId>,
        amount: Money,
        kind: TransactionKind,
        transaction_date: DateTime<Utc>,
        method: PaymentMethod,
        reference: Option<String>,
        operator: String,
        remarks: Option<String>,
    ) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            enrollment_id,
            obligation_id,
            amount,
            kind,
            transaction_date,
            method,
            reference,
            operator,
            remarks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_downpayment_derivation() {
        let enrollment = Enrollment::new(
            "S-1001".to_string(),
            Money::from_major(10_000),
            Rate::from_percentage(20),
            3,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );

        assert_eq!(enrollment.downpayment_amount, Money::from_major(2_000));
        assert_eq!(enrollment.installment_balance(), Money::from_major(8_000));
        assert!(enrollment.is_active());
    }

    #[test]
    fn test_obligation_paid_transition() {
        let mut obligation = Obligation::new(
            Uuid::new_v4(),
            1,
            NaiveDate::from_ymd_opt(2024, 2, 15),
            Money::from_major(3_000),
        );
        assert!(!obligation.is_paid());

        let paid_at = Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap();
        obligation.mark_paid(paid_at, PaymentMethod::Cash, Some("RCPT-7".to_string()));

        assert!(obligation.is_paid());
        assert_eq!(obligation.paid_at, Some(paid_at));
        assert_eq!(obligation.method, Some(PaymentMethod::Cash));
        assert_eq!(obligation.reference.as_deref(), Some("RCPT-7"));
    }
}
