use hourglass_rs::SafeTimeProvider;

use crate::config::BillingConfig;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{AuditEvent, EventStore};
use crate::state::{Enrollment, Obligation};

use super::due_dates::installment_due_dates;
use super::rounding::split_even;

/// turns an enrollment's financial terms into its full obligation batch:
/// one downpayment obligation (index 0, due on the enrollment date) plus one
/// obligation per installment on the billing day
pub struct ScheduleGenerator {
    config: BillingConfig,
}

impl ScheduleGenerator {
    pub fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    /// generate the obligation batch; at most once per enrollment
    pub fn generate(
        &self,
        enrollment: &Enrollment,
        existing_obligations: usize,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Vec<Obligation>> {
        if existing_obligations > 0 {
            return Err(LedgerError::DuplicateSchedule {
                enrollment_id: enrollment.enrollment_id,
                existing: existing_obligations,
            });
        }

        let mut obligations = Vec::with_capacity(enrollment.installment_count as usize + 1);

        obligations.push(Obligation::new(
            enrollment.enrollment_id,
            0,
            Some(enrollment.enrollment_date),
            enrollment.downpayment_amount,
        ));

        let amounts = split_even(enrollment.installment_balance(), enrollment.installment_count);
        let dates = installment_due_dates(
            enrollment.enrollment_date,
            self.config.billing_day,
            enrollment.installment_count,
        )?;

        for (i, (amount, due_date)) in amounts.into_iter().zip(dates).enumerate() {
            obligations.push(Obligation::new(
                enrollment.enrollment_id,
                i as u32 + 1,
                Some(due_date),
                amount,
            ));
        }

        let scheduled: Money = obligations.iter().map(|o| o.amount_due).sum();
        if scheduled != enrollment.total_fee {
            return Err(LedgerError::InconsistentTotal {
                scheduled,
                total_fee: enrollment.total_fee,
            });
        }

        events.emit(AuditEvent::ScheduleCreated {
            enrollment_id: enrollment.enrollment_id,
            obligation_count: obligations.len(),
            total_scheduled: scheduled,
            timestamp: time_provider.now(),
        });

        Ok(obligations)
    }
}
