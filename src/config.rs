use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// default day-of-month for installment due dates
pub const DEFAULT_BILLING_DAY: u8 = 15;

/// default window (days) within which a payment counts as regular, not backdated
pub const DEFAULT_EDIT_WINDOW_DAYS: i64 = 3;

/// billing policy passed explicitly into the schedule generator, the ledger
/// allocator, and status checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingConfig {
    /// day-of-month every installment is due on
    pub billing_day: u8,
    /// payments older than this many days are flagged as backdated in the audit trail
    pub edit_window_days: i64,
}

impl BillingConfig {
    /// billing day is restricted to 1..=28 so the same day exists in every month
    pub fn new(billing_day: u8, edit_window_days: i64) -> Result<Self> {
        if !(1..=28).contains(&billing_day) {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("billing day must be 1..=28, got {}", billing_day),
            });
        }
        if edit_window_days < 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("edit window must be non-negative, got {}", edit_window_days),
            });
        }
        Ok(Self {
            billing_day,
            edit_window_days,
        })
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            billing_day: DEFAULT_BILLING_DAY,
            edit_window_days: DEFAULT_EDIT_WINDOW_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_day_bounds() {
        assert!(BillingConfig::new(1, 0).is_ok());
        assert!(BillingConfig::new(28, 7).is_ok());
        assert!(BillingConfig::new(0, 0).is_err());
        assert!(BillingConfig::new(29, 0).is_err());
        assert!(BillingConfig::new(15, -1).is_err());
    }

    #[test]
    fn test_default_policy() {
        let config = BillingConfig::default();
        assert_eq!(config.billing_day, 15);
        assert_eq!(config.edit_window_days, 3);
    }
}
