use chrono::{Datelike, NaiveDate};

use crate::errors::{LedgerError, Result};

/// due dates for each installment: the first falls on the billing day of the
/// month strictly after the enrollment month (even when enrolling exactly on
/// the billing day), each subsequent one exactly one calendar month later,
/// pinned to the billing day; the billing day must be 1..=28 so it exists in
/// every month
pub fn installment_due_dates(
    enrollment_date: NaiveDate,
    billing_day: u8,
    count: u32,
) -> Result<Vec<NaiveDate>> {
    if !(1..=28).contains(&billing_day) {
        return Err(LedgerError::InvalidConfiguration {
            message: format!("billing day must be 1..=28, got {}", billing_day),
        });
    }
    Ok((1..=count)
        .map(|i| billing_date_after(enrollment_date, billing_day, i))
        .collect())
}

/// billing day of the month `months_ahead` months after the given date's month;
/// whole-month index arithmetic, never fixed-day addition
fn billing_date_after(date: NaiveDate, billing_day: u8, months_ahead: u32) -> NaiveDate {
    let month_index = date.year() * 12 + date.month0() as i32 + months_ahead as i32;
    let year = month_index.div_euclid(12);
    let month = month_index.rem_euclid(12) as u32 + 1;

    // billing_day range-checked by the caller, present in every month
    NaiveDate::from_ymd_opt(year, month, billing_day as u32)
        .expect("billing day in 1..=28 exists in every month")
}
