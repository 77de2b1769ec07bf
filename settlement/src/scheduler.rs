//! Payout scheduling
//!
//! A settlement is paid out `payout_delay_days` after the payment was
//! confirmed. With `skip_weekends` set, a date landing on Saturday or Sunday
//! moves forward to the following Monday.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Payout date policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayoutSchedule {
    /// Days between payment confirmation and payout (default: 1)
    pub payout_delay_days: u32,

    /// Move weekend payout dates to Monday
    pub skip_weekends: bool,
}

impl Default for PayoutSchedule {
    fn default() -> Self {
        Self {
            payout_delay_days: 1,
            skip_weekends: true,
        }
    }
}

impl PayoutSchedule {
    /// Same-day payouts, weekends included
    pub fn immediate() -> Self {
        Self {
            payout_delay_days: 0,
            skip_weekends: false,
        }
    }

    /// Payout date for a payment confirmed at `confirmed_at`
    pub fn scheduled_date(&self, confirmed_at: DateTime<Utc>) -> NaiveDate {
        let date = confirmed_at.date_naive() + Duration::days(i64::from(self.payout_delay_days));
        if self.skip_weekends {
            next_business_day(date)
        } else {
            date
        }
    }

    /// Whether a settlement scheduled for `scheduled` is payable on `today`
    pub fn is_due(&self, scheduled: NaiveDate, today: NaiveDate) -> bool {
        scheduled <= today
    }
}

fn next_business_day(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}
