//! Remaining-time and late-fee calculations for book holds and loans

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{LATE_FEE_PER_DAY, LOAN_PERIOD_DAYS, RESERVATION_HOLD_HOURS};

const SECS_PER_DAY: i64 = 86_400;

/// Countdown state of a book hold (48-hour pickup window)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HoldStatus {
    pub has_expired: bool,
    /// "D days, H hours, M minutes" while active, "Expired" afterwards
    pub remaining: String,
}

/// Countdown and fee state of a book loan (7-day window)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoanStanding {
    pub has_expired: bool,
    /// "D days, H hours, M minutes" while active, "Overdue" afterwards
    pub remaining: String,
    /// Accrued late fee in currency units, 0 while the loan is active
    pub late_fee: i64,
}

/// Format a positive number of seconds as a countdown, floored to the minute.
fn countdown_label(secs: i64) -> String {
    let days = secs / SECS_PER_DAY;
    let hours = (secs % SECS_PER_DAY) / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{} days, {} hours, {} minutes", days, hours, minutes)
}

/// Remaining pickup time for a hold placed at `reserved_at`.
///
/// The hold is expired once `now` reaches `reserved_at` + 48h exactly.
pub fn remaining_hold_time(reserved_at: DateTime<Utc>, now: DateTime<Utc>) -> HoldStatus {
    let hold_end = reserved_at + Duration::hours(RESERVATION_HOLD_HOURS);
    let remaining = (hold_end - now).num_seconds();
    if remaining <= 0 {
        HoldStatus {
            has_expired: true,
            remaining: "Expired".to_string(),
        }
    } else {
        HoldStatus {
            has_expired: false,
            remaining: countdown_label(remaining),
        }
    }
}

/// Standing of a loan started at `borrowed_at`.
///
/// Once the 7-day window has elapsed, overdue whole-or-partial days are
/// rounded up and billed at [`LATE_FEE_PER_DAY`] each. At the boundary
/// itself the loan is expired with zero days overdue.
pub fn loan_standing(borrowed_at: DateTime<Utc>, now: DateTime<Utc>) -> LoanStanding {
    let loan_end = borrowed_at + Duration::days(LOAN_PERIOD_DAYS);
    let remaining = (loan_end - now).num_seconds();
    if remaining > 0 {
        LoanStanding {
            has_expired: false,
            remaining: countdown_label(remaining),
            late_fee: 0,
        }
    } else {
        let overdue = -remaining;
        let mut overdue_days = overdue / SECS_PER_DAY;
        if overdue % SECS_PER_DAY > 0 {
            overdue_days += 1;
        }
        LoanStanding {
            has_expired: true,
            remaining: "Overdue".to_string(),
            late_fee: overdue_days * LATE_FEE_PER_DAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_hold_active_countdown() {
        let reserved = at(2025, 3, 10, 12, 0, 0);
        // 47 hours in: one hour left
        let now = at(2025, 3, 12, 11, 0, 0);
        let status = remaining_hold_time(reserved, now);
        assert!(!status.has_expired);
        assert_eq!(status.remaining, "0 days, 1 hours, 0 minutes");
    }

    #[test]
    fn test_hold_expires_exactly_at_boundary() {
        let reserved = at(2025, 3, 10, 12, 0, 0);
        let boundary = at(2025, 3, 12, 12, 0, 0);
        assert!(remaining_hold_time(reserved, boundary).has_expired);

        let just_before = at(2025, 3, 12, 11, 59, 59);
        assert!(!remaining_hold_time(reserved, just_before).has_expired);
    }

    #[test]
    fn test_hold_countdown_floors_to_minute() {
        let reserved = at(2025, 3, 10, 12, 0, 0);
        let now = at(2025, 3, 10, 12, 30, 30);
        // 47h 29m 30s left reads as 29 minutes
        let status = remaining_hold_time(reserved, now);
        assert_eq!(status.remaining, "1 days, 23 hours, 29 minutes");
    }

    #[test]
    fn test_loan_active_has_no_fee() {
        let borrowed = at(2025, 3, 1, 9, 0, 0);
        let now = at(2025, 3, 5, 9, 0, 0);
        let standing = loan_standing(borrowed, now);
        assert!(!standing.has_expired);
        assert_eq!(standing.remaining, "3 days, 0 hours, 0 minutes");
        assert_eq!(standing.late_fee, 0);
    }

    #[test]
    fn test_loan_boundary_is_expired_with_zero_fee() {
        let borrowed = at(2025, 3, 1, 9, 0, 0);
        let boundary = at(2025, 3, 8, 9, 0, 0);
        let standing = loan_standing(borrowed, boundary);
        assert!(standing.has_expired);
        assert_eq!(standing.remaining, "Overdue");
        assert_eq!(standing.late_fee, 0);
    }

    #[test]
    fn test_loan_one_second_overdue_bills_one_day() {
        let borrowed = at(2025, 3, 1, 9, 0, 0);
        let now = at(2025, 3, 8, 9, 0, 1);
        assert_eq!(loan_standing(borrowed, now).late_fee, 25);
    }

    #[test]
    fn test_loan_partial_days_round_up() {
        let borrowed = at(2025, 3, 1, 9, 0, 0);
        // 1 day and 1 hour overdue -> 2 days billed
        let now = at(2025, 3, 9, 10, 0, 0);
        assert_eq!(loan_standing(borrowed, now).late_fee, 50);
    }

    #[test]
    fn test_late_fee_monotonic_multiple_of_25() {
        let borrowed = at(2025, 3, 1, 9, 0, 0);
        let mut previous = 0;
        for hours_overdue in [0, 1, 12, 24, 25, 48, 72, 100] {
            let now = at(2025, 3, 8, 9, 0, 0) + Duration::hours(hours_overdue);
            let fee = loan_standing(borrowed, now).late_fee;
            assert_eq!(fee % 25, 0);
            assert!(fee >= previous);
            previous = fee;
        }
    }
}
