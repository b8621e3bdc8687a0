//! Reservation time math: hold/loan countdowns, late fees and room slot
//! allocation.
//!
//! Everything in this module is pure and takes `now` as an explicit
//! parameter so expiry and allocation decisions are deterministic under
//! test.

pub mod countdown;
pub mod slots;

pub use countdown::{loan_standing, remaining_hold_time, HoldStatus, LoanStanding};
pub use slots::{business_window, next_available_slot, overlaps, slot_end, within_business_hours};

/// Opening hour of the conference-room business window (08:00).
pub const OPEN_HOUR: u32 = 8;

/// Closing hour of the conference-room business window (18:00).
pub const CLOSE_HOUR: u32 = 18;

/// Fixed length of a conference-room slot, in minutes.
pub const SLOT_DURATION_MIN: i64 = 90;

/// How long a book hold lasts before it lapses, in hours.
pub const RESERVATION_HOLD_HOURS: i64 = 48;

/// Loan period before a book becomes overdue, in days.
pub const LOAN_PERIOD_DAYS: i64 = 7;

/// Flat fee charged per overdue day (whole or partial).
pub const LATE_FEE_PER_DAY: i64 = 25;
