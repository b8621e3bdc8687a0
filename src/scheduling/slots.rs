//! Conference-room slot allocation within business hours

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::room::RoomReservation;

use super::{CLOSE_HOUR, OPEN_HOUR, SLOT_DURATION_MIN};

/// The [08:00, 18:00] window every reservation must fit into on `date`.
pub fn business_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let open = date.and_hms_opt(OPEN_HOUR, 0, 0).unwrap().and_utc();
    let close = date.and_hms_opt(CLOSE_HOUR, 0, 0).unwrap().and_utc();
    (open, close)
}

/// End of the fixed 90-minute slot starting at `start`.
pub fn slot_end(start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::minutes(SLOT_DURATION_MIN)
}

/// Pairwise interval-overlap test over half-open [start, end) intervals.
pub fn overlaps(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    other_start: DateTime<Utc>,
    other_end: DateTime<Utc>,
) -> bool {
    start < other_end && end > other_start
}

/// Whether [start, end] lies fully within the business window of `date`.
pub fn within_business_hours(
    date: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    let (open, close) = business_window(date);
    start >= open && end <= close
}

/// Earliest start time for a 90-minute slot in a room on `date`.
///
/// Walks the room's same-date reservations in start order with a cursor
/// beginning at opening time. The first cursor position strictly before a
/// reservation start is returned as-is; only the trailing tail after the
/// last reservation is checked against the 90-minute minimum.
pub fn next_available_slot(
    date: NaiveDate,
    reservations: &[RoomReservation],
) -> Option<DateTime<Utc>> {
    let (open, close) = business_window(date);

    let mut same_day: Vec<&RoomReservation> =
        reservations.iter().filter(|r| r.date == date).collect();
    same_day.sort_by_key(|r| r.start_time);

    if same_day.is_empty() {
        return Some(open);
    }

    let mut cursor = open;
    for res in same_day {
        if res.start_time > cursor {
            return Some(cursor);
        }
        cursor = cursor.max(res.end_time);
    }

    if cursor < close && close - cursor >= Duration::minutes(SLOT_DURATION_MIN) {
        return Some(cursor);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
    }

    fn reservation(d: NaiveDate, start: (u32, u32), end: (u32, u32)) -> RoomReservation {
        let start_time = d
            .and_time(NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap())
            .and_utc();
        let end_time = d
            .and_time(NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap())
            .and_utc();
        RoomReservation {
            id: 0,
            room_id: 1,
            reserved_by: "2023-00123".to_string(),
            date: d,
            start_time,
            end_time,
        }
    }

    fn hm(h: u32, m: u32) -> DateTime<Utc> {
        date()
            .and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
            .and_utc()
    }

    #[test]
    fn test_empty_room_opens_at_eight() {
        assert_eq!(next_available_slot(date(), &[]), Some(hm(8, 0)));
    }

    #[test]
    fn test_gap_before_first_reservation() {
        let existing = vec![reservation(date(), (9, 0), (10, 30))];
        assert_eq!(next_available_slot(date(), &existing), Some(hm(8, 0)));
    }

    #[test]
    fn test_back_to_back_from_opening() {
        let existing = vec![
            reservation(date(), (8, 0), (9, 30)),
            reservation(date(), (9, 30), (11, 0)),
        ];
        assert_eq!(next_available_slot(date(), &existing), Some(hm(11, 0)));
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let existing = vec![
            reservation(date(), (9, 30), (11, 0)),
            reservation(date(), (8, 0), (9, 30)),
        ];
        assert_eq!(next_available_slot(date(), &existing), Some(hm(11, 0)));
    }

    #[test]
    fn test_first_gap_width_is_not_checked() {
        // A reservation at 08:05 still yields 08:00 even though the gap is
        // five minutes wide.
        let existing = vec![reservation(date(), (8, 5), (9, 35))];
        assert_eq!(next_available_slot(date(), &existing), Some(hm(8, 0)));
    }

    #[test]
    fn test_tail_shorter_than_slot_is_rejected() {
        let existing = vec![reservation(date(), (8, 0), (17, 0))];
        assert_eq!(next_available_slot(date(), &existing), None);
    }

    #[test]
    fn test_tail_exactly_slot_length_is_accepted() {
        let existing = vec![reservation(date(), (8, 0), (16, 30))];
        assert_eq!(next_available_slot(date(), &existing), Some(hm(16, 30)));
    }

    #[test]
    fn test_cursor_skips_contained_reservation() {
        let existing = vec![
            reservation(date(), (8, 0), (12, 0)),
            reservation(date(), (9, 0), (10, 0)),
        ];
        assert_eq!(next_available_slot(date(), &existing), Some(hm(12, 0)));
    }

    #[test]
    fn test_other_dates_are_ignored() {
        let other = NaiveDate::from_ymd_opt(2025, 6, 13).unwrap();
        let existing = vec![reservation(other, (8, 0), (18, 0))];
        assert_eq!(next_available_slot(date(), &existing), Some(hm(8, 0)));
    }

    #[test]
    fn test_overlaps() {
        assert!(overlaps(hm(9, 0), hm(10, 30), hm(10, 0), hm(11, 30)));
        assert!(overlaps(hm(10, 0), hm(11, 30), hm(9, 0), hm(10, 30)));
        assert!(overlaps(hm(9, 0), hm(12, 0), hm(10, 0), hm(10, 30)));
        // Touching intervals do not overlap
        assert!(!overlaps(hm(9, 0), hm(10, 30), hm(10, 30), hm(12, 0)));
        assert!(!overlaps(hm(10, 30), hm(12, 0), hm(9, 0), hm(10, 30)));
    }

    #[test]
    fn test_within_business_hours() {
        assert!(within_business_hours(date(), hm(8, 0), hm(9, 30)));
        assert!(within_business_hours(date(), hm(16, 30), hm(18, 0)));
        assert!(!within_business_hours(date(), hm(7, 30), hm(9, 0)));
        assert!(!within_business_hours(date(), hm(17, 0), hm(18, 30)));
    }

    #[test]
    fn test_slot_end_is_ninety_minutes_later() {
        assert_eq!(slot_end(hm(8, 0)), hm(9, 30));
    }
}
