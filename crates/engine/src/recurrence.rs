//! Pure calendar math for recurring obligations.
//!
//! No I/O and no storage types: everything here is a function of an anchor
//! date, a recurrence kind, and a target `(year, month)`. The processor and
//! the tests share these functions.

use chrono::{Datelike, NaiveDate};

use crate::{EntityStatus, fixed_expenses::RecurrenceKind};

/// Number of days in `(year, month)`.
///
/// Computed as "day 0 of the following month", which keeps leap years exact.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    // Month is always in 1..=12 here, so the first of the following month
    // exists for any representable year.
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|d| d.pred_opt().map_or(31, |last| last.day()))
        .unwrap_or(31)
}

/// The occurrence date of an obligation anchored on `anchor_day` in the given
/// month, clamping to the last valid day when the month is shorter.
///
/// Day 31 applied to February yields Feb 28 (Feb 29 in leap years).
pub fn due_day_in_month(anchor_day: u32, year: i32, month: u32) -> NaiveDate {
    let day = anchor_day.min(days_in_month(year, month));
    // `day` is clamped into the month's valid range, so this cannot fail for
    // month in 1..=12.
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or(NaiveDate::MIN)
}

/// Whether an obligation produces an occurrence in `(year, month)`.
///
/// Inactive or non-recurring obligations never apply. Monthly obligations
/// apply every month; yearly ones only in the anchor's month.
pub fn applies_in_month(
    status: EntityStatus,
    is_recurring: bool,
    recurrence: RecurrenceKind,
    anchor: NaiveDate,
    month: u32,
) -> bool {
    if !status.is_active() || !is_recurring {
        return false;
    }
    match recurrence {
        RecurrenceKind::Monthly => true,
        RecurrenceKind::Yearly => month == anchor.month(),
    }
}

/// The next occurrence after `current`, re-deriving the day from the anchor.
///
/// Monthly advances one month (with year rollover), yearly one year. The day
/// springs back to the anchor's day where the target month allows it, so a
/// day-31 obligation clamped to Feb 28 lands on Mar 31, not Mar 28.
pub fn next_occurrence(
    recurrence: RecurrenceKind,
    anchor: NaiveDate,
    current: NaiveDate,
) -> NaiveDate {
    let (year, month) = match recurrence {
        RecurrenceKind::Monthly => {
            if current.month() == 12 {
                (current.year() + 1, 1)
            } else {
                (current.year(), current.month() + 1)
            }
        }
        RecurrenceKind::Yearly => (current.year() + 1, anchor.month()),
    };
    due_day_in_month(anchor.day(), year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn month_lengths() {
        let cases = [
            (2023, 1, 31),
            (2023, 2, 28),
            (2024, 2, 29),
            (2100, 2, 28),
            (2000, 2, 29),
            (2023, 4, 30),
            (2023, 12, 31),
        ];
        for (year, month, expected) in cases {
            assert_eq!(days_in_month(year, month), expected, "{year}-{month}");
        }
    }

    #[test]
    fn clamps_to_month_end() {
        let cases = [
            (31, 2023, 2, date(2023, 2, 28)),
            (31, 2024, 2, date(2024, 2, 29)),
            (30, 2023, 2, date(2023, 2, 28)),
            (30, 2024, 2, date(2024, 2, 29)),
            (31, 2023, 4, date(2023, 4, 30)),
            (15, 2023, 2, date(2023, 2, 15)),
            (1, 2024, 12, date(2024, 12, 1)),
        ];
        for (anchor_day, year, month, expected) in cases {
            assert_eq!(due_day_in_month(anchor_day, year, month), expected);
        }
    }

    #[test]
    fn monthly_applies_every_month() {
        let anchor = date(2023, 3, 31);
        for month in 1..=12 {
            assert!(applies_in_month(
                EntityStatus::Active,
                true,
                RecurrenceKind::Monthly,
                anchor,
                month,
            ));
        }
    }

    #[test]
    fn yearly_applies_only_in_anchor_month() {
        let anchor = date(2022, 3, 15);
        for month in 1..=12 {
            assert_eq!(
                applies_in_month(
                    EntityStatus::Active,
                    true,
                    RecurrenceKind::Yearly,
                    anchor,
                    month,
                ),
                month == 3,
            );
        }
    }

    #[test]
    fn inactive_or_one_shot_never_applies() {
        let anchor = date(2023, 5, 1);
        assert!(!applies_in_month(
            EntityStatus::Suspended,
            true,
            RecurrenceKind::Monthly,
            anchor,
            5,
        ));
        assert!(!applies_in_month(
            EntityStatus::Active,
            false,
            RecurrenceKind::Monthly,
            anchor,
            5,
        ));
    }

    #[test]
    fn monthly_next_occurrence_springs_back_to_anchor_day() {
        let anchor = date(2023, 1, 31);
        let jan = date(2023, 1, 31);
        let feb = next_occurrence(RecurrenceKind::Monthly, anchor, jan);
        assert_eq!(feb, date(2023, 2, 28));
        let mar = next_occurrence(RecurrenceKind::Monthly, anchor, feb);
        assert_eq!(mar, date(2023, 3, 31));
    }

    #[test]
    fn monthly_next_occurrence_rolls_over_year() {
        let anchor = date(2023, 12, 15);
        assert_eq!(
            next_occurrence(RecurrenceKind::Monthly, anchor, date(2023, 12, 15)),
            date(2024, 1, 15),
        );
    }

    #[test]
    fn yearly_next_occurrence_handles_leap_anchor() {
        let anchor = date(2024, 2, 29);
        let next = next_occurrence(RecurrenceKind::Yearly, anchor, date(2024, 2, 29));
        assert_eq!(next, date(2025, 2, 28));
        let after = next_occurrence(RecurrenceKind::Yearly, anchor, next);
        assert_eq!(after, date(2026, 2, 28));
    }
}
