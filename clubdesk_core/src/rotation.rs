//! Daily problem rotation.
//!
//! Maps calendar days onto a cyclic 1-based sequence of problem numbers so
//! that the same date always yields the same problem on any machine, with no
//! stored state. Day counts are measured from a fixed epoch; the full catalog
//! cycles exactly once every `total` days.
//!
//! Callers are responsible for timezone policy; everything here works on
//! plain calendar dates, and the convenience helpers anchor to UTC midnight.

use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Fixed start date for the daily problem cycle (January 1, 2025)
pub const DEFAULT_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2025, 1, 1) {
    Some(d) => d,
    None => unreachable!(),
};

/// The problem number (1-based) scheduled for a given date
///
/// Pure and total: dates before the epoch wrap backwards through the cycle
/// (Euclidean modulo), so any date resolves to a number in `[1, total]`.
///
/// # Panics
/// Panics if `total` is zero; there is no schedule over an empty catalog.
pub fn problem_number_for_date(date: NaiveDate, epoch: NaiveDate, total: usize) -> usize {
    let days_elapsed = (date - epoch).num_days();
    days_elapsed.rem_euclid(total as i64) as usize + 1
}

/// Today's problem number, anchored to the UTC midnight boundary
pub fn todays_problem_number(now: DateTime<Utc>, epoch: NaiveDate, total: usize) -> usize {
    problem_number_for_date(now.date_naive(), epoch, total)
}

/// Cyclic forward distance in days until `target` is scheduled
///
/// Returns 0 exactly when `target` is today's number. Fails with
/// `OutOfRange` when `target` is not in `[1, total]`.
pub fn days_until_problem(
    target: usize,
    today: NaiveDate,
    epoch: NaiveDate,
    total: usize,
) -> Result<u32> {
    if target < 1 || target > total {
        return Err(Error::OutOfRange {
            number: target,
            total,
        });
    }

    let current = problem_number_for_date(today, epoch, total);
    let ahead = (target as i64 - current as i64).rem_euclid(total as i64);
    Ok(ahead as u32)
}

/// The next date on which `target` will be scheduled (today if it is current)
pub fn date_for_problem_number(
    target: usize,
    today: NaiveDate,
    epoch: NaiveDate,
    total: usize,
) -> Result<NaiveDate> {
    let ahead = days_until_problem(target, today, epoch, total)?;
    Ok(today + Duration::days(ahead as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_epoch_is_problem_one() {
        assert_eq!(problem_number_for_date(DEFAULT_EPOCH, DEFAULT_EPOCH, 50), 1);
    }

    #[test]
    fn test_day_before_epoch_is_last_problem() {
        let before = DEFAULT_EPOCH - Duration::days(1);
        assert_eq!(problem_number_for_date(before, DEFAULT_EPOCH, 50), 50);
    }

    #[test]
    fn test_deterministic() {
        let d = date(2025, 6, 15);
        let first = problem_number_for_date(d, DEFAULT_EPOCH, 50);
        for _ in 0..10 {
            assert_eq!(problem_number_for_date(d, DEFAULT_EPOCH, 50), first);
        }
    }

    #[test]
    fn test_cycle_covers_full_permutation() {
        // N consecutive days starting at the epoch produce 1..=N in order
        for total in [1usize, 7, 50] {
            let numbers: Vec<usize> = (0..total as i64)
                .map(|offset| {
                    problem_number_for_date(DEFAULT_EPOCH + Duration::days(offset), DEFAULT_EPOCH, total)
                })
                .collect();
            let expected: Vec<usize> = (1..=total).collect();
            assert_eq!(numbers, expected);

            // Day N wraps back to 1
            let wrapped =
                problem_number_for_date(DEFAULT_EPOCH + Duration::days(total as i64), DEFAULT_EPOCH, total);
            assert_eq!(wrapped, 1);
        }
    }

    #[test]
    fn test_worked_example() {
        // epoch = 2025-01-01, N = 50
        assert_eq!(problem_number_for_date(date(2025, 1, 1), DEFAULT_EPOCH, 50), 1);
        // 50 days later wraps exactly once
        assert_eq!(problem_number_for_date(date(2025, 2, 20), DEFAULT_EPOCH, 50), 1);
        assert_eq!(problem_number_for_date(date(2024, 12, 31), DEFAULT_EPOCH, 50), 50);
    }

    #[test]
    fn test_far_past_dates_stay_in_range() {
        let ancient = date(1970, 3, 9);
        for total in [1usize, 3, 50] {
            let n = problem_number_for_date(ancient, DEFAULT_EPOCH, total);
            assert!((1..=total).contains(&n));
        }
    }

    #[test]
    fn test_days_until_today_is_zero() {
        let today = date(2025, 4, 2);
        let current = problem_number_for_date(today, DEFAULT_EPOCH, 50);
        assert_eq!(
            days_until_problem(current, today, DEFAULT_EPOCH, 50).unwrap(),
            0
        );
    }

    #[test]
    fn test_days_until_wraps_forward() {
        let today = DEFAULT_EPOCH + Duration::days(10); // problem 11
        assert_eq!(days_until_problem(12, today, DEFAULT_EPOCH, 50).unwrap(), 1);
        // A number behind today's comes around after the wrap
        assert_eq!(days_until_problem(1, today, DEFAULT_EPOCH, 50).unwrap(), 40);
    }

    #[test]
    fn test_days_until_rejects_out_of_range() {
        let today = date(2025, 4, 2);
        for bad in [0usize, 51] {
            match days_until_problem(bad, today, DEFAULT_EPOCH, 50) {
                Err(Error::OutOfRange { number, total }) => {
                    assert_eq!(number, bad);
                    assert_eq!(total, 50);
                }
                other => panic!("Expected OutOfRange, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_round_trip() {
        // Scheduling a number and reading the schedule back agree
        let today = date(2025, 7, 19);
        for k in 1..=50 {
            let scheduled = date_for_problem_number(k, today, DEFAULT_EPOCH, 50).unwrap();
            assert_eq!(problem_number_for_date(scheduled, DEFAULT_EPOCH, 50), k);
        }
    }

    #[test]
    fn test_utc_anchor_truncates_time_of_day() {
        let morning = "2025-03-05T00:00:01Z".parse::<DateTime<Utc>>().unwrap();
        let night = "2025-03-05T23:59:59Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            todays_problem_number(morning, DEFAULT_EPOCH, 50),
            todays_problem_number(night, DEFAULT_EPOCH, 50)
        );
    }
}
