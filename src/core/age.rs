use chrono::{Datelike, NaiveDate};

/// Age in whole years on a given date.
///
/// Counts a year only once the birthday has occurred that year.
#[inline]
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> u8 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age.clamp(0, u8::MAX as i32) as u8
}

/// Inclusive birth-date window for an inclusive [min_age, max_age] range.
///
/// Returns (earliest, latest): earliest is the birth date of someone who is
/// exactly max_age today and turns max_age + 1 tomorrow; latest is the birth
/// date of someone turning min_age today.
pub fn birth_date_bounds(min_age: u8, max_age: u8, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let latest = years_before(today, min_age as i32);
    let earliest = years_before(today, max_age as i32 + 1)
        .succ_opt()
        .unwrap_or(NaiveDate::MAX);
    (earliest, latest)
}

/// Age-range check done by comparing birth-date bounds rather than a
/// precomputed age field.
#[inline]
pub fn within_age_range(birth_date: NaiveDate, min_age: u8, max_age: u8, today: NaiveDate) -> bool {
    let (earliest, latest) = birth_date_bounds(min_age, max_age, today);
    birth_date >= earliest && birth_date <= latest
}

/// Same calendar date n years earlier. Feb 29 clamps to Feb 28 when the
/// target year is not a leap year.
fn years_before(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() - years;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 2, 28).expect("Feb 28 always exists"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_after_birthday() {
        let birth = date(2000, 3, 15);
        assert_eq!(age_on(birth, date(2024, 3, 15)), 24);
        assert_eq!(age_on(birth, date(2024, 6, 1)), 24);
    }

    #[test]
    fn test_age_before_birthday() {
        let birth = date(2000, 3, 15);
        assert_eq!(age_on(birth, date(2024, 3, 14)), 23);
        assert_eq!(age_on(birth, date(2024, 1, 1)), 23);
    }

    #[test]
    fn test_age_matches_bound_check() {
        // The bound comparison and the derived age must agree.
        let today = date(2025, 9, 1);
        for year in 1995..=2008 {
            for (m, d) in [(1, 1), (8, 31), (9, 1), (9, 2), (12, 31)] {
                let birth = date(year, m, d);
                let age = age_on(birth, today);
                let in_range = within_age_range(birth, 20, 25, today);
                assert_eq!(
                    in_range,
                    (20..=25).contains(&age),
                    "disagreement for birth {}",
                    birth
                );
            }
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let today = date(2025, 9, 1);
        let (earliest, latest) = birth_date_bounds(20, 25, today);
        assert_eq!(age_on(latest, today), 20);
        assert_eq!(age_on(earliest, today), 25);
        // One day outside either bound falls out of range.
        assert_eq!(age_on(latest.succ_opt().unwrap(), today), 19);
        assert_eq!(age_on(earliest.pred_opt().unwrap(), today), 26);
    }

    #[test]
    fn test_leap_day_birth() {
        let birth = date(2004, 2, 29);
        // Non-leap year: the birthday counts as occurred from Mar 1.
        assert_eq!(age_on(birth, date(2025, 3, 1)), 21);
        assert_eq!(age_on(birth, date(2025, 2, 28)), 20);
        assert!(within_age_range(birth, 18, 30, date(2025, 6, 1)));
    }
}
