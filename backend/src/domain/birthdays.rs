//! Upcoming-birthday window evaluation.
//!
//! Two policies are available:
//!
//! - [`BirthdayWindowPolicy::BirthYear`] (default) keeps the long-standing
//!   API behaviour. The window starts on today's month and day *in the
//!   contact's birth year* (March 1st of that year when the date does not
//!   exist) and ends seven days after now. A contact matches when
//!   `start <= born_date <= end`, so any later date in the birth year
//!   qualifies.
//! - [`BirthdayWindowPolicy::Anniversary`] matches contacts whose next
//!   anniversary falls within the next seven days. February 29th birthdays
//!   are celebrated on March 1st in common years.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::contact::Contact;

/// Length of the lookahead window in days.
pub const BIRTHDAY_WINDOW_DAYS: i64 = 7;

/// Strategy used to decide whether a birthday is upcoming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BirthdayWindowPolicy {
    /// Birth-year window start; the compatible default.
    #[default]
    BirthYear,
    /// Next-anniversary comparison.
    Anniversary,
}

/// Raised when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown birthday window policy `{0}`; expected `birth-year` or `anniversary`")]
pub struct UnknownBirthdayWindowPolicy(pub String);

impl BirthdayWindowPolicy {
    /// Stable configuration name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BirthYear => "birth-year",
            Self::Anniversary => "anniversary",
        }
    }
}

impl fmt::Display for BirthdayWindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BirthdayWindowPolicy {
    type Err = UnknownBirthdayWindowPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "birth-year" | "birth_year" => Ok(Self::BirthYear),
            "anniversary" => Ok(Self::Anniversary),
            other => Err(UnknownBirthdayWindowPolicy(other.to_owned())),
        }
    }
}

/// Window anchored at a reference instant.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use contacts::domain::{BirthdayWindow, BirthdayWindowPolicy};
///
/// let now = NaiveDate::from_ymd_opt(2023, 4, 26)
///     .and_then(|d| d.and_hms_opt(9, 0, 0))
///     .expect("valid date");
/// let born = NaiveDate::from_ymd_opt(2023, 4, 27)
///     .and_then(|d| d.and_hms_opt(0, 0, 0))
///     .expect("valid date");
/// let window = BirthdayWindow::new(BirthdayWindowPolicy::BirthYear, now);
/// assert!(window.includes(born));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
    policy: BirthdayWindowPolicy,
    now: NaiveDateTime,
}

impl BirthdayWindow {
    /// Anchor a window at `now`.
    pub const fn new(policy: BirthdayWindowPolicy, now: NaiveDateTime) -> Self {
        Self { policy, now }
    }

    /// Inclusive upper bound: `now` plus [`BIRTHDAY_WINDOW_DAYS`].
    pub fn end(&self) -> NaiveDateTime {
        self.now + Duration::days(BIRTHDAY_WINDOW_DAYS)
    }

    /// Lower bound used by the birth-year policy for a given birth date.
    ///
    /// Today's month and day are moved into the birth year at midnight. When
    /// that date does not exist the start falls back to March 1st.
    pub fn birth_year_start(&self, born_date: NaiveDateTime) -> NaiveDateTime {
        let year = born_date.year();
        let start = NaiveDate::from_ymd_opt(year, self.now.month(), self.now.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
            .unwrap_or_else(|| born_date.date());
        start.and_time(NaiveTime::MIN)
    }

    /// Whether a contact born at `born_date` has an upcoming birthday.
    pub fn includes(&self, born_date: NaiveDateTime) -> bool {
        match self.policy {
            BirthdayWindowPolicy::BirthYear => {
                self.birth_year_start(born_date) <= born_date && born_date <= self.end()
            }
            BirthdayWindowPolicy::Anniversary => self
                .next_anniversary(born_date.date())
                .is_some_and(|anniversary| anniversary <= self.end().date()),
        }
    }

    /// Keep matching contacts, preserving input order.
    pub fn select(&self, contacts: Vec<Contact>) -> Vec<Contact> {
        contacts
            .into_iter()
            .filter(|contact| self.includes(contact.born_date()))
            .collect()
    }

    fn next_anniversary(&self, born: NaiveDate) -> Option<NaiveDate> {
        let today = self.now.date();
        let this_year = anniversary_in(born, today.year())?;
        if this_year >= today {
            return Some(this_year);
        }
        anniversary_in(born, today.year() + 1)
    }
}

fn anniversary_in(born: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, born.month(), born.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid fixture date")
    }

    fn at_noon(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid fixture date")
    }

    #[rstest]
    fn birth_year_includes_next_day_in_current_year() {
        let window = BirthdayWindow::new(BirthdayWindowPolicy::BirthYear, at_noon(2023, 4, 26));
        assert!(window.includes(at(2023, 4, 27)));
    }

    #[rstest]
    fn birth_year_start_uses_birth_year() {
        let window = BirthdayWindow::new(BirthdayWindowPolicy::BirthYear, at_noon(2023, 4, 26));
        assert_eq!(window.birth_year_start(at(1990, 7, 1)), at(1990, 4, 26));
    }

    #[rstest]
    fn birth_year_start_falls_back_to_march_first() {
        let window = BirthdayWindow::new(BirthdayWindowPolicy::BirthYear, at_noon(2024, 2, 29));
        assert_eq!(window.birth_year_start(at(1990, 3, 5)), at(1990, 3, 1));
        assert_eq!(window.birth_year_start(at(1992, 3, 5)), at(1992, 2, 29));
    }

    #[rstest]
    #[case::after_fallback_start(at(1990, 3, 5), true)]
    #[case::on_fallback_start(at(1990, 3, 1), true)]
    #[case::before_fallback_start(at(1990, 2, 20), false)]
    fn birth_year_fallback_on_leap_day(#[case] born: NaiveDateTime, #[case] expected: bool) {
        let window = BirthdayWindow::new(BirthdayWindowPolicy::BirthYear, at_noon(2024, 2, 29));
        assert_eq!(window.includes(born), expected);
    }

    #[rstest]
    fn birth_year_includes_any_later_date_in_birth_year() {
        let window = BirthdayWindow::new(BirthdayWindowPolicy::BirthYear, at_noon(2023, 4, 26));
        assert!(window.includes(at(1990, 12, 25)));
        assert!(!window.includes(at(1990, 4, 25)));
    }

    #[rstest]
    fn birth_year_excludes_dates_past_window_end() {
        let window = BirthdayWindow::new(BirthdayWindowPolicy::BirthYear, at_noon(2023, 4, 26));
        assert_eq!(window.end(), at_noon(2023, 5, 3));
        assert!(window.includes(at_noon(2023, 5, 3)));
        assert!(!window.includes(at(2023, 5, 4)));
    }

    #[rstest]
    #[case::tomorrow(at(1990, 4, 27), true)]
    #[case::today(at(1985, 4, 26), true)]
    #[case::seventh_day(at(2000, 5, 3), true)]
    #[case::eighth_day(at(2000, 5, 4), false)]
    #[case::yesterday(at(1990, 4, 25), false)]
    fn anniversary_window(#[case] born: NaiveDateTime, #[case] expected: bool) {
        let window = BirthdayWindow::new(BirthdayWindowPolicy::Anniversary, at_noon(2023, 4, 26));
        assert_eq!(window.includes(born), expected);
    }

    #[rstest]
    fn anniversary_wraps_year_boundary() {
        let window = BirthdayWindow::new(BirthdayWindowPolicy::Anniversary, at_noon(2023, 12, 29));
        assert!(window.includes(at(1990, 1, 2)));
        assert!(!window.includes(at(1990, 1, 6)));
    }

    #[rstest]
    fn anniversary_moves_leap_day_to_march_first() {
        let window = BirthdayWindow::new(BirthdayWindowPolicy::Anniversary, at_noon(2023, 2, 25));
        assert!(window.includes(at(2000, 2, 29)));
        assert_eq!(
            window.next_anniversary(NaiveDate::from_ymd_opt(2000, 2, 29).expect("valid")),
            NaiveDate::from_ymd_opt(2023, 3, 1)
        );
    }

    #[rstest]
    #[case("birth-year", BirthdayWindowPolicy::BirthYear)]
    #[case("BIRTH_YEAR", BirthdayWindowPolicy::BirthYear)]
    #[case(" anniversary ", BirthdayWindowPolicy::Anniversary)]
    fn policy_parses_names(#[case] raw: &str, #[case] expected: BirthdayWindowPolicy) {
        assert_eq!(raw.parse::<BirthdayWindowPolicy>(), Ok(expected));
    }

    #[rstest]
    fn policy_rejects_unknown_names() {
        assert!("current-year".parse::<BirthdayWindowPolicy>().is_err());
    }
}
