use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;

/// How a date rule resolves its year group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearDigits {
    /// Explicit 4-digit year.
    Four,
    /// 2-digit year; values below 100 mean `2000 + year`.
    Two,
    /// No year in the text: assume the current year, rolling forward one
    /// year when the resulting date has already passed.
    None,
}

#[derive(Debug)]
struct DateRule {
    pattern: Regex,
    year: YearDigits,
}

impl DateRule {
    fn new(pattern: &str, year: YearDigits) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("date rule pattern"),
            year,
        }
    }

    /// First structural match in `text`, or `None` when the rule misses.
    /// Malformed numeric groups (day 32, month 13) count as a miss.
    fn try_match(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        let caps = self.pattern.captures(text)?;
        match self.year {
            YearDigits::Four | YearDigits::Two => {
                let mut year: i32 = caps.get(1)?.as_str().parse().ok()?;
                if self.year == YearDigits::Two && year < 100 {
                    year += 2000;
                }
                let month: u32 = caps.get(2)?.as_str().parse().ok()?;
                let day: u32 = caps.get(3)?.as_str().parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            }
            YearDigits::None => {
                let month: u32 = caps.get(1)?.as_str().parse().ok()?;
                let day: u32 = caps.get(2)?.as_str().parse().ok()?;
                let date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
                if date < today {
                    NaiveDate::from_ymd_opt(today.year() + 1, month, day)
                } else {
                    Some(date)
                }
            }
        }
    }
}

/// Ranked list of date-pattern rules, tried in order; the first structural
/// match wins. Handles the portal's mixed Korean/numeric date spellings
/// (`2025년 6월 1일`, `2025-06-01`, `25.6.1`, `6월 1일`).
#[derive(Debug)]
pub struct DeadlineExtractor {
    rules: Vec<DateRule>,
}

impl Default for DeadlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DeadlineExtractor {
    pub fn new() -> Self {
        Self {
            rules: vec![
                DateRule::new(
                    r"(\d{4})[-년/\.]\s*(\d{1,2})[-월/\.]\s*(\d{1,2})",
                    YearDigits::Four,
                ),
                DateRule::new(
                    r"(\d{2})[-/\.]\s*(\d{1,2})[-/\.]\s*(\d{1,2})",
                    YearDigits::Two,
                ),
                DateRule::new(r"(\d{1,2})\s*[월月/]\s*(\d{1,2})", YearDigits::None),
            ],
        }
    }

    /// First date any rule finds in `text`, independent of surrounding noise.
    pub fn extract(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        self.rules
            .iter()
            .find_map(|rule| rule.try_match(text, today))
    }

    /// Like [`extract`](Self::extract), but only rules carrying an explicit
    /// year participate. Index-table cells mix dates with progress fractions,
    /// and the year-less rule would happily read `3/10` as March 10th.
    pub fn extract_explicit(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        self.rules
            .iter()
            .filter(|rule| rule.year != YearDigits::None)
            .find_map(|rule| rule.try_match(text, today))
    }

    /// Like [`extract`](Self::extract), but defaulting to the end of the
    /// look-ahead window when no rule matches.
    pub fn resolve(&self, text: &str, today: NaiveDate, look_ahead_days: u32) -> NaiveDate {
        self.extract(text, today)
            .unwrap_or_else(|| today + Duration::days(i64::from(look_ahead_days)))
    }
}

/// Whether `due` falls inside `[today, today + look_ahead_days]`.
pub fn within_window(due: NaiveDate, today: NaiveDate, look_ahead_days: u32) -> bool {
    let days = (due - today).num_days();
    0 <= days && days <= i64::from(look_ahead_days)
}
