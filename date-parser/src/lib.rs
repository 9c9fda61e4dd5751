//! # Free-text date parsing for query filters
//!
//! `date-parser` turns the date fragments users type into filter lines
//! (`2024-01-15`, `last month`, `2024-W05`, `2024-01-01 to 2024-01-31`) into
//! calendar days or inclusive day ranges. Both entry points are total: any
//! input that cannot be understood yields `None` instead of an error, so a
//! caller can try several interpretations in sequence.
//!
//! ## Example
//! ```
//! use date_parser::{DateParser, DateRange};
//! use jiff::civil::date;
//!
//! let parser = DateParser::with_today(date(2024, 3, 13));
//! assert_eq!(parser.parse_date("yesterday"), Some(date(2024, 3, 12)));
//! assert_eq!(
//!     parser.parse_date_range("last month"),
//!     Some(DateRange::new(date(2024, 2, 1), date(2024, 2, 29)))
//! );
//! // a single day is not a range
//! assert_eq!(parser.parse_date_range("2024-03-01"), None);
//! ```

use jiff::{
    ToSpan, Zoned,
    civil::{Date, ISOWeekDate, Weekday},
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").unwrap());
static YEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").unwrap());
static ISO_WEEK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-[Ww](\d{1,2})$").unwrap());
static QUARTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-[Qq]([1-4])$").unwrap());
static RANGE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+to\s+|\s+-\s+|\s*\.\.\s*").unwrap());

/// Inclusive span of calendar days. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Builds a range from two days in either order.
    pub fn new(a: Date, b: Date) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Degenerate range covering one day.
    pub fn single_day(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Parses dates relative to a fixed "today".
///
/// The reference day is captured once so every parse done through the same
/// parser agrees on what `today` or `this week` means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    today: Date,
}

impl Default for DateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DateParser {
    /// Parser anchored at the current day in the system time zone.
    pub fn new() -> Self {
        Self {
            today: Zoned::now().date(),
        }
    }

    pub fn with_today(today: Date) -> Self {
        Self { today }
    }

    pub fn today(&self) -> Date {
        self.today
    }

    /// Parses a single calendar day: `today`, `yesterday`, `tomorrow` or an
    /// absolute date such as `2024-01-15`, `15/01/2024` or `2024.01.15`.
    pub fn parse_date(&self, text: &str) -> Option<Date> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "today" => Some(self.today),
            "yesterday" => self.today.yesterday().ok(),
            "tomorrow" => self.today.tomorrow().ok(),
            _ => parse_absolute_date(trimmed),
        }
    }

    /// Parses an inclusive day range covering the whole of `text`.
    pub fn parse_date_range(&self, text: &str) -> Option<DateRange> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.relative_range(text)
            .or_else(|| numbered_range(text))
            .or_else(|| self.absolute_range(text))
    }

    fn relative_range(&self, text: &str) -> Option<DateRange> {
        let compact: String = text
            .split_whitespace()
            .collect::<String>()
            .to_ascii_lowercase();
        let (delta, unit) = if let Some(unit) = compact.strip_prefix("last") {
            (-1, unit)
        } else if let Some(unit) = compact.strip_prefix("this") {
            (0, unit)
        } else if let Some(unit) = compact.strip_prefix("next") {
            (1, unit)
        } else if let Some(unit) = compact.strip_prefix("past") {
            return self.trailing_range(unit);
        } else {
            return None;
        };
        match unit {
            "week" => self.week_range(delta),
            "month" => self.month_range(delta),
            "quarter" => self.quarter_range(delta),
            "year" => year_range(self.today.year().checked_add(delta as i16)?),
            _ => None,
        }
    }

    fn trailing_range(&self, unit: &str) -> Option<DateRange> {
        let days: i64 = match unit {
            "week" => 7,
            "month" => 30,
            "year" => 365,
            _ => return None,
        };
        let start = self.today.checked_sub(days.days()).ok()?;
        Some(DateRange::new(start, self.today))
    }

    fn week_range(&self, delta: i64) -> Option<DateRange> {
        let weekday_offset = i64::from(self.today.weekday().to_monday_zero_offset());
        let start = self
            .today
            .checked_add((delta * 7 - weekday_offset).days())
            .ok()?;
        let end = start.checked_add(6.days()).ok()?;
        Some(DateRange::new(start, end))
    }

    fn month_range(&self, delta: i64) -> Option<DateRange> {
        let start = self
            .today
            .first_of_month()
            .checked_add(delta.months())
            .ok()?;
        Some(DateRange::new(start, start.last_of_month()))
    }

    fn quarter_range(&self, delta: i64) -> Option<DateRange> {
        let first_month = (self.today.month() - 1) / 3 * 3 + 1;
        let start = Date::new(self.today.year(), first_month, 1)
            .ok()?
            .checked_add((delta * 3).months())
            .ok()?;
        let last_month = start.checked_add(2.months()).ok()?;
        Some(DateRange::new(start, last_month.last_of_month()))
    }

    fn absolute_range(&self, text: &str) -> Option<DateRange> {
        let mut halves = RANGE_SEPARATOR.splitn(text, 2);
        let (first, second) = (halves.next()?, halves.next()?);
        let start = self.parse_date(first)?;
        let end = self.parse_date(second)?;
        Some(DateRange::new(start, end))
    }
}

fn numbered_range(text: &str) -> Option<DateRange> {
    if let Some(caps) = YEAR.captures(text) {
        return year_range(caps[1].parse().ok()?);
    }
    if let Some(caps) = YEAR_MONTH.captures(text) {
        let start = Date::new(caps[1].parse().ok()?, caps[2].parse().ok()?, 1).ok()?;
        return Some(DateRange::new(start, start.last_of_month()));
    }
    if let Some(caps) = ISO_WEEK.captures(text) {
        let year = caps[1].parse().ok()?;
        let week = caps[2].parse().ok()?;
        let start = ISOWeekDate::new(year, week, Weekday::Monday).ok()?.date();
        let end = ISOWeekDate::new(year, week, Weekday::Sunday).ok()?.date();
        return Some(DateRange::new(start, end));
    }
    if let Some(caps) = QUARTER.captures(text) {
        let quarter: i8 = caps[2].parse().ok()?;
        let start = Date::new(caps[1].parse().ok()?, (quarter - 1) * 3 + 1, 1).ok()?;
        let end = Date::new(start.year(), quarter * 3, 1).ok()?.last_of_month();
        return Some(DateRange::new(start, end));
    }
    None
}

fn year_range(year: i16) -> Option<DateRange> {
    let start = Date::new(year, 1, 1).ok()?;
    let end = Date::new(year, 12, 31).ok()?;
    Some(DateRange::new(start, end))
}

fn parse_absolute_date(raw: &str) -> Option<Date> {
    let sep = raw.chars().find(|ch| matches!(ch, '-' | '/' | '.'))?;
    let formats: [&str; 3] = match sep {
        '-' => ["%Y-%m-%d", "%d-%m-%Y", "%m-%d-%Y"],
        '/' => ["%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"],
        _ => ["%Y.%m.%d", "%d.%m.%Y", "%m.%d.%Y"],
    };
    let starts_with_year = raw.len() > 4
        && raw.chars().take(4).all(|c| c.is_ascii_digit())
        && raw[4..].starts_with(sep);
    // year-first formats only make sense when the text leads with a year
    formats
        .into_iter()
        .filter(|fmt| fmt.starts_with("%Y") == starts_with_year)
        .find_map(|fmt| Date::strptime(fmt, raw).ok())
}
