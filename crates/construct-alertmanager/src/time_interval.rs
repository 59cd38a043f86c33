//! Recurring time windows referenced by routes.
//!
//! A [`TimeIntervalEntry`] is a value object holding independent range
//! lists (days of month, months, weekdays, years, times of day) and an
//! optional IANA location. Entries are grouped into a named
//! [`TimeIntervalGroup`] owned by the configuration; routes refer to groups
//! through a [`TimeIntervalHandle`].

use std::fmt;

use construct_core::NodePath;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AlertManagerError, Result};
use crate::schema::{TimeIntervalConfig, TimeIntervalEntryConfig, TimeRangeConfig};

/// `HH:MM` between `00:00` and `23:59`, plus the end-of-day `24:00`.
static TIME_OF_DAY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:[01][0-9]|2[0-3]):[0-5][0-9]|24:00)$").unwrap_or_else(|_| unreachable!())
});

/// Days of the week, rendered as Alertmanager's lowercase day names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// Returns the lowercase day name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inclusive range `start:end`, or a single value when `end` is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntervalRange<T> {
    /// First value of the range.
    pub start: T,
    /// Last value of the range, if it spans more than `start`.
    pub end: Option<T>,
}

impl<T> IntervalRange<T> {
    /// A range covering one value.
    pub const fn single(start: T) -> Self {
        Self { start, end: None }
    }

    /// A range from `start` to `end` inclusive.
    pub const fn between(start: T, end: T) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

impl<T: fmt::Display> fmt::Display for IntervalRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            Some(end) => write!(f, "{}:{end}", self.start),
            None => write!(f, "{}", self.start),
        }
    }
}

/// Days of the month; negative values count back from the end of the month.
pub type DayOfMonthRange = IntervalRange<i8>;
/// Months, 1 through 12.
pub type MonthRange = IntervalRange<u8>;
/// Weekdays.
pub type WeekdayRange = IntervalRange<Weekday>;
/// Four-digit years.
pub type YearRange = IntervalRange<u16>;

/// A time-of-day window with `HH:MM` bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start_time: String,
    end_time: String,
}

impl TimeRange {
    /// Create a time-of-day range.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::InvalidTimeOfDay` if either bound is not
    /// an `HH:MM` value between `00:00` and `24:00`.
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Result<Self> {
        let start_time = validate_time_of_day(start_time.into())?;
        let end_time = validate_time_of_day(end_time.into())?;
        Ok(Self {
            start_time,
            end_time,
        })
    }

    /// The start of the window.
    #[must_use]
    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    /// The end of the window.
    #[must_use]
    pub fn end_time(&self) -> &str {
        &self.end_time
    }
}

fn validate_time_of_day(value: String) -> Result<String> {
    if TIME_OF_DAY_REGEX.is_match(&value) {
        Ok(value)
    } else {
        Err(AlertManagerError::InvalidTimeOfDay { value })
    }
}

/// One recurring time window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeIntervalEntry {
    days_of_month: Vec<DayOfMonthRange>,
    months: Vec<MonthRange>,
    weekdays: Vec<WeekdayRange>,
    years: Vec<YearRange>,
    times: Vec<TimeRange>,
    location: Option<String>,
}

impl TimeIntervalEntry {
    /// Create an entry with no restrictions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the day-of-month ranges.
    #[must_use]
    pub fn days_of_month(mut self, ranges: impl IntoIterator<Item = DayOfMonthRange>) -> Self {
        self.days_of_month = ranges.into_iter().collect();
        self
    }

    /// Set the month ranges.
    #[must_use]
    pub fn months(mut self, ranges: impl IntoIterator<Item = MonthRange>) -> Self {
        self.months = ranges.into_iter().collect();
        self
    }

    /// Set the weekday ranges.
    #[must_use]
    pub fn weekdays(mut self, ranges: impl IntoIterator<Item = WeekdayRange>) -> Self {
        self.weekdays = ranges.into_iter().collect();
        self
    }

    /// Set the year ranges.
    #[must_use]
    pub fn years(mut self, ranges: impl IntoIterator<Item = YearRange>) -> Self {
        self.years = ranges.into_iter().collect();
        self
    }

    /// Set the time-of-day ranges.
    #[must_use]
    pub fn times(mut self, ranges: impl IntoIterator<Item = TimeRange>) -> Self {
        self.times = ranges.into_iter().collect();
        self
    }

    /// Set the IANA time zone the entry is evaluated in.
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The day-of-month ranges.
    #[must_use]
    pub fn days_of_month_ranges(&self) -> &[DayOfMonthRange] {
        &self.days_of_month
    }

    /// The month ranges.
    #[must_use]
    pub fn month_ranges(&self) -> &[MonthRange] {
        &self.months
    }

    /// The weekday ranges.
    #[must_use]
    pub fn weekday_ranges(&self) -> &[WeekdayRange] {
        &self.weekdays
    }

    /// The year ranges.
    #[must_use]
    pub fn year_ranges(&self) -> &[YearRange] {
        &self.years
    }

    /// The time-of-day ranges.
    #[must_use]
    pub fn time_ranges(&self) -> &[TimeRange] {
        &self.times
    }

    /// The time zone, if set.
    #[must_use]
    pub fn time_zone(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub(crate) fn render(&self) -> TimeIntervalEntryConfig {
        TimeIntervalEntryConfig {
            times: self
                .times
                .iter()
                .map(|t| TimeRangeConfig {
                    start_time: t.start_time.clone(),
                    end_time: t.end_time.clone(),
                })
                .collect(),
            weekdays: render_ranges(&self.weekdays),
            days_of_month: render_ranges(&self.days_of_month),
            months: render_ranges(&self.months),
            years: render_ranges(&self.years),
            location: self.location.clone(),
        }
    }
}

/// Render ranges in input order; empty lists are omitted by the schema.
fn render_ranges<T: fmt::Display>(ranges: &[IntervalRange<T>]) -> Vec<String> {
    ranges.iter().map(ToString::to_string).collect()
}

/// Options for a new time interval group.
#[derive(Debug, Clone, Default)]
pub struct TimeIntervalOptions {
    /// Explicit group name. Derived from the construct path when absent.
    pub name: Option<String>,
    /// Initial entries.
    pub entries: Vec<TimeIntervalEntry>,
}

impl TimeIntervalOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the group name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add an entry.
    #[must_use]
    pub fn entry(mut self, entry: TimeIntervalEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

/// A reference to a time interval group owned by a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeIntervalHandle {
    pub(crate) owner: u64,
    pub(crate) index: usize,
}

/// A named, ordered list of time interval entries.
#[derive(Debug, Clone)]
pub struct TimeIntervalGroup {
    node: NodePath,
    name: Option<String>,
    entries: Vec<TimeIntervalEntry>,
}

impl TimeIntervalGroup {
    pub(crate) fn new(node: NodePath, options: TimeIntervalOptions) -> Self {
        Self {
            node,
            name: options.name,
            entries: options.entries,
        }
    }

    /// Append an entry.
    pub fn add_entry(&mut self, entry: TimeIntervalEntry) -> &mut Self {
        self.entries.push(entry);
        self
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[TimeIntervalEntry] {
        &self.entries
    }

    /// The construct path of this group.
    #[must_use]
    pub const fn node(&self) -> &NodePath {
        &self.node
    }

    /// The resolved group name: the explicit name, or the path's unique id.
    #[must_use]
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.node.unique_id())
    }

    pub(crate) fn render(&self) -> TimeIntervalConfig {
        TimeIntervalConfig {
            name: self.name(),
            time_intervals: self.entries.iter().map(TimeIntervalEntry::render).collect(),
        }
    }
}
