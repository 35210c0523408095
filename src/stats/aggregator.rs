use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Bound::{Excluded, Unbounded},
};

use chrono::{Datelike, NaiveDate, TimeZone};

use crate::{session::record::SessionRecord, utils::time::local_date};

use super::month::YearMonth;

/// Total a day needs to be shown at full intensity: four hours.
pub const FULL_INTENSITY_SECONDS: i64 = 4 * 60 * 60;

/// Statistics are offered once more than this many sessions have been stored.
pub const MIN_SESSIONS_FOR_STATS: usize = 1;

/// Direction of month navigation in the calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Everything the calendar shows about a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub sessions: Vec<SessionRecord>,
    pub total: i64,
    pub intensity: f64,
}

/// Which days of which months have at least one session.
pub fn group_by_month<Tz: TimeZone>(
    records: &[SessionRecord],
    tz: &Tz,
) -> BTreeMap<YearMonth, BTreeSet<u32>> {
    let mut months = BTreeMap::<YearMonth, BTreeSet<u32>>::new();
    for record in records {
        let date = local_date(&record.date, tz);
        months
            .entry(YearMonth::of(date))
            .or_default()
            .insert(date.day());
    }
    months
}

/// Sessions of `year_month`, grouped by day of month. Sessions within a day keep input order.
pub fn group_by_month_day<Tz: TimeZone>(
    records: &[SessionRecord],
    year_month: YearMonth,
    tz: &Tz,
) -> BTreeMap<u32, Vec<SessionRecord>> {
    let mut days = BTreeMap::<u32, Vec<SessionRecord>>::new();
    for record in records {
        let date = local_date(&record.date, tz);
        if year_month.contains(date) {
            days.entry(date.day()).or_default().push(record.clone());
        }
    }
    days
}

pub fn earliest_month<V>(months: &BTreeMap<YearMonth, V>) -> Option<YearMonth> {
    months.keys().next().copied()
}

pub fn latest_month<V>(months: &BTreeMap<YearMonth, V>) -> Option<YearMonth> {
    months.keys().next_back().copied()
}

/// Moves to the closest month with sessions in `direction`. Stepping past the earliest or the
/// latest month leaves `current` as is.
pub fn navigate<V>(
    months: &BTreeMap<YearMonth, V>,
    current: YearMonth,
    direction: Direction,
) -> YearMonth {
    let target = match direction {
        Direction::Previous => months.range(..current).next_back(),
        Direction::Next => months.range((Excluded(current), Unbounded)).next(),
    };
    target.map(|(month, _)| *month).unwrap_or(current)
}

pub fn total_duration<'a>(records: impl IntoIterator<Item = &'a SessionRecord>) -> i64 {
    records.into_iter().map(|v| v.duration_seconds).sum()
}

/// Sessions that ended on the given calendar day, in input order.
pub fn sessions_for_day<Tz: TimeZone>(
    records: &[SessionRecord],
    year: i32,
    month: u32,
    day: u32,
    tz: &Tz,
) -> Vec<SessionRecord> {
    records
        .iter()
        .filter(|record| {
            let date = local_date(&record.date, tz);
            date.year() == year && date.month() == month && date.day() == day
        })
        .cloned()
        .collect()
}

/// Normalized weight of a day's total in [0, 1]. Four hours or more saturate.
pub fn day_intensity(total_seconds: i64) -> f64 {
    (total_seconds.max(0) as f64 / FULL_INTENSITY_SECONDS as f64).min(1.)
}

pub fn day_summary<Tz: TimeZone>(records: &[SessionRecord], date: NaiveDate, tz: &Tz) -> DaySummary {
    let sessions = sessions_for_day(records, date.year(), date.month(), date.day(), tz);
    let total = total_duration(&sessions);
    DaySummary {
        date,
        sessions,
        total,
        intensity: day_intensity(total),
    }
}

pub fn stats_available(session_count: usize) -> bool {
    session_count > MIN_SESSIONS_FOR_STATS
}
