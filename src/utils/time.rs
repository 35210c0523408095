use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Formats seconds as `HH:MM:SS`. Hours keep growing past 99 instead of wrapping.
pub fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Calendar date of an instant as seen in `tz`.
pub fn local_date<Tz: TimeZone>(moment: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    moment.with_timezone(tz).date_naive()
}
