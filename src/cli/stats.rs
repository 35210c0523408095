use std::collections::{BTreeMap, BTreeSet};

use ansi_term::{Colour, Style};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate, TimeZone};
use clap::{CommandFactory, Parser};

use crate::{
    session::{record::SessionRecord, slot::SlotStorage, store::SessionStore},
    stats::{
        aggregator::{
            day_intensity, day_summary, earliest_month, group_by_month, group_by_month_day,
            latest_month, navigate, total_duration, DaySummary, Direction,
        },
        month::YearMonth,
    },
    utils::time::format_duration,
};

use super::Args;

#[derive(Debug, Parser)]
pub struct StatsCommand {
    #[arg(
        long,
        help = "Month to display as YYYY-MM. Defaults to the latest month with sessions"
    )]
    month: Option<YearMonth>,
    #[arg(
        long,
        conflicts_with = "next",
        help = "Show the closest earlier month that has sessions"
    )]
    prev: bool,
    #[arg(long, help = "Show the closest later month that has sessions")]
    next: bool,
    #[arg(
        long,
        help = "Day of the displayed month to summarize. Defaults to today"
    )]
    day: Option<u32>,
}

/// Base colour of a day with sessions. Fainter days blend it towards black.
const DAY_COLOUR: (f64, f64, f64) = (93., 173., 226.);

pub async fn process_stats_command<S: SlotStorage>(
    StatsCommand {
        month,
        prev,
        next,
        day,
    }: StatsCommand,
    store: SessionStore<S>,
) -> Result<()> {
    let records = store.all().await;
    let months = group_by_month(&records, &Local);

    let Some(latest) = latest_month(&months) else {
        println!("No sessions recorded yet.");
        return Ok(());
    };

    let mut current = month.unwrap_or(latest);
    if prev {
        current = navigate(&months, current, Direction::Previous);
    } else if next {
        current = navigate(&months, current, Direction::Next);
    }

    let today = Local::now().date_naive();
    let date = match day {
        Some(day) => current
            .first_day()
            .and_then(|first| first.with_day(day))
            .ok_or_else(|| {
                Args::command().error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("{current} has no day {day}"),
                )
            })?,
        None => today,
    };

    print!("{}", render_calendar(&records, &months, current, today, &Local));
    println!();
    print!("{}", render_day_summary(&day_summary(&records, date, &Local), &Local));
    Ok(())
}

/// Month header with navigation hints followed by a grid of days. Days with sessions are shaded
/// by intensity and today is underlined.
fn render_calendar<Tz: TimeZone>(
    records: &[SessionRecord],
    months: &BTreeMap<YearMonth, BTreeSet<u32>>,
    current: YearMonth,
    today: NaiveDate,
    tz: &Tz,
) -> String {
    let has_previous = earliest_month(months).is_some_and(|v| v < current);
    let has_next = latest_month(months).is_some_and(|v| v > current);
    let days = group_by_month_day(records, current, tz);

    let mut output = format!(
        "{} {current} {}\n",
        if has_previous { "<" } else { " " },
        if has_next { ">" } else { " " },
    );

    for day in 1..=current.days_in_month() {
        let label = format!("{day:>3}");
        let is_today = current.first_day().and_then(|v| v.with_day(day)) == Some(today);
        let cell = match days.get(&day) {
            Some(sessions) => {
                let style = day_style(day_intensity(total_duration(sessions)));
                let style = if is_today { style.underline() } else { style };
                style.paint(label).to_string()
            }
            None => Style::new().dimmed().paint(label).to_string(),
        };
        output.push_str(&cell);
        output.push(if day % 7 == 0 { '\n' } else { ' ' });
    }
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

fn day_style(intensity: f64) -> Style {
    let alpha = 0.3 + 0.7 * intensity;
    let (r, g, b) = DAY_COLOUR;
    let background = Colour::RGB((r * alpha) as u8, (g * alpha) as u8, (b * alpha) as u8);
    Colour::White.on(background)
}

fn render_day_summary<Tz: TimeZone>(summary: &DaySummary, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if summary.sessions.is_empty() {
        return "No sessions for this day.\n".into();
    }

    let mut output = format!(
        "{}\nTotal Deep Work: {} ({:.0}% of a full day)\n",
        summary.date.format("%Y-%m-%d"),
        format_duration(summary.total),
        summary.intensity * 100.,
    );
    for (index, session) in summary.sessions.iter().enumerate() {
        output.push_str(&format!(
            "Session {}: {} - {}\n",
            index + 1,
            session.date.with_timezone(tz).format("%H:%M:%S"),
            format_duration(session.duration_seconds)
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::{
        session::record::SessionRecord,
        stats::{
            aggregator::{day_summary, group_by_month},
            month::YearMonth,
        },
    };

    use super::{render_calendar, render_day_summary};

    fn records() -> Vec<SessionRecord> {
        vec![
            SessionRecord::new(Utc.with_ymd_and_hms(2024, 6, 5, 9, 15, 0).unwrap(), 720),
            SessionRecord::new(Utc.with_ymd_and_hms(2024, 6, 5, 14, 0, 30).unwrap(), 1200),
            SessionRecord::new(Utc.with_ymd_and_hms(2024, 5, 7, 10, 0, 0).unwrap(), 300),
        ]
    }

    #[test]
    fn test_render_day_summary() {
        let summary = day_summary(
            &records(),
            NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            &Utc,
        );

        let output = render_day_summary(&summary, &Utc);

        assert_eq!(
            output,
            "2024-06-05\n\
             Total Deep Work: 00:32:00 (13% of a full day)\n\
             Session 1: 09:15:00 - 00:12:00\n\
             Session 2: 14:00:30 - 00:20:00\n"
        );
    }

    #[test]
    fn test_render_empty_day_summary() {
        let summary = day_summary(
            &records(),
            NaiveDate::from_ymd_opt(2024, 6, 6).unwrap(),
            &Utc,
        );
        assert_eq!(
            render_day_summary(&summary, &Utc),
            "No sessions for this day.\n"
        );
    }

    #[test]
    fn test_render_calendar() {
        let records = records();
        let months = group_by_month(&records, &Utc);
        let june = YearMonth::new(2024, 6).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();

        let output = render_calendar(&records, &months, june, today, &Utc);

        let mut lines = output.lines();
        // May has sessions, nothing after June does.
        assert_eq!(lines.next(), Some("< 2024-06  "));
        // 30 days in rows of seven.
        assert_eq!(lines.count(), 5);
        assert!(output.contains(" 30"));
    }

    #[test]
    fn test_render_calendar_earliest_month() {
        let records = records();
        let months = group_by_month(&records, &Utc);
        let may = YearMonth::new(2024, 5).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();

        let output = render_calendar(&records, &months, may, today, &Utc);

        assert_eq!(output.lines().next(), Some("  2024-05 >"));
        assert!(output.contains(" 31"));
    }
}
