use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use clap::Args;

use luna_core::{Event, EventKind, LogbookSession};

use super::{display_name, open_repository};
use crate::config::Config;

/// How often `--watch` re-loads the logbook.
const UPDATE_EVERY_SECS: u64 = 30;

#[derive(Args)]
pub struct EventsCommand {
    /// Logbook to read (defaults to the default logbook)
    #[arg(long, short, default_value = "")]
    logbook: String,

    /// Show at most this many events
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    /// Stay on screen and re-load periodically (never writes anything)
    #[arg(long, short)]
    watch: bool,
}

impl EventsCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let repo = open_repository(config)?;
        let mut session = LogbookSession::open(repo, &self.logbook).await?;

        loop {
            self.render(&session);
            if !self.watch {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_secs(UPDATE_EVERY_SECS)).await;
            session.reload().await?;
            // Clear the screen between refreshes.
            print!("\x1B[2J\x1B[1;1H");
        }
    }

    fn render(&self, session: &LogbookSession) {
        let logbook = session.logbook();
        println!(
            "Logbook {} - {} events",
            display_name(&logbook.name),
            logbook.len()
        );
        println!();

        let now = Utc::now().timestamp();
        let shown = self.limit.unwrap_or(logbook.len());
        for event in logbook.events.iter().take(shown) {
            println!("{}", render_event(event, now));
        }
        if logbook.len() > shown {
            println!("... and {} more", logbook.len() - shown);
        }
    }
}

fn render_event(event: &Event, now: i64) -> String {
    let label = match &event.kind {
        EventKind::Other(tag) => format!("Unknown event ({tag})"),
        kind => kind.label().to_string(),
    };
    let mut line = format!(
        "{} {:<24} {:>10}  {}",
        event.kind.emoji(),
        label,
        format_quantity(event),
        format_time_ago(now, event.time)
    );
    if let Some(notes) = event.notes.as_deref().filter(|n| !n.is_empty()) {
        line.push_str(&format!("  - {notes}"));
    }
    line
}

/// Renders the quantity with the unit its kind implies; empty when unset.
fn format_quantity(event: &Event) -> String {
    let Some(qty) = event.quantity.filter(|q| *q > 0) else {
        return String::new();
    };
    match &event.kind {
        EventKind::BabyBottle => format!("{qty} ml"),
        EventKind::Weight | EventKind::Food => format!("{qty} g"),
        EventKind::Medicine => format!("{qty} mg"),
        EventKind::Temperature => format!("{}.{} °C", qty / 10, qty % 10),
        kind if kind.is_breastfeeding() => {
            if qty < 60 {
                format!("{qty} s")
            } else {
                format!("{} min", qty / 60)
            }
        }
        _ => qty.to_string(),
    }
}

/// "now", "3 hours, 26 minutes ago", or the full local date once the event
/// is more than a day old.
fn format_time_ago(now: i64, time: i64) -> String {
    let seconds_diff = now - time;
    let minutes_diff = seconds_diff / 60;

    if minutes_diff < 1 {
        return "now".to_string();
    }

    let hours_ago = seconds_diff / (60 * 60);
    let minutes_ago = minutes_diff % 60;

    if hours_ago > 24 {
        return match DateTime::from_timestamp(time, 0) {
            Some(ts) => ts
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            None => time.to_string(),
        };
    }

    let mut formatted = String::new();
    if hours_ago > 0 {
        formatted.push_str(&format!(
            "{} {}",
            hours_ago,
            if hours_ago == 1 { "hour" } else { "hours" }
        ));
    }
    if minutes_ago > 0 {
        if !formatted.is_empty() {
            formatted.push_str(", ");
        }
        formatted.push_str(&format!(
            "{} {}",
            minutes_ago,
            if minutes_ago == 1 { "minute" } else { "minutes" }
        ));
    }
    formatted.push_str(" ago");
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_ago_now() {
        assert_eq!(format_time_ago(1_700_000_000, 1_700_000_000), "now");
        assert_eq!(format_time_ago(1_700_000_059, 1_700_000_000), "now");
    }

    #[test]
    fn test_time_ago_minutes_and_hours() {
        let now = 1_700_000_000;
        assert_eq!(format_time_ago(now, now - 60), "1 minute ago");
        assert_eq!(format_time_ago(now, now - 26 * 60), "26 minutes ago");
        assert_eq!(format_time_ago(now, now - 3600), "1 hour ago");
        assert_eq!(
            format_time_ago(now, now - (3 * 3600 + 26 * 60)),
            "3 hours, 26 minutes ago"
        );
    }

    #[test]
    fn test_time_ago_older_than_a_day_shows_date() {
        let now = 1_700_000_000;
        let rendered = format_time_ago(now, now - 3 * 24 * 3600);
        assert!(rendered.contains('-'), "expected a date, got {rendered}");
    }

    #[test]
    fn test_quantity_units() {
        let bottle = Event::new(EventKind::BabyBottle).with_quantity(120);
        assert_eq!(format_quantity(&bottle), "120 ml");

        let temp = Event::new(EventKind::Temperature).with_quantity(368);
        assert_eq!(format_quantity(&temp), "36.8 °C");

        let nurse = Event::new(EventKind::BreastfeedingLeft).with_quantity(12 * 60);
        assert_eq!(format_quantity(&nurse), "12 min");

        let pee = Event::new(EventKind::DiaperPee);
        assert_eq!(format_quantity(&pee), "");
    }

    #[test]
    fn test_render_includes_notes() {
        let event = Event::new(EventKind::Medicine)
            .with_quantity(5)
            .with_notes("vitamin D")
            .with_time(1_700_000_000);
        let line = render_event(&event, 1_700_000_000);
        assert!(line.contains("Medicine"));
        assert!(line.contains("5 mg"));
        assert!(line.contains("vitamin D"));
    }
}
