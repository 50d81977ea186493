//! Plain-text rendering of calendar state.
//!
//! # Responsibility
//! - Render the month grid, the month list and the selected-day panel.
//! - Read state only; every mutation goes through `CalendarApp`.

use calendar_core::date::{
    format_date, format_long_date, format_time, parse_date, weekday_short_name, weekday_short_names,
    MonthLayout,
};
use calendar_core::{CalendarApp, Event, IdGenerator, KeyValueStore, ViewMode};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt::Write;

/// Titles shown per day under the grid before collapsing into `+N more`.
const GRID_PREVIEW_LIMIT: usize = 3;
const CELL_WIDTH: usize = 5;

/// Renders the displayed month in the app's current view mode.
pub fn render_month<S, G>(app: &CalendarApp<S, G>, today: NaiveDate) -> String
where
    S: KeyValueStore + Clone,
    G: IdGenerator,
{
    let Some(layout) = app.month_layout() else {
        return "Month out of supported range\n".to_string();
    };
    let today_key = format_date(today);
    let selected = app.view().selected_date.as_deref();
    let events_for = |date: &str| app.events().query_by_date(date);

    let mut out = String::new();
    let _ = writeln!(out, "{}  (theme: {})", layout.title(), app.theme());
    match app.view().mode {
        ViewMode::Grid => {
            let marked = app.events().days_with_events(layout.year, layout.month);
            render_grid(&mut out, &layout, &today_key, selected, &marked, events_for);
        }
        ViewMode::List => render_list(&mut out, &layout, &today_key, events_for),
    }
    out
}

fn render_grid<'a, F>(
    out: &mut String,
    layout: &MonthLayout,
    today_key: &str,
    selected: Option<&str>,
    marked: &BTreeSet<u32>,
    events_for: F,
) where
    F: Fn(&str) -> Vec<&'a Event>,
{
    let header = weekday_short_names()
        .iter()
        .map(|name| format!("{name:^width$}", width = CELL_WIDTH))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "{}", header.trim_end());

    let mut cells: Vec<String> = (0..layout.leading_blanks)
        .map(|_| " ".repeat(CELL_WIDTH))
        .collect();
    let mut previews = Vec::new();

    for cell in &layout.cells {
        let is_today = cell.date == today_key;
        let is_selected = selected == Some(cell.date.as_str());
        let (open, close) = match (is_today, is_selected) {
            (true, true) => ('{', '}'),
            (true, false) => ('[', ']'),
            (false, true) => ('<', '>'),
            (false, false) => (' ', ' '),
        };
        let has_events = marked.contains(&cell.day);
        let mark = if has_events { '*' } else { ' ' };
        cells.push(format!("{open}{:>2}{close}{mark}", cell.day));

        if has_events {
            previews.push((cell.day, preview_titles(&events_for(&cell.date))));
        }
    }

    for week in cells.chunks(7) {
        let _ = writeln!(out, "{}", week.join(" ").trim_end());
    }

    if !previews.is_empty() {
        out.push('\n');
        for (day, titles) in previews {
            let _ = writeln!(out, "{day:>2}: {titles}");
        }
    }
}

fn preview_titles(events: &[&Event]) -> String {
    let mut titles = events
        .iter()
        .take(GRID_PREVIEW_LIMIT)
        .map(|event| event.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if events.len() > GRID_PREVIEW_LIMIT {
        let _ = write!(titles, " +{} more", events.len() - GRID_PREVIEW_LIMIT);
    }
    titles
}

fn render_list<'a, F>(out: &mut String, layout: &MonthLayout, today_key: &str, events_for: F)
where
    F: Fn(&str) -> Vec<&'a Event>,
{
    for cell in &layout.cells {
        let weekday = parse_date(&cell.date).map_or("", weekday_short_name);
        let marker = if cell.date == today_key { '>' } else { ' ' };
        let day_events = events_for(&cell.date);
        if day_events.is_empty() {
            let _ = writeln!(out, "{marker}{:>2} {weekday}  No events", cell.day);
            continue;
        }
        let summary = day_events
            .iter()
            .map(|event| format!("{} {}", format_time(&event.time), event.title))
            .collect::<Vec<_>>()
            .join("; ");
        let _ = writeln!(out, "{marker}{:>2} {weekday}  {summary}", cell.day);
    }
}

/// Renders the detail panel for the selected date.
pub fn render_selected_day<S, G>(app: &CalendarApp<S, G>) -> String
where
    S: KeyValueStore + Clone,
    G: IdGenerator,
{
    let Some(date) = app.view().selected_date.as_deref() else {
        return "Select a date\n".to_string();
    };
    let heading = parse_date(date).map_or_else(|| date.to_string(), format_long_date);

    let mut out = String::new();
    let _ = writeln!(out, "Events for {heading}");
    let events = app.selected_events();
    if events.is_empty() {
        out.push_str("  No events\n");
        return out;
    }
    for event in events {
        let _ = writeln!(
            out,
            "  {:>8}  {}  [{}]",
            format_time(&event.time),
            event.title,
            event.id
        );
        if !event.description.is_empty() {
            let _ = writeln!(out, "            {}", event.description);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{render_month, render_selected_day};
    use calendar_core::db::open_db_in_memory;
    use calendar_core::{
        CalendarApp, EventDraft, SequentialIdGenerator, SqliteKeyValueStore, ViewMode,
    };
    use chrono::NaiveDate;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn grid_marks_today_selection_and_event_days() {
        let conn = open_db_in_memory().unwrap();
        let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut app = CalendarApp::load(kv, SequentialIdGenerator::default(), ymd(2024, 3, 1));
        for (title, time) in [("A", "08:00"), ("B", "09:00"), ("C", "10:00"), ("D", "11:00")] {
            app.create_on("2024-03-15", &EventDraft::new(title, time)).unwrap();
        }
        app.select_day(20);

        let rendered = render_month(&app, ymd(2024, 3, 1));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "March 2024  (theme: light)");
        assert_eq!(lines[1], " Sun   Mon   Tue   Wed   Thu   Fri   Sat");
        // March 2024 starts on a Friday.
        assert_eq!(lines[2].trim_end(), format!("{}[ 1]    2", " ".repeat(30)));
        assert!(rendered.contains(" 15 *"));
        assert!(rendered.contains("<20>"));
        assert!(rendered.contains("15: A, B, C +1 more"));
    }

    #[test]
    fn grid_shows_selected_today_with_its_own_marker() {
        let conn = open_db_in_memory().unwrap();
        let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut app = CalendarApp::load(kv, SequentialIdGenerator::default(), ymd(2024, 3, 12));
        app.select_day(12);

        let rendered = render_month(&app, ymd(2024, 3, 12));
        assert!(rendered.contains("{12}"));
        assert!(!rendered.contains("[12]"));
        assert!(!rendered.contains("<12>"));
    }

    #[test]
    fn list_view_shows_every_day_with_times() {
        let conn = open_db_in_memory().unwrap();
        let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut app = CalendarApp::load(kv, SequentialIdGenerator::default(), ymd(2023, 2, 1));
        app.create_on("2023-02-14", &EventDraft::new("Dinner", "19:30")).unwrap();
        app.create_on("2023-02-14", &EventDraft::new("Flowers", "08:00")).unwrap();
        app.set_view_mode(ViewMode::List);

        let rendered = render_month(&app, ymd(2023, 2, 1));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 1 + 28);
        assert_eq!(lines[1], "> 1 Wed  No events");
        assert_eq!(lines[14], " 14 Tue  8:00 AM Flowers; 7:30 PM Dinner");
    }

    #[test]
    fn day_panel_lists_sorted_events_or_prompts() {
        let conn = open_db_in_memory().unwrap();
        let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut app = CalendarApp::load(kv, SequentialIdGenerator::default(), ymd(2024, 3, 1));
        assert_eq!(render_selected_day(&app), "Select a date\n");

        app.create_on(
            "2024-03-15",
            &EventDraft::new("Lunch", "12:30").with_description("with team"),
        )
        .unwrap();
        app.create_on("2024-03-15", &EventDraft::new("Standup", "09:00")).unwrap();

        let rendered = render_selected_day(&app);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Events for March 15, 2024");
        assert!(lines[1].contains("9:00 AM  Standup  [evt-2]"));
        assert!(lines[2].contains("12:30 PM  Lunch  [evt-1]"));
        assert_eq!(lines[3].trim(), "with team");

        app.select_day(16);
        assert_eq!(render_selected_day(&app), "Events for March 16, 2024\n  No events\n");
    }
}
