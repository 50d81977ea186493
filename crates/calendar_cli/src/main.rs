//! Terminal front end for the calendar core.
//!
//! # Responsibility
//! - Parse user actions and forward them to `CalendarApp`.
//! - Render the resulting state; never mutate events directly.

mod view;

use anyhow::{Context, Result};
use calendar_core::db::open_db;
use calendar_core::model::event::DEFAULT_EVENT_TIME;
use calendar_core::{
    core_version, flush_logging, init_logging, CalendarApp, CalendarConfig, EventDraft, EventId,
    IdGenerator, KeyValueStore, SqliteKeyValueStore, Theme, UuidIdGenerator, ViewMode,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "calendar")]
#[command(about = "Month calendar with events kept in a local store")]
struct Cli {
    /// Absolute directory holding the local store and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month as a grid (default) or as a list
    Month {
        /// Year to show (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month to show, 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Months to move from the shown month (e.g. -1 for previous)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,

        /// Render one row per day instead of a grid
        #[arg(long)]
        list: bool,

        /// Day of the shown month to open in the detail panel
        #[arg(long)]
        select: Option<u32>,
    },
    /// Show events of one date (YYYY-MM-DD)
    Day { date: String },
    /// Create an event
    Add {
        /// Date in YYYY-MM-DD form
        date: String,

        /// Event title
        title: String,

        /// Time in 24-hour HH:MM form
        #[arg(short, long, default_value = DEFAULT_EVENT_TIME)]
        time: String,

        /// Optional description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Edit an event; omitted fields keep their value
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        time: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete an event (unknown ids are ignored)
    Delete { id: String },
    /// Show or change the theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
    /// Print the core version
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
    Light,
    Dark,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Version) {
        println!("calendar_core version={}", core_version());
        return Ok(());
    }

    let config = CalendarConfig::resolve(cli.data_dir.as_deref(), cli.log_level.as_deref())
        .context("invalid configuration")?;
    init_logging(config.log_level, &config.log_dir()).context("failed to initialize logging")?;

    let command = command_name(&cli.command);
    let outcome = run(cli.command, &config);
    match &outcome {
        Ok(()) => info!("event=cli_command module=cli status=ok command={command}"),
        Err(err) => error!(
            "event=cli_command module=cli status=error command={command} error={err:#}"
        ),
    }
    flush_logging();
    outcome
}

fn run(command: Commands, config: &CalendarConfig) -> Result<()> {
    let db_path = config.db_path();
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open local store at {}", db_path.display()))?;
    let kv = SqliteKeyValueStore::try_new(&conn).context("local store is not usable")?;

    let today = Local::now().date_naive();
    let mut app = CalendarApp::load(kv, UuidIdGenerator, today);

    match command {
        Commands::Month {
            year,
            month,
            offset,
            list,
            select,
        } => {
            let request = MonthRequest {
                year,
                month,
                offset,
                list,
                select,
            };
            print!("{}", month_screen(&mut app, today, &request)?);
        }
        Commands::Day { date } => {
            if !app.select_date(&date) {
                anyhow::bail!("invalid date `{date}`; expected YYYY-MM-DD");
            }
            print!("{}", view::render_selected_day(&app));
        }
        Commands::Add {
            date,
            title,
            time,
            description,
        } => {
            let draft = EventDraft::new(title, time).with_description(description);
            let created = app
                .create_on(&date, &draft)
                .context("could not create event")?;
            println!("Created {}", created.id);
            print!("{}", view::render_selected_day(&app));
        }
        Commands::Edit {
            id,
            title,
            time,
            description,
        } => {
            let id = EventId::new(id);
            let existing = app
                .events()
                .get(&id)
                .with_context(|| format!("no event with id {id}"))?;
            let mut draft = EventDraft::from_event(existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(time) = time {
                draft.time = time;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            let updated = app
                .edit_event(&id, &draft)
                .context("could not update event")?;
            println!("Updated {}", updated.id);
            print!("{}", view::render_selected_day(&app));
        }
        Commands::Delete { id } => {
            let id = EventId::new(id);
            match app.delete_event(&id) {
                Some(removed) => println!("Deleted {}", removed.id),
                None => println!("No event with id {id}"),
            }
        }
        Commands::Theme { action } => {
            let theme = match action {
                ThemeAction::Show => app.theme(),
                ThemeAction::Toggle => app.toggle_theme(),
                ThemeAction::Light => app.set_theme(Theme::Light),
                ThemeAction::Dark => app.set_theme(Theme::Dark),
            };
            println!("{theme}");
        }
        Commands::Version => {}
    }

    Ok(())
}

/// Options of the `month` command, with `month` 1-based.
struct MonthRequest {
    year: Option<i32>,
    month: Option<u32>,
    offset: i32,
    list: bool,
    select: Option<u32>,
}

/// Moves the view as requested and renders the month, plus the detail panel
/// when a day is selected. The selection is applied before the grid is drawn.
fn month_screen<S, G>(
    app: &mut CalendarApp<S, G>,
    today: NaiveDate,
    request: &MonthRequest,
) -> Result<String>
where
    S: KeyValueStore + Clone,
    G: IdGenerator,
{
    let year = request.year.unwrap_or(app.view().year);
    let month = request.month.map_or(app.view().month, |month| month - 1);
    app.show_month(year, month);
    app.navigate(request.offset);
    if request.list {
        app.set_view_mode(ViewMode::List);
    }
    if let Some(day) = request.select {
        if app.select_day(day).is_none() {
            anyhow::bail!("day {day} does not exist in this month");
        }
    }

    let mut screen = view::render_month(app, today);
    if request.select.is_some() {
        screen.push('\n');
        screen.push_str(&view::render_selected_day(app));
    }
    Ok(screen)
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Month { .. } => "month",
        Commands::Day { .. } => "day",
        Commands::Add { .. } => "add",
        Commands::Edit { .. } => "edit",
        Commands::Delete { .. } => "delete",
        Commands::Theme { .. } => "theme",
        Commands::Version => "version",
    }
}

#[cfg(test)]
mod tests {
    use super::{month_screen, Cli, Commands, MonthRequest, ThemeAction};
    use calendar_core::db::open_db_in_memory;
    use calendar_core::{CalendarApp, EventDraft, SequentialIdGenerator, SqliteKeyValueStore};
    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};

    fn march_2024(select: Option<u32>) -> MonthRequest {
        MonthRequest {
            year: Some(2024),
            month: Some(3),
            offset: 0,
            list: false,
            select,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn month_accepts_negative_offset() {
        let cli = Cli::try_parse_from(["calendar", "month", "--offset", "-1", "--list"]).unwrap();
        match cli.command {
            Commands::Month { offset, list, .. } => {
                assert_eq!(offset, -1);
                assert!(list);
            }
            _ => panic!("expected month command"),
        }
    }

    #[test]
    fn month_rejects_out_of_range_month() {
        assert!(Cli::try_parse_from(["calendar", "month", "--month", "13"]).is_err());
    }

    #[test]
    fn add_defaults_time_and_description() {
        let cli = Cli::try_parse_from(["calendar", "add", "2024-03-15", "Standup"]).unwrap();
        match cli.command {
            Commands::Add {
                date,
                title,
                time,
                description,
            } => {
                assert_eq!(date, "2024-03-15");
                assert_eq!(title, "Standup");
                assert_eq!(time, "09:00");
                assert!(description.is_empty());
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn theme_defaults_to_show() {
        let cli = Cli::try_parse_from(["calendar", "theme"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Theme {
                action: ThemeAction::Show
            }
        ));
    }

    #[test]
    fn month_screen_marks_the_selected_day_in_the_grid() {
        let conn = open_db_in_memory().unwrap();
        let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut app = CalendarApp::load(kv, SequentialIdGenerator::default(), today);
        app.create_on("2024-03-20", &EventDraft::new("Review", "10:00")).unwrap();

        let screen = month_screen(&mut app, today, &march_2024(Some(20))).unwrap();
        assert!(screen.starts_with("March 2024"));
        assert!(screen.contains("<20>*"));
        assert!(screen.contains("Events for March 20, 2024"));
        assert!(screen.contains("10:00 AM  Review"));
    }

    #[test]
    fn month_screen_rejects_missing_day_without_rendering() {
        let conn = open_db_in_memory().unwrap();
        let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut app = CalendarApp::load(kv, SequentialIdGenerator::default(), today);

        let err = month_screen(&mut app, today, &march_2024(Some(40))).unwrap_err();
        assert!(err.to_string().contains("day 40"));
        assert_eq!(app.view().selected_date, None);
    }
}
