//! Application state shared by calendar views.
//!
//! # Responsibility
//! - Own the event store, the theme preference and transient view state.
//! - Funnel every mutation through store or theme operations so views never
//!   touch state directly.
//!
//! # Invariants
//! - The displayed month is always a valid zero-based month.
//! - A selected date, when present, is a canonical date key.
//! - Theme changes are persisted immediately; view state is never persisted.

use crate::date::{
    date_key, is_canonical_date, parse_date, shift_month, year_month_of, MonthLayout,
};
use crate::id::IdGenerator;
use crate::model::event::{Event, EventDraft, EventId};
use crate::model::theme::Theme;
use crate::repo::kv_repo::KeyValueStore;
use crate::service::event_store::{EventStore, StoreError, StoreResult};
use crate::service::persistence::PersistenceAdapter;
use chrono::NaiveDate;
use log::info;

/// How the displayed month is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

/// Transient navigation state. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub year: i32,
    /// Zero-based month currently displayed.
    pub month: u32,
    pub selected_date: Option<String>,
    pub mode: ViewMode,
}

impl ViewState {
    /// Starts on the month containing `today` with nothing selected.
    pub fn starting_at(today: NaiveDate) -> Self {
        let (year, month) = year_month_of(today);
        Self {
            year,
            month,
            selected_date: None,
            mode: ViewMode::default(),
        }
    }
}

/// Explicitly owned calendar application state.
pub struct CalendarApp<S: KeyValueStore + Clone, G: IdGenerator> {
    store: EventStore<S, G>,
    persistence: PersistenceAdapter<S>,
    theme: Theme,
    view: ViewState,
}

impl<S: KeyValueStore + Clone, G: IdGenerator> CalendarApp<S, G> {
    /// Restores persisted events and theme and opens the month of `today`.
    ///
    /// The theme falls back to `light` when nothing usable is stored.
    pub fn load(store: S, ids: G, today: NaiveDate) -> Self {
        let persistence = PersistenceAdapter::new(store);
        let theme = persistence.load_theme().unwrap_or_default();
        let events = EventStore::load_with_ids(persistence.clone(), ids);
        info!(
            "event=app_load module=app status=ok events={} theme={}",
            events.len(),
            theme
        );
        Self {
            store: events,
            persistence,
            theme,
            view: ViewState::starting_at(today),
        }
    }

    pub fn events(&self) -> &EventStore<S, G> {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sets and persists the theme.
    pub fn set_theme(&mut self, theme: Theme) -> Theme {
        self.theme = theme;
        self.persistence.save_theme(theme);
        theme
    }

    /// Flips between light and dark and persists the result.
    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled())
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view.mode = mode;
    }

    /// Jumps to a zero-based month. Out-of-range months are ignored.
    pub fn show_month(&mut self, year: i32, month: u32) -> bool {
        if month > 11 {
            return false;
        }
        self.view.year = year;
        self.view.month = month;
        true
    }

    /// Moves the displayed month by `delta` months.
    pub fn navigate(&mut self, delta: i32) {
        let (year, month) = shift_month(self.view.year, self.view.month, delta);
        self.view.year = year;
        self.view.month = month;
    }

    pub fn next_month(&mut self) {
        self.navigate(1);
    }

    pub fn previous_month(&mut self) {
        self.navigate(-1);
    }

    /// Displays the month containing `today`. The selection is kept.
    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.show_month_of(today);
    }

    /// Displays the month containing `date`.
    pub fn show_month_of(&mut self, date: NaiveDate) {
        let (year, month) = year_month_of(date);
        self.view.year = year;
        self.view.month = month;
    }

    /// Selects a 1-based day of the displayed month.
    ///
    /// Returns the selected canonical date, or `None` when the day does not
    /// exist in this month (selection unchanged).
    pub fn select_day(&mut self, day: u32) -> Option<&str> {
        let key = date_key(self.view.year, self.view.month, day)?;
        self.view.selected_date = Some(key);
        self.view.selected_date.as_deref()
    }

    /// Selects any canonical date and displays its month.
    pub fn select_date(&mut self, date: &str) -> bool {
        let Some(parsed) = parse_date(date) else {
            return false;
        };
        self.show_month_of(parsed);
        self.view.selected_date = Some(date.to_string());
        true
    }

    /// Events of the selected date, empty when nothing is selected.
    pub fn selected_events(&self) -> Vec<&Event> {
        self.view
            .selected_date
            .as_deref()
            .map(|date| self.store.query_by_date(date))
            .unwrap_or_default()
    }

    /// Grid geometry of the displayed month.
    pub fn month_layout(&self) -> Option<MonthLayout> {
        MonthLayout::new(self.view.year, self.view.month)
    }

    /// Creates an event on the selected date.
    ///
    /// # Errors
    /// - `NoDateSelected` when no date is selected.
    /// - Any store validation error.
    pub fn create_on_selected(&mut self, draft: &EventDraft) -> StoreResult<Event> {
        let date = self
            .view
            .selected_date
            .clone()
            .ok_or(StoreError::NoDateSelected)?;
        self.store.create(&date, draft)
    }

    /// Selects `date` and creates an event on it.
    pub fn create_on(&mut self, date: &str, draft: &EventDraft) -> StoreResult<Event> {
        if is_canonical_date(date) {
            self.select_date(date);
        }
        self.store.create(date, draft)
    }

    /// Updates an event and selects its date.
    pub fn edit_event(&mut self, id: &EventId, draft: &EventDraft) -> StoreResult<Event> {
        let updated = self.store.update(id, draft)?;
        self.select_date(&updated.date);
        Ok(updated)
    }

    /// Deletes an event; unknown ids are ignored.
    pub fn delete_event(&mut self, id: &EventId) -> Option<Event> {
        self.store.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarApp, ViewMode};
    use crate::db::open_db_in_memory;
    use crate::id::SequentialIdGenerator;
    use crate::model::event::EventDraft;
    use crate::model::theme::Theme;
    use crate::repo::kv_repo::SqliteKeyValueStore;
    use crate::service::event_store::StoreError;
    use chrono::NaiveDate;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn starts_on_current_month_with_light_theme() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();
        let app = CalendarApp::load(store, SequentialIdGenerator::default(), ymd(2024, 3, 15));

        assert_eq!(app.theme(), Theme::Light);
        assert_eq!((app.view().year, app.view().month), (2024, 2));
        assert_eq!(app.view().selected_date, None);
        assert_eq!(app.view().mode, ViewMode::Grid);
    }

    #[test]
    fn navigation_wraps_years_and_returns_to_today() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut app = CalendarApp::load(store, SequentialIdGenerator::default(), ymd(2024, 1, 10));

        app.previous_month();
        assert_eq!((app.view().year, app.view().month), (2023, 11));
        app.next_month();
        app.next_month();
        assert_eq!((app.view().year, app.view().month), (2024, 1));
        assert!(!app.show_month(2024, 12));

        app.go_to_today(ymd(2025, 7, 4));
        assert_eq!((app.view().year, app.view().month), (2025, 6));
    }

    #[test]
    fn select_day_produces_canonical_key() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut app = CalendarApp::load(store, SequentialIdGenerator::default(), ymd(2023, 2, 1));

        assert_eq!(app.select_day(5), Some("2023-02-05"));
        assert_eq!(app.select_day(29), None);
        assert_eq!(app.view().selected_date.as_deref(), Some("2023-02-05"));
    }

    #[test]
    fn create_requires_a_selected_date() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut app = CalendarApp::load(store, SequentialIdGenerator::default(), ymd(2024, 3, 1));

        let err = app
            .create_on_selected(&EventDraft::new("Standup", "09:00"))
            .unwrap_err();
        assert_eq!(err, StoreError::NoDateSelected);

        app.select_day(15);
        let created = app
            .create_on_selected(&EventDraft::new("Standup", "09:00"))
            .unwrap();
        assert_eq!(created.date, "2024-03-15");
        assert_eq!(app.selected_events().len(), 1);
    }

    #[test]
    fn edit_selects_the_event_date() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut app = CalendarApp::load(store, SequentialIdGenerator::default(), ymd(2024, 3, 1));

        let created = app
            .create_on("2024-05-02", &EventDraft::new("Dentist", "14:00"))
            .unwrap();
        app.go_to_today(ymd(2024, 3, 1));
        app.select_day(1);

        let edited = app
            .edit_event(&created.id, &EventDraft::new("Dentist (moved)", "15:00"))
            .unwrap();
        assert_eq!(edited.title, "Dentist (moved)");
        assert_eq!(app.view().selected_date.as_deref(), Some("2024-05-02"));
        assert_eq!((app.view().year, app.view().month), (2024, 4));
    }
}
