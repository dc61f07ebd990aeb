use crate::calendar::{CalendarEvent, to_events};
use crate::filter::{FilterMode, filter_tasks, week_bounds};
use crate::form::TaskForm;
use crate::model::Task;
use crate::store::TaskStore;
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use ratatui::widgets::ListState;

#[derive(PartialEq, Clone, Copy)]
pub enum Focus {
    List,
    Calendar,
}

#[derive(PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Searching,
    Form,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CalendarView {
    Day,
    Week,
    Month,
}

impl CalendarView {
    pub fn label(&self) -> &'static str {
        match self {
            CalendarView::Day => "Day",
            CalendarView::Week => "Week",
            CalendarView::Month => "Month",
        }
    }

    pub fn next(&self) -> CalendarView {
        match self {
            CalendarView::Day => CalendarView::Week,
            CalendarView::Week => CalendarView::Month,
            CalendarView::Month => CalendarView::Day,
        }
    }

    pub fn from_label(label: &str) -> Option<CalendarView> {
        match label.trim().to_lowercase().as_str() {
            "day" => Some(CalendarView::Day),
            "week" => Some(CalendarView::Week),
            "month" => Some(CalendarView::Month),
            _ => None,
        }
    }
}

pub struct AppState {
    // Data
    pub store: TaskStore,
    pub tasks: Vec<Task>,
    pub events: Vec<CalendarEvent>,
    pub visible_events: Vec<CalendarEvent>,

    // UI State
    pub list_state: ListState,
    pub event_state: ListState,
    pub focus: Focus,
    pub mode: InputMode,
    pub message: String,
    pub details: Option<Task>,

    // Filter State
    pub filter_mode: FilterMode,
    pub search_query: String,
    pub search_cursor: usize,

    // Dialog draft
    pub form: TaskForm,

    // Calendar State
    pub calendar_view: CalendarView,
    pub cal_date: NaiveDate,
    pub today: NaiveDate,
}

impl AppState {
    pub fn new(store: TaskStore, filter_mode: FilterMode, calendar_view: CalendarView) -> Self {
        let mut l_state = ListState::default();
        l_state.select(Some(0));
        let today = Local::now().date_naive();

        let mut state = Self {
            store,
            tasks: vec![],
            events: vec![],
            visible_events: vec![],
            list_state: l_state,
            event_state: ListState::default(),
            focus: Focus::List,
            mode: InputMode::Normal,
            message: String::new(),
            details: None,
            filter_mode,
            search_query: String::new(),
            search_cursor: 0,
            form: TaskForm::new(),
            calendar_view,
            cal_date: today,
            today,
        };
        state.refresh_filtered_view();
        state.message = format!("Loaded {} tasks.", state.store.tasks().len());
        state
    }

    /// Re-derives everything the views render from the store: the filtered
    /// list, the calendar projection and the events in the current calendar
    /// scope. Selections are clamped, never reset.
    pub fn refresh_filtered_view(&mut self) {
        self.tasks = filter_tasks(
            self.store.tasks(),
            self.filter_mode,
            &self.search_query,
            self.today,
        );
        self.events = to_events(self.store.tasks());
        self.visible_events = self.events_in_scope();

        clamp_selection(&mut self.list_state, self.tasks.len());
        clamp_selection(&mut self.event_state, self.visible_events.len());

        if let Some(warning) = self.store.take_write_warning() {
            self.message = format!("Warning: {}", warning);
        }
    }

    /// Recomputes "today" from the wall clock; called once per loop pass so
    /// date-based filters stay correct across midnight.
    pub fn sync_today(&mut self) {
        let now = Local::now().date_naive();
        if now != self.today {
            self.today = now;
            self.refresh_filtered_view();
        }
    }

    fn events_in_scope(&self) -> Vec<CalendarEvent> {
        match self.calendar_view {
            CalendarView::Day => self
                .events
                .iter()
                .filter(|e| e.start_day() == Some(self.cal_date))
                .cloned()
                .collect(),
            CalendarView::Week => {
                let (monday, _) = week_bounds(self.cal_date);
                let mut out = Vec::new();
                for offset in 0..7 {
                    let day = monday + Duration::days(offset);
                    out.extend(
                        self.events
                            .iter()
                            .filter(|e| e.start_day() == Some(day))
                            .cloned(),
                    );
                }
                out
            }
            CalendarView::Month => self
                .events
                .iter()
                .filter(|e| {
                    e.start_day().is_some_and(|d| {
                        d.year() == self.cal_date.year() && d.month() == self.cal_date.month()
                    })
                })
                .cloned()
                .collect(),
        }
    }

    pub fn get_selected_task(&self) -> Option<&Task> {
        self.list_state
            .selected()
            .and_then(|idx| self.tasks.get(idx))
    }

    pub fn get_selected_event(&self) -> Option<&CalendarEvent> {
        self.event_state
            .selected()
            .and_then(|idx| self.visible_events.get(idx))
    }

    // --- SEARCH INPUT ---
    pub fn enter_search_char(&mut self, new_char: char) {
        let byte_idx = self
            .search_query
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.search_cursor)
            .unwrap_or(self.search_query.len());
        self.search_query.insert(byte_idx, new_char);
        self.search_cursor += 1;
    }

    pub fn delete_search_char(&mut self) {
        if self.search_cursor == 0 {
            return;
        }
        let before = self.search_query.chars().take(self.search_cursor - 1);
        let after = self.search_query.chars().skip(self.search_cursor);
        self.search_query = before.chain(after).collect();
        self.search_cursor -= 1;
    }

    pub fn move_search_cursor_left(&mut self) {
        self.search_cursor = self.search_cursor.saturating_sub(1);
    }

    pub fn move_search_cursor_right(&mut self) {
        self.search_cursor = self
            .search_cursor
            .saturating_add(1)
            .min(self.search_query.chars().count());
    }

    pub fn reset_search(&mut self) {
        self.search_query.clear();
        self.search_cursor = 0;
    }

    // --- NAVIGATION ---
    pub fn next(&mut self) {
        match self.focus {
            Focus::List => wrap_next(&mut self.list_state, self.tasks.len()),
            Focus::Calendar => match self.calendar_view {
                CalendarView::Month => self.move_cal_day(7),
                _ => wrap_next(&mut self.event_state, self.visible_events.len()),
            },
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            Focus::List => wrap_previous(&mut self.list_state, self.tasks.len()),
            Focus::Calendar => match self.calendar_view {
                CalendarView::Month => self.move_cal_day(-7),
                _ => wrap_previous(&mut self.event_state, self.visible_events.len()),
            },
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::List => Focus::Calendar,
            Focus::Calendar => Focus::List,
        };
    }

    // --- CALENDAR NAVIGATION ---
    pub fn move_cal_day(&mut self, delta: i64) {
        self.cal_date = self.cal_date + Duration::days(delta);
        self.refresh_filtered_view();
    }

    /// Moves the calendar by one unit of the current view.
    pub fn shift_period(&mut self, direction: i64) {
        self.cal_date = match self.calendar_view {
            CalendarView::Day => self.cal_date + Duration::days(direction),
            CalendarView::Week => self.cal_date + Duration::days(7 * direction),
            CalendarView::Month => {
                if direction >= 0 {
                    self.cal_date
                        .checked_add_months(Months::new(direction as u32))
                        .unwrap_or(self.cal_date)
                } else {
                    self.cal_date
                        .checked_sub_months(Months::new((-direction) as u32))
                        .unwrap_or(self.cal_date)
                }
            }
        };
        self.refresh_filtered_view();
    }

    pub fn jump_to_today(&mut self) {
        self.cal_date = self.today;
        self.refresh_filtered_view();
    }

    pub fn cycle_calendar_view(&mut self) {
        self.calendar_view = self.calendar_view.next();
        self.refresh_filtered_view();
    }
}

fn wrap_next(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

fn wrap_previous(state: &mut ListState, len: usize) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}

fn clamp_selection(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
    } else {
        let current = state.selected().unwrap_or(0);
        state.select(Some(current.min(len - 1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewTaskInput, Priority};
    use crate::storage::SnapshotFile;

    fn state_with_tasks(titles_due: &[(&str, &str)]) -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TaskStore::open(SnapshotFile::at(dir.path().join("tasks.json")));
        for (title, due) in titles_due {
            store
                .add(NewTaskInput {
                    title: (*title).to_string(),
                    due_date: (*due).to_string(),
                    details: String::new(),
                    priority: Priority::Medium,
                })
                .unwrap();
        }
        let state = AppState::new(store, FilterMode::All, CalendarView::Week);
        (state, dir)
    }

    #[test]
    fn test_navigation_next_wraps() {
        let (mut state, _dir) =
            state_with_tasks(&[("a", "2025-06-09"), ("b", "2025-06-10"), ("c", "2025-06-11")]);
        state.list_state.select(Some(0));

        state.next();
        assert_eq!(state.list_state.selected(), Some(1));
        state.next();
        assert_eq!(state.list_state.selected(), Some(2));
        state.next(); // Wrap to 0
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_previous_wraps() {
        let (mut state, _dir) = state_with_tasks(&[("a", "2025-06-09"), ("b", "2025-06-10")]);
        state.list_state.select(Some(0));

        state.previous(); // Wrap to last
        assert_eq!(state.list_state.selected(), Some(1));
        state.previous();
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_empty_list_safety() {
        let (mut state, _dir) = state_with_tasks(&[]);
        state.next();
        state.previous();
        assert_eq!(state.list_state.selected(), None);
    }

    #[test]
    fn test_filter_change_clamps_selection() {
        let (mut state, _dir) =
            state_with_tasks(&[("a", "2025-06-09"), ("b", "2025-06-10"), ("c", "2025-06-11")]);
        state.today = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        state.list_state.select(Some(2));

        state.filter_mode = FilterMode::Today;
        state.refresh_filtered_view();
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.list_state.selected(), Some(0));

        state.filter_mode = FilterMode::Completed;
        state.refresh_filtered_view();
        assert!(state.tasks.is_empty());
        assert_eq!(state.list_state.selected(), None);
    }

    #[test]
    fn test_search_live_filtering() {
        let (mut state, _dir) = state_with_tasks(&[
            ("Water plants", "2025-06-09"),
            ("Buy groceries", "2025-06-10"),
        ]);
        for c in "water".chars() {
            state.enter_search_char(c);
        }
        state.refresh_filtered_view();
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0].title, "Water plants");

        state.reset_search();
        state.refresh_filtered_view();
        assert_eq!(state.tasks.len(), 2);
    }

    #[test]
    fn test_calendar_scope_day_and_week() {
        let (mut state, _dir) = state_with_tasks(&[
            ("mon", "2025-06-09"),
            ("wed", "2025-06-11"),
            ("next mon", "2025-06-16"),
        ]);
        state.cal_date = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();

        state.calendar_view = CalendarView::Day;
        state.refresh_filtered_view();
        assert_eq!(state.visible_events.len(), 1);

        state.calendar_view = CalendarView::Week;
        state.refresh_filtered_view();
        assert_eq!(state.visible_events.len(), 2);

        state.calendar_view = CalendarView::Month;
        state.refresh_filtered_view();
        assert_eq!(state.visible_events.len(), 3);
    }

    #[test]
    fn test_shift_period_per_view() {
        let (mut state, _dir) = state_with_tasks(&[]);
        state.cal_date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

        state.calendar_view = CalendarView::Day;
        state.shift_period(1);
        assert_eq!(state.cal_date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        state.calendar_view = CalendarView::Week;
        state.shift_period(-1);
        assert_eq!(state.cal_date, NaiveDate::from_ymd_opt(2025, 1, 25).unwrap());

        // Month arithmetic clamps the day instead of overflowing.
        state.cal_date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        state.calendar_view = CalendarView::Month;
        state.shift_period(1);
        assert_eq!(state.cal_date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }
}
