use chrono::{Datelike, Duration, NaiveDate};

use crate::model::Task;

/// The dashboard's filter selector, one named predicate per entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Today,
    Upcoming,
    Later,
    Completed,
    NotCompleted,
    Overdue,
    DueTomorrow,
    DueThisWeek,
    DueNextWeek,
}

impl FilterMode {
    /// Selector order, also the `f` key cycling order.
    pub const ALL: [FilterMode; 10] = [
        FilterMode::All,
        FilterMode::Today,
        FilterMode::Upcoming,
        FilterMode::Later,
        FilterMode::Completed,
        FilterMode::NotCompleted,
        FilterMode::Overdue,
        FilterMode::DueTomorrow,
        FilterMode::DueThisWeek,
        FilterMode::DueNextWeek,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Today => "Today",
            FilterMode::Upcoming => "Upcoming",
            FilterMode::Later => "Later",
            FilterMode::Completed => "Completed",
            FilterMode::NotCompleted => "Not Completed",
            FilterMode::Overdue => "Overdue",
            FilterMode::DueTomorrow => "Due Tomorrow",
            FilterMode::DueThisWeek => "Due This Week",
            FilterMode::DueNextWeek => "Due Next Week",
        }
    }

    /// Case-insensitive label lookup, used for the config file.
    pub fn from_label(label: &str) -> Option<FilterMode> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.label().eq_ignore_ascii_case(label.trim()))
    }

    pub fn next(&self) -> FilterMode {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> FilterMode {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Monday..Sunday window of the week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

/// Pure view derivation: mode predicate, then a case-insensitive substring
/// match of `query` against the title. Insertion order is preserved; the
/// store stays the only owner of the canonical collection.
///
/// Date predicates compare the date-only part of the due date against the
/// caller's `today`; a task whose due date does not parse never matches a
/// date-based mode.
pub fn filter_tasks(tasks: &[Task], mode: FilterMode, query: &str, today: NaiveDate) -> Vec<Task> {
    let query = query.to_lowercase();
    tasks
        .iter()
        .filter(|task| matches_mode(task, mode, today))
        .filter(|task| query.is_empty() || task.title.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

fn matches_mode(task: &Task, mode: FilterMode, today: NaiveDate) -> bool {
    match mode {
        FilterMode::All => true,
        FilterMode::Completed => task.status.is_completed(),
        FilterMode::NotCompleted => !task.status.is_completed(),
        FilterMode::Today => task.due_day() == Some(today),
        FilterMode::Upcoming => task.due_day().is_some_and(|due| due > today),
        // Strictly more than a week out, by calendar-day arithmetic.
        FilterMode::Later => task
            .due_day()
            .is_some_and(|due| due > today + Duration::days(7)),
        FilterMode::Overdue => task.due_day().is_some_and(|due| due < today),
        FilterMode::DueTomorrow => task.due_day() == Some(today + Duration::days(1)),
        FilterMode::DueThisWeek => {
            let (monday, sunday) = week_bounds(today);
            task.due_day().is_some_and(|due| due >= monday && due <= sunday)
        }
        FilterMode::DueNextWeek => {
            let (monday, sunday) = week_bounds(today);
            task.due_day()
                .is_some_and(|due| due >= monday + Duration::days(7) && due <= sunday + Duration::days(7))
        }
    }
}
