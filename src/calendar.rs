use chrono::NaiveDate;

use crate::model::{Priority, Status, Task, date_part};

pub const COLOR_HIGH: &str = "#ff5252";
pub const COLOR_MEDIUM: &str = "#ffa500";
pub const COLOR_LOW: &str = "#4caf50";
pub const COLOR_DONE: &str = "#4caf50";

const TEXT_LIGHT: &str = "#ffffff";
const TEXT_DARK: &str = "#000000";

/// Task metadata carried on a calendar event so a selected event can be
/// turned back into a task-shaped record for the detail popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMeta {
    pub id: i64,
    pub title: String,
    pub details: String,
    pub priority: Priority,
    pub status: Status,
}

/// Read-only display projection of a task: decorated title, start instant
/// (the raw due date), a hex color pair, and the carried metadata. Never a
/// second source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub title: String,
    pub start: String,
    pub background: &'static str,
    pub text_color: &'static str,
    pub meta: EventMeta,
}

impl CalendarEvent {
    /// The calendar day this event sits on.
    pub fn start_day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date_part(&self.start), "%Y-%m-%d").ok()
    }

    /// Reverse mapping for the detail view. Uses the undecorated title from
    /// the metadata, not the display title.
    pub fn to_task(&self) -> Task {
        Task {
            id: self.meta.id,
            title: self.meta.title.clone(),
            status: self.meta.status,
            due_date: self.start.clone(),
            details: self.meta.details.clone(),
            priority: self.meta.priority,
        }
    }
}

pub fn to_events(tasks: &[Task]) -> Vec<CalendarEvent> {
    tasks.iter().map(to_event).collect()
}

fn to_event(task: &Task) -> CalendarEvent {
    let check = if task.status.is_completed() { "✔ " } else { "" };
    let title = format!("{}{} ({})", check, task.title, task.priority.label());

    // Completed wins over priority; otherwise the priority picks the pair.
    let (background, text_color) = if task.status.is_completed() {
        (COLOR_DONE, TEXT_LIGHT)
    } else {
        match task.priority {
            Priority::High => (COLOR_HIGH, TEXT_LIGHT),
            Priority::Medium => (COLOR_MEDIUM, TEXT_DARK),
            Priority::Low => (COLOR_LOW, TEXT_LIGHT),
        }
    };

    CalendarEvent {
        title,
        start: task.due_date.clone(),
        background,
        text_color,
        meta: EventMeta {
            id: task.id,
            title: task.title.clone(),
            details: task.details.clone(),
            priority: task.priority,
            status: task.status,
        },
    }
}
