use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Shown (and stored) when a task is created without details.
pub const DETAILS_PLACEHOLDER: &str = "No details for this task.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    // Legacy seed value. Loadable and displayable, but no UI action sets it.
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Completed,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Status::Completed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    pub fn cycle(&self) -> Priority {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }
}

/// One to-do item, serde-mapped to the snapshot schema
/// `{id, title, status, dueDate, details, priority}`.
///
/// `due_date` keeps the raw ISO-8601 string: older snapshots store a bare
/// date, newer ones a date-time, and the snapshot must round-trip either
/// form unchanged. Date views are derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub status: Status,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    #[serde(default = "default_details")]
    pub details: String,
    #[serde(default)]
    pub priority: Priority,
}

fn default_details() -> String {
    DETAILS_PLACEHOLDER.to_string()
}

impl Task {
    /// The calendar day this task is due, if the stored string parses.
    pub fn due_day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date_part(&self.due_date), "%Y-%m-%d").ok()
    }

    /// Full due instant. Falls back to the start of the due day when the
    /// snapshot only carries a date.
    pub fn due_instant(&self) -> Option<NaiveDateTime> {
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&self.due_date, fmt) {
                return Some(dt);
            }
        }
        self.due_day().and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

/// The date portion of a raw due-date string (text before any `T`).
pub fn date_part(raw: &str) -> &str {
    raw.split('T').next().unwrap_or(raw)
}

/// Creation payload handed to the store by the add/edit dialogs.
#[derive(Debug, Clone, Default)]
pub struct NewTaskInput {
    pub title: String,
    pub due_date: String,
    pub details: String,
    pub priority: Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_day_with_and_without_time() {
        let mut t = Task {
            id: 1,
            title: "x".into(),
            status: Status::Pending,
            due_date: "2025-01-02".into(),
            details: DETAILS_PLACEHOLDER.into(),
            priority: Priority::Medium,
        };
        assert_eq!(t.due_day(), NaiveDate::from_ymd_opt(2025, 1, 2));

        t.due_date = "2025-01-02T13:30".into();
        assert_eq!(t.due_day(), NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(
            t.due_instant().map(|dt| dt.format("%H:%M").to_string()),
            Some("13:30".to_string())
        );

        t.due_date = "not a date".into();
        assert_eq!(t.due_day(), None);
        assert_eq!(t.due_instant(), None);
    }

    #[test]
    fn test_snapshot_schema_field_names() {
        let t = Task {
            id: 42,
            title: "Write report".into(),
            status: Status::InProgress,
            due_date: "2025-03-04T09:00".into(),
            details: "draft first".into(),
            priority: Priority::High,
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["dueDate"], "2025-03-04T09:00");
        assert_eq!(json["status"], "In Progress");
        assert_eq!(json["priority"], "High");

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_load_defaults_missing_fields() {
        // Older snapshot revisions lack priority/details (and sometimes
        // status); those records must still load.
        let raw = r#"{"id": 7, "title": "Old", "dueDate": "2024-12-31"}"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.status, Status::Pending);
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.details, DETAILS_PLACEHOLDER);
    }

    #[test]
    fn test_in_progress_spelling_variants() {
        let spaced: Task =
            serde_json::from_str(r#"{"id":1,"title":"a","status":"In Progress","dueDate":"d"}"#)
                .unwrap();
        let squashed: Task =
            serde_json::from_str(r#"{"id":1,"title":"a","status":"InProgress","dueDate":"d"}"#)
                .unwrap();
        assert_eq!(spaced.status, Status::InProgress);
        assert_eq!(squashed.status, Status::InProgress);
        assert!(!spaced.status.is_completed());
    }
}
