use chrono::NaiveDate;

use crate::filter::week_bounds;
use crate::model::{Task, date_part};

/// One point of the tasks-per-day chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCount {
    pub date: String,
    pub count: usize,
}

/// Percentage of completed tasks, 0.0 for an empty collection.
pub fn overall_progress(tasks: &[Task]) -> f64 {
    completion_ratio(tasks.iter())
}

/// Completion percentage over the tasks due today.
pub fn today_progress(tasks: &[Task], today: NaiveDate) -> f64 {
    completion_ratio(tasks.iter().filter(|t| t.due_day() == Some(today)))
}

/// Completion percentage over the tasks due in the current Monday..Sunday
/// week.
pub fn this_week_progress(tasks: &[Task], today: NaiveDate) -> f64 {
    let (monday, sunday) = week_bounds(today);
    completion_ratio(
        tasks
            .iter()
            .filter(|t| t.due_day().is_some_and(|due| due >= monday && due <= sunday)),
    )
}

fn completion_ratio<'a>(tasks: impl Iterator<Item = &'a Task>) -> f64 {
    let mut total = 0usize;
    let mut completed = 0usize;
    for task in tasks {
        total += 1;
        if task.status.is_completed() {
            completed += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

/// Buckets tasks by the date portion of their due date, in first-seen order.
/// The chart plots these points as-is; nothing re-sorts them.
pub fn tasks_per_day(tasks: &[Task]) -> Vec<DayCount> {
    let mut buckets: Vec<DayCount> = Vec::new();
    for task in tasks {
        let date = date_part(&task.due_date);
        match buckets.iter_mut().find(|b| b.date == date) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(DayCount {
                date: date.to_string(),
                count: 1,
            }),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DETAILS_PLACEHOLDER, Priority, Status};

    fn task(id: i64, due: &str, status: Status) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            status,
            due_date: due.to_string(),
            details: DETAILS_PLACEHOLDER.to_string(),
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_overall_progress_edges() {
        assert_eq!(overall_progress(&[]), 0.0);
        assert_eq!(
            overall_progress(&[task(1, "2025-01-01", Status::Completed)]),
            100.0
        );
        assert_eq!(
            overall_progress(&[
                task(1, "2025-01-01", Status::Completed),
                task(2, "2025-01-02", Status::Pending),
                task(3, "2025-01-03", Status::InProgress),
                task(4, "2025-01-04", Status::Completed),
            ]),
            50.0
        );
    }

    #[test]
    fn test_today_progress_scenario() {
        let tasks = vec![
            task(1, "2025-01-01", Status::Pending),
            task(2, "2025-01-01", Status::Completed),
        ];
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(today_progress(&tasks, day), 50.0);

        // Nothing due on another day: zero, not a division by zero.
        let other = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(today_progress(&tasks, other), 0.0);
    }

    #[test]
    fn test_this_week_progress_restricts_to_window() {
        // Week of Wed 2025-06-11 runs 06-09 to 06-15.
        let day = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let tasks = vec![
            task(1, "2025-06-09", Status::Completed),
            task(2, "2025-06-15", Status::Pending),
            task(3, "2025-06-16", Status::Completed), // next week, ignored
        ];
        assert_eq!(this_week_progress(&tasks, day), 50.0);
        assert_eq!(this_week_progress(&[], day), 0.0);
    }

    #[test]
    fn test_tasks_per_day_single_bucket() {
        let tasks = vec![
            task(1, "2025-01-01", Status::Pending),
            task(2, "2025-01-01T09:00", Status::Completed),
            task(3, "2025-01-01", Status::Pending),
        ];
        let buckets = tasks_per_day(&tasks);
        assert_eq!(
            buckets,
            vec![DayCount {
                date: "2025-01-01".to_string(),
                count: 3,
            }]
        );
    }

    #[test]
    fn test_tasks_per_day_first_seen_order() {
        let tasks = vec![
            task(1, "2025-03-05", Status::Pending),
            task(2, "2025-03-01", Status::Pending),
            task(3, "2025-03-05", Status::Pending),
            task(4, "2025-03-02", Status::Pending),
        ];
        let buckets = tasks_per_day(&tasks);
        let dates: Vec<&str> = buckets.iter().map(|b| b.date.as_str()).collect();
        // First-seen order, not calendar order.
        assert_eq!(dates, vec!["2025-03-05", "2025-03-01", "2025-03-02"]);
        assert_eq!(buckets[0].count, 2);
    }
}
