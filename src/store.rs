use crate::model::{DETAILS_PLACEHOLDER, NewTaskInput, Status, Task};
use crate::storage::SnapshotFile;
use chrono::Utc;

/// Canonical owner of the task collection.
///
/// Constructed once at startup and passed by handle; everything else sees
/// read-only views or goes through the operations below. Each successful
/// mutation writes the whole collection back to the snapshot file.
pub struct TaskStore {
    tasks: Vec<Task>,
    snapshot: SnapshotFile,
    write_warning: Option<String>,
}

impl TaskStore {
    pub fn open(snapshot: SnapshotFile) -> Self {
        let tasks = snapshot.load();
        Self {
            tasks,
            snapshot,
            write_warning: None,
        }
    }

    /// Insertion-ordered, read-only view of the collection.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Creates a task with a fresh id and Pending status. Returns None
    /// without touching the collection when title or due date is empty.
    pub fn add(&mut self, input: NewTaskInput) -> Option<Task> {
        if input.title.is_empty() || input.due_date.is_empty() {
            return None;
        }

        let task = Task {
            id: self.fresh_id(Utc::now().timestamp_millis()),
            title: input.title,
            status: Status::Pending,
            due_date: input.due_date,
            details: if input.details.is_empty() {
                DETAILS_PLACEHOLDER.to_string()
            } else {
                input.details
            },
            priority: input.priority,
        };
        self.tasks.push(task.clone());
        self.persist();
        Some(task)
    }

    /// Replaces the task with the matching id in place; silent no-op when
    /// the id is gone (e.g. deleted from another view).
    pub fn update(&mut self, updated: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
            *slot = updated;
            self.persist();
        }
    }

    pub fn remove(&mut self, id: i64) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            self.persist();
        }
    }

    /// The mark-done action: Completed goes back to Pending, anything else
    /// (including the legacy In Progress) becomes Completed.
    pub fn toggle_status(&mut self, id: i64) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.status = match task.status {
                Status::Completed => Status::Pending,
                _ => Status::Completed,
            };
            self.persist();
        }
    }

    /// Creation-timestamp id (Unix milliseconds), bumped past collisions so
    /// two tasks created in the same millisecond stay distinct.
    fn fresh_id(&self, seed: i64) -> i64 {
        let mut id = seed;
        while self.tasks.iter().any(|t| t.id == id) {
            id += 1;
        }
        id
    }

    fn persist(&mut self) {
        // A failed write never rolls back the in-memory mutation; the
        // warning surfaces in the status line instead of an error path.
        if let Err(err) = self.snapshot.save(&self.tasks) {
            self.write_warning = Some(format!("Could not save tasks: {}", err));
        }
    }

    pub fn take_write_warning(&mut self) -> Option<String> {
        self.write_warning.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn open_store(dir: &tempfile::TempDir) -> TaskStore {
        TaskStore::open(SnapshotFile::at(dir.path().join("tasks.json")))
    }

    fn input(title: &str, due: &str) -> NewTaskInput {
        NewTaskInput {
            title: title.to_string(),
            due_date: due.to_string(),
            details: String::new(),
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_add_assigns_defaults_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        let task = store.add(input("Buy milk", "2025-06-01")).unwrap();
        assert_eq!(task.status, Status::Pending);
        assert_eq!(task.details, DETAILS_PLACEHOLDER);
        assert_eq!(store.tasks().len(), 1);

        // A fresh store over the same file sees the write-through.
        let reopened = open_store(&dir);
        assert_eq!(reopened.tasks(), store.tasks());
    }

    #[test]
    fn test_add_rejects_empty_title_and_due_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        assert!(store.add(input("", "2025-06-01")).is_none());
        assert!(store.add(input("Buy milk", "")).is_none());
        assert!(store.tasks().is_empty());

        // No id was consumed; nothing reached the disk either.
        let reopened = open_store(&dir);
        assert!(reopened.tasks().is_empty());
    }

    #[test]
    fn test_ids_unique_within_one_millisecond() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        let a = store.add(input("a", "2025-06-01")).unwrap();
        let b = store.add(input("b", "2025-06-01")).unwrap();
        let c = store.add(input("c", "2025-06-01")).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_remove_deletes_exactly_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        let a = store.add(input("a", "2025-06-01")).unwrap();
        let b = store.add(input("b", "2025-06-02")).unwrap();
        let c = store.add(input("c", "2025-06-03")).unwrap();

        store.remove(b.id);
        assert_eq!(store.tasks().len(), 2);
        assert_eq!(store.tasks()[0], a);
        assert_eq!(store.tasks()[1], c);

        // Removing an unknown id is a silent no-op.
        store.remove(b.id);
        assert_eq!(store.tasks().len(), 2);
    }

    #[test]
    fn test_toggle_status_is_its_own_inverse() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        let task = store.add(input("a", "2025-06-01")).unwrap();

        store.toggle_status(task.id);
        assert_eq!(store.get(task.id).unwrap().status, Status::Completed);

        store.toggle_status(task.id);
        assert_eq!(store.get(task.id).unwrap().status, Status::Pending);

        store.toggle_status(9999);
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_toggle_collapses_legacy_in_progress_to_completed() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        let mut task = store.add(input("a", "2025-06-01")).unwrap();
        task.status = Status::InProgress;
        store.update(task.clone());

        store.toggle_status(task.id);
        assert_eq!(store.get(task.id).unwrap().status, Status::Completed);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_store(&dir);

        let a = store.add(input("a", "2025-06-01")).unwrap();
        let b = store.add(input("b", "2025-06-02")).unwrap();

        let mut edited = a.clone();
        edited.title = "a (edited)".to_string();
        edited.priority = Priority::High;
        store.update(edited.clone());

        // Position preserved, neighbor untouched.
        assert_eq!(store.tasks()[0], edited);
        assert_eq!(store.tasks()[1], b);

        // Updating a removed id does nothing.
        store.remove(b.id);
        store.update(b);
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_write_failure_keeps_memory_authoritative() {
        let dir = tempfile::tempdir().unwrap();
        // Point the snapshot at a directory so every save fails.
        let mut store = TaskStore::open(SnapshotFile::at(dir.path().to_path_buf()));

        let task = store.add(input("a", "2025-06-01")).unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.get(task.id).unwrap().title, "a");

        let warning = store.take_write_warning();
        assert!(warning.is_some());
        assert!(store.take_write_warning().is_none());
    }
}
