// File: src/storage.rs
use crate::model::Task;
use anyhow::Result;
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths::AppPaths;

/// The single on-disk snapshot slot: a JSON array of tasks, read once at
/// startup and rewritten in full after every store mutation.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::at(AppPaths::get_snapshot_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Helper to get a sidecar lock file path (e.g., "tasks.json.lock")
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Execute a closure while holding an exclusive lock on the sidecar file.
    fn with_lock<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(&self.path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: write to a .tmp file then rename over the target.
    fn atomic_write<C: AsRef<[u8]>>(path: &Path, contents: C) -> Result<()> {
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        self.with_lock(|| {
            let json = serde_json::to_string_pretty(tasks)?;
            Self::atomic_write(&self.path, json)?;
            Ok(())
        })
    }

    /// Fail-soft load: an absent or malformed snapshot yields an empty
    /// collection. Startup must never fail on bad persisted state.
    pub fn load(&self) -> Vec<Task> {
        self.try_load().unwrap_or_default()
    }

    fn try_load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        self.with_lock(|| {
            let json = fs::read_to_string(&self.path)?;
            let tasks = serde_json::from_str::<Vec<Task>>(&json)?;
            Ok(tasks)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status};

    fn snapshot_in(dir: &Path) -> SnapshotFile {
        SnapshotFile::at(dir.join("tasks.json"))
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task {
                id: 1700000000000,
                title: "Water plants".into(),
                status: Status::Pending,
                due_date: "2025-01-01".into(),
                details: "balcony first".into(),
                priority: Priority::Low,
            },
            Task {
                id: 1700000000001,
                title: "File taxes".into(),
                status: Status::Completed,
                due_date: "2025-04-15T09:00".into(),
                details: crate::model::DETAILS_PLACEHOLDER.into(),
                priority: Priority::High,
            },
        ]
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_in(dir.path());

        let tasks = sample_tasks();
        snapshot.save(&tasks).unwrap();
        assert_eq!(snapshot.load(), tasks);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_in(dir.path());
        assert!(snapshot.load().is_empty());
    }

    #[test]
    fn test_malformed_snapshot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_in(dir.path());
        fs::write(snapshot.path(), "{ this is not json").unwrap();
        assert!(snapshot.load().is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = snapshot_in(dir.path());

        let mut tasks = sample_tasks();
        snapshot.save(&tasks).unwrap();

        tasks.pop();
        snapshot.save(&tasks).unwrap();
        assert_eq!(snapshot.load().len(), 1);

        // Persisting down to empty is a real state, not a skipped write.
        snapshot.save(&[]).unwrap();
        assert!(snapshot.load().is_empty());
    }
}
