//! JSON backing file.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};

use crate::errors::{TodoError, TodoResult};
use crate::task::Task;

/// What `load` does with a file that exists but cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OnCorrupt {
    /// Report `CorruptStore` and leave the file alone.
    #[default]
    Fail,
    /// Move the file aside to `<file>.corrupt-<timestamp>` and start empty.
    Reset,
}

#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    on_corrupt: OnCorrupt,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            on_corrupt: OnCorrupt::Fail,
        }
    }

    pub fn on_corrupt(mut self, policy: OnCorrupt) -> Self {
        self.on_corrupt = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> TodoResult<Vec<Task>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No task file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(TodoError::persistence(&self.path, e)),
        };
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match parse_tasks(&content) {
            Ok(tasks) => {
                debug!(path = %self.path.display(), count = tasks.len(), "Loaded tasks");
                Ok(tasks)
            }
            Err(reason) => match self.on_corrupt {
                OnCorrupt::Fail => Err(TodoError::corrupt(&self.path, reason)),
                OnCorrupt::Reset => {
                    let aside = corrupt_aside(&self.path);
                    fs::rename(&self.path, &aside)
                        .map_err(|e| TodoError::persistence(&self.path, e))?;
                    warn!(
                        path = %self.path.display(),
                        moved_to = %aside.display(),
                        %reason,
                        "Task file was corrupt, starting empty"
                    );
                    Ok(Vec::new())
                }
            },
        }
    }

    pub fn save(&self, tasks: &[Task]) -> TodoResult<()> {
        let mut content = serde_json::to_string_pretty(tasks)
            .map_err(|e| TodoError::persistence(&self.path, io::Error::other(e)))?;
        content.push('\n');
        write_atomic(&self.path, content.as_bytes())?;
        debug!(path = %self.path.display(), count = tasks.len(), "Saved tasks");
        Ok(())
    }
}

fn parse_tasks(content: &[u8]) -> Result<Vec<Task>, String> {
    let tasks: Vec<Task> = serde_json::from_slice(content).map_err(|e| e.to_string())?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id) {
            return Err(format!("duplicate task id {}", task.id));
        }
        if task.title.trim().is_empty() {
            return Err(format!("task {} has an empty title", task.id));
        }
    }
    Ok(tasks)
}

/// Writes `bytes` to a temporary sibling and renames it over `path`, so a
/// crash mid-write never leaves a truncated file behind.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> TodoResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TodoError::persistence(path, e))?;
    }
    let temp_path = sibling(path, "tmp");
    let result = (|| -> io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(TodoError::persistence(path, e));
    }
    Ok(())
}

/// `<file>.corrupt-<UTC timestamp>`, with a counter appended if that name is
/// already taken.
fn corrupt_aside(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("corrupt-%Y%m%dT%H%M%S").to_string();
    let mut aside = sibling(path, &stamp);
    let mut n = 1;
    while aside.exists() {
        aside = sibling(path, &format!("{stamp}-{n}"));
        n += 1;
    }
    aside
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use crate::task::{Category, Priority, TaskFields};
    use tempfile::TempDir;

    fn sample_tasks() -> Vec<Task> {
        let mut store = TaskStore::new();
        store
            .create(TaskFields::titled("Buy milk").with_priority(Priority::Medium))
            .unwrap();
        let report = store
            .create(
                TaskFields::titled("Send report")
                    .with_description("to finance")
                    .with_due_date(chrono::NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
                    .with_priority(Priority::High)
                    .with_category(Category::Work),
            )
            .unwrap();
        store.toggle_complete(report.id).unwrap();
        store.into_tasks()
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("todos.json"));
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_blank_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(&path, "  \n").unwrap();
        assert!(JsonFile::new(&path).load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("nested/data/todos.json"));
        let tasks = sample_tasks();

        file.save(&tasks).unwrap();

        assert_eq!(file.load().unwrap(), tasks);
        assert!(!sibling(file.path(), "tmp").exists());
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("todos.json"));
        let tasks = sample_tasks();

        file.save(&tasks).unwrap();
        file.save(&tasks[..1]).unwrap();

        assert_eq!(file.load().unwrap(), tasks[..1].to_vec());
    }

    #[test]
    fn test_malformed_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFile::new(&path).load().unwrap_err();

        assert!(matches!(err, TodoError::CorruptStore { .. }));
        assert!(path.exists());
    }

    #[test]
    fn test_wrong_field_types_are_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(
            &path,
            r#"[{"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "title": 7, "created_at": "2024-05-10T08:00:00Z"}]"#,
        )
        .unwrap();

        let err = JsonFile::new(&path).load().unwrap_err();
        assert!(matches!(err, TodoError::CorruptStore { .. }));
    }

    #[test]
    fn test_duplicate_ids_are_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        let mut tasks = sample_tasks();
        tasks[1].id = tasks[0].id;
        fs::write(&path, serde_json::to_string(&tasks).unwrap()).unwrap();

        let err = JsonFile::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("duplicate task id"));
    }

    #[test]
    fn test_reset_policy_moves_corrupt_file_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let file = JsonFile::new(&path).on_corrupt(OnCorrupt::Reset);

        assert!(file.load().unwrap().is_empty());
        assert!(!path.exists());
        assert_eq!(corrupt_copies(&dir), ["[1, 2, 3]"]);
    }

    #[test]
    fn test_repeated_resets_keep_every_corrupt_copy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        let file = JsonFile::new(&path).on_corrupt(OnCorrupt::Reset);

        fs::write(&path, "first garbage").unwrap();
        assert!(file.load().unwrap().is_empty());
        fs::write(&path, "second garbage").unwrap();
        assert!(file.load().unwrap().is_empty());

        assert_eq!(corrupt_copies(&dir), ["first garbage", "second garbage"]);
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(&path, [0xff_u8, 0xfe]).unwrap();

        let err = JsonFile::new(&path).load().unwrap_err();
        assert!(matches!(err, TodoError::CorruptStore { .. }));

        let file = JsonFile::new(&path).on_corrupt(OnCorrupt::Reset);
        assert!(file.load().unwrap().is_empty());
        assert_eq!(corrupt_copies(&dir).len(), 1);
    }

    #[test]
    fn test_failed_save_leaves_previous_file_intact() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("todos.json"));
        let tasks = sample_tasks();
        file.save(&tasks).unwrap();

        fs::create_dir(sibling(file.path(), "tmp")).unwrap();
        let err = file.save(&tasks[..1]).unwrap_err();

        assert!(matches!(err, TodoError::Persistence { .. }));
        assert_eq!(file.load().unwrap(), tasks);
    }

    /// Contents of the moved-aside corrupt files, sorted.
    fn corrupt_copies(dir: &TempDir) -> Vec<String> {
        let mut copies: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("todos.json.corrupt"))
            .map(|e| fs::read_to_string(e.path()).unwrap())
            .collect();
        copies.sort();
        copies
    }

    #[test]
    fn test_save_into_unwritable_location_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = JsonFile::new(blocker.join("todos.json"))
            .save(&sample_tasks())
            .unwrap_err();

        assert!(matches!(err, TodoError::Persistence { .. }));
    }
}
