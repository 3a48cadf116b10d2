use std::path::Path;

use tracing::warn;

use crate::analytics::Summary;
use crate::config::Config;
use crate::errors::TodoResult;
use crate::export::{self, ExportFormat};
use crate::filter::{self, FilterCriteria};
use crate::storage::JsonFile;
use crate::store::TaskStore;
use crate::task::{Task, TaskFields, TaskId};

/// The task list as the interface sees it: every accepted change is written
/// to the backing file before the call returns.
///
/// A failed store operation changes nothing. A failed save keeps the change
/// in memory and marks the board dirty until a later save succeeds.
pub struct TodoBoard {
    store: TaskStore,
    file: JsonFile,
    dirty: bool,
}

impl TodoBoard {
    pub fn open(config: &Config) -> TodoResult<Self> {
        let file = JsonFile::new(&config.data_path).on_corrupt(config.on_corrupt);
        let tasks = file.load()?;
        Ok(Self::with_store(TaskStore::from_tasks(tasks), file))
    }

    pub fn with_store(store: TaskStore, file: JsonFile) -> Self {
        Self {
            store,
            file,
            dirty: false,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn add(&mut self, fields: TaskFields) -> TodoResult<Task> {
        let task = self.store.create(fields)?;
        self.save()?;
        Ok(task)
    }

    pub fn edit(&mut self, id: TaskId, fields: TaskFields) -> TodoResult<Task> {
        let task = self.store.update(id, fields)?;
        self.save()?;
        Ok(task)
    }

    pub fn toggle(&mut self, id: TaskId) -> TodoResult<Task> {
        let task = self.store.toggle_complete(id)?;
        self.save()?;
        Ok(task)
    }

    pub fn remove(&mut self, id: TaskId) -> TodoResult<Task> {
        let task = self.store.delete(id)?;
        self.save()?;
        Ok(task)
    }

    pub fn save(&mut self) -> TodoResult<()> {
        self.dirty = true;
        if let Err(err) = self.file.save(self.store.tasks()) {
            warn!(error = %err, "Changes are not yet saved");
            return Err(err);
        }
        self.dirty = false;
        Ok(())
    }

    pub fn visible(&self, criteria: &FilterCriteria) -> Vec<&Task> {
        filter::apply_refs(self.store.tasks(), criteria)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(self.store.tasks())
    }

    pub fn export(&self, path: &Path, format: ExportFormat) -> TodoResult<()> {
        export::write(self.store.tasks(), path, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TodoError;
    use crate::filter::StatusFilter;
    use tempfile::TempDir;

    fn board(dir: &TempDir) -> TodoBoard {
        TodoBoard::open(&Config::new(dir.path().join("todos.json"))).unwrap()
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let dir = TempDir::new().unwrap();
        let mut board = board(&dir);

        let milk = board.add(TaskFields::titled("Buy milk")).unwrap();
        let bread = board.add(TaskFields::titled("Buy bread")).unwrap();
        board.toggle(milk.id).unwrap();
        board.edit(bread.id, TaskFields::titled("Buy rye bread")).unwrap();

        let reopened = self::board(&dir);
        assert_eq!(reopened.tasks(), board.tasks());

        board.remove(milk.id).unwrap();
        let reopened = self::board(&dir);
        assert_eq!(reopened.tasks().len(), 1);
        assert_eq!(reopened.tasks()[0].title, "Buy rye bread");
    }

    #[test]
    fn test_rejected_mutation_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut board = board(&dir);

        assert!(matches!(
            board.add(TaskFields::titled("")),
            Err(TodoError::Validation { .. })
        ));
        assert!(!board.path().exists());
    }

    #[test]
    fn test_failed_save_keeps_change_and_marks_dirty() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut board = TodoBoard::with_store(TaskStore::new(), JsonFile::new(blocker.join("todos.json")));

        let err = board.add(TaskFields::titled("Unsaved")).unwrap_err();

        assert!(matches!(err, TodoError::Persistence { .. }));
        assert!(board.is_dirty());
        assert_eq!(board.tasks().len(), 1);

        std::fs::remove_file(&blocker).unwrap();
        board.save().unwrap();
        assert!(!board.is_dirty());
    }

    #[test]
    fn test_visible_follows_latest_mutation() {
        let dir = TempDir::new().unwrap();
        let mut board = board(&dir);
        let task = board.add(TaskFields::titled("Read a chapter")).unwrap();
        let active = FilterCriteria {
            status: StatusFilter::Active,
            ..Default::default()
        };

        assert_eq!(board.visible(&active).len(), 1);
        board.toggle(task.id).unwrap();
        assert!(board.visible(&active).is_empty());
        assert_eq!(board.summary().progress.completed, 1);
    }
}
