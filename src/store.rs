//! In-memory task collection.
//!
//! `TaskStore` never touches the disk. Callers persist through
//! [`crate::storage::JsonFile`] after each accepted mutation, which is what
//! [`crate::board::TodoBoard`] does.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{TodoError, TodoResult};
use crate::task::{Task, TaskFields, TaskId};

/// Source of creation and completion timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct TaskStore {
    tasks: Vec<Task>,
    clock: Box<dyn Clock>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::from_tasks(Vec::new())
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn create(&mut self, fields: TaskFields) -> TodoResult<Task> {
        let title = validated_title(&fields.title)?;
        let mut id = TaskId::new();
        while self.get(id).is_some() {
            id = TaskId::new();
        }
        let task = Task {
            id,
            title,
            description: fields.description.trim().to_string(),
            due_date: fields.due_date,
            priority: fields.priority.unwrap_or_default(),
            category: fields.category.unwrap_or_default(),
            completed: false,
            created_at: self.clock.now(),
            completed_at: None,
        };
        info!(id = %task.id, title = %task.title, "Created task");
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Overwrites the editable fields. Id, creation time and completion state
    /// are left alone.
    pub fn update(&mut self, id: TaskId, fields: TaskFields) -> TodoResult<Task> {
        let index = self.position(id)?;
        let title = validated_title(&fields.title)?;
        let task = &mut self.tasks[index];
        task.title = title;
        task.description = fields.description.trim().to_string();
        task.due_date = fields.due_date;
        task.priority = fields.priority.unwrap_or_default();
        task.category = fields.category.unwrap_or_default();
        info!(id = %id, "Updated task");
        Ok(task.clone())
    }

    pub fn toggle_complete(&mut self, id: TaskId) -> TodoResult<Task> {
        let index = self.position(id)?;
        let now = self.clock.now();
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(now);
        debug!(id = %id, completed = task.completed, "Toggled task");
        Ok(task.clone())
    }

    pub fn delete(&mut self, id: TaskId) -> TodoResult<Task> {
        let index = self.position(id)?;
        let removed = self.tasks.remove(index);
        info!(id = %id, "Deleted task");
        Ok(removed)
    }

    fn position(&self, id: TaskId) -> TodoResult<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(TodoError::NotFound { id })
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validated_title(title: &str) -> TodoResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TodoError::Validation {
            reason: "title must not be empty".to_string(),
        });
    }
    Ok(title.to_string())
}
