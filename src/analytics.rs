//! Progress and completion statistics over a task collection.

use std::collections::BTreeMap;

use crate::task::{Category, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
}

impl Progress {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.completed).count(),
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub progress: Progress,
    pub weekly: BTreeMap<String, usize>,
    pub categories: BTreeMap<Category, usize>,
    pub average_completion_hours: Option<f64>,
}

impl Summary {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            progress: Progress::of(tasks),
            weekly: completions_per_week(tasks),
            categories: category_counts(tasks),
            average_completion_hours: average_completion_hours(tasks),
        }
    }
}

/// Completed tasks keyed by ISO week of completion, e.g. `2024-W19`.
pub fn completions_per_week(tasks: &[Task]) -> BTreeMap<String, usize> {
    let mut weeks = BTreeMap::new();
    for completed_at in tasks.iter().filter_map(|t| t.completed_at) {
        *weeks
            .entry(completed_at.format("%G-W%V").to_string())
            .or_insert(0) += 1;
    }
    weeks
}

pub fn category_counts(tasks: &[Task]) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        *counts.entry(task.category).or_insert(0) += 1;
    }
    counts
}

pub fn average_completion_hours(tasks: &[Task]) -> Option<f64> {
    let hours: Vec<f64> = tasks
        .iter()
        .filter_map(|t| t.completed_at.map(|done| done - t.created_at))
        .map(|elapsed| elapsed.num_seconds() as f64 / 3600.0)
        .collect();
    if hours.is_empty() {
        return None;
    }
    Some(hours.iter().sum::<f64>() / hours.len() as f64)
}
