//! Filter engine: picks the visible tasks for a set of criteria.

use crate::task::{Category, Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Completed => "Completed",
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn next(self) -> Self {
        let all = Priority::ALL;
        match self {
            PriorityFilter::All => PriorityFilter::Only(all[0]),
            PriorityFilter::Only(p) => match all.iter().position(|x| *x == p) {
                Some(i) if i + 1 < all.len() => PriorityFilter::Only(all[i + 1]),
                _ => PriorityFilter::All,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityFilter::All => "All",
            PriorityFilter::Only(p) => p.as_str(),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(p) => task.priority == *p,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn next(self) -> Self {
        let all = Category::ALL;
        match self {
            CategoryFilter::All => CategoryFilter::Only(all[0]),
            CategoryFilter::Only(c) => match all.iter().position(|x| *x == c) {
                Some(i) if i + 1 < all.len() => CategoryFilter::Only(all[i + 1]),
                _ => CategoryFilter::All,
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.as_str(),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => task.category == *c,
        }
    }
}

/// Active filters. The default value lets every task through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub category: CategoryFilter,
}

impl FilterCriteria {
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.status.matches(task)
            && self.priority.matches(task)
            && self.category.matches(task)
    }

    pub fn is_identity(&self) -> bool {
        self.search_text.is_empty()
            && self.status == StatusFilter::All
            && self.priority == PriorityFilter::All
            && self.category == CategoryFilter::All
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let haystack = format!("{}{}", task.title, task.description).to_lowercase();
        haystack.contains(&self.search_text.to_lowercase())
    }
}

/// Matching tasks in their original order.
pub fn apply(tasks: &[Task], criteria: &FilterCriteria) -> Vec<Task> {
    apply_refs(tasks, criteria).into_iter().cloned().collect()
}

pub fn apply_refs<'a>(tasks: &'a [Task], criteria: &FilterCriteria) -> Vec<&'a Task> {
    tasks.iter().filter(|t| criteria.matches(t)).collect()
}
