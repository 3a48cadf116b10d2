use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};

use crate::task::{Category, Priority, Task, TaskFields, TaskId};

/// Priority picked in the form. `Auto` derives it from the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityChoice {
    Auto,
    Fixed(Priority),
}

impl PriorityChoice {
    const CYCLE: [PriorityChoice; 4] = [
        PriorityChoice::Auto,
        PriorityChoice::Fixed(Priority::High),
        PriorityChoice::Fixed(Priority::Medium),
        PriorityChoice::Fixed(Priority::Low),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PriorityChoice::Auto => "Auto",
            PriorityChoice::Fixed(p) => p.as_str(),
        }
    }

    fn resolve(&self, due: Option<NaiveDate>, today: NaiveDate) -> Priority {
        match self {
            PriorityChoice::Auto => Priority::suggest_for_due(due, today),
            PriorityChoice::Fixed(p) => *p,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    Due,
    Priority,
    Category,
}

impl Field {
    const ORDER: [Field; 5] = [
        Field::Title,
        Field::Description,
        Field::Due,
        Field::Priority,
        Field::Category,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Due => "Due (YYYY-MM-DD)",
            Field::Priority => "Priority",
            Field::Category => "Category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub editing: Option<TaskId>,
    pub title: String,
    pub description: String,
    pub due: String,
    pub priority: PriorityChoice,
    pub category: Category,
    pub focus: Field,
}

impl TaskForm {
    pub fn create() -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            due: String::new(),
            priority: PriorityChoice::Fixed(Priority::Medium),
            category: Category::default(),
            focus: Field::Title,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            editing: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            due: task.due_date.map(|d| d.to_string()).unwrap_or_default(),
            priority: PriorityChoice::Fixed(task.priority),
            category: task.category,
            focus: Field::Title,
        }
    }

    pub fn heading(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit task"
        } else {
            "New task"
        }
    }

    /// Value shown for a field.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Due => &self.due,
            Field::Priority => self.priority.label(),
            Field::Category => self.category.as_str(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Left => self.cycle(-1),
            KeyCode::Right => self.cycle(1),
            KeyCode::Backspace => {
                if let Some(text) = self.text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(text) = self.text_mut() {
                    text.push(c);
                }
            }
            _ => {}
        }
        FormAction::Continue
    }

    /// Converts the form into store input, resolving `Auto` priority.
    pub fn to_fields(&self, today: NaiveDate) -> Result<TaskFields, String> {
        let due = self.due.trim();
        let due_date = if due.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(due, "%Y-%m-%d")
                    .map_err(|_| format!("'{due}' is not a date (YYYY-MM-DD)"))?,
            )
        };
        Ok(TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date,
            priority: Some(self.priority.resolve(due_date, today)),
            category: Some(self.category),
        })
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Title => Some(&mut self.title),
            Field::Description => Some(&mut self.description),
            Field::Due => Some(&mut self.due),
            Field::Priority | Field::Category => None,
        }
    }

    fn move_focus(&mut self, step: isize) {
        self.focus = step_through(&Field::ORDER, self.focus, step);
    }

    fn cycle(&mut self, step: isize) {
        match self.focus {
            Field::Priority => {
                self.priority = step_through(&PriorityChoice::CYCLE, self.priority, step)
            }
            Field::Category => self.category = step_through(&Category::ALL, self.category, step),
            _ => {}
        }
    }
}

fn step_through<T: Copy + PartialEq>(items: &[T], current: T, step: isize) -> T {
    let len = items.len() as isize;
    let index = items.iter().position(|x| *x == current).unwrap_or(0) as isize;
    items[(index + step).rem_euclid(len) as usize]
}
