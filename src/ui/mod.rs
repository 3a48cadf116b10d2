//! Terminal interface: key handling on [`App`] and the draw loop.

mod form;
mod render;

pub use form::{Field, FormAction, PriorityChoice, TaskForm};

use std::io;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::board::TodoBoard;
use crate::config::Config;
use crate::errors::TodoResult;
use crate::export::ExportFormat;
use crate::filter::FilterCriteria;
use crate::quick_add;
use crate::task::{Task, TaskId};

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    Search,
    QuickAdd(String),
    Form(TaskForm),
    ConfirmDelete(TaskId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

pub struct App {
    pub board: TodoBoard,
    pub config: Config,
    pub criteria: FilterCriteria,
    pub selected: usize,
    pub mode: Mode,
    pub status: Option<StatusLine>,
    pub should_quit: bool,
}

impl App {
    pub fn new(board: TodoBoard, config: Config) -> Self {
        Self {
            board,
            config,
            criteria: FilterCriteria::default(),
            selected: 0,
            mode: Mode::Browse,
            status: None,
            should_quit: false,
        }
    }

    pub fn visible(&self) -> Vec<&Task> {
        self.board.visible(&self.criteria)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.visible().get(self.selected).copied()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.handle_key_on(key, Local::now().date_naive());
    }

    /// Same as [`App::handle_key`] with an explicit "today" for due dates.
    pub fn handle_key_on(&mut self, key: KeyEvent, today: NaiveDate) {
        let mode = std::mem::replace(&mut self.mode, Mode::Browse);
        self.mode = match mode {
            Mode::Browse => self.browse_key(key),
            Mode::Search => self.search_key(key),
            Mode::QuickAdd(text) => self.quick_add_key(key, text, today),
            Mode::Form(form) => self.form_key(key, form, today),
            Mode::ConfirmDelete(id) => self.confirm_delete_key(key, id),
        };
        self.clamp_selection();
    }

    fn browse_key(&mut self, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => {
                self.status = None;
                return Mode::Form(TaskForm::create());
            }
            KeyCode::Char('n') => {
                self.status = None;
                return Mode::QuickAdd(String::new());
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task() {
                    return Mode::Form(TaskForm::edit(task));
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    return Mode::ConfirmDelete(task.id);
                }
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_task().map(|t| t.id) {
                    let result = self.board.toggle(id).map(|task| {
                        if task.completed {
                            format!("Completed '{}'", task.title)
                        } else {
                            format!("Reopened '{}'", task.title)
                        }
                    });
                    self.report(result);
                }
            }
            KeyCode::Char('/') => return Mode::Search,
            KeyCode::Char('s') => self.criteria.status = self.criteria.status.next(),
            KeyCode::Char('p') => self.criteria.priority = self.criteria.priority.next(),
            KeyCode::Char('c') => self.criteria.category = self.criteria.category.next(),
            KeyCode::Char('x') => self.export_csv(),
            KeyCode::Char('w') => {
                let result = self.board.save().map(|()| "Saved".to_string());
                self.report(result);
            }
            KeyCode::Down | KeyCode::Char('j') => self.selected = self.selected.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            _ => {}
        }
        Mode::Browse
    }

    fn search_key(&mut self, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Enter => return Mode::Browse,
            KeyCode::Esc => {
                self.criteria.search_text.clear();
                return Mode::Browse;
            }
            KeyCode::Backspace => {
                self.criteria.search_text.pop();
            }
            KeyCode::Char(c) => self.criteria.search_text.push(c),
            _ => {}
        }
        self.selected = 0;
        Mode::Search
    }

    fn quick_add_key(&mut self, key: KeyEvent, mut text: String, today: NaiveDate) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Browse,
            KeyCode::Enter => {
                let fields = quick_add::parse(&text, today).into();
                let result = self
                    .board
                    .add(fields)
                    .map(|task| format!("Added '{}'", task.title));
                let failed = result.is_err();
                self.report(result);
                return if failed {
                    Mode::QuickAdd(text)
                } else {
                    Mode::Browse
                };
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(c) => text.push(c),
            _ => {}
        }
        Mode::QuickAdd(text)
    }

    fn form_key(&mut self, key: KeyEvent, mut form: TaskForm, today: NaiveDate) -> Mode {
        match form.handle_key(key) {
            FormAction::Continue => Mode::Form(form),
            FormAction::Cancel => Mode::Browse,
            FormAction::Submit => {
                let fields = match form.to_fields(today) {
                    Ok(fields) => fields,
                    Err(reason) => {
                        self.error(reason);
                        return Mode::Form(form);
                    }
                };
                let result = match form.editing {
                    Some(id) => self
                        .board
                        .edit(id, fields)
                        .map(|task| format!("Updated '{}'", task.title)),
                    None => self
                        .board
                        .add(fields)
                        .map(|task| format!("Added '{}'", task.title)),
                };
                let failed = result.is_err();
                self.report(result);
                if failed {
                    Mode::Form(form)
                } else {
                    Mode::Browse
                }
            }
        }
    }

    fn confirm_delete_key(&mut self, key: KeyEvent, id: TaskId) -> Mode {
        if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            let result = self
                .board
                .remove(id)
                .map(|task| format!("Deleted '{}'", task.title));
            self.report(result);
        }
        Mode::Browse
    }

    fn export_csv(&mut self) {
        let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let format = ExportFormat::Csv;
        let path = self.config.export_path(&stamp, format.extension());
        let result = self
            .board
            .export(&path, format)
            .map(|()| format!("Exported to {}", path.display()));
        self.report(result);
    }

    /// Shows the outcome of a board call. A failed save still applied the
    /// change in memory, so the message says so.
    fn report(&mut self, result: TodoResult<String>) {
        match result {
            Ok(text) => {
                self.status = Some(StatusLine {
                    text,
                    is_error: false,
                })
            }
            Err(err) if self.board.is_dirty() => {
                self.error(format!("{err} (changes not saved yet, press w to retry)"))
            }
            Err(err) => self.error(err.to_string()),
        }
    }

    fn error(&mut self, text: String) {
        self.status = Some(StatusLine {
            text,
            is_error: true,
        });
    }

    fn clamp_selection(&mut self) {
        let count = self.visible().len();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| render::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
