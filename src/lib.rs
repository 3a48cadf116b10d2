//! taskers: a single-user to-do list kept in a JSON file.
//!
//! - [`store`] owns the ordered task collection and never touches the disk.
//! - [`storage`] loads and atomically saves that collection.
//! - [`filter`] computes the visible subset for the current criteria.
//! - [`board`] sequences "mutate, then save" for the terminal interface in [`ui`].

pub mod analytics;
pub mod board;
pub mod config;
pub mod errors;
pub mod export;
pub mod filter;
pub mod quick_add;
pub mod storage;
pub mod store;
pub mod task;
pub mod ui;

pub use board::TodoBoard;
pub use errors::{TodoError, TodoResult};
pub use filter::{apply, FilterCriteria};
pub use store::TaskStore;
pub use task::{Category, Priority, Task, TaskFields, TaskId};
