//! CSV and JSON exports of the task collection.

use std::path::Path;

use tracing::info;

use crate::errors::{TodoError, TodoResult};
use crate::storage::write_atomic;
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub fn render(tasks: &[Task], format: ExportFormat) -> TodoResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => to_csv(tasks),
        ExportFormat::Json => serde_json::to_vec_pretty(tasks).map_err(|e| TodoError::Export {
            reason: e.to_string(),
        }),
    }
}

pub fn write(tasks: &[Task], path: &Path, format: ExportFormat) -> TodoResult<()> {
    let bytes = render(tasks, format)?;
    write_atomic(path, &bytes)?;
    info!(path = %path.display(), count = tasks.len(), ?format, "Exported tasks");
    Ok(())
}

fn to_csv(tasks: &[Task]) -> TodoResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "title",
        "description",
        "due_date",
        "priority",
        "category",
        "completed",
        "created_at",
        "completed_at",
    ])?;
    for task in tasks {
        writer.write_record([
            task.id.to_string(),
            task.title.clone(),
            task.description.clone(),
            task.due_date.map_or(String::new(), |d| d.to_string()),
            task.priority.to_string(),
            task.category.to_string(),
            task.completed.to_string(),
            task.created_at.to_rfc3339(),
            task.completed_at.map_or(String::new(), |d| d.to_rfc3339()),
        ])?;
    }
    writer.into_inner().map_err(|e| TodoError::Export {
        reason: e.to_string(),
    })
}
