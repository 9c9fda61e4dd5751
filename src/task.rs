use anyhow::{Context, Result};
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// The record filters run against.
///
/// `top3_count` is maintained by whoever produces the task and is trusted
/// as-is; it is expected to equal `top3_dates.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaskFile")]
pub struct Task {
    pub description: String,
    pub top3_dates: Vec<Date>,
    pub top3_count: usize,
}

impl Task {
    pub fn new(description: impl Into<String>, top3_dates: Vec<Date>) -> Self {
        let top3_count = top3_dates.len();
        Self {
            description: description.into(),
            top3_dates,
            top3_count,
        }
    }

    pub fn with_top3_count(mut self, top3_count: usize) -> Self {
        self.top3_count = top3_count;
        self
    }
}

#[derive(Deserialize)]
struct TaskFile {
    description: String,
    #[serde(default)]
    top3_dates: Vec<Date>,
    top3_count: Option<usize>,
}

impl From<TaskFile> for Task {
    fn from(file: TaskFile) -> Self {
        let top3_count = file.top3_count.unwrap_or(file.top3_dates.len());
        Self {
            description: file.description,
            top3_dates: file.top3_dates,
            top3_count,
        }
    }
}

/// Reads a JSON array of tasks.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read task file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse task file {}", path.display()))
}
