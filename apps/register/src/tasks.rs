use std::{collections::HashSet, fs, path::Path};

use anyhow::{bail, Context, Result};
use client_core::default_tasks;
use serde::Deserialize;
use shared::domain::Task;

#[derive(Debug, Deserialize)]
struct TasksFile {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Loads the `[[tasks]]` table from `path`, or the built-in pair when absent.
pub fn load_tasks(path: Option<&Path>) -> Result<Vec<Task>> {
    let Some(path) = path else {
        return Ok(default_tasks());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read tasks file {}", path.display()))?;
    parse_tasks(&raw).with_context(|| format!("invalid tasks file {}", path.display()))
}

pub fn parse_tasks(raw: &str) -> Result<Vec<Task>> {
    let file: TasksFile = toml::from_str(raw).context("failed to parse tasks toml")?;
    if file.tasks.is_empty() {
        bail!("at least one task is required");
    }
    let mut seen = HashSet::new();
    for task in &file.tasks {
        if task.id.as_str().trim().is_empty() {
            bail!("task ids must not be empty");
        }
        if !seen.insert(task.id.clone()) {
            bail!("duplicate task id {}", task.id);
        }
    }
    Ok(file.tasks)
}
