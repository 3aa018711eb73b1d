//! Per-task gating: a task can only be ticked after its link was opened and,
//! for url-bearing tasks, after a supplementary url was pasted.
//!
//! ```text
//! Locked --link--> LinkVisited --(url, if required)--> ready
//!                      ^                                 |
//!                      +------------ toggle -------------+--> Completed
//! ```
//!
//! Link-visited status is sticky: unticking a completed task returns it to
//! `LinkVisited`, never to `Locked`.

use std::collections::HashMap;

use shared::domain::{Task, TaskId};

use crate::error::GateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Locked,
    LinkVisited,
    UrlPending,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskGateState {
    pub link_visited: bool,
    pub completed: bool,
    pub supplied_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    LinkVisited(TaskId),
    UrlEntered { task_id: TaskId, url: String },
    ToggleRequested(TaskId),
}

#[derive(Debug, Clone)]
pub struct TaskGateController {
    tasks: Vec<Task>,
    states: HashMap<TaskId, TaskGateState>,
}

impl TaskGateController {
    pub fn new(tasks: Vec<Task>) -> Self {
        let states = tasks
            .iter()
            .map(|task| (task.id.clone(), TaskGateState::default()))
            .collect();
        Self { tasks, states }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn state(&self, task_id: &TaskId) -> Option<&TaskGateState> {
        self.states.get(task_id)
    }

    pub fn mark_link_visited(&mut self, task_id: &TaskId) -> Result<(), GateError> {
        self.state_mut(task_id)?.link_visited = true;
        Ok(())
    }

    /// Stores the trimmed url; an all-whitespace url clears it. Completion is
    /// left as is.
    pub fn set_supplementary_url(&mut self, task_id: &TaskId, url: &str) -> Result<(), GateError> {
        let url = url.trim();
        self.state_mut(task_id)?.supplied_url = (!url.is_empty()).then(|| url.to_string());
        Ok(())
    }

    /// Flips completion and returns the new value.
    pub fn toggle_completion(&mut self, task_id: &TaskId) -> Result<bool, GateError> {
        let requires_url = self.task(task_id)?.requires_url;
        let state = self.state_mut(task_id)?;
        if !state.link_visited {
            return Err(GateError::LinkRequired(task_id.clone()));
        }
        if requires_url && state.supplied_url.is_none() {
            return Err(GateError::UrlRequired(task_id.clone()));
        }
        state.completed = !state.completed;
        Ok(state.completed)
    }

    pub fn all_completed(&self) -> bool {
        self.tasks
            .iter()
            .all(|task| self.states.get(&task.id).is_some_and(|s| s.completed))
    }

    pub fn status(&self, task_id: &TaskId) -> Result<TaskStatus, GateError> {
        let task = self.task(task_id)?;
        let state = self
            .states
            .get(task_id)
            .ok_or_else(|| GateError::UnknownTask(task_id.clone()))?;
        Ok(if !state.link_visited {
            TaskStatus::Locked
        } else if state.completed {
            TaskStatus::Completed
        } else if task.requires_url && state.supplied_url.is_none() {
            TaskStatus::UrlPending
        } else {
            TaskStatus::LinkVisited
        })
    }

    pub fn supplied_url(&self, task_id: &TaskId) -> Option<&str> {
        self.states.get(task_id)?.supplied_url.as_deref()
    }

    /// First pasted url among url-bearing tasks, in task order.
    pub fn first_supplied_url(&self) -> Option<&str> {
        self.tasks
            .iter()
            .filter(|task| task.requires_url)
            .find_map(|task| self.supplied_url(&task.id))
    }

    pub fn apply(&mut self, event: &GateEvent) -> Result<(), GateError> {
        match event {
            GateEvent::LinkVisited(task_id) => self.mark_link_visited(task_id),
            GateEvent::UrlEntered { task_id, url } => self.set_supplementary_url(task_id, url),
            GateEvent::ToggleRequested(task_id) => self.toggle_completion(task_id).map(|_| ()),
        }
    }

    fn task(&self, task_id: &TaskId) -> Result<&Task, GateError> {
        self.tasks
            .iter()
            .find(|task| &task.id == task_id)
            .ok_or_else(|| GateError::UnknownTask(task_id.clone()))
    }

    fn state_mut(&mut self, task_id: &TaskId) -> Result<&mut TaskGateState, GateError> {
        self.states
            .get_mut(task_id)
            .ok_or_else(|| GateError::UnknownTask(task_id.clone()))
    }
}

#[cfg(test)]
#[path = "tests/gate_tests.rs"]
mod tests;
