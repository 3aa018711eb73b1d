use shared::domain::TaskId;
use thiserror::Error;

use crate::flow::Phase;

/// Refusal to toggle a task. The display text doubles as the user hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("click the link first")]
    LinkRequired(TaskId),
    #[error("paste your quote tweet link first")]
    UrlRequired(TaskId),
    #[error("unknown task {0}")]
    UnknownTask(TaskId),
}

impl GateError {
    pub fn task_id(&self) -> &TaskId {
        match self {
            Self::LinkRequired(id) | Self::UrlRequired(id) | Self::UnknownTask(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Handle,
    Tasks,
    Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("handle must be at least 2 characters")]
    HandleTooShort,
    #[error("complete every task first")]
    TasksIncomplete,
    #[error("enter a valid evm address (0x + 40 hex chars)")]
    InvalidAddress,
}

impl ValidationError {
    pub fn field(self) -> FormField {
        match self {
            Self::HandleTooShort => FormField::Handle,
            Self::TasksIncomplete => FormField::Tasks,
            Self::InvalidAddress => FormField::Address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("no submission is in flight")]
    NotInFlight,
    #[error("cannot submit from the {0:?} phase")]
    WrongPhase(Phase),
    #[error("registration already confirmed")]
    Finished,
}
