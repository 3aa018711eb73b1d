//! Phase sequencing for one registration flow instance.
//!
//! The orchestrator is a reducer: synchronous user events go through
//! [`FlowOrchestrator::handle`], which may answer with a [`FlowCommand`] for
//! the driver to execute. The submission itself is the only async step and is
//! split into `begin_submission`/`finish_submission` so drivers that own their
//! own runtime can perform the request however they like.

use std::{str::FromStr, time::Instant};

use serde::Deserialize;
use shared::domain::{truncate_chars, Task, TaskId, MAX_HANDLE_CHARS};
use tracing::{debug, info, warn};

use crate::{
    confirmation::{ConfirmationView, ShareConfig},
    error::{FlowError, FormField, GateError},
    form::{RegistrationDraft, RegistrationFormModel},
    gate::GateEvent,
    hint::HintBoard,
    session::{SessionEcho, SessionStore},
    submission::{SubmissionClient, SubmissionResult},
};

pub const NETWORK_ERROR_MESSAGE: &str = "network error. try again.";
pub const WALLET_REJECTED_MESSAGE: &str = "wallet connection rejected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowVariant {
    /// Handle, tasks and address on a single screen.
    #[default]
    Combined,
    /// One screen per step.
    Split,
}

impl FlowVariant {
    pub fn first_phase(self) -> Phase {
        match self {
            Self::Combined => Phase::Register,
            Self::Split => Phase::Identity,
        }
    }
}

impl FromStr for FlowVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(Self::Combined),
            "split" => Ok(Self::Split),
            other => Err(format!("unknown flow variant `{other}` (expected combined or split)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Register,
    Identity,
    Tasks,
    Wallet,
    Confirmation,
}

impl Phase {
    /// Phases whose primary action is the submission.
    pub fn is_submit_phase(self) -> bool {
        matches!(self, Self::Register | Self::Wallet)
    }
}

#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub variant: FlowVariant,
    pub tasks: Vec<Task>,
    pub share: ShareConfig,
}

impl FlowConfig {
    pub fn new(variant: FlowVariant, tasks: Vec<Task>) -> Self {
        Self {
            variant,
            tasks,
            share: ShareConfig::default(),
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self::new(FlowVariant::default(), default_tasks())
    }
}

pub fn default_tasks() -> Vec<Task> {
    vec![
        Task::new("like", "like the announcement", "https://x.com/"),
        Task::new("quote", "quote tweet the announcement", "https://x.com/").requiring_url(),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    HandleChanged(String),
    AddressChanged(String),
    LinkClicked(TaskId),
    QuoteUrlChanged { task_id: TaskId, url: String },
    TaskClicked(TaskId),
    ContinuePressed,
    SubmitPressed,
    /// Enter key on the current phase's last input.
    EnterPressed,
    WalletConnected(String),
    WalletConnectRejected,
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCommand {
    Submit,
}

pub struct FlowOrchestrator<S: SessionStore> {
    variant: FlowVariant,
    share: ShareConfig,
    phase: Phase,
    form: RegistrationFormModel,
    hints: HintBoard,
    session: S,
    /// Echo of the submitted values; `Some` while a request is in flight.
    pending: Option<SessionEcho>,
    inline_error: Option<String>,
    invalid_field: Option<FormField>,
}

impl<S: SessionStore + Default> FlowOrchestrator<S> {
    pub fn new(config: FlowConfig) -> Self {
        Self::with_session(config, S::default())
    }
}

impl<S: SessionStore> FlowOrchestrator<S> {
    pub fn with_session(config: FlowConfig, session: S) -> Self {
        Self {
            variant: config.variant,
            share: config.share,
            phase: config.variant.first_phase(),
            form: RegistrationFormModel::new(config.tasks),
            hints: HintBoard::default(),
            session,
            pending: None,
            inline_error: None,
            invalid_field: None,
        }
    }

    pub fn variant(&self) -> FlowVariant {
        self.variant
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn form(&self) -> &RegistrationFormModel {
        &self.form
    }

    pub fn hints(&self) -> &HintBoard {
        &self.hints
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    pub fn invalid_field(&self) -> Option<FormField> {
        self.invalid_field
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Confirmation
    }

    /// Whether the current phase's primary action may be taken.
    pub fn can_advance(&self) -> bool {
        match self.phase {
            Phase::Identity => self.form.handle_ok(),
            Phase::Tasks => self.form.tasks_ok(),
            Phase::Register | Phase::Wallet => self.submit_enabled(),
            Phase::Confirmation => false,
        }
    }

    pub fn submit_enabled(&self) -> bool {
        self.phase.is_submit_phase() && !self.in_flight() && self.form.can_submit()
    }

    pub fn handle(&mut self, event: FlowEvent, now: Instant) -> Option<FlowCommand> {
        if let FlowEvent::Tick = event {
            self.hints.tick(now);
            return None;
        }
        if self.is_finished() {
            debug!(?event, "ignoring event after confirmation");
            return None;
        }

        match event {
            FlowEvent::HandleChanged(handle) => {
                self.form.set_handle(handle);
                self.clear_invalid(FormField::Handle);
                None
            }
            FlowEvent::AddressChanged(address) => {
                self.form.set_address(address);
                self.clear_invalid(FormField::Address);
                None
            }
            FlowEvent::LinkClicked(task_id) => {
                self.apply_gate(GateEvent::LinkVisited(task_id), now);
                None
            }
            FlowEvent::QuoteUrlChanged { task_id, url } => {
                self.apply_gate(GateEvent::UrlEntered { task_id, url }, now);
                None
            }
            FlowEvent::TaskClicked(task_id) => {
                self.apply_gate(GateEvent::ToggleRequested(task_id), now);
                self.clear_invalid(FormField::Tasks);
                None
            }
            FlowEvent::ContinuePressed | FlowEvent::EnterPressed => self.advance(),
            FlowEvent::SubmitPressed => {
                if self.phase.is_submit_phase() {
                    self.request_submit()
                } else {
                    None
                }
            }
            FlowEvent::WalletConnected(address) => {
                info!(address = %address, "wallet connected");
                self.form.connect_address(address);
                self.inline_error = None;
                self.clear_invalid(FormField::Address);
                if self.variant == FlowVariant::Split && self.phase == Phase::Wallet {
                    self.request_submit()
                } else {
                    None
                }
            }
            FlowEvent::WalletConnectRejected => {
                warn!("wallet connection rejected");
                self.inline_error = Some(WALLET_REJECTED_MESSAGE.to_string());
                None
            }
            FlowEvent::Tick => None,
        }
    }

    /// Validates the form and claims the single in-flight slot.
    pub fn begin_submission(&mut self) -> Result<RegistrationDraft, FlowError> {
        if self.is_finished() {
            return Err(FlowError::Finished);
        }
        if !self.phase.is_submit_phase() {
            return Err(FlowError::WrongPhase(self.phase));
        }
        if self.in_flight() {
            return Err(FlowError::SubmissionInFlight);
        }
        if let Err(err) = self.form.validate() {
            self.invalid_field = Some(err.field());
            return Err(err.into());
        }

        self.pending = Some(SessionEcho {
            handle: truncate_chars(self.form.handle().trim(), MAX_HANDLE_CHARS).to_string(),
            address: self.form.address().trim().to_string(),
        });
        self.inline_error = None;
        self.invalid_field = None;
        Ok(self.form.build_draft())
    }

    /// Settles the submission claimed by `begin_submission`. On success the
    /// echo records the values captured at that point, not the current fields.
    pub fn finish_submission(&mut self, result: &SubmissionResult) -> Result<(), FlowError> {
        let Some(echo) = self.pending.take() else {
            warn!(?result, "submission result without a submission in flight");
            return Err(FlowError::NotInFlight);
        };
        if result.is_success() {
            echo.write_to(&mut self.session);
            info!(?result, "registration confirmed");
            self.phase = Phase::Confirmation;
            return Ok(());
        }
        match result {
            SubmissionResult::Rejected(message) => {
                warn!(%message, "submission rejected");
                self.inline_error = Some(message.clone());
            }
            SubmissionResult::NetworkFailure => {
                warn!("submission failed in transport");
                self.inline_error = Some(NETWORK_ERROR_MESSAGE.to_string());
            }
            SubmissionResult::Accepted | SubmissionResult::Duplicate => {}
        }
        Ok(())
    }

    pub async fn submit<C>(&mut self, client: &C) -> Result<SubmissionResult, FlowError>
    where
        C: SubmissionClient + ?Sized,
    {
        let draft = self.begin_submission()?;
        let result = client.submit(&draft).await;
        self.finish_submission(&result)?;
        Ok(result)
    }

    /// Available once the flow reached its terminal phase.
    pub fn confirmation(&self) -> Option<ConfirmationView> {
        self.is_finished()
            .then(|| ConfirmationView::from_echo(SessionEcho::read_from(&self.session)))
    }

    pub fn share_config(&self) -> &ShareConfig {
        &self.share
    }

    pub fn visible_hint(&self, now: Instant) -> Option<&str> {
        self.hints.visible_hint(now)
    }

    pub fn is_shaking(&self, task_id: &TaskId, now: Instant) -> bool {
        self.hints.is_shaking(task_id, now)
    }

    fn advance(&mut self) -> Option<FlowCommand> {
        let next = match self.phase {
            Phase::Identity if self.form.handle_ok() => Phase::Tasks,
            Phase::Tasks if self.form.tasks_ok() => Phase::Wallet,
            Phase::Register | Phase::Wallet => return self.request_submit(),
            _ => return None,
        };
        debug!(from = ?self.phase, to = ?next, "advancing phase");
        self.phase = next;
        None
    }

    fn request_submit(&mut self) -> Option<FlowCommand> {
        if self.in_flight() {
            return None;
        }
        match self.form.validate() {
            Ok(()) => Some(FlowCommand::Submit),
            Err(err) => {
                self.invalid_field = Some(err.field());
                None
            }
        }
    }

    fn apply_gate(&mut self, event: GateEvent, now: Instant) {
        match self.form.apply_gate(&event) {
            Ok(()) => {}
            Err(GateError::UnknownTask(task_id)) => warn!(%task_id, "event for unknown task"),
            Err(err) => {
                debug!(error = %err, "task gate refused event");
                self.hints.show_gate_failure(&err, now);
            }
        }
    }

    fn clear_invalid(&mut self, field: FormField) {
        if self.invalid_field == Some(field) {
            self.invalid_field = None;
        }
    }
}

#[cfg(test)]
#[path = "tests/flow_tests.rs"]
mod tests;
