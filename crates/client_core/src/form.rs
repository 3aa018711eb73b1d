//! Single source of truth for submit-enablement of the registration form.

use shared::{
    address::{is_valid_address, normalize_address},
    domain::{truncate_chars, Task, MAX_HANDLE_CHARS, MAX_QUOTE_URL_CHARS, MIN_HANDLE_CHARS},
    protocol::SubmitWalletRequest,
};

use crate::{
    error::{GateError, ValidationError},
    gate::{GateEvent, TaskGateController},
};

/// Submission-ready snapshot of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub handle: String,
    pub address: String,
    pub quote_url: Option<String>,
}

impl RegistrationDraft {
    pub fn to_request(&self) -> SubmitWalletRequest {
        SubmitWalletRequest {
            address: self.address.clone(),
            handle: (!self.handle.is_empty()).then(|| self.handle.clone()),
            quote_url: self.quote_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    HandleChanged(String),
    AddressChanged(String),
    /// Address filled in by a connected wallet provider.
    AddressConnected(String),
    Gate(GateEvent),
}

#[derive(Debug, Clone)]
pub struct RegistrationFormModel {
    handle: String,
    address: String,
    address_connected: bool,
    gate: TaskGateController,
}

impl RegistrationFormModel {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            handle: String::new(),
            address: String::new(),
            address_connected: false,
            gate: TaskGateController::new(tasks),
        }
    }

    /// Raw handle as typed.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Raw address as typed; never normalized in place.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn address_connected(&self) -> bool {
        self.address_connected
    }

    pub fn gate(&self) -> &TaskGateController {
        &self.gate
    }

    pub fn set_handle(&mut self, handle: impl Into<String>) {
        self.handle = handle.into();
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
        self.address_connected = false;
    }

    pub fn connect_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
        self.address_connected = true;
    }

    pub fn handle_ok(&self) -> bool {
        self.handle.trim().chars().count() >= MIN_HANDLE_CHARS
    }

    pub fn tasks_ok(&self) -> bool {
        self.gate.all_completed()
    }

    pub fn address_ok(&self) -> bool {
        is_valid_address(self.address.trim())
    }

    pub fn can_submit(&self) -> bool {
        self.handle_ok() && self.tasks_ok() && self.address_ok()
    }

    /// First failing predicate, in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.handle_ok() {
            return Err(ValidationError::HandleTooShort);
        }
        if !self.tasks_ok() {
            return Err(ValidationError::TasksIncomplete);
        }
        if !self.address_ok() {
            return Err(ValidationError::InvalidAddress);
        }
        Ok(())
    }

    pub fn build_draft(&self) -> RegistrationDraft {
        RegistrationDraft {
            handle: truncate_chars(self.handle.trim(), MAX_HANDLE_CHARS).to_string(),
            address: normalize_address(&self.address),
            quote_url: self
                .gate
                .first_supplied_url()
                .map(|url| truncate_chars(url, MAX_QUOTE_URL_CHARS).to_string()),
        }
    }

    pub fn apply(&mut self, event: &FormEvent) -> Result<(), GateError> {
        match event {
            FormEvent::HandleChanged(handle) => self.set_handle(handle.as_str()),
            FormEvent::AddressChanged(address) => self.set_address(address.as_str()),
            FormEvent::AddressConnected(address) => self.connect_address(address.as_str()),
            FormEvent::Gate(event) => return self.apply_gate(event),
        }
        Ok(())
    }

    pub fn apply_gate(&mut self, event: &GateEvent) -> Result<(), GateError> {
        self.gate.apply(event)
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
