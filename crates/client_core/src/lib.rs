//! Client-side registration flow: task gating, form validation, submission
//! and phase sequencing. Rendering is left to the embedding front-end, which
//! feeds [`FlowEvent`]s in and renders from the orchestrator's accessors.

pub mod confirmation;
pub mod error;
pub mod flow;
pub mod form;
pub mod gate;
pub mod hint;
pub mod session;
pub mod submission;

pub use confirmation::{ConfirmationView, ShareConfig};
pub use error::{FlowError, FormField, GateError, ValidationError};
pub use flow::{
    default_tasks, FlowCommand, FlowConfig, FlowEvent, FlowOrchestrator, FlowVariant, Phase,
};
pub use form::{RegistrationDraft, RegistrationFormModel};
pub use gate::{TaskGateController, TaskStatus};
pub use session::{MemorySessionStore, SessionEcho, SessionStore};
pub use submission::{HttpSubmissionClient, SubmissionClient, SubmissionResult};
