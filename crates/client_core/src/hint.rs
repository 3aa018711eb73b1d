//! Transient feedback for refused task toggles, modelled as values with an
//! expiry instead of timers. Callers pass `now` in and re-check on each tick.

use std::time::{Duration, Instant};

use shared::domain::TaskId;

use crate::error::GateError;

pub const HINT_TTL: Duration = Duration::from_secs(3);
pub const SHAKE_TTL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientHint {
    message: String,
    expires_at: Instant,
}

impl TransientHint {
    pub fn new(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            expires_at: now + HINT_TTL,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Shake {
    task_id: TaskId,
    expires_at: Instant,
}

/// At most one hint and one shaking task at a time; a newer failure replaces
/// the previous one and restarts its window.
#[derive(Debug, Clone, Default)]
pub struct HintBoard {
    hint: Option<TransientHint>,
    shake: Option<Shake>,
}

impl HintBoard {
    pub fn show_gate_failure(&mut self, err: &GateError, now: Instant) {
        self.hint = Some(TransientHint::new(err.to_string(), now));
        self.shake = Some(Shake {
            task_id: err.task_id().clone(),
            expires_at: now + SHAKE_TTL,
        });
    }

    pub fn visible_hint(&self, now: Instant) -> Option<&str> {
        self.hint
            .as_ref()
            .filter(|hint| hint.is_visible(now))
            .map(TransientHint::message)
    }

    pub fn is_shaking(&self, task_id: &TaskId, now: Instant) -> bool {
        self.shake
            .as_ref()
            .is_some_and(|shake| &shake.task_id == task_id && now < shake.expires_at)
    }

    /// Drops expired entries.
    pub fn tick(&mut self, now: Instant) {
        if self.hint.as_ref().is_some_and(|h| !h.is_visible(now)) {
            self.hint = None;
        }
        if self.shake.as_ref().is_some_and(|s| now >= s.expires_at) {
            self.shake = None;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hint.is_none() && self.shake.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_expires_after_three_seconds() {
        let t0 = Instant::now();
        let mut board = HintBoard::default();
        board.show_gate_failure(&GateError::LinkRequired(TaskId::new("like")), t0);

        assert_eq!(board.visible_hint(t0), Some("click the link first"));
        assert!(board.is_shaking(&TaskId::new("like"), t0));
        assert!(!board.is_shaking(&TaskId::new("quote"), t0));

        let later = t0 + Duration::from_millis(600);
        assert!(!board.is_shaking(&TaskId::new("like"), later));
        assert!(board.visible_hint(later).is_some());

        let expired = t0 + HINT_TTL;
        assert_eq!(board.visible_hint(expired), None);
        board.tick(expired);
        assert!(board.is_empty());
    }

    #[test]
    fn newer_failure_restarts_window() {
        let t0 = Instant::now();
        let mut board = HintBoard::default();
        board.show_gate_failure(&GateError::LinkRequired(TaskId::new("like")), t0);
        let t1 = t0 + Duration::from_secs(2);
        board.show_gate_failure(&GateError::UrlRequired(TaskId::new("quote")), t1);

        let t2 = t0 + Duration::from_secs(4);
        assert_eq!(
            board.visible_hint(t2),
            Some("paste your quote tweet link first")
        );
    }
}
