use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{FormSurface, SUBMITTING_LABEL};
use crate::error::SubmitError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveSubmission {
    pub id: String,
    pub started_at: String,
}

/// Single-flight guard: at most one submission attempt runs at a time.
#[derive(Debug, Default)]
pub struct SubmissionManager {
    current: Option<ActiveSubmission>,
}

pub type SubmissionState = Arc<Mutex<SubmissionManager>>;

impl SubmissionManager {
    pub fn new() -> Self {
        Self { current: None }
    }

    pub fn begin(&mut self) -> Result<ActiveSubmission, SubmitError> {
        if let Some(active) = &self.current {
            log::warn!("Submission {} still in flight; refusing a new one", active.id);
            return Err(SubmitError::Busy);
        }

        let submission = ActiveSubmission {
            id: uuid::Uuid::new_v4().to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
        };
        self.current = Some(submission.clone());
        Ok(submission)
    }

    /// Releases the guard if `id` still owns it.
    pub fn finish(&mut self, id: &str) -> bool {
        match &self.current {
            Some(active) if active.id == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&ActiveSubmission> {
        self.current.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }
}

/// Holds the single-flight slot and the disabled submit control for one
/// attempt. Dropping it re-enables the control and frees the slot, however
/// the attempt ends, including when its future is cancelled.
pub struct SubmissionTicket {
    submission: ActiveSubmission,
    state: SubmissionState,
    form: Arc<dyn FormSurface>,
}

impl SubmissionTicket {
    pub fn acquire(state: &SubmissionState, form: Arc<dyn FormSurface>) -> Result<Self, SubmitError> {
        let submission = state.lock().begin()?;
        form.disable_submit(SUBMITTING_LABEL);
        Ok(Self {
            submission,
            state: state.clone(),
            form,
        })
    }

    pub fn submission(&self) -> &ActiveSubmission {
        &self.submission
    }
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.form.enable_submit();
        self.state.lock().finish(&self.submission.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingForm {
        disabled: Mutex<usize>,
        enabled: Mutex<usize>,
    }

    impl FormSurface for CountingForm {
        fn disable_submit(&self, _label: &str) {
            *self.disabled.lock() += 1;
        }

        fn enable_submit(&self) {
            *self.enabled.lock() += 1;
        }

        fn reset(&self) {}
    }

    #[test]
    fn dropping_ticket_frees_slot_and_control() {
        let state: SubmissionState = Arc::new(Mutex::new(SubmissionManager::new()));
        let form = Arc::new(CountingForm::default());

        let ticket = SubmissionTicket::acquire(&state, form.clone()).expect("acquire");
        assert!(state.lock().is_busy());
        assert!(matches!(
            SubmissionTicket::acquire(&state, form.clone()),
            Err(SubmitError::Busy)
        ));
        assert_eq!(*form.disabled.lock(), 1);

        drop(ticket);
        assert!(!state.lock().is_busy());
        assert_eq!(*form.enabled.lock(), 1);
        assert!(SubmissionTicket::acquire(&state, form.clone()).is_ok());
    }

    #[test]
    fn second_begin_is_refused_until_finish() {
        let mut mgr = SubmissionManager::new();
        let first = mgr.begin().expect("first");
        assert!(matches!(mgr.begin(), Err(SubmitError::Busy)));
        assert_eq!(mgr.current(), Some(&first));

        assert!(mgr.finish(&first.id));
        assert!(!mgr.is_busy());
        assert!(mgr.begin().is_ok());
    }

    #[test]
    fn finishing_with_stale_id_keeps_guard() {
        let mut mgr = SubmissionManager::new();
        let active = mgr.begin().expect("begin");
        assert!(!mgr.finish("someone-else"));
        assert!(mgr.finish(&active.id));
    }
}
