use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::error::{SubmitError, ValidationError};
use crate::form::validator;
use crate::form::{eligibility, RawSubmission};
use crate::integrations::dispatcher::{Dispatch, Dispatcher};
use crate::integrations::proxy::ProxyClient;
use crate::notify::{Notifier, Severity};
use crate::session::manager::{SubmissionManager, SubmissionState, SubmissionTicket};
use crate::session::FormSurface;

pub const SUCCESS_MESSAGE: &str =
    "¡Formulario enviado exitosamente! Nuestros asesores te contactarán pronto.";

pub const DECLINE_MESSAGE: &str = "Gracias por tu interés en Casa Bonita Residencial. \
    Hemos evaluado tu información y, lamentablemente, en este momento no cumples con los requisitos \
    necesarios para acceder al Bono de Techo Propio. \
    Sin embargo, mantendremos tu información en nuestra base de datos y te contactaremos \
    para futuras evaluaciones y oportunidades que se ajusten mejor a tu perfil. \
    ¡No pierdas la esperanza, seguimos en contacto!";

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Another attempt was still in flight; nothing was touched.
    Busy,
    Invalid(ValidationError),
    Declined { fallback_sent: bool },
    Accepted { data: Option<serde_json::Value> },
    /// CRM rejection or transport failure.
    Failed(SubmitError),
}

/// Intake → validation → eligibility → dispatch → toast, for one form.
#[derive(Clone)]
pub struct SubmissionPipeline {
    config: Arc<AppConfig>,
    dispatcher: Dispatcher,
    notifier: Notifier,
    form: Arc<dyn FormSurface>,
    guard: SubmissionState,
    pending_reset: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SubmissionPipeline {
    pub fn new(config: Arc<AppConfig>, notifier: Notifier, form: Arc<dyn FormSurface>) -> Self {
        let dispatcher = Dispatcher::new(ProxyClient::new(config.clone()));
        Self {
            config,
            dispatcher,
            notifier,
            form,
            guard: Arc::new(Mutex::new(SubmissionManager::new())),
            pending_reset: Arc::new(Mutex::new(None)),
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn is_busy(&self) -> bool {
        self.guard.lock().is_busy()
    }

    pub async fn handle_submit(&self, submission: RawSubmission) -> SubmitOutcome {
        let ticket = match SubmissionTicket::acquire(&self.guard, self.form.clone()) {
            Ok(ticket) => ticket,
            Err(e) => {
                self.notifier.notify(e.user_message(), Severity::Info);
                return SubmitOutcome::Busy;
            }
        };
        let active = ticket.submission().clone();
        log::info!("Submission {} started at {}", active.id, active.started_at);

        if let Err(reason) = validator::validate(&submission).into_result() {
            log::warn!("Submission {} invalid: {}", active.id, reason);
            self.notifier.notify(reason.user_message(), Severity::Error);
            return SubmitOutcome::Invalid(reason);
        }

        let verdict = eligibility::evaluate(&submission);
        log::debug!("Submission {} verdict: {:?}", active.id, verdict);

        match self.dispatcher.dispatch(&submission, verdict).await {
            Ok(Dispatch::Declined { fallback_sent }) => {
                self.notifier.notify(DECLINE_MESSAGE, Severity::Warning);
                self.release_after(ticket, self.config.decline_reset_delay());
                SubmitOutcome::Declined { fallback_sent }
            }
            Ok(Dispatch::Accepted(response)) => {
                self.notifier.notify(SUCCESS_MESSAGE, Severity::Success);
                self.release_after(ticket, self.config.success_reset_delay());
                SubmitOutcome::Accepted {
                    data: response.data,
                }
            }
            Err(e) => {
                log::error!("Submission {} failed: {}", active.id, e);
                self.notifier.notify(e.user_message(), Severity::Error);
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Success paths: clear the form, then let the ticket hand the control back.
    fn release_after(&self, ticket: SubmissionTicket, delay: Duration) {
        let form = self.form.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            form.reset();
            drop(ticket);
        });
        *self.pending_reset.lock() = Some(handle);
    }

    /// Waits for a scheduled form reset, if one is pending.
    pub async fn wait_for_reset(&self) {
        let pending = self.pending_reset.lock().take();
        if let Some(handle) = pending {
            let _ = handle.await;
        }
    }
}
