#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use casa_bonita_leads::notify::{Toast, ToastRenderer};
use casa_bonita_leads::session::FormSurface;
use casa_bonita_leads::{AppConfig, Notifier, RawSubmission, SubmissionPipeline};
use wiremock::MockServer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Disabled(String),
    Enabled,
    Reset,
}

#[derive(Default)]
pub struct RecordingForm {
    pub events: Mutex<Vec<FormEvent>>,
}

impl RecordingForm {
    pub fn events(&self) -> Vec<FormEvent> {
        self.events.lock().clone()
    }

    pub fn resets(&self) -> usize {
        self.events().iter().filter(|e| **e == FormEvent::Reset).count()
    }
}

impl FormSurface for RecordingForm {
    fn disable_submit(&self, label: &str) {
        self.events.lock().push(FormEvent::Disabled(label.to_string()));
    }

    fn enable_submit(&self) {
        self.events.lock().push(FormEvent::Enabled);
    }

    fn reset(&self) {
        self.events.lock().push(FormEvent::Reset);
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub shown: Mutex<Vec<Toast>>,
}

impl ToastRenderer for RecordingRenderer {
    fn show(&self, toast: &Toast) {
        self.shown.lock().push(toast.clone());
    }

    fn fade_out(&self, _toast: &Toast) {}

    fn remove(&self, _id: u64) {}
}

pub struct Harness {
    pub pipeline: SubmissionPipeline,
    pub form: Arc<RecordingForm>,
    pub renderer: Arc<RecordingRenderer>,
}

pub const SUCCESS_DELAY_MS: u64 = 200;
pub const DECLINE_DELAY_MS: u64 = 300;

pub fn harness(server: &MockServer) -> Harness {
    let config = AppConfig {
        api_base_url: server.uri(),
        success_reset_delay_ms: SUCCESS_DELAY_MS,
        decline_reset_delay_ms: DECLINE_DELAY_MS,
        ..AppConfig::default()
    };
    harness_with(config)
}

pub fn harness_with(config: AppConfig) -> Harness {
    let form = Arc::new(RecordingForm::default());
    let renderer = Arc::new(RecordingRenderer::default());
    let notifier = Notifier::new(renderer.clone());
    let pipeline = SubmissionPipeline::new(Arc::new(config), notifier, form.clone());
    Harness {
        pipeline,
        form,
        renderer,
    }
}

pub fn submission(answers: [&str; 4]) -> RawSubmission {
    RawSubmission::from_pairs([
        ("nombre", "Juan Carlos Perez Lopez"),
        ("email", "juan@mail.com"),
        ("telefono", "987 654 321"),
        ("mensaje", "Quiero informes"),
        ("terminos", "on"),
        ("pregunta1", answers[0]),
        ("pregunta2", answers[1]),
        ("pregunta3", answers[2]),
        ("pregunta4", answers[3]),
    ])
}

pub fn qualified() -> RawSubmission {
    submission(["si", "si", "no", "no"])
}

/// Polls until `path` has been hit or the deadline passes.
pub async fn wait_for_requests(server: &MockServer, path: &str, min: usize) -> usize {
    for _ in 0..50 {
        let hits = hits(server, path).await;
        if hits >= min {
            return hits;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    hits(server, path).await
}

pub async fn hits(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .count()
}
