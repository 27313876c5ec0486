pub mod manager;

/// Label the submit control shows while an attempt is in flight.
pub const SUBMITTING_LABEL: &str = "⏳ Enviando...";

/// The page's contact form as seen by the pipeline: its submit control and
/// its reset action.
pub trait FormSurface: Send + Sync {
    /// Disable the submit control and swap its label for `label`.
    fn disable_submit(&self, label: &str);
    /// Re-enable the submit control with its original label.
    fn enable_submit(&self);
    /// Clear every field.
    fn reset(&self);
}

/// Stand-in for the HTML form when running from the terminal.
#[derive(Debug, Default)]
pub struct ConsoleForm;

impl FormSurface for ConsoleForm {
    fn disable_submit(&self, label: &str) {
        log::info!("{}", label);
    }

    fn enable_submit(&self) {
        log::debug!("submit control enabled");
    }

    fn reset(&self) {
        log::info!("form cleared");
    }
}
