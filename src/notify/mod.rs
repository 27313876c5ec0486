use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const FADE_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityStyle {
    pub duration: Duration,
    pub color: &'static str,
    pub icon: &'static str,
}

const SEVERITY_STYLES: [(Severity, SeverityStyle); 4] = [
    (
        Severity::Success,
        SeverityStyle {
            duration: Duration::from_secs(5),
            color: "#10b981",
            icon: "✅",
        },
    ),
    (
        Severity::Error,
        SeverityStyle {
            duration: Duration::from_secs(5),
            color: "#ef4444",
            icon: "❌",
        },
    ),
    (
        Severity::Warning,
        SeverityStyle {
            duration: Duration::from_secs(8),
            color: "#f59e0b",
            icon: "⚠️",
        },
    ),
    (
        Severity::Info,
        SeverityStyle {
            duration: Duration::from_secs(5),
            color: "#3b82f6",
            icon: "ℹ️",
        },
    ),
];

impl Severity {
    pub fn style(self) -> SeverityStyle {
        SEVERITY_STYLES
            .iter()
            .find(|(s, _)| *s == self)
            .map(|(_, style)| *style)
            .unwrap_or(SEVERITY_STYLES[3].1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    FadingIn,
    Shown,
    FadingOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    pub phase: ToastPhase,
}

/// Where toasts actually appear.
pub trait ToastRenderer: Send + Sync {
    fn show(&self, toast: &Toast);
    fn fade_out(&self, toast: &Toast);
    fn remove(&self, id: u64);
}

/// Writes toasts to stdout and mirrors them into the log.
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl ToastRenderer for ConsoleRenderer {
    fn show(&self, toast: &Toast) {
        let style = toast.severity.style();
        println!("{} {}", style.icon, toast.message);
        log::debug!(
            "toast #{} [{} {}] shown for {:?}",
            toast.id,
            toast.severity.as_str(),
            style.color,
            style.duration
        );
    }

    fn fade_out(&self, toast: &Toast) {
        log::debug!("toast #{} fading out", toast.id);
    }

    fn remove(&self, id: u64) {
        log::debug!("toast #{} removed", id);
    }
}

#[derive(Default)]
struct NotifierState {
    current: Option<Toast>,
    next_id: u64,
    pending: Option<JoinHandle<()>>,
}

/// Shows one toast at a time. A new toast replaces whatever is on screen.
#[derive(Clone)]
pub struct Notifier {
    renderer: Arc<dyn ToastRenderer>,
    state: Arc<Mutex<NotifierState>>,
}

impl Notifier {
    pub fn new(renderer: Arc<dyn ToastRenderer>) -> Self {
        Self {
            renderer,
            state: Arc::new(Mutex::new(NotifierState::default())),
        }
    }

    /// Must be called from inside a tokio runtime; dismissal runs on a timer task.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let mut state = self.state.lock();

        if let Some(old) = state.current.take() {
            self.renderer.remove(old.id);
        }
        if let Some(handle) = state.pending.take() {
            handle.abort();
        }

        state.next_id += 1;
        let toast = Toast {
            id: state.next_id,
            severity,
            message: message.into(),
            phase: ToastPhase::FadingIn,
        };
        let id = toast.id;
        self.renderer.show(&toast);
        state.current = Some(toast);

        let notifier = self.clone();
        let visible_for = severity.style().duration;
        state.pending = Some(tokio::spawn(async move {
            notifier.run_lifecycle(id, visible_for).await;
        }));

        id
    }

    async fn run_lifecycle(&self, id: u64, visible_for: Duration) {
        tokio::time::sleep(FADE_DURATION).await;
        self.with_current(id, |toast, _| toast.phase = ToastPhase::Shown);

        tokio::time::sleep(visible_for.saturating_sub(FADE_DURATION)).await;
        self.with_current(id, |toast, renderer| {
            toast.phase = ToastPhase::FadingOut;
            renderer.fade_out(toast);
        });

        tokio::time::sleep(FADE_DURATION).await;
        let mut state = self.state.lock();
        if state.current.as_ref().is_some_and(|t| t.id == id) {
            state.current = None;
            self.renderer.remove(id);
        }
    }

    // Applies `f` only if toast `id` is still the one on screen.
    fn with_current(&self, id: u64, f: impl FnOnce(&mut Toast, &dyn ToastRenderer)) {
        let mut state = self.state.lock();
        if let Some(toast) = state.current.as_mut().filter(|t| t.id == id) {
            f(toast, self.renderer.as_ref());
        }
    }

    pub fn current(&self) -> Option<Toast> {
        self.state.lock().current.clone()
    }

    /// Waits until the visible toast (if any) has been dismissed.
    pub async fn settle(&self) {
        loop {
            let pending = self.state.lock().pending.take();
            match pending {
                Some(handle) => {
                    let _ = handle.await;
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Default)]
    struct Recorder {
        visible: Mutex<BTreeSet<u64>>,
        max_visible: Mutex<usize>,
        faded: Mutex<Vec<u64>>,
    }

    impl ToastRenderer for Recorder {
        fn show(&self, toast: &Toast) {
            let mut visible = self.visible.lock();
            visible.insert(toast.id);
            let mut max = self.max_visible.lock();
            *max = (*max).max(visible.len());
        }

        fn fade_out(&self, toast: &Toast) {
            self.faded.lock().push(toast.id);
        }

        fn remove(&self, id: u64) {
            self.visible.lock().remove(&id);
        }
    }

    #[test]
    fn lookup_table_durations() {
        assert_eq!(Severity::Warning.style().duration, Duration::from_secs(8));
        for s in [Severity::Success, Severity::Error, Severity::Info] {
            assert_eq!(s.style().duration, Duration::from_secs(5));
        }
        assert_eq!(Severity::Error.style().color, "#ef4444");
    }

    #[tokio::test(start_paused = true)]
    async fn second_toast_replaces_first() {
        let recorder = Arc::new(Recorder::default());
        let notifier = Notifier::new(recorder.clone());

        let first = notifier.notify("uno", Severity::Info);
        let second = notifier.notify("dos", Severity::Error);

        assert_ne!(first, second);
        assert_eq!(*recorder.max_visible.lock(), 1);
        assert_eq!(recorder.visible.lock().iter().copied().collect::<Vec<_>>(), vec![second]);
        assert_eq!(notifier.current().map(|t| t.message), Some("dos".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn warning_stays_eight_seconds_then_fades() {
        let recorder = Arc::new(Recorder::default());
        let notifier = Notifier::new(recorder.clone());
        let id = notifier.notify("aviso", Severity::Warning);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(notifier.current().map(|t| t.phase), Some(ToastPhase::Shown));

        tokio::time::sleep(Duration::from_millis(7_500)).await;
        assert!(notifier.current().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(notifier.current().map(|t| t.phase), Some(ToastPhase::FadingOut));
        assert_eq!(*recorder.faded.lock(), vec![id]);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(notifier.current().is_none());
        assert!(recorder.visible.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn other_severities_dismiss_after_five_seconds() {
        let notifier = Notifier::new(Arc::new(Recorder::default()));
        notifier.notify("listo", Severity::Success);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(notifier.current().is_some());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_does_not_dismiss_successor() {
        let notifier = Notifier::new(Arc::new(Recorder::default()));
        notifier.notify("viejo", Severity::Info);
        tokio::time::sleep(Duration::from_secs(4)).await;
        let newer = notifier.notify("nuevo", Severity::Warning);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(notifier.current().map(|t| t.id), Some(newer));

        notifier.settle().await;
        assert!(notifier.current().is_none());
    }
}
