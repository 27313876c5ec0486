pub mod config;
pub mod error;
pub mod form;
pub mod integrations;
pub mod notify;
pub mod pipeline;
pub mod session;

pub use config::AppConfig;
pub use error::{SubmitError, ValidationError};
pub use form::RawSubmission;
pub use notify::{Notifier, Severity};
pub use pipeline::{SubmissionPipeline, SubmitOutcome};

/// `RUST_LOG` wins; otherwise `info`.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
