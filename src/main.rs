use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use casa_bonita_leads::form::FORM_ID;
use casa_bonita_leads::integrations::proxy::ProxyClient;
use casa_bonita_leads::notify::ConsoleRenderer;
use casa_bonita_leads::session::ConsoleForm;
use casa_bonita_leads::{
    init_logging, AppConfig, Notifier, RawSubmission, SubmissionPipeline, SubmitOutcome,
};

/// Lead-capture pipeline for the Casa Bonita Residencial landing page.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Directory holding config.json (defaults to the user config dir).
    #[arg(long = "config-dir", value_name = "DIR", global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit the contact form once.
    Submit {
        /// Form field as name=value, e.g. `--field nombre="Juan Perez"`. Repeatable.
        #[arg(long = "field", value_name = "NAME=VALUE", value_parser = RawSubmission::parse_pair)]
        fields: Vec<(String, String)>,
        /// JSON object of field values; `--field` entries override it.
        #[arg(long = "from-file", value_name = "PATH")]
        from_file: Option<PathBuf>,
    },
    /// Check that the proxy is up.
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match cli.config_dir.or_else(AppConfig::default_dir) {
        Some(dir) => AppConfig::load(&dir),
        None => AppConfig::default(),
    };
    let config = Arc::new(config);

    match cli.command {
        Command::Submit { fields, from_file } => submit(config, fields, from_file).await,
        Command::Health => health(config).await,
    }
}

async fn submit(
    config: Arc<AppConfig>,
    fields: Vec<(String, String)>,
    from_file: Option<PathBuf>,
) -> Result<()> {
    let mut submission = match from_file {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<RawSubmission>(&content)
                .with_context(|| format!("{} is not a flat JSON object of strings", path.display()))?
        }
        None => RawSubmission::new(),
    };
    for (name, value) in &fields {
        submission.insert(name, value);
    }

    if config.targets_localhost() {
        let proxy = ProxyClient::new(config.clone());
        if let Err(e) = proxy.probe_health().await {
            log::warn!("{}", e);
        }
    }

    log::info!("Form `{}` wired to {}", FORM_ID, config.endpoint(""));
    let notifier = Notifier::new(Arc::new(ConsoleRenderer));
    let pipeline = SubmissionPipeline::new(config, notifier.clone(), Arc::new(ConsoleForm));

    let outcome = pipeline.handle_submit(submission).await;
    pipeline.wait_for_reset().await;
    notifier.settle().await;

    match outcome {
        SubmitOutcome::Accepted { .. } | SubmitOutcome::Declined { .. } => Ok(()),
        SubmitOutcome::Invalid(e) => bail!("submission invalid: {}", e),
        SubmitOutcome::Failed(e) => bail!(e),
        SubmitOutcome::Busy => bail!("a submission is already in flight"),
    }
}

async fn health(config: Arc<AppConfig>) -> Result<()> {
    let proxy = ProxyClient::new(config);
    match proxy.probe_health().await {
        Ok(true) => {
            println!("healthy");
            Ok(())
        }
        Ok(false) => bail!("proxy answered but is not healthy"),
        Err(e) => bail!(e),
    }
}
