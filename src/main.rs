//! mytracker dashboard client entry point

mod terminal;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mytracker_client::HttpDashboardApi;
use mytracker_config::{error::ConfigErrorSeverity, Config};
use mytracker_core::{CoreError, DashboardController, EventOutcome, FormData, Page, PageEvent, SubmitOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use terminal::TerminalPage;

#[derive(Parser, Debug)]
#[command(name = "mytracker")]
#[command(version = "0.1.0")]
#[command(about = "Live dashboard client for the mytracker personal finance tracker", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override the backend base URL
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the dashboard and refresh it until Ctrl-C
    Watch,
    /// Submit one entry through the quick-add form
    Add {
        /// Income, Expense or Investment
        #[arg(long = "type", default_value = "Expense")]
        kind: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Entry date (YYYY-MM-DD), today when omitted
        #[arg(long)]
        date: Option<String>,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) if e.severity() == ConfigErrorSeverity::Warning => {
            eprintln!("[WARN] {}, using defaults", e);
            Config::default()
        }
        Err(e) => {
            eprintln!("[ERROR] {}", e.to_details());
            return Err(e.into());
        }
    };
    if let Some(base_url) = &args.base_url {
        config.server.base_url = base_url.clone();
        config.validate()?;
    }
    Ok(config)
}

fn init_logging(config: &Config) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
}

fn build_controller(config: Config) -> anyhow::Result<Arc<DashboardController>> {
    let api = Arc::new(HttpDashboardApi::new(&config).context("Failed to build HTTP client")?);
    let page = Arc::new(TerminalPage::new(&config.elements));

    let missing = page.missing_elements(&config.elements.all());
    if !missing.is_empty() {
        anyhow::bail!("page is missing elements: {}", missing.join(", "));
    }

    Ok(Arc::new(DashboardController::new(config, api, page)))
}

async fn watch(config: Config) -> anyhow::Result<()> {
    let controller = build_controller(config)?;
    let handle = controller.start().await?;

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    log::info!("Shutting down");
    handle.stop().await;
    Ok(())
}

async fn add(config: Config, form: FormData) -> anyhow::Result<()> {
    let form_id = config.elements.form.clone();
    let button_id = config.elements.quick_add_button.clone();
    let controller = build_controller(config)?;
    controller.init_charts().await?;

    controller.handle_event(PageEvent::click(&button_id)).await?;
    match controller.handle_event(PageEvent::submit(&form_id, form)).await? {
        EventOutcome::Submitted(outcome) => log::info!("{}", submit_message(&outcome)),
        other => log::warn!("Unexpected outcome: {:?}", other),
    }
    Ok(())
}

/// A redirect may point at a login page, so only its target is reported
fn submit_message(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Redirected { url } => format!("Backend redirected to {}", url),
        SubmitOutcome::Stayed { status } => format!("Entry submitted, backend answered {}", status),
    }
}

fn init_config(path: &PathBuf, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists, use --force to overwrite", path.display());
    }
    std::fs::write(path, Config::generate_default())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("[INFO] Wrote default configuration to {}", path.display());
    Ok(())
}

/// Error text for the command line; dashboard failures carry their details
fn describe(error: &anyhow::Error) -> String {
    match error.downcast_ref::<CoreError>() {
        Some(core) => core.to_details().to_string(),
        None => format!("{:#}", error),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let result = match args.command {
        Command::InitConfig { force } => return init_config(&args.config, force),
        Command::Watch => {
            let config = load_config(&args)?;
            init_logging(&config);
            watch(config).await
        }
        Command::Add { ref kind, ref category, ref amount, ref notes, ref date } => {
            let config = load_config(&args)?;
            init_logging(&config);
            let date = date
                .clone()
                .unwrap_or_else(|| chrono::Local::now().date_naive().to_string());
            let form = FormData::new()
                .with("type", kind)
                .with("category", category)
                .with("amount", amount)
                .with("notes", notes)
                .with("date", &date);
            add(config, form).await
        }
    };

    if let Err(error) = result {
        eprintln!("[ERROR] {}", describe(&error));
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_core_error_includes_suggestions() {
        let error = anyhow::Error::new(CoreError::SubmitFailed { status: 500 });
        let text = describe(&error);
        assert!(text.starts_with("[SUBMIT_FAILED]"));
        assert!(text.contains("\"status\":500"));
        assert!(text.contains("Suggestions:"));
    }

    #[test]
    fn test_submit_message_reports_redirect_target() {
        let outcome = SubmitOutcome::Redirected { url: "http://127.0.0.1:10000/login".to_string() };
        assert_eq!(submit_message(&outcome), "Backend redirected to http://127.0.0.1:10000/login");
        assert_eq!(
            submit_message(&SubmitOutcome::Stayed { status: 200 }),
            "Entry submitted, backend answered 200"
        );
    }

    #[test]
    fn test_describe_other_errors() {
        let error = anyhow::anyhow!("page is missing elements: pieChart");
        assert_eq!(describe(&error), "page is missing elements: pieChart");
    }
}
