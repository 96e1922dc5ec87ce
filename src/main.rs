use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;

use bug_report_frame::{
    config, init_config, init_telemetry, submission_metrics, Frame, FrameConfig, LoggingHost, Severity,
    SimulatedBackend, Step, SubmissionState,
};

#[derive(Parser)]
#[command(name = "bug-frame")]
#[command(about = "File a bug report through the three-step bug report frame")]
#[command(long_about = "Drives the bug report frame from the command line: fills in the title, \
                       description and severity steps, then runs the simulated submission and \
                       prints what the frame shows.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the wizard and submit a bug report
    Report {
        /// Concise bug title
        #[arg(long)]
        title: String,
        /// What happened and steps to reproduce
        #[arg(long)]
        description: String,
        /// low, medium, high or critical
        #[arg(long, default_value = "medium")]
        severity: Severity,
        /// Make the simulated backend fail
        #[arg(long, help = "Simulate a failed submission")]
        fail: bool,
        /// Override the simulated submission delay
        #[arg(long, help = "Simulated submission delay in milliseconds")]
        delay_ms: Option<u64>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry(&config()?.observability)?;
    let config = init_config()?;

    match cli.command {
        Commands::Report {
            title,
            description,
            severity,
            fail,
            delay_ms,
        } => {
            let mut config = config.clone();
            if let Some(delay_ms) = delay_ms {
                config.submission.delay_ms = delay_ms;
            }
            tokio::runtime::Runtime::new()?.block_on(async {
                report_command(config, title, description, severity, fail).await
            })
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

async fn report_command(
    config: FrameConfig,
    title: String,
    description: String,
    severity: Severity,
    fail: bool,
) -> Result<()> {
    let mut backend = SimulatedBackend::from_config(&config.submission);
    if fail {
        backend = backend.failing_with("Simulated submission failure");
    }
    let backend = Arc::new(backend);

    let mut frame = Frame::new(config, backend.clone(), Arc::new(LoggingHost));
    frame.load();

    frame.set_title(title);
    if frame.next() != Step::Description {
        bail!("Bug title must not be empty");
    }
    frame.set_description(description);
    if frame.next() != Step::Review {
        bail!("Bug description must not be empty");
    }
    frame.set_severity(severity);
    println!("{}\n", frame.view());

    let state = frame.submit().await.clone();
    println!("{}", frame.view());
    submission_metrics().log_stats();

    match state {
        SubmissionState::Succeeded => {
            for notification in backend.notifications() {
                println!("\n{}", notification.message);
            }
            Ok(())
        }
        SubmissionState::Failed(message) => bail!(message),
        other => bail!("Submission did not finish: {other:?}"),
    }
}
