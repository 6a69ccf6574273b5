use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use citeas_ack::config::{find_config_file, load_config, Config, FailurePolicy};
use citeas_ack::models::CitationFormat;
use citeas_ack::pipeline::{citeas_source, run};
use citeas_ack::ui::{print_status, Status};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build a markdown acknowledgments page from a requirements file using CiteAs
#[derive(Parser, Debug)]
#[command(name = "citeas-ack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate ACKNOWLEDGMENTS.md citations for the packages in a requirements file", long_about = None)]
struct Cli {
    /// Dependency manifest (default: ./requirements.txt)
    #[arg(long, short, env = "INPUT_INPUTFILE")]
    input: Option<PathBuf>,

    /// Citation style: 0=APS 1=Harvard 2=Nature 3=MLA 4=Chicago 5=Vancouver, or the style name
    #[arg(long, short, env = "INPUT_FORMATSELECT")]
    format: Option<CitationFormat>,

    /// Output file (default: ACKNOWLEDGMENTS.md)
    #[arg(long, short, env = "INPUT_OUTPUTFILE")]
    output: Option<PathBuf>,

    /// Contact email sent to CiteAs for usage tracking
    #[arg(long, env = "INPUT_EMAIL")]
    email: Option<String>,

    /// What to do when a package cannot be cited
    #[arg(long, value_enum)]
    on_failure: Option<OnFailure>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OnFailure {
    /// Stop at the first package that cannot be cited
    Abort,
    /// Leave it out and report it at the end
    Skip,
}

impl Cli {
    /// Flags and action inputs win over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.input_file = Some(input.clone());
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
        if let Some(email) = &self.email {
            config.email = email.clone();
        }
        if let Some(on_failure) = self.on_failure {
            config.on_failure = match on_failure {
                OnFailure::Abort => FailurePolicy::Abort,
                OnFailure::Skip => FailurePolicy::Skip,
            };
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("citeas_ack={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let mut config = load_config(config_path.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);

    if !cli.quiet {
        print_status(Status::Info, "Beginning citation generation process");
        print_status(
            Status::Info,
            &format!(
                "Input: {} ({} format)",
                config.manifest_path().display(),
                config.format
            ),
        );
    }

    let source = citeas_source(&config)?;
    let report = run(&config, &source)
        .await
        .with_context(|| format!("Citation generation from {} failed", config.manifest_path().display()))?;

    if !cli.quiet {
        for package in report.mangled() {
            print_status(
                Status::Warning,
                &format!("Authorship for {} appears to be mangled; check it on citeas.org", package),
            );
        }
    }

    if !report.is_complete() {
        for (package, reason) in &report.skipped {
            print_status(Status::Error, &format!("{}: {}", package, reason));
        }
        bail!(
            "{} of {} package(s) could not be cited; {} is incomplete",
            report.skipped.len(),
            report.skipped.len() + report.citations.len(),
            report.output.display()
        );
    }

    if !cli.quiet {
        print_status(
            Status::Success,
            &format!(
                "Citations generated: {} written to {}",
                report.citations.len(),
                report.output.display()
            ),
        );
    }

    Ok(())
}
