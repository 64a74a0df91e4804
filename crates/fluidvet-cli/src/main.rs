//! Fluidvet CLI
//!
//! Compute IV fluid plans and keep reevaluation sessions for canine and feline
//! patients.
//!
//! Usage:
//!   fluidvet plan --species dog --weight 10 [--state rehydration --dehydration 6]
//!   fluidvet start --session rex.json --species dog --weight 10
//!   fluidvet reeval --session rex.json --urine-output 0.8 --heart-rate 150 ...
//!   fluidvet export --session rex.json --format pdf --output rex.pdf
//!   fluidvet verify --session rex.json

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fluidvet_core::export::{history_to_csv, plan_report, plan_to_csv, record_paragraph, session_report};
use fluidvet_core::models::{ClinicalWarning, PlanRequest, PlanResult};
use fluidvet_core::{ClinicalSession, EngineDefaults, LabelNormalizer};

mod args;
mod pdf;
mod session_file;

use args::{PlanArgs, VitalsArgs};

#[derive(Parser)]
#[command(name = "fluidvet")]
#[command(version)]
#[command(about = "IV fluid therapy plans and reevaluation sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Defaults file (JSON)
    #[arg(long, env = "FLUIDVET_CONFIG")]
    config: Option<PathBuf>,

    /// Output format for plan, start and reeval
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a plan and print it with any clinical warnings
    Plan {
        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Compute a plan and start a new session file
    Start {
        /// Session file to create
        #[arg(long)]
        session: PathBuf,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Recompute the plan of an existing session, keeping its history
    Replan {
        /// Session file
        #[arg(long)]
        session: PathBuf,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Record a reevaluation and save the session
    Reeval {
        /// Session file
        #[arg(long)]
        session: PathBuf,

        #[command(flatten)]
        vitals: VitalsArgs,
    },

    /// Export a session
    Export {
        /// Session file
        #[arg(long)]
        session: PathBuf,

        /// Export format
        #[arg(long, value_enum)]
        format: ExportFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a session file's record chain
    Verify {
        /// Session file
        #[arg(long)]
        session: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Report,
    Pdf,
    Json,
}

/// JSON output for a computed plan.
#[derive(Serialize)]
struct PlanOutput<'a> {
    request: &'a PlanRequest,
    plan: &'a PlanResult,
    warnings: &'a [ClinicalWarning],
}

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fluidvet=info,fluidvet_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let defaults = match &cli.config {
        Some(path) => EngineDefaults::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineDefaults::default(),
    };
    let normalizer = LabelNormalizer::new();

    match cli.command {
        Commands::Plan { plan } => {
            let request = plan.to_request(&defaults, &normalizer)?;
            let result = request.compute()?;
            let warnings = request.warnings(&result);
            print_plan(cli.format, &request, &result, &warnings)?;
        }

        Commands::Start { session, plan } => {
            let request = plan.to_request(&defaults, &normalizer)?;
            let clinical = ClinicalSession::new(request)?;
            session_file::create(&session, &clinical)?;
            info!(session_id = %clinical.session_id, path = %session.display(), "Session started");
            print_plan(
                cli.format,
                clinical.request(),
                clinical.plan(),
                &clinical.warnings(),
            )?;
        }

        Commands::Replan { session, plan } => {
            let mut clinical = session_file::load(&session)?;
            let request = plan.to_request(&defaults, &normalizer)?;
            clinical.replan(request)?;
            session_file::save(&session, &clinical)?;
            print_plan(
                cli.format,
                clinical.request(),
                clinical.plan(),
                &clinical.warnings(),
            )?;
        }

        Commands::Reeval { session, vitals } => {
            let mut clinical = session_file::load(&session)?;
            let vitals = vitals.to_vitals(&normalizer)?;
            let record = clinical.reevaluate(vitals)?.clone();
            session_file::save(&session, &clinical)?;

            match cli.format {
                OutputFormat::Text => println!("{}", record_paragraph(&record)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Csv => print!("{}", history_to_csv(clinical.history())),
            }
        }

        Commands::Export {
            session,
            format,
            output,
        } => {
            let clinical = session_file::load(&session)?;
            let bytes = match format {
                ExportFormat::Csv => history_to_csv(clinical.history()).into_bytes(),
                ExportFormat::Report => session_report(&clinical).into_bytes(),
                ExportFormat::Pdf => pdf::session_pdf(&clinical)?,
                ExportFormat::Json => clinical.to_json()?.into_bytes(),
            };
            write_output(output.as_deref(), &bytes)?;
            info!(session_id = %clinical.session_id, ?format, "Session exported");
        }

        Commands::Verify { session } => {
            let clinical = session_file::load(&session)?;
            let history = clinical.history();
            println!(
                "OK: {} reevaluation(s), peak risk {}, head {}",
                history.len(),
                history.peak_risk(),
                history.head_hash().unwrap_or("-")
            );
        }
    }

    Ok(())
}

fn print_plan(
    format: OutputFormat,
    request: &PlanRequest,
    plan: &PlanResult,
    warnings: &[ClinicalWarning],
) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", plan_report(request, plan, warnings)),
        OutputFormat::Json => {
            let output = PlanOutput {
                request,
                plan,
                warnings,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => print!("{}", plan_to_csv(plan)),
    }
    Ok(())
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => io::stdout().write_all(bytes)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export() {
        let cli = Cli::try_parse_from([
            "fluidvet",
            "export",
            "--session",
            "rex.json",
            "--format",
            "pdf",
            "-o",
            "rex.pdf",
        ])
        .unwrap();

        match cli.command {
            Commands::Export { format, output, .. } => {
                assert_eq!(format, ExportFormat::Pdf);
                assert_eq!(output, Some(PathBuf::from("rex.pdf")));
            }
            _ => panic!("expected export"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_plan_with_global_format() {
        let cli = Cli::try_parse_from([
            "fluidvet",
            "--format",
            "json",
            "plan",
            "--species",
            "gato",
            "--weight",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Plan { .. }));
    }
}
