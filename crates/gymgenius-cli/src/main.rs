mod config;
mod export_cmd;
mod generator;
mod render;
mod session_cmd;
#[cfg(test)]
mod test_util;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};

use gymgenius_core::generate::{Equipment, FitnessGoal, GenerateRequest, RoutineGenerator};
use gymgenius_core::routine::build_plan_from_text;
use gymgenius_core::session::MSG_NOTHING_TO_EXPORT;
use gymgenius_core::{Completion, WorkoutSession};

use config::GymGeniusConfig;
use generator::CommandGenerator;

#[derive(Parser)]
#[command(name = "gymgenius", about = "AI workout routines with set tracking")]
struct Cli {
    /// Generator command line (overrides GYMGENIUS_GENERATOR env var)
    #[arg(long, global = true)]
    generator: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a routine and print it
    Generate {
        #[command(flatten)]
        request: RequestArgs,
        /// Save the raw routine text to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Parse a routine file (or `-` for stdin) and print it
    Show {
        /// Routine JSON file
        file: String,
    },
    /// Export a routine file to one CSV per day
    Export {
        /// Routine JSON file (or `-` for stdin)
        file: String,
        /// Output directory (defaults to config / GYMGENIUS_EXPORT_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Print aligned tables to stdout instead of writing CSV files
        #[arg(long)]
        stdout: bool,
    },
    /// Start an interactive editing and tracking session
    Session {
        /// Start from a saved routine file instead of generating one
        #[arg(long)]
        routine: Option<PathBuf>,
        #[command(flatten)]
        request: RequestArgs,
        /// Export directory for the `export` command
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Fitness goal: strength, hypertrophy, or endurance
    #[arg(long, default_value_t = FitnessGoal::Hypertrophy)]
    goal: FitnessGoal,
    /// Equipment you have (defaults to a full commercial gym)
    #[arg(long)]
    equipment: Option<String>,
    /// Short summary of your training history
    #[arg(long)]
    history: Option<String>,
}

impl RequestArgs {
    fn to_request(&self) -> anyhow::Result<GenerateRequest> {
        let equipment = match &self.equipment {
            None => Equipment::FullGym,
            Some(text) if text.trim().chars().count() >= 3 => Equipment::Listed(text.clone()),
            Some(_) => bail!("list at least one piece of equipment"),
        };
        let request = GenerateRequest::new(self.goal, &equipment);
        Ok(match &self.history {
            Some(history) => request.with_history(history.clone()),
            None => request,
        })
    }
}

/// Execute `gymgenius init`: write the default config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let path = config::config_path();
    if path.exists() && !force {
        bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }
    config::save_config_to(&path, &config::ConfigFile::default())?;
    println!("Config written to {}", path.display());
    Ok(())
}

/// Read a routine from a file path or `-` for stdin.
fn read_routine(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read routine from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(source).with_context(|| format!("failed to read routine file: {source}"))
}

async fn cmd_generate(
    generator: &dyn RoutineGenerator,
    request: &GenerateRequest,
    save: Option<&Path>,
) -> anyhow::Result<()> {
    let mut session = WorkoutSession::new();
    let Some(ticket) = session.begin_generation() else {
        bail!("a generation is already in progress");
    };

    let output = generator.generate(request).await;
    if let (Ok(output), Some(path)) = (&output, save) {
        std::fs::write(path, &output.routine)
            .with_context(|| format!("failed to save routine to {}", path.display()))?;
    }
    let result = output
        .map_err(Into::into)
        .and_then(|output| gymgenius_core::generate::ingest_routine(&output));
    match session.complete_generation(ticket, result) {
        Completion::Applied => {
            if let Some(workout) = session.workout() {
                print!("{}", render::render_workout(workout));
            }
            Ok(())
        }
        Completion::Failed(message) => bail!("{message}"),
        Completion::Stale | Completion::Busy => bail!("generation result was discarded"),
    }
}

fn cmd_show(source: &str) -> anyhow::Result<()> {
    let text = read_routine(source)?;
    let workout = build_plan_from_text(&text)
        .with_context(|| format!("failed to parse routine: {source}"))?;
    print!("{}", render::render_workout(&workout));
    Ok(())
}

fn cmd_export(source: &str, dir: &Path, to_stdout: bool) -> anyhow::Result<()> {
    let text = read_routine(source)?;
    let workout = build_plan_from_text(&text)
        .with_context(|| format!("failed to parse routine: {source}"))?;
    let mut session = WorkoutSession::new();
    session.load(workout);

    let sheets = match session.export() {
        Ok(sheets) => sheets,
        Err(_) => bail!("{MSG_NOTHING_TO_EXPORT}"),
    };
    if to_stdout {
        return export_cmd::print_sheets(&sheets);
    }
    let paths = export_cmd::write_sheets(&sheets, dir)?;
    println!("Exported {} sheets to {}", paths.len(), dir.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(force)?;
        }
        Commands::Generate { request, save } => {
            let resolved = GymGeniusConfig::resolve(cli.generator.as_deref(), None)?;
            let generator = CommandGenerator::new(&resolved.generator);
            cmd_generate(&generator, &request.to_request()?, save.as_deref()).await?;
        }
        Commands::Show { file } => {
            cmd_show(&file)?;
        }
        Commands::Export { file, dir, stdout } => {
            let resolved = GymGeniusConfig::resolve(cli.generator.as_deref(), dir.as_deref())?;
            cmd_export(&file, &resolved.export_dir, stdout)?;
        }
        Commands::Session {
            routine,
            request,
            export_dir,
        } => {
            let resolved =
                GymGeniusConfig::resolve(cli.generator.as_deref(), export_dir.as_deref())?;
            let generator = CommandGenerator::new(&resolved.generator);

            let mut session = WorkoutSession::new();
            if let Some(path) = routine {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read routine file: {}", path.display()))?;
                let workout = build_plan_from_text(&text)
                    .with_context(|| format!("failed to parse routine: {}", path.display()))?;
                session.load(workout);
            }

            let options = session_cmd::SessionOptions {
                generator: &generator,
                request: request.to_request()?,
                export_dir: &resolved.export_dir,
            };
            session_cmd::run_session(session, options).await?;
        }
    }

    Ok(())
}
