//! Configuration file management for gymgenius.
//!
//! Provides a TOML config file at `~/.config/gymgenius/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Env var overriding the generator command.
pub const GENERATOR_ENV: &str = "GYMGENIUS_GENERATOR";

/// Env var overriding the export directory.
pub const EXPORT_DIR_ENV: &str = "GYMGENIUS_EXPORT_DIR";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generator: GeneratorSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSection {
    /// Executable that prints a routine for a prompt.
    pub command: String,
    /// Arguments placed before the prompt.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            args: vec![
                "-p".to_string(),
                "--output-format".to_string(),
                "json".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSection {
    /// Directory where CSV files are written.
    pub directory: PathBuf,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the gymgenius config directory.
///
/// Uses XDG layout: `$XDG_CONFIG_HOME/gymgenius` or `~/.config/gymgenius`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("gymgenius");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("gymgenius")
}

/// Return the path to the gymgenius config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse a config file. Returns an error if it does not exist.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents).context("failed to parse config file")
}

/// Serialize and write a config file, creating parent dirs as needed.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GymGeniusConfig {
    pub generator: GeneratorSection,
    pub export_dir: PathBuf,
}

impl GymGeniusConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Generator: `cli_generator` > `GYMGENIUS_GENERATOR` > `[generator]` > `claude -p --output-format json`.
    ///   A flag or env value is a whitespace-separated command line.
    /// - Export dir: `cli_export_dir` > `GYMGENIUS_EXPORT_DIR` > `[export].directory` > `.`
    pub fn resolve(cli_generator: Option<&str>, cli_export_dir: Option<&Path>) -> Result<Self> {
        let path = config_path();
        let file_config = if path.exists() {
            Some(load_config_from(&path)?)
        } else {
            None
        };
        Self::resolve_with(
            cli_generator,
            cli_export_dir,
            std::env::var(GENERATOR_ENV).ok(),
            std::env::var(EXPORT_DIR_ENV).ok(),
            file_config,
        )
    }

    /// Resolution over explicit inputs (testable without env vars).
    pub fn resolve_with(
        cli_generator: Option<&str>,
        cli_export_dir: Option<&Path>,
        env_generator: Option<String>,
        env_export_dir: Option<String>,
        file_config: Option<ConfigFile>,
    ) -> Result<Self> {
        let file_config = file_config.unwrap_or_default();

        let generator = match cli_generator.map(str::to_string).or(env_generator) {
            Some(line) => parse_command_line(&line)?,
            None => file_config.generator,
        };

        let export_dir = if let Some(dir) = cli_export_dir {
            dir.to_path_buf()
        } else if let Some(dir) = env_export_dir {
            PathBuf::from(dir)
        } else {
            file_config.export.directory
        };

        Ok(Self {
            generator,
            export_dir,
        })
    }
}

fn parse_command_line(line: &str) -> Result<GeneratorSection> {
    let mut parts = line.split_whitespace().map(str::to_string);
    let command = parts
        .next()
        .with_context(|| format!("generator command is empty: {line:?}"))?;
    Ok(GeneratorSection {
        command,
        args: parts.collect(),
    })
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
