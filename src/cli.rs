//! CLI interface for resume fit

use crate::config::OutputFormat;
use crate::input::file_detector::FileType;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-fit")]
#[command(version)]
#[command(about = "Requirement-by-requirement resume and job description fit analysis")]
#[command(long_about = "Score how well a resume covers each requirement of a job posting, \
    classify the overall fit, and produce a gap table, cover letter and enhanced resume")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze how well a resume fits a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD, DOCX)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (PDF, TXT, MD, DOCX)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown, html (defaults to output.format)
        #[arg(short, long)]
        output: Option<String>,

        /// Save the report to a file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Include evidence sentences for every requirement
        #[arg(short, long)]
        detailed: bool,

        /// Never call the remote evaluator
        #[arg(long)]
        local_only: bool,

        /// Write the cover letter, enhanced resume and gap table here
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Export format for cover letter and enhanced resume: txt, pdf, docx
        #[arg(long, default_value = "txt")]
        export_format: String,
    },

    /// Track job applications
    Tracker {
        #[command(subcommand)]
        action: TrackerAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum TrackerAction {
    /// Record a new application
    Add {
        /// Company name
        #[arg(long)]
        company: String,

        /// Position applied for
        #[arg(long)]
        position: String,

        /// Application date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Initial status: applied, interviewing, offer, rejected
        #[arg(long)]
        status: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// List tracked applications
    List,

    /// Change the status of an application
    Status {
        id: u32,
        status: String,
    },

    /// Replace the notes of an application
    Notes {
        id: u32,
        notes: String,
    },

    /// Remove an application
    Remove {
        id: u32,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "thresholds.strong_cutoff")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

/// Check that `path` has an extension the input manager recognises.
/// Recognised but unreadable types pass, so the manager can say how to convert them.
pub fn validate_input_file(path: &Path) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if FileType::from_extension(ext) != FileType::Unknown => Ok(()),
        Some(ext) => Err(format!(
            "Unsupported file extension: .{}. Allowed: {}",
            ext,
            FileType::SUPPORTED_EXTENSIONS.join(", ")
        )),
        None => Err("File has no extension".to_string()),
    }
}
