//! Resume fit: requirement-by-requirement resume and job description analysis

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_fit::cli::{self, Cli, Commands, ConfigAction, TrackerAction};
use resume_fit::input::InputManager;
use resume_fit::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_fit::output::report::{AnalysisSession, ReportMetadata};
use resume_fit::output::writer::ExportFormat;
use resume_fit::processing::analyzer::AnalysisEngine;
use resume_fit::tracker::{ApplicationStatus, JobTracker, NewApplication};
use resume_fit::{Config, Result, ResumeFitError};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    if let Err(e) = run_command(cli.command, &config_path).await {
        if e.is_user_facing() {
            eprintln!("❌ {}", e);
            process::exit(2);
        }
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

/// `config path` and `config reset` never read the file, so they still
/// work when it is broken.
async fn run_command(command: Commands, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            output,
            save,
            detailed,
            local_only,
            export_dir,
            export_format,
        } => {
            let config = load_config(config_path)?;
            cli::validate_input_file(&resume)
                .map_err(|e| ResumeFitError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_input_file(&job)
                .map_err(|e| ResumeFitError::InvalidInput(format!("Job description file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeFitError::InvalidInput)?,
                None => config.output.format,
            };
            let export_format = ExportFormat::parse(&export_format).map_err(ResumeFitError::InvalidInput)?;
            let detailed = detailed || config.output.detailed;

            info!("Analyzing {} against {}", resume.display(), job.display());

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;

            let engine = AnalysisEngine::from_config(&config, local_only)?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("Evaluating requirements...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            let analysis = engine.analyze(&resume_text, &job_text).await;
            spinner.finish_and_clear();
            let result = analysis?;

            let session = AnalysisSession::new(
                resume_text,
                job_text,
                result,
                ReportMetadata::new(resume.display().to_string(), job.display().to_string()),
            );

            let generator =
                ReportGenerator::with_options(config.output.color_output, detailed, true, true, true);
            let report = generator.generate_report(&session, &output_format)?;
            println!("{}", report);

            if let Some(path) = save {
                let target = if path.is_dir() {
                    path.join(suggest_filename(&output_format, &resume.to_string_lossy(), true))
                } else {
                    path
                };
                let plain = ReportGenerator::with_options(false, detailed, true, true, true)
                    .generate_report(&session, &output_format)?;
                save_report_to_file(plain.as_bytes(), &target)?;
                println!("💾 Report saved to {}", target.display());
            }

            if let Some(dir) = export_dir {
                export_artifacts(&session, &dir, export_format)?;
            }
        }

        Commands::Tracker { action } => {
            let config = load_config(config_path)?;
            let mut tracker = JobTracker::load(&config.tracker.data_file)?;
            run_tracker(&mut tracker, action)?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let config = load_config(config_path)?;
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeFitError::Configuration(e.to_string()))?;
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset to defaults");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut config = load_config(config_path)?;
                config.set(&key, &value)?;
                config.save_to(config_path)?;
                println!("✅ {} = {}", key, value);
            }
        },
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    Config::load_from(path).map_err(|e| {
        error!("Failed to load configuration from {}", path.display());
        e
    })
}

/// Write the cover letter, enhanced resume and gap table into `dir`.
fn export_artifacts(session: &AnalysisSession, dir: &Path, format: ExportFormat) -> Result<()> {
    let letter = session.cover_letter()?;
    if letter.is_generated() {
        let path = write_artifact(dir, "cover_letter", "Cover Letter", &letter.text(), format)?;
        println!("✉️  Cover letter: {}", path.display());
    } else {
        println!("ℹ️  {}", letter.text());
    }

    let enhanced = session.enhanced_resume()?;
    let path = write_artifact(dir, "enhanced_resume", "Enhanced Resume", &enhanced, format)?;
    println!("📄 Enhanced resume: {}", path.display());

    let path = dir.join("gap_table.md");
    save_report_to_file(session.gap_table().as_bytes(), &path)?;
    println!("📊 Gap table: {}", path.display());

    Ok(())
}

fn write_artifact(dir: &Path, stem: &str, title: &str, text: &str, format: ExportFormat) -> Result<PathBuf> {
    let writer = format.writer(title);
    let path = dir.join(format!("{}.{}", stem, writer.extension()));
    save_report_to_file(&writer.write(text)?, &path)?;
    Ok(path)
}

fn run_tracker(tracker: &mut JobTracker, action: TrackerAction) -> Result<()> {
    match action {
        TrackerAction::Add {
            company,
            position,
            date,
            status,
            notes,
        } => {
            let date = date
                .map(|d| {
                    chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                        .map_err(|e| ResumeFitError::InvalidInput(format!("Invalid date {}: {}", d, e)))
                })
                .transpose()?;
            let status = status
                .map(|s| ApplicationStatus::parse(&s).map_err(ResumeFitError::InvalidInput))
                .transpose()?;

            let added = tracker.add(NewApplication {
                company,
                position,
                date,
                status,
                notes,
            })?;
            println!(
                "✅ Added #{}: {} at {} ({})",
                added.id, added.position, added.company, added.status
            );
        }

        TrackerAction::List => {
            if tracker.list().is_empty() {
                println!("No applications tracked yet ({})", tracker.path().display());
                return Ok(());
            }
            println!("{:>4}  {:<10}  {:<13}  {:<24}  {}", "ID", "Date", "Status", "Company", "Position");
            for app in tracker.list() {
                println!(
                    "{:>4}  {:<10}  {:<13}  {:<24}  {}",
                    app.id,
                    app.date.format("%Y-%m-%d"),
                    app.status.to_string(),
                    app.company,
                    app.position
                );
                if !app.notes.is_empty() {
                    println!("      📝 {}", app.notes);
                }
            }
        }

        TrackerAction::Status { id, status } => {
            let status = ApplicationStatus::parse(&status).map_err(ResumeFitError::InvalidInput)?;
            tracker.update_status(id, status)?;
            println!("✅ #{} is now {}", id, status);
        }

        TrackerAction::Notes { id, notes } => {
            tracker.update_notes(id, notes)?;
            println!("✅ Notes updated for #{}", id);
        }

        TrackerAction::Remove { id } => {
            let removed = tracker.remove(id)?;
            println!("🗑️  Removed #{}: {} at {}", removed.id, removed.position, removed.company);
        }
    }

    Ok(())
}
