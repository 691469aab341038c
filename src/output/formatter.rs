//! Report formatters: console, JSON, Markdown and HTML

use crate::config::OutputFormat;
use crate::error::{Result, ResumeFitError};
use crate::output::report::{AnalysisSession, ReportMetadata};
use crate::processing::aggregator::{AnalysisResult, Classification};
use crate::processing::evaluator::StatusTier;
use askama::Template;
use colored::{Color, Colorize};
use serde::Serialize;
use std::path::Path;

/// Trait for formatting an analysis session
pub trait OutputFormatter {
    fn format_report(&self, session: &AnalysisSession) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: &'a ReportMetadata,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

struct HtmlRow<'a> {
    requirement: &'a str,
    status: &'static str,
    status_class: &'static str,
    score: u8,
    evidence: &'a str,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Fit Report</title>
    {% if include_styles %}
    <style>
        body { font-family: Georgia, 'Times New Roman', serif; color: #222; max-width: 960px; margin: 2em auto; padding: 0 1em; }
        header { border-bottom: 2px solid #2f5d8a; margin-bottom: 1.5em; }
        h2 { color: #2f5d8a; font-size: 1.2em; margin-top: 1.8em; }
        .badge { padding: 2px 10px; border-radius: 4px; color: #fff; font-size: 0.8em; vertical-align: middle; }
        .score-strong { background: #2e7d32; }
        .score-moderate { background: #f9a825; color: #222; }
        .score-weak { background: #c62828; }
        table { width: 100%; border-collapse: collapse; font-size: 0.95em; }
        th { background: #eef2f6; }
        th, td { text-align: left; padding: 6px 8px; border: 1px solid #d5dde5; vertical-align: top; }
        .status-yes { color: #2e7d32; }
        .status-partially { color: #9a6b00; }
        .status-no { color: #c62828; }
        ul.strengths li::marker { color: #2e7d32; }
        ul.gaps li::marker { color: #c62828; }
        footer { margin-top: 2em; font-size: 0.85em; color: #666; }
    </style>
    {% endif %}
</head>
<body>
    <header>
        <h1>Resume Fit Report</h1>
        <p>Overall score {{ overall_score }}% <span class="badge {{ score_class }}">{{ classification }}</span></p>
        <p>{{ explanation }}</p>
    </header>

    {% if !strengths.is_empty() %}
    <h2>Strengths</h2>
    <ul class="strengths">
    {% for strength in strengths %}
        <li>{{ strength }}</li>
    {% endfor %}
    </ul>
    {% endif %}

    {% if !gaps.is_empty() %}
    <h2>Gaps</h2>
    <ul class="gaps">
    {% for gap in gaps %}
        <li>{{ gap }}</li>
    {% endfor %}
    </ul>
    {% endif %}

    <h2>Requirements</h2>
    <table>
        <tr><th>Requirement</th><th>Status</th><th>Score</th><th>Evidence</th></tr>
        {% for row in rows %}
        <tr>
            <td>{{ row.requirement }}</td>
            <td class="{{ row.status_class }}">{{ row.status }}</td>
            <td>{{ row.score }}%</td>
            <td>{{ row.evidence }}</td>
        </tr>
        {% endfor %}
    </table>

    <footer>
        <p>{{ resume_file }} against {{ job_file }}, {{ generated_at }}</p>
        <p>resume-fit v{{ version }}, {{ backend }} evaluator</p>
    </footer>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate<'a> {
    include_styles: bool,
    generated_at: String,
    overall_score: u8,
    score_class: &'static str,
    classification: &'static str,
    explanation: &'a str,
    strengths: &'a [String],
    gaps: &'a [String],
    rows: Vec<HtmlRow<'a>>,
    version: &'a str,
    backend: String,
    resume_file: &'a str,
    job_file: &'a str,
}

fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn format_timestamp(metadata: &ReportMetadata) -> String {
    metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_classification_badge(&self, classification: Classification) -> String {
        let color = match classification {
            Classification::Strong => Color::Green,
            Classification::Moderate => Color::Yellow,
            Classification::Weak => Color::Red,
        };
        let badge = classification.label().to_uppercase();

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_status(&self, status: StatusTier) -> String {
        let (icon, color) = match status {
            StatusTier::Yes => ("✅", Color::Green),
            StatusTier::Partially => ("🟡", Color::Yellow),
            StatusTier::No => ("❌", Color::Red),
        };
        if self.use_colors {
            format!("{} {}", icon, status.as_str().color(color))
        } else {
            format!("[{}]", status)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, session: &AnalysisSession) -> Result<String> {
        let result = session.result();
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME FIT ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Evaluator: {}\n",
            format_timestamp(session.metadata()),
            result.backend
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Overall Score: {}% {}\n",
            result.overall_score,
            self.format_classification_badge(result.classification)
        ));
        output.push_str(&format!("{}\n", self.colorize(&result.explanation, Color::Cyan)));
        output.push_str(&format!("Requirements evaluated: {}\n", result.requirement_count()));

        if !result.strengths.is_empty() {
            output.push_str(&self.format_header("✅ Strengths", 3));
            for strength in &result.strengths {
                output.push_str(&format!("  • {}\n", self.colorize(strength, Color::Green)));
            }
        }

        if !result.gaps.is_empty() {
            output.push_str(&self.format_header("🎯 Gaps", 3));
            for gap in &result.gaps {
                output.push_str(&format!("  • {}\n", self.colorize(gap, Color::Yellow)));
            }
        }

        output.push_str(&self.format_header("Requirements", 2));
        for (i, evaluation) in result.evaluations.iter().enumerate() {
            output.push_str(&format!(
                "{:>2}. {} ({}%) {}\n",
                i + 1,
                self.format_status(evaluation.status),
                evaluation.score,
                evaluation.requirement
            ));
            if self.detailed {
                output.push_str(&format!(
                    "    Evidence: {}\n",
                    self.colorize(&evaluation.evidence, Color::BrightBlack)
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, session: &AnalysisSession) -> Result<String> {
        let report = JsonReport {
            metadata: session.metadata(),
            result: session.result(),
        };
        if self.pretty {
            Ok(serde_json::to_string_pretty(&report)?)
        } else {
            Ok(serde_json::to_string(&report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, session: &AnalysisSession) -> Result<String> {
        let result = session.result();
        let metadata = session.metadata();
        let mut output = String::new();

        output.push_str("# 📊 Resume Fit Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Evaluator:** {}\n",
                format_timestamp(metadata),
                result.backend
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                display_name(&metadata.resume_file),
                display_name(&metadata.job_file)
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Overall Score:** {}% ({})\n\n",
            result.overall_score, result.classification
        ));
        output.push_str(&format!("{}\n\n", result.explanation));

        if !result.strengths.is_empty() {
            output.push_str("### ✅ Strengths\n\n");
            for strength in &result.strengths {
                output.push_str(&format!("- {}\n", strength));
            }
            output.push('\n');
        }

        if !result.gaps.is_empty() {
            output.push_str("### 🎯 Gaps\n\n");
            for gap in &result.gaps {
                output.push_str(&format!("- {}\n", gap));
            }
            output.push('\n');
        }

        output.push_str("## Requirements\n\n");
        output.push_str(&session.gap_table());

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data<'a>(&self, session: &'a AnalysisSession) -> HtmlTemplate<'a> {
        let result = session.result();
        let metadata = session.metadata();

        let score_class = match result.classification {
            Classification::Strong => "score-strong",
            Classification::Moderate => "score-moderate",
            Classification::Weak => "score-weak",
        };

        let rows = result
            .evaluations
            .iter()
            .map(|e| HtmlRow {
                requirement: &e.requirement,
                status: e.status.as_str(),
                status_class: match e.status {
                    StatusTier::Yes => "status-yes",
                    StatusTier::Partially => "status-partially",
                    StatusTier::No => "status-no",
                },
                score: e.score,
                evidence: &e.evidence,
            })
            .collect();

        HtmlTemplate {
            include_styles: self.include_styles,
            generated_at: format_timestamp(metadata),
            overall_score: result.overall_score,
            score_class,
            classification: result.classification.label(),
            explanation: &result.explanation,
            strengths: &result.strengths,
            gaps: &result.gaps,
            rows,
            version: &metadata.tool_version,
            backend: result.backend.to_string(),
            resume_file: &metadata.resume_file,
            job_file: &metadata.job_file,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, session: &AnalysisSession) -> Result<String> {
        self.create_template_data(session)
            .render()
            .map_err(|e| ResumeFitError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn generate_report(&self, session: &AnalysisSession, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(session),
            OutputFormat::Json => self.json_formatter.format_report(session),
            OutputFormat::Markdown => self.markdown_formatter.format_report(session),
            OutputFormat::Html => self.html_formatter.format_report(session),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &[u8], file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };
    format!("{}_fit{}.{}", base_name, timestamp_suffix, extension)
}
