//! Console output formatter

use super::formatter::OutputFormatter;
use colored::Colorize;
use dockerizer_domain::core::string::truncate;
use dockerizer_domain::tool::{DisallowedCommand, ParsedCommand, ToolSpec};
use dockerizer_domain::{Attempt, ConfigIssue, RunResult, Severity};

/// Attempt lines are cut to this many bytes
const SUMMARY_WIDTH: usize = 100;

/// Formats run results for console output
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Turn colored output off (`[output] color = false`)
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// Format the run summary
    pub fn format(result: &RunResult) -> String {
        let mut output = String::new();

        let title = if result.success {
            "Docker configuration ready"
        } else {
            "Docker configuration failed"
        };
        output.push_str(&Self::header(title));
        output.push_str("\n\n");

        output.push_str(&format!(
            "{} {} in {:.1}s\n",
            "Attempts:".cyan().bold(),
            result.attempt_count(),
            result.duration_ms() as f64 / 1000.0
        ));

        output.push_str(&Self::section_header("Attempts"));
        for attempt in &result.attempts {
            output.push_str(&Self::format_attempt(attempt));
        }

        if let Some(files) = &result.final_output {
            output.push_str(&Self::section_header("Files"));
            for name in files.file_names() {
                output.push_str(&format!("  {} {}\n", "+".green(), name));
            }
        } else if let Some(error) = result.last_error() {
            output.push_str(&Self::section_header("Last error"));
            output.push_str(&Self::indent(error, "  "));
            output.push('\n');
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_attempt(attempt: &Attempt) -> String {
        let duration = attempt
            .duration_ms()
            .map(|ms| format!(" ({} ms)", ms))
            .unwrap_or_default();
        if attempt.success {
            format!("  {} #{}{}\n", "✓".green(), attempt.number, duration.dimmed())
        } else {
            let phase = attempt
                .failed_phase
                .map(|p| p.display_name().to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let summary = attempt
                .error
                .as_deref()
                .and_then(|e| e.lines().next())
                .unwrap_or_default();
            format!(
                "  {} #{} {}: {}{}\n",
                "✗".red(),
                attempt.number,
                phase.yellow(),
                truncate(summary, SUMMARY_WIDTH),
                duration.dimmed()
            )
        }
    }

    /// Format as JSON
    pub fn format_json(result: &RunResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Registered tools with their parameters
    pub fn format_tools(spec: &ToolSpec) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header("Tools"));
        for tool in spec.all() {
            let risk = if tool.risk_level.is_side_effecting() {
                tool.risk_level.as_str().yellow()
            } else {
                tool.risk_level.as_str().dimmed()
            };
            output.push_str(&format!(
                "\n{} [{}]\n  {}\n",
                tool.name.bold(),
                risk,
                tool.description
            ));
            for param in &tool.parameters {
                let required = if param.required { "required" } else { "optional" };
                output.push_str(&format!(
                    "    {} ({}, {}): {}\n",
                    param.name.cyan(),
                    param.param_type,
                    required,
                    param.description
                ));
            }
        }
        output
    }

    /// Outcome of `check-command`
    pub fn format_check(result: &Result<ParsedCommand, DisallowedCommand>) -> String {
        match result {
            Ok(parsed) => format!(
                "{} allowed: {} {}",
                "✓".green(),
                parsed.program,
                parsed.args.join(" ")
            )
            .trim_end()
            .to_string(),
            Err(reason) => format!("{} disallowed: {}", "✗".red(), reason),
        }
    }

    /// One line per configuration issue
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &RunResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &RunResult) -> String {
        Self::format_json(result)
    }
}
