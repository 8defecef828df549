//! Progress reporting for agent runs
//!
//! The reporter is the receiving end of the agent's event channel. Step
//! events drive a spinner; outcome events are printed above it.

use colored::Colorize;
use dockerizer_domain::{AgentEvent, AgentEventType};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::sync::mpsc;

/// Renders [`AgentEvent`]s as a spinner plus one line per outcome
pub struct ProgressReporter {
    spinner: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    /// Reporter that draws nothing (for tests and non-terminals)
    pub fn hidden() -> Self {
        Self {
            spinner: ProgressBar::hidden(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn step_name(event_type: AgentEventType) -> Option<&'static str> {
        match event_type {
            AgentEventType::Analyzing => Some("Analyzing"),
            AgentEventType::Generating => Some("Generating"),
            AgentEventType::Building => Some("Building"),
            AgentEventType::Testing => Some("Testing"),
            AgentEventType::Fixing => Some("Fixing"),
            _ => None,
        }
    }

    /// Line printed above the spinner for an outcome event.
    pub fn outcome_line(event: &AgentEvent) -> Option<String> {
        match event.event_type {
            AgentEventType::Start => Some(format!("{} {}", "▶".cyan(), event.message.bold())),
            AgentEventType::Success => Some(format!("{} {}", "✓".green(), event.message.green())),
            AgentEventType::Error => {
                let detail = event
                    .data
                    .as_ref()
                    .and_then(|d| d.get("error"))
                    .and_then(|e| e.as_str())
                    .and_then(|e| e.lines().next())
                    .unwrap_or_default();
                Some(format!(
                    "{} {} {}",
                    "✗".red(),
                    event.message.red(),
                    detail.dimmed()
                ))
            }
            _ => None,
        }
    }

    /// Apply one event; returns `false` once the run is over.
    pub fn handle(&self, event: &AgentEvent) -> bool {
        if let Some(step) = Self::step_name(event.event_type) {
            self.spinner.set_prefix(step);
            self.spinner.set_message(event.message.clone());
        }
        if let Some(line) = Self::outcome_line(event) {
            self.spinner.println(line);
        }
        if event.event_type.is_terminal() {
            self.spinner.finish_and_clear();
            return false;
        }
        true
    }

    /// Consume events until the run completes or the sender goes away.
    pub async fn run(self, mut events: mpsc::Receiver<AgentEvent>) {
        while let Some(event) = events.recv().await {
            if !self.handle(&event) {
                break;
            }
        }
        self.spinner.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_line_shows_first_error_line() {
        colored::control::set_override(false);
        let event = AgentEvent::new(AgentEventType::Error, "Attempt 1 failed")
            .with_data(json!({"attempt": 1, "error": "build failed: exit status 1\nstep 3/7"}));
        assert_eq!(
            ProgressReporter::outcome_line(&event).unwrap(),
            "✗ Attempt 1 failed build failed: exit status 1"
        );
    }

    #[test]
    fn test_step_events_have_no_line() {
        let event = AgentEvent::new(AgentEventType::Building, "Building Docker image");
        assert!(ProgressReporter::outcome_line(&event).is_none());
    }

    #[test]
    fn test_handle_stops_on_complete() {
        let reporter = ProgressReporter::hidden();
        assert!(reporter.handle(&AgentEvent::new(AgentEventType::Testing, "Testing container")));
        assert!(!reporter.handle(&AgentEvent::new(AgentEventType::Complete, "Agent completed")));
    }

    #[tokio::test]
    async fn test_run_ends_when_sender_dropped() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(AgentEvent::new(AgentEventType::Start, "Starting agent"))
            .await
            .unwrap();
        drop(tx);
        ProgressReporter::hidden().run(rx).await;
    }
}
