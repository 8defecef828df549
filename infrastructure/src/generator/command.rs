//! [`ConfigGenerator`] backed by an external program.
//!
//! The program receives `{"scan": ..., "instructions": "..."}` on stdin and
//! must print a JSON object with `dockerfile`, `docker_compose`,
//! `dockerignore` and `env_example` (plus optional `explanation` and
//! `warnings`) on stdout. A surrounding Markdown code fence is tolerated.

use async_trait::async_trait;
use dockerizer_application::ports::config_generator::{ConfigGenerator, GenerationError};
use dockerizer_application::ports::process_runner::{ProcessError, ProcessRunner};
use dockerizer_domain::core::string::tail_lines;
use dockerizer_domain::{FileSet, ScanResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// stderr lines kept in a failure message
const STDERR_TAIL_LINES: usize = 20;

#[derive(Serialize)]
struct GeneratorRequest<'a> {
    scan: &'a ScanResult,
    instructions: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeneratorResponse {
    #[serde(default)]
    dockerfile: String,
    #[serde(default)]
    docker_compose: String,
    #[serde(default)]
    dockerignore: String,
    #[serde(default)]
    env_example: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl CommandGenerator {
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        cwd: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
            runner,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl ConfigGenerator for CommandGenerator {
    async fn generate(
        &self,
        scan: &ScanResult,
        instructions: &str,
        cancel: &CancellationToken,
    ) -> Result<FileSet, GenerationError> {
        let request = serde_json::to_string(&GeneratorRequest { scan, instructions })
            .map_err(|e| GenerationError::Failed(format!("failed to encode request: {}", e)))?;

        debug!(program = %self.program, files = scan.file_count(), "Invoking generator");
        let output = self
            .runner
            .run_with_input(&self.program, &self.args, &self.cwd, Some(&request), cancel)
            .await
            .map_err(|e| match e {
                ProcessError::Cancelled { .. } => GenerationError::Cancelled,
                other => GenerationError::Failed(other.to_string()),
            })?;

        if !output.success() {
            let stderr = tail_lines(&output.stderr, STDERR_TAIL_LINES);
            return Err(GenerationError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status_text(),
                stderr.trim()
            )));
        }

        let files = parse_response(&output.stdout)?;
        info!(files = ?files.file_names(), "Generator produced file set");
        Ok(files)
    }
}

/// Decode generator stdout into a [`FileSet`].
pub fn parse_response(stdout: &str) -> Result<FileSet, GenerationError> {
    let body = strip_code_fence(stdout);
    if body.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let response: GeneratorResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    if let Some(explanation) = &response.explanation {
        debug!(%explanation, "Generator explanation");
    }
    for warning in &response.warnings {
        warn!(%warning, "Generator warning");
    }

    if response.dockerfile.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    Ok(FileSet {
        dockerfile: response.dockerfile,
        docker_compose: response.docker_compose,
        dockerignore: response.dockerignore,
        env_example: response.env_example,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::RecordingRunner;
    use dockerizer_application::ports::process_runner::ProcessOutput;

    const RESPONSE: &str = r#"{
        "dockerfile": "FROM node:20-alpine\nCMD [\"node\", \"server.js\"]\n",
        "dockerignore": "node_modules\n",
        "explanation": "Single-stage node image",
        "warnings": ["no lockfile found"]
    }"#;

    fn generator(runner: Arc<RecordingRunner>) -> CommandGenerator {
        CommandGenerator::new("dockerizer-ai", vec!["--model".into(), "fast".into()], "/srv/app", runner)
    }

    #[tokio::test]
    async fn test_request_on_stdin_and_response_parsed() {
        let runner = Arc::new(RecordingRunner::new().respond(ProcessOutput::new(Some(0), RESPONSE, "")));
        let mut scan = ScanResult::new("/srv/app");
        scan.key_files = vec!["package.json".into()];

        let files = generator(runner.clone())
            .generate(&scan, "Use port 3000", &CancellationToken::new())
            .await
            .unwrap();

        assert!(files.dockerfile.starts_with("FROM node:20-alpine"));
        assert_eq!(files.dockerignore, "node_modules\n");
        assert!(files.docker_compose.is_empty());

        let runs = runner.runs.lock().unwrap();
        assert_eq!(runs[0].argv(), "dockerizer-ai --model fast");
        let request: serde_json::Value =
            serde_json::from_str(runs[0].input.as_deref().unwrap()).unwrap();
        assert_eq!(request["instructions"], "Use port 3000");
        assert_eq!(request["scan"]["key_files"][0], "package.json");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let runner = Arc::new(
            RecordingRunner::new().respond(ProcessOutput::new(Some(2), "", "rate limited\n")),
        );
        let err = generator(runner)
            .generate(&ScanResult::new("/srv/app"), "x", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "generation failed: dockerizer-ai exited with exit status 2: rate limited"
        );
    }

    #[tokio::test]
    async fn test_cancelled_runner() {
        let runner = Arc::new(RecordingRunner::new().fail(ProcessError::Cancelled {
            program: "dockerizer-ai".into(),
        }));
        let err = generator(runner)
            .generate(&ScanResult::new("/srv/app"), "x", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::Cancelled);
    }

    #[test]
    fn test_fenced_response() {
        let fenced = format!("```json\n{}\n```\n", RESPONSE);
        let files = parse_response(&fenced).unwrap();
        assert!(files.dockerfile.contains("server.js"));
    }

    #[test]
    fn test_invalid_and_empty_responses() {
        assert!(matches!(
            parse_response("Sure! Here is your Dockerfile"),
            Err(GenerationError::InvalidResponse(_))
        ));
        assert_eq!(parse_response("  \n"), Err(GenerationError::EmptyResponse));
        assert_eq!(
            parse_response(r#"{"dockerignore": ".git"}"#),
            Err(GenerationError::EmptyResponse)
        );
    }
}
