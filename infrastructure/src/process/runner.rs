//! Tokio-backed [`ProcessRunner`].

use async_trait::async_trait;
use dockerizer_application::ports::process_runner::{ProcessError, ProcessOutput, ProcessRunner};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Maximum captured size per stream (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Runs programs as argv, never through a shell.
#[derive(Debug, Clone)]
pub struct TokioProcessRunner {
    max_output: usize,
}

impl Default for TokioProcessRunner {
    fn default() -> Self {
        Self {
            max_output: MAX_OUTPUT_SIZE,
        }
    }
}

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_output(mut self, bytes: usize) -> Self {
        self.max_output = bytes;
        self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run_with_input(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
        input: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        if cancel.is_cancelled() {
            return Err(ProcessError::Cancelled {
                program: program.to_string(),
            });
        }

        debug!(program, ?args, cwd = %cwd.display(), "Spawning process");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| ProcessError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;

        // stdin is written concurrently with output capture
        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            let input = input.to_string();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    trace!(error = %e, "stdin closed early");
                }
            });
        }

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let max = self.max_output;
        let collect = async {
            tokio::try_join!(
                read_capped(stdout, max),
                read_capped(stderr, max),
                child.wait()
            )
        };

        let (stdout, stderr, status) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(program, "Process wait cancelled");
                return Err(ProcessError::Cancelled { program: program.to_string() });
            }
            result = collect => result.map_err(|e| ProcessError::Io {
                program: program.to_string(),
                message: e.to_string(),
            })?,
        };

        let status = status.code();
        debug!(program, ?status, "Process finished");

        Ok(ProcessOutput::new(
            status,
            cap_output(&stdout, max),
            cap_output(&stderr, max),
        ))
    }
}

/// Read at most `max + 1` bytes, discarding the rest of the stream so the
/// child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(
    stream: Option<R>,
    max: usize,
) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let Some(mut stream) = stream else {
        return Ok(buf);
    };
    (&mut stream).take(max as u64 + 1).read_to_end(&mut buf).await?;
    if buf.len() > max {
        tokio::io::copy(&mut stream, &mut tokio::io::sink()).await?;
    }
    Ok(buf)
}

fn cap_output(bytes: &[u8], max: usize) -> String {
    let mut text = String::from_utf8_lossy(bytes).into_owned();
    if text.len() > max {
        let mut end = max;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("\n... (output truncated)");
    }
    text
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_captures_both_streams_and_status() {
        let runner = TokioProcessRunner::new();
        let output = runner
            .run(
                "sh",
                &args(&["-c", "printf out; printf err >&2; exit 3"]),
                Path::new("."),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(output.status, Some(3));
        assert_eq!(output.stdout, "out");
        assert_eq!(output.stderr, "err");
        assert_eq!(output.combined(), "outerr");
    }

    #[tokio::test]
    async fn test_feeds_stdin() {
        let runner = TokioProcessRunner::new();
        let output = runner
            .run_with_input(
                "cat",
                &[],
                Path::new("."),
                Some("{\"instructions\":\"hi\"}"),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "{\"instructions\":\"hi\"}");
    }

    #[tokio::test]
    async fn test_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let output = TokioProcessRunner::new()
            .run("pwd", &[], dir.path(), &CancellationToken::new())
            .await
            .unwrap();
        let name = dir.path().file_name().unwrap().to_str().unwrap();
        assert!(output.stdout.trim_end().ends_with(name));
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let err = TokioProcessRunner::new()
            .run(
                "definitely-not-a-real-program-xyz",
                &[],
                Path::new("."),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_cancellation_stops_waiting() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let err = TokioProcessRunner::new()
            .run("sleep", &args(&["5"]), Path::new("."), &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_large_output_is_capped_while_reading() {
        let output = TokioProcessRunner::new()
            .with_max_output(16)
            .run(
                "sh",
                &args(&["-c", "head -c 300000 /dev/zero | tr '\\0' a; printf done >&2"]),
                Path::new("."),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, format!("{}\n... (output truncated)", "a".repeat(16)));
        assert_eq!(output.stderr, "done");
    }

    #[tokio::test]
    async fn test_read_capped_keeps_one_byte_past_limit() {
        let data: &[u8] = b"0123456789";
        assert_eq!(read_capped(Some(data), 4).await.unwrap(), b"01234");
        assert_eq!(read_capped(Some(data), 64).await.unwrap(), data);
        assert!(read_capped(None::<&[u8]>, 4).await.unwrap().is_empty());
    }

    #[test]
    fn test_cap_output() {
        assert_eq!(cap_output(b"short", 10), "short");
        let capped = cap_output("aé".repeat(10).as_bytes(), 4);
        assert!(capped.starts_with("aé"));
        assert!(capped.ends_with("(output truncated)"));
    }
}
