//! Command policy for the `shell` tool.
//!
//! Only the container CLI (`docker`, `docker-compose`) may be run, and only
//! with arguments that cannot reach the host: no shell metacharacters, no
//! host-namespace or capability flags, no bind mounts outside the sandbox root
//! and no `exec`/`run` through compose.
//!
//! Validation is purely lexical. The caller runs the returned
//! [`ParsedCommand`] directly (argv, no shell), so the tokens checked here are
//! exactly the tokens executed.

use super::value_objects::ToolError;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Characters that give a command line shell semantics.
pub const BLOCKED_METACHARACTERS: &[char] = &['\n', '\r', '>', '<', '|', '$', '`', ';', '&'];

/// Programs the `shell` tool may start (matched on the base name).
pub const ALLOWED_PROGRAMS: &[&str] = &["docker", "docker-compose"];

/// Docker flags that break container isolation (prefix match).
pub const DANGEROUS_DOCKER_FLAGS: &[&str] = &[
    "--privileged",
    "--pid=host",
    "--network=host",
    "--net=host",
    "--userns=host",
    "--uts=host",
    "--ipc=host",
    "--cap-add",
    "--security-opt",
    "--device",
];

/// Namespace flags that are dangerous when followed by a separate `host` token.
const HOST_NAMESPACE_FLAGS: &[&str] = &["--pid", "--network", "--net", "--userns", "--uts", "--ipc"];

/// Host directories that may never be mounted.
pub const SENSITIVE_HOST_ROOTS: &[&str] = &["/", "/etc", "/var", "/usr", "/root", "/home"];

/// Compose verbs that run arbitrary commands in a container.
pub const DENIED_COMPOSE_VERBS: &[&str] = &["exec", "run"];

/// Reason a command line was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisallowedCommand {
    #[error("empty command")]
    Empty,

    #[error("shell metacharacter not allowed: {0:?}")]
    Metacharacter(char),

    #[error("command chaining not allowed")]
    Chaining,

    #[error("only docker and docker-compose commands are allowed, got: {0}")]
    ProgramNotAllowed(String),

    #[error("dangerous docker flag not allowed: {0}")]
    DangerousFlag(String),

    #[error("volume mount outside working directory not allowed: {0}")]
    VolumeOutsideRoot(String),

    #[error("path traversal in volume mount not allowed: {0}")]
    VolumeTraversal(String),

    #[error("mounting sensitive host path not allowed: {0}")]
    SensitiveMount(String),

    #[error("docker-compose {0} not allowed")]
    ComposeVerbDenied(String),
}

impl From<DisallowedCommand> for ToolError {
    fn from(err: DisallowedCommand) -> Self {
        ToolError::disallowed_command(err.to_string())
    }
}

/// A validated command, ready to be executed as argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Base name of the program (`docker` or `docker-compose`)
    pub program: String,
    pub args: Vec<String>,
}

/// Validator for `shell` command lines, bound to a sandbox root.
#[derive(Debug, Clone)]
pub struct CommandPolicy {
    sandbox_root: PathBuf,
}

impl CommandPolicy {
    /// `sandbox_root` should already be canonical; comparisons are lexical.
    pub fn new(sandbox_root: impl Into<PathBuf>) -> Self {
        Self {
            sandbox_root: sandbox_root.into(),
        }
    }

    pub fn sandbox_root(&self) -> &Path {
        &self.sandbox_root
    }

    pub fn validate(&self, command_line: &str) -> Result<ParsedCommand, DisallowedCommand> {
        let command_line = command_line.trim();

        if let Some(c) = command_line
            .chars()
            .find(|c| BLOCKED_METACHARACTERS.contains(c))
        {
            return Err(DisallowedCommand::Metacharacter(c));
        }
        if command_line.contains("&&") || command_line.contains("||") {
            return Err(DisallowedCommand::Chaining);
        }

        let mut tokens = command_line.split_whitespace().map(str::to_string);
        let first = tokens.next().ok_or(DisallowedCommand::Empty)?;
        let args: Vec<String> = tokens.collect();

        let program = Path::new(&first)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(first.as_str())
            .to_string();

        match program.as_str() {
            "docker" => {
                self.check_docker_args(&args)?;
                // Global flags may precede the subcommand
                if let Some(pos) = args.iter().position(|a| a == "compose") {
                    check_compose_args(&args[pos + 1..])?;
                }
            }
            "docker-compose" => check_compose_args(&args)?,
            _ => return Err(DisallowedCommand::ProgramNotAllowed(program)),
        }

        Ok(ParsedCommand { program, args })
    }

    fn check_docker_args(&self, args: &[String]) -> Result<(), DisallowedCommand> {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            let next = args.get(i + 1).map(String::as_str);

            if let Some(flag) = DANGEROUS_DOCKER_FLAGS.iter().find(|f| arg.starts_with(*f)) {
                return Err(DisallowedCommand::DangerousFlag(flag.to_string()));
            }
            if HOST_NAMESPACE_FLAGS.contains(&arg) && next == Some("host") {
                return Err(DisallowedCommand::DangerousFlag(format!("{}=host", arg)));
            }

            if arg == "-v" || arg == "--volume" {
                if let Some(spec) = next {
                    self.check_volume_spec(spec)?;
                    i += 1;
                }
            } else if let Some(spec) = arg.strip_prefix("--volume=") {
                self.check_volume_spec(spec)?;
            } else if let Some(spec) = grouped_volume_spec(arg) {
                if !spec.is_empty() {
                    self.check_volume_spec(spec)?;
                } else if let Some(spec) = next {
                    self.check_volume_spec(spec)?;
                    i += 1;
                }
            } else if arg == "--mount" {
                if let Some(spec) = next {
                    self.check_mount_spec(spec)?;
                    i += 1;
                }
            } else if let Some(spec) = arg.strip_prefix("--mount=") {
                self.check_mount_spec(spec)?;
            }

            i += 1;
        }
        Ok(())
    }

    /// `[host-src:]container-dest[:options]`; the first segment is checked.
    fn check_volume_spec(&self, spec: &str) -> Result<(), DisallowedCommand> {
        let host = spec.split(':').next().unwrap_or_default();
        self.check_host_source(host)
    }

    /// Comma separated `key=value` pairs; only bind sources are host paths.
    fn check_mount_spec(&self, spec: &str) -> Result<(), DisallowedCommand> {
        let mut is_bind = false;
        let mut source = None;
        for pair in spec.split(',') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key.trim() {
                "type" => is_bind = value.trim() == "bind",
                "source" | "src" => source = Some(value.trim()),
                _ => {}
            }
        }
        match source {
            Some(src) if is_bind => self.check_host_source(src),
            _ => Ok(()),
        }
    }

    fn check_host_source(&self, host: &str) -> Result<(), DisallowedCommand> {
        if host.is_empty() {
            return Ok(());
        }

        let path = Path::new(host);
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(DisallowedCommand::VolumeTraversal(host.to_string()));
        }
        if !path.is_absolute() {
            // Named volume or root-relative path
            return Ok(());
        }

        let trimmed = host.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        if SENSITIVE_HOST_ROOTS.contains(&normalized) {
            return Err(DisallowedCommand::SensitiveMount(host.to_string()));
        }

        if !path.starts_with(&self.sandbox_root) {
            let under_sensitive = SENSITIVE_HOST_ROOTS
                .iter()
                .filter(|root| **root != "/")
                .any(|root| path.starts_with(root));
            if under_sensitive {
                return Err(DisallowedCommand::SensitiveMount(host.to_string()));
            }
            return Err(DisallowedCommand::VolumeOutsideRoot(host.to_string()));
        }

        Ok(())
    }
}

/// Volume spec carried by a group of short flags containing `v`
/// (`-vSPEC`, `-v=SPEC`, `-itv SPEC`, `-itvSPEC`). Empty when the spec is
/// the next token.
fn grouped_volume_spec(arg: &str) -> Option<&str> {
    let flags = arg.strip_prefix('-').filter(|f| !f.starts_with('-'))?;
    let letters = flags
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(flags.len());
    let v = flags[..letters].find('v')?;
    let rest = &flags[v + 1..];
    Some(rest.strip_prefix('=').unwrap_or(rest))
}

fn check_compose_args(args: &[String]) -> Result<(), DisallowedCommand> {
    match args
        .iter()
        .find(|arg| DENIED_COMPOSE_VERBS.contains(&arg.as_str()))
    {
        Some(verb) => Err(DisallowedCommand::ComposeVerbDenied(verb.clone())),
        None => Ok(()),
    }
}
