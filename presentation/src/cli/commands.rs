//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for dockerizer
#[derive(Parser, Debug)]
#[command(name = "dockerizer")]
#[command(author, version, about = "Generate, build and test Docker configurations until they work")]
#[command(long_about = r#"
Dockerizer detects a project's stack and iterates on a Docker configuration
until the image builds and the container stays up.

Each attempt runs four steps:
1. Generate: the configured generator writes a Dockerfile (and friends)
2. Write: files are written into the project through the path sandbox
3. Build: docker build
4. Test: docker run, then check the container is still running

A failed attempt feeds its error into the next one.

Configuration files are loaded from (in priority order):
1. DOCKERIZER_* environment variables
2. --config <path>     Explicit config file
3. ./dockerizer.toml   Project-level config
4. ~/.config/dockerizer/config.toml   Global config

Example:
  dockerizer agent ./my-service --generator dockerizer-ai
  dockerizer agent --max-attempts 3 --instructions "Use a distroless runtime"
  dockerizer check-command "docker run -v /etc:/etc alpine"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the generate/build/test loop on a project
    Agent(AgentArgs),

    /// Check a command line against the shell tool policy without running it
    CheckCommand {
        /// Command line, e.g. "docker compose up -d"
        command: String,
    },

    /// List the registered tools
    Tools,
}

#[derive(Args, Debug, Clone)]
pub struct AgentArgs {
    /// Project directory (the sandbox root)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Maximum number of attempts (overrides agent.max_attempts)
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Instructions for the first attempt
    #[arg(long, value_name = "TEXT")]
    pub instructions: Option<String>,

    /// Generator program (overrides generator.command)
    #[arg(long, value_name = "PROGRAM")]
    pub generator: Option<String>,

    /// Print the run result as JSON
    #[arg(long)]
    pub json: bool,
}
