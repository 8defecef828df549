//! CLI entrypoint for dockerizer
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use dockerizer_application::ports::process_runner::ProcessRunner;
use dockerizer_application::ports::stack_pipeline::StackPipeline;
use dockerizer_application::{
    AgentEventEmitter, RunAgentError, RunAgentInput, RunAgentUseCase, ToolDispatcher,
    ToolExecutorPort,
};
use dockerizer_domain::{OutputFormat, RunResult};
use dockerizer_domain::config::has_errors;
use dockerizer_domain::tool::CommandPolicy;
use dockerizer_infrastructure::tools::stack::DEFAULT_GENERATE_INSTRUCTIONS;
use dockerizer_infrastructure::{
    CommandGenerator, ConfigLoader, DOCKER, FileConfig, ManifestStackPipeline, PathSandbox,
    TokioProcessRunner, WorkspaceScanner, default_tools, find_program,
};
use dockerizer_presentation::{AgentArgs, Cli, Command, ConsoleFormatter, ProgressReporter};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Generator name used when only listing tools.
const PLACEHOLDER_GENERATOR: &str = "dockerizer-ai";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?
    };

    ConsoleFormatter::set_color(config.output.color);

    match cli.command {
        Some(Command::Agent(args)) => run_agent(config, args, cli.quiet).await,
        Some(Command::CheckCommand { command }) => check_command(&command),
        Some(Command::Tools) => list_tools(&config),
        None => {
            eprintln!("No command given. Try `dockerizer agent` or `dockerizer --help`.");
            Ok(ExitCode::from(2))
        }
    }
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Dispatcher with every tool registered behind the configured inspectors.
fn build_dispatcher(
    config: &FileConfig,
    generator: Arc<CommandGenerator>,
    sandbox: Arc<PathSandbox>,
    runner: Arc<dyn ProcessRunner>,
) -> ToolDispatcher {
    let pipeline: Arc<dyn StackPipeline> = Arc::new(ManifestStackPipeline::new(generator));
    ToolDispatcher::new(config.inspectors.to_pipeline())
        .register_all(default_tools(sandbox, runner, pipeline))
}

async fn run_agent(mut config: FileConfig, args: AgentArgs, quiet: bool) -> Result<ExitCode> {
    // CLI flags override file configuration
    if let Some(max) = args.max_attempts {
        config.agent.max_attempts = max;
    }
    if let Some(generator) = args.generator {
        config.generator.command = Some(generator);
    }

    let json = args.json || config.output.format == Some(OutputFormat::Json);

    let issues = config.validate_for_agent();
    if !issues.is_empty() {
        eprintln!("{}", ConsoleFormatter::format_issues(&issues));
    }
    if has_errors(&issues) {
        bail!("invalid configuration");
    }

    if find_program(DOCKER).is_none() {
        warn!("`{}` not found in PATH; build and test steps will fail", DOCKER);
    }

    // === Dependency Injection ===
    let sandbox = Arc::new(PathSandbox::new(&args.path)?);
    let root = sandbox.root().to_path_buf();
    let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner::new());

    let command = config
        .generator
        .command()
        .context("generator.command is not set")?
        .to_string();
    let generator = Arc::new(CommandGenerator::new(
        command,
        config.generator.args.clone(),
        root.clone(),
        runner.clone(),
    ));
    let dispatcher = Arc::new(build_dispatcher(
        &config,
        generator.clone(),
        sandbox,
        runner,
    ));

    let (params, _) = config.agent.to_execution_params();
    let (events, receiver) = AgentEventEmitter::channel(params.event_buffer);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, cancelling");
                cancel.cancel();
            }
        });
    }

    let reporter = if quiet || json {
        drop(receiver);
        None
    } else {
        Some(tokio::spawn(ProgressReporter::new().run(receiver)))
    };

    let scan = {
        let root = root.clone();
        tokio::task::spawn_blocking(move || WorkspaceScanner::new().scan(&root)).await??
    };
    info!(
        root = %root.display(),
        files = scan.files.len(),
        "Starting agent"
    );

    let instructions = args
        .instructions
        .unwrap_or_else(|| DEFAULT_GENERATE_INSTRUCTIONS.to_string());

    let use_case = RunAgentUseCase::new(dispatcher, generator)
        .with_params(params)
        .with_events(events)
        .with_cancellation(cancel);

    let outcome = use_case.execute(RunAgentInput::new(scan, instructions)).await;
    // All senders must be gone for the reporter to finish
    drop(use_case);
    if let Some(reporter) = reporter {
        let _ = reporter.await;
    }

    let result = match outcome {
        Ok(result) => result,
        Err(RunAgentError::Cancelled(partial)) => {
            print_result(&partial, json);
            eprintln!("Cancelled");
            return Ok(ExitCode::from(130));
        }
        Err(e) => return Err(e.into()),
    };

    print_result(&result, json);

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_result(result: &RunResult, json: bool) {
    let output = if json {
        ConsoleFormatter::format_json(result)
    } else {
        ConsoleFormatter::format(result)
    };
    println!("{}", output);
}

fn check_command(command: &str) -> Result<ExitCode> {
    let root = std::env::current_dir()?.canonicalize()?;
    let result = CommandPolicy::new(root).validate(command);
    println!("{}", ConsoleFormatter::format_check(&result));
    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list_tools(config: &FileConfig) -> Result<ExitCode> {
    let sandbox = Arc::new(PathSandbox::new(".")?);
    let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner::new());
    let generator = Arc::new(CommandGenerator::new(
        config.generator.command().unwrap_or(PLACEHOLDER_GENERATOR),
        config.generator.args.clone(),
        sandbox.root().to_path_buf(),
        runner.clone(),
    ));
    let dispatcher = build_dispatcher(config, generator, sandbox, runner);

    println!("{}", ConsoleFormatter::format_tools(dispatcher.tool_spec()));
    println!(
        "Inspectors: {}",
        dispatcher.inspectors().names().join(", ")
    );
    Ok(ExitCode::SUCCESS)
}
