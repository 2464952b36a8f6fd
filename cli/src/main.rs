//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use roundtable_application::{
    ConversationLogger, DialogueHandle, DialogueObserver, NoConversationLogger, NoObserver,
    RunDialogueInput, RunDialogueUseCase,
};
use roundtable_domain::{AgentDescriptor, DialogueEnd, DialogueOutcome, DialoguePhase};
use roundtable_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, OllamaGateway};
use roundtable_presentation::{
    ClarificationPrompt, Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    let result = runtime.block_on(run(cli));
    // a pending stdin read cannot be cancelled; don't wait for it
    runtime.shutdown_background();
    result
}

/// Install the tracing subscriber; `-v` count picks the default level and
/// `RUST_LOG` overrides it.
fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match &cli.log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    for issue in config.ensure_valid()? {
        warn!("{}", issue.message);
    }

    let Some(prompt) = cli.prompt.clone() else {
        bail!("A prompt is required, e.g. roundtable \"Tabs or spaces?\"");
    };

    let agents = config.agent_descriptors();
    if !agents.iter().any(|a| a.enabled) {
        bail!(
            "No agents configured. Add [[agents]] entries to roundtable.toml \
             (see --show-config for the files that are read)."
        );
    }

    let mut dialogue_config = config.to_dialogue_config();
    if let Some(max_turns) = cli.max_turns {
        dialogue_config = dialogue_config.with_max_turns(max_turns);
    }
    if let Some(window) = cli.context_window {
        if window == 0 {
            bail!("--context-window must be at least 1");
        }
        dialogue_config = dialogue_config.with_context_window(window);
    }

    // === Dependency Injection ===
    let gateway = Arc::new(OllamaGateway::new().with_timeout(config.generation.timeout()));
    let formatter = || ConsoleFormatter::new(&agents).with_show_reasoning(!cli.hide_reasoning);

    let observer: Arc<dyn DialogueObserver> = match (cli.output, cli.quiet) {
        (OutputFormat::Live, false) => Arc::new(ProgressReporter::new(formatter())),
        (OutputFormat::Live, true) => Arc::new(SimpleProgress::new(formatter())),
        _ => Arc::new(NoObserver),
    };
    let conversation_logger = transcript_logger(&cli, &config);

    if cli.output == OutputFormat::Live && !cli.quiet {
        print_header(&prompt, &agents);
    }

    let use_case = RunDialogueUseCase::new(gateway)
        .with_config(dialogue_config)
        .with_observer(observer)
        .with_conversation_logger(conversation_logger);
    let handle = use_case.start(RunDialogueInput::new(prompt, agents.clone()))?;

    let control = handle.control();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, cancelling dialogue");
            control.cancel();
        }
    });

    answer_clarifications(&handle, &agents).await?;
    let outcome = handle.wait().await?;

    let formatter = formatter();
    let output = match cli.output {
        OutputFormat::Live => formatter.format_outcome(&outcome),
        OutputFormat::Transcript => formatter.format_transcript(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&outcome),
    };
    println!("{}", output);

    exit_status(&outcome)
}

/// Relay clarification questions to the terminal until the dialogue ends.
async fn answer_clarifications(handle: &DialogueHandle, agents: &[AgentDescriptor]) -> Result<()> {
    let mut updates = handle.subscribe();
    let mut prompt = ClarificationPrompt::stdin();

    loop {
        let pending = {
            let snapshot = updates.borrow_and_update();
            if snapshot.phase.is_terminal() {
                return Ok(());
            }
            snapshot.pending_clarification.clone()
        };

        if let Some(pending) = pending {
            let asker = agents
                .iter()
                .find(|a| a.id == pending.agent_id)
                .map(|a| a.display_name.as_str())
                .unwrap_or(pending.agent_id.as_str());

            let answer = tokio::select! {
                answer = prompt.ask(asker, &pending.question) => answer?,
                _ = updates.wait_for(|s| s.phase != DialoguePhase::ClarifyingSuspended) => {
                    continue;
                }
            };

            match answer {
                Some(answer) => {
                    // the dialogue may have been cancelled while we were reading
                    if let Err(e) = handle.submit_clarification_answer(answer) {
                        warn!("Answer not delivered: {}", e);
                    }
                }
                None => {
                    warn!("Input closed while a clarification was pending; cancelling");
                    handle.cancel();
                }
            }
        }

        if updates.changed().await.is_err() {
            return Ok(());
        }
    }
}

fn transcript_logger(cli: &Cli, config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let path = cli
        .transcript
        .clone()
        .or_else(|| config.logging.conversation_log.clone());

    match path.and_then(JsonlConversationLogger::new) {
        Some(logger) => {
            info!("Writing transcript to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

fn print_header(prompt: &str, agents: &[AgentDescriptor]) {
    let names: Vec<&str> = agents
        .iter()
        .filter(|a| a.enabled)
        .map(|a| a.display_name.as_str())
        .collect();
    println!();
    println!("{}", "=".repeat(60).cyan());
    println!("{:^60}", "Roundtable".bold());
    println!("{}", "=".repeat(60).cyan());
    println!();
    println!("{} {}", "Prompt:".cyan().bold(), prompt);
    println!("{} {}", "Agents:".cyan().bold(), names.join(", "));
    println!();
}

fn exit_status(outcome: &DialogueOutcome) -> Result<()> {
    match &outcome.end {
        DialogueEnd::Aborted { agent_id, error } => {
            bail!("Dialogue aborted: agent '{}' failed: {}", agent_id, error)
        }
        _ => Ok(()),
    }
}
