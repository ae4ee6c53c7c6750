//! CLI entry point for panetrack.

mod cli;

use clap::Parser;
use panetrack::config::{load_config, Config};
use panetrack::contracts::{CaptureWindow, KeyInjector};
use panetrack::error::TrackerError;
use panetrack::tmux::TmuxClient;
use panetrack::tracker::{
    CommandRecord, CommandStatus, CommandTracker, ExecuteRequest, ShellKind, SliceOptions,
    TrackerSettings,
};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Exit status when a wait gives up on a still-running command.
const EXIT_TIMED_OUT: i32 = 124;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_tracing();

    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(socket) = args.socket {
        config.tmux.socket = Some(socket);
    }

    let code = match dispatch(args.command, config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            1
        }
    };
    std::process::exit(code);
}

/// Log to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("PANETRACK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(command: cli::Command, config: Config) -> Result<i32, TrackerError> {
    let client = Arc::new(TmuxClient::from_config(&config.tmux));
    match command {
        cli::Command::Run(run) => run_command(client, config, run).await,
        cli::Command::SendKeys(send) => {
            match send.literal.as_deref() {
                Some(text) => client.send_text(&send.pane, text, send.enter).await?,
                None => {
                    client.send_keys(&send.pane, &send.keys).await?;
                    if send.enter {
                        client.send_text(&send.pane, "", true).await?;
                    }
                }
            }
            Ok(0)
        }
        cli::Command::Capture(capture) => {
            let lines = capture.lines.unwrap_or(config.tracker.capture_lines);
            let tracker = CommandTracker::with_backend(
                client,
                config.shell,
                TrackerSettings::from(&config.tracker),
            );
            for line in tracker
                .capture(&capture.pane, CaptureWindow::LastLines(lines))
                .await?
            {
                println!("{line}");
            }
            Ok(0)
        }
    }
}

async fn run_command(
    client: Arc<TmuxClient>,
    config: Config,
    run: cli::RunArgs,
) -> Result<i32, TrackerError> {
    let tracker =
        CommandTracker::with_backend(client, config.shell, TrackerSettings::from(&config.tracker));
    if let Some(shell) = run.shell.as_deref() {
        tracker
            .set_pane_shell(&run.pane, ShellKind::parse_or_default(shell))
            .await;
    }

    let mut request = ExecuteRequest::new(run.pane, run.command.join(" "));
    request.raw = run.raw;
    let id = tracker.execute(request).await?;

    let options = match run.tail {
        Some(tail) => SliceOptions::tail(tail),
        None => SliceOptions {
            start_line: run.start,
            end_line: run.end,
            last_lines: None,
        },
    };
    let record = tracker.wait(&id, &options, run.timeout).await?;
    print_json(&record);
    Ok(exit_code_for(&record))
}

fn exit_code_for(record: &CommandRecord) -> i32 {
    match record.status {
        CommandStatus::Completed => 0,
        CommandStatus::Error => match record.exit_code {
            Some(code @ 1..=255) => code,
            _ => 1,
        },
        CommandStatus::Pending if record.raw => 0,
        CommandStatus::Pending => EXIT_TIMED_OUT,
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("error: failed to encode output: {e}"),
    }
}
