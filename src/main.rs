//! Netchat - Entry Point
//!
//! Selects server or client mode, installs logging and the interrupt
//! handler, and maps startup failures to the process exit status.

use std::env;
use std::io::{self, BufRead};
use std::process::ExitCode;
use std::thread;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use netchat::cli::{usage, Mode};
use netchat::client::{self, StdoutView};
use netchat::{serve, AppError, Config};

/// Buffered submitted lines waiting to be sent
const INPUT_BUFFER_SIZE: usize = 32;

#[tokio::main]
async fn main() -> ExitCode {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "netchat".to_string());

    let mode = match Mode::parse(args) {
        Some(Mode::Help) => {
            eprintln!("{}", usage(&program));
            return ExitCode::SUCCESS;
        }
        Some(mode) => mode,
        None => {
            eprintln!("{}", usage(&program));
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=netchat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netchat=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cancel = CancellationToken::new();
    let shutdown_token = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            error!("Error waiting for shutdown signal: {}", e);
            return;
        }
        info!("Received interrupt signal, shutting down gracefully...");
        shutdown_token.cancel();
    });

    let result = match mode {
        Mode::Server => run_server(cancel).await,
        Mode::Client => run_client(cancel).await,
        Mode::Help => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Terminating Netchat: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_server(cancel: CancellationToken) -> Result<(), AppError> {
    let config = Config::load()?;
    serve(config, cancel).await
}

async fn run_client(cancel: CancellationToken) -> Result<(), AppError> {
    let config = Config::load()?;

    let (input_tx, input_rx) = mpsc::channel(INPUT_BUFFER_SIZE);
    // Plain thread: a blocked stdin read must not hold up runtime shutdown
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    let mut view = StdoutView;
    client::run(&config, input_rx, &mut view, cancel).await
}

async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }

    Ok(())
}
