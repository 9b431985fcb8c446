//! Connection acceptor
//!
//! Owns the listening socket and the ChatServer actor. Spawns one handler
//! task per accepted connection and stops on cancellation, on an operator
//! `Stop` command, or when the actor exits for any other reason.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::handler::handle_connection;
use crate::server::{ChatServer, ServerCommand};

/// Bound chat server, ready to run
pub struct Listener {
    listener: TcpListener,
    config: Arc<Config>,
    cmd_tx: mpsc::Sender<ServerCommand>,
    cmd_rx: mpsc::Receiver<ServerCommand>,
}

impl Listener {
    /// Bind the listening socket
    ///
    /// Failure here is fatal: the caller should report it and exit.
    pub async fn bind(config: Config) -> Result<Self, AppError> {
        config.validate()?;

        let listener = TcpListener::bind(&config.address)
            .await
            .map_err(|source| AppError::Bind {
                addr: config.address.clone(),
                source,
            })?;

        let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);

        Ok(Self {
            listener,
            config: Arc::new(config),
            cmd_tx,
            cmd_rx,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, AppError> {
        Ok(self.listener.local_addr()?)
    }

    /// Sender for operator commands (`Stop`, `SessionCount`)
    pub fn commands(&self) -> mpsc::Sender<ServerCommand> {
        self.cmd_tx.clone()
    }

    /// Accept connections until shutdown
    pub async fn run(self, cancel: CancellationToken) -> Result<(), AppError> {
        let Self {
            listener,
            config,
            cmd_tx,
            cmd_rx,
        } = self;

        let mut server_task = tokio::spawn(ChatServer::new(cmd_rx).run(cancel.clone()));
        info!("Server is running. Waiting for connections.");

        // Connection accept loop
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutdown requested");
                    break;
                }
                _ = &mut server_task => {
                    info!("ChatServer stopped");
                    return Ok(());
                }
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            info!("New connection from {}", peer_addr);
                            let cmd_tx = cmd_tx.clone();
                            let config = Arc::clone(&config);

                            // Spawn handler task for each connection
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, peer_addr, cmd_tx, &config).await {
                                    error!("Connection handler error: {}", e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Failed to accept connection: {}", e);
                        }
                    }
                }
            }
        }

        drop(cmd_tx);
        if let Err(e) = server_task.await {
            error!("ChatServer task failed: {}", e);
        }
        Ok(())
    }
}

/// Bind to `config.address` and serve until `cancel` fires
pub async fn serve(config: Config, cancel: CancellationToken) -> Result<(), AppError> {
    info!("Server starting on {}...", config.address);
    Listener::bind(config).await?.run(cancel).await
}
