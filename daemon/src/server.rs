use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::protocol::{
    ErrorCode, ErrorResponse, FrontendEvent, FrontendRequest, FrontendResponse, ResponseBody,
};
use crate::session::{spawn_session, SessionServices};

pub struct TypeaheadServer {
    config: ServerConfig,
    services: SessionServices,
}

impl TypeaheadServer {
    pub fn new(config: ServerConfig, services: SessionServices) -> Self {
        Self { config, services }
    }

    pub async fn run(&self) -> Result<()> {
        self.prepare_socket_path().await?;
        if self.config.socket_path.exists() {
            fs::remove_file(&self.config.socket_path)
                .await
                .with_context(|| {
                    format!(
                        "failed to cleanup stale socket {}",
                        self.config.socket_path.display()
                    )
                })?;
        }

        let listener = UnixListener::bind(&self.config.socket_path).with_context(|| {
            format!(
                "failed to bind unix socket at {}",
                self.config.socket_path.display()
            )
        })?;
        info!(
            "typeahead daemon listening on {}",
            self.config.socket_path.display()
        );

        loop {
            let (stream, _) = listener.accept().await?;
            let services = self.services.clone();
            tokio::spawn(async move {
                if let Err(error) = handle_connection(stream, services).await {
                    warn!("connection closed with error: {error:#}");
                }
            });
        }
    }

    async fn prepare_socket_path(&self) -> Result<()> {
        if let Some(parent) = Path::new(&self.config.socket_path).parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create socket directory {}", parent.display())
            })?;
        }
        Ok(())
    }
}

/// One frontend connection is one widget session.
async fn handle_connection(stream: UnixStream, services: SessionServices) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();

    let (outgoing_tx, mut outgoing_rx) = mpsc::unbounded_channel::<FrontendResponse>();
    let (events, session) = spawn_session(services, outgoing_tx.clone());

    let writer_task = tokio::spawn(async move {
        while let Some(response) = outgoing_rx.recv().await {
            let payload = serde_json::to_string(&response)?;
            writer.write_all(payload.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        anyhow::Ok(())
    });

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }
        let line = match std::str::from_utf8(&buffer) {
            Ok(line) => line.trim(),
            Err(error) => {
                warn!("frontend line is not UTF-8: {error}");
                let _ = outgoing_tx.send(error_response(
                    String::new(),
                    ErrorCode::InvalidRequest,
                    format!("invalid UTF-8 payload: {error}"),
                ));
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<FrontendRequest>(line) {
            Ok(FrontendRequest {
                id,
                event: FrontendEvent::Ping,
            }) => Some(FrontendResponse {
                id,
                body: ResponseBody::Pong,
            }),
            Ok(FrontendRequest { id, event }) => match events.send(event) {
                Ok(()) => None,
                Err(_) => Some(error_response(
                    id,
                    ErrorCode::SessionClosed,
                    "session is no longer running".to_string(),
                )),
            },
            Err(error) => {
                warn!("invalid frontend JSON: {error}");
                Some(error_response(
                    String::new(),
                    ErrorCode::InvalidRequest,
                    format!("invalid JSON payload: {error}"),
                ))
            }
        };
        if let Some(reply) = reply {
            let _ = outgoing_tx.send(reply);
        }
    }

    drop(events);
    session.await.context("session task failed")?;
    drop(outgoing_tx);
    writer_task.await.context("writer task failed")??;
    Ok(())
}

fn error_response(id: String, code: ErrorCode, message: String) -> FrontendResponse {
    FrontendResponse {
        id,
        body: ResponseBody::Error(ErrorResponse { code, message }),
    }
}
