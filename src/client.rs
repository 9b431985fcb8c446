//! Chat client
//!
//! Connects to the server, forwards submitted input lines, and hands every
//! received line to a `ChatView`. Rendering and keystroke editing live
//! behind that trait; the client only deals in whole lines.

use std::io;

use bytes::BytesMut;
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::{Decoder, FramedRead};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppError;
use crate::message::UNTERMINATED;
use crate::protocol::trim;

/// Display surface for received and status lines
pub trait ChatView {
    /// Append one line to the scrolling display
    fn show(&mut self, line: &str);
}

/// Plain stdout transcript
#[derive(Debug, Default)]
pub struct StdoutView;

impl ChatView for StdoutView {
    fn show(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Splits the server byte stream into display lines
///
/// Bytes are held until a `\n` arrives, so a line cut across reads (even
/// inside a multi-byte character) comes out whole. The welcome prompt and
/// the blank-message notice carry no terminator and are emitted as soon as
/// they are complete.
#[derive(Debug, Clone)]
pub struct ChatLineCodec {
    max_length: usize,
}

impl ChatLineCodec {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Decoder for ChatLineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, io::Error> {
        for text in UNTERMINATED {
            if src.starts_with(text.as_bytes()) {
                let _ = src.split_to(text.len());
                return Ok(Some(text.to_string()));
            }
        }

        if let Some(pos) = src.iter().position(|b| *b == b'\n') {
            let line = src.split_to(pos + 1);
            return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
        }

        if src.len() > self.max_length {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "server line exceeds maximum length",
            ));
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, io::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                let rest = src.split();
                Ok(Some(String::from_utf8_lossy(&rest).into_owned()))
            }
        }
    }
}

/// Split received text into trimmed, non-empty display lines
pub fn display_lines(chunk: &str) -> impl Iterator<Item = &str> {
    trim(chunk).split('\n').map(trim).filter(|l| !l.is_empty())
}

/// Run the client until the server disconnects, input ends, or `cancel` fires
///
/// Only a failed connect is an error; everything after that is reported on
/// the view.
pub async fn run<V: ChatView>(
    config: &Config,
    mut input: mpsc::Receiver<String>,
    view: &mut V,
    cancel: CancellationToken,
) -> Result<(), AppError> {
    view.show(&format!("Connecting to {}...", config.address));

    let stream = TcpStream::connect(&config.address)
        .await
        .map_err(|source| AppError::Connect {
            addr: config.address.clone(),
            source,
        })?;
    view.show("Successfully connected to server!");
    info!("Connected to {}", config.address);

    let (reader, mut writer) = stream.into_split();
    // A broadcast line carries a nickname and content, each up to the inbound limit
    let codec = ChatLineCodec::new(config.max_line_length.saturating_mul(3));
    let mut frames = FramedRead::new(reader, codec);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Client cancelled");
                break;
            }
            frame = frames.next() => {
                match frame {
                    Some(Ok(text)) => {
                        for line in display_lines(&text) {
                            view.show(line);
                        }
                    }
                    Some(Err(e)) => {
                        view.show(&format!("Error: {}", e));
                        break;
                    }
                    None => {
                        view.show("Disconnected from server.");
                        break;
                    }
                }
            }
            line = input.recv() => {
                let Some(line) = line else {
                    debug!("Input closed");
                    break;
                };
                if line.is_empty() {
                    continue;
                }
                if let Err(e) = writer.write_all(format!("{}\n", line).as_bytes()).await {
                    view.show(&format!("Error: {}", e));
                    break;
                }
            }
        }
    }

    let _ = writer.shutdown().await;
    info!("Client stopped");
    Ok(())
}
