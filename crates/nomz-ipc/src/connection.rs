//! Socket connection to the window manager

use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::{debug, trace};

use crate::error::{IpcError, Result};
use crate::event::WindowEvent;
use crate::tree::{CommandOutcome, Node};
use crate::{EventType, FramedMessage, MessageType, HEADER_LEN};

/// Upper bound for a single payload; large trees stay well below this
const MAX_PAYLOAD: usize = 64 * 1024 * 1024;

/// Request/reply connection used for tree queries and commands
pub struct Connection {
    stream: UnixStream,
}

impl Connection {
    /// Connect to an explicit socket path
    pub async fn connect_to(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path).await?;
        debug!(?path, "connected to window manager");
        Ok(Self::from_stream(stream))
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: UnixStream) -> Self {
        Self { stream }
    }

    async fn request(&mut self, kind: MessageType, payload: impl Into<Vec<u8>>) -> Result<FramedMessage> {
        let msg = FramedMessage::new(kind, payload);
        self.stream.write_all(&msg.encode()).await?;

        // Request sockets never subscribe, so the next frame is our reply
        let reply = read_frame(&mut self.stream).await?;
        if reply.kind != kind as u32 {
            return Err(IpcError::UnexpectedReply {
                expected: kind as u32,
                got: reply.kind,
            });
        }
        Ok(reply)
    }

    /// Fetch the full layout tree
    pub async fn get_tree(&mut self) -> Result<Node> {
        self.request(MessageType::GetTree, "").await?.json()
    }

    /// Run `command` with the criteria `[con_id=<target>]`
    pub async fn run_command(&mut self, target: i64, command: &str) -> Result<Vec<CommandOutcome>> {
        let payload = format!("[con_id={target}] {command}");
        trace!(%payload, "running command");
        self.request(MessageType::RunCommand, payload).await?.json()
    }

    /// Turn this connection into an event stream
    pub async fn subscribe(mut self, events: &[EventType]) -> Result<EventStream> {
        let names: Vec<&'static str> = events.iter().filter_map(|e| e.name()).collect();
        let payload = serde_json::to_vec(&names)?;

        #[derive(Deserialize)]
        struct SubscribeReply {
            success: bool,
        }

        let reply: SubscribeReply = self.request(MessageType::Subscribe, payload).await?.json()?;
        if !reply.success {
            return Err(IpcError::SubscribeRejected(names));
        }

        debug!(?names, "subscribed to events");
        Ok(EventStream {
            stream: self.stream,
        })
    }
}

/// Subscribed socket yielding window events
pub struct EventStream {
    stream: UnixStream,
}

impl EventStream {
    /// Wait for the next window event.
    ///
    /// Returns `Ok(None)` once the window manager closes the socket.
    pub async fn next_event(&mut self) -> Result<Option<WindowEvent>> {
        loop {
            let frame = match read_frame(&mut self.stream).await {
                Ok(frame) => frame,
                Err(IpcError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e),
            };

            match EventType::from_raw(frame.kind) {
                Some(EventType::Window) => return frame.json().map(Some),
                other => trace!(kind = frame.kind, ?other, "skipping frame"),
            }
        }
    }
}

async fn read_frame(stream: &mut UnixStream) -> Result<FramedMessage> {
    let mut header = [0u8; HEADER_LEN];
    stream.read_exact(&mut header).await?;
    let (len, kind) = FramedMessage::decode_header(&header)?;

    if len > MAX_PAYLOAD {
        return Err(std::io::Error::new(
            ErrorKind::InvalidData,
            format!("payload too large: {len} bytes"),
        )
        .into());
    }

    let mut data = vec![0u8; len];
    stream.read_exact(&mut data).await?;
    Ok(FramedMessage { kind, data })
}
