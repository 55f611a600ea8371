//! Hot Reload Message Protocol
//!
//! Classification of inbound WebSocket frames and encoding of the
//! acknowledgements sent back to the development server.
//!
//! # Inbound
//!
//! | Frame                 | Meaning                     |
//! |-----------------------|-----------------------------|
//! | `Text("you up?")`     | liveness probe, no-op       |
//! | `Text(path)`          | rendered path changed       |
//! | `Binary([_])` (1 byte)| stylesheet changed          |
//!
//! # Outbound
//!
//! | Frames                          | Meaning                          |
//! |---------------------------------|----------------------------------|
//! | `Text("r")`                     | client is about to full-reload   |
//! | `Text("c")`, `Binary(u32 LE..)` | patch starting, captured indexes |

use tungstenite::protocol::Message;

/// Reload signal.
pub const RELOAD_SIGNAL: &str = "r";

/// Patch-starting signal, followed by the captured indexes.
pub const PATCH_SIGNAL: &str = "c";

// =============================================================================
// Inbound
// =============================================================================

/// A classified inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Keep-alive, nothing to do.
    Probe,
    /// Elements rendered from this path must be refetched.
    PathChanged(String),
    /// The compiled stylesheet must be swapped.
    StylesheetChanged,
    /// Neither a known text nor a known binary shape.
    Malformed(String),
    /// Server closed the connection.
    Closed,
}

impl Notification {
    /// Classify a frame. Control frames (ping/pong/raw) yield `None`.
    pub fn classify(msg: Message, probe: &str) -> Option<Self> {
        match msg {
            Message::Text(text) => {
                let text = text.as_str();
                Some(if text == probe {
                    Self::Probe
                } else if text.is_empty() {
                    Self::Malformed("empty text frame".to_string())
                } else {
                    Self::PathChanged(text.to_string())
                })
            }
            Message::Binary(bytes) if bytes.len() == 1 => Some(Self::StylesheetChanged),
            Message::Binary(bytes) => Some(Self::Malformed(format!(
                "binary frame of {} bytes",
                bytes.len()
            ))),
            Message::Close(_) => Some(Self::Closed),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => None,
        }
    }
}

// =============================================================================
// Outbound
// =============================================================================

/// Acknowledgement sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    /// The client will drop the connection and reload the page.
    Reload,
    /// A patch cycle is starting; `indexes` are the captured position
    /// indexes in document order.
    PatchStarting { indexes: Vec<u32> },
}

impl Ack {
    /// Frames to write, in order.
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Self::Reload => vec![Message::Text(RELOAD_SIGNAL.into())],
            Self::PatchStarting { indexes } => vec![
                Message::Text(PATCH_SIGNAL.into()),
                Message::Binary(encode_indexes(&indexes).into()),
            ],
        }
    }
}

/// Fixed-width little-endian `u32` array.
pub fn encode_indexes(indexes: &[u32]) -> Vec<u8> {
    indexes.iter().flat_map(|i| i.to_le_bytes()).collect()
}

/// Inverse of [`encode_indexes`]; a trailing partial chunk is ignored.
pub fn decode_indexes(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Where acknowledgements go. The patch actor stamps them for the
/// connection thread; tests record into a `Vec`.
pub trait AckSink {
    fn send(&mut self, ack: Ack);
}

impl AckSink for Vec<Ack> {
    fn send(&mut self, ack: Ack) {
        self.push(ack);
    }
}
