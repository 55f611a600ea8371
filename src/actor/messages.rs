//! Actor Message Definitions
//!
//! ```text
//! ConnectionActor --PatchMsg--> PatchActor --AckFrame--> ConnectionActor
//! ```
//!
//! Every connection attempt gets a new generation number. Path notifications
//! carry the generation they arrived on and their acknowledgements are
//! stamped with it, so a connection only ever writes replies to its own
//! notifications.

use crossbeam::channel::Sender;

use crate::reload::message::{Ack, AckSink};

/// Messages to the patch actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchMsg {
    /// Elements rendered from this path must be patched
    PathChanged { path: String, generation: u64 },
    /// The stylesheet must be swapped
    StylesheetChanged,
    /// Stop after the job in flight
    Shutdown,
}

/// Why a connection thread returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionExit {
    /// Reload signal sent; reconnect right away
    Reload,
    /// Server went away; reconnect after a delay
    Closed,
    /// Ctrl+C or the patch actor is gone
    Shutdown,
}

/// An acknowledgement addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckFrame {
    pub generation: u64,
    pub ack: Ack,
}

/// [`AckSink`] stamping every acknowledgement with one generation.
pub struct GenerationSink<'a> {
    tx: &'a Sender<AckFrame>,
    generation: u64,
}

impl<'a> GenerationSink<'a> {
    pub fn new(tx: &'a Sender<AckFrame>, generation: u64) -> Self {
        Self { tx, generation }
    }
}

impl AckSink for GenerationSink<'_> {
    fn send(&mut self, ack: Ack) {
        let frame = AckFrame {
            generation: self.generation,
            ack,
        };
        if self.tx.send(frame).is_err() {
            crate::debug!("ack"; "connection gone, acknowledgement dropped");
        }
    }
}
