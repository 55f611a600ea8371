//! Actor System for a Live Session
//!
//! Message-passing concurrency for `connect`:
//!
//! ```text
//! ConnectionActor --> PatchActor --> ConnectionActor
//!   (socket)        (queue, cycle)     (acks)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Message types for inter-actor communication
//! - `connection` - WebSocket client thread
//! - `patch` - Document owner running patch cycles and stylesheet swaps
//! - `coordinator` - Wires up and runs actors, reconnects

pub mod connection;
pub mod coordinator;
pub mod messages;
pub mod patch;

pub use coordinator::Coordinator;
