//! Reload Module
//!
//! Client side of the hot-reload protocol: everything that happens to the
//! document when the development server reports a change.
//!
//! # Architecture
//!
//! ```text
//! ConnectionActor --Notification--> PatchActor --Ack--> ConnectionActor
//!   (socket)                         (queue -> cycle)
//! ```
//!
//! # Modules
//!
//! - `counter` - Per-path next position index
//! - `fetch` - Fragment and stylesheet fetching
//! - `identity` - Node to position index side-table
//! - `insert` - Insertion-time index assignment
//! - `message` - Inbound classification and outbound acknowledgements
//! - `patch` - Capture/acknowledge/replace/reindex cycle
//! - `queue` - Coalescing FIFO of pending jobs
//! - `style` - Stylesheet swap

pub mod counter;
pub mod fetch;
pub mod identity;
mod insert;
pub mod message;
pub mod patch;
pub mod queue;
pub mod style;
