//! Configuration section definitions.
//!
//! Each module corresponds to a section in `hmr.toml`:
//!
//! | Module   | TOML Section                | Purpose                          |
//! |----------|-----------------------------|----------------------------------|
//! | `server` | `[server]`                  | Dev server origin and socket     |
//! | `dom`    | `[dom]`                     | Tracking attribute names         |
//! | `patch`  | `[patch]`, `[stylesheet]`   | Patch cycle and stylesheet swap  |

mod dom;
mod patch;
mod server;

pub use dom::DomConfig;
pub use patch::{PatchConfig, StylesheetConfig};
pub use server::ServerConfig;
