//! Message log and per-user stats engine for a single-user chat widget.
//!
//! The library owns the state, its persistence and the view state derived
//! from it. Hosts supply a renderer, a chart backend and a key-value store.

pub mod command;
pub mod config;
pub mod error;
pub mod session;
pub mod view;

pub use command::{Command, CommandSurface};
pub use config::ChatConfig;
pub use session::Message;
