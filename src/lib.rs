//! plugbridge - lets independent plugins share one chat command namespace
//! and one player directory inside a multiplayer game server.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod plugins;

pub use application::errors::{BridgeError, CommandError, PluginError, StorageError};
pub use application::BridgeContext;
