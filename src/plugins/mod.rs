//! Plugin system for plugbridge
//!
//! Plugins share one command namespace and one set of hooks. Loading a
//! plugin lets it claim commands; unloading it gives them back.

pub mod builtin;
pub mod manager;
pub mod trait_def;

pub use builtin::CorePlugin;
pub use manager::PluginManager;
pub use trait_def::{Plugin, PluginCommands, PluginInfo};
