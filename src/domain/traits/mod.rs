//! Domain traits - Abstractions for infrastructure implementations

pub mod hooks;
pub mod host;
pub mod store;

pub use hooks::{is_handled, HookValue, PluginHooks};
pub use host::{Host, HostInfo};
pub use store::RecordStorage;
