use crate::application::errors::BridgeError;
use crate::domain::entities::{NativeCallback, SessionId};

/// Host trait - abstraction for the game server the bridge runs inside
pub trait Host: Send + Sync {
    /// Send a chat line to one session
    fn send_message(&self, session: SessionId, text: &str) -> Result<(), BridgeError>;

    /// Commands the game handles on its own, before any plugin is loaded
    fn native_commands(&self) -> Vec<(String, NativeCallback)> {
        Vec::new()
    }

    /// Get host info
    fn host_info(&self) -> HostInfo;
}

/// Host information
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub name: String,
    pub version: String,
}
