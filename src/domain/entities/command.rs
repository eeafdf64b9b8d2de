use std::fmt;
use std::sync::Arc;

use super::LivePlayer;

/// Stands in for a displaced owner that supplied no name
pub const UNKNOWN_OWNER: &str = "an unknown plugin";

/// Stands in for a displacing owner that supplied no name
pub const UNKNOWN_NEW_OWNER: &str = "An unknown plugin";

#[derive(Debug)]
struct PluginMeta {
    name: Option<String>,
    core: bool,
}

/// Handle to the plugin that owns a command.
///
/// Two handles are equal only if they were cloned from the same original,
/// so a plugin that happens to share another plugin's name still cannot
/// touch its commands.
#[derive(Debug, Clone)]
pub struct PluginRef(Arc<PluginMeta>);

impl PluginRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(PluginMeta {
            name: Some(name.into()),
            core: false,
        }))
    }

    /// Handle for the bridge's own plugin, whose commands can't be overridden
    pub fn core(name: impl Into<String>) -> Self {
        Self(Arc::new(PluginMeta {
            name: Some(name.into()),
            core: true,
        }))
    }

    /// Handle for an owner that supplied no metadata
    pub fn anonymous() -> Self {
        Self(Arc::new(PluginMeta {
            name: None,
            core: false,
        }))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn is_core(&self) -> bool {
        self.0.core
    }
}

impl PartialEq for PluginRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for PluginRef {}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().unwrap_or(UNKNOWN_OWNER))
    }
}

/// Capability a plugin hands to the registry for one command
pub trait CommandHandler: Send + Sync {
    /// Run the command; `false` means the command did not handle the call
    fn invoke(&self, caller: &LivePlayer, command: &str, args: &[String]) -> bool;
}

impl<F> CommandHandler for F
where
    F: Fn(&LivePlayer, &str, &[String]) -> bool + Send + Sync,
{
    fn invoke(&self, caller: &LivePlayer, command: &str, args: &[String]) -> bool {
        self(caller, command, args)
    }
}

/// Handler the host game had for a command before any plugin claimed it.
/// Receives the raw argument text.
pub type NativeCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// A command currently claimed by a plugin
pub struct RegisteredCommand {
    pub owner: PluginRef,
    pub name: String,
    pub handler: Arc<dyn CommandHandler>,
    /// Native handler to put back once the last registration goes away
    pub fallback: Option<NativeCallback>,
}

impl fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Registry key for a command name
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_ref_identity() {
        let a = PluginRef::new("Greeter");
        let b = PluginRef::new("Greeter");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_plugin_ref_display() {
        assert_eq!(PluginRef::new("Greeter").to_string(), "Greeter");
        assert_eq!(PluginRef::anonymous().to_string(), UNKNOWN_OWNER);
        assert!(PluginRef::core("Bridge").is_core());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Kick "), "kick");
        assert_eq!(normalize_name("TP.Here"), "tp.here");
    }
}
