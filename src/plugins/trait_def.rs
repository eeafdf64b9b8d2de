//! Plugin trait definitions

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::services::CommandRegistry;
use crate::domain::entities::{CommandHandler, PluginRef};
use crate::domain::traits::PluginHooks;

/// Core plugin trait that all plugins must implement
pub trait Plugin: PluginHooks {
    /// Unique identifier for the plugin
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str {
        ""
    }

    /// Register commands. Any error unloads the plugin again.
    fn init(&self, _commands: &mut PluginCommands<'_>) -> Result<(), CommandError> {
        Ok(())
    }

    /// Optional: Cleanup resources when plugin is unloaded
    fn cleanup(&self) {}

    /// Optional: Get plugin metadata
    fn metadata(&self) -> HashMap<String, String> {
        HashMap::new()
    }
}

/// The registry as seen by one plugin: every command it adds is owned by it
pub struct PluginCommands<'a> {
    registry: &'a mut CommandRegistry,
    owner: &'a PluginRef,
}

impl<'a> PluginCommands<'a> {
    pub fn new(registry: &'a mut CommandRegistry, owner: &'a PluginRef) -> Self {
        Self { registry, owner }
    }

    /// Register one handler under each of `names`
    pub fn add<H>(&mut self, names: &[&str], handler: H) -> Result<(), CommandError>
    where
        H: CommandHandler + 'static,
    {
        let handler: Arc<dyn CommandHandler> = Arc::new(handler);
        for name in names {
            self.registry.register(name, self.owner, handler.clone())?;
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.registry.unregister(name, self.owner)
    }

    pub fn can_override(&self, name: &str) -> bool {
        self.registry.can_override(name)
    }

    pub fn owner(&self) -> &PluginRef {
        self.owner
    }
}

/// Plugin information for listing
#[derive(Debug, Clone, Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub core: bool,
    pub metadata: HashMap<String, String>,
}
