//! Plugin manager - handles plugin lifecycle and hook delivery

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::errors::PluginError;
use crate::application::services::CommandRegistry;
use crate::domain::entities::{Player, PluginRef, Session};
use crate::domain::traits::{is_handled, HookValue, PluginHooks};
use crate::plugins::trait_def::{Plugin, PluginCommands, PluginInfo};

struct LoadedPlugin {
    plugin: Arc<dyn Plugin>,
    owner: PluginRef,
}

/// Manages all plugins for the bridge, in load order
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<LoadedPlugin>,
    initialized: bool,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a plugin and let it register its commands
    pub fn load(
        &mut self,
        plugin: Arc<dyn Plugin>,
        registry: &mut CommandRegistry,
    ) -> Result<PluginRef, PluginError> {
        let owner = PluginRef::new(plugin.name());
        self.load_as(plugin, owner, registry)
    }

    /// Load the bridge's own plugin, whose commands no other plugin may take
    pub fn load_core(
        &mut self,
        plugin: Arc<dyn Plugin>,
        registry: &mut CommandRegistry,
    ) -> Result<PluginRef, PluginError> {
        let owner = PluginRef::core(plugin.name());
        self.load_as(plugin, owner, registry)
    }

    fn load_as(
        &mut self,
        plugin: Arc<dyn Plugin>,
        owner: PluginRef,
        registry: &mut CommandRegistry,
    ) -> Result<PluginRef, PluginError> {
        let name = plugin.name().to_string();
        if self.has_plugin(&name) {
            return Err(PluginError::AlreadyLoaded(name));
        }

        let mut commands = PluginCommands::new(registry, &owner);
        if let Err(source) = plugin.init(&mut commands) {
            let rolled_back = registry.unregister_all(&owner);
            warn!(
                "Plugin '{}' failed to load, released {} commands: {}",
                name, rolled_back, source
            );
            return Err(PluginError::Command { plugin: name, source });
        }

        info!("Loaded plugin: {}", name);
        if self.initialized {
            plugin.on_server_initialized(false);
        }

        self.plugins.push(LoadedPlugin {
            plugin,
            owner: owner.clone(),
        });
        Ok(owner)
    }

    /// Unload a plugin, releasing its commands
    pub fn unload(&mut self, name: &str, registry: &mut CommandRegistry) -> Result<(), PluginError> {
        let index = self
            .plugins
            .iter()
            .position(|p| p.plugin.name() == name)
            .ok_or_else(|| PluginError::NotFound(name.to_string()))?;

        let loaded = self.plugins.remove(index);
        let released = registry.unregister_all(&loaded.owner);
        loaded.plugin.cleanup();
        info!("Unloaded plugin: {} ({} commands released)", name, released);
        Ok(())
    }

    /// Unload everything, newest first
    pub fn unload_all(&mut self, registry: &mut CommandRegistry) {
        while let Some(loaded) = self.plugins.pop() {
            registry.unregister_all(&loaded.owner);
            loaded.plugin.cleanup();
            info!("Unloaded plugin: {}", loaded.plugin.name());
        }
    }

    /// Tell plugins startup is complete. Only the first call has any effect.
    pub fn server_initialized(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        for loaded in &self.plugins {
            loaded.plugin.on_server_initialized(true);
        }
    }

    /// List all loaded plugins
    pub fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugins
            .iter()
            .map(|loaded| PluginInfo {
                name: loaded.plugin.name().to_string(),
                description: loaded.plugin.description().to_string(),
                core: loaded.owner.is_core(),
                metadata: loaded.plugin.metadata(),
            })
            .collect()
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.plugin.name() == name)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Every plugin sees the event; the first handled value is returned
    fn first_handled<F>(&self, call: F) -> Option<HookValue>
    where
        F: Fn(&dyn Plugin) -> Option<HookValue>,
    {
        let mut result = None;
        for loaded in &self.plugins {
            let value = call(loaded.plugin.as_ref());
            if result.is_none() && is_handled(&value) {
                result = value;
            }
        }
        result
    }
}

impl PluginHooks for PluginManager {
    fn on_player_chat(&self, player: &Player, message: &str) -> Option<HookValue> {
        self.first_handled(|p| p.on_player_chat(player, message))
    }

    fn on_session_chat(&self, session: &Session, message: &str) -> Option<HookValue> {
        self.first_handled(|p| p.on_session_chat(session, message))
    }

    fn on_player_command(&self, player: &Player, command: &str, args: &[String]) -> Option<HookValue> {
        self.first_handled(|p| p.on_player_command(player, command, args))
    }

    fn on_session_command(
        &self,
        session: &Session,
        command: &str,
        args: &[String],
    ) -> Option<HookValue> {
        self.first_handled(|p| p.on_session_command(session, command, args))
    }

    fn on_player_connected(&self, player: &Player) {
        self.plugins
            .iter()
            .for_each(|p| p.plugin.on_player_connected(player));
    }

    fn on_session_connected(&self, session: &Session) {
        self.plugins
            .iter()
            .for_each(|p| p.plugin.on_session_connected(session));
    }

    fn on_player_disconnected(&self, player: &Player, reason: &str) {
        self.plugins
            .iter()
            .for_each(|p| p.plugin.on_player_disconnected(player, reason));
    }

    fn on_session_disconnected(&self, session: &Session, reason: &str) {
        self.plugins
            .iter()
            .for_each(|p| p.plugin.on_session_disconnected(session, reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::CommandError;
    use crate::domain::entities::LivePlayer;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct Warps {
        cleaned: AtomicBool,
        initialized: AtomicUsize,
    }

    impl Warps {
        fn new() -> Self {
            Self {
                cleaned: AtomicBool::new(false),
                initialized: AtomicUsize::new(0),
            }
        }
    }

    impl PluginHooks for Warps {
        fn on_player_chat(&self, _player: &Player, message: &str) -> Option<HookValue> {
            message.contains("badword").then(|| json!(true))
        }

        fn on_server_initialized(&self, _initial: bool) {
            self.initialized.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Plugin for Warps {
        fn name(&self) -> &str {
            "Warps"
        }

        fn init(&self, commands: &mut PluginCommands<'_>) -> Result<(), CommandError> {
            commands.add(&["warp", "w"], |_: &LivePlayer, _: &str, _: &[String]| true)
        }

        fn cleanup(&self) {
            self.cleaned.store(true, Ordering::SeqCst);
        }
    }

    struct Greedy;

    impl PluginHooks for Greedy {}

    impl Plugin for Greedy {
        fn name(&self) -> &str {
            "Greedy"
        }

        fn init(&self, commands: &mut PluginCommands<'_>) -> Result<(), CommandError> {
            commands.add(&["fine", "quit"], |_: &LivePlayer, _: &str, _: &[String]| true)
        }
    }

    #[test]
    fn test_load_registers_commands() {
        let mut registry = CommandRegistry::new("g");
        let mut manager = PluginManager::new();
        let owner = manager.load(Arc::new(Warps::new()), &mut registry).unwrap();

        assert_eq!(registry.owner("warp"), Some(&owner));
        assert_eq!(registry.owner("w"), Some(&owner));
        assert_eq!(manager.list_plugins()[0].name, "Warps");
    }

    #[test]
    fn test_duplicate_load_rejected() {
        let mut registry = CommandRegistry::new("g");
        let mut manager = PluginManager::new();
        manager.load(Arc::new(Warps::new()), &mut registry).unwrap();

        let err = manager.load(Arc::new(Warps::new()), &mut registry).unwrap_err();
        assert!(matches!(err, PluginError::AlreadyLoaded(_)));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_failed_init_rolls_back() {
        let mut registry = CommandRegistry::new("g").with_restricted(["quit"]);
        let mut manager = PluginManager::new();

        let err = manager.load(Arc::new(Greedy), &mut registry).unwrap_err();
        assert!(matches!(
            err,
            PluginError::Command { source: CommandError::Restricted(_), .. }
        ));
        assert!(!registry.is_registered("fine"));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_unload_releases_commands() {
        let mut registry = CommandRegistry::new("g");
        let mut manager = PluginManager::new();
        let warps = Arc::new(Warps::new());
        manager.load(warps.clone(), &mut registry).unwrap();

        manager.unload("Warps", &mut registry).unwrap();
        assert!(registry.is_empty());
        assert!(warps.cleaned.load(Ordering::SeqCst));
        assert!(matches!(
            manager.unload("Warps", &mut registry),
            Err(PluginError::NotFound(_))
        ));
    }

    #[test]
    fn test_late_load_gets_initialized() {
        let mut registry = CommandRegistry::new("g");
        let mut manager = PluginManager::new();
        let early = Arc::new(Warps::new());
        manager.load(early.clone(), &mut registry).unwrap();
        manager.server_initialized();
        manager.server_initialized();
        assert_eq!(early.initialized.load(Ordering::SeqCst), 1);

        manager.unload("Warps", &mut registry).unwrap();
        let late = Arc::new(Warps::new());
        manager.load(late.clone(), &mut registry).unwrap();
        assert_eq!(late.initialized.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hooks_first_handled_value() {
        let mut registry = CommandRegistry::new("g");
        let mut manager = PluginManager::new();
        manager.load(Arc::new(Greedy), &mut registry).unwrap();
        manager.load(Arc::new(Warps::new()), &mut registry).unwrap();

        let player = Player::new("1", "Alice");
        assert_eq!(manager.on_player_chat(&player, "a badword"), Some(json!(true)));
        assert_eq!(manager.on_player_chat(&player, "hello"), None);
    }
}
