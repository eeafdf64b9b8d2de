//! Bridge context - Everything one server session needs, wired together
//!
//! Constructed once when the host starts and passed to whatever handles
//! host events. All calls happen on the host's event thread.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::errors::{BridgeError, PluginError, StorageError};
use crate::application::messaging::dispatcher::{is_trivial, DispatchTargets};
use crate::application::messaging::{ChatDispatcher, MessageParser};
use crate::application::services::{CommandRegistry, PlayerDirectory, PlayerStore};
use crate::domain::entities::{ChatOutcome, Player, PluginRef, Session};
use crate::domain::traits::{Host, PluginHooks, RecordStorage};
use crate::infrastructure::config::Config;
use crate::infrastructure::lang::Lang;
use crate::plugins::{CorePlugin, Plugin, PluginManager};

const DISCONNECT_REASON: &str = "Unknown";

pub struct BridgeContext {
    config: Config,
    host: Arc<dyn Host>,
    registry: CommandRegistry,
    players: PlayerDirectory,
    plugins: PluginManager,
    dispatcher: ChatDispatcher,
}

impl BridgeContext {
    pub fn new(
        config: Config,
        host: Arc<dyn Host>,
        storage: Box<dyn RecordStorage>,
    ) -> Result<Self, BridgeError> {
        let mut registry = CommandRegistry::new(config.server.game_name.clone())
            .with_restricted(&config.commands.restricted);
        for (name, callback) in host.native_commands() {
            registry = registry.with_native(&name, callback);
        }

        let players = PlayerDirectory::new(PlayerStore::load(storage));
        let dispatcher = ChatDispatcher::new(
            MessageParser::new(config.commands.sigils.iter().copied()),
            Lang::from_config(&config.lang),
        );

        let mut plugins = PluginManager::new();
        plugins.load_core(Arc::new(CorePlugin::new(host.clone())), &mut registry)?;

        info!(
            "Bridge ready for {} ({} known players)",
            config.server.name,
            players.all().count()
        );

        Ok(Self {
            config,
            host,
            registry,
            players,
            plugins,
            dispatcher,
        })
    }

    pub fn load_plugin(&mut self, plugin: Arc<dyn Plugin>) -> Result<PluginRef, PluginError> {
        self.plugins.load(plugin, &mut self.registry)
    }

    pub fn unload_plugin(&mut self, name: &str) -> Result<(), PluginError> {
        self.plugins.unload(name, &mut self.registry)
    }

    pub fn on_server_initialized(&mut self) {
        self.plugins.server_initialized();
    }

    /// A session finished connecting. Returns the player it belongs to,
    /// or `None` if the session is the dedicated host's own.
    pub fn on_player_connected(&mut self, session: &Session) -> Option<Arc<Player>> {
        if self.ignores(session) {
            return None;
        }

        self.players.on_join(&session.user_id, &session.name);
        let player = self.players.on_connect(session).player().clone();

        self.plugins.on_session_connected(session);
        self.plugins.on_player_connected(&player);
        info!("{} connected", player);
        Some(player)
    }

    pub fn on_player_disconnected(&mut self, session: &Session) -> Option<Arc<Player>> {
        if self.ignores(session) {
            return None;
        }

        let player = self.players.on_disconnect(session)?.player().clone();
        self.plugins.on_session_disconnected(session, DISCONNECT_REASON);
        self.plugins.on_player_disconnected(&player, DISCONNECT_REASON);
        info!("{} disconnected", player);
        Some(player)
    }

    /// Process one chat line sent from `session` under display name `name`.
    /// The host should hide the line from normal chat when the outcome is
    /// handled.
    pub fn on_player_chat(&mut self, session: &Session, name: &str, message: &str) -> ChatOutcome {
        if is_trivial(message) {
            return ChatOutcome::Ignored;
        }

        let Some(live) = self.players.find_by_session(session.id) else {
            debug!("Chat from unknown session {}", session.id);
            return ChatOutcome::UnknownSender;
        };

        let mut live = live.clone();
        if live.name() != name {
            if let Some(player) = self.players.rename(live.id(), name) {
                live = live.with_player(player);
            }
        }

        let targets = DispatchTargets {
            registry: &self.registry,
            hooks: &self.plugins,
            host: self.host.as_ref(),
        };
        self.dispatcher.process(&targets, &live, session, message)
    }

    pub fn on_server_save(&self) -> Result<(), StorageError> {
        self.players.save()
    }

    /// Persist players, then unload every plugin
    pub fn on_server_shutdown(&mut self) -> Result<(), StorageError> {
        let saved = self.players.save();
        self.plugins.unload_all(&mut self.registry);
        saved
    }

    /// Run a line typed into the server console as a native command
    pub fn console_input(&self, input: &str) -> bool {
        let input = input.trim().trim_start_matches('/');
        if input.is_empty() {
            return false;
        }

        let (name, args) = input
            .split_once(char::is_whitespace)
            .unwrap_or((input, ""));
        let ran = self.registry.execute_native(name, args.trim());
        if !ran {
            debug!("No native command '{}'", name);
        }
        ran
    }

    /// Console tab completion over every known command name
    pub fn complete(&self, input: &str) -> Vec<String> {
        self.registry.complete(input)
    }

    fn ignores(&self, session: &Session) -> bool {
        self.config.server.dedicated && session.is_local
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    pub fn plugins(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
