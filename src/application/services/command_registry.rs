//! Command registry - Which plugin answers which chat command
//!
//! Plugins may take over each other's commands and the game's own (native)
//! commands. A displaced native handler travels with whichever registration
//! currently owns the name and is put back when that registration is removed.
//! Intermediate plugin owners are not restored.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::errors::CommandError;
use crate::domain::entities::{
    normalize_name, CommandHandler, LivePlayer, NativeCallback, PluginRef, RegisteredCommand,
    UNKNOWN_NEW_OWNER,
};

pub struct CommandRegistry {
    commands: HashMap<String, RegisteredCommand>,
    native: HashMap<String, NativeCallback>,
    restricted: HashSet<String>,
    game_name: String,
}

impl CommandRegistry {
    pub fn new(game_name: impl Into<String>) -> Self {
        Self {
            commands: HashMap::new(),
            native: HashMap::new(),
            restricted: HashSet::new(),
            game_name: game_name.into(),
        }
    }

    pub fn with_restricted<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.restricted
            .extend(names.into_iter().map(|n| normalize_name(n.as_ref())));
        self
    }

    /// Seed a command the game already handles itself
    pub fn with_native(mut self, name: &str, callback: NativeCallback) -> Self {
        self.native.insert(normalize_name(name), callback);
        self
    }

    /// Claim `name` for `owner`.
    ///
    /// Any previous owner is displaced with a warning. If the game had its
    /// own handler for the name, it is held as the fallback for when the
    /// command is unregistered again.
    pub fn register(
        &mut self,
        name: &str,
        owner: &PluginRef,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<(), CommandError> {
        let name = normalize_name(name);

        if self.is_restricted(&name) {
            return Err(CommandError::Restricted(name));
        }
        if self.is_core_owned(&name) && !owner.is_core() {
            return Err(CommandError::Locked(name));
        }

        let owner_name = owner.name().unwrap_or(UNKNOWN_NEW_OWNER);
        let previous = self.commands.remove(&name);
        let mut fallback = None;

        if let Some(previous) = &previous {
            fallback = previous.fallback.clone();
            warn!(
                "{} has replaced the '{}' command previously registered by {}",
                owner_name, name, previous.owner
            );
        }

        if let Some(native) = self.native.remove(&name) {
            if fallback.is_none() {
                fallback = Some(native);
            }
            if previous.is_none() {
                warn!(
                    "{} has replaced the '{}' command previously registered by {}",
                    owner_name, name, self.game_name
                );
            }
        }

        debug!("Registered command '{}' for {}", name, owner);
        self.commands.insert(
            name.clone(),
            RegisteredCommand {
                owner: owner.clone(),
                name,
                handler,
                fallback,
            },
        );
        Ok(())
    }

    /// Release `name` if `owner` holds it. Returns whether anything changed.
    pub fn unregister(&mut self, name: &str, owner: &PluginRef) -> bool {
        let name = normalize_name(name);
        match self.commands.get(&name) {
            Some(cmd) if cmd.owner == *owner => {}
            _ => return false,
        }

        let Some(cmd) = self.commands.remove(&name) else {
            return false;
        };
        match cmd.fallback {
            Some(native) => {
                debug!("Restored native command '{}'", name);
                self.native.insert(name, native);
            }
            None => {
                self.native.remove(&name);
            }
        }
        true
    }

    /// Release every command held by `owner`
    pub fn unregister_all(&mut self, owner: &PluginRef) -> usize {
        let names: Vec<String> = self
            .commands
            .values()
            .filter(|cmd| cmd.owner == *owner)
            .map(|cmd| cmd.name.clone())
            .collect();

        names
            .iter()
            .filter(|name| self.unregister(name, owner))
            .count()
    }

    /// Run a registered command. `false` if no plugin holds `name` or its
    /// handler declined.
    pub fn dispatch(&self, caller: &LivePlayer, name: &str, args: &[String]) -> bool {
        let key = normalize_name(name);
        match self.commands.get(&key) {
            Some(cmd) => cmd.handler.invoke(caller, &key, args),
            None => false,
        }
    }

    /// Run one of the game's own handlers with the raw argument text
    pub fn execute_native(&self, name: &str, args: &str) -> bool {
        match self.native.get(&normalize_name(name)) {
            Some(native) => {
                native(args);
                true
            }
            None => false,
        }
    }

    pub fn can_override(&self, name: &str) -> bool {
        let name = normalize_name(name);
        !self.is_restricted(&name) && !self.is_core_owned(&name)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.commands.contains_key(&normalize_name(name))
    }

    pub fn is_native(&self, name: &str) -> bool {
        self.native.contains_key(&normalize_name(name))
    }

    pub fn owner(&self, name: &str) -> Option<&PluginRef> {
        self.commands.get(&normalize_name(name)).map(|cmd| &cmd.owner)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands.get(&normalize_name(name))
    }

    /// Sorted names, native and registered, containing `input`
    pub fn complete(&self, input: &str) -> Vec<String> {
        let needle = input.trim().trim_start_matches('/').to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut names: Vec<String> = self
            .native
            .keys()
            .chain(self.commands.keys())
            .filter(|name| name.contains(&needle))
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn is_restricted(&self, name: &str) -> bool {
        name.is_empty() || self.restricted.contains(name)
    }

    fn is_core_owned(&self, name: &str) -> bool {
        self.commands
            .get(name)
            .map(|cmd| cmd.owner.is_core())
            .unwrap_or(false)
    }
}
