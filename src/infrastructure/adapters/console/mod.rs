//! Console adapter for development/testing
//!
//! Stands in for a game server: each stdin line is a host event such as a
//! player connecting or sending chat.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::application::errors::BridgeError;
use crate::application::messaging::tokenize;
use crate::application::BridgeContext;
use crate::domain::entities::{NativeCallback, Session, SessionId};
use crate::domain::traits::{Host, HostInfo};

/// Console host that prints everything it is asked to send
pub struct ConsoleHost {
    info: HostInfo,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self {
            info: HostInfo {
                name: "console".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

impl Default for ConsoleHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for ConsoleHost {
    fn send_message(&self, session: SessionId, text: &str) -> Result<(), BridgeError> {
        println!("[BOT -> {}] {}", session, text);
        Ok(())
    }

    fn native_commands(&self) -> Vec<(String, NativeCallback)> {
        let say: NativeCallback = Arc::new(|args: &str| println!("[SERVER] {}", args));
        let time: NativeCallback = Arc::new(|_: &str| println!("[SERVER] {}", Utc::now().to_rfc3339()));
        vec![("say".to_string(), say), ("time".to_string(), time)]
    }

    fn host_info(&self) -> HostInfo {
        self.info.clone()
    }
}

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Connect { user_id: String, name: String },
    Disconnect { user_id: String },
    Chat { user_id: String, message: String },
    /// Change the name a session sends with its next chat line
    Rename { user_id: String, name: String },
    Save,
    Players,
    Plugins,
    Complete(String),
    Quit,
    /// Anything else goes to the native command table
    Console(String),
}

impl ConsoleEvent {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(v, r)| (v, r.trim()))
            .unwrap_or((line, ""));

        match verb {
            "connect" | "rename" => match tokenize(rest) {
                Some(parsed) if !parsed.args.is_empty() => {
                    let user_id = parsed.name;
                    let name = parsed.args.join(" ");
                    if verb == "connect" {
                        ConsoleEvent::Connect { user_id, name }
                    } else {
                        ConsoleEvent::Rename { user_id, name }
                    }
                }
                _ => ConsoleEvent::Console(line.to_string()),
            },
            "disconnect" if !rest.is_empty() => ConsoleEvent::Disconnect {
                user_id: rest.to_string(),
            },
            "chat" => match rest.split_once(char::is_whitespace) {
                Some((user_id, message)) => ConsoleEvent::Chat {
                    user_id: user_id.to_string(),
                    message: message.to_string(),
                },
                None => ConsoleEvent::Console(line.to_string()),
            },
            "save" => ConsoleEvent::Save,
            "players" => ConsoleEvent::Players,
            "plugins" => ConsoleEvent::Plugins,
            "complete" => ConsoleEvent::Complete(rest.to_string()),
            "quit" | "exit" => ConsoleEvent::Quit,
            _ => ConsoleEvent::Console(line.to_string()),
        }
    }
}

/// Tracks the sessions the console has opened and feeds events to the bridge
#[derive(Default)]
pub struct ConsoleDriver {
    sessions: HashMap<String, Session>,
}

impl ConsoleDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns `false` once the console asked to quit.
    pub fn handle(&mut self, ctx: &mut BridgeContext, event: ConsoleEvent) -> Result<bool, BridgeError> {
        match event {
            ConsoleEvent::Connect { user_id, name } => {
                if let Some(old) = self.sessions.remove(&user_id) {
                    ctx.on_player_disconnected(&old);
                }
                let session = Session::new(user_id.clone(), name);
                ctx.on_player_connected(&session);
                self.sessions.insert(user_id, session);
            }
            ConsoleEvent::Disconnect { user_id } => match self.sessions.remove(&user_id) {
                Some(session) => {
                    ctx.on_player_disconnected(&session);
                }
                None => println!("No session for {}", user_id),
            },
            ConsoleEvent::Chat { user_id, message } => match self.sessions.get(&user_id) {
                Some(session) => {
                    let outcome = ctx.on_player_chat(session, &session.name, &message);
                    if !outcome.is_handled() {
                        println!("[CHAT] {}: {}", session.name, message);
                    }
                }
                None => println!("No session for {}", user_id),
            },
            ConsoleEvent::Rename { user_id, name } => match self.sessions.get_mut(&user_id) {
                Some(session) => session.name = name,
                None => println!("No session for {}", user_id),
            },
            ConsoleEvent::Save => ctx.on_server_save()?,
            ConsoleEvent::Players => {
                for live in ctx.players().live_players() {
                    println!(
                        "  {} ({}) since {}",
                        live.name(),
                        live.id(),
                        live.connected_at().format("%H:%M:%S")
                    );
                }
                println!("{} known players", ctx.players().all().count());
            }
            ConsoleEvent::Plugins => {
                for plugin in ctx.plugins().list_plugins() {
                    println!("  {} - {}", plugin.name, plugin.description);
                }
            }
            ConsoleEvent::Complete(input) => println!("{}", ctx.complete(&input).join(" ")),
            ConsoleEvent::Quit => return Ok(false),
            ConsoleEvent::Console(line) => {
                if !line.is_empty() && !ctx.console_input(&line) {
                    println!("Unknown console command: {}", line);
                }
            }
        }
        Ok(true)
    }
}
