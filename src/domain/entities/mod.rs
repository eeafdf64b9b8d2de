//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod message;
pub mod player;

pub use command::{
    normalize_name, CommandHandler, NativeCallback, PluginRef, RegisteredCommand, UNKNOWN_NEW_OWNER,
    UNKNOWN_OWNER,
};
pub use message::{ChatOutcome, LineKind, ParsedCommand};
pub use player::{LivePlayer, Player, PlayerRecord, PlayerRecords, Session, SessionId};
