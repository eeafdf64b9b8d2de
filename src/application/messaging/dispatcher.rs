//! Chat dispatcher - Routes chat lines to hooks or commands

use tracing::{debug, info, warn};

use super::parser::{tokenize, MessageParser};
use crate::application::services::CommandRegistry;
use crate::domain::entities::{ChatOutcome, LineKind, LivePlayer, ParsedCommand, Session};
use crate::domain::traits::{is_handled, Host, PluginHooks};
use crate::infrastructure::lang::{Lang, UNKNOWN_COMMAND};

/// Where a chat line may end up
pub struct DispatchTargets<'a> {
    pub registry: &'a CommandRegistry,
    pub hooks: &'a dyn PluginHooks,
    pub host: &'a dyn Host,
}

/// Lines this short are swallowed without any processing
pub fn is_trivial(message: &str) -> bool {
    message.trim().chars().count() <= 1
}

/// Stateless between lines; each call runs classification, hooks and
/// dispatch in that order and stops at the first stage that handles it.
pub struct ChatDispatcher {
    parser: MessageParser,
    lang: Lang,
}

impl ChatDispatcher {
    pub fn new(parser: MessageParser, lang: Lang) -> Self {
        Self { parser, lang }
    }

    pub fn process(
        &self,
        targets: &DispatchTargets<'_>,
        player: &LivePlayer,
        session: &Session,
        message: &str,
    ) -> ChatOutcome {
        if is_trivial(message) {
            return ChatOutcome::Ignored;
        }

        match self.parser.classify(message) {
            LineKind::Chat(text) => self.process_chat(targets, player, session, text),
            LineKind::Command(text) => self.process_command(targets, player, session, text),
        }
    }

    fn process_chat(
        &self,
        targets: &DispatchTargets<'_>,
        player: &LivePlayer,
        session: &Session,
        text: &str,
    ) -> ChatOutcome {
        let generic = targets.hooks.on_player_chat(player.player(), text);
        let specific = targets.hooks.on_session_chat(session, text);
        if is_handled(&generic) || is_handled(&specific) {
            return ChatOutcome::ChatHooked;
        }

        info!("[Chat] {}: {}", player.name(), text);
        ChatOutcome::Chat
    }

    fn process_command(
        &self,
        targets: &DispatchTargets<'_>,
        player: &LivePlayer,
        session: &Session,
        text: &str,
    ) -> ChatOutcome {
        let Some(ParsedCommand { name, args }) = tokenize(text) else {
            return ChatOutcome::EmptyCommand;
        };

        let generic = targets.hooks.on_player_command(player.player(), &name, &args);
        let specific = targets.hooks.on_session_command(session, &name, &args);
        if is_handled(&generic) || is_handled(&specific) {
            return ChatOutcome::CommandHooked;
        }

        if targets.registry.dispatch(player, &name, &args) {
            debug!("{} ran /{} {:?}", player.player(), name, args);
            return ChatOutcome::CommandDispatched;
        }

        let reply = self.lang.format(UNKNOWN_COMMAND, None, &[&name]);
        if let Err(e) = targets.host.send_message(player.session(), &reply) {
            warn!("Failed to reply to {}: {}", player.player(), e);
        }
        ChatOutcome::UnknownCommand(name)
    }
}
