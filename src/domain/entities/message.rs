/// Command name and arguments tokenized from a chat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// How a chat line was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Plain chat text
    Chat(&'a str),
    /// Text after a command sigil
    Command(&'a str),
}

/// What happened to a chat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Too short to be worth processing
    Ignored,
    /// No connected player behind the session
    UnknownSender,
    /// Plain chat consumed by a hook
    ChatHooked,
    /// Plain chat, logged and left for the game to display
    Chat,
    /// A sigil with no command after it
    EmptyCommand,
    /// Command consumed by a hook
    CommandHooked,
    /// Command ran through the registry
    CommandDispatched,
    /// Nothing handled the command; the sender was told
    UnknownCommand(String),
}

impl ChatOutcome {
    /// Whether the host should suppress the line from normal chat display
    pub fn is_handled(&self) -> bool {
        !matches!(self, ChatOutcome::Chat | ChatOutcome::UnknownSender)
    }
}
