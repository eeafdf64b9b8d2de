//! Message parser - Classifies chat lines and tokenizes commands

use crate::domain::entities::{LineKind, ParsedCommand};

/// Command prefixes recognised when none are configured
pub const DEFAULT_SIGILS: [char; 2] = ['/', '!'];

/// Split a command line into its name and arguments.
///
/// Whitespace separates tokens except inside a `"..."` span, which becomes a
/// single token. An unterminated span still yields its text. Returns `None`
/// when the line holds no tokens at all.
pub fn tokenize(raw: &str) -> Option<ParsedCommand> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in raw.chars() {
        if c == '"' {
            if quoted {
                push_token(&mut tokens, &mut current);
            }
            quoted = !quoted;
        } else if c.is_whitespace() && !quoted {
            push_token(&mut tokens, &mut current);
        } else {
            current.push(c);
        }
    }
    push_token(&mut tokens, &mut current);

    let mut tokens = tokens.into_iter();
    let name = tokens.next()?;
    Some(ParsedCommand {
        name,
        args: tokens.collect(),
    })
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    let token = current.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }
    current.clear();
}

/// Decides whether a chat line is plain chat or a command
#[derive(Debug, Clone)]
pub struct MessageParser {
    sigils: Vec<char>,
}

impl MessageParser {
    pub fn new(sigils: impl IntoIterator<Item = char>) -> Self {
        Self {
            sigils: sigils.into_iter().collect(),
        }
    }

    /// Classify by the first character; a command keeps the text after its sigil
    pub fn classify<'a>(&self, text: &'a str) -> LineKind<'a> {
        match text.chars().next() {
            Some(c) if self.sigils.contains(&c) => LineKind::Command(&text[c.len_utf8()..]),
            _ => LineKind::Chat(text),
        }
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new(DEFAULT_SIGILS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(raw: &str) -> Option<(String, Vec<String>)> {
        tokenize(raw).map(|p| (p.name, p.args))
    }

    #[test]
    fn test_tokenize_quoted_span() {
        let (name, args) = parts("say \"hello world\" now").unwrap();
        assert_eq!(name, "say");
        assert_eq!(args, vec!["hello world", "now"]);
    }

    #[test]
    fn test_tokenize_blank_line() {
        assert_eq!(parts("   "), None);
        assert_eq!(parts(""), None);
        assert_eq!(parts("\"  \""), None);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        let (name, args) = parts("a \"b c").unwrap();
        assert_eq!(name, "a");
        assert_eq!(args, vec!["b c"]);
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        let (name, args) = parts("  kick\t\t bob   now ").unwrap();
        assert_eq!(name, "kick");
        assert_eq!(args, vec!["bob", "now"]);
    }

    #[test]
    fn test_tokenize_keeps_case_and_trims_spans() {
        let (name, args) = parts("Tell \"  Big Al \" hi").unwrap();
        assert_eq!(name, "Tell");
        assert_eq!(args, vec!["Big Al", "hi"]);
    }

    #[test]
    fn test_tokenize_quote_joins_adjacent_text() {
        let (name, args) = parts("x pre\"fix y\"").unwrap();
        assert_eq!(name, "x");
        assert_eq!(args, vec!["prefix y"]);
    }

    #[test]
    fn test_tokenize_non_ascii() {
        let (name, args) = parts("msg \"Ünïcødé näme\" 日本").unwrap();
        assert_eq!(name, "msg");
        assert_eq!(args, vec!["Ünïcødé näme", "日本"]);
    }

    #[test]
    fn test_classify() {
        let parser = MessageParser::default();
        assert_eq!(parser.classify("/kick bob"), LineKind::Command("kick bob"));
        assert_eq!(parser.classify("!help"), LineKind::Command("help"));
        assert_eq!(parser.classify("hello"), LineKind::Chat("hello"));
        assert_eq!(parser.classify(" /kick"), LineKind::Chat(" /kick"));
    }

    #[test]
    fn test_classify_custom_sigil() {
        let parser = MessageParser::new(['.', '§']);
        assert_eq!(parser.classify("§tp"), LineKind::Command("tp"));
        assert_eq!(parser.classify("/tp"), LineKind::Chat("/tp"));
    }
}
