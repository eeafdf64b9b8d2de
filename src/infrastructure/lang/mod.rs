//! Localized message tables

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex_lite::{Captures, Regex};

use crate::infrastructure::config::LangConfig;

pub const UNKNOWN_COMMAND: &str = "UnknownCommand";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\d+)\}").expect("placeholder pattern is valid"));

/// Message templates per language, with `{0}`-style placeholders
#[derive(Debug, Clone)]
pub struct Lang {
    default: String,
    messages: HashMap<String, HashMap<String, String>>,
}

impl Lang {
    pub fn new(default: impl Into<String>) -> Self {
        let mut en = HashMap::new();
        en.insert(UNKNOWN_COMMAND.to_string(), "Unknown command: {0}".to_string());

        let mut messages = HashMap::new();
        messages.insert("en".to_string(), en);

        Self {
            default: default.into(),
            messages,
        }
    }

    /// Built-in messages overlaid with configured ones
    pub fn from_config(config: &LangConfig) -> Self {
        let mut lang = Self::new(config.default.clone());
        for (language, table) in &config.messages {
            let entry = lang.messages.entry(language.clone()).or_default();
            entry.extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        lang
    }

    /// Template for `key` in `language`, falling back to the default
    /// language, then English, then the key itself
    pub fn get<'a>(&'a self, key: &'a str, language: Option<&str>) -> &'a str {
        language
            .into_iter()
            .chain([self.default.as_str(), "en"])
            .find_map(|l| self.messages.get(l).and_then(|m| m.get(key)))
            .map(String::as_str)
            .unwrap_or(key)
    }

    pub fn format(&self, key: &str, language: Option<&str>, args: &[&str]) -> String {
        let template = self.get(key, language);
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| args.get(i))
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl Default for Lang {
    fn default() -> Self {
        Self::new("en")
    }
}
