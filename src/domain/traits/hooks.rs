use crate::domain::entities::{Player, Session};

/// Whatever a hook chose to return. The bridge only checks for presence.
pub type HookValue = serde_json::Value;

/// True when a hook returned something other than nothing or `null`
pub fn is_handled(value: &Option<HookValue>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

/// Hooks the bridge calls into while processing server events.
///
/// Every event comes in two flavours: one keyed by the durable [`Player`]
/// and one keyed by the raw [`Session`]. Returning a non-null value from a
/// chat or command hook marks the line as handled.
pub trait PluginHooks: Send + Sync {
    fn on_player_chat(&self, _player: &Player, _message: &str) -> Option<HookValue> {
        None
    }

    fn on_session_chat(&self, _session: &Session, _message: &str) -> Option<HookValue> {
        None
    }

    fn on_player_command(
        &self,
        _player: &Player,
        _command: &str,
        _args: &[String],
    ) -> Option<HookValue> {
        None
    }

    fn on_session_command(
        &self,
        _session: &Session,
        _command: &str,
        _args: &[String],
    ) -> Option<HookValue> {
        None
    }

    fn on_player_connected(&self, _player: &Player) {}

    fn on_session_connected(&self, _session: &Session) {}

    fn on_player_disconnected(&self, _player: &Player, _reason: &str) {}

    fn on_session_disconnected(&self, _session: &Session, _reason: &str) {}

    /// `initial` is false when a plugin is loaded after startup completed
    fn on_server_initialized(&self, _initial: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_handled() {
        assert!(!is_handled(&None));
        assert!(!is_handled(&Some(HookValue::Null)));
        assert!(is_handled(&Some(json!(true))));
        assert!(is_handled(&Some(json!(false))));
        assert!(is_handled(&Some(json!(""))));
    }
}
