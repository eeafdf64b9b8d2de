//! The bridge's own plugin

use std::sync::Arc;

use tracing::warn;

use crate::application::errors::CommandError;
use crate::domain::entities::LivePlayer;
use crate::domain::traits::{Host, PluginHooks};
use crate::plugins::trait_def::{Plugin, PluginCommands};

pub const CORE_PLUGIN_NAME: &str = "plugbridge";

/// Commands every server gets, locked against other plugins
pub struct CorePlugin {
    host: Arc<dyn Host>,
}

impl CorePlugin {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }
}

impl PluginHooks for CorePlugin {}

impl Plugin for CorePlugin {
    fn name(&self) -> &str {
        CORE_PLUGIN_NAME
    }

    fn description(&self) -> &str {
        "Built-in bridge commands"
    }

    fn init(&self, commands: &mut PluginCommands<'_>) -> Result<(), CommandError> {
        let host = self.host.clone();
        commands.add(
            &["version", "bridge.version"],
            move |caller: &LivePlayer, _: &str, _: &[String]| {
                let info = host.host_info();
                let text = format!(
                    "{} v{} on {} {}",
                    CORE_PLUGIN_NAME,
                    env!("CARGO_PKG_VERSION"),
                    info.name,
                    info.version
                );
                if let Err(e) = host.send_message(caller.session(), &text) {
                    warn!("Failed to reply to {}: {}", caller.player(), e);
                }
                true
            },
        )
    }
}
