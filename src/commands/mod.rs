pub mod auth;
pub mod calendars;
pub mod clear;
pub mod edit;
pub mod events;
pub mod show;

use anyhow::Result;
use confedit_core::ConferencePatchClient;
use confedit_core::config::ConfeditConfig;
use confedit_core::provider::Provider;
use confedit_core::window::EventWindow;

/// Loaded config plus a patch client bound to the configured provider account.
pub struct Context {
    pub config: ConfeditConfig,
    pub client: ConferencePatchClient<Provider>,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = ConfeditConfig::load()?;
        let provider = config.provider()?;
        tracing::debug!(
            provider = provider.name(),
            account = provider.account(),
            "Loaded config"
        );
        let client = ConferencePatchClient::new(provider);
        Ok(Context { config, client })
    }

    pub fn calendar_id<'a>(&'a self, arg: Option<&'a str>) -> &'a str {
        arg.unwrap_or(&self.config.default_calendar)
    }

    pub fn window(&self, from: Option<&str>, to: Option<&str>) -> Result<EventWindow> {
        EventWindow::from_args(from, to, self.config.window_days).map_err(|e| anyhow::anyhow!(e))
    }
}
