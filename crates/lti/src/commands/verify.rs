//! `lti verify` command implementation.

use std::io::{self, Read};
use std::path::PathBuf;

use clap::Args;
use lti_config::{CliSettings, Config};
use lti_provider::{LaunchContext, LaunchRequest, ProviderSettings, ToolProvider};
use lti_store::{Consumer, MemoryStore};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the verify command.
#[derive(Args)]
pub(crate) struct VerifyArgs {
    /// Request URI the launch was posted to.
    #[arg(short, long)]
    url: String,

    /// Form-encoded launch body (default: read from stdin).
    #[arg(short, long)]
    body: Option<String>,

    /// Timestamp freshness window in seconds (overrides config).
    #[arg(long)]
    window: Option<u64>,

    /// Path to configuration file (default: auto-discover lti.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl VerifyArgs {
    /// Execute the verify command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load or the launch is rejected.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            freshness_window_secs: self.window,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if config.consumers.is_empty() {
            return Err(CliError::Validation(
                "no [[consumers]] configured".to_owned(),
            ));
        }

        let body = match self.body {
            Some(body) => body,
            None => {
                let mut body = String::new();
                io::stdin().read_to_string(&mut body)?;
                body
            }
        };

        let settings = ProviderSettings::from(&config.provider);
        let store = MemoryStore::from_consumers(
            config
                .consumers
                .iter()
                .map(|c| Consumer::new(&c.key, &c.secret).with_active(c.active)),
        )
        .with_nonce_retention(settings.freshness_window.saturating_mul(2));
        tracing::debug!(
            consumers = config.consumers.len(),
            window_secs = settings.freshness_window.as_secs(),
            launch_url = settings.launch_url.as_deref().unwrap_or("-"),
            "Loaded verifier settings"
        );
        let provider = ToolProvider::with_settings(store, settings);

        let request = LaunchRequest::from_form_body(&self.url, body.trim());
        let launch = provider.validate(request)?;

        output.success(&format!("Launch accepted from '{}'", launch.consumer_key()));
        print_launch(&output, &launch);

        Ok(())
    }
}

fn print_launch(output: &Output, launch: &LaunchContext) {
    output.field("Message type", launch.message_type().unwrap_or("-"));
    output.field("LTI version", launch.lti_version().unwrap_or("-"));

    let roles: Vec<&str> = launch.roles().iter().map(String::as_str).collect();
    output.field("Roles", &roles.join(", "));

    for (title, params) in [
        ("User", launch.user_parameters()),
        ("Resource", launch.resource_parameters()),
        ("Context", launch.context_parameters()),
        ("Consumer", launch.consumer_parameters()),
        ("Custom", launch.custom_parameters().clone()),
        ("Extension", launch.extension_parameters().clone()),
    ] {
        output.parameters(title, &params);
    }
}
