mod settings;

use config::{Config, ConfigError, Environment, File};

use crate::config::settings::PartialSettings;

pub use settings::{GatewaySettings, RegistrySettings, ServerSettings, Settings};

/// Loads configuration from the default file and environment variables,
/// merged over built-in defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(merge_with_defaults(partial))
}

/// Merges partially specified settings over `Settings::default()`.
pub fn merge_with_defaults(partial: PartialSettings) -> Settings {
    let default = Settings::default();

    Settings {
        server: ServerSettings {
            host: partial
                .server
                .as_ref()
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: partial
                .server
                .as_ref()
                .and_then(|s| s.port)
                .unwrap_or(default.server.port),
        },
        registry: RegistrySettings {
            store_path: partial
                .registry
                .as_ref()
                .and_then(|r| r.store_path.clone())
                .unwrap_or(default.registry.store_path),
        },
        gateway: GatewaySettings {
            default_subscription: partial
                .gateway
                .as_ref()
                .and_then(|g| g.default_subscription.clone()),
        },
    }
}

#[cfg(test)]
mod tests;
