use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub registry: RegistrySettings,
    pub gateway: GatewaySettings,
}

/// Host and port the gateway binds to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Settings for the durable registry store.
#[derive(Debug, Deserialize, Clone)]
pub struct RegistrySettings {
    /// Filesystem path of the sled database.
    pub store_path: String,
}

/// Settings for the connection gateway.
#[derive(Debug, Deserialize, Clone)]
pub struct GatewaySettings {
    /// When set, every connection is auto-subscribed on connect to the
    /// collection-level topic of this subscription name.
    pub default_subscription: Option<String>,
}

/// Partial configuration loaded from files or environment.
///
/// Allows partial specification; missing values are filled from defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub registry: Option<PartialRegistrySettings>,
    pub gateway: Option<PartialGatewaySettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRegistrySettings {
    pub store_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialGatewaySettings {
    pub default_subscription: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            registry: RegistrySettings {
                store_path: "registry_db".to_string(),
            },
            gateway: GatewaySettings {
                default_subscription: None,
            },
        }
    }
}
