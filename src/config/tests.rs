use super::merge_with_defaults;
use super::settings::{
    PartialGatewaySettings, PartialServerSettings, PartialSettings, Settings,
};

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.registry.store_path, "registry_db");
    assert!(settings.gateway.default_subscription.is_none());
}

#[test]
fn test_partial_settings_merge_over_defaults() {
    let partial = PartialSettings {
        server: Some(PartialServerSettings {
            host: None,
            port: Some(9000),
        }),
        registry: None,
        gateway: Some(PartialGatewaySettings {
            default_subscription: Some("presence".to_string()),
        }),
    };

    let settings = merge_with_defaults(partial);
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 9000);
    assert_eq!(settings.registry.store_path, "registry_db");
    assert_eq!(
        settings.gateway.default_subscription.as_deref(),
        Some("presence")
    );
}
