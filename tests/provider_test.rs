//! 静态兜底实例源测试

use eureka_client::{Instance, InstanceProvider, StaticInstanceProvider};
use tokio_test::block_on;

#[test]
fn test_static_provider_matches_app_name_case_insensitively() {
    let provider = StaticInstanceProvider::new()
        .with_app("Config_Server", vec![Instance::new("http://config:8888/")]);

    let instances = block_on(provider.get_instances("CONFIG_SERVER"));
    assert_eq!(instances, vec![Instance::new("http://config:8888/")]);

    let instances = block_on(provider.get_instances("config_server"));
    assert_eq!(instances.len(), 1);
}

#[test]
fn test_static_provider_uses_defaults_for_unknown_apps() {
    let provider = StaticInstanceProvider::new()
        .with_app("BILLING", vec![Instance::new("http://billing/")])
        .with_default(vec![
            Instance::new("http://gateway-a/"),
            Instance::new("http://gateway-b/"),
        ]);

    let instances = block_on(provider.get_instances("CATALOG"));
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].home_page_url, "http://gateway-a/");
}

#[test]
fn test_empty_static_provider_returns_nothing() {
    let provider = StaticInstanceProvider::new();
    assert!(block_on(provider.get_instances("ANY")).is_empty());
}
