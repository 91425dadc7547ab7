//! 实例类型测试

use eureka_client::Instance;
use serde_json::json;

#[test]
fn test_instance_keeps_unmodelled_registry_fields() {
    let instance: Instance = serde_json::from_value(json!({
        "instanceId": "web-01:BILLING:10.0.0.5",
        "app": "BILLING",
        "status": "OUT_OF_SERVICE",
        "homePageUrl": "http://web-01:8000/",
        "port": { "$": 8000, "@enabled": "true" },
        "metadata": { "zone": "a" }
    }))
    .unwrap();

    assert_eq!(instance.instance_id.as_deref(), Some("web-01:BILLING:10.0.0.5"));
    assert_eq!(instance.extra_field("port"), Some(&json!({ "$": 8000, "@enabled": "true" })));
    assert_eq!(instance.extra_field("metadata").and_then(|m| m.get("zone")), Some(&json!("a")));
    assert!(!instance.is_up());
}

#[test]
fn test_instance_status_check() {
    let instance = Instance::new("http://a/")
        .with_instance_id("a-1")
        .with_app("A");

    // 未上报状态视为可用
    assert!(instance.is_up());
    assert!(instance.clone().with_status("UP").is_up());
    assert!(instance.clone().with_status("up").is_up());
    assert!(!instance.clone().with_status("DOWN").is_up());

    assert_eq!(instance.instance_id.as_deref(), Some("a-1"));
    assert_eq!(instance.app.as_deref(), Some("A"));
}

#[test]
fn test_instance_serializes_without_empty_optionals() {
    let value = serde_json::to_value(Instance::new("http://a/")).unwrap();
    assert_eq!(value, json!({ "homePageUrl": "http://a/" }));
}
