//! 注册生命周期测试（注册 / 心跳 / 注销 / 查询）

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    APP_NAME, ScriptedTransport, instance_config, instance_config_with_interval, instance_path,
    refused_url,
};
use eureka_client::config::MAX_HEARTBEAT_INTERVAL;
use eureka_client::{EurekaClient, EurekaConfig, EurekaError, RegistrationState, TransportError};
use http::{Method, StatusCode};
use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(base_url: &str) -> EurekaClient {
    EurekaClient::new(EurekaConfig::new(instance_config(base_url))).expect("client should build")
}

fn scripted_client(transport: Arc<ScriptedTransport>, heartbeat: Duration) -> Arc<EurekaClient> {
    let config = EurekaConfig::new(instance_config_with_interval("http://registry", heartbeat));
    Arc::new(EurekaClient::with_transport(config, transport))
}

#[tokio::test]
async fn test_register_succeeds_on_204() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/eureka/apps/{}", APP_NAME)))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    client.register().await.expect("register should succeed");
    assert_eq!(client.state(), RegistrationState::Registered);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["instance"]["app"], APP_NAME);
    assert_eq!(body["instance"]["instanceId"], "order-1");
    assert_eq!(body["instance"]["status"], "UP");
}

#[tokio::test]
async fn test_register_reports_error_on_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    let err = client.register().await.unwrap_err();

    assert!(matches!(err, EurekaError::Registration { .. }));
    assert_eq!(client.state(), RegistrationState::Unregistered);
}

#[tokio::test]
async fn test_register_reports_error_on_connection_failure() {
    let client = client_for(&refused_url());
    let err = client.register().await.unwrap_err();
    assert!(matches!(err, EurekaError::Registration { .. }));
}

#[tokio::test]
async fn test_register_does_not_retry() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(StatusCode::SERVICE_UNAVAILABLE);
    let client = scripted_client(transport.clone(), Duration::from_secs(30));

    assert!(client.register().await.is_err());
    assert_eq!(transport.count(Method::POST), 1);
}

#[tokio::test]
async fn test_is_registered_true_only_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(instance_path()))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(instance_path()))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    assert!(client.is_registered().await);
    assert!(!client.is_registered().await);
}

#[tokio::test]
async fn test_is_registered_false_on_connection_error() {
    let client = client_for(&refused_url());
    assert!(!client.is_registered().await);
}

#[tokio::test]
async fn test_de_register_succeeds_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(instance_path()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    client.register().await.unwrap();
    client.de_register().await.expect("de-register should succeed");
    assert_eq!(client.state(), RegistrationState::Unregistered);
}

#[tokio::test]
async fn test_de_register_reports_error_on_non_200() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(StatusCode::NO_CONTENT);
    transport.push_status(StatusCode::NOT_FOUND);
    let client = scripted_client(transport.clone(), Duration::from_secs(30));

    client.register().await.unwrap();
    let err = client.de_register().await.unwrap_err();

    assert!(matches!(err, EurekaError::DeRegistration { .. }));
    assert_eq!(client.state(), RegistrationState::Registered);
}

#[tokio::test]
async fn test_heartbeat_failures_are_not_fatal() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(StatusCode::NO_CONTENT);
    transport.push_status(StatusCode::OK);
    transport.push_status(StatusCode::INTERNAL_SERVER_ERROR);
    transport.push_error(TransportError::Connect("connection refused".to_string()));
    let client = scripted_client(transport.clone(), Duration::from_secs(30));

    client.register().await.unwrap();
    assert!(client.heartbeat().await);
    assert!(!client.heartbeat().await);
    assert!(!client.heartbeat().await);

    // 心跳失败不改变注册状态
    assert_eq!(client.state(), RegistrationState::Registered);
    let puts: Vec<_> = transport
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::PUT)
        .collect();
    assert_eq!(puts.len(), 3);
    assert!(puts.iter().all(|r| r.url == format!("http://registry{}", instance_path())));
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_task_beats_once_per_interval() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(StatusCode::NO_CONTENT);
    let client = scripted_client(transport.clone(), Duration::from_secs(30));

    let mut handle = client.start().await.expect("start should register");
    assert_eq!(transport.count(Method::POST), 1);

    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(transport.count(Method::PUT), 0, "first beat waits one interval");

    tokio::time::sleep(Duration::from_secs(66)).await;
    assert_eq!(transport.count(Method::PUT), 3);

    handle.stop().await;
    assert!(!handle.is_running());

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(transport.count(Method::PUT), 3, "no beats after stop");
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_task_survives_rejected_beats() {
    let transport = Arc::new(ScriptedTransport::with_default(StatusCode::INTERNAL_SERVER_ERROR));
    let client = scripted_client(transport.clone(), Duration::from_secs(10));

    let handle = client.spawn_heartbeat();
    tokio::time::sleep(Duration::from_secs(45)).await;

    assert_eq!(transport.count(Method::PUT), 4);
    assert!(handle.is_running());
    drop(handle);
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_task_keeps_running_at_the_longest_interval() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(StatusCode::NO_CONTENT);
    let client = scripted_client(transport.clone(), MAX_HEARTBEAT_INTERVAL);

    let mut handle = client.start().await.expect("start should register");
    tokio::time::sleep(Duration::from_secs(60)).await;

    assert!(handle.is_running());
    assert_eq!(transport.count(Method::PUT), 0);
    handle.stop().await;
}

#[tokio::test]
async fn test_start_does_not_spawn_heartbeat_when_registration_fails() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(StatusCode::INTERNAL_SERVER_ERROR);
    let client = scripted_client(transport.clone(), Duration::from_millis(10));

    assert!(client.start().await.is_err());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(transport.count(Method::PUT), 0);
}

#[tokio::test]
async fn test_shutdown_stops_heartbeat_then_de_registers() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(StatusCode::NO_CONTENT);
    let client = scripted_client(transport.clone(), Duration::from_millis(20));

    let handle = client.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(70)).await;
    handle.shutdown().await.expect("shutdown should de-register");

    let methods: Vec<Method> = transport.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods.first(), Some(&Method::POST));
    assert_eq!(methods.last(), Some(&Method::DELETE));
    assert!(methods.iter().filter(|m| **m == Method::PUT).count() >= 1);
    assert_eq!(client.state(), RegistrationState::Unregistered);
}

#[tokio::test]
async fn test_run_until_registers_and_beats_until_shutdown() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_status(StatusCode::NO_CONTENT);
    let client = scripted_client(transport.clone(), Duration::from_millis(20));

    client
        .run_until(tokio::time::sleep(Duration::from_millis(90)))
        .await
        .expect("run_until should register");

    assert_eq!(transport.count(Method::POST), 1);
    assert!(transport.count(Method::PUT) >= 2);
    assert_eq!(transport.count(Method::DELETE), 0, "no automatic de-registration");
    assert_eq!(client.state(), RegistrationState::Registered);
}
