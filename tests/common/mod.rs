//! 测试公共工具

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use eureka_client::{
    HttpTransport, InstanceConfig, RegistryRequest, RegistryResponse, TransportError,
};
use http::{Method, StatusCode};

pub const APP_NAME: &str = "ORDER-SERVICE";
pub const INSTANCE_ID: &str = "order-1";

/// 测试用实例配置
pub fn instance_config(base_url: &str) -> InstanceConfig {
    instance_config_with_interval(base_url, Duration::from_secs(30))
}

pub fn instance_config_with_interval(base_url: &str, heartbeat: Duration) -> InstanceConfig {
    InstanceConfig::builder()
        .eureka_default_url(base_url)
        .host_name("test-host")
        .app_name(APP_NAME)
        .instance_id(INSTANCE_ID)
        .ip("127.0.0.1")
        .port(8000, false)
        .home_page_url("http://localhost:8000")
        .heartbeat_interval(heartbeat)
        .request_timeout(Duration::from_secs(2))
        .build()
        .expect("test config should be valid")
}

/// 实例路径
pub fn instance_path() -> String {
    format!("/eureka/apps/{}/{}", APP_NAME, INSTANCE_ID)
}

/// 一个必定拒绝连接的地址
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// 按脚本返回响应的内存传输
///
/// 脚本耗尽后返回默认响应（200，空响应体）
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RegistryResponse, TransportError>>>,
    requests: Mutex<Vec<RegistryRequest>>,
    default_status: StatusCode,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::with_default(StatusCode::OK)
    }

    pub fn with_default(default_status: StatusCode) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_status,
        }
    }

    pub fn push_status(&self, status: StatusCode) {
        self.push_response(status, "");
    }

    pub fn push_response(&self, status: StatusCode, body: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(RegistryResponse::new(status, body)));
    }

    pub fn push_error(&self, error: TransportError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<RegistryRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: RegistryRequest) -> Result<RegistryResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(RegistryResponse::new(self.default_status, "")))
    }
}
