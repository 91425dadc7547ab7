//! 注册中心 HTTP 传输层
//!
//! 客户端只依赖 [`HttpTransport`]，默认实现基于 reqwest；测试可以替换为内存实现

use std::time::Duration;

use async_trait::async_trait;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::error::{ConfigError, Result};

const APPLICATION_JSON: &str = "application/json";

/// 发往注册中心的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

impl RegistryRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    /// 附带 JSON 请求体
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }
}

/// 注册中心的响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RegistryResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// 传输层错误（与 HTTP 状态码错误区分）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 连接失败（拒绝连接、DNS 解析失败等）
    #[error("connection failed: {0}")]
    Connect(String),

    /// 请求超时
    #[error("request timed out: {0}")]
    Timeout(String),

    /// 其他传输错误
    #[error("transport error: {0}")]
    Other(String),
}

/// HTTP 传输能力
///
/// 每个请求都必须带上 `Content-Type: application/json` 与 `Accept: application/json`
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: RegistryRequest,
    ) -> std::result::Result<RegistryResponse, TransportError>;
}

/// 基于 reqwest 的传输实现
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// 创建带超时的传输
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid {
                field: "requestTimeout",
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    /// 复用已有的 reqwest 客户端
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: RegistryRequest,
    ) -> std::result::Result<RegistryResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        Ok(RegistryResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
