//! 配置项
//!
//! 构建时可识别的配置项，键名与 Eureka 客户端惯用的 camelCase 一致。
//! 可以直接在代码里构造，也可以从 TOML 文件加载后再用环境变量覆盖。

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::InstanceConfigBuilder;
use crate::error::{ConfigError, Result};

/// 端口配置项
///
/// 支持两种写法：`port = [8000, true]` 或 `port = { value = 8000, secure = true }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortOption {
    Pair(u16, bool),
    Table {
        value: u16,
        #[serde(default)]
        secure: bool,
    },
}

impl PortOption {
    pub fn value(&self) -> u16 {
        match *self {
            PortOption::Pair(value, _) | PortOption::Table { value, .. } => value,
        }
    }

    pub fn secure(&self) -> bool {
        match *self {
            PortOption::Pair(_, secure) | PortOption::Table { secure, .. } => secure,
        }
    }
}

/// 原始配置项（未校验）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EurekaOptions {
    /// 注册中心地址（如 `http://localhost:8761`）
    pub eureka_default_url: Option<String>,
    pub host_name: Option<String>,
    pub app_name: Option<String>,
    pub ip: Option<String>,
    /// 显式实例 ID，缺省时由 `hostName:appName:ip` 推导
    pub instance_id: Option<String>,
    pub port: Option<PortOption>,
    pub home_page_url: Option<String>,
    pub status_page_url: Option<String>,
    pub health_check_url: Option<String>,
    /// 心跳间隔（秒）
    pub heartbeat_interval: Option<u64>,
    /// 单次请求超时（秒）
    pub request_timeout: Option<u64>,
    pub data_center_name: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl EurekaOptions {
    /// 从 TOML 文件加载
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: EurekaOptions =
            toml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
        Ok(options)
    }

    /// 使用进程环境变量覆盖配置
    ///
    /// 支持的变量：
    /// - `EUREKA_DEFAULT_URL`
    /// - `EUREKA_APP_NAME`
    /// - `EUREKA_HEARTBEAT_INTERVAL`（秒）
    /// - `EUREKA_REQUEST_TIMEOUT`（秒）
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 使用任意键值来源覆盖配置
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("EUREKA_DEFAULT_URL") {
            debug!(url = %url, "Overriding eurekaDefaultUrl from environment");
            self.eureka_default_url = Some(url);
        }
        if let Some(app_name) = lookup("EUREKA_APP_NAME") {
            self.app_name = Some(app_name);
        }
        if let Some(raw) = lookup("EUREKA_HEARTBEAT_INTERVAL") {
            self.heartbeat_interval = Some(parse_seconds("heartbeatInterval", &raw)?);
        }
        if let Some(raw) = lookup("EUREKA_REQUEST_TIMEOUT") {
            self.request_timeout = Some(parse_seconds("requestTimeout", &raw)?);
        }
        Ok(self)
    }

    /// 转换为构建器
    pub fn into_builder(self) -> InstanceConfigBuilder {
        InstanceConfigBuilder::from(self)
    }
}

fn parse_seconds(field: &'static str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::Invalid {
            field,
            reason: format!("'{}' is not a number of seconds: {}", raw, e),
        }
        .into()
    })
}
