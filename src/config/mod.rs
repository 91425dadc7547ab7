//! 客户端配置
//!
//! - [`InstanceConfig`]: 本实例的不可变描述（应用名、网络标识、URL、心跳间隔）
//! - [`EurekaConfig`]: 在实例描述之外再挂上两个扩展点（选择策略、兜底实例源）

pub mod options;
pub mod registration;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::discovery::{DiscoveryStrategy, RandomStrategy};
use crate::error::{ConfigError, Result};
use crate::provider::InstanceProvider;

pub use options::{EurekaOptions, PortOption};
pub use registration::{DataCenterInfo, InstanceInfo, InstanceStatus, PortInfo, RegistrationDescriptor};

/// 默认心跳间隔
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// 默认请求超时
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 心跳间隔上限
pub const MAX_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// 请求超时上限
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// 默认数据中心名
pub const DEFAULT_DATA_CENTER: &str = "MyOwn";

/// 端口（值 + 是否为安全端口）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfig {
    pub value: u16,
    pub secure: bool,
}

impl PortConfig {
    pub fn new(value: u16, secure: bool) -> Self {
        Self { value, secure }
    }

    fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self::new(80, false)
    }
}

impl From<PortOption> for PortConfig {
    fn from(option: PortOption) -> Self {
        Self::new(option.value(), option.secure())
    }
}

/// 实例配置（构建后不可变）
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceConfig {
    eureka_default_url: String,
    app_name: String,
    instance_id: String,
    host_name: String,
    ip: String,
    port: PortConfig,
    home_page_url: String,
    status_page_url: String,
    health_check_url: String,
    heartbeat_interval: Duration,
    request_timeout: Duration,
    data_center_name: String,
    metadata: BTreeMap<String, String>,
}

impl InstanceConfig {
    /// 校验配置项并构建
    pub fn build(options: EurekaOptions) -> Result<Self> {
        options.into_builder().build()
    }

    pub fn builder() -> InstanceConfigBuilder {
        InstanceConfigBuilder::default()
    }

    /// 注册中心地址（不含结尾的 `/`）
    pub fn eureka_default_url(&self) -> &str {
        &self.eureka_default_url
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    pub fn port(&self) -> PortConfig {
        self.port
    }

    pub fn home_page_url(&self) -> &str {
        &self.home_page_url
    }

    pub fn status_page_url(&self) -> &str {
        &self.status_page_url
    }

    pub fn health_check_url(&self) -> &str {
        &self.health_check_url
    }

    pub fn heartbeat_interval(&self) -> Duration {
        self.heartbeat_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn data_center_name(&self) -> &str {
        &self.data_center_name
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// 应用级路径：`{base}/eureka/apps/{app}`
    pub fn app_url(&self, app_name: &str) -> String {
        format!("{}/eureka/apps/{}", self.eureka_default_url, app_name)
    }

    /// 实例级路径：`{base}/eureka/apps/{app}/{instanceId}`
    pub fn instance_url(&self) -> String {
        format!("{}/{}", self.app_url(&self.app_name), self.instance_id)
    }

    /// 生成注册请求体
    pub fn registration_config(&self) -> RegistrationDescriptor {
        RegistrationDescriptor::from_config(self)
    }
}

/// 实例配置构建器
#[derive(Debug, Clone, Default)]
pub struct InstanceConfigBuilder {
    eureka_default_url: Option<String>,
    app_name: Option<String>,
    instance_id: Option<String>,
    host_name: Option<String>,
    ip: Option<String>,
    port: Option<PortConfig>,
    home_page_url: Option<String>,
    status_page_url: Option<String>,
    health_check_url: Option<String>,
    heartbeat_interval: Option<Duration>,
    request_timeout: Option<Duration>,
    data_center_name: Option<String>,
    metadata: BTreeMap<String, String>,
}

impl From<EurekaOptions> for InstanceConfigBuilder {
    fn from(options: EurekaOptions) -> Self {
        Self {
            eureka_default_url: options.eureka_default_url,
            app_name: options.app_name,
            instance_id: options.instance_id,
            host_name: options.host_name,
            ip: options.ip,
            port: options.port.map(PortConfig::from),
            home_page_url: options.home_page_url,
            status_page_url: options.status_page_url,
            health_check_url: options.health_check_url,
            heartbeat_interval: options.heartbeat_interval.map(Duration::from_secs),
            request_timeout: options.request_timeout.map(Duration::from_secs),
            data_center_name: options.data_center_name,
            metadata: options.metadata,
        }
    }
}

impl InstanceConfigBuilder {
    pub fn eureka_default_url(mut self, url: impl Into<String>) -> Self {
        self.eureka_default_url = Some(url.into());
        self
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    pub fn host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = Some(host_name.into());
        self
    }

    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn port(mut self, value: u16, secure: bool) -> Self {
        self.port = Some(PortConfig::new(value, secure));
        self
    }

    pub fn home_page_url(mut self, url: impl Into<String>) -> Self {
        self.home_page_url = Some(url.into());
        self
    }

    pub fn status_page_url(mut self, url: impl Into<String>) -> Self {
        self.status_page_url = Some(url.into());
        self
    }

    pub fn health_check_url(mut self, url: impl Into<String>) -> Self {
        self.health_check_url = Some(url.into());
        self
    }

    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn data_center_name(mut self, name: impl Into<String>) -> Self {
        self.data_center_name = Some(name.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// 校验并构建
    ///
    /// 必填：`eurekaDefaultUrl`、`appName`、`hostName`、`ip`
    pub fn build(self) -> Result<InstanceConfig> {
        let eureka_default_url =
            normalize_base_url(required("eurekaDefaultUrl", self.eureka_default_url)?)?;
        let app_name = required("appName", self.app_name)?;
        ensure_url_safe("appName", &app_name)?;
        let host_name = required("hostName", self.host_name)?;
        let ip = required("ip", self.ip)?;

        let instance_id = match self.instance_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id,
            None => format!("{}:{}:{}", host_name, app_name, ip),
        };
        ensure_url_safe("instanceId", &instance_id)?;

        let port = self.port.unwrap_or_default();
        let home_page_url = self
            .home_page_url
            .unwrap_or_else(|| format!("{}://{}:{}/", port.scheme(), host_name, port.value));
        let status_page_url = self
            .status_page_url
            .unwrap_or_else(|| format!("{}info", ensure_trailing_slash(&home_page_url)));
        let health_check_url = self
            .health_check_url
            .unwrap_or_else(|| format!("{}health", ensure_trailing_slash(&home_page_url)));

        let heartbeat_interval = self.heartbeat_interval.unwrap_or(DEFAULT_HEARTBEAT_INTERVAL);
        ensure_in_range("heartbeatInterval", heartbeat_interval, MAX_HEARTBEAT_INTERVAL)?;
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        ensure_in_range("requestTimeout", request_timeout, MAX_REQUEST_TIMEOUT)?;

        Ok(InstanceConfig {
            eureka_default_url,
            app_name,
            instance_id,
            host_name,
            ip,
            port,
            home_page_url,
            status_page_url,
            health_check_url,
            heartbeat_interval,
            request_timeout,
            data_center_name: self
                .data_center_name
                .unwrap_or_else(|| DEFAULT_DATA_CENTER.to_string()),
            metadata: self.metadata,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing(field).into()),
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let trimmed = raw.trim_end_matches('/').to_string();
    let parsed = reqwest::Url::parse(&trimmed).map_err(|e| ConfigError::Invalid {
        field: "eurekaDefaultUrl",
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            field: "eurekaDefaultUrl",
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        }
        .into());
    }
    Ok(trimmed)
}

/// 是否可以原样放进 URL 路径段
///
/// 只允许 RFC 3986 非保留字符和 ':'，且不能为空或是 `.` / `..`
pub(crate) fn is_url_safe(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | ':'))
}

fn ensure_url_safe(field: &'static str, value: &str) -> Result<()> {
    if is_url_safe(value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("'{}' is not URL-safe", value),
        }
        .into())
    }
}

fn ensure_in_range(field: &'static str, value: Duration, max: Duration) -> Result<()> {
    if value.is_zero() {
        return Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero".to_string(),
        }
        .into());
    }
    if value > max {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must not exceed {}s", max.as_secs()),
        }
        .into());
    }
    Ok(())
}

fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// 客户端配置：实例描述 + 扩展点
///
/// 选择策略和兜底实例源推荐在构建时传入；兜底实例源也可以在之后挂上
pub struct EurekaConfig {
    instance: InstanceConfig,
    discovery_strategy: Arc<dyn DiscoveryStrategy>,
    instance_provider: RwLock<Option<Arc<dyn InstanceProvider>>>,
}

impl EurekaConfig {
    /// 使用默认随机策略、无兜底实例源创建
    pub fn new(instance: InstanceConfig) -> Self {
        Self {
            instance,
            discovery_strategy: Arc::new(RandomStrategy::new()),
            instance_provider: RwLock::new(None),
        }
    }

    /// 从原始配置项创建
    pub fn from_options(options: EurekaOptions) -> Result<Self> {
        Ok(Self::new(InstanceConfig::build(options)?))
    }

    /// 设置选择策略
    pub fn with_discovery_strategy(mut self, strategy: Arc<dyn DiscoveryStrategy>) -> Self {
        self.discovery_strategy = strategy;
        self
    }

    /// 设置兜底实例源
    pub fn with_instance_provider(self, provider: Arc<dyn InstanceProvider>) -> Self {
        self.set_instance_provider(provider);
        self
    }

    pub fn instance(&self) -> &InstanceConfig {
        &self.instance
    }

    /// 当前选择策略（未设置时为均匀随机）
    pub fn discovery_strategy(&self) -> Arc<dyn DiscoveryStrategy> {
        self.discovery_strategy.clone()
    }

    /// 挂上（或替换）兜底实例源
    pub fn set_instance_provider(&self, provider: Arc<dyn InstanceProvider>) {
        let mut slot = self
            .instance_provider
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(provider);
    }

    /// 当前兜底实例源
    pub fn instance_provider(&self) -> Option<Arc<dyn InstanceProvider>> {
        self.instance_provider
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 生成注册请求体
    pub fn registration_config(&self) -> RegistrationDescriptor {
        self.instance.registration_config()
    }
}

impl std::fmt::Debug for EurekaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EurekaConfig")
            .field("instance", &self.instance)
            .field("has_instance_provider", &self.instance_provider().is_some())
            .finish()
    }
}
