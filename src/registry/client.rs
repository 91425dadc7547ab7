//! Eureka 客户端
//!
//! 负责注册生命周期（注册 / 心跳 / 注销 / 查询是否已注册）与实例解析
//! （缓存 → 注册中心 → 兜底实例源）

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use http::{Method, StatusCode};
use serde::Deserialize;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, warn};

use super::cache::InstanceCache;
use super::heartbeat::HeartbeatHandle;
use super::transport::{HttpTransport, RegistryRequest, ReqwestTransport, TransportError};
use crate::config::{EurekaConfig, is_url_safe};
use crate::error::{EurekaError, Result};
use crate::types::Instance;

/// 注册状态
///
/// 心跳失败不会改变状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegistrationState {
    Unregistered = 0,
    Registering = 1,
    Registered = 2,
    DeRegistering = 3,
}

impl RegistrationState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => RegistrationState::Registering,
            2 => RegistrationState::Registered,
            3 => RegistrationState::DeRegistering,
            _ => RegistrationState::Unregistered,
        }
    }
}

/// 注册中心没有给出可用实例的原因
#[derive(Debug)]
enum RegistryMiss {
    Status(StatusCode),
    Empty,
    Transport(TransportError),
}

impl RegistryMiss {
    fn into_error(self, app_name: &str) -> EurekaError {
        match self {
            RegistryMiss::Status(status) => {
                EurekaError::registry_unavailable(app_name, format!("unexpected status {}", status))
            }
            RegistryMiss::Empty => EurekaError::no_instance_found(app_name),
            RegistryMiss::Transport(err) => {
                EurekaError::registry_unavailable(app_name, err.to_string())
            }
        }
    }
}

#[derive(Deserialize)]
struct ApplicationEnvelope {
    application: Option<ApplicationBody>,
}

#[derive(Deserialize)]
struct ApplicationBody {
    #[serde(default)]
    instance: Option<OneOrMany>,
}

// 只有一个实例时 Eureka 可能返回对象而不是数组
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Instance>),
    One(Box<Instance>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<Instance> {
        match self {
            OneOrMany::Many(instances) => instances,
            OneOrMany::One(instance) => vec![*instance],
        }
    }
}

/// Eureka 客户端
pub struct EurekaClient {
    config: Arc<EurekaConfig>,
    transport: Arc<dyn HttpTransport>,
    cache: InstanceCache,
    state: AtomicU8,
}

impl EurekaClient {
    /// 使用 reqwest 传输创建客户端（超时取自配置）
    pub fn new(config: EurekaConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.instance().request_timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// 注入自定义传输
    pub fn with_transport(config: EurekaConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            cache: InstanceCache::new(),
            state: AtomicU8::new(RegistrationState::Unregistered as u8),
        }
    }

    /// 为实例缓存设置 TTL（默认永不过期）
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = InstanceCache::with_ttl(ttl);
        self
    }

    pub fn config(&self) -> &EurekaConfig {
        &self.config
    }

    pub fn cache(&self) -> &InstanceCache {
        &self.cache
    }

    pub fn state(&self) -> RegistrationState {
        RegistrationState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: RegistrationState) -> RegistrationState {
        RegistrationState::from_u8(self.state.swap(state as u8, Ordering::AcqRel))
    }

    // ============================================================
    // 生命周期
    // ============================================================

    /// 向注册中心注册本实例
    ///
    /// 成功条件为 204；其余状态码或传输失败返回 `Registration` 错误，不自动重试
    pub async fn register(&self) -> Result<()> {
        let instance = self.config.instance();
        let previous = self.set_state(RegistrationState::Registering);
        info!(
            app_name = %instance.app_name(),
            instance_id = %instance.instance_id(),
            "Registering with Eureka"
        );

        let outcome = self.send_registration().await;
        match &outcome {
            Ok(()) => {
                self.set_state(RegistrationState::Registered);
                info!(
                    app_name = %instance.app_name(),
                    instance_id = %instance.instance_id(),
                    "✅ Registered with Eureka"
                );
            }
            Err(e) => {
                self.set_state(previous);
                error!(
                    app_name = %instance.app_name(),
                    error = %e,
                    "❌ Failed to register with Eureka"
                );
            }
        }
        outcome
    }

    async fn send_registration(&self) -> Result<()> {
        let instance = self.config.instance();
        let request = RegistryRequest::new(Method::POST, instance.app_url(instance.app_name()))
            .with_json(&self.config.registration_config())?;

        match self.transport.send(request).await {
            Ok(resp) if resp.status == StatusCode::NO_CONTENT => Ok(()),
            Ok(resp) => Err(EurekaError::registration(
                instance.app_name(),
                format!("unexpected status {}", resp.status),
            )),
            Err(e) => Err(EurekaError::registration(instance.app_name(), e.to_string())),
        }
    }

    /// 查询本实例是否已在注册中心
    ///
    /// 仅当返回 200 时为 true；传输失败视为 false
    pub async fn is_registered(&self) -> bool {
        let request = RegistryRequest::new(Method::GET, self.config.instance().instance_url());
        match self.transport.send(request).await {
            Ok(resp) => resp.status == StatusCode::OK,
            Err(e) => {
                debug!(error = %e, "Registration lookup failed");
                false
            }
        }
    }

    /// 从注册中心注销本实例
    ///
    /// 成功条件为 200；失败会记录日志并返回 `DeRegistration` 错误
    pub async fn de_register(&self) -> Result<()> {
        let instance = self.config.instance();
        let previous = self.set_state(RegistrationState::DeRegistering);
        info!(instance_id = %instance.instance_id(), "De-registering from Eureka");

        let request = RegistryRequest::new(Method::DELETE, instance.instance_url());
        let outcome = match self.transport.send(request).await {
            Ok(resp) if resp.status == StatusCode::OK => Ok(()),
            Ok(resp) => Err(EurekaError::de_registration(
                instance.instance_id(),
                format!("unexpected status {}", resp.status),
            )),
            Err(e) => Err(EurekaError::de_registration(instance.instance_id(), e.to_string())),
        };

        match &outcome {
            Ok(()) => {
                self.set_state(RegistrationState::Unregistered);
                info!(instance_id = %instance.instance_id(), "✅ De-registered from Eureka");
            }
            Err(e) => {
                self.set_state(previous);
                warn!(
                    instance_id = %instance.instance_id(),
                    error = %e,
                    "⚠️ Failed to de-register from Eureka"
                );
            }
        }
        outcome
    }

    /// 发送一次心跳
    ///
    /// 失败只记录日志，返回心跳是否被注册中心接受
    pub async fn heartbeat(&self) -> bool {
        let instance = self.config.instance();
        let request = RegistryRequest::new(Method::PUT, instance.instance_url());
        match self.transport.send(request).await {
            Ok(resp) if resp.status == StatusCode::OK => {
                debug!(instance_id = %instance.instance_id(), "💓 Heartbeat sent");
                true
            }
            Ok(resp) => {
                warn!(
                    instance_id = %instance.instance_id(),
                    status = %resp.status,
                    "⚠️ Heartbeat rejected"
                );
                false
            }
            Err(e) => {
                warn!(
                    instance_id = %instance.instance_id(),
                    error = %e,
                    "⚠️ Heartbeat failed"
                );
                false
            }
        }
    }

    /// 周期性发送心跳，直到 `shutdown` 完成
    ///
    /// 第一次心跳在一个间隔之后发出；停止信号只在两次心跳之间检查，
    /// 正在进行的心跳不会被打断
    pub async fn run_heartbeats<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let period = self.config.instance().heartbeat_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!(
                        instance_id = %self.config.instance().instance_id(),
                        "🛑 Heartbeat loop stopped"
                    );
                    break;
                }
                _ = ticker.tick() => {
                    self.heartbeat().await;
                }
            }
        }
    }

    /// 注册后在当前任务上运行心跳循环，直到 `shutdown` 完成
    ///
    /// 不会自动注销，退出后由调用方决定是否调用 [`EurekaClient::de_register`]
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.register().await?;
        self.run_heartbeats(shutdown).await;
        Ok(())
    }

    /// 注册并在独立任务上启动心跳
    ///
    /// 注册失败时不启动心跳任务
    pub async fn start(self: &Arc<Self>) -> Result<HeartbeatHandle> {
        self.register().await?;
        Ok(self.spawn_heartbeat())
    }

    /// 在独立任务上启动心跳（不注册）
    pub fn spawn_heartbeat(self: &Arc<Self>) -> HeartbeatHandle {
        HeartbeatHandle::spawn(self.clone())
    }

    // ============================================================
    // 实例解析
    // ============================================================

    /// 获取应用的全部实例
    ///
    /// 顺序：缓存 → 注册中心 → 兜底实例源。只有注册中心的成功结果会被缓存
    ///
    /// 应用名必须能原样放进 URL 路径段，否则直接返回 `InvalidAppName`，不发请求也不走兜底
    pub async fn fetch_instances(&self, app_name: &str) -> Result<Vec<Instance>> {
        if !is_url_safe(app_name) {
            warn!(app_name = %app_name, "❌ Refusing to resolve invalid application name");
            return Err(EurekaError::invalid_app_name(app_name));
        }

        if let Some(instances) = self.cache.get(app_name).await {
            debug!(app_name = %app_name, "Instances served from cache");
            return Ok(instances);
        }

        let guard = self.cache.lock_app(app_name).await;
        let outcome = self.populate(app_name).await;
        self.cache.release_app(app_name, guard).await;
        outcome
    }

    async fn populate(&self, app_name: &str) -> Result<Vec<Instance>> {
        // 等锁期间可能已被其他调用方填充
        if let Some(instances) = self.cache.get(app_name).await {
            return Ok(instances);
        }

        match self.query_registry(app_name).await {
            Ok(instances) => {
                info!(
                    app_name = %app_name,
                    count = instances.len(),
                    "Fetched instances from Eureka"
                );
                self.cache.insert(app_name, instances.clone()).await;
                Ok(instances)
            }
            Err(miss) => self.fall_back(app_name, miss).await,
        }
    }

    /// 获取应用的一个实例（由选择策略决定）
    ///
    /// 没有可选实例时返回 `Ok(None)`
    pub async fn fetch_instance(&self, app_name: &str) -> Result<Option<Instance>> {
        let instances = self.fetch_instances(app_name).await?;
        let strategy = self.config.discovery_strategy();
        Ok(strategy.select_instance(&instances).cloned())
    }

    async fn query_registry(&self, app_name: &str) -> std::result::Result<Vec<Instance>, RegistryMiss> {
        let request = RegistryRequest::new(Method::GET, self.config.instance().app_url(app_name));
        let resp = self
            .transport
            .send(request)
            .await
            .map_err(RegistryMiss::Transport)?;

        if resp.status != StatusCode::OK {
            return Err(RegistryMiss::Status(resp.status));
        }

        let envelope: ApplicationEnvelope = serde_json::from_str(&resp.body).map_err(|e| {
            warn!(app_name = %app_name, error = %e, "Unreadable Eureka response");
            RegistryMiss::Empty
        })?;

        let instances = envelope
            .application
            .and_then(|app| app.instance)
            .map(OneOrMany::into_vec)
            .unwrap_or_default();

        if instances.is_empty() {
            return Err(RegistryMiss::Empty);
        }
        Ok(instances)
    }

    async fn fall_back(&self, app_name: &str, miss: RegistryMiss) -> Result<Vec<Instance>> {
        match self.config.instance_provider() {
            Some(provider) => {
                warn!(
                    app_name = %app_name,
                    reason = ?miss,
                    "Eureka did not answer, using fallback instance provider"
                );
                Ok(provider.get_instances(app_name).await)
            }
            None => Err(miss.into_error(app_name)),
        }
    }
}

impl std::fmt::Debug for EurekaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EurekaClient")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}
