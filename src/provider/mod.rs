//! 兜底实例源
//!
//! 注册中心不可达、返回非 200 或返回空实例时，由调用方提供的实例源兜底

pub mod static_provider;

use async_trait::async_trait;

use crate::types::Instance;

pub use static_provider::StaticInstanceProvider;

/// 兜底实例源 trait
///
/// 客户端不缓存兜底结果，缓存与过期策略由实现方自行决定
#[async_trait]
pub trait InstanceProvider: Send + Sync {
    /// 获取指定应用的实例列表
    async fn get_instances(&self, app_name: &str) -> Vec<Instance>;
}
