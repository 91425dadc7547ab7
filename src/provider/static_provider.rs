//! 静态兜底实例源

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use super::InstanceProvider;
use crate::types::Instance;

/// 固定实例列表
///
/// 按应用名匹配（不区分大小写，Eureka 的应用名本身是大写的），
/// 未配置的应用返回默认列表
#[derive(Debug, Clone, Default)]
pub struct StaticInstanceProvider {
    instances: HashMap<String, Vec<Instance>>,
    default_instances: Vec<Instance>,
}

impl StaticInstanceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为应用设置实例列表
    pub fn with_app(mut self, app_name: impl AsRef<str>, instances: Vec<Instance>) -> Self {
        self.instances
            .insert(app_name.as_ref().to_ascii_uppercase(), instances);
        self
    }

    /// 设置未知应用的默认实例列表
    pub fn with_default(mut self, instances: Vec<Instance>) -> Self {
        self.default_instances = instances;
        self
    }
}

#[async_trait]
impl InstanceProvider for StaticInstanceProvider {
    async fn get_instances(&self, app_name: &str) -> Vec<Instance> {
        let key = app_name.to_ascii_uppercase();
        match self.instances.get(&key) {
            Some(instances) => instances.clone(),
            None => {
                debug!(app_name = %app_name, "No static instances configured, using defaults");
                self.default_instances.clone()
            }
        }
    }
}
