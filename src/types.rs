//! 实例定义

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 注册中心或兜底实例源返回的实例
///
/// 常用的 Eureka 字段以强类型暴露，其余字段原样保存在 `extra` 中。
/// 客户端只读取实例，不会修改。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_addr: Option<String>,

    /// 实例状态（如 "UP", "DOWN", "OUT_OF_SERVICE"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// 主页地址（调用方通常只关心这一项）
    #[serde(default)]
    pub home_page_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_page_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_url: Option<String>,

    /// 其余字段（port、dataCenterInfo、leaseInfo、metadata 等）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instance {
    /// 创建只带主页地址的实例（兜底实例源常用）
    pub fn new(home_page_url: impl Into<String>) -> Self {
        Self {
            home_page_url: home_page_url.into(),
            ..Default::default()
        }
    }

    /// 设置实例 ID
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    /// 设置应用名
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    /// 设置状态
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// 读取未强类型化的字段
    pub fn extra_field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// 状态是否为 UP（未上报状态的实例视为可用）
    pub fn is_up(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("UP"))
            .unwrap_or(true)
    }
}
