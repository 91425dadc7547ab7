//! 注册请求体
//!
//! 由 [`InstanceConfig`] 纯投影得到，只在注册时生成，不单独保存

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::InstanceConfig;

/// 默认数据中心类型（非 AWS 部署）
pub const DEFAULT_DATA_CENTER_CLASS: &str = "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo";

/// `POST /eureka/apps/{app}` 的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationDescriptor {
    pub instance: InstanceInfo,
}

/// 实例状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    Up,
    Down,
    Starting,
    OutOfService,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub instance_id: String,
    pub host_name: String,
    pub app: String,
    pub ip_addr: String,
    pub status: InstanceStatus,
    pub port: PortInfo,
    pub secure_port: PortInfo,
    pub home_page_url: String,
    pub status_page_url: String,
    pub health_check_url: String,
    pub vip_address: String,
    pub secure_vip_address: String,
    pub data_center_info: DataCenterInfo,
    pub metadata: BTreeMap<String, String>,
}

/// Eureka 的端口写法：`{"$": 8080, "@enabled": "true"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    #[serde(rename = "$")]
    pub port: u16,
    #[serde(rename = "@enabled")]
    pub enabled: String,
}

impl PortInfo {
    fn new(port: u16, enabled: bool) -> Self {
        Self {
            port,
            enabled: enabled.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataCenterInfo {
    #[serde(rename = "@class")]
    pub class: String,
    pub name: String,
}

impl RegistrationDescriptor {
    pub fn from_config(config: &InstanceConfig) -> Self {
        let port = config.port();
        // 只启用一个端口：安全端口或普通端口
        let (plain, secure) = if port.secure {
            (PortInfo::new(port.value, false), PortInfo::new(port.value, true))
        } else {
            (PortInfo::new(port.value, true), PortInfo::new(port.value, false))
        };

        Self {
            instance: InstanceInfo {
                instance_id: config.instance_id().to_string(),
                host_name: config.host_name().to_string(),
                app: config.app_name().to_string(),
                ip_addr: config.ip().to_string(),
                status: InstanceStatus::Up,
                port: plain,
                secure_port: secure,
                home_page_url: config.home_page_url().to_string(),
                status_page_url: config.status_page_url().to_string(),
                health_check_url: config.health_check_url().to_string(),
                vip_address: config.app_name().to_string(),
                secure_vip_address: config.app_name().to_string(),
                data_center_info: DataCenterInfo {
                    class: DEFAULT_DATA_CENTER_CLASS.to_string(),
                    name: config.data_center_name().to_string(),
                },
                metadata: config.metadata().clone(),
            },
        }
    }
}
