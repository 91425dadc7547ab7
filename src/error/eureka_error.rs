//! Eureka 客户端统一错误类型

use super::code::ErrorCode;
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 缺少必填字段
    #[error("missing required option `{0}`")]
    Missing(&'static str),

    /// 字段取值不合法
    #[error("invalid option `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// 配置文件读取或解析失败
    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// Eureka 客户端统一错误类型
#[derive(Error, Debug, Clone)]
pub enum EurekaError {
    /// 配置错误（构建时立即返回）
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 注册失败（非 204 或传输失败）
    #[error("could not register '{app_name}' with Eureka: {reason}")]
    Registration { app_name: String, reason: String },

    /// 注销失败（非 200 或传输失败）
    #[error("could not de-register '{instance_id}' from Eureka: {reason}")]
    DeRegistration { instance_id: String, reason: String },

    /// 注册中心不可用且没有配置兜底实例源
    #[error("could not get instances of '{app_name}' from Eureka: {reason}")]
    RegistryUnavailable { app_name: String, reason: String },

    /// 待解析的应用名不能安全地放进请求路径
    #[error("invalid application name '{app_name}'")]
    InvalidAppName { app_name: String },

    /// 注册中心返回了空结果且没有配置兜底实例源
    #[error("no instance found for '{app_name}'")]
    NoInstanceFound { app_name: String },

    /// 序列化错误
    #[error("serialization error: {0}")]
    Serialization(String),

}

impl EurekaError {
    pub fn registration(app_name: impl Into<String>, reason: impl Into<String>) -> Self {
        EurekaError::Registration {
            app_name: app_name.into(),
            reason: reason.into(),
        }
    }

    pub fn de_registration(instance_id: impl Into<String>, reason: impl Into<String>) -> Self {
        EurekaError::DeRegistration {
            instance_id: instance_id.into(),
            reason: reason.into(),
        }
    }

    pub fn registry_unavailable(app_name: impl Into<String>, reason: impl Into<String>) -> Self {
        EurekaError::RegistryUnavailable {
            app_name: app_name.into(),
            reason: reason.into(),
        }
    }

    pub fn no_instance_found(app_name: impl Into<String>) -> Self {
        EurekaError::NoInstanceFound {
            app_name: app_name.into(),
        }
    }

    pub fn invalid_app_name(app_name: impl Into<String>) -> Self {
        EurekaError::InvalidAppName {
            app_name: app_name.into(),
        }
    }

    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            EurekaError::Config(ConfigError::Missing(_)) => ErrorCode::ConfigMissingField,
            EurekaError::Config(ConfigError::Invalid { .. }) => ErrorCode::ConfigInvalidField,
            EurekaError::Config(ConfigError::Load(_)) => ErrorCode::ConfigLoadFailed,
            EurekaError::Registration { .. } => ErrorCode::RegistrationFailed,
            EurekaError::DeRegistration { .. } => ErrorCode::DeRegistrationFailed,
            EurekaError::RegistryUnavailable { .. } => ErrorCode::RegistryUnavailable,
            EurekaError::NoInstanceFound { .. } => ErrorCode::NoInstanceFound,
            EurekaError::InvalidAppName { .. } => ErrorCode::InvalidAppName,
            EurekaError::Serialization(_) => ErrorCode::SerializationError,
        }
    }
}

impl From<serde_json::Error> for EurekaError {
    fn from(err: serde_json::Error) -> Self {
        EurekaError::Serialization(err.to_string())
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, EurekaError>;
