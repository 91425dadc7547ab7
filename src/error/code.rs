//! 错误代码和错误类别定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误代码枚举
///
/// 错误代码按类别分组，每个类别占用1000个代码范围：
/// - 1000-1999: 配置相关错误
/// - 2000-2999: 注册生命周期相关错误
/// - 3000-3999: 实例解析相关错误
/// - 8000-8999: 序列化相关错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 配置相关错误 (1000-1999)
    // ============================================================
    ConfigMissingField = 1000,
    ConfigInvalidField = 1001,
    ConfigLoadFailed = 1002,

    // ============================================================
    // 注册生命周期相关错误 (2000-2999)
    // ============================================================
    RegistrationFailed = 2000,
    DeRegistrationFailed = 2001,

    // ============================================================
    // 实例解析相关错误 (3000-3999)
    // ============================================================
    RegistryUnavailable = 3000,
    NoInstanceFound = 3001,
    InvalidAppName = 3002,

    // ============================================================
    // 序列化相关错误 (8000-8999)
    // ============================================================
    SerializationError = 8000,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    /// 获取错误代码的数字值
    #[inline]
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// 获取错误代码的英文标识符
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigMissingField => "CONFIG_MISSING_FIELD",
            ErrorCode::ConfigInvalidField => "CONFIG_INVALID_FIELD",
            ErrorCode::ConfigLoadFailed => "CONFIG_LOAD_FAILED",
            ErrorCode::RegistrationFailed => "REGISTRATION_FAILED",
            ErrorCode::DeRegistrationFailed => "DE_REGISTRATION_FAILED",
            ErrorCode::RegistryUnavailable => "REGISTRY_UNAVAILABLE",
            ErrorCode::NoInstanceFound => "NO_INSTANCE_FOUND",
            ErrorCode::InvalidAppName => "INVALID_APP_NAME",
            ErrorCode::SerializationError => "SERIALIZATION_ERROR",
        }
    }

    /// 获取错误代码的类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_u32() {
            1000..=1999 => ErrorCategory::Config,
            2000..=2999 => ErrorCategory::Lifecycle,
            3000..=3999 => ErrorCategory::Resolution,
            _ => ErrorCategory::Serialization,
        }
    }

    /// 判断调用方是否值得重试
    ///
    /// 客户端本身从不自动重试，这里只给出建议
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::RegistrationFailed
                | ErrorCode::DeRegistrationFailed
                | ErrorCode::RegistryUnavailable
        )
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Config,
    Lifecycle,
    Resolution,
    Serialization,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "CONFIG"),
            ErrorCategory::Lifecycle => write!(f, "LIFECYCLE"),
            ErrorCategory::Resolution => write!(f, "RESOLUTION"),
            ErrorCategory::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}
