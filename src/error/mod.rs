//! 错误处理模块
//!
//! 提供统一的错误类型和按范围分组的错误代码

pub mod code;
pub mod eureka_error;

pub use code::{ErrorCategory, ErrorCode};
pub use eureka_error::{ConfigError, EurekaError, Result};
