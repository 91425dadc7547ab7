//! 实例选择策略模块
//!
//! 从候选实例中选出一个，默认策略为均匀随机

pub mod random;
pub mod round_robin;

use crate::types::Instance;

pub use random::RandomStrategy;
pub use round_robin::RoundRobinStrategy;

/// 实例选择策略 trait
///
/// 输入为空时必须返回 `None`，不能 panic
pub trait DiscoveryStrategy: Send + Sync {
    /// 从候选实例中选择一个
    fn select_instance<'a>(&self, instances: &'a [Instance]) -> Option<&'a Instance>;
}
