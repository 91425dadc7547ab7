//! 随机选择策略

use rand::Rng;

use super::DiscoveryStrategy;
use crate::types::Instance;

/// 均匀随机选择
///
/// 每次在 `[0, len)` 上做无偏抽样，每个实例被选中的概率都是 `1/len`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl RandomStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl DiscoveryStrategy for RandomStrategy {
    fn select_instance<'a>(&self, instances: &'a [Instance]) -> Option<&'a Instance> {
        if instances.is_empty() {
            return None;
        }

        let index = rand::thread_rng().gen_range(0..instances.len());
        instances.get(index)
    }
}

