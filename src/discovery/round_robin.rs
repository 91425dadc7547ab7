//! 轮询选择策略

use std::sync::atomic::{AtomicUsize, Ordering};

use super::DiscoveryStrategy;
use crate::types::Instance;

/// 轮询（Round Robin）
///
/// 游标在所有应用间共享，列表长度变化时按当前长度取模
#[derive(Debug, Default)]
pub struct RoundRobinStrategy {
    index: AtomicUsize,
}

impl RoundRobinStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiscoveryStrategy for RoundRobinStrategy {
    fn select_instance<'a>(&self, instances: &'a [Instance]) -> Option<&'a Instance> {
        if instances.is_empty() {
            return None;
        }

        let index = self.index.fetch_add(1, Ordering::Relaxed);
        instances.get(index % instances.len())
    }
}

