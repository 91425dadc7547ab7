//! 实例缓存
//!
//! 以应用名为键缓存最近一次成功拉取的实例列表。命中时原样返回整个列表，
//! 不做合并。默认永不过期，可通过 TTL、`invalidate` 或 `clear` 主动失效。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time::Instant;

use crate::types::Instance;

struct CacheEntry {
    instances: Vec<Instance>,
    fetched_at: Instant,
}

/// 实例缓存
#[derive(Default)]
pub struct InstanceCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    fetch_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    ttl: Option<Duration>,
}

impl InstanceCache {
    /// 永不过期的缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 带 TTL 的缓存
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// 读取缓存（过期条目视为未命中）
    pub async fn get(&self, app_name: &str) -> Option<Vec<Instance>> {
        let entries = self.entries.read().await;
        let entry = entries.get(app_name)?;
        if let Some(ttl) = self.ttl {
            if entry.fetched_at.elapsed() >= ttl {
                return None;
            }
        }
        Some(entry.instances.clone())
    }

    /// 写入缓存，整体替换旧列表
    pub async fn insert(&self, app_name: &str, instances: Vec<Instance>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            app_name.to_string(),
            CacheEntry {
                instances,
                fetched_at: Instant::now(),
            },
        );
    }

    /// 使单个应用的缓存失效
    pub async fn invalidate(&self, app_name: &str) -> bool {
        self.entries.write().await.remove(app_name).is_some()
    }

    /// 清空缓存
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// 已缓存的应用名
    pub async fn app_names(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }

    /// 获取应用级拉取锁
    ///
    /// 同一应用名的并发拉取串行化，保证未命中时只有一个请求打到注册中心
    pub async fn lock_app(&self, app_name: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.fetch_locks.lock().await;
            locks
                .entry(app_name.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// 释放应用级拉取锁，没有其他调用方在等待时一并移除
    pub async fn release_app(&self, app_name: &str, guard: OwnedMutexGuard<()>) {
        drop(guard);
        let mut locks = self.fetch_locks.lock().await;
        // 新的等待方只会在持有 `fetch_locks` 时克隆，计数为 1 说明只剩表里这一份
        if locks.get(app_name).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(app_name);
        }
    }

    /// 当前仍保留拉取锁的应用数
    pub async fn pending_fetches(&self) -> usize {
        self.fetch_locks.lock().await.len()
    }
}
