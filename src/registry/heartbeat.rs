//! 心跳任务
//!
//! 心跳循环运行在独立的 tokio 任务上，通过 [`HeartbeatHandle`] 停止并等待退出

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::client::EurekaClient;
use crate::error::Result;

/// 心跳任务句柄
///
/// - `stop`：发送停止信号并等待任务退出
/// - `shutdown`：停止心跳后再注销实例
///
/// 被 drop 时只会停止心跳，不会注销；优雅关闭应显式调用 `shutdown`
pub struct HeartbeatHandle {
    client: Arc<EurekaClient>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl HeartbeatHandle {
    pub(crate) fn spawn(client: Arc<EurekaClient>) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task_client = client.clone();

        let join = tokio::spawn(async move {
            task_client
                .run_heartbeats(async move {
                    // 发送端被 drop 同样视为停止信号
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        info!(
            instance_id = %client.config().instance().instance_id(),
            interval_secs = client.config().instance().heartbeat_interval().as_secs_f64(),
            "💓 Heartbeat task started"
        );

        Self {
            client,
            shutdown_tx: Some(shutdown_tx),
            join: Some(join),
        }
    }

    /// 心跳任务是否仍在运行
    pub fn is_running(&self) -> bool {
        self.join
            .as_ref()
            .map(|join| !join.is_finished())
            .unwrap_or(false)
    }

    /// 停止心跳并等待任务退出（可重复调用）
    pub async fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                warn!(error = %e, "⚠️ Heartbeat task ended abnormally");
            }
        }
    }

    /// 优雅关闭：停止心跳后注销实例
    pub async fn shutdown(mut self) -> Result<()> {
        self.stop().await;
        self.client.de_register().await
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}
