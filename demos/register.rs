//! 注册并保持心跳，同时解析另一个应用的实例
//!
//! ```bash
//! EUREKA_DEFAULT_URL=http://localhost:8761 RUST_LOG=info cargo run --example register
//! ```
//!
//! 按 Ctrl-C 停止心跳并注销。

use std::sync::Arc;

use eureka_client::{
    EurekaClient, EurekaConfig, EurekaOptions, Instance, PortOption, StaticInstanceProvider,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = match std::env::var("EUREKA_CONFIG") {
        Ok(path) => EurekaOptions::load_from_file(path)?,
        Err(_) => EurekaOptions {
            eureka_default_url: Some("http://localhost:8761".to_string()),
            host_name: Some("localhost".to_string()),
            app_name: Some("DEMO-APP".to_string()),
            ip: Some("127.0.0.1".to_string()),
            port: Some(PortOption::Pair(8000, false)),
            home_page_url: Some("http://localhost:8000".to_string()),
            status_page_url: Some("http://localhost:8000/info".to_string()),
            health_check_url: Some("http://localhost:8000/health".to_string()),
            ..Default::default()
        },
    }
    .apply_env_overrides()?;

    // 注册中心不可用时返回固定地址
    let fallback = StaticInstanceProvider::new()
        .with_default(vec![Instance::new("http://localhost:8888/")]);
    let config = EurekaConfig::from_options(options)?.with_instance_provider(Arc::new(fallback));
    let client = Arc::new(EurekaClient::new(config)?);

    let handle = client.start().await?;

    match client.fetch_instance("CONFIG_SERVER").await {
        Ok(Some(instance)) => info!(url = %instance.home_page_url, "Resolved CONFIG_SERVER"),
        Ok(None) => warn!("No CONFIG_SERVER instance available"),
        Err(e) => warn!(error = %e, "Failed to resolve CONFIG_SERVER"),
    }

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await?;
    Ok(())
}
