//! 注册中心客户端模块
//!
//! 注册生命周期、心跳任务、实例解析与缓存

pub mod cache;
pub mod client;
pub mod heartbeat;
pub mod transport;

pub use cache::InstanceCache;
pub use client::{EurekaClient, RegistrationState};
pub use heartbeat::HeartbeatHandle;
pub use transport::{
    HttpTransport, RegistryRequest, RegistryResponse, ReqwestTransport, TransportError,
};
