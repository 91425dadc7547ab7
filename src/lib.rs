//! Eureka Client Library
//!
//! Registers an application instance with a Eureka registry, keeps the
//! registration alive with heartbeats, de-registers on shutdown, and resolves
//! other applications' instances with caching, a pluggable selection strategy
//! and a fallback instance source.

pub mod config;
pub mod discovery;
pub mod error;
pub mod provider;
pub mod registry;
pub mod types;

// Re-exports
pub use config::{
    EurekaConfig, EurekaOptions, InstanceConfig, InstanceConfigBuilder, PortConfig, PortOption,
    RegistrationDescriptor,
};
pub use discovery::{DiscoveryStrategy, RandomStrategy, RoundRobinStrategy};
pub use error::{ConfigError, ErrorCategory, ErrorCode, EurekaError, Result};
pub use provider::{InstanceProvider, StaticInstanceProvider};
pub use registry::{
    EurekaClient, HeartbeatHandle, HttpTransport, InstanceCache, RegistrationState,
    RegistryRequest, RegistryResponse, ReqwestTransport, TransportError,
};
pub use types::Instance;
