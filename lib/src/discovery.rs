mod instance;
mod kubernetes;
mod mapping;

use async_trait::async_trait;

pub use self::instance::ServiceInstance;
pub use self::kubernetes::KubernetesDiscovery;

/// Lookups a client-side load balancer needs from a discovery system.
///
/// Lookups never fail. A backend that cannot be reached looks the same as a
/// backend that knows of nothing.
#[async_trait]
pub trait DiscoveryClient: Send + Sync {
    /// Human-readable name of the implementation.
    fn description(&self) -> &str;

    /// Reachable instances backing `service_id`.
    async fn instances(&self, service_id: &str) -> Vec<ServiceInstance>;

    /// Names of every known service.
    async fn services(&self) -> Vec<String>;
}
