mod cluster;
mod memory;

use anyhow::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Endpoints;
use k8s_openapi::api::core::v1::Service;

pub use self::cluster::ClusterBackend;
pub use self::memory::MemoryBackend;

/// Read access to the Kubernetes objects that discovery is built from.
///
/// Implementations report an object that does not exist as `Ok(None)` and
/// reserve `Err` for failures talking to the API.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetches the [`Service`] called `name`.
    async fn get_service(&self, name: &str) -> Result<Option<Service>>;

    /// Fetches the [`Endpoints`] called `name`.
    async fn get_endpoints(&self, name: &str) -> Result<Option<Endpoints>>;

    /// Lists every [`Service`] visible to the backend, in server order.
    async fn list_services(&self) -> Result<Vec<Service>>;
}
