use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use kube::ResourceExt;
use tracing::debug;
use tracing::error;
use tracing::instrument;

use super::mapping;
use super::DiscoveryClient;
use super::ServiceInstance;
use crate::backend::Backend;
use crate::config::DiscoveryConfig;

const DESCRIPTION: &str = "Kubernetes Discovery Client";

const LOCAL_HOST: &str = "localhost";
const LOCAL_PORT: u16 = 8080;

/// Discovers service instances from Kubernetes Services and Endpoints.
///
/// Every call is a fresh read through the [`Backend`]. Backend failures are
/// logged and surface as "nothing found" rather than as errors.
#[derive(Clone)]
pub struct KubernetesDiscovery {
    backend: Arc<dyn Backend>,
    config: DiscoveryConfig,
}

impl fmt::Debug for KubernetesDiscovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubernetesDiscovery")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl KubernetesDiscovery {
    pub fn new(backend: impl Backend + 'static, config: DiscoveryConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
        }
    }

    #[must_use]
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    /// Replaces the backend used by subsequent lookups.
    pub fn set_backend(&mut self, backend: impl Backend + 'static) {
        self.backend = Arc::new(backend);
    }

    #[must_use]
    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Best-effort instance for the process calling this.
    ///
    /// Falls back to `localhost:8080` under the configured service name when
    /// not running in a pod, when the service has no usable endpoints, or when
    /// the backend fails.
    #[instrument(skip(self), fields(service = %self.config.service_name()))]
    pub async fn local_instance(&self) -> ServiceInstance {
        let service_name = self.config.service_name();
        let fallback = ServiceInstance::new(service_name, LOCAL_HOST, LOCAL_PORT);

        if self.config.pod_name().is_none() {
            debug!("no pod name, using fallback instance");
            return fallback;
        }

        match self.try_local_instance(service_name).await {
            Ok(Some(instance)) => instance,
            Ok(None) => {
                debug!("no usable endpoints, using fallback instance");
                fallback
            }
            Err(error) => {
                error!(?error, "error calling kubernetes api, using fallback instance");
                fallback
            }
        }
    }

    async fn try_local_instance(&self, service_name: &str) -> Result<Option<ServiceInstance>> {
        let Some(endpoints) = self.backend.get_endpoints(service_name).await? else {
            return Ok(None);
        };
        let service = self.backend.get_service(service_name).await?;
        let labels = mapping::labels(service);
        Ok(mapping::representative(service_name, &endpoints, &labels))
    }

    async fn try_instances(&self, service_id: &str) -> Result<Vec<ServiceInstance>> {
        let service = self.backend.get_service(service_id).await?;
        let labels = mapping::labels(service);

        let endpoints = self.backend.get_endpoints(service_id).await?;
        debug!(?endpoints, "fetched endpoints");

        let instances = endpoints
            .map(|endpoints| mapping::instances(service_id, &endpoints, &labels))
            .unwrap_or_default();
        Ok(instances)
    }
}

#[async_trait]
impl DiscoveryClient for KubernetesDiscovery {
    fn description(&self) -> &str {
        DESCRIPTION
    }

    #[instrument(skip(self))]
    async fn instances(&self, service_id: &str) -> Vec<ServiceInstance> {
        self.try_instances(service_id)
            .await
            .unwrap_or_else(|error| {
                error!(?error, "error calling kubernetes api");
                Vec::new()
            })
    }

    #[instrument(skip(self))]
    async fn services(&self) -> Vec<String> {
        match self.backend.list_services().await {
            Ok(services) => services.iter().map(ResourceExt::name_any).collect(),
            Err(error) => {
                error!(?error, "error calling kubernetes api");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::Endpoints;
    use k8s_openapi::api::core::v1::Service;
    use rstest::rstest;

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::fixture;

    /// Backend whose every call fails, as an unreachable API server would.
    struct FailingBackend;

    #[async_trait]
    impl Backend for FailingBackend {
        async fn get_service(&self, _name: &str) -> Result<Option<Service>> {
            anyhow::bail!("connection refused")
        }

        async fn get_endpoints(&self, _name: &str) -> Result<Option<Endpoints>> {
            anyhow::bail!("connection refused")
        }

        async fn list_services(&self) -> Result<Vec<Service>> {
            anyhow::bail!("connection refused")
        }
    }

    fn config(pod_name: Option<&str>) -> DiscoveryConfig {
        DiscoveryConfig::builder()
            .service_name("web")
            .maybe_pod_name(pod_name)
            .build()
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::new()
            .with_service(fixture::service("web", &[("app", "x")]))
            .with_endpoints(fixture::endpoints(
                "web",
                vec![fixture::subset(&[9090], &["10.0.0.1", "10.0.0.2"])],
            ))
            .with_service(fixture::service("db", &[]))
    }

    fn is_fallback(instance: &ServiceInstance) -> bool {
        instance == &ServiceInstance::new("web", "localhost", 8080)
    }

    #[test]
    fn description_works() {
        let discovery = KubernetesDiscovery::new(MemoryBackend::new(), config(None));
        assert_eq!(discovery.description(), "Kubernetes Discovery Client");
    }

    #[tokio::test]
    async fn instances_without_endpoints_are_empty() {
        let discovery = KubernetesDiscovery::new(backend(), config(None));
        assert!(discovery.instances("db").await.is_empty());
        assert!(discovery.instances("missing").await.is_empty());
    }

    #[tokio::test]
    async fn instances_carry_service_labels() {
        let discovery = KubernetesDiscovery::new(backend(), config(None));
        let instances = discovery.instances("web").await;

        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].host(), "10.0.0.1");
        assert_eq!(instances[1].host(), "10.0.0.2");
        for instance in &instances {
            assert_eq!(instance.port(), 9090);
            assert_eq!(instance.metadata(), &fixture::labels(&[("app", "x")]));
        }
    }

    #[tokio::test]
    async fn instances_without_service_have_empty_metadata() {
        let backend = MemoryBackend::new().with_endpoints(fixture::endpoints(
            "orphan",
            vec![fixture::subset(&[80], &["10.0.0.5"])],
        ));
        let discovery = KubernetesDiscovery::new(backend, config(None));
        let instances = discovery.instances("orphan").await;

        assert_eq!(instances.len(), 1);
        assert!(instances[0].metadata().is_empty());
    }

    #[tokio::test]
    async fn backend_failure_is_swallowed() {
        let discovery = KubernetesDiscovery::new(FailingBackend, config(Some("web-0")));
        assert!(discovery.instances("web").await.is_empty());
        assert!(discovery.services().await.is_empty());
        assert!(is_fallback(&discovery.local_instance().await));
    }

    #[tokio::test]
    async fn services_lists_every_name() {
        let discovery = KubernetesDiscovery::new(backend(), config(None));
        assert_eq!(discovery.services().await, ["web", "db"]);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[tokio::test]
    async fn local_instance_outside_pod_is_fallback(#[case] pod_name: Option<&str>) {
        let discovery = KubernetesDiscovery::new(backend(), config(pod_name));
        assert!(is_fallback(&discovery.local_instance().await));
    }

    #[tokio::test]
    async fn local_instance_uses_first_address() {
        let discovery = KubernetesDiscovery::new(backend(), config(Some("web-0")));
        let instance = discovery.local_instance().await;

        assert_eq!(instance.service_id(), "web");
        assert_eq!(instance.host(), "10.0.0.1");
        assert_eq!(instance.port(), 9090);
        assert_eq!(instance.metadata(), &fixture::labels(&[("app", "x")]));
    }

    #[tokio::test]
    async fn local_instance_without_endpoints_is_fallback() {
        let backend = MemoryBackend::new().with_service(fixture::service("web", &[]));
        let discovery = KubernetesDiscovery::new(backend, config(Some("web-0")));
        assert!(is_fallback(&discovery.local_instance().await));
    }

    #[tokio::test]
    async fn set_backend_swaps_source() {
        let mut discovery = KubernetesDiscovery::new(FailingBackend, config(None));
        assert!(discovery.instances("web").await.is_empty());

        discovery.set_backend(backend());
        assert_eq!(discovery.instances("web").await.len(), 2);

        let current = discovery.backend();
        assert!(current.get_endpoints("web").await.unwrap().is_some());
        assert_eq!(current.list_services().await.unwrap().len(), 2);
    }
}
