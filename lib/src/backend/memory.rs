use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Endpoints;
use k8s_openapi::api::core::v1::Service;
use serde_json::Value;
use tracing::debug;

use super::Backend;

/// Serves a fixed set of objects held in memory.
///
/// Objects are returned in the order they were added, and the first object
/// added under a given name wins lookups.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    services: Vec<Service>,
    endpoints: Vec<Endpoints>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints.push(endpoints);
        self
    }

    /// Loads objects from `kubectl get services,endpoints -o json` output.
    ///
    /// Accepts either a `List` or a single object. Items of any other kind
    /// are skipped.
    ///
    /// # Errors
    ///
    /// - If the input is not JSON
    /// - If a Service or Endpoints item does not match its schema
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).context("input is not valid json")?;
        let items = match value.get("items") {
            Some(Value::Array(items)) => items.clone(),
            Some(_) => bail!("`items` is not an array"),
            None => vec![value],
        };

        let mut backend = Self::new();
        for item in items {
            let kind = item
                .get("kind")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            match kind.as_str() {
                "Service" => {
                    let service = serde_json::from_value(item).context("malformed service")?;
                    backend = backend.with_service(service);
                }
                "Endpoints" => {
                    let endpoints =
                        serde_json::from_value(item).context("malformed endpoints")?;
                    backend = backend.with_endpoints(endpoints);
                }
                other => debug!(kind = %other, "MemoryBackend: skipping item"),
            }
        }
        Ok(backend)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_service(&self, name: &str) -> Result<Option<Service>> {
        let service = self
            .services
            .iter()
            .find(|s| s.metadata.name.as_deref() == Some(name));
        Ok(service.cloned())
    }

    async fn get_endpoints(&self, name: &str) -> Result<Option<Endpoints>> {
        let endpoints = self
            .endpoints
            .iter()
            .find(|e| e.metadata.name.as_deref() == Some(name));
        Ok(endpoints.cloned())
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self.services.clone())
    }
}
