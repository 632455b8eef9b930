use std::fmt;

use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Endpoints;
use k8s_openapi::api::core::v1::Service;
use kube::api::ListParams;
use kube::Api;
use kube::Client;
use tracing::debug;

use super::Backend;

/// Reads Services and Endpoints from a live API server.
#[derive(Clone)]
pub struct ClusterBackend {
    services: Api<Service>,
    endpoints: Api<Endpoints>,
}

impl fmt::Debug for ClusterBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterBackend").finish_non_exhaustive()
    }
}

impl ClusterBackend {
    /// Scopes a backend to `namespace`, or to the client's default namespace
    /// when none is given.
    #[must_use]
    pub fn new(client: Client, namespace: Option<&str>) -> Self {
        let (services, endpoints) = match namespace {
            Some(ns) => (
                Api::namespaced(client.clone(), ns),
                Api::namespaced(client, ns),
            ),
            None => (
                Api::default_namespaced(client.clone()),
                Api::default_namespaced(client),
            ),
        };
        Self {
            services,
            endpoints,
        }
    }
}

#[async_trait]
impl Backend for ClusterBackend {
    async fn get_service(&self, name: &str) -> Result<Option<Service>> {
        debug!(%name, "fetching service");
        self.services
            .get_opt(name)
            .await
            .with_context(|| format!("unable to get service {name}"))
    }

    async fn get_endpoints(&self, name: &str) -> Result<Option<Endpoints>> {
        debug!(%name, "fetching endpoints");
        self.endpoints
            .get_opt(name)
            .await
            .with_context(|| format!("unable to get endpoints {name}"))
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        let list = self
            .services
            .list(&ListParams::default())
            .await
            .context("unable to list services")?;
        Ok(list.items)
    }
}
