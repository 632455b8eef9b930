//! Reshaping of Endpoints into [`ServiceInstance`]s.
//!
//! Only the first port of a subset is ever used. A subset without a usable
//! port contributes nothing.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::EndpointSubset;
use k8s_openapi::api::core::v1::Endpoints;
use k8s_openapi::api::core::v1::Service;
use tracing::warn;

use super::ServiceInstance;

/// Labels of `service`, or nothing if the service does not exist.
pub(crate) fn labels(service: Option<Service>) -> BTreeMap<String, String> {
    service
        .and_then(|s| s.metadata.labels)
        .unwrap_or_default()
}

/// One instance per address of every subset, in API order.
pub(crate) fn instances(
    service_id: &str,
    endpoints: &Endpoints,
    labels: &BTreeMap<String, String>,
) -> Vec<ServiceInstance> {
    subsets_with_port(endpoints)
        .flat_map(|(subset, port)| {
            subset
                .addresses
                .iter()
                .flatten()
                .map(move |address| instance(service_id, &address.ip, port, labels))
        })
        .collect()
}

/// The first address of the first subset that has a port and an address.
pub(crate) fn representative(
    service_id: &str,
    endpoints: &Endpoints,
    labels: &BTreeMap<String, String>,
) -> Option<ServiceInstance> {
    subsets_with_port(endpoints).find_map(|(subset, port)| {
        let address = subset.addresses.as_ref()?.first()?;
        Some(instance(service_id, &address.ip, port, labels))
    })
}

fn subsets_with_port(endpoints: &Endpoints) -> impl Iterator<Item = (&EndpointSubset, u16)> {
    endpoints
        .subsets
        .iter()
        .flatten()
        .filter_map(|subset| first_port(subset).map(|port| (subset, port)))
}

fn first_port(subset: &EndpointSubset) -> Option<u16> {
    let port = subset.ports.as_ref()?.first()?.port;
    match u16::try_from(port) {
        Ok(port) => Some(port),
        Err(error) => {
            warn!(%port, ?error, "skipping subset with out of range port");
            None
        }
    }
}

fn instance(
    service_id: &str,
    host: &str,
    port: u16,
    labels: &BTreeMap<String, String>,
) -> ServiceInstance {
    ServiceInstance::new(service_id, host, port).with_metadata(labels.clone())
}
