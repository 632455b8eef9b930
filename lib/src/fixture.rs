//! Builders for Kubernetes objects used across unit tests.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::EndpointAddress;
use k8s_openapi::api::core::v1::EndpointPort;
use k8s_openapi::api::core::v1::EndpointSubset;
use k8s_openapi::api::core::v1::Endpoints;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

pub fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

pub fn service(name: &str, label_pairs: &[(&str, &str)]) -> Service {
    let labels = if label_pairs.is_empty() {
        None
    } else {
        Some(labels(label_pairs))
    };
    Service {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            labels,
            ..ObjectMeta::default()
        },
        ..Service::default()
    }
}

pub fn endpoints(name: &str, subsets: Vec<EndpointSubset>) -> Endpoints {
    Endpoints {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            ..ObjectMeta::default()
        },
        subsets: Some(subsets),
    }
}

pub fn subset(ports: &[i32], ips: &[&str]) -> EndpointSubset {
    EndpointSubset {
        addresses: Some(
            ips.iter()
                .map(|ip| EndpointAddress {
                    ip: (*ip).to_owned(),
                    ..EndpointAddress::default()
                })
                .collect(),
        ),
        ports: Some(
            ports
                .iter()
                .map(|&port| EndpointPort {
                    port,
                    ..EndpointPort::default()
                })
                .collect(),
        ),
        ..EndpointSubset::default()
    }
}
