use bon::Builder;

/// Environment variable holding the current pod's hostname.
pub const POD_NAME_ENV: &str = "HOSTNAME";

/// Service name used when the owner configures none.
pub const DEFAULT_SERVICE_NAME: &str = "unknown";

/// Settings consumed by [`KubernetesDiscovery`](crate::discovery::KubernetesDiscovery).
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct DiscoveryConfig {
    /// Name of the service this process belongs to.
    #[builder(into, default = DEFAULT_SERVICE_NAME.to_owned())]
    service_name: String,

    /// Namespace to read from. `None` means the client's default namespace.
    #[builder(into)]
    namespace: Option<String>,

    /// Hostname of the pod this process runs in, if any.
    #[builder(into)]
    pod_name: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Accessors
impl DiscoveryConfig {
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The pod hostname. An empty value is reported as absent.
    #[must_use]
    pub fn pod_name(&self) -> Option<&str> {
        self.pod_name.as_deref().filter(|x| !x.is_empty())
    }
}
