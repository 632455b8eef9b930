use anyhow::Context;
use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Args;
use kubedisc::backend::ClusterBackend;
use kubedisc::backend::MemoryBackend;
use kubedisc::config::DiscoveryConfig;
use kubedisc::config::DEFAULT_SERVICE_NAME;
use kubedisc::config::POD_NAME_ENV;
use kubedisc::discovery::KubernetesDiscovery;
use tracing::debug;

const HEADING: Option<&str> = Some("Discovery Options");

/// Arguments for building the discovery client.
#[derive(Debug, Args, Clone)]
pub struct DiscoveryArgs {
    /// Namespace to read from. Defaults to the kubeconfig namespace.
    #[clap(short, long, help_heading = HEADING, global = true)]
    pub namespace: Option<String>,

    /// Name of the service this process belongs to
    #[clap(long, env = "KUBEDISC_SERVICE_NAME", default_value = DEFAULT_SERVICE_NAME, help_heading = HEADING, global = true)]
    pub service_name: String,

    /// Hostname of the current pod
    #[clap(long, env = POD_NAME_ENV, help_heading = HEADING, global = true)]
    pub pod_name: Option<String>,

    /// Read objects from `kubectl get services,endpoints -o json` output
    /// instead of a live cluster
    #[clap(long, help_heading = HEADING, global = true)]
    pub from_file: Option<Utf8PathBuf>,

    /// Connect and read timeout for API requests
    #[clap(long, help_heading = HEADING, global = true)]
    pub timeout: Option<humantime::Duration>,
}

impl DiscoveryArgs {
    fn config(&self) -> DiscoveryConfig {
        DiscoveryConfig::builder()
            .service_name(self.service_name.clone())
            .maybe_namespace(self.namespace.clone())
            .maybe_pod_name(self.pod_name.clone())
            .build()
    }

    /// Builds a discovery client over either a file or the cluster.
    pub async fn discovery(&self) -> Result<KubernetesDiscovery> {
        let config = self.config();

        if let Some(path) = &self.from_file {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("unable to read {path}"))?;
            let backend = MemoryBackend::from_json(&json)
                .with_context(|| format!("unable to load objects from {path}"))?;
            debug!(%path, "using file backend");
            return Ok(KubernetesDiscovery::new(backend, config));
        }

        let mut kube_config = kube::Config::infer()
            .await
            .context("unable to infer kubernetes config")?;
        if let Some(timeout) = self.timeout.as_deref() {
            kube_config.connect_timeout = Some(*timeout);
            kube_config.read_timeout = Some(*timeout);
        }
        let client =
            kube::Client::try_from(kube_config).context("unable to build kubernetes client")?;
        let backend = ClusterBackend::new(client, config.namespace());
        debug!(namespace = ?config.namespace(), "using cluster backend");

        Ok(KubernetesDiscovery::new(backend, config))
    }
}
