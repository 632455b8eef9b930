use anyhow::Result;
use clap::Args;
use kubedisc::discovery::DiscoveryClient;
use kubedisc::discovery::KubernetesDiscovery;
use kubedisc::discovery::ServiceInstance;

use crate::args::OutputFormat;
use crate::cmd::Run;

/// List the instances backing a service
#[derive(Debug, Args)]
pub struct InstancesArgs {
    /// Service to look up
    service: String,
}

impl Run for InstancesArgs {
    async fn run(&self, discovery: &KubernetesDiscovery, format: OutputFormat) -> Result<()> {
        let instances = discovery.instances(&self.service).await;

        match format {
            OutputFormat::Text => {
                for instance in &instances {
                    println!("{}", text_line(instance));
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&instances)?),
        }

        Ok(())
    }
}

/// Formats an instance as `<uri> <key=value,...>`.
pub fn text_line(instance: &ServiceInstance) -> String {
    let labels = instance
        .metadata()
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",");
    if labels.is_empty() {
        instance.uri()
    } else {
        format!("{} {labels}", instance.uri())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn text_line_works() {
        let bare = ServiceInstance::new("web", "10.0.0.1", 80);
        assert_eq!(text_line(&bare), "http://10.0.0.1:80");

        let labels = BTreeMap::from([
            ("tier".to_owned(), "frontend".to_owned()),
            ("app".to_owned(), "web".to_owned()),
        ]);
        let labelled = bare.with_metadata(labels);
        assert_eq!(text_line(&labelled), "http://10.0.0.1:80 app=web,tier=frontend");
    }
}
