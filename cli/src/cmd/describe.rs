use anyhow::Result;
use clap::Args;
use kubedisc::discovery::DiscoveryClient;
use kubedisc::discovery::KubernetesDiscovery;

use crate::args::OutputFormat;
use crate::cmd::Run;

/// Print the discovery client description
#[derive(Debug, Args)]
pub struct DescribeArgs {}

impl Run for DescribeArgs {
    async fn run(&self, discovery: &KubernetesDiscovery, format: OutputFormat) -> Result<()> {
        let description = discovery.description();

        match format {
            OutputFormat::Text => println!("{description}"),
            OutputFormat::Json => println!("{}", serde_json::to_string(description)?),
        }

        Ok(())
    }
}
