use anyhow::Result;
use clap::Args;
use kubedisc::discovery::DiscoveryClient;
use kubedisc::discovery::KubernetesDiscovery;

use crate::args::OutputFormat;
use crate::cmd::Run;

/// List the names of all known services
#[derive(Debug, Args)]
pub struct ServicesArgs {}

impl Run for ServicesArgs {
    async fn run(&self, discovery: &KubernetesDiscovery, format: OutputFormat) -> Result<()> {
        let names = discovery.services().await;

        match format {
            OutputFormat::Text => {
                for name in names {
                    println!("{name}");
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        }

        Ok(())
    }
}
