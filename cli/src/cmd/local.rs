use anyhow::Result;
use clap::Args;
use kubedisc::discovery::KubernetesDiscovery;

use super::instances::text_line;
use crate::args::OutputFormat;
use crate::cmd::Run;

/// Show the instance this process would identify as
#[derive(Debug, Args)]
pub struct LocalArgs {}

impl Run for LocalArgs {
    async fn run(&self, discovery: &KubernetesDiscovery, format: OutputFormat) -> Result<()> {
        let instance = discovery.local_instance().await;

        match format {
            OutputFormat::Text => println!("{}", text_line(&instance)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&instance)?),
        }

        Ok(())
    }
}
