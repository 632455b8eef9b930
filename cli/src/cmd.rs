mod describe;
mod instances;
mod local;
mod services;

use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use enum_dispatch::enum_dispatch;
use kubedisc::discovery::KubernetesDiscovery;

use crate::args::DiscoveryArgs;
use crate::args::GlobalArgs;
use crate::args::OutputFormat;

/// Kubernetes service discovery
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    #[clap(flatten)]
    global_args: GlobalArgs,

    #[clap(flatten)]
    discovery_args: DiscoveryArgs,
}

/// Subcommands must implement [`Run`] to be executed at runtime.
#[enum_dispatch]
pub trait Run {
    async fn run(&self, discovery: &KubernetesDiscovery, format: OutputFormat) -> Result<()>;
}

#[enum_dispatch(Run)]
#[derive(Debug, Subcommand)]
enum Command {
    Services(services::ServicesArgs),
    Instances(instances::InstancesArgs),
    Local(local::LocalArgs),
    Describe(describe::DescribeArgs),
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    cli.global_args.init_tracing()?;

    let discovery = cli.discovery_args.discovery().await?;

    cli.command.run(&discovery, cli.global_args.output).await
}
