//! SWI CLI - analysis and tile rendering for soil water index mesh datasets.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "swi-cli",
    version,
    about = "Soil water index mesh risk toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: swi_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    swi_cmd::run(cli.command).await
}
