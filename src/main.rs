use anyhow::Result;
use clap::Parser;

use cifar_pipeline::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
