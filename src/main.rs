use clap::Parser;
use flow_scenes::{cli::Cli, flow, scenes};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    flow::run(scenes::create(cli.scene), cli.loader_context())
}
