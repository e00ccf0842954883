use anyhow::Result;
use clap::Parser;

use fallback_demo_cli::cli::Cli;
use fallback_demo_cli::commands::{self, menu, oneshot};
use fallback_demo_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	let cli = Cli::parse();
	let config = Config::load()?;
	let settings = commands::resolve_settings(&cli, config);

	match &cli.command {
		None => menu::run(&cli, &settings).await,
		Some(cmd) => oneshot::run(&cli, &settings, cmd).await,
	}
}
