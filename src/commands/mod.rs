pub mod menu;
pub mod oneshot;

use std::path::PathBuf;

use anyhow::Result;

use crate::artifact::ArtifactLoader;
use crate::cli::Cli;
use crate::config::Config;
use crate::record::RecordStore;
use crate::rpc::RpcClient;
use crate::session::Session;

/// Effective settings after layering CLI flags and env vars over the config
/// file over the built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
	pub rpc_url: String,
	pub private_key: String,
	pub artifact: PathBuf,
	pub deployment_file: PathBuf,
	pub network_label: String,
}

pub fn resolve_settings(cli: &Cli, config: Config) -> Settings {
	Settings {
		rpc_url: cli.rpc_url.clone().unwrap_or(config.network.rpc_url),
		private_key: cli.private_key.clone().unwrap_or(config.signer.private_key),
		artifact: cli.artifact.clone().unwrap_or(config.contract.artifact),
		deployment_file: cli
			.deployment_file
			.clone()
			.unwrap_or(config.contract.deployment_file),
		network_label: cli.network_label.clone().unwrap_or(config.network.label),
	}
}

/// Build a session against the configured node.
pub fn open_session(settings: &Settings) -> Result<Session<RpcClient>> {
	let client = RpcClient::new(&settings.rpc_url, &settings.private_key)?;
	Ok(Session::new(
		client,
		ArtifactLoader::new(&settings.artifact),
		RecordStore::new(&settings.deployment_file),
		&settings.network_label,
	))
}
