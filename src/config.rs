use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Anvil's first pre-funded dev account. Never use it outside a local chain.
pub const ANVIL_DEV_KEY: &str =
	"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	pub network: NetworkConfig,
	pub signer: SignerConfig,
	pub contract: ContractConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
	pub rpc_url: String,
	/// Label written into deployment records.
	pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
	pub private_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
	pub artifact: PathBuf,
	pub deployment_file: PathBuf,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			rpc_url: "http://localhost:8545".into(),
			label: "anvil".into(),
		}
	}
}

impl Default for SignerConfig {
	fn default() -> Self {
		Self {
			private_key: ANVIL_DEV_KEY.into(),
		}
	}
}

impl Default for ContractConfig {
	fn default() -> Self {
		Self {
			artifact: PathBuf::from("out/FallbackDemo.sol/FallbackDemo.json"),
			deployment_file: PathBuf::from("deployments/deployment.json"),
		}
	}
}

impl Config {
	/// Directory where CLI state is stored (~/.fallback-demo/).
	pub fn dir() -> Option<PathBuf> {
		dirs::home_dir().map(|home| home.join(".fallback-demo"))
	}

	/// Path to the config file.
	pub fn path() -> Option<PathBuf> {
		Self::dir().map(|dir| dir.join("config.toml"))
	}

	/// Load config from disk, falling back to defaults if no file exists.
	pub fn load() -> anyhow::Result<Self> {
		match Self::path() {
			Some(path) if path.exists() => {
				let content = std::fs::read_to_string(&path)?;
				let config = toml::from_str(&content)
					.map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
				log::debug!("loaded config from {}", path.display());
				Ok(config)
			}
			_ => Ok(Self::default()),
		}
	}
}
