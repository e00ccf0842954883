use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::input::{Amount, Payload};

#[derive(Parser)]
#[command(
	name = "fallback-demo",
	about = "Deploy and poke the FallbackDemo contract on a local dev chain.",
	long_about = "Deploy and poke the FallbackDemo contract on a local dev chain.\n\n\
		Without a subcommand an interactive menu is started.",
	version
)]
pub struct Cli {
	/// Node JSON-RPC endpoint.
	#[arg(long, env = "FALLBACK_DEMO_RPC_URL", global = true)]
	pub rpc_url: Option<String>,

	/// Hex private key used to sign transactions.
	#[arg(long, env = "FALLBACK_DEMO_PRIVATE_KEY", global = true, hide_env_values = true)]
	pub private_key: Option<String>,

	/// Compiled contract artifact (Foundry JSON).
	#[arg(long, env = "FALLBACK_DEMO_ARTIFACT", global = true)]
	pub artifact: Option<PathBuf>,

	/// Where the last deployment is recorded.
	#[arg(long, env = "FALLBACK_DEMO_DEPLOYMENT_FILE", global = true)]
	pub deployment_file: Option<PathBuf>,

	/// Network name written into deployment records.
	#[arg(long, global = true)]
	pub network_label: Option<String>,

	/// Contract address for one-shot commands. Defaults to the recorded deployment.
	#[arg(long, global = true)]
	pub contract: Option<String>,

	/// Resume the recorded deployment without asking.
	#[arg(short = 'y', long, global = true)]
	pub yes: bool,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
	/// Deploy a fresh FallbackDemo and record it.
	Deploy,

	/// Check that a deployed contract responds.
	Load {
		/// Contract address (0x-prefixed).
		address: String,
	},

	/// Send plain ether to trigger receive().
	SendValue {
		/// Amount in ETH, e.g. 0.1.
		amount: Amount,
	},

	/// Send ether with calldata to trigger fallback().
	SendData {
		/// Amount in ETH, e.g. 0.1.
		amount: Amount,

		/// Calldata as 0x-prefixed hex.
		data: Payload,
	},

	/// Show the contract balance.
	CheckBalance,

	/// Show received/withdrawn totals, your contribution, and the owner.
	CheckStats,

	/// Withdraw funds (owner only).
	Withdraw {
		#[command(subcommand)]
		mode: WithdrawArg,
	},
}

#[derive(Subcommand)]
pub enum WithdrawArg {
	/// Withdraw the whole balance.
	All,

	/// Withdraw an exact amount.
	Specific {
		/// Amount in ETH.
		amount: Amount,
	},
}
