use std::future::Future;

use alloy::json_abi::Event;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use anyhow::Result;
use tokio::task::JoinHandle;

/// Chain id and a human name for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
	pub chain_id: u64,
	pub name: String,
}

impl NetworkInfo {
	pub fn from_chain_id(chain_id: u64) -> Self {
		let name = match chain_id {
			1 => "mainnet",
			11155111 => "sepolia",
			17000 => "holesky",
			31337 => "anvil",
			1337 => "dev",
			_ => "unknown",
		};
		Self {
			chain_id,
			name: name.into(),
		}
	}
}

/// A transaction that has been mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
	pub hash: TxHash,
	pub block: Option<u64>,
}

/// Result of a contract-creation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployed {
	pub address: Address,
	pub tx: TxOutcome,
}

/// Aggregate counters reported by `getStats()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractStats {
	pub total_received: U256,
	pub total_withdrawn: U256,
	pub current_balance: U256,
}

/// Handle to a background task printing contract events.
///
/// The task only writes to the console. Dropping the handle stops it.
#[derive(Debug, Default)]
pub struct EventSubscription {
	task: Option<JoinHandle<()>>,
}

impl EventSubscription {
	pub fn spawn<F>(task: F) -> Self
	where
		F: Future<Output = ()> + Send + 'static,
	{
		Self {
			task: Some(tokio::spawn(task)),
		}
	}

	/// A subscription with nothing behind it, for contracts that declare no
	/// watched events.
	pub fn inert() -> Self {
		Self::default()
	}

	pub fn is_running(&self) -> bool {
		self.task.as_ref().is_some_and(|t| !t.is_finished())
	}
}

impl Drop for EventSubscription {
	fn drop(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}

/// Everything the session needs from an EVM node plus a local signing key.
///
/// Every transaction method returns once the receipt is available, and
/// fails if the transaction reverted.
#[async_trait::async_trait]
pub trait ChainClient: Send + Sync {
	/// Address of the signing identity.
	fn signer(&self) -> Address;

	/// Endpoint description, for error messages.
	fn endpoint(&self) -> &str;

	async fn network(&self) -> Result<NetworkInfo>;

	async fn balance_of(&self, account: Address) -> Result<U256>;

	/// Submit a contract-creation transaction with the given init code.
	async fn deploy(&self, bytecode: Bytes) -> Result<Deployed>;

	/// Plain transaction to `to`. An empty `data` targets `receive()`.
	async fn send(&self, to: Address, value: U256, data: Bytes) -> Result<TxOutcome>;

	// -- FallbackDemo calls --

	async fn contract_balance(&self, contract: Address) -> Result<U256>;

	async fn stats(&self, contract: Address) -> Result<ContractStats>;

	async fn contribution(&self, contract: Address, account: Address) -> Result<U256>;

	async fn owner(&self, contract: Address) -> Result<Address>;

	async fn withdraw_all(&self, contract: Address) -> Result<TxOutcome>;

	async fn withdraw(&self, contract: Address, amount: U256) -> Result<TxOutcome>;

	/// Start printing `events` emitted by `contract` as they are mined.
	async fn watch_events(
		&self,
		contract: Address,
		events: Vec<Event>,
	) -> Result<EventSubscription>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_known_chains() {
		assert_eq!(NetworkInfo::from_chain_id(31337).name, "anvil");
		assert_eq!(NetworkInfo::from_chain_id(1).name, "mainnet");
		assert_eq!(NetworkInfo::from_chain_id(424242).name, "unknown");
	}

	#[test]
	fn inert_subscription_is_not_running() {
		assert!(!EventSubscription::inert().is_running());
	}

	#[tokio::test]
	async fn dropping_subscription_aborts_task() {
		let (tx, rx) = tokio::sync::oneshot::channel::<()>();
		let sub = EventSubscription::spawn(async move {
			let _tx = tx;
			std::future::pending::<()>().await;
		});
		assert!(sub.is_running());
		drop(sub);
		// The sender is dropped once the aborted task is torn down.
		assert!(rx.await.is_err());
	}
}
