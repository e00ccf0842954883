use alloy::json_abi::Event;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::transports::http::reqwest::Url;
use anyhow::{anyhow, bail, Context, Result};
use futures::StreamExt;

use crate::chain::{ChainClient, ContractStats, Deployed, EventSubscription, NetworkInfo, TxOutcome};
use crate::{events, ui};

sol! {
	#[sol(rpc)]
	contract FallbackDemo {
		function owner() external view returns (address);
		function getBalance() external view returns (uint256);
		function getStats()
			external
			view
			returns (uint256 totalReceived, uint256 totalWithdrawn, uint256 currentBalance);
		function getContribution(address contributor) external view returns (uint256);
		function withdrawAll() external;
		function withdraw(uint256 amount) external;
	}
}

/// HTTP JSON-RPC client with a local private-key wallet attached.
///
/// Transactions are signed locally and broadcast with
/// `eth_sendRawTransaction`; nonce, gas, and fees are filled by the
/// provider's recommended fillers.
pub struct RpcClient {
	provider: DynProvider,
	signer: Address,
	url: String,
}

impl RpcClient {
	pub fn new(url: &str, private_key: &str) -> Result<Self> {
		let wallet: PrivateKeySigner = private_key
			.parse()
			.map_err(|e| anyhow!("invalid private key: {e}"))?;
		let signer = wallet.address();
		let endpoint: Url = url
			.parse()
			.map_err(|e| anyhow!("invalid RPC URL {url:?}: {e}"))?;

		let provider = ProviderBuilder::new()
			.wallet(wallet)
			.connect_http(endpoint)
			.erased();

		Ok(Self {
			provider,
			signer,
			url: url.to_owned(),
		})
	}

	fn contract(&self, address: Address) -> FallbackDemo::FallbackDemoInstance<DynProvider> {
		FallbackDemo::new(address, self.provider.clone())
	}
}

#[async_trait::async_trait]
impl ChainClient for RpcClient {
	fn signer(&self) -> Address {
		self.signer
	}

	fn endpoint(&self) -> &str {
		&self.url
	}

	async fn network(&self) -> Result<NetworkInfo> {
		let chain_id = self.provider.get_chain_id().await.context("eth_chainId")?;
		Ok(NetworkInfo::from_chain_id(chain_id))
	}

	async fn balance_of(&self, account: Address) -> Result<U256> {
		Ok(self.provider.get_balance(account).await.context("eth_getBalance")?)
	}

	async fn deploy(&self, bytecode: Bytes) -> Result<Deployed> {
		let tx = TransactionRequest::default().with_deploy_code(bytecode);
		let receipt = self
			.provider
			.send_transaction(tx)
			.await
			.context("broadcasting contract creation")?
			.get_receipt()
			.await
			.context("waiting for deployment receipt")?;

		let tx = confirmed(&receipt)?;
		let address = receipt
			.contract_address
			.ok_or_else(|| anyhow!("receipt for {} has no contract address", tx.hash))?;
		log::debug!("deployed at {address} in {}", tx.hash);
		Ok(Deployed { address, tx })
	}

	async fn send(&self, to: Address, value: U256, data: Bytes) -> Result<TxOutcome> {
		let tx = TransactionRequest::default()
			.with_to(to)
			.with_value(value)
			.with_input(data);
		let pending = self
			.provider
			.send_transaction(tx)
			.await
			.context("broadcasting transaction")?;
		log::debug!("sent {} to {to}", pending.tx_hash());

		let receipt = pending.get_receipt().await.context("waiting for receipt")?;
		confirmed(&receipt)
	}

	async fn contract_balance(&self, contract: Address) -> Result<U256> {
		Ok(self.contract(contract).getBalance().call().await.context("getBalance()")?)
	}

	async fn stats(&self, contract: Address) -> Result<ContractStats> {
		let s = self.contract(contract).getStats().call().await.context("getStats()")?;
		Ok(ContractStats {
			total_received: s.totalReceived,
			total_withdrawn: s.totalWithdrawn,
			current_balance: s.currentBalance,
		})
	}

	async fn contribution(&self, contract: Address, account: Address) -> Result<U256> {
		Ok(self
			.contract(contract)
			.getContribution(account)
			.call()
			.await
			.context("getContribution()")?)
	}

	async fn owner(&self, contract: Address) -> Result<Address> {
		Ok(self.contract(contract).owner().call().await.context("owner()")?)
	}

	async fn withdraw_all(&self, contract: Address) -> Result<TxOutcome> {
		let receipt = self
			.contract(contract)
			.withdrawAll()
			.send()
			.await
			.context("withdrawAll()")?
			.get_receipt()
			.await
			.context("waiting for withdrawAll() receipt")?;
		confirmed(&receipt)
	}

	async fn withdraw(&self, contract: Address, amount: U256) -> Result<TxOutcome> {
		let receipt = self
			.contract(contract)
			.withdraw(amount)
			.send()
			.await
			.context("withdraw()")?
			.get_receipt()
			.await
			.context("waiting for withdraw() receipt")?;
		confirmed(&receipt)
	}

	async fn watch_events(
		&self,
		contract: Address,
		watched: Vec<Event>,
	) -> Result<EventSubscription> {
		if watched.is_empty() {
			return Ok(EventSubscription::inert());
		}

		let topics: Vec<B256> = watched.iter().map(Event::selector).collect();
		let filter = Filter::new().address(contract).event_signature(topics);
		let poller = self
			.provider
			.watch_logs(&filter)
			.await
			.context("eth_newFilter")?;
		let mut logs = Box::pin(poller.into_stream().flat_map(futures::stream::iter));

		Ok(EventSubscription::spawn(async move {
			while let Some(entry) = logs.next().await {
				match events::render(&watched, &entry.inner.data, entry.block_number) {
					Some(line) => ui::event_line(&line),
					None => log::debug!("skipping undecodable log from {}", entry.inner.address),
				}
			}
		}))
	}
}

// -- Private helpers --

/// Turn a receipt into a [`TxOutcome`], failing if the transaction reverted.
fn confirmed(receipt: &TransactionReceipt) -> Result<TxOutcome> {
	let outcome = TxOutcome {
		hash: receipt.transaction_hash,
		block: receipt.block_number,
	};
	if !receipt.status() {
		bail!("transaction {} reverted", outcome.hash);
	}
	Ok(outcome)
}
