use std::path::PathBuf;

use alloy::primitives::{Address, Bytes, U256};

use crate::artifact::{Artifact, ArtifactLoader};
use crate::chain::{ChainClient, ContractStats, EventSubscription, NetworkInfo, TxOutcome};
use crate::error::SessionError;
use crate::input::{parse_address, Amount, Payload};
use crate::record::{DeploymentRecord, RecordStore};
use crate::ui::format_eth;

/// What the node reported at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
	pub network: NetworkInfo,
	pub wallet: Address,
	pub balance: U256,
}

/// A successful `deploy()`.
#[derive(Debug)]
pub struct Deployment {
	pub address: Address,
	pub tx: TxOutcome,
	/// Where the record was written, or why it could not be.
	pub record: Result<PathBuf, String>,
}

/// Everything `check-stats` shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsReport {
	pub stats: ContractStats,
	pub contribution: U256,
	pub owner: Address,
	pub caller: Address,
}

impl StatsReport {
	/// Addresses compare as bytes, so checksum casing never matters.
	pub fn is_owner(&self) -> bool {
		self.owner == self.caller
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawMode {
	All,
	Specific(Amount),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Withdrawal {
	/// The contract holds nothing; no transaction was sent.
	NothingToWithdraw,
	Done { amount: U256, tx: TxOutcome },
}

/// The contract currently selected for verbs, plus the live event feed.
///
/// Chain failures are converted into [`SessionError`] here so callers only
/// ever see the user-facing taxonomy.
pub struct Session<C> {
	client: C,
	artifacts: ArtifactLoader,
	records: RecordStore,
	network_label: String,
	watch_events: bool,
	bound: Option<Address>,
	subscription: Option<EventSubscription>,
}

impl<C: ChainClient> Session<C> {
	pub fn new(
		client: C,
		artifacts: ArtifactLoader,
		records: RecordStore,
		network_label: &str,
	) -> Self {
		Self {
			client,
			artifacts,
			records,
			network_label: network_label.to_owned(),
			watch_events: true,
			bound: None,
			subscription: None,
		}
	}

	/// Disable the live event feed (one-shot commands exit right away).
	pub fn without_events(mut self) -> Self {
		self.watch_events = false;
		self
	}

	pub fn client(&self) -> &C {
		&self.client
	}

	pub fn records(&self) -> &RecordStore {
		&self.records
	}

	pub fn bound_address(&self) -> Option<Address> {
		self.bound
	}

	pub fn is_bound(&self) -> bool {
		self.bound.is_some()
	}

	pub fn is_watching(&self) -> bool {
		self.subscription.is_some()
	}

	/// Check the node is reachable and report the wallet's balance.
	pub async fn connect(&self) -> Result<Connection, SessionError> {
		let offline = |e: anyhow::Error| SessionError::Connectivity {
			url: self.client.endpoint().to_owned(),
			reason: format!("{e:#}"),
		};

		let network = self.client.network().await.map_err(offline)?;
		let wallet = self.client.signer();
		let balance = self.client.balance_of(wallet).await.map_err(offline)?;
		log::debug!("connected to chain {} as {wallet}", network.chain_id);
		Ok(Connection {
			network,
			wallet,
			balance,
		})
	}

	/// Deploy a fresh contract, bind it, and record it.
	pub async fn deploy(&mut self) -> Result<Deployment, SessionError> {
		let artifact = self.artifacts.load()?;
		let deployed = self
			.client
			.deploy(artifact.bytecode.clone())
			.await
			.map_err(SessionError::transaction)?;

		self.bind(deployed.address, &artifact).await;

		let signer = self.client.signer();
		let record = DeploymentRecord::now(deployed.address, signer, &self.network_label);
		let record = match self.records.save(&record) {
			Ok(()) => Ok(self.records.path().to_path_buf()),
			Err(e) => {
				log::warn!("failed to write {}: {e:#}", self.records.path().display());
				Err(format!("{e:#}"))
			}
		};

		Ok(Deployment {
			address: deployed.address,
			tx: deployed.tx,
			record,
		})
	}

	/// Bind an already-deployed contract after checking that it answers.
	///
	/// On any failure the previous binding is left as it was.
	pub async fn load(&mut self, input: &str) -> Result<Address, SessionError> {
		let address = parse_address(input)?;
		let artifact = self.artifacts.load()?;

		self.client
			.contract_balance(address)
			.await
			.map_err(|e| SessionError::ContractUnreachable {
				address,
				reason: format!("{e:#}"),
			})?;

		self.bind(address, &artifact).await;
		Ok(address)
	}

	/// Send ether with no calldata, hitting `receive()`.
	pub async fn send_value(&self, amount: Amount) -> Result<TxOutcome, SessionError> {
		let contract = self.require_bound()?;
		self.client
			.send(contract, amount.wei(), Bytes::new())
			.await
			.map_err(SessionError::transaction)
	}

	/// Send ether with calldata, hitting `fallback()`.
	pub async fn send_data(
		&self,
		amount: Amount,
		payload: &Payload,
	) -> Result<TxOutcome, SessionError> {
		let contract = self.require_bound()?;
		self.client
			.send(contract, amount.wei(), payload.bytes().clone())
			.await
			.map_err(SessionError::transaction)
	}

	pub async fn balance(&self) -> Result<U256, SessionError> {
		let contract = self.require_bound()?;
		self.client
			.contract_balance(contract)
			.await
			.map_err(SessionError::transaction)
	}

	pub async fn stats(&self) -> Result<StatsReport, SessionError> {
		let contract = self.require_bound()?;
		let caller = self.client.signer();

		let stats = self.client.stats(contract).await.map_err(SessionError::transaction)?;
		let contribution = self
			.client
			.contribution(contract, caller)
			.await
			.map_err(SessionError::transaction)?;
		let owner = self.client.owner(contract).await.map_err(SessionError::transaction)?;

		Ok(StatsReport {
			stats,
			contribution,
			owner,
			caller,
		})
	}

	/// Ownership check plus the current balance, run before asking how much
	/// to withdraw.
	pub async fn withdrawable(&self) -> Result<U256, SessionError> {
		let contract = self.require_bound()?;
		let caller = self.client.signer();

		let owner = self.client.owner(contract).await.map_err(SessionError::transaction)?;
		if owner != caller {
			return Err(SessionError::NotOwner { owner, caller });
		}
		self.client
			.contract_balance(contract)
			.await
			.map_err(SessionError::transaction)
	}

	pub async fn withdraw(&self, mode: WithdrawMode) -> Result<Withdrawal, SessionError> {
		let balance = self.withdrawable().await?;
		if balance.is_zero() {
			return Ok(Withdrawal::NothingToWithdraw);
		}

		let contract = self.require_bound()?;
		let (amount, tx) = match mode {
			WithdrawMode::All => (balance, self.client.withdraw_all(contract).await),
			WithdrawMode::Specific(amount) => {
				if amount.wei() > balance {
					return Err(SessionError::invalid_amount(
						&format_eth(amount.wei()),
						format!("exceeds contract balance of {} ETH", format_eth(balance)),
					));
				}
				(amount.wei(), self.client.withdraw(contract, amount.wei()).await)
			}
		};

		let tx = tx.map_err(SessionError::transaction)?;
		Ok(Withdrawal::Done { amount, tx })
	}

	// -- Private helpers --

	fn require_bound(&self) -> Result<Address, SessionError> {
		self.bound.ok_or(SessionError::NotBound)
	}

	/// Select `address`; the first bind of the process also starts the event
	/// feed, which then stays on that contract.
	async fn bind(&mut self, address: Address, artifact: &Artifact) {
		self.bound = Some(address);
		log::debug!("bound contract {address}");

		if !self.watch_events || self.subscription.is_some() {
			return;
		}
		match self.client.watch_events(address, artifact.watched_events()).await {
			Ok(sub) => self.subscription = Some(sub),
			Err(e) => log::warn!("event subscription failed: {e:#}"),
		}
	}
}
