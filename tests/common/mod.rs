//! In-memory chain and scripted prompts shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use alloy::json_abi::Event;
use alloy::primitives::{Address, Bytes, B256, U256};
use anyhow::{anyhow, bail, Result};

use fallback_demo_cli::artifact::ArtifactLoader;
use fallback_demo_cli::chain::{
	ChainClient, ContractStats, Deployed, EventSubscription, NetworkInfo, TxOutcome,
};
use fallback_demo_cli::dispatcher::MenuCommand;
use fallback_demo_cli::prompt::Prompter;
use fallback_demo_cli::record::RecordStore;
use fallback_demo_cli::session::Session;

pub const ETH: u64 = 1_000_000_000_000_000_000;

pub fn eth(tenths: u64) -> U256 {
	U256::from(tenths) * U256::from(ETH / 10)
}

pub fn wallet() -> Address {
	"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
}

pub fn stranger() -> Address {
	"0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap()
}

// -- Mock chain --

#[derive(Debug, Default, Clone)]
pub struct MockContract {
	pub owner: Address,
	pub balance: U256,
	pub received: U256,
	pub withdrawn: U256,
	pub contributions: HashMap<Address, U256>,
	pub fallback_payloads: Vec<Bytes>,
}

#[derive(Default)]
struct State {
	contracts: HashMap<Address, MockContract>,
	next_address: u8,
	block: u64,
	txs: u64,
	calls: u64,
	subscriptions: u64,
	revert_next: bool,
}

/// A single-account chain that runs FallbackDemo semantics in memory.
pub struct MockChain {
	signer: Address,
	offline: bool,
	state: Mutex<State>,
}

impl MockChain {
	pub fn new() -> Self {
		Self {
			signer: wallet(),
			offline: false,
			state: Mutex::new(State {
				next_address: 0x10,
				..State::default()
			}),
		}
	}

	pub fn offline() -> Self {
		Self {
			offline: true,
			..Self::new()
		}
	}

	/// Put a contract on chain that someone else deployed.
	pub fn with_foreign_contract(self, owner: Address, balance: U256) -> (Self, Address) {
		let address = {
			let mut s = self.state.lock().unwrap();
			let address = Address::with_last_byte(0xee);
			s.contracts.insert(
				address,
				MockContract {
					owner,
					balance,
					received: balance,
					..MockContract::default()
				},
			);
			address
		};
		(self, address)
	}

	pub fn contract(&self, address: Address) -> Option<MockContract> {
		self.state.lock().unwrap().contracts.get(&address).cloned()
	}

	/// Transactions broadcast so far.
	pub fn tx_count(&self) -> u64 {
		self.state.lock().unwrap().txs
	}

	/// Every request that reached the "node".
	pub fn call_count(&self) -> u64 {
		self.state.lock().unwrap().calls
	}

	/// Make the next transaction revert without touching contract state.
	pub fn fail_next_tx(&self) {
		self.state.lock().unwrap().revert_next = true;
	}

	pub fn subscription_count(&self) -> u64 {
		self.state.lock().unwrap().subscriptions
	}

	fn request(&self) -> Result<std::sync::MutexGuard<'_, State>> {
		if self.offline {
			bail!("connection refused");
		}
		let mut s = self.state.lock().unwrap();
		s.calls += 1;
		Ok(s)
	}
}

fn mine(s: &mut State) -> TxOutcome {
	s.txs += 1;
	s.block += 1;
	TxOutcome {
		hash: B256::with_last_byte(s.txs as u8),
		block: Some(s.block),
	}
}

fn check_armed(s: &mut State) -> Result<()> {
	if std::mem::take(&mut s.revert_next) {
		s.txs += 1;
		bail!("transaction 0x{:064x} reverted", s.txs);
	}
	Ok(())
}

fn contract_mut(s: &mut State, address: Address) -> Result<&mut MockContract> {
	s.contracts
		.get_mut(&address)
		.ok_or_else(|| anyhow!("call to non-contract account {address}"))
}

#[async_trait::async_trait]
impl ChainClient for MockChain {
	fn signer(&self) -> Address {
		self.signer
	}

	fn endpoint(&self) -> &str {
		"mock://anvil"
	}

	async fn network(&self) -> Result<NetworkInfo> {
		self.request()?;
		Ok(NetworkInfo::from_chain_id(31337))
	}

	async fn balance_of(&self, _account: Address) -> Result<U256> {
		self.request()?;
		Ok(U256::from(10_000u64) * U256::from(ETH))
	}

	async fn deploy(&self, bytecode: Bytes) -> Result<Deployed> {
		let mut s = self.request()?;
		check_armed(&mut s)?;
		if bytecode.is_empty() {
			bail!("empty init code");
		}
		s.next_address += 1;
		let address = Address::with_last_byte(s.next_address);
		s.contracts.insert(
			address,
			MockContract {
				owner: self.signer,
				..MockContract::default()
			},
		);
		let tx = mine(&mut s);
		Ok(Deployed { address, tx })
	}

	async fn send(&self, to: Address, value: U256, data: Bytes) -> Result<TxOutcome> {
		let mut s = self.request()?;
		check_armed(&mut s)?;
		let signer = self.signer;
		let c = contract_mut(&mut s, to)?;
		c.balance += value;
		c.received += value;
		*c.contributions.entry(signer).or_default() += value;
		if !data.is_empty() {
			c.fallback_payloads.push(data);
		}
		Ok(mine(&mut s))
	}

	async fn contract_balance(&self, contract: Address) -> Result<U256> {
		let mut s = self.request()?;
		Ok(contract_mut(&mut s, contract)?.balance)
	}

	async fn stats(&self, contract: Address) -> Result<ContractStats> {
		let mut s = self.request()?;
		let c = contract_mut(&mut s, contract)?;
		Ok(ContractStats {
			total_received: c.received,
			total_withdrawn: c.withdrawn,
			current_balance: c.balance,
		})
	}

	async fn contribution(&self, contract: Address, account: Address) -> Result<U256> {
		let mut s = self.request()?;
		let c = contract_mut(&mut s, contract)?;
		Ok(c.contributions.get(&account).copied().unwrap_or_default())
	}

	async fn owner(&self, contract: Address) -> Result<Address> {
		let mut s = self.request()?;
		Ok(contract_mut(&mut s, contract)?.owner)
	}

	async fn withdraw_all(&self, contract: Address) -> Result<TxOutcome> {
		let mut s = self.request()?;
		check_armed(&mut s)?;
		let signer = self.signer;
		let c = contract_mut(&mut s, contract)?;
		if c.owner != signer {
			bail!("execution reverted: Only owner");
		}
		c.withdrawn += c.balance;
		c.balance = U256::ZERO;
		Ok(mine(&mut s))
	}

	async fn withdraw(&self, contract: Address, amount: U256) -> Result<TxOutcome> {
		let mut s = self.request()?;
		check_armed(&mut s)?;
		let signer = self.signer;
		let c = contract_mut(&mut s, contract)?;
		if c.owner != signer {
			bail!("execution reverted: Only owner");
		}
		if amount > c.balance {
			bail!("execution reverted: Insufficient balance");
		}
		c.withdrawn += amount;
		c.balance -= amount;
		Ok(mine(&mut s))
	}

	async fn watch_events(
		&self,
		_contract: Address,
		_events: Vec<Event>,
	) -> Result<EventSubscription> {
		let mut s = self.request()?;
		s.subscriptions += 1;
		Ok(EventSubscription::inert())
	}
}

// -- Filesystem fixture --

pub const ARTIFACT: &str = r#"{
	"abi": [
		{"type":"receive","stateMutability":"payable"},
		{"type":"fallback","stateMutability":"payable"},
		{"type":"function","name":"getBalance","inputs":[],
			"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
		{"type":"function","name":"owner","inputs":[],
			"outputs":[{"name":"","type":"address"}],"stateMutability":"view"},
		{"type":"event","name":"Received","inputs":[
			{"name":"sender","type":"address","indexed":true},
			{"name":"amount","type":"uint256","indexed":false}
		],"anonymous":false},
		{"type":"event","name":"FallbackCalled","inputs":[
			{"name":"sender","type":"address","indexed":true},
			{"name":"amount","type":"uint256","indexed":false},
			{"name":"data","type":"bytes","indexed":false}
		],"anonymous":false}
	],
	"bytecode": {"object": "0x6080604052348015600e575f5ffd5b50"}
}"#;

/// A temp directory holding an artifact and the deployment record path.
pub struct Fixture {
	pub dir: tempfile::TempDir,
}

impl Fixture {
	pub fn new() -> Self {
		let dir = tempfile::tempdir().unwrap();
		std::fs::create_dir_all(dir.path().join("out")).unwrap();
		std::fs::write(dir.path().join("out/FallbackDemo.json"), ARTIFACT).unwrap();
		Self { dir }
	}

	pub fn artifact_path(&self) -> PathBuf {
		self.dir.path().join("out/FallbackDemo.json")
	}

	pub fn record_path(&self) -> PathBuf {
		self.dir.path().join("deployments/deployment.json")
	}

	pub fn records(&self) -> RecordStore {
		RecordStore::new(self.record_path())
	}

	pub fn session(&self, chain: MockChain) -> Session<MockChain> {
		Session::new(
			chain,
			ArtifactLoader::new(self.artifact_path()),
			self.records(),
			"anvil",
		)
	}
}

// -- Scripted prompts --

#[derive(Debug, Clone)]
pub enum Answer {
	Pick(usize),
	Text(String),
	Confirm(bool),
}

pub fn menu(cmd: MenuCommand) -> Answer {
	let index = MenuCommand::ALL.iter().position(|c| *c == cmd).unwrap();
	Answer::Pick(index)
}

pub fn text(s: &str) -> Answer {
	Answer::Text(s.to_owned())
}

/// Replays a fixed list of answers and records every question asked.
pub struct ScriptedPrompter {
	answers: VecDeque<Answer>,
	pub asked: Vec<String>,
}

impl ScriptedPrompter {
	pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
		Self {
			answers: answers.into_iter().collect(),
			asked: Vec::new(),
		}
	}

	pub fn remaining(&self) -> usize {
		self.answers.len()
	}

	fn next(&mut self, prompt: &str) -> Result<Answer> {
		self.asked.push(prompt.to_owned());
		self.answers
			.pop_front()
			.ok_or_else(|| anyhow!("script exhausted at {prompt:?}"))
	}
}

impl Prompter for ScriptedPrompter {
	fn select(&mut self, prompt: &str, items: &[String], _default: usize) -> Result<usize> {
		match self.next(prompt)? {
			Answer::Pick(i) if i < items.len() => Ok(i),
			other => bail!("expected a pick for {prompt:?}, script has {other:?}"),
		}
	}

	fn input(&mut self, prompt: &str, _default: Option<&str>) -> Result<String> {
		match self.next(prompt)? {
			Answer::Text(s) => Ok(s),
			other => bail!("expected text for {prompt:?}, script has {other:?}"),
		}
	}

	fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
		match self.next(prompt)? {
			Answer::Confirm(b) => Ok(b),
			other => bail!("expected a confirm for {prompt:?}, script has {other:?}"),
		}
	}
}
