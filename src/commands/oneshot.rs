use anyhow::{anyhow, Result};

use crate::chain::ChainClient;
use crate::cli::{Cli, Command, WithdrawArg};
use crate::commands::{open_session, Settings};
use crate::session::{Session, WithdrawMode};
use crate::ui;

/// Run a single verb and exit. Any failure becomes a non-zero exit.
pub async fn run(cli: &Cli, settings: &Settings, cmd: &Command) -> Result<()> {
	let mut session = open_session(settings)?.without_events();
	let conn = session.connect().await?;
	log::debug!("one-shot on {} as {}", conn.network.name, conn.wallet);

	execute(&mut session, cli.contract.as_deref(), cmd).await
}

/// Bind the target contract if the verb needs one, then run it.
pub async fn execute<C: ChainClient>(
	session: &mut Session<C>,
	contract: Option<&str>,
	cmd: &Command,
) -> Result<()> {
	match cmd {
		Command::Deploy => {
			let d = session.deploy().await?;
			ui::deployment(&d);
			return Ok(());
		}
		Command::Load { address } => {
			let a = session.load(address).await?;
			ui::success(format!("Contract at {a} responds."));
			return Ok(());
		}
		_ => {}
	}

	let target = match contract {
		Some(c) => c.to_owned(),
		None => session.records().load().map(|r| r.address).ok_or_else(|| {
			anyhow!("no contract given and no recorded deployment; pass --contract or run `deploy`")
		})?,
	};
	session.load(&target).await?;

	match cmd {
		Command::SendValue { amount } => {
			let tx = session.send_value(*amount).await?;
			ui::transaction("receive()", &tx);
		}
		Command::SendData { amount, data } => {
			let tx = session.send_data(*amount, data).await?;
			ui::transaction("fallback()", &tx);
		}
		Command::CheckBalance => ui::balance(session.balance().await?),
		Command::CheckStats => ui::stats(&session.stats().await?),
		Command::Withdraw { mode } => {
			let mode = match mode {
				WithdrawArg::All => WithdrawMode::All,
				WithdrawArg::Specific { amount } => WithdrawMode::Specific(*amount),
			};
			ui::withdrawal(&session.withdraw(mode).await?);
		}
		Command::Deploy | Command::Load { .. } => {}
	}
	Ok(())
}
