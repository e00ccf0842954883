use anyhow::Result;

use crate::cli::Cli;
use crate::commands::{open_session, Settings};
use crate::dispatcher::Dispatcher;
use crate::prompt::TerminalPrompter;
use crate::ui;

/// Run the interactive menu until the operator exits.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<()> {
	let session = open_session(settings)?;
	ui::banner();

	let mut dispatcher = Dispatcher::new(session, TerminalPrompter::new()).assume_yes(cli.yes);
	dispatcher.run().await
}
