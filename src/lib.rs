pub mod artifact;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod input;
pub mod prompt;
pub mod record;
pub mod rpc;
pub mod session;
pub mod ui;
