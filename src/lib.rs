pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod explore;
pub mod ledger;
pub mod node;
pub mod oracle;
pub mod play;
pub mod session;
