//! Configuration initialization command.
//!
//! Runs the interactive settings wizard (or applies defaults) and writes
//! the configuration file to the application data directory.

use crate::libs::config::{Config, TrackerSettings};
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Accept default settings without prompting
    #[arg(long, help = "Accept default settings without prompting")]
    pub defaults: bool,
}

pub fn cmd(args: InitArgs) -> Result<()> {
    let config = if args.defaults {
        Config {
            tracker: Some(TrackerSettings::default()),
        }
    } else {
        Config::init()?
    };
    config.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
