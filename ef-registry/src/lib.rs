//! Registry module for the Cas enzyme PAM table
//!
//! This tool audits the static enzyme registry before a run: `check`
//! enforces the table invariants, `dump` re-emits the table in
//! canonical form, and `scan` reports the PAM sites of every
//! registered enzyme on a given sequence.

use anyhow::Result;
use config::ArgCheck;

pub mod cli;
pub mod core;

use cli::{Args, SubArgs};

pub fn run(args: Args) -> Result<()> {
    match args.command {
        SubArgs::Check { args } => {
            args.check()?;
            core::check_registry(args)?;
        }
        SubArgs::Dump { args } => {
            args.check()?;
            core::dump_registry(args)?;
        }
        SubArgs::Scan { args } => {
            args.check()?;
            core::scan_sequence(args)?;
        }
    }

    Ok(())
}

pub fn lib_ef_registry(args: Vec<String>) -> Result<()> {
    let args = cli::Args::from(args);
    run(args)
}
