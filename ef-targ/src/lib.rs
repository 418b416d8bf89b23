//! Core module for allele-specific excision target discovery
//!
//! This tool decides, per individual, whether a gene can be excised
//! allele-specifically: it needs a pair of heterozygous variants on
//! the same haplotype, close enough to excise together, whose cuts
//! disrupt a coding exon, with each cut site targetable by some Cas
//! enzyme from the PAM registry. Genes that cannot be analyzed drop
//! out into bookkeeping files rather than failing the batch.

use anyhow::Result;

pub mod cli;
pub mod core;
pub mod utils;

pub use core::{Dropout, Outcome};

pub fn lib_ef_targ(args: Vec<String>) -> Result<Outcome> {
    let args = cli::Args::from(args);
    core::find_excisions(args)
}
