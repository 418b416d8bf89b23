pub mod fns;
pub mod mods;

pub use fns::*;
pub use mods::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// numeric values
pub const PAIR_WINDOW: u64 = 10000; // max span of an excision pair
pub const MIN_HET_SITES: usize = 2;

// file names
pub const NO_TRANSCRIPT: &str = "no_transcript.txt";
pub const NO_CODING_EXONS: &str = "no_coding_exons.txt";
pub const NOT_ENOUGH_HETS: &str = "not_enough_hets.txt";
pub const NO_TARGETABLE_INDS: &str = "no_targetable_inds.txt";
pub const TARG_SUFFIX: &str = "_targ.tsv";
pub const HAPS_SUFFIX: &str = "_haps.tsv";
pub const TARG_DESCRIPTOR: &str = "targ_descriptor.tsv";

// column naming
pub const MAKES_PREFIX: &str = "makes_";
pub const BREAKS_PREFIX: &str = "breaks_";
pub const NEAR_PREFIX: &str = "var_near_";
pub const HAP1_PREFIX: &str = "hap1_";
pub const HAP2_PREFIX: &str = "hap2_";
pub const TARG_PREFIX: &str = "targ_";
pub const TARG_ALL: &str = "targ_all";

// registry/table syntax
pub const COMMENT_CHAR: char = '#';
pub const PHASE_SEP: char = '|';

// environment
pub const TASK_ENV: &str = "SGE_TASK_ID";
pub const TMPDIR_ENV: &str = "TMPDIR";
