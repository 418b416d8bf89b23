use clap::{Parser, Subcommand};
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubArgs,
}

impl From<Vec<String>> for Args {
    fn from(args: Vec<String>) -> Self {
        Args::parse_from(std::iter::once("ef-registry".to_string()).chain(args))
    }
}

#[derive(Debug, Subcommand)]
pub enum SubArgs {
    #[command(name = "check")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
    #[command(name = "dump")]
    Dump {
        #[command(flatten)]
        args: DumpArgs,
    },
    #[command(name = "scan")]
    Scan {
        #[command(flatten)]
        args: ScanArgs,
    },
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    #[arg(
        short = 'r',
        long = "registry",
        required = true,
        value_name = "PATH",
        help = "Path to Cas PAM registry TSV"
    )]
    pub registry: PathBuf,
}

#[derive(Debug, Parser)]
pub struct DumpArgs {
    #[arg(
        short = 'r',
        long = "registry",
        required = true,
        value_name = "PATH",
        help = "Path to Cas PAM registry TSV"
    )]
    pub registry: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        required = true,
        value_name = "PATH",
        help = "Path to write the normalized registry to"
    )]
    pub output: PathBuf,
}

#[derive(Debug, Parser)]
pub struct ScanArgs {
    #[arg(
        short = 'r',
        long = "registry",
        required = true,
        value_name = "PATH",
        help = "Path to Cas PAM registry TSV"
    )]
    pub registry: PathBuf,

    #[arg(value_name = "SEQ", help = "Nucleotide sequence to scan for PAM sites")]
    pub sequence: String,

    #[arg(
        short = 'e',
        long = "enzyme",
        value_name = "NAME",
        help = "Restrict the scan to one enzyme"
    )]
    pub enzyme: Option<String>,
}

impl ArgCheck for CheckArgs {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.registry]
    }

    fn get_registry(&self) -> Option<&PathBuf> {
        Some(&self.registry)
    }
}

impl ArgCheck for DumpArgs {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.registry]
    }

    fn get_registry(&self) -> Option<&PathBuf> {
        Some(&self.registry)
    }
}

impl ArgCheck for ScanArgs {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.registry]
    }

    fn get_registry(&self) -> Option<&PathBuf> {
        Some(&self.registry)
    }
}
