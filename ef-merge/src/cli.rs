use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        short = 'g',
        long = "genes",
        required = true,
        value_name = "PATH",
        help = "Path to gene list, one gene per line"
    )]
    pub genes: PathBuf,

    #[arg(
        short = 'd',
        long = "dir",
        required = true,
        value_name = "DIR",
        help = "Directory holding the per-gene result tables"
    )]
    pub dir: PathBuf,

    #[arg(
        short = 'c',
        long = "chrom",
        required = true,
        value_name = "CHROM",
        help = "Chromosome label these genes belong to"
    )]
    pub chrom: String,

    #[arg(
        short = 'o',
        long = "output",
        required = true,
        value_name = "PATH",
        help = "Merged output table; gzipped if the path ends in .gz"
    )]
    pub output: PathBuf,
}

impl From<Vec<String>> for Args {
    fn from(args: Vec<String>) -> Self {
        Args::parse_from(std::iter::once("ef-merge".to_string()).chain(args))
    }
}

impl ArgCheck for Args {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        vec![&self.genes]
    }

    fn get_registry(&self) -> Option<&PathBuf> {
        None
    }
}
