use clap::Parser;
use config::ArgCheck;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        short = 'a',
        long = "annotations",
        required = true,
        value_name = "PATHS",
        value_delimiter = ',',
        num_args = 1..,
        help = "Paths to gene annotation TSVs delimited by comma"
    )]
    pub annotations: Vec<PathBuf>,

    #[arg(
        short = 'g',
        long = "gene",
        required = true,
        value_name = "GENE",
        help = "Gene to analyze"
    )]
    pub gene: String,

    #[arg(
        short = 'c',
        long = "chrom",
        required = true,
        value_name = "CHROM",
        help = "Chromosome on which the gene is located"
    )]
    pub chrom: String,

    #[arg(
        short = 'w',
        long = "window",
        value_name = "BP",
        default_value_t = 0,
        help = "Window around the gene to include, in bp"
    )]
    pub window: u64,

    #[arg(
        long = "targ",
        required = true,
        value_name = "PATH",
        help = "Path to the per-chromosome variant targetability TSV"
    )]
    pub targ: PathBuf,

    #[arg(
        long = "gens",
        required = true,
        value_name = "PATH",
        help = "Path to the per-chromosome phased genotype TSV"
    )]
    pub gens: PathBuf,

    #[arg(
        long = "high-scorers",
        required = true,
        value_name = "PATH",
        help = "Path to high-scoring variant positions, one per line"
    )]
    pub high_scorers: PathBuf,

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
        long = "outdir",
        value_name = "DIR",
        default_value = ".",
        help = "Directory to write output and dropout files to"
    )]
    pub outdir: PathBuf,

    #[arg(
        short = 't',
        long = "threads",
        help = "Number of threads",
        value_name = "THREADS",
        default_value_t = num_cpus::get()
    )]
    pub threads: usize,
}

impl From<Vec<String>> for Args {
    fn from(args: Vec<String>) -> Self {
        Args::parse_from(std::iter::once("ef-targ".to_string()).chain(args))
    }
}

impl ArgCheck for Args {
    fn get_inputs(&self) -> Vec<&PathBuf> {
        let mut inputs = self.annotations.iter().collect::<Vec<_>>();
        inputs.push(&self.targ);
        inputs.push(&self.gens);
        inputs.push(&self.high_scorers);
        inputs
    }

    fn get_registry(&self) -> Option<&PathBuf> {
        Some(&self.registry)
    }
}
