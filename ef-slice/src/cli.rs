use clap::Parser;
use config::{CliError, TASK_ENV};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(
        short = 'b',
        long = "bed",
        required = true,
        value_name = "PATH",
        help = "Path to BED file of task regions"
    )]
    pub bed: PathBuf,

    #[arg(
        long = "task",
        value_name = "N",
        help = "1-based task index; falls back to the scheduler's $SGE_TASK_ID"
    )]
    pub task: Option<usize>,

    #[arg(
        long = "vcf",
        value_name = "PATH",
        help = "Variant file substituted for {vcf}"
    )]
    pub vcf: Option<PathBuf>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Output path substituted for {out}"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long = "tmp",
        value_name = "DIR",
        help = "Temp directory exported to the child; falls back to $TMPDIR"
    )]
    pub tmp: Option<PathBuf>,

    #[arg(
        long = "dry-run",
        help = "Print the resolved command instead of running it",
        default_value_t = false
    )]
    pub dry_run: bool,

    #[arg(
        last = true,
        value_name = "CMD",
        num_args = 1..,
        help = "External command template; {locus}, {chrom}, {vcf} and {out} are substituted"
    )]
    pub command: Vec<String>,
}

impl From<Vec<String>> for Args {
    fn from(args: Vec<String>) -> Self {
        Args::parse_from(std::iter::once("ef-slice".to_string()).chain(args))
    }
}

impl Args {
    /// the 1-based task index, from the flag or the scheduler
    pub fn task_index(&self) -> Result<usize, CliError> {
        match self.task {
            Some(task) if task > 0 => Ok(task),
            Some(task) => Err(CliError::InvalidTaskIndex(format!(
                "{} is not a 1-based index",
                task
            ))),
            None => {
                let raw = std::env::var(TASK_ENV).map_err(|_| {
                    CliError::InvalidTaskIndex(format!(
                        "--task not given and ${} is unset",
                        TASK_ENV
                    ))
                })?;

                raw.parse::<usize>()
                    .ok()
                    .filter(|&task| task > 0)
                    .ok_or_else(|| {
                        CliError::InvalidTaskIndex(format!(
                            "${}={:?} is not a positive integer",
                            TASK_ENV, raw
                        ))
                    })
            }
        }
    }
}
