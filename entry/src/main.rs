/// excisiontools: tools for allele-specific CRISPR excision analysis
///
/// This is the entry point for the excisiontools CLI.
/// It is responsible for parsing the CLI arguments
/// and executing the appropriate subcommand [ef-tool].
///
/// This wrapper offers 5 different subcommands:
/// - ef-registry
/// - ef-targ
/// - ef-slice
/// - ef-merge
/// - run
///
/// Each subcommand/submodule offers different functionalities,
/// such as auditing the Cas PAM registry, deciding per-individual
/// gene targetability, slicing variant extraction jobs over BED
/// regions, and merging per-gene results. In addition to the latter,
/// excisiontools also includes two hidden submodules: 'ef-pack' and
/// 'config'. The former is the record layer for the registry,
/// annotation and genotype tables and the latter holds universal
/// constants for the excisiontools pipeline.
///
/// To get help on the subcommands, you can run:
///
/// ```shell
/// excisiontools ef-targ -- --help
/// ```
///
use clap::{Args, Parser, Subcommand};
use excisiontools::lib;
use log::{error, info, Level};
use simple_logger::init_with_level;

use std::process::Command;

const ENTRY: &str = env!("CARGO_MANIFEST_DIR");
const RELEASES: &str = "target/release";

const HELP: &str = r#"
Usage: excisiontools run --annotations <PATHS> --gene <GENE> --chrom <CHROM> --targ <PATH> --gens <PATH> --high-scorers <PATH> --registry <PATH>

 Options:
  --annotations <PATHS>...    Paths to gene annotation TSVs delimited by comma
  --gene <GENE>               Gene to analyze
  --chrom <CHROM>             Chromosome on which the gene is located
  --targ <PATH>               Path to the per-chromosome variant targetability TSV
  --gens <PATH>               Path to the per-chromosome phased genotype TSV
  --high-scorers <PATH>       Path to high-scoring variant positions, one per line
  --registry <PATH>           Path to Cas PAM registry TSV
  --outdir <DIR>              Output directory for the targetability results
  -h, --help                  Print help
"#;

#[derive(Parser)]
#[command(name = "excisiontools")]
#[command(about = "excisiontools: tools for allele-specific CRISPR excision analysis")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "ef-registry")]
    Registry(EfArgs),
    #[command(name = "ef-targ")]
    Targ(EfArgs),
    #[command(name = "ef-slice")]
    Slice(EfArgs),
    #[command(name = "ef-merge")]
    Merge(EfArgs),
    #[command(name = "run")]
    Run(EfArgs),
}

#[derive(Args)]
struct EfArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, help = HELP)]
    args: Vec<String>,
}

fn main() {
    init_with_level(Level::Info).unwrap();
    let cli = Cli::parse();

    init();

    let (cmd, args) = match cli.command {
        Commands::Registry(args) => ("ef-registry", args.args),
        Commands::Targ(args) => ("ef-targ", args.args),
        Commands::Slice(args) => ("ef-slice", args.args),
        Commands::Merge(args) => ("ef-merge", args.args),
        Commands::Run(args) => ("run", args.args),
    };

    match cmd {
        "run" => lib(args),
        _ => {
            let package = std::path::Path::new(ENTRY)
                .parent()
                .expect("ERROR: Could not get parent dir")
                .join(RELEASES)
                .join(cmd);

            if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
                let output = Command::new(package)
                    .arg("--help")
                    .output()
                    .expect("ERROR: Failed to execute process");

                check_output(output);
            } else {
                let output = Command::new(package)
                    .args(args)
                    .output()
                    .expect("ERROR: Failed to execute process");

                check_output(output);
            }
        }
    }
}

fn check_output(output: std::process::Output) {
    if output.status.success() {
        info!("{}", String::from_utf8_lossy(&output.stdout));
    } else {
        error!("{}", String::from_utf8_lossy(&output.stderr));
        std::process::exit(1);
    }
}

fn init() {
    let message = format!(
        r#"

        excisiontools: tools for allele-specific CRISPR excision analysis

        this is the entry point for the excisiontools CLI
        and it is responsible for parsing the CLI arguments
        for each ef-tool:

        - ef-registry
        - ef-targ
        - ef-slice
        - ef-merge

        > version: {}

        * to get help on the subcommands, run:
            excisiontools <SUBCOMMAND> -- --help

        "#,
        env!("CARGO_PKG_VERSION")
    );

    println!("{}", message);
}
