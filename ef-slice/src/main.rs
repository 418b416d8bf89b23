use clap::{self, Parser};
use log::{error, Level};
use simple_logger::init_with_level;

use ef_slice::cli::Args;

fn main() {
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();
    config::validate(&args.bed).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let code = ef_slice::run(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    std::process::exit(code);
}
