use ef_registry::lib_ef_registry;
use ef_targ::{lib_ef_targ, Outcome};

use log::info;

const KEYS: [&str; 7] = [
    "--annotations",
    "--gene",
    "--chrom",
    "--targ",
    "--gens",
    "--high-scorers",
    "--registry",
];

/// in-process pipeline: audit the registry, then find excision targets
pub fn lib(args: Vec<String>) {
    __check_args(&args);

    let registry = value_of(&args, "--registry").expect("ERROR: Missing --registry argument");

    lib_ef_registry(vec![
        "check".to_string(),
        "--registry".to_string(),
        registry,
    ])
    .expect("ERROR: Registry audit failed");

    let outcome = lib_ef_targ(args).expect("ERROR: Failed to find excision targets");

    match outcome {
        Outcome::Completed {
            samples,
            targetable,
        } => {
            info!("Done: {} of {} individuals targetable.", targetable, samples);
        }
        Outcome::Dropout(dropout) => {
            info!("Gene dropped out: {}.", dropout);
        }
    }
}

fn value_of(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn __check_args(args: &[String]) {
    for key in KEYS {
        if !args.iter().any(|arg| arg == key) {
            panic!("ERROR: Missing required argument {} in {:?}", key, args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_of() {
        let args = vec![
            "--registry".to_string(),
            "cas.tsv".to_string(),
            "--gene".to_string(),
            "CFTR".to_string(),
        ];

        assert_eq!(value_of(&args, "--registry"), Some("cas.tsv".to_string()));
        assert_eq!(value_of(&args, "--gene"), Some("CFTR".to_string()));
        assert_eq!(value_of(&args, "--outdir"), None);
    }
}
