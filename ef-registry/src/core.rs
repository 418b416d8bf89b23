//! Core module for auditing the Cas enzyme PAM registry
//!
//! The registry is static configuration: a hand-edited TSV that the
//! rest of the pipeline loads read-only. The operations here enforce
//! its invariants (unique names, IUPAC-only PAMs, a valid side) and
//! re-emit the table in canonical form, so that a table that passes
//! `check` is guaranteed to round-trip through `dump` unchanged.

use anyhow::{bail, Result};
use log::info;
use packannot::{iupac, PamSide, Registry};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::cli::{CheckArgs, DumpArgs, ScanArgs};

/// one PAM hit on a scanned sequence
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PamHit {
    pub enzyme: String,
    pub pam: String,
    pub strand: char,
    pub offset: usize,
}

impl std::fmt::Display for PamHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.enzyme, self.pam, self.strand, self.offset
        )
    }
}

pub fn load_registry(path: &Path) -> Result<Registry> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("ERROR: Cannot read registry {:?} -> {}", path, e))?;
    let registry = Registry::parse(&contents)?;

    if registry.is_empty() {
        bail!("ERROR: Registry {:?} has no records", path);
    }

    Ok(registry)
}

/// Validates the registry invariants and reports per-side counts
///
/// # Arguments
///
/// * `args` - The command line arguments
///
/// # Returns
///
/// * `Result<Registry>` - The parsed registry on success
pub fn check_registry(args: CheckArgs) -> Result<Registry> {
    info!("Checking PAM registry...");

    let registry = load_registry(&args.registry)?;

    let five = registry
        .iter()
        .filter(|r| r.side == PamSide::FivePrime)
        .count();
    let three = registry.len() - five;

    info!(
        "Registry OK: {} enzymes ({} with 5' PAMs, {} with 3' PAMs)",
        registry.len(),
        five,
        three
    );

    Ok(registry)
}

/// Re-serializes the registry in canonical form
///
/// Comments are dropped, PAMs are uppercased and the record order is
/// preserved, so `dump` after `check` realizes the round-trip
/// property of the table.
pub fn dump_registry(args: DumpArgs) -> Result<()> {
    let registry = load_registry(&args.registry)?;

    let f = File::create(&args.output)?;
    let mut writer = BufWriter::new(f);
    writer.write_all(registry.serialize().as_bytes())?;
    writer.flush()?;

    info!(
        "Wrote {} records to {:?}",
        registry.len(),
        args.output
    );

    Ok(())
}

/// Reports every registry PAM hit on the given sequence
///
/// Both strands are scanned; reverse-strand hits are reported at
/// their forward-strand offset.
pub fn scan_sequence(args: ScanArgs) -> Result<Vec<PamHit>> {
    let registry = load_registry(&args.registry)?;

    let seq = args.sequence.to_ascii_uppercase();
    if seq.is_empty() || !seq.bytes().all(iupac::is_valid_letter) {
        bail!("ERROR: Sequence is not valid IUPAC: {:?}", args.sequence);
    }

    if let Some(enzyme) = &args.enzyme {
        if registry.get(enzyme).is_none() {
            bail!("ERROR: Enzyme {} is not in the registry", enzyme);
        }
    }

    let mut hits = Vec::new();
    for record in registry.iter() {
        if let Some(enzyme) = &args.enzyme {
            if &record.name != enzyme {
                continue;
            }
        }

        for offset in record.scan(seq.as_bytes()) {
            hits.push(PamHit {
                enzyme: record.name.clone(),
                pam: record.pam.clone(),
                strand: '+',
                offset,
            });
        }
        for offset in record.scan_revcomp(seq.as_bytes()) {
            hits.push(PamHit {
                enzyme: record.name.clone(),
                pam: record.pam.clone(),
                strand: '-',
                offset,
            });
        }
    }

    info!("{} PAM hits on {} bp", hits.len(), seq.len());
    for hit in &hits {
        println!("{}", hit);
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as IoWrite;
    use std::path::PathBuf;

    fn write_registry(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}_{}.tsv", name, std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_check_accepts_valid_registry() {
        let path = write_registry(
            "registry_ok",
            "# Cas enzymes\nSpCas9\tNGG\t3'\ncpf1\tTTTN\t5'\n",
        );

        let registry = check_registry(CheckArgs {
            registry: path.clone(),
        })
        .unwrap();
        assert_eq!(registry.len(), 2);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_check_rejects_bad_side() {
        let path = write_registry("registry_side", "SpCas9\tNGG\tboth\n");

        assert!(check_registry(CheckArgs {
            registry: path.clone(),
        })
        .is_err());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_scan_reports_hits() {
        let path = write_registry("registry_scan", "SpCas9\tNGG\t3'\n");

        let hits = scan_sequence(ScanArgs {
            registry: path.clone(),
            sequence: "aggtcca".to_string(),
            enzyme: None,
        })
        .unwrap();

        assert_eq!(
            hits,
            vec![
                PamHit {
                    enzyme: "SpCas9".to_string(),
                    pam: "NGG".to_string(),
                    strand: '+',
                    offset: 0,
                },
                PamHit {
                    enzyme: "SpCas9".to_string(),
                    pam: "NGG".to_string(),
                    strand: '-',
                    offset: 4,
                },
            ]
        );

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_scan_rejects_unknown_enzyme() {
        let path = write_registry("registry_unknown", "SpCas9\tNGG\t3'\n");

        assert!(scan_sequence(ScanArgs {
            registry: path.clone(),
            sequence: "AGG".to_string(),
            enzyme: Some("nope".to_string()),
        })
        .is_err());

        std::fs::remove_file(path).ok();
    }
}
