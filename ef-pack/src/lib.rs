//! packannot: record layer for the excisiontools pipeline
//!
//! Parses the static Cas PAM registry, RefSeq-style gene annotations,
//! BED task regions and the per-chromosome targetability/genotype
//! tables that the tools consume. Everything here is read-only data:
//! records are parsed once and handed to the tools by value.

use anyhow::Result;
use hashbrown::HashMap;
use log::warn;
use rayon::prelude::*;

use std::path::PathBuf;

pub mod iupac;
pub mod record;

pub use record::{
    is_het, phased, BedRegion, GeneAnnot, GenotypeTable, PamRecord, PamSide, Registry, TargRow,
    TargTable,
};

use config::COMMENT_CHAR;

/// read many files in parallel into one in-memory blob
pub fn par_reader(paths: Vec<PathBuf>) -> Result<String> {
    let contents = paths
        .par_iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("ERROR: Cannot read {:?} -> {}", path, e))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(contents.join("\n"))
}

/// parse annotation files into per-chromosome transcript buckets
///
/// Header rows and malformed lines are warned about and skipped,
/// mirroring how blacklist tracks are unpacked elsewhere.
pub fn packannot(paths: Vec<PathBuf>) -> Result<HashMap<String, Vec<GeneAnnot>>> {
    let contents = par_reader(paths)?;

    let tracks = contents
        .par_lines()
        .filter(|l| !l.is_empty() && !l.starts_with(COMMENT_CHAR))
        .filter_map(|l| {
            GeneAnnot::read(l)
                .map_err(|e| warn!("skipping line: {} from: {}", e, l))
                .ok()
        })
        .fold(
            || HashMap::new(),
            |mut acc: HashMap<String, Vec<GeneAnnot>>, annot| {
                acc.entry(annot.chrom.clone()).or_default().push(annot);
                acc
            },
        )
        .reduce(
            || HashMap::new(),
            |mut acc, map| {
                for (chrom, mut annots) in map {
                    acc.entry(chrom).or_insert_with(Vec::new).append(&mut annots);
                }
                acc
            },
        );

    match tracks.is_empty() {
        true => anyhow::bail!("ERROR: No annotation records found!"),
        false => {
            log::info!(
                "Parsed {} transcripts on {} chromosomes",
                tracks.values().map(|v| v.len()).sum::<usize>(),
                tracks.len()
            );

            Ok(tracks)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_packannot_groups_by_chrom() {
        let mut file = tempfile();
        writeln!(file.1, "name\tchrom\ttxStart\ttxEnd\tcdsStart\tcdsEnd\texonCount\texonStarts\texonEnds\tgene_name\tsize").unwrap();
        writeln!(
            file.1,
            "NM_001\tchr7\t100\t1000\t200\t900\t2\t100,800,\t300,1000,\tGENE1\t900"
        )
        .unwrap();
        writeln!(
            file.1,
            "NM_002\tchr7\t2000\t3000\t2100\t2900\t1\t2000,\t3000,\tGENE2\t1000"
        )
        .unwrap();
        writeln!(
            file.1,
            "NM_003\tchrX\t10\t500\t10\t500\t1\t10,\t500,\tGENE3\t490"
        )
        .unwrap();
        file.1.flush().unwrap();

        let tracks = packannot(vec![file.0.clone()]).unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks.get("chr7").unwrap().len(), 2);
        assert_eq!(tracks.get("chrX").unwrap().len(), 1);

        std::fs::remove_file(file.0).ok();
    }

    fn tempfile() -> (PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!(
            "packannot_test_{}.tsv",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
