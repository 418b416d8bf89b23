//! Merge per-gene result tables into one per-chromosome table
//!
//! The targetability runs write one table per gene; downstream
//! consumers want one table per chromosome. Genes that dropped out
//! earlier have no table and are skipped silently, so the merge can
//! run over the full gene list without tracking which genes survived.

use anyhow::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::{info, warn};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use config::{translate_gene_name, TARG_SUFFIX};

pub mod cli;
use cli::Args;

#[derive(Debug, PartialEq, Eq)]
pub struct MergeStats {
    pub merged: usize,
    pub skipped: usize,
}

pub fn lib_ef_merge(args: Vec<String>) -> Result<MergeStats> {
    merge_genes(Args::from(args))
}

/// concatenate every existing per-gene table, gene column prepended
pub fn merge_genes(args: Args) -> Result<MergeStats> {
    let contents = std::fs::read_to_string(&args.genes)
        .map_err(|e| anyhow::anyhow!("ERROR: Cannot read {:?} -> {}", args.genes, e))?;
    let genes = contents
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect::<Vec<_>>();

    let mut writer = make_writer(&args.output)?;

    let mut merged = 0;
    let mut skipped = 0;
    let mut expected_header: Option<String> = None;

    for gene in genes {
        let path = args
            .dir
            .join(format!("{}{}", translate_gene_name(gene), TARG_SUFFIX));

        if !path.exists() {
            skipped += 1;
            continue;
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("ERROR: Cannot read {:?} -> {}", path, e))?;
        let mut lines = contents.lines();

        let header = match lines.next() {
            Some(header) => header,
            None => {
                skipped += 1;
                continue;
            }
        };

        match &expected_header {
            None => {
                writeln!(writer, "gene\t{}", header)?;
                expected_header = Some(header.to_string());
            }
            Some(expected) if expected != header => {
                warn!(
                    "Header mismatch for {}: expected {:?}, got {:?}",
                    gene, expected, header
                );
            }
            Some(_) => (),
        }

        for line in lines {
            if line.is_empty() {
                continue;
            }
            writeln!(writer, "{}\t{}", gene, line)?;
        }

        merged += 1;
    }

    writer.flush()?;

    if merged == 0 {
        warn!("No per-gene tables found under {:?}", args.dir);
    }
    info!(
        "Chromosome {} complete: {} genes merged, {} skipped.",
        args.chrom, merged, skipped
    );

    Ok(MergeStats { merged, skipped })
}

fn make_writer(path: &Path) -> Result<Box<dyn Write>> {
    let file = File::create(path)
        .map_err(|e| anyhow::anyhow!("ERROR: Cannot create {:?} -> {}", path, e))?;

    match path.extension() {
        Some(ext) if ext == "gz" => Ok(Box::new(BufWriter::new(GzEncoder::new(
            file,
            Compression::default(),
        )))),
        _ => Ok(Box::new(BufWriter::new(file))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_file(dir: &PathBuf, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    fn setup(tag: &str) -> (PathBuf, Args) {
        let dir = std::env::temp_dir().join(format!("ef_merge_{}_{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        write_file(
            &dir,
            "GENE1_targ.tsv",
            "sample\ttarg_SpCas9\ttarg_all\nS1\t1\t1\nS2\t0\t0\n",
        );
        write_file(
            &dir,
            "HLAdashA_targ.tsv",
            "sample\ttarg_SpCas9\ttarg_all\nS1\t0\t0\n",
        );
        write_file(&dir, "genes.txt", "GENE1\nGENE2\nHLA-A\n");

        let args = Args {
            genes: dir.join("genes.txt"),
            dir: dir.clone(),
            chrom: "7".to_string(),
            output: dir.join("chr7_out.tsv"),
        };

        (dir, args)
    }

    #[test]
    fn test_merge_skips_missing_genes() {
        let (dir, args) = setup("skip");
        let output = args.output.clone();

        let stats = merge_genes(args).unwrap();

        assert_eq!(
            stats,
            MergeStats {
                merged: 2,
                skipped: 1,
            }
        );

        let merged = std::fs::read_to_string(output).unwrap();
        assert_eq!(
            merged,
            "gene\tsample\ttarg_SpCas9\ttarg_all\n\
             GENE1\tS1\t1\t1\n\
             GENE1\tS2\t0\t0\n\
             HLA-A\tS1\t0\t0\n"
        );

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_merge_writes_gzip_output() {
        let (dir, mut args) = setup("gzip");
        args.output = dir.join("chr7_out.tsv.gz");

        let stats = merge_genes(args).unwrap();
        assert_eq!(stats.merged, 2);

        // gzip magic bytes
        let bytes = std::fs::read(dir.join("chr7_out.tsv.gz")).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

        std::fs::remove_dir_all(dir).ok();
    }
}
