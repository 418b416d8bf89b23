use dashmap::DashMap;
use indicatif::{ProgressBar, ProgressStyle};
use num_traits::Num;
use thiserror::Error;

use std::borrow::Borrow;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::mods::ModuleMap;

// os
#[cfg(not(windows))]
const TICK_SETTINGS: (&str, u64) = ("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ", 80);
#[cfg(windows)]
const TICK_SETTINGS: (&str, u64) = (r"+-x| ", 200);

/// return a pre-configured progress bar
pub fn get_progress_bar(length: u64, msg: &str) -> ProgressBar {
    let progressbar_style = ProgressStyle::default_spinner()
        .tick_chars(TICK_SETTINGS.0)
        .template(" {spinner} {msg:<30} {wide_bar} ETA {eta_precise} ")
        .expect("no template error");

    let progress_bar = ProgressBar::new(length);

    progress_bar.set_style(progressbar_style);
    progress_bar.enable_steady_tick(Duration::from_millis(TICK_SETTINGS.1));
    progress_bar.set_message(msg.to_owned());

    progress_bar
}

/// write any collection to a file
pub fn write_collection(data: &Vec<String>, fname: &Path) {
    log::info!("Rows in {:?}: {:?}. Writing...", fname, data.len());
    let f = match File::create(fname) {
        Ok(f) => f,
        Err(e) => panic!("Error creating file: {}", e),
    };
    let mut writer = BufWriter::new(f);

    for line in data.iter() {
        writeln!(writer, "{}", line).unwrap_or_else(|e| {
            panic!("Error writing to file: {}", e);
        });
    }
}

/// append a single dropout record to a bookkeeping file
///
/// Dropout files accumulate across array tasks, so the write
/// has to be an append, never a truncate.
pub fn append_dropout(outdir: &Path, fname: &str, record: &str) {
    let path = outdir.join(fname);
    let f = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(e) => panic!("Error opening dropout file {:?}: {}", path, e),
    };
    let mut writer = BufWriter::new(f);

    writeln!(writer, "{}", record).unwrap_or_else(|e| {
        panic!("Error writing to dropout file {:?}: {}", path, e);
    });
}

/// write a descriptor map to a two-column TSV
pub fn write_descriptor(descriptor: &DashMap<String, Box<dyn ModuleMap>>, fname: &Path) {
    log::info!("Entries in {:?}: {}. Writing...", fname, descriptor.len());
    let f = match File::create(fname) {
        Ok(f) => f,
        Err(e) => panic!("Error creating file: {}", e),
    };
    let mut writer = BufWriter::new(f);

    for entry in descriptor.iter() {
        writeln!(writer, "{}\t{:?}", entry.key(), entry.value()).unwrap_or_else(|e| {
            panic!("Error writing to file: {}", e);
        });
    }
}

/// argument checker for all subcommands
pub trait ArgCheck {
    fn check(&self) -> Result<(), CliError> {
        self.validate_args()
    }

    fn validate_args(&self) -> Result<(), CliError> {
        self.check_inputs()?;

        if let Some(registry) = self.get_registry() {
            validate(registry)?;
        } else {
            log::warn!("No PAM registry provided. Skipping...");
        };

        Ok(())
    }

    fn check_inputs(&self) -> Result<(), CliError> {
        if self.get_inputs().is_empty() {
            let err = "No input files provided".to_string();
            return Err(CliError::InvalidInput(err));
        }
        for input in self.get_inputs() {
            validate(input)?;
        }

        Ok(())
    }

    fn get_inputs(&self) -> Vec<&PathBuf>;
    fn get_registry(&self) -> Option<&PathBuf>;
}

/// error handling for CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid task index: {0}")]
    InvalidTaskIndex(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// argument validation
pub fn validate(arg: &PathBuf) -> Result<(), CliError> {
    if !arg.exists() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} does not exist",
            arg
        )));
    }

    if !arg.is_file() {
        return Err(CliError::InvalidInput(format!(
            "ERROR: {:?} is not a file",
            arg
        )));
    }

    match arg.extension() {
        Some(ext) if ext == "tsv" || ext == "txt" || ext == "bed" => (),
        _ => {
            return Err(CliError::InvalidInput(format!(
                "ERROR: file {:?} is not a TSV/TXT/BED file",
                arg
            )))
        }
    }

    match std::fs::metadata(arg) {
        Ok(metadata) if metadata.len() == 0 => Err(CliError::InvalidInput(format!(
            "ERROR: file {:?} is empty",
            arg
        ))),
        Ok(_) => Ok(()),
        Err(e) => Err(CliError::IoError(e)),
    }
}

/// translate a gene name to a filesystem-safe form
///
/// Output files are keyed by gene; punctuation in HUGO names breaks
/// downstream consumers, so it is spelled out instead.
pub fn translate_gene_name(gene: &str) -> String {
    gene.replace('-', "dash").replace('.', "period")
}

// quality of life improvement fns
#[inline(always)]
pub fn within<N, P>(pos: P, span: &(N, N)) -> bool
where
    N: Num + Copy + PartialOrd,
    P: Borrow<N>,
{
    let pos = *pos.borrow();
    span.0 <= pos && pos <= span.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_bounds() {
        assert!(within(10_u64, &(10, 20)));
        assert!(within(20_u64, &(10, 20)));
        assert!(within(&15_u64, &(10, 20)));
        assert!(!within(9_u64, &(10, 20)));
        assert!(!within(21_u64, &(10, 20)));
    }

    #[test]
    fn test_validate_rejects_missing() {
        let path = PathBuf::from("definitely/not/a/file.tsv");
        assert!(validate(&path).is_err());
    }

    #[test]
    fn test_translate_gene_name() {
        assert_eq!(translate_gene_name("HLA-A"), "HLAdashA");
        assert_eq!(translate_gene_name("KIAA0141.1"), "KIAA0141period1");
        assert_eq!(translate_gene_name("CFTR"), "CFTR");
    }
}
