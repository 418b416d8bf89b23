//! Array-job glue for per-region batch extraction
//!
//! Each grid-engine array task is one independent, stateless
//! invocation: the task index selects one line of a BED file, the
//! line becomes a `chrom:start-end` locus string, and an external
//! extraction command runs with the locus substituted into its
//! arguments. The external tool's failures are opaque here; its exit
//! code is passed through verbatim.

use anyhow::{bail, Result};
use memchr::memchr_iter;
use memmap2::Mmap;
use packannot::BedRegion;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use config::TMPDIR_ENV;

pub mod cli;
use cli::Args;

const COMMENT_BYTE: u8 = b'#';

pub fn lib_ef_slice(args: Vec<String>) -> Result<i32> {
    run(Args::from(args))
}

/// run one array task and return the child's exit code
pub fn run(args: Args) -> Result<i32> {
    let task = args.task_index()?;

    let file = File::open(&args.bed)?;
    let mmap = unsafe { Mmap::map(&file)? };

    let line = match select_line(&mmap, task) {
        Some(line) => std::str::from_utf8(line)?,
        None => bail!("ERROR: Task {} is out of range for {:?}", task, args.bed),
    };

    let region = BedRegion::new(line.trim_end())
        .map_err(|e| anyhow::anyhow!("ERROR: Cannot parse BED line {}: {}", task, e))?;
    log::info!("Task {} -> {}", task, region.locus());

    if args.command.is_empty() {
        bail!("ERROR: No command given after --");
    }

    let argv = substitute(
        &args.command,
        &region,
        args.vcf.as_deref(),
        args.output.as_deref(),
    )?;

    if args.dry_run {
        println!("{}", argv.join(" "));
        return Ok(0);
    }

    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]);

    let tmp = args
        .tmp
        .clone()
        .or_else(|| std::env::var_os(TMPDIR_ENV).map(PathBuf::from));
    if let Some(tmp) = tmp {
        command.env(TMPDIR_ENV, tmp);
    }

    let status = command
        .status()
        .map_err(|e| anyhow::anyhow!("ERROR: Failed to execute {:?} -> {}", argv[0], e))?;

    // no retry, no interpretation: the child's exit code is ours
    Ok(status.code().unwrap_or(1))
}

/// 1-based selection of the Nth non-comment, non-empty line
pub fn select_line(data: &[u8], task: usize) -> Option<&[u8]> {
    let mut start = 0;
    let mut index = 0;

    for end in memchr_iter(b'\n', data).chain(std::iter::once(data.len())) {
        let line = &data[start..end];
        start = end + 1;

        if line.is_empty() || line[0] == COMMENT_BYTE {
            continue;
        }

        index += 1;
        if index == task {
            return Some(line);
        }
    }

    None
}

/// substitute region and path placeholders into the command template
pub fn substitute(
    template: &[String],
    region: &BedRegion,
    vcf: Option<&Path>,
    output: Option<&Path>,
) -> Result<Vec<String>> {
    let locus = region.locus();

    template
        .iter()
        .map(|arg| {
            let mut arg = arg
                .replace("{locus}", &locus)
                .replace("{chrom}", region.chrom);

            if arg.contains("{vcf}") {
                match vcf {
                    Some(vcf) => arg = arg.replace("{vcf}", &vcf.to_string_lossy()),
                    None => bail!("ERROR: {{vcf}} used in the template but --vcf not given"),
                }
            }

            if arg.contains("{out}") {
                match output {
                    Some(output) => arg = arg.replace("{out}", &output.to_string_lossy()),
                    None => bail!("ERROR: {{out}} used in the template but --output not given"),
                }
            }

            Ok(arg)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BED: &[u8] = b"# task regions\n\
                         chr7\t100\t200\tGENE1\n\
                         chr7\t500\t900\tGENE2\n\
                         chrX\t10\t20\tGENE3\n";

    #[test]
    fn test_select_line_skips_comments() {
        let line = select_line(BED, 1).unwrap();
        assert_eq!(line, b"chr7\t100\t200\tGENE1");

        let line = select_line(BED, 3).unwrap();
        assert_eq!(line, b"chrX\t10\t20\tGENE3");

        assert!(select_line(BED, 4).is_none());
        assert!(select_line(BED, 99).is_none());
    }

    #[test]
    fn test_select_line_without_trailing_newline() {
        let bed = b"chr1\t1\t2";
        assert_eq!(select_line(bed, 1).unwrap(), b"chr1\t1\t2");
        assert!(select_line(bed, 2).is_none());
    }

    #[test]
    fn test_substitute_placeholders() {
        let region = BedRegion::new("chr7\t500\t900\tGENE2").unwrap();
        let template = vec![
            "bcftools".to_string(),
            "view".to_string(),
            "-r".to_string(),
            "{locus}".to_string(),
            "{vcf}".to_string(),
            "-o".to_string(),
            "{out}.{chrom}.vcf.gz".to_string(),
        ];

        let argv = substitute(
            &template,
            &region,
            Some(Path::new("calls.vcf.gz")),
            Some(Path::new("sliced")),
        )
        .unwrap();

        assert_eq!(
            argv,
            vec![
                "bcftools",
                "view",
                "-r",
                "chr7:500-900",
                "calls.vcf.gz",
                "-o",
                "sliced.chr7.vcf.gz",
            ]
        );
    }

    #[test]
    fn test_substitute_requires_vcf() {
        let region = BedRegion::new("chr7\t500\t900").unwrap();
        let template = vec!["view".to_string(), "{vcf}".to_string()];

        assert!(substitute(&template, &region, None, None).is_err());
    }

    fn write_bed(tag: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("ef_slice_{}_{}.bed", tag, std::process::id()));
        let mut f = File::create(&path).unwrap();
        f.write_all(BED).unwrap();
        path
    }

    fn args(bed: PathBuf, task: Option<usize>, command: Vec<&str>) -> Args {
        Args {
            bed,
            task,
            vcf: None,
            output: None,
            tmp: None,
            dry_run: false,
            command: command.into_iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_run_dry_run_resolves_locus() {
        let bed = write_bed("dry");
        let mut args = args(bed.clone(), Some(2), vec!["echo", "{locus}"]);
        args.dry_run = true;

        assert_eq!(run(args).unwrap(), 0);

        std::fs::remove_file(bed).ok();
    }

    #[test]
    fn test_run_passes_exit_code_through() {
        let bed = write_bed("exit");
        let args = args(bed.clone(), Some(1), vec!["sh", "-c", "exit 3"]);

        assert_eq!(run(args).unwrap(), 3);

        std::fs::remove_file(bed).ok();
    }

    #[test]
    fn test_run_rejects_out_of_range_task() {
        let bed = write_bed("range");
        let args = args(bed.clone(), Some(9), vec!["true"]);

        assert!(run(args).is_err());

        std::fs::remove_file(bed).ok();
    }
}
