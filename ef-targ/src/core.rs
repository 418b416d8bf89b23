//! Core module for finding allele-specific excision targets
//!
//! For one gene, this module walks the canonical transcript, collects
//! the variant pairs whose excision would disrupt a coding exon, and
//! then asks, per individual and per Cas enzyme, whether both sides
//! of such a pair are heterozygous and targetable on the same
//! haplotype. Individuals are evaluated in parallel; a gene that
//! cannot be analyzed drops out cleanly into a bookkeeping file
//! instead of failing the run.

use anyhow::{bail, Result};
use hashbrown::{HashMap, HashSet};
use log::info;
use packannot::{packannot, GeneAnnot, GenotypeTable, Registry, TargTable};
use rayon::prelude::*;
use serde_json::Value;

use std::fs::create_dir_all;

use crate::cli::Args;
use crate::utils::{
    canonical, has_targ_pair, haplotype_targetability, load_high_scorers, targetable_pairs,
    ParallelAccumulator,
};

use config::{
    append_dropout, get_progress_bar, translate_gene_name, write_collection, write_descriptor,
    GeneTargetabilityValue, ModuleDescriptor, ModuleMap, ModuleType, HAP1_PREFIX, HAP2_PREFIX,
    HAPS_SUFFIX, MIN_HET_SITES, NOT_ENOUGH_HETS, NO_CODING_EXONS, NO_TARGETABLE_INDS,
    NO_TRANSCRIPT, TARG_ALL, TARG_DESCRIPTOR, TARG_PREFIX, TARG_SUFFIX,
};

/// why a gene dropped out of the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropout {
    NoTranscript,
    NoCodingExons,
    NotEnoughHets,
    NoTargetableInds,
}

impl Dropout {
    pub fn file(&self) -> &'static str {
        match self {
            Dropout::NoTranscript => NO_TRANSCRIPT,
            Dropout::NoCodingExons => NO_CODING_EXONS,
            Dropout::NotEnoughHets => NOT_ENOUGH_HETS,
            Dropout::NoTargetableInds => NO_TARGETABLE_INDS,
        }
    }
}

impl std::fmt::Display for Dropout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dropout::NoTranscript => write!(f, "no transcript found"),
            Dropout::NoCodingExons => write!(f, "no coding exons"),
            Dropout::NotEnoughHets => write!(f, "not enough het sites"),
            Dropout::NoTargetableInds => write!(f, "no targetable individuals"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed { samples: usize, targetable: usize },
    Dropout(Dropout),
}

/// Finds allele-specific excision targets for one gene
///
/// # Arguments
///
/// * `args` - The command line arguments
///
/// # Returns
///
/// * `Result<Outcome>` - Completed with per-sample counts, or the
///   dropout point the gene hit
pub fn find_excisions(args: Args) -> Result<Outcome> {
    info!("Now running excision analysis on {}.", args.gene);

    create_dir_all(&args.outdir)?;

    let contents = std::fs::read_to_string(&args.registry)
        .map_err(|e| anyhow::anyhow!("ERROR: Cannot read registry {:?} -> {}", args.registry, e))?;
    let registry = Registry::parse(&contents)?;
    if registry.is_empty() {
        bail!("ERROR: Registry {:?} has no records", args.registry);
    }

    let tracks = packannot(args.annotations.clone())?;
    let annots = match tracks.get(&args.chrom) {
        Some(annots) => annots,
        None => bail!("ERROR: No annotations for chromosome {}", args.chrom),
    };

    let annot = match canonical(annots, &args.gene) {
        Some(annot) => annot.clone(),
        None => return Ok(drop_out(&args, Dropout::NoTranscript)),
    };
    info!("Transcript used for this gene is {}.", annot.name);

    let coding_exon_starts = annot.coding_exon_starts();
    if coding_exon_starts.is_empty() {
        return Ok(drop_out(&args, Dropout::NoCodingExons));
    }
    info!(
        "{} total exons in this gene, {} of which are coding.",
        annot.exon_starts.len(),
        coding_exon_starts.len()
    );

    let span = (
        annot.tx_start.saturating_sub(args.window),
        annot.tx_end + args.window,
    );
    let high_scorers = load_high_scorers(&args.high_scorers)?;

    let contents = std::fs::read_to_string(&args.targ)
        .map_err(|e| anyhow::anyhow!("ERROR: Cannot read {:?} -> {}", args.targ, e))?;
    let mut targ = TargTable::parse(&contents)?;
    targ.restrict(&span, &high_scorers);

    // no high-scoring annotated variants in the region
    if targ.is_empty() {
        return Ok(drop_out(&args, Dropout::NotEnoughHets));
    }
    info!("Targetability data loaded: {} rows.", targ.len());

    let contents = std::fs::read_to_string(&args.gens)
        .map_err(|e| anyhow::anyhow!("ERROR: Cannot read {:?} -> {}", args.gens, e))?;
    let mut gens = GenotypeTable::parse(&contents)?;
    gens.restrict(&span, &high_scorers);
    info!(
        "Genotype data loaded: {} sites x {} samples.",
        gens.positions().len(),
        gens.samples().len()
    );

    // enzymes scored in both the registry and the table, registry order
    let scored = targ.cas_names().into_iter().collect::<HashSet<_>>();
    let cas_list = registry
        .names()
        .into_iter()
        .filter(|name| scored.contains(*name))
        .map(|name| name.to_string())
        .collect::<Vec<_>>();

    if cas_list.is_empty() {
        bail!("ERROR: No registry enzyme has targetability columns in {:?}", args.targ);
    }

    let eligible_samples = (0..gens.samples().len())
        .filter(|&i| gens.het_positions(i).len() >= MIN_HET_SITES)
        .collect::<Vec<_>>();

    info!(
        "{} individuals have >= {} het positions.",
        eligible_samples.len(),
        MIN_HET_SITES
    );

    if eligible_samples.is_empty() {
        return Ok(drop_out(&args, Dropout::NotEnoughHets));
    }

    let variants = gens.positions().to_vec();
    let pairs = targetable_pairs(&variants, &annot, &coding_exon_starts);
    info!("{} targetable variant pairs.", pairs.len());

    let eligible_variants = pairs
        .iter()
        .flat_map(|&(low, high)| [low, high])
        .collect::<HashSet<_>>();

    let any_eligible = eligible_samples.iter().any(|&i| {
        gens.het_positions(i)
            .iter()
            .any(|pos| eligible_variants.contains(pos))
    });
    if !any_eligible {
        return Ok(drop_out(&args, Dropout::NoTargetableInds));
    }

    info!("Checking targetability of individuals with sufficient number of hets.");

    let pb = get_progress_bar(eligible_samples.len() as u64, "Evaluating samples...");
    let accumulator = ParallelAccumulator::default();

    eligible_samples.par_iter().for_each(|&sample_idx| {
        evaluate_sample(
            sample_idx,
            &gens,
            &targ,
            &cas_list,
            &pairs,
            &eligible_variants,
            &annot,
            &accumulator,
        );

        pb.inc(1);
    });

    pb.finish_and_clear();
    info!("Targetable individuals: {}.", accumulator.num_targetable());

    write_outputs(&args, &cas_list, &accumulator);

    Ok(Outcome::Completed {
        samples: eligible_samples.len(),
        targetable: accumulator.num_targetable() as usize,
    })
}

/// append the gene to the dropout file and report why
fn drop_out(args: &Args, dropout: Dropout) -> Outcome {
    info!("{}: {} - skipping.", args.gene, dropout);
    append_dropout(&args.outdir, dropout.file(), &args.gene);

    Outcome::Dropout(dropout)
}

/// Evaluates one individual against every enzyme
///
/// # Arguments
///
/// * `sample_idx` - Column of the individual in the genotype table
/// * `gens` - The phased genotype table
/// * `targ` - The variant targetability table
/// * `cas_list` - Enzymes to evaluate, registry order
/// * `pairs` - Targetable variant pairs of this gene
/// * `eligible_variants` - Variants participating in any pair
/// * `annot` - The canonical transcript
/// * `accumulator` - The accumulator to fill
#[inline(always)]
fn evaluate_sample(
    sample_idx: usize,
    gens: &GenotypeTable,
    targ: &TargTable,
    cas_list: &[String],
    pairs: &[(u64, u64)],
    eligible_variants: &HashSet<u64>,
    annot: &GeneAnnot,
    accumulator: &ParallelAccumulator,
) {
    let sample = &gens.samples()[sample_idx];
    let hets = gens.het_positions(sample_idx);
    let sites = hets
        .iter()
        .copied()
        .filter(|pos| eligible_variants.contains(pos))
        .collect::<Vec<_>>();

    // per-site haplotype flags in cas_list order, for the haps table
    let mut site_flags: HashMap<u64, Vec<(bool, bool)>> =
        sites.iter().map(|&pos| (pos, Vec::new())).collect();

    let mut targ_flags = Vec::with_capacity(cas_list.len());
    let mut targetable_enzymes = Vec::new();
    let mut hap1_union = HashSet::new();
    let mut hap2_union = HashSet::new();

    for cas in cas_list {
        let mut hap1_sites = HashSet::new();
        let mut hap2_sites = HashSet::new();

        for &pos in &sites {
            let genotype = gens.genotype(pos, sample_idx).unwrap_or_default();
            let (hap1, hap2) = haplotype_targetability(pos, genotype, targ, cas);

            if hap1 {
                hap1_sites.insert(pos);
            }
            if hap2 {
                hap2_sites.insert(pos);
            }

            if let Some(flags) = site_flags.get_mut(&pos) {
                flags.push((hap1, hap2));
            }
        }

        // both cut sites of a pair have to sit on the same haplotype
        let targetable =
            has_targ_pair(&hap1_sites, pairs) || has_targ_pair(&hap2_sites, pairs);

        if targetable {
            targetable_enzymes.push(Value::String(cas.clone()));
        }

        targ_flags.push(targetable);
        hap1_union.extend(hap1_sites);
        hap2_union.extend(hap2_sites);
    }

    let targ_all = targ_flags.iter().any(|&t| t);

    let mut targ_row = sample.clone();
    for &flag in &targ_flags {
        targ_row.push_str(if flag { "\t1" } else { "\t0" });
    }
    targ_row.push_str(if targ_all { "\t1" } else { "\t0" });

    let haps_rows = sites
        .iter()
        .map(|&pos| {
            let mut row = format!("{}\t{}", sample, pos);
            for &(hap1, hap2) in &site_flags[&pos] {
                row.push_str(if hap1 { "\t1" } else { "\t0" });
                row.push_str(if hap2 { "\t1" } else { "\t0" });
            }
            row
        })
        .collect::<Vec<_>>();

    let schema = TargetabilitySchema {
        is_targetable: targ_all,
        targetable_enzymes,
        number_of_het_sites: Value::Number(hets.len().into()),
        number_of_eligible_sites: Value::Number(sites.len().into()),
        number_of_hap1_sites: Value::Number(hap1_union.len().into()),
        number_of_hap2_sites: Value::Number(hap2_union.len().into()),
        gene: Value::String(annot.gene_name.clone()),
        chrom: Value::String(annot.chrom.clone()),
        canonical_transcript: Value::String(annot.name.clone()),
        number_of_coding_exons: Value::Number(annot.coding_exon_starts().len().into()),
        number_of_targetable_pairs: Value::Number(pairs.len().into()),
    };

    accumulator.add(targ_row, haps_rows, sample, schema.difuse(), targ_all);
}

/// TargetabilitySchema struct
///
/// Per-sample evaluation results, mimicking the fields of
/// GeneTargetabilityDescriptor before they are difused into it.
struct TargetabilitySchema {
    pub is_targetable: bool,
    pub targetable_enzymes: Vec<Value>,
    pub number_of_het_sites: Value,
    pub number_of_eligible_sites: Value,
    pub number_of_hap1_sites: Value,
    pub number_of_hap2_sites: Value,
    pub gene: Value,
    pub chrom: Value,
    pub canonical_transcript: Value,
    pub number_of_coding_exons: Value,
    pub number_of_targetable_pairs: Value,
}

impl TargetabilitySchema {
    /// Converts the schema into a filled-up descriptor
    fn difuse(self) -> Box<dyn ModuleMap> {
        let mut handle = ModuleDescriptor::with_schema(ModuleType::GeneTargetability);

        for (field, value) in self.as_vals() {
            handle.set_value(Box::new(field), value).ok();
        }

        handle
    }

    pub fn as_vals(&self) -> Vec<(GeneTargetabilityValue, Value)> {
        vec![
            (
                GeneTargetabilityValue::IsTargetable,
                serde_json::json!(self.is_targetable),
            ),
            (
                GeneTargetabilityValue::TargetableEnzymes,
                Value::Array(self.targetable_enzymes.clone()),
            ),
            (
                GeneTargetabilityValue::NumberOfHetSites,
                self.number_of_het_sites.clone(),
            ),
            (
                GeneTargetabilityValue::NumberOfEligibleSites,
                self.number_of_eligible_sites.clone(),
            ),
            (
                GeneTargetabilityValue::NumberOfHap1Sites,
                self.number_of_hap1_sites.clone(),
            ),
            (
                GeneTargetabilityValue::NumberOfHap2Sites,
                self.number_of_hap2_sites.clone(),
            ),
            (GeneTargetabilityValue::Gene, self.gene.clone()),
            (GeneTargetabilityValue::Chrom, self.chrom.clone()),
            (
                GeneTargetabilityValue::CanonicalTranscript,
                self.canonical_transcript.clone(),
            ),
            (
                GeneTargetabilityValue::NumberOfCodingExons,
                self.number_of_coding_exons.clone(),
            ),
            (
                GeneTargetabilityValue::NumberOfTargetablePairs,
                self.number_of_targetable_pairs.clone(),
            ),
        ]
    }
}

/// write the per-sample table, the per-site haps table and the descriptor
fn write_outputs(args: &Args, cas_list: &[String], accumulator: &ParallelAccumulator) {
    let gene = translate_gene_name(&args.gene);

    let mut header = String::from("sample");
    for cas in cas_list {
        header.push_str(&format!("\t{}{}", TARG_PREFIX, cas));
    }
    header.push_str(&format!("\t{}", TARG_ALL));

    let mut rows = accumulator
        .targ
        .iter()
        .map(|row| row.key().clone())
        .collect::<Vec<_>>();
    rows.sort_unstable();

    let mut out = vec![header];
    out.extend(rows);
    write_collection(&out, &args.outdir.join(format!("{}{}", gene, TARG_SUFFIX)));

    let mut header = String::from("sample\tpos");
    for cas in cas_list {
        header.push_str(&format!("\t{}{}\t{}{}", HAP1_PREFIX, cas, HAP2_PREFIX, cas));
    }

    let mut rows = accumulator
        .haps
        .iter()
        .map(|row| row.key().clone())
        .collect::<Vec<_>>();
    rows.sort_unstable();

    let mut out = vec![header];
    out.extend(rows);
    write_collection(&out, &args.outdir.join(format!("{}{}", gene, HAPS_SUFFIX)));

    write_descriptor(
        &accumulator.descriptor,
        &args.outdir.join(format!("{}_{}", gene, TARG_DESCRIPTOR)),
    );
}
