use anyhow::Result;
use dashmap::{DashMap, DashSet};
use hashbrown::HashSet;
use packannot::{phased, GeneAnnot, TargRow, TargTable};

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use config::{ModuleMap, BREAKS_PREFIX, MAKES_PREFIX, NEAR_PREFIX, PAIR_WINDOW};

/// load the high-scoring variant positions, one integer per line
pub fn load_high_scorers(path: &PathBuf) -> Result<HashSet<u64>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("ERROR: Cannot read {:?} -> {}", path, e))?;

    let positions = contents
        .lines()
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| {
            l.trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("ERROR: Cannot parse position from {:?}", l))
        })
        .collect::<Result<HashSet<u64>>>()?;

    match positions.is_empty() {
        true => anyhow::bail!("ERROR: High-scorer list {:?} is empty", path),
        false => Ok(positions),
    }
}

/// pick the canonical (longest) transcript of a gene
pub fn canonical<'a>(annots: &'a [GeneAnnot], gene: &str) -> Option<&'a GeneAnnot> {
    annots
        .iter()
        .filter(|a| a.gene_name == gene)
        .max_by_key(|a| a.size)
}

/// start of the next coding exon strictly after a position
pub fn next_exon(variant_position: u64, coding_exon_starts: &[u64]) -> Option<u64> {
    coding_exon_starts
        .iter()
        .copied()
        .filter(|&start| start > variant_position)
        .min()
}

/// whether excising between two variant positions disrupts a coding exon
///
/// Either cut site lands inside a coding exon, or the excised span
/// reaches past the start of the next coding exon downstream of the
/// lower cut.
pub fn targ_pair(
    variant1: u64,
    variant2: u64,
    annot: &GeneAnnot,
    coding_exon_starts: &[u64],
) -> bool {
    let (low, high) = if variant1 <= variant2 {
        (variant1, variant2)
    } else {
        (variant2, variant1)
    };

    if annot.is_coding(low) || annot.is_coding(high) {
        return true;
    }

    match next_exon(low, coding_exon_starts) {
        Some(next) => high >= next,
        None => false,
    }
}

/// all exon-disrupting variant pairs within the excision window
pub fn targetable_pairs(
    variants: &[u64],
    annot: &GeneAnnot,
    coding_exon_starts: &[u64],
) -> Vec<(u64, u64)> {
    let mut pairs = Vec::new();

    for (i, &v1) in variants.iter().enumerate() {
        for &v2 in &variants[i + 1..] {
            let (low, high) = if v1 <= v2 { (v1, v2) } else { (v2, v1) };

            if high > low + PAIR_WINDOW {
                continue;
            }

            if targ_pair(low, high, annot, coding_exon_starts) {
                pairs.push((low, high));
            }
        }
    }

    pairs
}

/// whether a sample has both sides of at least one targetable pair het
pub fn has_targ_pair(het_positions: &HashSet<u64>, targ_pairs: &[(u64, u64)]) -> bool {
    targ_pairs
        .iter()
        .any(|(low, high)| het_positions.contains(low) && het_positions.contains(high))
}

/// resolve one targetability row into (alt hap, ref hap) flags
///
/// A variant that creates a PAM marks the haplotype carrying it; one
/// that destroys a PAM marks the reference haplotype; one near a PAM
/// marks both.
fn resolve_row(row: Option<&TargRow>, table: &TargTable, cas: &str) -> (bool, bool) {
    let row = match row {
        Some(row) => row,
        None => return (false, false),
    };

    let mut targ_alt = table.flag(row, &format!("{}{}", MAKES_PREFIX, cas));
    let mut targ_ref = table.flag(row, &format!("{}{}", BREAKS_PREFIX, cas));

    if table.flag(row, &format!("{}{}", NEAR_PREFIX, cas)) {
        targ_alt = true;
        targ_ref = true;
    }

    (targ_alt, targ_ref)
}

/// per-haplotype targetability of one het site for one enzyme
///
/// Returns (hap1, hap2). Sites with no targetability row, or with an
/// unphased genotype, are untargetable on both haplotypes.
pub fn haplotype_targetability(
    pos: u64,
    genotype: &str,
    table: &TargTable,
    cas: &str,
) -> (bool, bool) {
    let (hap1, hap2) = match phased(genotype) {
        Some(alleles) => alleles,
        None => return (false, false),
    };

    let rows = table.rows_at(pos);
    let ref_allele = match rows.first() {
        Some(row) => row.ref_allele.clone(),
        None => return (false, false),
    };

    if hap1 != ref_allele && hap2 != ref_allele {
        // two different alt alleles; each row's ref-haplotype flag
        // marks the haplotype that does not carry that alt
        let (alt1, other1) = resolve_row(table.row_for(pos, hap1), table, cas);
        let (alt2, other2) = resolve_row(table.row_for(pos, hap2), table, cas);

        (alt1 || other2, alt2 || other1)
    } else if hap2 == ref_allele {
        let (targ_alt, targ_ref) = resolve_row(table.row_for(pos, hap1), table, cas);
        (targ_alt, targ_ref)
    } else {
        let (targ_alt, targ_ref) = resolve_row(table.row_for(pos, hap2), table, cas);
        (targ_ref, targ_alt)
    }
}

#[derive(Default)]
pub struct ParallelAccumulator {
    pub targ: DashSet<String>,
    pub haps: DashSet<String>,
    pub descriptor: DashMap<String, Box<dyn ModuleMap>>,
    targetable: AtomicU32,
}

impl ParallelAccumulator {
    pub fn add(
        &self,
        targ_row: String,
        haps_rows: Vec<String>,
        sample: &str,
        descriptor: Box<dyn ModuleMap>,
        is_targetable: bool,
    ) {
        self.targ.insert(targ_row);
        for row in haps_rows {
            self.haps.insert(row);
        }
        self.descriptor.insert(sample.to_string(), descriptor);

        if is_targetable {
            self.targetable.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn num_targetable(&self) -> u32 {
        self.targetable.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annot() -> GeneAnnot {
        // coding exons at (400, 600) and (800, 1000); (100, 300) is UTR
        GeneAnnot::read(
            "NM_001\tchr7\t100\t1000\t400\t1000\t3\t100,400,800,\t300,600,1000,\tGENE1\t900",
        )
        .unwrap()
    }

    #[test]
    fn test_next_exon() {
        let annot = annot();
        let starts = annot.coding_exon_starts();

        assert_eq!(next_exon(100, &starts), Some(400));
        assert_eq!(next_exon(400, &starts), Some(800));
        assert_eq!(next_exon(799, &starts), Some(800));
        assert_eq!(next_exon(800, &starts), None);
    }

    #[test]
    fn test_targ_pair_rules() {
        let annot = annot();
        let starts = annot.coding_exon_starts();

        // one cut inside a coding exon
        assert!(targ_pair(500, 700, &annot, &starts));
        // both cuts intronic, but the span reaches the next coding exon
        assert!(targ_pair(650, 820, &annot, &starts));
        assert!(targ_pair(650, 800, &annot, &starts));
        // both cuts in the same intron, nothing excised
        assert!(!targ_pair(650, 700, &annot, &starts));
        // cuts in the UTR exon count only if the span reaches the CDS
        assert!(targ_pair(150, 450, &annot, &starts));
        assert!(!targ_pair(150, 350, &annot, &starts));
    }

    #[test]
    fn test_targetable_pairs_window_cap() {
        let annot = GeneAnnot::read(
            "NM_002\tchr7\t0\t50000\t0\t50000\t2\t0,20000,\t100,50000,\tGENE2\t50000",
        )
        .unwrap();
        let starts = annot.coding_exon_starts();

        // 50 and 20050 disrupt an exon but span more than the window
        let pairs = targetable_pairs(&[50, 20050], &annot, &starts);
        assert!(pairs.is_empty());

        let pairs = targetable_pairs(&[50, 9000, 20050], &annot, &starts);
        assert_eq!(pairs, vec![(50, 9000)]);
    }

    #[test]
    fn test_has_targ_pair() {
        let pairs = vec![(500, 820), (650, 820)];

        let hets = [500_u64, 820].iter().copied().collect::<HashSet<_>>();
        assert!(has_targ_pair(&hets, &pairs));

        let hets = [500_u64, 650].iter().copied().collect::<HashSet<_>>();
        assert!(!has_targ_pair(&hets, &pairs));
    }

    const TARG: &str = "pos\tref\talt\tmakes_SpCas9\tbreaks_SpCas9\tvar_near_SpCas9\n\
                        500\tA\tG\t1\t0\t0\n\
                        500\tA\tT\t0\t1\t0\n\
                        650\tC\tT\t0\t0\t1\n";

    #[test]
    fn test_haplotype_targetability_alt_on_hap1() {
        let table = TargTable::parse(TARG).unwrap();

        // G creates a PAM -> only the alt-carrying haplotype
        assert_eq!(
            haplotype_targetability(500, "G|A", &table, "SpCas9"),
            (true, false)
        );
        assert_eq!(
            haplotype_targetability(500, "A|G", &table, "SpCas9"),
            (false, true)
        );
    }

    #[test]
    fn test_haplotype_targetability_breaks_marks_ref() {
        let table = TargTable::parse(TARG).unwrap();

        // T destroys a PAM -> the reference haplotype keeps the site
        assert_eq!(
            haplotype_targetability(500, "T|A", &table, "SpCas9"),
            (false, true)
        );
        assert_eq!(
            haplotype_targetability(500, "A|T", &table, "SpCas9"),
            (true, false)
        );
    }

    #[test]
    fn test_haplotype_targetability_near_marks_both() {
        let table = TargTable::parse(TARG).unwrap();

        assert_eq!(
            haplotype_targetability(650, "T|C", &table, "SpCas9"),
            (true, true)
        );
    }

    #[test]
    fn test_haplotype_targetability_both_alt() {
        let table = TargTable::parse(TARG).unwrap();

        // hap1 carries G (makes), hap2 carries T (breaks -> marks hap1)
        assert_eq!(
            haplotype_targetability(500, "G|T", &table, "SpCas9"),
            (true, false)
        );
    }

    #[test]
    fn test_haplotype_targetability_missing_data() {
        let table = TargTable::parse(TARG).unwrap();

        assert_eq!(
            haplotype_targetability(999, "A|G", &table, "SpCas9"),
            (false, false)
        );
        assert_eq!(
            haplotype_targetability(500, "./.", &table, "SpCas9"),
            (false, false)
        );
    }
}
