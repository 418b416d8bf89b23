use anyhow::{bail, Result};
use config::{within, COMMENT_CHAR, BREAKS_PREFIX, MAKES_PREFIX, NEAR_PREFIX, PHASE_SEP};
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::iupac;

/// which side of the protospacer the PAM sits on, 5'->3'
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum PamSide {
    FivePrime,
    ThreePrime,
}

impl PamSide {
    pub fn read(field: &str) -> Result<Self> {
        match field {
            "5'" | "5prime" => Ok(PamSide::FivePrime),
            "3'" | "3prime" => Ok(PamSide::ThreePrime),
            _ => bail!("ERROR: PAM side must be 5' or 3', got {:?}", field),
        }
    }
}

impl std::fmt::Display for PamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PamSide::FivePrime => write!(f, "5'"),
            PamSide::ThreePrime => write!(f, "3'"),
        }
    }
}

/// one Cas enzyme PAM specification
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct PamRecord {
    pub name: String,
    pub pam: String,
    pub side: PamSide,
}

impl PamRecord {
    pub fn read(line: &str) -> Result<Self> {
        let mut fields = line.split('\t');

        let (name, pam, side) = (
            fields.next().filter(|f| !f.is_empty()),
            fields.next().filter(|f| !f.is_empty()),
            fields.next().filter(|f| !f.is_empty()),
        );

        let (name, pam, side) = match (name, pam, side) {
            (Some(name), Some(pam), Some(side)) => (name, pam, side),
            _ => bail!("ERROR: Expected 3 tab-separated fields in {:?}", line),
        };

        if fields.next().is_some() {
            bail!("ERROR: Trailing fields after PAM side in {:?}", line);
        }

        if !iupac::pattern_is_valid(pam) {
            bail!(
                "ERROR: PAM for {} is not a valid IUPAC pattern: {:?}",
                name,
                pam
            );
        }

        Ok(Self {
            name: name.to_string(),
            pam: pam.to_ascii_uppercase(),
            side: PamSide::read(side)?,
        })
    }

    /// 0-based forward-strand hits of this PAM on a sequence
    pub fn scan(&self, seq: &[u8]) -> Vec<usize> {
        iupac::scan(&self.pam, seq)
    }

    /// 0-based reverse-strand hits, reported in forward coordinates
    pub fn scan_revcomp(&self, seq: &[u8]) -> Vec<usize> {
        iupac::scan(&iupac::revcomp(&self.pam), seq)
    }
}

impl std::fmt::Display for PamRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.name, self.pam, self.side)
    }
}

/// the static Cas enzyme registry
///
/// Loaded read-only from a hand-edited TSV; record order is kept so
/// parse-then-serialize reproduces the table, comments excluded.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Registry {
    records: Vec<PamRecord>,
}

impl Registry {
    pub fn parse(contents: &str) -> Result<Self> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for line in contents.lines() {
            if line.is_empty() || line.starts_with(COMMENT_CHAR) {
                continue;
            }

            let record = PamRecord::read(line)?;
            if !seen.insert(record.name.clone()) {
                bail!("ERROR: Duplicate enzyme name in registry: {}", record.name);
            }

            records.push(record);
        }

        Ok(Self { records })
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out
    }

    pub fn get(&self, name: &str) -> Option<&PamRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PamRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// one transcript row of a RefSeq-style annotation table
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GeneAnnot {
    pub name: String,
    pub chrom: String,
    pub tx_start: u64,
    pub tx_end: u64,
    pub cds_start: u64,
    pub cds_end: u64,
    pub exon_count: usize,
    pub exon_starts: Vec<u64>,
    pub exon_ends: Vec<u64>,
    pub gene_name: String,
    pub size: u64,
}

impl GeneAnnot {
    pub fn read(line: &str) -> Result<Self> {
        let mut data = line.split('\t');

        let (
            name,
            chrom,
            tx_start,
            tx_end,
            cds_start,
            cds_end,
            exon_count,
            exon_starts,
            exon_ends,
            gene_name,
            size,
        ) = (
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse name"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse chrom"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse txStart"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse txEnd"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse cdsStart"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse cdsEnd"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse exonCount"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse exonStarts"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse exonEnds"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse gene_name"))?,
            data.next().ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse size"))?,
        );

        let parse_u64 = |field: &str, what: &str| -> Result<u64> {
            field
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("ERROR: Cannot parse {} from {:?}", what, field))
        };

        let parse_list = |field: &str, what: &str| -> Result<Vec<u64>> {
            field
                .split(',')
                .filter(|f| !f.is_empty())
                .map(|f| parse_u64(f, what))
                .collect()
        };

        let exon_starts = parse_list(exon_starts, "exonStarts")?;
        let exon_ends = parse_list(exon_ends, "exonEnds")?;

        if exon_starts.len() != exon_ends.len() {
            bail!(
                "ERROR: exonStarts/exonEnds length mismatch for {}: {} vs {}",
                name,
                exon_starts.len(),
                exon_ends.len()
            );
        }

        Ok(Self {
            name: name.to_string(),
            chrom: chrom.to_string(),
            tx_start: parse_u64(tx_start, "txStart")?,
            tx_end: parse_u64(tx_end, "txEnd")?,
            cds_start: parse_u64(cds_start, "cdsStart")?,
            cds_end: parse_u64(cds_end, "cdsEnd")?,
            exon_count: exon_count
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("ERROR: Cannot parse exonCount"))?,
            exon_starts,
            exon_ends,
            gene_name: gene_name.to_string(),
            size: parse_u64(size, "size")?,
        })
    }

    pub fn span(&self) -> (u64, u64) {
        (self.tx_start, self.tx_end)
    }

    /// starts of coding exons, ascending
    ///
    /// An exon is coding when its start falls inside the CDS span;
    /// UTR-only exons drop out here.
    pub fn coding_exon_starts(&self) -> Vec<u64> {
        let mut starts = self
            .exon_starts
            .iter()
            .copied()
            .filter(|s| within(s, &(self.cds_start, self.cds_end)))
            .collect::<Vec<_>>();

        starts.sort_unstable();
        starts
    }

    /// (start, end) spans of coding exons, ascending by start
    pub fn coding_spans(&self) -> Vec<(u64, u64)> {
        let mut spans = self
            .exon_starts
            .iter()
            .zip(self.exon_ends.iter())
            .filter(|(s, _)| within(*s, &(self.cds_start, self.cds_end)))
            .map(|(s, e)| (*s, *e))
            .collect::<Vec<_>>();

        spans.sort_unstable();
        spans
    }

    pub fn is_coding(&self, pos: u64) -> bool {
        self.coding_spans().iter().any(|span| within(pos, span))
    }
}

/// one region of a BED-like task file
#[derive(Debug, PartialEq, Clone)]
pub struct BedRegion<'a> {
    pub chrom: &'a str,
    pub start: u64,
    pub end: u64,
    pub name: Option<&'a str>,
}

impl<'a> BedRegion<'a> {
    pub fn new(line: &'a str) -> Result<BedRegion<'a>, &'static str> {
        if line.is_empty() {
            return Err("Empty line");
        }

        let mut fields = line.split('\t');
        let get = |field: &str| field.parse::<u64>().map_err(|_| "Cannot parse field");

        let (chrom, start, end) = (
            fields.next().ok_or("Cannot parse chrom")?,
            get(fields.next().ok_or("Cannot parse start")?)?,
            get(fields.next().ok_or("Cannot parse end")?)?,
        );

        if end < start {
            return Err("Region end before start");
        }

        Ok(BedRegion {
            chrom,
            start,
            end,
            name: fields.next(),
        })
    }

    /// the `chrom:start-end` locus string handed to external tools
    pub fn locus(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.start, self.end)
    }
}

fn parse_flag(field: &str) -> Result<bool> {
    match field {
        "1" | "true" | "True" => Ok(true),
        "0" | "false" | "False" => Ok(false),
        _ => bail!("ERROR: Cannot parse boolean flag from {:?}", field),
    }
}

/// one alternate allele of one variant with its per-enzyme PAM flags
#[derive(Debug, PartialEq, Clone)]
pub struct TargRow {
    pub pos: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    flags: Vec<bool>,
}

/// the per-chromosome variant targetability table
///
/// Header-first TSV: `pos ref alt` then one boolean column per
/// (effect, enzyme) pair, named makes_<cas>, breaks_<cas> and
/// var_near_<cas>.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct TargTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<TargRow>,
    by_pos: HashMap<u64, Vec<usize>>,
}

impl TargTable {
    pub fn parse(contents: &str) -> Result<Self> {
        let mut lines = contents
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with(COMMENT_CHAR));

        let header = match lines.next() {
            Some(header) => header,
            None => bail!("ERROR: Targetability table has no header"),
        };

        let mut fields = header.split('\t');
        match (fields.next(), fields.next(), fields.next()) {
            (Some("pos"), Some("ref"), Some("alt")) => (),
            _ => bail!("ERROR: Targetability header must start with pos\tref\talt"),
        }

        let columns = fields.map(|f| f.to_string()).collect::<Vec<_>>();
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect::<HashMap<_, _>>();

        let mut rows = Vec::new();
        for line in lines {
            let mut fields = line.split('\t');

            let pos = fields
                .next()
                .ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse pos"))?
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("ERROR: Cannot parse pos in {:?}", line))?;
            let ref_allele = fields
                .next()
                .ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse ref"))?;
            let alt_allele = fields
                .next()
                .ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse alt"))?;

            let flags = fields.map(parse_flag).collect::<Result<Vec<_>>>()?;
            if flags.len() != columns.len() {
                bail!(
                    "ERROR: Expected {} flags at pos {}, got {}",
                    columns.len(),
                    pos,
                    flags.len()
                );
            }

            rows.push(TargRow {
                pos,
                ref_allele: ref_allele.to_string(),
                alt_allele: alt_allele.to_string(),
                flags,
            });
        }

        let mut table = Self {
            columns,
            index,
            rows,
            by_pos: HashMap::new(),
        };
        table.reindex();

        Ok(table)
    }

    fn reindex(&mut self) {
        self.by_pos.clear();
        for (i, row) in self.rows.iter().enumerate() {
            self.by_pos.entry(row.pos).or_insert_with(Vec::new).push(i);
        }
    }

    /// keep only rows inside the window and in the keep-set
    pub fn restrict(&mut self, span: &(u64, u64), keep: &HashSet<u64>) {
        self.rows
            .retain(|row| within(row.pos, span) && keep.contains(&row.pos));
        self.reindex();
    }

    /// enzymes for which all three flag columns are present
    pub fn cas_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter_map(|c| c.strip_prefix(MAKES_PREFIX))
            .filter(|cas| {
                self.index.contains_key(&format!("{}{}", BREAKS_PREFIX, cas))
                    && self.index.contains_key(&format!("{}{}", NEAR_PREFIX, cas))
            })
            .map(|cas| cas.to_string())
            .collect()
    }

    pub fn rows_at(&self, pos: u64) -> Vec<&TargRow> {
        self.by_pos
            .get(&pos)
            .map(|idxs| idxs.iter().map(|&i| &self.rows[i]).collect())
            .unwrap_or_default()
    }

    pub fn row_for(&self, pos: u64, alt: &str) -> Option<&TargRow> {
        self.rows_at(pos)
            .into_iter()
            .find(|row| row.alt_allele == alt)
    }

    pub fn flag(&self, row: &TargRow, column: &str) -> bool {
        self.index
            .get(column)
            .map(|&i| row.flags[i])
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// the per-chromosome phased genotype table
///
/// Header-first TSV: `pos` then one column per sample; cells are
/// phased calls like A|G.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct GenotypeTable {
    samples: Vec<String>,
    positions: Vec<u64>,
    rows: HashMap<u64, Vec<String>>,
}

/// split a phased genotype into its two haplotype alleles
///
/// Unphased or missing calls get None and never count as het.
pub fn phased(genotype: &str) -> Option<(&str, &str)> {
    let mut alleles = genotype.split(PHASE_SEP);

    match (alleles.next(), alleles.next(), alleles.next()) {
        (Some(hap1), Some(hap2), None) if !hap1.is_empty() && !hap2.is_empty() => {
            Some((hap1, hap2))
        }
        _ => None,
    }
}

pub fn is_het(genotype: &str) -> bool {
    phased(genotype)
        .map(|(hap1, hap2)| hap1 != hap2)
        .unwrap_or(false)
}

impl GenotypeTable {
    pub fn parse(contents: &str) -> Result<Self> {
        let mut lines = contents
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with(COMMENT_CHAR));

        let header = match lines.next() {
            Some(header) => header,
            None => bail!("ERROR: Genotype table has no header"),
        };

        let mut fields = header.split('\t');
        match fields.next() {
            Some("pos") => (),
            _ => bail!("ERROR: Genotype header must start with pos"),
        }

        let samples = fields.map(|f| f.to_string()).collect::<Vec<_>>();
        if samples.is_empty() {
            bail!("ERROR: Genotype table has no samples");
        }

        let mut rows = HashMap::new();
        let mut positions = Vec::new();

        for line in lines {
            let mut fields = line.split('\t');
            let pos = fields
                .next()
                .ok_or_else(|| anyhow::anyhow!("ERROR: Cannot parse pos"))?
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("ERROR: Cannot parse pos in {:?}", line))?;

            let genotypes = fields.map(|f| f.to_string()).collect::<Vec<_>>();
            if genotypes.len() != samples.len() {
                bail!(
                    "ERROR: Expected {} genotypes at pos {}, got {}",
                    samples.len(),
                    pos,
                    genotypes.len()
                );
            }

            if rows.insert(pos, genotypes).is_none() {
                positions.push(pos);
            }
        }

        positions.sort_unstable();

        Ok(Self {
            samples,
            positions,
            rows,
        })
    }

    pub fn restrict(&mut self, span: &(u64, u64), keep: &HashSet<u64>) {
        self.positions
            .retain(|pos| within(pos, span) && keep.contains(pos));
        let positions = self.positions.iter().collect::<HashSet<_>>();
        self.rows.retain(|pos, _| positions.contains(pos));
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn positions(&self) -> &[u64] {
        &self.positions
    }

    pub fn genotype(&self, pos: u64, sample_idx: usize) -> Option<&str> {
        self.rows
            .get(&pos)
            .and_then(|gts| gts.get(sample_idx))
            .map(|gt| gt.as_str())
    }

    /// het positions of one sample, ascending
    pub fn het_positions(&self, sample_idx: usize) -> Vec<u64> {
        self.positions
            .iter()
            .copied()
            .filter(|&pos| {
                self.genotype(pos, sample_idx)
                    .map(is_het)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = "# name\tPAM\tside\n\
                            SpCas9\tNGG\t3'\n\
                            SaCas9_KKH\tNNNRRT\t3'\n\
                            cpf1\tTTTN\t5'\n";

    #[test]
    fn test_pam_side_domain() {
        assert_eq!(PamSide::read("5'").unwrap(), PamSide::FivePrime);
        assert_eq!(PamSide::read("3'").unwrap(), PamSide::ThreePrime);
        assert_eq!(PamSide::read("5prime").unwrap(), PamSide::FivePrime);
        assert!(PamSide::read("both").is_err());
        assert!(PamSide::read("").is_err());
    }

    #[test]
    fn test_pam_record_read() {
        let record = PamRecord::read("SpCas9_VRER\tNGCG\t3'").unwrap();

        assert_eq!(record.name, "SpCas9_VRER");
        assert_eq!(record.pam, "NGCG");
        assert_eq!(record.side, PamSide::ThreePrime);

        // PAMs are normalized to uppercase
        let record = PamRecord::read("cpf1\ttttn\t5'").unwrap();
        assert_eq!(record.pam, "TTTN");
    }

    #[test]
    fn test_pam_record_rejects_bad_lines() {
        assert!(PamRecord::read("SpCas9\tNGG").is_err());
        assert!(PamRecord::read("SpCas9\tNGG\t3'\textra").is_err());
        assert!(PamRecord::read("SpCas9\tNGZ\t3'").is_err());
        assert!(PamRecord::read("SpCas9\t\t3'").is_err());
    }

    #[test]
    fn test_registry_excludes_comments() {
        let registry = Registry::parse(REGISTRY).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.names(),
            vec!["SpCas9", "SaCas9_KKH", "cpf1"]
        );
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let table = "SpCas9\tNGG\t3'\nSpCas9\tNGCG\t3'\n";
        assert!(Registry::parse(table).is_err());
    }

    #[test]
    fn test_registry_roundtrip() {
        let registry = Registry::parse(REGISTRY).unwrap();
        let serialized = registry.serialize();

        assert_eq!(
            serialized,
            "SpCas9\tNGG\t3'\nSaCas9_KKH\tNNNRRT\t3'\ncpf1\tTTTN\t5'\n"
        );
        assert_eq!(Registry::parse(&serialized).unwrap(), registry);
    }

    #[test]
    fn test_pam_record_scan_both_strands() {
        let registry = Registry::parse(REGISTRY).unwrap();
        let spcas9 = registry.get("SpCas9").unwrap();

        assert_eq!(spcas9.scan(b"AGGTCCA"), vec![0]);
        // CCN on the forward strand is an NGG site on the reverse
        assert_eq!(spcas9.scan_revcomp(b"AGGTCCA"), vec![4]);
    }

    const ANNOT: &str = "NM_001\tchr7\t100\t1000\t200\t900\t3\t100,400,800,\t300,600,1000,\tGENE1\t900";

    #[test]
    fn test_gene_annot_read() {
        let annot = GeneAnnot::read(ANNOT).unwrap();

        assert_eq!(annot.name, "NM_001");
        assert_eq!(annot.chrom, "chr7");
        assert_eq!(annot.span(), (100, 1000));
        assert_eq!(annot.exon_starts, vec![100, 400, 800]);
        assert_eq!(annot.exon_ends, vec![300, 600, 1000]);
        assert_eq!(annot.gene_name, "GENE1");
    }

    #[test]
    fn test_gene_annot_coding_exons() {
        let annot = GeneAnnot::read(ANNOT).unwrap();

        // first exon starts before the CDS, so it is UTR-only
        assert_eq!(annot.coding_exon_starts(), vec![400, 800]);
        assert_eq!(annot.coding_spans(), vec![(400, 600), (800, 1000)]);

        assert!(annot.is_coding(500));
        assert!(annot.is_coding(800));
        assert!(!annot.is_coding(700));
        assert!(!annot.is_coding(150));
    }

    #[test]
    fn test_gene_annot_rejects_ragged_exons() {
        let line = "NM_001\tchr7\t100\t1000\t200\t900\t3\t100,400,\t300,600,1000,\tGENE1\t900";
        assert!(GeneAnnot::read(line).is_err());
    }

    #[test]
    fn test_bed_region_locus() {
        let region = BedRegion::new("chr7\t117479963\t117668665\tCFTR").unwrap();

        assert_eq!(region.chrom, "chr7");
        assert_eq!(region.name, Some("CFTR"));
        assert_eq!(region.locus(), "chr7:117479963-117668665");

        let region = BedRegion::new("chrX\t10\t20").unwrap();
        assert_eq!(region.name, None);

        assert!(BedRegion::new("chr7\t20\t10").is_err());
        assert!(BedRegion::new("").is_err());
    }

    const TARG: &str = "pos\tref\talt\tmakes_SpCas9\tbreaks_SpCas9\tvar_near_SpCas9\n\
                        500\tA\tG\t1\t0\t0\n\
                        500\tA\tT\t0\t1\t0\n\
                        650\tC\tT\t0\t0\t1\n";

    #[test]
    fn test_targ_table_parse_and_flags() {
        let table = TargTable::parse(TARG).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.cas_names(), vec!["SpCas9"]);

        let row = table.row_for(500, "G").unwrap();
        assert!(table.flag(row, "makes_SpCas9"));
        assert!(!table.flag(row, "breaks_SpCas9"));
        assert!(!table.flag(row, "absent_column"));

        assert_eq!(table.rows_at(500).len(), 2);
        assert!(table.row_for(500, "C").is_none());
    }

    #[test]
    fn test_targ_table_restrict() {
        let mut table = TargTable::parse(TARG).unwrap();
        let keep = [500_u64].iter().copied().collect::<HashSet<_>>();

        table.restrict(&(0, 600), &keep);

        assert_eq!(table.len(), 2);
        assert!(table.rows_at(650).is_empty());
    }

    #[test]
    fn test_targ_table_rejects_bad_header() {
        assert!(TargTable::parse("position\tref\talt\n").is_err());
        assert!(TargTable::parse("").is_err());
    }

    const GENS: &str = "pos\tHG00096\tHG00097\n\
                        500\tA|G\tA|A\n\
                        650\tC|C\tC|T\n\
                        800\tT|A\tA|T\n";

    #[test]
    fn test_genotype_table_hets() {
        let table = GenotypeTable::parse(GENS).unwrap();

        assert_eq!(table.samples(), &["HG00096", "HG00097"]);
        assert_eq!(table.het_positions(0), vec![500, 800]);
        assert_eq!(table.het_positions(1), vec![650, 800]);
        assert_eq!(table.genotype(650, 1), Some("C|T"));
        assert_eq!(table.genotype(999, 0), None);
    }

    #[test]
    fn test_phased_and_het() {
        assert_eq!(phased("A|G"), Some(("A", "G")));
        assert_eq!(phased("A/G"), None);
        assert_eq!(phased("A|"), None);
        assert_eq!(phased("A|G|T"), None);

        assert!(is_het("A|G"));
        assert!(!is_het("A|A"));
        assert!(!is_het("./."));
    }
}
