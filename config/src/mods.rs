use serde_json::Value;
use std::any::Any;

// module descriptors
#[derive(Debug)]
pub enum ModuleType {
    GeneTargetability,
}

pub trait ModuleMap: Any + Send + Sync {
    fn get_value(&self, key: Box<dyn Any>) -> Option<serde_json::Value>;
    fn set_value(&mut self, key: Box<dyn Any>, value: serde_json::Value) -> Result<(), String>;
    fn as_any(&self) -> &dyn Any;
}

macro_rules! downcast_dbg {
    ($formatter:expr, $module:expr, $($type:ty),+) => {
        {
            let mut result: Option<std::fmt::Result> = None;
            $(
                if result.is_none() {
                    if let Some(debuggable) = $module.as_any().downcast_ref::<$type>() {
                        result = Some(write!($formatter, "{:?}", debuggable));
                    }
                }
            )+
            result.unwrap_or_else(|| write!($formatter, "Unknown ModuleMap implementation"))
        }
    };
}

impl std::fmt::Debug for dyn ModuleMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        downcast_dbg!(f, self, GeneTargetabilityDescriptor)
    }
}

#[allow(dead_code)]
#[derive(Debug)]
pub struct ModuleDescriptor {
    module: ModuleType,
}

impl ModuleDescriptor {
    pub fn with_schema(module: ModuleType) -> Box<dyn ModuleMap> {
        match module {
            ModuleType::GeneTargetability => GeneTargetabilityDescriptor::new(),
        }
    }
}

pub struct GeneTargetabilityDescriptor {
    pub is_targetable: Value,
    pub targetable_enzymes: Value,
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

impl GeneTargetabilityDescriptor {
    pub fn new() -> Box<Self> {
        Box::new(Self {
            is_targetable: Value::Bool(false),
            targetable_enzymes: Value::Array(vec![]),
            number_of_het_sites: Value::Number(0.into()),
            number_of_eligible_sites: Value::Number(0.into()),
            number_of_hap1_sites: Value::Number(0.into()),
            number_of_hap2_sites: Value::Number(0.into()),
            gene: Value::Null,
            chrom: Value::Null,
            canonical_transcript: Value::Null,
            number_of_coding_exons: Value::Null,
            number_of_targetable_pairs: Value::Null,
        })
    }
}

#[derive(Debug, Clone)]
pub enum GeneTargetabilityValue {
    IsTargetable,
    TargetableEnzymes,
    NumberOfHetSites,
    NumberOfEligibleSites,
    NumberOfHap1Sites,
    NumberOfHap2Sites,
    Gene,
    Chrom,
    CanonicalTranscript,
    NumberOfCodingExons,
    NumberOfTargetablePairs,
}

impl ModuleMap for GeneTargetabilityDescriptor {
    fn get_value(&self, key: Box<dyn Any>) -> Option<serde_json::Value> {
        if let Ok(key) = key.downcast::<GeneTargetabilityValue>() {
            match *key {
                GeneTargetabilityValue::IsTargetable => Some(self.is_targetable.clone()),
                GeneTargetabilityValue::TargetableEnzymes => Some(self.targetable_enzymes.clone()),
                GeneTargetabilityValue::NumberOfHetSites => Some(self.number_of_het_sites.clone()),
                GeneTargetabilityValue::NumberOfEligibleSites => {
                    Some(self.number_of_eligible_sites.clone())
                }
                GeneTargetabilityValue::NumberOfHap1Sites => Some(self.number_of_hap1_sites.clone()),
                GeneTargetabilityValue::NumberOfHap2Sites => Some(self.number_of_hap2_sites.clone()),
                GeneTargetabilityValue::Gene => Some(self.gene.clone()),
                GeneTargetabilityValue::Chrom => Some(self.chrom.clone()),
                GeneTargetabilityValue::CanonicalTranscript => {
                    Some(self.canonical_transcript.clone())
                }
                GeneTargetabilityValue::NumberOfCodingExons => {
                    Some(self.number_of_coding_exons.clone())
                }
                GeneTargetabilityValue::NumberOfTargetablePairs => {
                    Some(self.number_of_targetable_pairs.clone())
                }
            }
        } else {
            None
        }
    }

    #[inline(always)]
    fn set_value(&mut self, key: Box<dyn Any>, value: Value) -> Result<(), String> {
        if let Ok(key) = key.downcast::<GeneTargetabilityValue>() {
            match *key {
                GeneTargetabilityValue::IsTargetable => {
                    self.is_targetable = value;
                    Ok(())
                }
                GeneTargetabilityValue::TargetableEnzymes => {
                    self.targetable_enzymes = value;
                    Ok(())
                }
                GeneTargetabilityValue::NumberOfHetSites => {
                    self.number_of_het_sites = value;
                    Ok(())
                }
                GeneTargetabilityValue::NumberOfEligibleSites => {
                    self.number_of_eligible_sites = value;
                    Ok(())
                }
                GeneTargetabilityValue::NumberOfHap1Sites => {
                    self.number_of_hap1_sites = value;
                    Ok(())
                }
                GeneTargetabilityValue::NumberOfHap2Sites => {
                    self.number_of_hap2_sites = value;
                    Ok(())
                }
                GeneTargetabilityValue::Gene => {
                    self.gene = value;
                    Ok(())
                }
                GeneTargetabilityValue::Chrom => {
                    self.chrom = value;
                    Ok(())
                }
                GeneTargetabilityValue::CanonicalTranscript => {
                    self.canonical_transcript = value;
                    Ok(())
                }
                GeneTargetabilityValue::NumberOfCodingExons => {
                    self.number_of_coding_exons = value;
                    Ok(())
                }
                GeneTargetabilityValue::NumberOfTargetablePairs => {
                    self.number_of_targetable_pairs = value;
                    Ok(())
                }
            }
        } else {
            let err = format!("ERROR: You have tried to set a value for an unknown key!");
            log::error!("{}", err);
            Err(err)
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for GeneTargetabilityDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{
            is_targetable: {:?},
            targetable_enzymes: {:?},
            number_of_het_sites: {:?},
            number_of_eligible_sites: {:?},
            number_of_hap1_sites: {:?},
            number_of_hap2_sites: {:?},
            gene: {:?},
            chrom: {:?},
            canonical_transcript: {:?},
            number_of_coding_exons: {:?},
            number_of_targetable_pairs: {:?}
            }}",
            self.is_targetable,
            self.targetable_enzymes,
            self.number_of_het_sites,
            self.number_of_eligible_sites,
            self.number_of_hap1_sites,
            self.number_of_hap2_sites,
            self.gene,
            self.chrom,
            self.canonical_transcript,
            self.number_of_coding_exons,
            self.number_of_targetable_pairs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_set_get_roundtrip() {
        let mut descriptor = ModuleDescriptor::with_schema(ModuleType::GeneTargetability);

        descriptor
            .set_value(
                Box::new(GeneTargetabilityValue::IsTargetable),
                Value::Bool(true),
            )
            .unwrap();

        let value = descriptor
            .get_value(Box::new(GeneTargetabilityValue::IsTargetable))
            .unwrap();

        assert_eq!(value, Value::Bool(true));
    }

    #[test]
    fn test_descriptor_rejects_unknown_key() {
        let mut descriptor = ModuleDescriptor::with_schema(ModuleType::GeneTargetability);

        let err = descriptor.set_value(Box::new("not a key"), Value::Null);
        assert!(err.is_err());
    }
}
