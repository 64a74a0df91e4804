//! Clinical label normalizer.
//!
//! Handles:
//! - Species aliases (dog/perro/canino → canine)
//! - Clinical state aliases (replacement/reposición → rehydration)
//! - Maintenance method and drip set labels (132 → metabolic, micro → 60 gtt/mL)
//! - Mucous membrane colours (pálidas → pale)
//!
//! Exact alias lookup first, then fuzzy matching for typos.

use std::collections::HashMap;

use strsim::{jaro_winkler, normalized_levenshtein};
use thiserror::Error;

use crate::models::{ClinicalState, DropFactor, MaintenanceMethod, MucousMembrane, PatientType, Species};

/// Minimum fuzzy similarity to accept a near-miss label.
const MIN_FUZZY_SIMILARITY: f64 = 0.85;

/// Normalizer errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Unrecognized {kind}: {label}")]
    Unrecognized { kind: &'static str, label: String },
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Alias table for one label kind.
struct AliasTable<T> {
    kind: &'static str,
    aliases: HashMap<String, T>,
}

impl<T: Copy> AliasTable<T> {
    fn new(kind: &'static str, entries: &[(&str, T)]) -> Self {
        let aliases = entries
            .iter()
            .map(|(alias, value)| (canonical_key(alias), *value))
            .collect();
        Self { kind, aliases }
    }

    fn resolve(&self, label: &str) -> NormalizeResult<T> {
        let key = canonical_key(label);
        if let Some(value) = self.aliases.get(&key) {
            return Ok(*value);
        }

        self.aliases
            .iter()
            .map(|(alias, value)| (fuzzy_match(&key, alias), *value))
            .filter(|(score, _)| *score >= MIN_FUZZY_SIMILARITY)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, value)| value)
            .ok_or_else(|| NormalizeError::Unrecognized {
                kind: self.kind,
                label: label.to_string(),
            })
    }
}

/// Normalizer for free-text clinical labels.
pub struct LabelNormalizer {
    species: AliasTable<Species>,
    patient_types: AliasTable<PatientType>,
    states: AliasTable<ClinicalState>,
    methods: AliasTable<MaintenanceMethod>,
    drip_sets: AliasTable<DropFactor>,
    membranes: AliasTable<MucousMembrane>,
}

impl Default for LabelNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelNormalizer {
    /// Create a normalizer with the default English/Spanish mappings.
    pub fn new() -> Self {
        Self {
            species: AliasTable::new(
                "species",
                &[
                    ("canine", Species::Canine),
                    ("dog", Species::Canine),
                    ("k9", Species::Canine),
                    ("canino", Species::Canine),
                    ("perro", Species::Canine),
                    ("feline", Species::Feline),
                    ("cat", Species::Feline),
                    ("felino", Species::Feline),
                    ("gato", Species::Feline),
                ],
            ),
            patient_types: AliasTable::new(
                "patient type",
                &[
                    ("adult", PatientType::Adult),
                    ("adulto", PatientType::Adult),
                    ("pediatric", PatientType::Pediatric),
                    ("paediatric", PatientType::Pediatric),
                    ("puppy", PatientType::Pediatric),
                    ("kitten", PatientType::Pediatric),
                    ("pediatrico", PatientType::Pediatric),
                    ("cachorro", PatientType::Pediatric),
                ],
            ),
            states: AliasTable::new(
                "clinical state",
                &[
                    ("maintenance", ClinicalState::Maintenance),
                    ("mantenimiento", ClinicalState::Maintenance),
                    ("rehydration", ClinicalState::Rehydration),
                    ("replacement", ClinicalState::Rehydration),
                    ("rehidratacion", ClinicalState::Rehydration),
                    ("reposicion", ClinicalState::Rehydration),
                    ("shock", ClinicalState::Shock),
                    ("resuscitation", ClinicalState::Shock),
                    ("resucitacion", ClinicalState::Shock),
                ],
            ),
            methods: AliasTable::new(
                "maintenance method",
                &[
                    ("linear-per-kg", MaintenanceMethod::LinearPerKg),
                    ("linear", MaintenanceMethod::LinearPerKg),
                    ("60/40", MaintenanceMethod::LinearPerKg),
                    ("60 ml/kg", MaintenanceMethod::LinearPerKg),
                    ("metabolic-power", MaintenanceMethod::MetabolicPower),
                    ("metabolic", MaintenanceMethod::MetabolicPower),
                    ("132", MaintenanceMethod::MetabolicPower),
                    ("bw^0.75", MaintenanceMethod::MetabolicPower),
                    ("linear-offset", MaintenanceMethod::LinearOffset),
                    ("offset", MaintenanceMethod::LinearOffset),
                    ("30bw+70", MaintenanceMethod::LinearOffset),
                    ("30 x bw + 70", MaintenanceMethod::LinearOffset),
                ],
            ),
            drip_sets: AliasTable::new(
                "drip set",
                &[
                    ("10", DropFactor::Macro10),
                    ("macro10", DropFactor::Macro10),
                    ("10 gtt/ml", DropFactor::Macro10),
                    ("20", DropFactor::Macro20),
                    ("macro", DropFactor::Macro20),
                    ("macro20", DropFactor::Macro20),
                    ("macrogoteo", DropFactor::Macro20),
                    ("20 gtt/ml", DropFactor::Macro20),
                    ("60", DropFactor::Micro60),
                    ("micro", DropFactor::Micro60),
                    ("micro60", DropFactor::Micro60),
                    ("microgoteo", DropFactor::Micro60),
                    ("60 gtt/ml", DropFactor::Micro60),
                ],
            ),
            membranes: AliasTable::new(
                "mucous membrane colour",
                &[
                    ("pink", MucousMembrane::Pink),
                    ("normal", MucousMembrane::Pink),
                    ("rosadas", MucousMembrane::Pink),
                    ("pale", MucousMembrane::Pale),
                    ("white", MucousMembrane::Pale),
                    ("palidas", MucousMembrane::Pale),
                    ("cyanotic", MucousMembrane::Cyanotic),
                    ("blue", MucousMembrane::Cyanotic),
                    ("cianoticas", MucousMembrane::Cyanotic),
                    ("injected", MucousMembrane::Injected),
                    ("hyperemic", MucousMembrane::Injected),
                    ("congestivas", MucousMembrane::Injected),
                    ("icteric", MucousMembrane::Icteric),
                    ("jaundiced", MucousMembrane::Icteric),
                    ("ictericas", MucousMembrane::Icteric),
                ],
            ),
        }
    }

    pub fn species(&self, label: &str) -> NormalizeResult<Species> {
        self.species.resolve(label)
    }

    pub fn patient_type(&self, label: &str) -> NormalizeResult<PatientType> {
        self.patient_types.resolve(label)
    }

    pub fn clinical_state(&self, label: &str) -> NormalizeResult<ClinicalState> {
        self.states.resolve(label)
    }

    pub fn maintenance_method(&self, label: &str) -> NormalizeResult<MaintenanceMethod> {
        self.methods.resolve(label)
    }

    pub fn drop_factor(&self, label: &str) -> NormalizeResult<DropFactor> {
        self.drip_sets.resolve(label)
    }

    pub fn mucous_membrane(&self, label: &str) -> NormalizeResult<MucousMembrane> {
        self.membranes.resolve(label)
    }
}

/// Lowercase, strip Spanish accents, map `_` to `-` and collapse whitespace.
fn canonical_key(label: &str) -> String {
    let folded: String = label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            '_' => '-',
            other => other,
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);

    jw * 0.6 + lev * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_aliases() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(normalizer.species("Dog"), Ok(Species::Canine));
        assert_eq!(normalizer.species("canino"), Ok(Species::Canine));
        assert_eq!(normalizer.species("GATO"), Ok(Species::Feline));
        assert_eq!(normalizer.species(" feline "), Ok(Species::Feline));
    }

    #[test]
    fn test_accented_state_labels() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(
            normalizer.clinical_state("Reposición"),
            Ok(ClinicalState::Rehydration)
        );
        assert_eq!(
            normalizer.clinical_state("resucitación"),
            Ok(ClinicalState::Shock)
        );
    }

    #[test]
    fn test_fuzzy_typo() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(
            normalizer.clinical_state("maintenence"),
            Ok(ClinicalState::Maintenance)
        );
        assert_eq!(
            normalizer.clinical_state("rehydratoin"),
            Ok(ClinicalState::Rehydration)
        );
    }

    #[test]
    fn test_unrelated_label_rejected() {
        let normalizer = LabelNormalizer::new();
        let err = normalizer.species("equine").unwrap_err();
        assert_eq!(
            err,
            NormalizeError::Unrecognized {
                kind: "species",
                label: "equine".into()
            }
        );
    }

    #[test]
    fn test_methods_and_drip_sets() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(
            normalizer.maintenance_method("132"),
            Ok(MaintenanceMethod::MetabolicPower)
        );
        assert_eq!(
            normalizer.maintenance_method("linear_offset"),
            Ok(MaintenanceMethod::LinearOffset)
        );
        assert_eq!(normalizer.drop_factor("micro"), Ok(DropFactor::Micro60));
        assert_eq!(normalizer.drop_factor("10"), Ok(DropFactor::Macro10));
    }

    #[test]
    fn test_mucous_membrane() {
        let normalizer = LabelNormalizer::new();
        assert_eq!(
            normalizer.mucous_membrane("Pálidas"),
            Ok(MucousMembrane::Pale)
        );
        assert_eq!(
            normalizer.mucous_membrane("pink"),
            Ok(MucousMembrane::Pink)
        );
    }
}
