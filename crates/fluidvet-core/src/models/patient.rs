//! Patient models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Patient species. Formulas and thresholds are species-dependent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Canine,
    Feline,
}

impl Species {
    /// Canonical lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Canine => "canine",
            Species::Feline => "feline",
        }
    }

    /// Multiplier applied to the adult maintenance figure for pediatric patients.
    pub fn pediatric_multiplier(&self) -> f64 {
        match self {
            Species::Canine => 3.0,
            Species::Feline => 2.5,
        }
    }

    /// Upper bound of the expected maintenance/rehydration rate (mL/kg/h).
    pub fn max_expected_rate_ml_kg_hr(&self) -> f64 {
        match self {
            Species::Canine => 5.0,
            Species::Feline => 4.0,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age class of the patient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PatientType {
    #[default]
    Adult,
    Pediatric,
}

/// Clinical state driving the choice of base volume and administration period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalState {
    /// Daily maintenance only
    Maintenance,
    /// Maintenance for the rehydration window plus the dehydration deficit
    Rehydration,
    /// Shock resuscitation with repeated boluses
    Shock,
}

impl ClinicalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicalState::Maintenance => "maintenance",
            ClinicalState::Rehydration => "rehydration",
            ClinicalState::Shock => "shock",
        }
    }
}

impl fmt::Display for ClinicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical inputs for one plan computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientInput {
    /// Species
    pub species: Species,
    /// Adult when absent
    #[serde(default)]
    pub patient_type: Option<PatientType>,
    /// Body weight in kg (must be > 0)
    pub weight_kg: f64,
    /// Clinical state
    pub clinical_state: ClinicalState,
    /// Estimated dehydration (0-30 %)
    #[serde(default)]
    pub dehydration_pct: f64,
    /// Ongoing sensible losses, e.g. vomiting/diarrhea (mL/day)
    #[serde(default)]
    pub sensible_loss_ml_day: f64,
    /// Ongoing insensible losses, e.g. respiration/fever (mL/day)
    #[serde(default)]
    pub insensible_loss_ml_day: f64,
}

impl PatientInput {
    /// Create an input with no dehydration and no ongoing losses.
    pub fn new(species: Species, weight_kg: f64, clinical_state: ClinicalState) -> Self {
        Self {
            species,
            patient_type: None,
            weight_kg,
            clinical_state,
            dehydration_pct: 0.0,
            sensible_loss_ml_day: 0.0,
            insensible_loss_ml_day: 0.0,
        }
    }

    /// Resolved patient type (absent means adult).
    pub fn patient_type(&self) -> PatientType {
        self.patient_type.unwrap_or_default()
    }

    /// Sum of sensible and insensible losses.
    pub fn ongoing_losses_ml(&self) -> f64 {
        self.sensible_loss_ml_day + self.insensible_loss_ml_day
    }
}
