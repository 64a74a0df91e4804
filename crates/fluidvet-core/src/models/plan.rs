//! Plan configuration and result models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::patient::{PatientInput, Species};

/// Formula used for the daily maintenance volume.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceMethod {
    /// 60 mL/kg/day (canine) or 40 mL/kg/day (feline)
    #[default]
    LinearPerKg,
    /// 132 × BW^0.75 (canine) or 80 × BW^0.75 (feline)
    MetabolicPower,
    /// 30 × BW + 70, species independent
    LinearOffset,
}

impl MaintenanceMethod {
    pub fn describe(&self) -> &'static str {
        match self {
            MaintenanceMethod::LinearPerKg => "60 mL/kg/day (dog) / 40 mL/kg/day (cat)",
            MaintenanceMethod::MetabolicPower => "132 x BW^0.75 (dog) / 80 x BW^0.75 (cat)",
            MaintenanceMethod::LinearOffset => "30 x BW + 70 (mL/day)",
        }
    }
}

/// Shock resuscitation bolus settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResuscitationConfig {
    /// Volume per bolus (1-50 mL/kg)
    pub bolus_ml_per_kg: f64,
    /// Number of boluses (1-5)
    pub bolus_repeats: u32,
    /// Duration of each bolus (1-60 min)
    pub bolus_duration_min: f64,
}

impl ResuscitationConfig {
    /// Usual starting bolus for the species: 20 mL/kg dog, 10 mL/kg cat, one bolus over 15 min.
    pub fn for_species(species: Species) -> Self {
        let bolus_ml_per_kg = match species {
            Species::Canine => 20.0,
            Species::Feline => 10.0,
        };
        Self {
            bolus_ml_per_kg,
            bolus_repeats: 1,
            bolus_duration_min: 15.0,
        }
    }
}

/// Drops delivered per mL by the administration set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum DropFactor {
    /// Macro-drip set, 10 gtt/mL
    Macro10,
    /// Macro-drip set, 20 gtt/mL
    #[default]
    Macro20,
    /// Micro-drip set, 60 gtt/mL
    Micro60,
}

impl DropFactor {
    pub fn drops_per_ml(&self) -> u32 {
        match self {
            DropFactor::Macro10 => 10,
            DropFactor::Macro20 => 20,
            DropFactor::Micro60 => 60,
        }
    }
}

impl TryFrom<u32> for DropFactor {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(DropFactor::Macro10),
            20 => Ok(DropFactor::Macro20),
            60 => Ok(DropFactor::Micro60),
            other => Err(format!("unsupported drop factor {} (expected 10, 20 or 60)", other)),
        }
    }
}

impl From<DropFactor> for u32 {
    fn from(factor: DropFactor) -> Self {
        factor.drops_per_ml()
    }
}

impl fmt::Display for DropFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} gtt/mL", self.drops_per_ml())
    }
}

/// Administration set configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DripConfig {
    pub drop_factor: DropFactor,
}

/// Administration windows for maintenance and rehydration plans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TherapyPeriods {
    /// Period over which the daily maintenance volume is given (1-48 h)
    pub maintenance_period_hours: f64,
    /// Time allowed to correct the deficit (6-48 h)
    pub rehydration_hours: f64,
}

impl Default for TherapyPeriods {
    fn default() -> Self {
        Self {
            maintenance_period_hours: 24.0,
            rehydration_hours: 24.0,
        }
    }
}

/// Everything needed to compute one plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanRequest {
    pub patient: PatientInput,
    #[serde(default)]
    pub method: MaintenanceMethod,
    pub resuscitation: ResuscitationConfig,
    #[serde(default)]
    pub drip: DripConfig,
    #[serde(default)]
    pub periods: TherapyPeriods,
}

impl PlanRequest {
    /// Request with species defaults for every setting except the patient.
    pub fn new(patient: PatientInput) -> Self {
        let resuscitation = ResuscitationConfig::for_species(patient.species);
        Self {
            patient,
            method: MaintenanceMethod::default(),
            resuscitation,
            drip: DripConfig::default(),
            periods: TherapyPeriods::default(),
        }
    }
}

/// Infusion rates derived from a volume per hour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateSet {
    pub ml_per_hr: f64,
    pub ml_per_min: f64,
    pub ml_per_kg_per_hr: f64,
    pub ml_per_kg_per_day: f64,
    pub drops_per_min: f64,
    /// None when there is no flow
    pub seconds_per_drop: Option<f64>,
}

/// Result of a plan computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanResult {
    /// Daily maintenance requirement, after any pediatric multiplier
    pub maintenance_ml_day: f64,
    /// Dehydration deficit
    pub deficit_ml: f64,
    /// Volume from the clinical-state table, before ongoing losses
    pub base_ml: f64,
    /// Administration period for the plan
    pub base_period_hours: f64,
    /// Base volume plus ongoing losses
    pub total_volume_ml: f64,
    #[serde(flatten)]
    pub rates: RateSet,
}

/// Informational clinical warning. Never alters a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClinicalWarning {
    /// Maintenance/rehydration rate above the species' expected range
    RateAboveExpected { ml_per_kg_per_hr: f64, threshold: f64 },
    /// Bolus given over more than 30 minutes
    SlowBolus { bolus_duration_min: f64 },
    /// Bolus volume above 30 mL/kg
    LargeBolus { bolus_ml_per_kg: f64 },
    /// Drip faster than one drop every 0.2 s
    RapidDrip { seconds_per_drop: f64 },
}

impl fmt::Display for ClinicalWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClinicalWarning::RateAboveExpected { ml_per_kg_per_hr, .. } => write!(
                f,
                "Caution: calculated rate (~{:.2} mL/kg/h) exceeds the expected range for maintenance/rehydration.",
                ml_per_kg_per_hr
            ),
            ClinicalWarning::SlowBolus { .. } => {
                write!(f, "Shock boluses are normally given rapidly (e.g. over 15 min).")
            }
            ClinicalWarning::LargeBolus { .. } => write!(
                f,
                "Boluses above 30 mL/kg are unusual; review the indication and monitor closely."
            ),
            ClinicalWarning::RapidDrip { .. } => write!(
                f,
                "Extremely fast drip (<0.2 s/drop). Check the set or use a micro-drip set or pump."
            ),
        }
    }
}
