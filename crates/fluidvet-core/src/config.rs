//! Default plan settings, optionally loaded from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    DripConfig, DropFactor, MaintenanceMethod, PatientInput, PlanRequest, ResuscitationConfig,
    Species, TherapyPeriods,
};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings used when a caller does not supply them. Missing keys take the
/// built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineDefaults {
    pub method: MaintenanceMethod,
    pub maintenance_period_hours: f64,
    pub rehydration_hours: f64,
    pub drop_factor: DropFactor,
    pub canine_bolus_ml_per_kg: f64,
    pub feline_bolus_ml_per_kg: f64,
    pub bolus_repeats: u32,
    pub bolus_duration_min: f64,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        let periods = TherapyPeriods::default();
        let canine = ResuscitationConfig::for_species(Species::Canine);
        let feline = ResuscitationConfig::for_species(Species::Feline);
        Self {
            method: MaintenanceMethod::default(),
            maintenance_period_hours: periods.maintenance_period_hours,
            rehydration_hours: periods.rehydration_hours,
            drop_factor: DropFactor::default(),
            canine_bolus_ml_per_kg: canine.bolus_ml_per_kg,
            feline_bolus_ml_per_kg: feline.bolus_ml_per_kg,
            bolus_repeats: canine.bolus_repeats,
            bolus_duration_min: canine.bolus_duration_min,
        }
    }
}

impl EngineDefaults {
    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default bolus settings for a species.
    pub fn resuscitation(&self, species: Species) -> ResuscitationConfig {
        let bolus_ml_per_kg = match species {
            Species::Canine => self.canine_bolus_ml_per_kg,
            Species::Feline => self.feline_bolus_ml_per_kg,
        };
        ResuscitationConfig {
            bolus_ml_per_kg,
            bolus_repeats: self.bolus_repeats,
            bolus_duration_min: self.bolus_duration_min,
        }
    }

    pub fn periods(&self) -> TherapyPeriods {
        TherapyPeriods {
            maintenance_period_hours: self.maintenance_period_hours,
            rehydration_hours: self.rehydration_hours,
        }
    }

    pub fn drip(&self) -> DripConfig {
        DripConfig {
            drop_factor: self.drop_factor,
        }
    }

    /// Build a request for a patient using these defaults.
    pub fn request(&self, patient: PatientInput) -> PlanRequest {
        let resuscitation = self.resuscitation(patient.species);
        PlanRequest {
            patient,
            method: self.method,
            resuscitation,
            drip: self.drip(),
            periods: self.periods(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClinicalState;
    use std::io::Write;

    #[test]
    fn test_defaults_match_species_request() {
        let defaults = EngineDefaults::default();
        let patient = PatientInput::new(Species::Feline, 4.0, ClinicalState::Shock);

        assert_eq!(defaults.request(patient.clone()), PlanRequest::new(patient));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let defaults =
            EngineDefaults::from_json(r#"{"drop_factor": 60, "method": "metabolic_power"}"#)
                .unwrap();

        assert_eq!(defaults.drop_factor, DropFactor::Micro60);
        assert_eq!(defaults.method, MaintenanceMethod::MetabolicPower);
        assert_eq!(defaults.maintenance_period_hours, 24.0);
        assert_eq!(defaults.canine_bolus_ml_per_kg, 20.0);
    }

    #[test]
    fn test_invalid_drop_factor_rejected() {
        let result = EngineDefaults::from_json(r#"{"drop_factor": 15}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rehydration_hours": 12, "feline_bolus_ml_per_kg": 5}}"#).unwrap();

        let defaults = EngineDefaults::load(file.path()).unwrap();
        assert_eq!(defaults.rehydration_hours, 12.0);
        assert_eq!(defaults.resuscitation(Species::Feline).bolus_ml_per_kg, 5.0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = EngineDefaults::load("/nonexistent/fluidvet.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
