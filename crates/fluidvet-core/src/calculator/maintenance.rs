//! Maintenance and deficit volume formulas.

use crate::models::{MaintenanceMethod, PatientType, Species};

/// Exponent of the metabolic body weight formula.
const METABOLIC_EXPONENT: f64 = 0.75;

/// Daily maintenance volume (mL/day) for an adult patient.
pub fn adult_maintenance_ml_day(species: Species, weight_kg: f64, method: MaintenanceMethod) -> f64 {
    match method {
        MaintenanceMethod::LinearPerKg => match species {
            Species::Canine => 60.0 * weight_kg,
            Species::Feline => 40.0 * weight_kg,
        },
        MaintenanceMethod::MetabolicPower => {
            let metabolic_weight = weight_kg.powf(METABOLIC_EXPONENT);
            match species {
                Species::Canine => 132.0 * metabolic_weight,
                Species::Feline => 80.0 * metabolic_weight,
            }
        }
        MaintenanceMethod::LinearOffset => 30.0 * weight_kg + 70.0,
    }
}

/// Daily maintenance volume (mL/day), with the pediatric multiplier applied once.
pub fn maintenance_ml_day(
    species: Species,
    weight_kg: f64,
    method: MaintenanceMethod,
    patient_type: PatientType,
) -> f64 {
    let adult = adult_maintenance_ml_day(species, weight_kg, method);
    match patient_type {
        PatientType::Adult => adult,
        PatientType::Pediatric => adult * species.pediatric_multiplier(),
    }
}

/// Fluid deficit (mL) for a given dehydration percentage.
pub fn deficit_ml(weight_kg: f64, dehydration_pct: f64) -> f64 {
    (dehydration_pct / 100.0) * weight_kg * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_per_kg() {
        assert_eq!(
            adult_maintenance_ml_day(Species::Canine, 10.0, MaintenanceMethod::LinearPerKg),
            600.0
        );
        assert_eq!(
            adult_maintenance_ml_day(Species::Feline, 4.0, MaintenanceMethod::LinearPerKg),
            160.0
        );
    }

    #[test]
    fn test_metabolic_power() {
        // 16^0.75 = 8
        let dog = adult_maintenance_ml_day(Species::Canine, 16.0, MaintenanceMethod::MetabolicPower);
        let cat = adult_maintenance_ml_day(Species::Feline, 16.0, MaintenanceMethod::MetabolicPower);
        assert!((dog - 1056.0).abs() < 1e-9);
        assert!((cat - 640.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_offset_ignores_species() {
        let dog = adult_maintenance_ml_day(Species::Canine, 10.0, MaintenanceMethod::LinearOffset);
        let cat = adult_maintenance_ml_day(Species::Feline, 10.0, MaintenanceMethod::LinearOffset);
        assert_eq!(dog, 370.0);
        assert_eq!(dog, cat);
    }

    #[test]
    fn test_pediatric_applied_once() {
        let adult = maintenance_ml_day(
            Species::Feline,
            2.0,
            MaintenanceMethod::LinearOffset,
            PatientType::Adult,
        );
        let pediatric = maintenance_ml_day(
            Species::Feline,
            2.0,
            MaintenanceMethod::LinearOffset,
            PatientType::Pediatric,
        );
        assert_eq!(adult, 130.0);
        assert_eq!(pediatric, 325.0);
    }

    #[test]
    fn test_deficit() {
        assert_eq!(deficit_ml(10.0, 8.0), 800.0);
        assert_eq!(deficit_ml(10.0, 0.0), 0.0);
    }
}
