//! Informational clinical warnings for a computed plan.

use tracing::warn;

use crate::models::{ClinicalState, ClinicalWarning, PatientInput, PlanResult, ResuscitationConfig};

/// Boluses slower than this are flagged (min).
const MAX_BOLUS_DURATION_MIN: f64 = 30.0;

/// Boluses larger than this are flagged (mL/kg).
const MAX_BOLUS_ML_PER_KG: f64 = 30.0;

/// Drops closer together than this cannot be counted reliably (s).
const MIN_SECONDS_PER_DROP: f64 = 0.2;

/// Collect clinical warnings for a plan. The plan itself is not modified.
pub fn plan_warnings(
    input: &PatientInput,
    resus: &ResuscitationConfig,
    plan: &PlanResult,
) -> Vec<ClinicalWarning> {
    let mut warnings = Vec::new();

    if input.clinical_state == ClinicalState::Shock {
        if resus.bolus_duration_min > MAX_BOLUS_DURATION_MIN {
            warnings.push(ClinicalWarning::SlowBolus {
                bolus_duration_min: resus.bolus_duration_min,
            });
        }
        if resus.bolus_ml_per_kg > MAX_BOLUS_ML_PER_KG {
            warnings.push(ClinicalWarning::LargeBolus {
                bolus_ml_per_kg: resus.bolus_ml_per_kg,
            });
        }
    } else {
        let threshold = input.species.max_expected_rate_ml_kg_hr();
        if plan.rates.ml_per_kg_per_hr > threshold {
            warnings.push(ClinicalWarning::RateAboveExpected {
                ml_per_kg_per_hr: plan.rates.ml_per_kg_per_hr,
                threshold,
            });
        }
    }

    if let Some(seconds_per_drop) = plan.rates.seconds_per_drop {
        if seconds_per_drop < MIN_SECONDS_PER_DROP {
            warnings.push(ClinicalWarning::RapidDrip { seconds_per_drop });
        }
    }

    for warning in &warnings {
        warn!(species = %input.species, state = %input.clinical_state, "{}", warning);
    }

    warnings
}
