//! Fluid plan calculator.
//!
//! Pipeline: Maintenance → Deficit → Base volume/period (by clinical state) → Losses → Rates

mod maintenance;
mod rates;
mod warnings;

pub use maintenance::*;
pub use rates::*;
pub use warnings::*;

use thiserror::Error;
use tracing::debug;

use crate::models::{
    ClinicalState, ClinicalWarning, DripConfig, MaintenanceMethod, PatientInput, PlanRequest,
    PlanResult, ResuscitationConfig, TherapyPeriods,
};

/// Hours per day, for prorating maintenance over the rehydration window.
const HOURS_PER_DAY: f64 = 24.0;

/// Invalid input errors. The computation is aborted and nothing is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid input: weight must be greater than 0 kg (got {0})")]
    NonPositiveWeight(f64),

    #[error("Invalid input: rehydration time must be greater than 0 hours (got {0})")]
    NonPositiveRehydration(f64),

    #[error("Invalid input: administration period must be greater than 0 hours (got {0})")]
    NonPositivePeriod(f64),

    #[error("Invalid input: {field} must be a finite number (got {value})")]
    NonFinite { field: &'static str, value: f64 },
}

pub type CalcResult<T> = Result<T, CalcError>;

/// True for finite values strictly above zero. Rejects NaN.
pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Reject NaN and infinities, which cannot be exported as JSON numbers.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> CalcResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::NonFinite { field, value })
    }
}

/// Compute a fluid therapy plan.
///
/// The base volume and administration period depend on the clinical state:
///
/// | State | base volume | period |
/// |---|---|---|
/// | Maintenance | maintenance/day | maintenance period |
/// | Rehydration | maintenance prorated to the window + deficit | rehydration window |
/// | Shock | bolus × weight × repeats | bolus duration × repeats |
pub fn compute_plan(
    input: &PatientInput,
    method: MaintenanceMethod,
    resus: &ResuscitationConfig,
    drip: DripConfig,
    periods: &TherapyPeriods,
) -> CalcResult<PlanResult> {
    let weight_kg = input.weight_kg;
    if !is_positive(weight_kg) {
        return Err(CalcError::NonPositiveWeight(weight_kg));
    }
    ensure_finite("dehydration_pct", input.dehydration_pct)?;
    ensure_finite("sensible_loss_ml_day", input.sensible_loss_ml_day)?;
    ensure_finite("insensible_loss_ml_day", input.insensible_loss_ml_day)?;
    ensure_finite("bolus_ml_per_kg", resus.bolus_ml_per_kg)?;
    ensure_finite("bolus_duration_min", resus.bolus_duration_min)?;
    ensure_finite("maintenance_period_hours", periods.maintenance_period_hours)?;
    ensure_finite("rehydration_hours", periods.rehydration_hours)?;

    let maintenance_ml_day =
        maintenance_ml_day(input.species, weight_kg, method, input.patient_type());
    let deficit_ml = deficit_ml(weight_kg, input.dehydration_pct);

    let (base_ml, base_period_hours) = match input.clinical_state {
        ClinicalState::Maintenance => (maintenance_ml_day, periods.maintenance_period_hours),
        ClinicalState::Rehydration => {
            let hours = periods.rehydration_hours;
            if !is_positive(hours) {
                return Err(CalcError::NonPositiveRehydration(hours));
            }
            (maintenance_ml_day * (hours / HOURS_PER_DAY) + deficit_ml, hours)
        }
        ClinicalState::Shock => {
            let repeats = f64::from(resus.bolus_repeats);
            (
                resus.bolus_ml_per_kg * weight_kg * repeats,
                (resus.bolus_duration_min / 60.0) * repeats,
            )
        }
    };

    if !is_positive(base_period_hours) {
        return Err(CalcError::NonPositivePeriod(base_period_hours));
    }

    let total_volume_ml = base_ml + input.ongoing_losses_ml();
    let rates = derive_rates(total_volume_ml / base_period_hours, weight_kg, drip.drop_factor);

    debug!(
        species = %input.species,
        state = %input.clinical_state,
        ?method,
        maintenance_ml_day,
        total_volume_ml,
        ml_per_hr = rates.ml_per_hr,
        "Computed fluid plan"
    );

    Ok(PlanResult {
        maintenance_ml_day,
        deficit_ml,
        base_ml,
        base_period_hours,
        total_volume_ml,
        rates,
    })
}

impl PlanRequest {
    /// Compute the plan for this request.
    pub fn compute(&self) -> CalcResult<PlanResult> {
        compute_plan(
            &self.patient,
            self.method,
            &self.resuscitation,
            self.drip,
            &self.periods,
        )
    }

    /// Clinical warnings for a plan computed from this request.
    pub fn warnings(&self, plan: &PlanResult) -> Vec<ClinicalWarning> {
        plan_warnings(&self.patient, &self.resuscitation, plan)
    }
}
