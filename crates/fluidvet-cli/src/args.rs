//! Command-line inputs and their range checks.

use anyhow::{ensure, Result};
use clap::Args;

use fluidvet_core::models::{PatientInput, PlanRequest, VitalSigns};
use fluidvet_core::{EngineDefaults, LabelNormalizer};

/// Patient and plan settings. Unset settings come from the defaults file.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Species (e.g. "canine", "dog", "perro", "feline", "gato")
    #[arg(long)]
    pub species: String,

    /// Body weight in kg
    #[arg(long)]
    pub weight: f64,

    /// Clinical state: maintenance, rehydration or shock
    #[arg(long, default_value = "maintenance")]
    pub state: String,

    /// Patient type: adult or pediatric
    #[arg(long)]
    pub patient_type: Option<String>,

    /// Dehydration percentage (0-30)
    #[arg(long, default_value_t = 0.0)]
    pub dehydration: f64,

    /// Ongoing sensible losses (mL/day)
    #[arg(long, default_value_t = 0.0)]
    pub sensible_loss: f64,

    /// Ongoing insensible losses (mL/day)
    #[arg(long, default_value_t = 0.0)]
    pub insensible_loss: f64,

    /// Maintenance method: linear-per-kg, metabolic-power or linear-offset
    #[arg(long)]
    pub method: Option<String>,

    /// Drip set drop factor: 10, 20 or 60
    #[arg(long)]
    pub drop_factor: Option<String>,

    /// Bolus volume (mL/kg)
    #[arg(long)]
    pub bolus: Option<f64>,

    /// Number of boluses
    #[arg(long)]
    pub bolus_repeats: Option<u32>,

    /// Minutes per bolus
    #[arg(long)]
    pub bolus_duration: Option<f64>,

    /// Maintenance administration period (h)
    #[arg(long)]
    pub maintenance_hours: Option<f64>,

    /// Rehydration window (h)
    #[arg(long)]
    pub rehydration_hours: Option<f64>,
}

impl PlanArgs {
    /// Build a checked plan request on top of the configured defaults.
    pub fn to_request(
        &self,
        defaults: &EngineDefaults,
        normalizer: &LabelNormalizer,
    ) -> Result<PlanRequest> {
        let mut patient = PatientInput::new(
            normalizer.species(&self.species)?,
            self.weight,
            normalizer.clinical_state(&self.state)?,
        );
        patient.patient_type = self
            .patient_type
            .as_deref()
            .map(|label| normalizer.patient_type(label))
            .transpose()?;
        patient.dehydration_pct = self.dehydration;
        patient.sensible_loss_ml_day = self.sensible_loss;
        patient.insensible_loss_ml_day = self.insensible_loss;

        let mut request = defaults.request(patient);
        if let Some(method) = &self.method {
            request.method = normalizer.maintenance_method(method)?;
        }
        if let Some(drop_factor) = &self.drop_factor {
            request.drip.drop_factor = normalizer.drop_factor(drop_factor)?;
        }
        if let Some(bolus) = self.bolus {
            request.resuscitation.bolus_ml_per_kg = bolus;
        }
        if let Some(repeats) = self.bolus_repeats {
            request.resuscitation.bolus_repeats = repeats;
        }
        if let Some(duration) = self.bolus_duration {
            request.resuscitation.bolus_duration_min = duration;
        }
        if let Some(hours) = self.maintenance_hours {
            request.periods.maintenance_period_hours = hours;
        }
        if let Some(hours) = self.rehydration_hours {
            request.periods.rehydration_hours = hours;
        }

        check_request(&request)?;
        Ok(request)
    }
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

/// Clinical input ranges accepted at the command line.
fn check_request(request: &PlanRequest) -> Result<()> {
    let patient = &request.patient;
    let resus = &request.resuscitation;
    let periods = &request.periods;

    ensure!(
        patient.weight_kg.is_finite() && patient.weight_kg > 0.0,
        "weight must be greater than 0 kg (got {})",
        patient.weight_kg
    );
    ensure!(
        in_range(patient.dehydration_pct, 0.0, 30.0),
        "dehydration must be between 0 and 30% (got {})",
        patient.dehydration_pct
    );
    ensure!(
        [patient.sensible_loss_ml_day, patient.insensible_loss_ml_day]
            .iter()
            .all(|loss| loss.is_finite() && *loss >= 0.0),
        "ongoing losses must be finite and not negative"
    );
    ensure!(
        in_range(resus.bolus_ml_per_kg, 1.0, 50.0),
        "bolus must be between 1 and 50 mL/kg (got {})",
        resus.bolus_ml_per_kg
    );
    ensure!(
        (1..=5).contains(&resus.bolus_repeats),
        "bolus repeats must be between 1 and 5 (got {})",
        resus.bolus_repeats
    );
    ensure!(
        in_range(resus.bolus_duration_min, 1.0, 60.0),
        "bolus duration must be between 1 and 60 min (got {})",
        resus.bolus_duration_min
    );
    ensure!(
        in_range(periods.maintenance_period_hours, 1.0, 48.0),
        "maintenance period must be between 1 and 48 h (got {})",
        periods.maintenance_period_hours
    );
    ensure!(
        in_range(periods.rehydration_hours, 6.0, 48.0),
        "rehydration window must be between 6 and 48 h (got {})",
        periods.rehydration_hours
    );

    Ok(())
}

/// Follow-up vital signs.
#[derive(Args, Debug, Clone)]
pub struct VitalsArgs {
    /// Urine output (mL/kg/h)
    #[arg(long)]
    pub urine_output: f64,

    /// Heart rate (bpm)
    #[arg(long)]
    pub heart_rate: f64,

    /// Capillary refill time (s)
    #[arg(long)]
    pub crt: f64,

    /// Mucous membrane colour
    #[arg(long, default_value = "pink")]
    pub mucous_membrane: String,

    /// Systolic blood pressure (mmHg)
    #[arg(long)]
    pub systolic_bp: f64,

    /// Current body weight (kg)
    #[arg(long)]
    pub weight: f64,

    /// Hematocrit (%)
    #[arg(long)]
    pub hematocrit: f64,

    /// Creatinine, recorded only
    #[arg(long)]
    pub creatinine: Option<f64>,
}

impl VitalsArgs {
    pub fn to_vitals(&self, normalizer: &LabelNormalizer) -> Result<VitalSigns> {
        ensure!(
            self.weight.is_finite() && self.weight > 0.0,
            "current weight must be greater than 0 kg (got {})",
            self.weight
        );
        ensure!(
            self.urine_output >= 0.0 && self.heart_rate >= 0.0 && self.crt >= 0.0,
            "vital signs cannot be negative"
        );
        ensure!(
            [
                self.urine_output,
                self.heart_rate,
                self.crt,
                self.systolic_bp,
                self.hematocrit,
                self.creatinine.unwrap_or(0.0),
            ]
            .iter()
            .all(|v| v.is_finite()),
            "vital signs must be finite numbers"
        );

        Ok(VitalSigns {
            urine_output_ml_kg_hr: self.urine_output,
            heart_rate: self.heart_rate,
            capillary_refill_s: self.crt,
            mucous_membrane: normalizer.mucous_membrane(&self.mucous_membrane)?,
            systolic_bp: self.systolic_bp,
            current_weight_kg: self.weight,
            hematocrit_pct: self.hematocrit,
            creatinine: self.creatinine,
        })
    }
}
