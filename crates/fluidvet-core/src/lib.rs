//! Fluidvet Core Library
//!
//! IV fluid therapy planning and reevaluation for canine and feline patients.
//!
//! # Architecture
//!
//! ```text
//! PatientInput + settings ──► Plan Calculator ──► PlanResult (+ warnings)
//!                                                     │
//!                                          baseline (mL, hours)
//!                                                     │
//!                     VitalSigns ──► Reevaluation Adjuster
//!                                                     │
//!                                   adjusted rate, labels, risk level
//!                                                     │
//!                                   ┌─────────────────▼─────────────────┐
//!                                   │  ClinicalSession::reevaluate      │
//!                                   │  append ReevalRecord (hash chain) │
//!                                   └─────────────────┬─────────────────┘
//!                                                     │
//!                             ┌───────────────────────┼───────────────────────┐
//!                             ▼                       ▼                       ▼
//!                            CSV                 Text report             Session JSON
//! ```
//!
//! # Core Principle
//!
//! **The engine is pure.** Calculator and adjuster are functions of their inputs;
//! the session owns the only mutable state, and it is append-only.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientInput, PlanResult, VitalSigns, ReevalRecord, etc.)
//! - [`calculator`]: Maintenance, deficit, base volume and rate derivation
//! - [`reeval`]: Rule-based rate adjustment and risk classification
//! - [`session`]: Clinical session and append-only reevaluation history
//! - [`normalizer`]: Free-text label parsing (species, state, method, drip set)
//! - [`config`]: Default plan settings
//! - [`export`]: CSV and text report export

pub mod calculator;
pub mod config;
pub mod export;
pub mod models;
pub mod normalizer;
pub mod reeval;
pub mod session;

// Re-export commonly used types
pub use calculator::{compute_plan, plan_warnings, CalcError};
pub use config::EngineDefaults;
pub use models::{
    AdjustmentOutcome, ClinicalState, ClinicalWarning, DripConfig, DropFactor,
    MaintenanceMethod, MucousMembrane, PatientInput, PatientType, PlanRequest, PlanResult,
    RateSet, ReevalRecord, ResuscitationConfig, RiskLevel, Species, TherapyPeriods, VitalSigns,
};
pub use normalizer::LabelNormalizer;
pub use reeval::adjust;
pub use session::{ClinicalSession, ReevalHistory};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FluidvetError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Integrity error: {0}")]
    IntegrityError(String),

    #[error("Session error: {0}")]
    SessionError(String),
}

impl From<CalcError> for FluidvetError {
    fn from(e: CalcError) -> Self {
        FluidvetError::InvalidInput(e.to_string())
    }
}

impl From<normalizer::NormalizeError> for FluidvetError {
    fn from(e: normalizer::NormalizeError) -> Self {
        FluidvetError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for FluidvetError {
    fn from(e: serde_json::Error) -> Self {
        FluidvetError::SerializationError(e.to_string())
    }
}

impl From<session::SessionError> for FluidvetError {
    fn from(e: session::SessionError) -> Self {
        match e {
            session::SessionError::Calc(calc) => calc.into(),
            session::SessionError::Json(json) => json.into(),
            other => FluidvetError::IntegrityError(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for FluidvetError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        FluidvetError::SessionError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Compute a plan without starting a session.
#[uniffi::export]
pub fn compute_fluid_plan(request: FfiPlanRequest) -> Result<FfiPlanResult, FluidvetError> {
    let request = request.into_request(&LabelNormalizer::new())?;
    let plan = request.compute()?;
    let warnings = request.warnings(&plan);
    Ok(FfiPlanResult::new(plan, &warnings))
}

/// Start a clinical session for a patient.
#[uniffi::export]
pub fn start_session(request: FfiPlanRequest) -> Result<Arc<FluidSession>, FluidvetError> {
    let normalizer = LabelNormalizer::new();
    let request = request.into_request(&normalizer)?;
    let session = ClinicalSession::new(request)?;
    Ok(Arc::new(FluidSession {
        session: Mutex::new(session),
        normalizer,
    }))
}

/// Restore a session from its JSON export. Edited plans and histories are rejected.
#[uniffi::export]
pub fn restore_session(json: String) -> Result<Arc<FluidSession>, FluidvetError> {
    let session = ClinicalSession::from_json(&json)?;
    Ok(Arc::new(FluidSession {
        session: Mutex::new(session),
        normalizer: LabelNormalizer::new(),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct FluidSession {
    session: Mutex<ClinicalSession>,
    normalizer: LabelNormalizer,
}

#[uniffi::export]
impl FluidSession {
    /// Session ID.
    pub fn session_id(&self) -> Result<String, FluidvetError> {
        let session = self.session.lock()?;
        Ok(session.session_id.clone())
    }

    /// Current plan and warnings.
    pub fn plan(&self) -> Result<FfiPlanResult, FluidvetError> {
        let session = self.session.lock()?;
        Ok(FfiPlanResult::new(session.plan().clone(), &session.warnings()))
    }

    /// Recompute the plan for changed inputs.
    pub fn replan(&self, request: FfiPlanRequest) -> Result<FfiPlanResult, FluidvetError> {
        let request = request.into_request(&self.normalizer)?;
        let mut session = self.session.lock()?;
        session.replan(request)?;
        Ok(FfiPlanResult::new(session.plan().clone(), &session.warnings()))
    }

    /// Reevaluate with new vitals and append a record.
    pub fn reevaluate(&self, vitals: FfiVitalSigns) -> Result<FfiReevalRecord, FluidvetError> {
        let vitals = vitals.into_vitals(&self.normalizer)?;
        let mut session = self.session.lock()?;
        let record = session.reevaluate(vitals)?;
        Ok(record.clone().into())
    }

    /// All reevaluation records in order.
    pub fn history(&self) -> Result<Vec<FfiReevalRecord>, FluidvetError> {
        let session = self.session.lock()?;
        Ok(session.history().iter().cloned().map(|r| r.into()).collect())
    }

    /// Export the reevaluation history as CSV.
    pub fn export_history_csv(&self) -> Result<String, FluidvetError> {
        let session = self.session.lock()?;
        Ok(export::history_to_csv(session.history()))
    }

    /// Export the current plan as CSV.
    pub fn export_plan_csv(&self) -> Result<String, FluidvetError> {
        let session = self.session.lock()?;
        Ok(export::plan_to_csv(session.plan()))
    }

    /// Export a text report of the plan and reevaluations.
    pub fn export_report(&self) -> Result<String, FluidvetError> {
        let session = self.session.lock()?;
        Ok(export::session_report(&session))
    }

    /// Serialize the session for explicit export.
    pub fn to_json(&self) -> Result<String, FluidvetError> {
        let session = self.session.lock()?;
        Ok(session.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe plan request. Labels are parsed by the [`LabelNormalizer`].
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPlanRequest {
    pub species: String,
    pub patient_type: Option<String>,
    pub weight_kg: f64,
    pub clinical_state: String,
    pub dehydration_pct: f64,
    pub sensible_loss_ml_day: f64,
    pub insensible_loss_ml_day: f64,
    pub method: String,
    pub bolus_ml_per_kg: f64,
    pub bolus_repeats: u32,
    pub bolus_duration_min: f64,
    pub drop_factor: u32,
    pub maintenance_period_hours: f64,
    pub rehydration_hours: f64,
}

impl FfiPlanRequest {
    fn into_request(self, normalizer: &LabelNormalizer) -> Result<PlanRequest, FluidvetError> {
        let patient_type = self
            .patient_type
            .as_deref()
            .map(|label| normalizer.patient_type(label))
            .transpose()?;
        let drop_factor =
            DropFactor::try_from(self.drop_factor).map_err(FluidvetError::InvalidInput)?;

        Ok(PlanRequest {
            patient: PatientInput {
                species: normalizer.species(&self.species)?,
                patient_type,
                weight_kg: self.weight_kg,
                clinical_state: normalizer.clinical_state(&self.clinical_state)?,
                dehydration_pct: self.dehydration_pct,
                sensible_loss_ml_day: self.sensible_loss_ml_day,
                insensible_loss_ml_day: self.insensible_loss_ml_day,
            },
            method: normalizer.maintenance_method(&self.method)?,
            resuscitation: ResuscitationConfig {
                bolus_ml_per_kg: self.bolus_ml_per_kg,
                bolus_repeats: self.bolus_repeats,
                bolus_duration_min: self.bolus_duration_min,
            },
            drip: DripConfig { drop_factor },
            periods: TherapyPeriods {
                maintenance_period_hours: self.maintenance_period_hours,
                rehydration_hours: self.rehydration_hours,
            },
        })
    }
}

/// FFI-safe plan result with warning messages.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPlanResult {
    pub maintenance_ml_day: f64,
    pub deficit_ml: f64,
    pub base_ml: f64,
    pub base_period_hours: f64,
    pub total_volume_ml: f64,
    pub ml_per_hr: f64,
    pub ml_per_min: f64,
    pub ml_per_kg_per_hr: f64,
    pub ml_per_kg_per_day: f64,
    pub drops_per_min: f64,
    pub seconds_per_drop: Option<f64>,
    pub warnings: Vec<String>,
}

impl FfiPlanResult {
    fn new(plan: PlanResult, warnings: &[ClinicalWarning]) -> Self {
        Self {
            maintenance_ml_day: plan.maintenance_ml_day,
            deficit_ml: plan.deficit_ml,
            base_ml: plan.base_ml,
            base_period_hours: plan.base_period_hours,
            total_volume_ml: plan.total_volume_ml,
            ml_per_hr: plan.rates.ml_per_hr,
            ml_per_min: plan.rates.ml_per_min,
            ml_per_kg_per_hr: plan.rates.ml_per_kg_per_hr,
            ml_per_kg_per_day: plan.rates.ml_per_kg_per_day,
            drops_per_min: plan.rates.drops_per_min,
            seconds_per_drop: plan.rates.seconds_per_drop,
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// FFI-safe vital signs.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVitalSigns {
    pub urine_output_ml_kg_hr: f64,
    pub heart_rate: f64,
    pub capillary_refill_s: f64,
    pub mucous_membrane: String,
    pub systolic_bp: f64,
    pub current_weight_kg: f64,
    pub hematocrit_pct: f64,
    pub creatinine: Option<f64>,
}

impl FfiVitalSigns {
    fn into_vitals(self, normalizer: &LabelNormalizer) -> Result<VitalSigns, FluidvetError> {
        Ok(VitalSigns {
            urine_output_ml_kg_hr: self.urine_output_ml_kg_hr,
            heart_rate: self.heart_rate,
            capillary_refill_s: self.capillary_refill_s,
            mucous_membrane: normalizer.mucous_membrane(&self.mucous_membrane)?,
            systolic_bp: self.systolic_bp,
            current_weight_kg: self.current_weight_kg,
            hematocrit_pct: self.hematocrit_pct,
            creatinine: self.creatinine,
        })
    }
}

/// FFI-safe reevaluation record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReevalRecord {
    pub sequence: u32,
    pub record_id: String,
    pub recorded_at: String,
    pub ml_per_hr: f64,
    pub ml_per_min: f64,
    pub ml_per_kg_per_hr: f64,
    pub ml_per_kg_per_day: f64,
    pub drops_per_min: f64,
    pub seconds_per_drop: Option<f64>,
    pub adjustments: Vec<String>,
    pub recommendation: String,
    pub risk_level: String,
    pub record_hash: String,
}

impl From<ReevalRecord> for FfiReevalRecord {
    fn from(record: ReevalRecord) -> Self {
        Self {
            sequence: record.sequence,
            record_id: record.record_id,
            recorded_at: record.recorded_at,
            ml_per_hr: record.rates.ml_per_hr,
            ml_per_min: record.rates.ml_per_min,
            ml_per_kg_per_hr: record.rates.ml_per_kg_per_hr,
            ml_per_kg_per_day: record.rates.ml_per_kg_per_day,
            drops_per_min: record.rates.drops_per_min,
            seconds_per_drop: record.rates.seconds_per_drop,
            adjustments: record.adjustments,
            recommendation: record.recommendation,
            risk_level: record.risk_level.to_string(),
            record_hash: record.record_hash,
        }
    }
}
