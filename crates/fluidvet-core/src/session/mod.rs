//! Clinical session: the current plan plus its reevaluation history.
//!
//! The calculator and adjuster stay pure; the session owns the only mutable
//! state, and that state only grows.

mod history;

pub use history::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::calculator::{derive_rates, CalcError};
use crate::models::{ClinicalWarning, PlanRequest, PlanResult, ReevalRecord, VitalSigns};
use crate::reeval::adjust;

/// Session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("History record {sequence} does not match its hash")]
    Tampered { sequence: u32 },

    #[error("History sequence gap: expected record {expected}, found {found}")]
    SequenceGap { expected: u32, found: u32 },

    #[error("Stored plan does not match its request")]
    PlanMismatch,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// One clinical encounter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicalSession {
    /// Unique session ID
    pub session_id: String,
    /// Creation timestamp
    pub created_at: String,
    request: PlanRequest,
    plan: PlanResult,
    #[serde(default)]
    history: ReevalHistory,
}

impl ClinicalSession {
    /// Start a session by computing the initial plan.
    pub fn new(request: PlanRequest) -> SessionResult<Self> {
        let plan = request.compute()?;
        let session = Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            request,
            plan,
            history: ReevalHistory::new(),
        };

        info!(
            session_id = %session.session_id,
            species = %session.request.patient.species,
            state = %session.request.patient.clinical_state,
            "Started clinical session"
        );
        Ok(session)
    }

    pub fn request(&self) -> &PlanRequest {
        &self.request
    }

    pub fn plan(&self) -> &PlanResult {
        &self.plan
    }

    pub fn history(&self) -> &ReevalHistory {
        &self.history
    }

    /// Clinical warnings for the current plan.
    pub fn warnings(&self) -> Vec<ClinicalWarning> {
        self.request.warnings(&self.plan)
    }

    /// Recompute the plan for changed inputs. History is kept.
    ///
    /// On error the previous plan stays in place.
    pub fn replan(&mut self, request: PlanRequest) -> SessionResult<&PlanResult> {
        let plan = request.compute()?;
        self.request = request;
        self.plan = plan;

        info!(session_id = %self.session_id, "Recomputed plan");
        Ok(&self.plan)
    }

    /// Reevaluate the infusion for new vitals and append one record.
    pub fn reevaluate(&mut self, vitals: VitalSigns) -> SessionResult<&ReevalRecord> {
        let weight_kg = self.request.patient.weight_kg;
        let outcome = adjust(
            self.plan.base_ml,
            self.plan.base_period_hours,
            weight_kg,
            &vitals,
        )?;
        let rates = derive_rates(
            outcome.adjusted_ml_per_hr,
            weight_kg,
            self.request.drip.drop_factor,
        );

        let session_id = self.session_id.clone();
        let record = self.history.append(vitals, rates, outcome)?;

        info!(
            session_id = %session_id,
            sequence = record.sequence,
            risk_level = %record.risk_level,
            ml_per_hr = record.rates.ml_per_hr,
            "Recorded reevaluation"
        );
        Ok(record)
    }

    /// Serialize for explicit export.
    pub fn to_json(&self) -> SessionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore an exported session, rejecting edited plans and histories.
    pub fn from_json(json: &str) -> SessionResult<Self> {
        let session: Self = serde_json::from_str(json)?;
        if session.request.compute()? != session.plan {
            return Err(SessionError::PlanMismatch);
        }
        session.history.verify()?;
        Ok(session)
    }
}
