//! Reevaluation models: follow-up vitals, risk levels and history records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::plan::RateSet;

/// Recommendation shown when no adjustment rule fires.
pub const MAINTAIN_CURRENT_PLAN: &str = "maintain current plan";

/// Mucous membrane colour observed at reevaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MucousMembrane {
    #[default]
    Pink,
    Pale,
    Cyanotic,
    Injected,
    Icteric,
}

impl MucousMembrane {
    pub fn as_str(&self) -> &'static str {
        match self {
            MucousMembrane::Pink => "pink",
            MucousMembrane::Pale => "pale",
            MucousMembrane::Cyanotic => "cyanotic",
            MucousMembrane::Injected => "injected",
            MucousMembrane::Icteric => "icteric",
        }
    }
}

impl fmt::Display for MucousMembrane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Follow-up vital signs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalSigns {
    /// Urine output (mL/kg/h)
    pub urine_output_ml_kg_hr: f64,
    /// Heart rate (bpm)
    pub heart_rate: f64,
    /// Capillary refill time (s)
    pub capillary_refill_s: f64,
    #[serde(default)]
    pub mucous_membrane: MucousMembrane,
    /// Systolic blood pressure (mmHg)
    pub systolic_bp: f64,
    /// Weight at reevaluation (kg)
    pub current_weight_kg: f64,
    /// Packed cell volume (%)
    pub hematocrit_pct: f64,
    /// Serum creatinine, recorded but not used by any rule
    #[serde(default)]
    pub creatinine: Option<f64>,
}

impl VitalSigns {
    /// Vitals that trigger no adjustment for a patient of the given weight.
    pub fn stable(weight_kg: f64) -> Self {
        Self {
            urine_output_ml_kg_hr: 2.0,
            heart_rate: 100.0,
            capillary_refill_s: 1.5,
            mucous_membrane: MucousMembrane::Pink,
            systolic_bp: 120.0,
            current_weight_kg: weight_kg,
            hematocrit_pct: 45.0,
            creatinine: None,
        }
    }
}

/// Risk classification, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Normal,
    Alert,
    Critical,
}

impl RiskLevel {
    /// Combine with another contribution; the result is never lower than either.
    #[must_use]
    pub fn escalate(self, other: RiskLevel) -> RiskLevel {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Normal => "normal",
            RiskLevel::Alert => "alert",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of the reevaluation adjuster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentOutcome {
    /// Rate before any adjustment
    pub baseline_ml_per_hr: f64,
    /// Rate after all triggered multipliers
    pub adjusted_ml_per_hr: f64,
    /// Labels of the triggered rules, in rule order
    pub triggered: Vec<String>,
    pub risk_level: RiskLevel,
}

impl AdjustmentOutcome {
    /// Triggered labels joined, or the maintain-plan sentinel.
    pub fn recommendation(&self) -> String {
        if self.triggered.is_empty() {
            MAINTAIN_CURRENT_PLAN.to_string()
        } else {
            self.triggered.join("; ")
        }
    }
}

/// Immutable snapshot of one reevaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReevalRecord {
    /// 1-based position in the history
    pub sequence: u32,
    /// Unique record ID
    pub record_id: String,
    /// Evaluation timestamp (RFC 3339, UTC)
    pub recorded_at: String,
    /// Observed vitals
    pub vitals: VitalSigns,
    /// Rates after adjustment
    #[serde(flatten)]
    pub rates: RateSet,
    /// Triggered adjustment labels
    pub adjustments: Vec<String>,
    /// Joined labels or "maintain current plan"
    pub recommendation: String,
    pub risk_level: RiskLevel,
    /// Hash of the preceding record (empty for the first)
    pub prev_hash: String,
    /// Hash of this record's content chained to `prev_hash`
    pub record_hash: String,
}
