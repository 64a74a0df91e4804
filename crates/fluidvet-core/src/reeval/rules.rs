//! Fixed reevaluation adjustment rules.
//!
//! Rules are evaluated in table order against the running rate and compose
//! multiplicatively. The real-valued product is commutative, so the order only
//! shows up in floating-point rounding; it is kept fixed so repeated
//! evaluations of the same vitals produce bit-identical rates.

use std::fmt;

use crate::models::{RiskLevel, VitalSigns};

/// A single conditional rate multiplier.
#[derive(Clone, Copy)]
pub struct AdjustmentRule {
    /// Stable identifier
    pub name: &'static str,
    /// Recommendation text shown to the clinician
    pub label: &'static str,
    /// Factor applied to the running rate when the rule fires
    pub multiplier: f64,
    /// Risk contribution when the rule fires
    pub risk: RiskLevel,
    condition: fn(&VitalSigns, f64) -> bool,
}

impl fmt::Debug for AdjustmentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdjustmentRule")
            .field("name", &self.name)
            .field("multiplier", &self.multiplier)
            .field("risk", &self.risk)
            .finish()
    }
}

impl AdjustmentRule {
    /// Check whether the rule fires for these vitals and baseline weight (kg).
    pub fn applies(&self, vitals: &VitalSigns, baseline_weight_kg: f64) -> bool {
        (self.condition)(vitals, baseline_weight_kg)
    }
}

fn low_diuresis(vitals: &VitalSigns, _baseline_weight_kg: f64) -> bool {
    vitals.urine_output_ml_kg_hr < 1.0
}

fn tachycardia(vitals: &VitalSigns, _baseline_weight_kg: f64) -> bool {
    vitals.heart_rate > 140.0
}

fn slow_capillary_refill(vitals: &VitalSigns, _baseline_weight_kg: f64) -> bool {
    vitals.capillary_refill_s > 2.0
}

fn hypotension(vitals: &VitalSigns, _baseline_weight_kg: f64) -> bool {
    vitals.systolic_bp < 90.0
}

fn weight_gain(vitals: &VitalSigns, baseline_weight_kg: f64) -> bool {
    vitals.current_weight_kg > baseline_weight_kg * 1.05
}

fn high_hematocrit(vitals: &VitalSigns, _baseline_weight_kg: f64) -> bool {
    vitals.hematocrit_pct > 55.0
}

/// Adjustment rules in evaluation order.
pub static ADJUSTMENT_RULES: [AdjustmentRule; 6] = [
    AdjustmentRule {
        name: "low_diuresis",
        label: "low diuresis → +20% rate",
        multiplier: 1.20,
        risk: RiskLevel::Critical,
        condition: low_diuresis,
    },
    AdjustmentRule {
        name: "tachycardia",
        label: "tachycardia → monitor",
        multiplier: 1.00,
        risk: RiskLevel::Alert,
        condition: tachycardia,
    },
    AdjustmentRule {
        name: "slow_refill",
        label: "slow refill → +10% rate",
        multiplier: 1.10,
        risk: RiskLevel::Alert,
        condition: slow_capillary_refill,
    },
    AdjustmentRule {
        name: "hypotension",
        label: "hypotension → +15% rate",
        multiplier: 1.15,
        risk: RiskLevel::Critical,
        condition: hypotension,
    },
    AdjustmentRule {
        name: "weight_gain",
        label: "weight +5% → −15% rate",
        multiplier: 0.85,
        risk: RiskLevel::Alert,
        condition: weight_gain,
    },
    AdjustmentRule {
        name: "high_hematocrit",
        label: "high hematocrit → −10% rate",
        multiplier: 0.90,
        risk: RiskLevel::Alert,
        condition: high_hematocrit,
    },
];
