//! Reevaluation adjuster.
//!
//! Maps follow-up vitals to an adjusted infusion rate and a risk level.

mod rules;

pub use rules::*;

use tracing::debug;

use crate::calculator::{ensure_finite, is_positive, CalcError, CalcResult};
use crate::models::{AdjustmentOutcome, RiskLevel, VitalSigns};

/// Adjust a baseline rate for follow-up vitals.
///
/// Starts from `base_ml / base_period_hours` and applies every rule in
/// [`ADJUSTMENT_RULES`] to the running rate. Risk escalates monotonically.
pub fn adjust(
    base_ml: f64,
    base_period_hours: f64,
    baseline_weight_kg: f64,
    vitals: &VitalSigns,
) -> CalcResult<AdjustmentOutcome> {
    if !is_positive(base_period_hours) {
        return Err(CalcError::NonPositivePeriod(base_period_hours));
    }
    if !is_positive(baseline_weight_kg) {
        return Err(CalcError::NonPositiveWeight(baseline_weight_kg));
    }
    ensure_finite("base_ml", base_ml)?;
    check_vitals(vitals)?;

    let baseline_ml_per_hr = base_ml / base_period_hours;
    let mut ml_per_hr = baseline_ml_per_hr;
    let mut risk_level = RiskLevel::Normal;
    let mut triggered = Vec::new();

    for rule in ADJUSTMENT_RULES.iter() {
        if rule.applies(vitals, baseline_weight_kg) {
            ml_per_hr *= rule.multiplier;
            risk_level = risk_level.escalate(rule.risk);
            triggered.push(rule.label.to_string());
        }
    }

    debug!(
        baseline_ml_per_hr,
        adjusted_ml_per_hr = ml_per_hr,
        %risk_level,
        triggered = triggered.len(),
        "Adjusted infusion rate"
    );

    Ok(AdjustmentOutcome {
        baseline_ml_per_hr,
        adjusted_ml_per_hr: ml_per_hr,
        triggered,
        risk_level,
    })
}

/// Every observed value must be a finite number.
fn check_vitals(vitals: &VitalSigns) -> CalcResult<()> {
    ensure_finite("urine_output_ml_kg_hr", vitals.urine_output_ml_kg_hr)?;
    ensure_finite("heart_rate", vitals.heart_rate)?;
    ensure_finite("capillary_refill_s", vitals.capillary_refill_s)?;
    ensure_finite("systolic_bp", vitals.systolic_bp)?;
    ensure_finite("current_weight_kg", vitals.current_weight_kg)?;
    ensure_finite("hematocrit_pct", vitals.hematocrit_pct)?;
    if let Some(creatinine) = vitals.creatinine {
        ensure_finite("creatinine", creatinine)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_no_triggers_keeps_baseline() {
        let outcome = adjust(600.0, 24.0, 10.0, &VitalSigns::stable(10.0)).unwrap();

        assert_eq!(outcome.adjusted_ml_per_hr, 25.0);
        assert!(outcome.triggered.is_empty());
        assert_eq!(outcome.risk_level, RiskLevel::Normal);
        assert_eq!(outcome.recommendation(), "maintain current plan");
    }

    #[test]
    fn test_low_diuresis_isolated() {
        let mut vitals = VitalSigns::stable(10.0);
        vitals.urine_output_ml_kg_hr = 0.5;

        let outcome = adjust(600.0, 24.0, 10.0, &vitals).unwrap();

        assert!((outcome.adjusted_ml_per_hr - 30.0).abs() < EPS);
        assert_eq!(outcome.triggered, vec!["low diuresis → +20% rate"]);
        assert_eq!(outcome.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_tachycardia_only_raises_alert() {
        let mut vitals = VitalSigns::stable(10.0);
        vitals.heart_rate = 180.0;

        let outcome = adjust(600.0, 24.0, 10.0, &vitals).unwrap();

        assert_eq!(outcome.adjusted_ml_per_hr, 25.0);
        assert_eq!(outcome.risk_level, RiskLevel::Alert);
    }

    #[test]
    fn test_alert_after_critical_stays_critical() {
        let mut vitals = VitalSigns::stable(10.0);
        vitals.systolic_bp = 70.0;
        vitals.hematocrit_pct = 60.0;

        let outcome = adjust(600.0, 24.0, 10.0, &vitals).unwrap();

        assert!((outcome.adjusted_ml_per_hr - 25.0 * 1.15 * 0.90).abs() < EPS);
        assert_eq!(outcome.risk_level, RiskLevel::Critical);
        assert_eq!(
            outcome.recommendation(),
            "hypotension → +15% rate; high hematocrit → −10% rate"
        );
    }

    #[test]
    fn test_all_rules_compound() {
        let vitals = VitalSigns {
            urine_output_ml_kg_hr: 0.3,
            heart_rate: 170.0,
            capillary_refill_s: 3.0,
            mucous_membrane: crate::models::MucousMembrane::Pale,
            systolic_bp: 80.0,
            current_weight_kg: 11.0,
            hematocrit_pct: 58.0,
            creatinine: Some(2.1),
        };

        let outcome = adjust(600.0, 24.0, 10.0, &vitals).unwrap();
        let expected = 25.0 * 1.20 * 1.00 * 1.10 * 1.15 * 0.85 * 0.90;

        assert!((outcome.adjusted_ml_per_hr - expected).abs() < EPS);
        assert_eq!(outcome.triggered.len(), 6);
        assert_eq!(outcome.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_rejects_non_positive_period() {
        let result = adjust(600.0, 0.0, 10.0, &VitalSigns::stable(10.0));
        assert_eq!(result, Err(CalcError::NonPositivePeriod(0.0)));
    }

    #[test]
    fn test_rejects_non_finite_vitals() {
        let mut vitals = VitalSigns::stable(10.0);
        vitals.systolic_bp = f64::NAN;
        assert!(matches!(
            adjust(600.0, 24.0, 10.0, &vitals),
            Err(CalcError::NonFinite {
                field: "systolic_bp",
                ..
            })
        ));

        let mut vitals = VitalSigns::stable(10.0);
        vitals.creatinine = Some(f64::INFINITY);
        assert_eq!(
            adjust(600.0, 24.0, 10.0, &vitals),
            Err(CalcError::NonFinite {
                field: "creatinine",
                value: f64::INFINITY
            })
        );
    }
}
