//! Plain-text clinical report.

use crate::models::{ClinicalWarning, PlanRequest, PlanResult, ReevalRecord};
use crate::session::ClinicalSession;

/// Format the plan, its inputs and warnings.
pub fn plan_report(request: &PlanRequest, plan: &PlanResult, warnings: &[ClinicalWarning]) -> String {
    let patient = &request.patient;
    let rates = &plan.rates;
    let mut out = String::new();

    out.push_str("FLUID THERAPY PLAN\n");
    out.push_str(&format!(
        "Patient: {} {:?}, {:.2} kg, {}\n",
        patient.species,
        patient.patient_type(),
        patient.weight_kg,
        patient.clinical_state
    ));
    out.push_str(&format!("Maintenance method: {}\n", request.method.describe()));
    out.push_str(&format!("Drip set: {}\n", request.drip.drop_factor));
    out.push('\n');
    out.push_str(&format!("Maintenance (mL/day): {:.1}\n", plan.maintenance_ml_day));
    out.push_str(&format!("Deficit (mL): {:.1}\n", plan.deficit_ml));
    out.push_str(&format!("Total planned volume (mL): {:.1}\n", plan.total_volume_ml));
    out.push_str(&format!("Administration period (h): {:.2}\n", plan.base_period_hours));
    out.push_str(&format!("- mL/h: {:.1}\n", rates.ml_per_hr));
    out.push_str(&format!("- mL/min: {:.3}\n", rates.ml_per_min));
    out.push_str(&format!("- mL/kg/h: {:.3}\n", rates.ml_per_kg_per_hr));
    out.push_str(&format!("- mL/kg/day: {:.1}\n", rates.ml_per_kg_per_day));
    out.push_str(&format!("- gtt/min: {:.1}\n", rates.drops_per_min));
    out.push_str(&format!("- s/drop: {}\n", seconds_per_drop(rates.seconds_per_drop)));

    if !warnings.is_empty() {
        out.push('\n');
        out.push_str("CLINICAL WARNINGS\n");
        for warning in warnings {
            out.push_str(&format!("! {}\n", warning));
        }
    }

    out
}

/// One paragraph describing a reevaluation record.
pub fn record_paragraph(record: &ReevalRecord) -> String {
    let vitals = &record.vitals;
    let creatinine = vitals
        .creatinine
        .map(|c| format!(", creatinine {:.2}", c))
        .unwrap_or_default();

    format!(
        "#{} {}: urine output {:.2} mL/kg/h, HR {:.0} bpm, CRT {:.1} s, mucous membranes {}, \
         systolic BP {:.0} mmHg, weight {:.2} kg, hematocrit {:.1}%{}. \
         Adjusted rate {:.1} mL/h ({:.1} gtt/min, {} s/drop). Risk: {}. Recommendation: {}.",
        record.sequence,
        record.recorded_at,
        vitals.urine_output_ml_kg_hr,
        vitals.heart_rate,
        vitals.capillary_refill_s,
        vitals.mucous_membrane,
        vitals.systolic_bp,
        vitals.current_weight_kg,
        vitals.hematocrit_pct,
        creatinine,
        record.rates.ml_per_hr,
        record.rates.drops_per_min,
        seconds_per_drop(record.rates.seconds_per_drop),
        record.risk_level,
        record.recommendation,
    )
}

/// Full session report: plan, warnings and every reevaluation.
pub fn session_report(session: &ClinicalSession) -> String {
    let mut out = plan_report(session.request(), session.plan(), &session.warnings());

    let history = session.history();
    if !history.is_empty() {
        out.push('\n');
        out.push_str(&format!("REEVALUATIONS (peak risk: {})\n", history.peak_risk()));
        for record in history {
            out.push_str(&record_paragraph(record));
            out.push('\n');
        }
    }

    out
}

fn seconds_per_drop(value: Option<f64>) -> String {
    value.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClinicalState, PatientInput, Species, VitalSigns};

    fn session() -> ClinicalSession {
        ClinicalSession::new(PlanRequest::new(PatientInput::new(
            Species::Canine,
            10.0,
            ClinicalState::Maintenance,
        )))
        .unwrap()
    }

    #[test]
    fn test_plan_report_formats_rates() {
        let session = session();
        let report = plan_report(session.request(), session.plan(), &[]);

        assert!(report.contains("Maintenance (mL/day): 600.0"));
        assert!(report.contains("- mL/h: 25.0"));
        assert!(report.contains("- gtt/min: 8.3"));
        assert!(report.contains("- s/drop: 7.20"));
        assert!(!report.contains("CLINICAL WARNINGS"));
    }

    #[test]
    fn test_report_line_layout() {
        let session = session();
        let report = plan_report(session.request(), session.plan(), &[]);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "FLUID THERAPY PLAN");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Maintenance (mL/day): 600.0");
        assert_eq!(lines.len(), 15);
        assert!(report.ends_with("- s/drop: 7.20\n"));
    }

    #[test]
    fn test_session_report_lists_reevaluations() {
        let mut session = session();
        let mut vitals = VitalSigns::stable(10.0);
        vitals.urine_output_ml_kg_hr = 0.4;
        session.reevaluate(vitals).unwrap();

        let report = session_report(&session);
        assert!(report.contains("REEVALUATIONS (peak risk: critical)"));
        assert!(report.contains("#1 "));
        assert!(report.contains("Adjusted rate 30.0 mL/h"));
        assert!(report.contains("low diuresis"));
    }

    #[test]
    fn test_record_paragraph_sentinel() {
        let mut session = session();
        let record = session.reevaluate(VitalSigns::stable(10.0)).unwrap().clone();

        let paragraph = record_paragraph(&record);
        assert!(paragraph.contains("Recommendation: maintain current plan."));
        assert!(paragraph.contains("Risk: normal."));
    }
}
