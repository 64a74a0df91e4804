//! CSV export. Column names match the record field names.

use crate::models::{PlanResult, ReevalRecord};
use crate::session::ReevalHistory;

const PLAN_HEADER: &str = "maintenance_ml_day,deficit_ml,base_ml,base_period_hours,total_volume_ml,ml_per_hr,ml_per_min,ml_per_kg_per_hr,ml_per_kg_per_day,drops_per_min,seconds_per_drop";

const HISTORY_HEADER: &str = "sequence,record_id,recorded_at,urine_output_ml_kg_hr,heart_rate,capillary_refill_s,mucous_membrane,systolic_bp,current_weight_kg,hematocrit_pct,creatinine,ml_per_hr,ml_per_min,ml_per_kg_per_hr,ml_per_kg_per_day,drops_per_min,seconds_per_drop,adjustments,recommendation,risk_level,prev_hash,record_hash";

/// Export a plan as a header plus one row.
pub fn plan_to_csv(plan: &PlanResult) -> String {
    let mut csv = String::new();

    csv.push_str(PLAN_HEADER);
    csv.push('\n');

    let rates = &plan.rates;
    csv.push_str(&format!(
        "{},{},{},{},{},{},{},{},{},{},{}\n",
        plan.maintenance_ml_day,
        plan.deficit_ml,
        plan.base_ml,
        plan.base_period_hours,
        plan.total_volume_ml,
        rates.ml_per_hr,
        rates.ml_per_min,
        rates.ml_per_kg_per_hr,
        rates.ml_per_kg_per_day,
        rates.drops_per_min,
        optional(rates.seconds_per_drop),
    ));

    csv
}

/// Export a reevaluation history, one row per record in order.
pub fn history_to_csv(history: &ReevalHistory) -> String {
    let mut csv = String::new();

    csv.push_str(HISTORY_HEADER);
    csv.push('\n');

    for record in history {
        csv.push_str(&record_row(record));
    }

    csv
}

fn record_row(record: &ReevalRecord) -> String {
    let vitals = &record.vitals;
    let rates = &record.rates;
    format!(
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
        record.sequence,
        escape_csv(&record.record_id),
        escape_csv(&record.recorded_at),
        vitals.urine_output_ml_kg_hr,
        vitals.heart_rate,
        vitals.capillary_refill_s,
        vitals.mucous_membrane,
        vitals.systolic_bp,
        vitals.current_weight_kg,
        vitals.hematocrit_pct,
        optional(vitals.creatinine),
        rates.ml_per_hr,
        rates.ml_per_min,
        rates.ml_per_kg_per_hr,
        rates.ml_per_kg_per_day,
        rates.drops_per_min,
        optional(rates.seconds_per_drop),
        escape_csv(&record.adjustments.join("; ")),
        escape_csv(&record.recommendation),
        record.risk_level,
        record.prev_hash,
        record.record_hash,
    )
}

/// Empty cell for absent values.
fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
