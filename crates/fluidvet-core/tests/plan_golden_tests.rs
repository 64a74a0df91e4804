//! Golden tests for the plan calculator.
//!
//! These tests verify computed plans against hand-checked clinical cases.

use fluidvet_core::models::{
    ClinicalState, ClinicalWarning, DropFactor, MaintenanceMethod, PatientInput, PatientType,
    PlanRequest, Species,
};

/// Hand-checked plan case.
struct GoldenCase {
    id: &'static str,
    species: Species,
    patient_type: Option<PatientType>,
    weight_kg: f64,
    state: ClinicalState,
    dehydration_pct: f64,
    method: MaintenanceMethod,
    drop_factor: DropFactor,
    expected_total_ml: f64,
    expected_period_hours: f64,
    expected_ml_per_hr: f64,
    expected_ml_per_kg_per_hr: f64,
    expected_drops_per_min: f64,
    expect_rate_warning: bool,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "canine-maintenance",
            species: Species::Canine,
            patient_type: None,
            weight_kg: 10.0,
            state: ClinicalState::Maintenance,
            dehydration_pct: 0.0,
            method: MaintenanceMethod::LinearPerKg,
            drop_factor: DropFactor::Macro20,
            expected_total_ml: 600.0,
            expected_period_hours: 24.0,
            expected_ml_per_hr: 25.0,
            expected_ml_per_kg_per_hr: 2.5,
            expected_drops_per_min: 25.0 / 60.0 * 20.0,
            expect_rate_warning: false,
        },
        GoldenCase {
            id: "feline-maintenance",
            species: Species::Feline,
            patient_type: None,
            weight_kg: 4.0,
            state: ClinicalState::Maintenance,
            dehydration_pct: 0.0,
            method: MaintenanceMethod::LinearPerKg,
            drop_factor: DropFactor::Micro60,
            expected_total_ml: 160.0,
            expected_period_hours: 24.0,
            expected_ml_per_hr: 160.0 / 24.0,
            expected_ml_per_kg_per_hr: 160.0 / 24.0 / 4.0,
            expected_drops_per_min: 160.0 / 24.0,
            expect_rate_warning: false,
        },
        GoldenCase {
            id: "canine-rehydration-5pct",
            species: Species::Canine,
            patient_type: None,
            weight_kg: 20.0,
            state: ClinicalState::Rehydration,
            dehydration_pct: 5.0,
            method: MaintenanceMethod::LinearPerKg,
            drop_factor: DropFactor::Macro10,
            // 1200 mL/day maintenance + 1000 mL deficit over 24 h
            expected_total_ml: 2200.0,
            expected_period_hours: 24.0,
            expected_ml_per_hr: 2200.0 / 24.0,
            expected_ml_per_kg_per_hr: 2200.0 / 24.0 / 20.0,
            expected_drops_per_min: 2200.0 / 24.0 / 60.0 * 10.0,
            expect_rate_warning: false,
        },
        GoldenCase {
            id: "feline-shock",
            species: Species::Feline,
            patient_type: None,
            weight_kg: 5.0,
            state: ClinicalState::Shock,
            dehydration_pct: 0.0,
            method: MaintenanceMethod::LinearPerKg,
            drop_factor: DropFactor::Macro20,
            // 10 mL/kg over 15 min
            expected_total_ml: 50.0,
            expected_period_hours: 0.25,
            expected_ml_per_hr: 200.0,
            expected_ml_per_kg_per_hr: 40.0,
            expected_drops_per_min: 200.0 / 60.0 * 20.0,
            expect_rate_warning: false,
        },
        GoldenCase {
            id: "puppy-linear-offset",
            species: Species::Canine,
            patient_type: Some(PatientType::Pediatric),
            weight_kg: 2.0,
            state: ClinicalState::Maintenance,
            dehydration_pct: 0.0,
            method: MaintenanceMethod::LinearOffset,
            drop_factor: DropFactor::Micro60,
            // (30 * 2 + 70) * 3
            expected_total_ml: 390.0,
            expected_period_hours: 24.0,
            expected_ml_per_hr: 16.25,
            expected_ml_per_kg_per_hr: 8.125,
            expected_drops_per_min: 16.25,
            expect_rate_warning: true,
        },
        GoldenCase {
            id: "canine-metabolic",
            species: Species::Canine,
            patient_type: None,
            weight_kg: 16.0,
            state: ClinicalState::Maintenance,
            dehydration_pct: 0.0,
            method: MaintenanceMethod::MetabolicPower,
            drop_factor: DropFactor::Macro20,
            // 132 * 16^0.75 = 1056
            expected_total_ml: 1056.0,
            expected_period_hours: 24.0,
            expected_ml_per_hr: 44.0,
            expected_ml_per_kg_per_hr: 2.75,
            expected_drops_per_min: 44.0 / 60.0 * 20.0,
            expect_rate_warning: false,
        },
    ]
}

fn assert_close(actual: f64, expected: f64, what: &str, id: &str) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "Case '{}': {} expected {}, got {}",
        id,
        what,
        expected,
        actual
    );
}

#[test]
fn test_golden_cases() {
    for case in get_golden_cases() {
        let mut patient = PatientInput::new(case.species, case.weight_kg, case.state);
        patient.patient_type = case.patient_type;
        patient.dehydration_pct = case.dehydration_pct;

        let mut request = PlanRequest::new(patient);
        request.method = case.method;
        request.drip.drop_factor = case.drop_factor;

        let plan = request
            .compute()
            .unwrap_or_else(|e| panic!("Case '{}' failed: {}", case.id, e));

        assert_close(plan.total_volume_ml, case.expected_total_ml, "total volume", case.id);
        assert_close(plan.base_period_hours, case.expected_period_hours, "period", case.id);
        assert_close(plan.rates.ml_per_hr, case.expected_ml_per_hr, "mL/h", case.id);
        assert_close(
            plan.rates.ml_per_kg_per_hr,
            case.expected_ml_per_kg_per_hr,
            "mL/kg/h",
            case.id,
        );
        assert_close(
            plan.rates.drops_per_min,
            case.expected_drops_per_min,
            "gtt/min",
            case.id,
        );
        let rate_warning = request
            .warnings(&plan)
            .iter()
            .any(|w| matches!(w, ClinicalWarning::RateAboveExpected { .. }));
        assert_eq!(
            rate_warning, case.expect_rate_warning,
            "Case '{}': rate warning mismatch",
            case.id
        );
    }
}

#[test]
fn test_canine_maintenance_drip_timing() {
    let request = PlanRequest::new(PatientInput::new(
        Species::Canine,
        10.0,
        ClinicalState::Maintenance,
    ));
    let plan = request.compute().unwrap();

    assert_eq!(plan.rates.ml_per_kg_per_day, 60.0);
    assert!((plan.rates.seconds_per_drop.unwrap() - 7.2).abs() < 1e-9);
}

#[test]
fn test_losses_added_to_total() {
    let mut patient = PatientInput::new(Species::Canine, 10.0, ClinicalState::Maintenance);
    patient.sensible_loss_ml_day = 100.0;
    patient.insensible_loss_ml_day = 20.0;

    let plan = PlanRequest::new(patient).compute().unwrap();
    assert_eq!(plan.base_ml, 600.0);
    assert_eq!(plan.total_volume_ml, 720.0);
    assert_eq!(plan.rates.ml_per_hr, 30.0);
}

#[test]
fn test_short_rehydration_window_warns() {
    let mut patient = PatientInput::new(Species::Feline, 4.0, ClinicalState::Rehydration);
    patient.dehydration_pct = 10.0;

    let mut request = PlanRequest::new(patient);
    request.periods.rehydration_hours = 6.0;

    let plan = request.compute().unwrap();
    let warnings = request.warnings(&plan);

    assert!(warnings
        .iter()
        .any(|w| matches!(w, ClinicalWarning::RateAboveExpected { .. })));
}

#[test]
fn test_shock_bolus_warnings() {
    let mut request = PlanRequest::new(PatientInput::new(
        Species::Canine,
        10.0,
        ClinicalState::Shock,
    ));
    request.resuscitation.bolus_ml_per_kg = 40.0;
    request.resuscitation.bolus_duration_min = 45.0;

    let plan = request.compute().unwrap();
    let warnings = request.warnings(&plan);

    assert!(warnings
        .iter()
        .any(|w| matches!(w, ClinicalWarning::SlowBolus { .. })));
    assert!(warnings
        .iter()
        .any(|w| matches!(w, ClinicalWarning::LargeBolus { .. })));
    assert!(!warnings
        .iter()
        .any(|w| matches!(w, ClinicalWarning::RateAboveExpected { .. })));
}

#[test]
fn test_zero_bolus_is_no_flow() {
    let mut request = PlanRequest::new(PatientInput::new(
        Species::Canine,
        10.0,
        ClinicalState::Shock,
    ));
    request.resuscitation.bolus_ml_per_kg = 0.0;

    let plan = request.compute().unwrap();
    assert_eq!(plan.rates.ml_per_hr, 0.0);
    assert_eq!(plan.rates.seconds_per_drop, None);
    assert!(request.warnings(&plan).is_empty());
}

#[test]
fn test_invalid_inputs_rejected() {
    let zero_weight = PlanRequest::new(PatientInput::new(
        Species::Canine,
        0.0,
        ClinicalState::Maintenance,
    ));
    assert!(zero_weight.compute().is_err());

    let mut zero_window = PlanRequest::new(PatientInput::new(
        Species::Canine,
        10.0,
        ClinicalState::Rehydration,
    ));
    zero_window.periods.rehydration_hours = 0.0;
    assert!(zero_window.compute().is_err());

    let mut zero_bolus_time = PlanRequest::new(PatientInput::new(
        Species::Feline,
        4.0,
        ClinicalState::Shock,
    ));
    zero_bolus_time.resuscitation.bolus_duration_min = 0.0;
    assert!(zero_bolus_time.compute().is_err());
}
