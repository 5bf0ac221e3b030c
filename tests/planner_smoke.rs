mod fixtures;

use restoration_planner::execution::PhaseWarning;
use restoration_planner::model::BuildingCategory;
use restoration_planner::rates::StandardRates;
use restoration_planner::records::NetworkRecord;
use restoration_planner::{plan, PlannerError, PlannerOptions};

use fixtures::{district, incident};

#[test]
fn incident_plan_end_to_end() {
    let result = plan(incident().records(), &StandardRates::default(), &PlannerOptions::default()).unwrap();

    let phases: Vec<(&str, u8)> = result
        .phased
        .iter()
        .map(|p| (p.entry.building_id.as_str(), p.phase))
        .collect();
    assert_eq!(phases, vec![("H", 0), ("S", 3), ("R", 4)]);

    let report = &result.report;
    let emergency = report.phase(0).unwrap();
    assert_eq!(emergency.phase_cost, 50_000.0);
    assert_eq!(emergency.phase_duration, 240.0);
    assert_eq!(emergency.phase_workers, 20);
    assert!(matches!(
        &emergency.warnings[..],
        [PhaseWarning::GeneratorAutonomyExceeded { building_id, .. }] if building_id == "H"
    ));

    assert_eq!(report.phase(3).unwrap().phase_workers, 40);
    assert_eq!(report.phase(4).unwrap().phase_duration, 100.0);
    assert_eq!(report.total_cost, 105_500.0);
    assert_eq!(report.total_duration, 540.0);
    assert_eq!(report.houses_reconnected, 17);
}

#[test]
fn phase_cost_conserves_plan_cost() {
    let result = plan(district(50).records(), &StandardRates::default(), &PlannerOptions::default()).unwrap();

    let phase_total: f64 = result.report.phases.iter().map(|p| p.phase_cost).sum();
    let plan_total = result.plan.total_cost();
    assert!((phase_total - plan_total).abs() < 1e-6 * plan_total.max(1.0));
    assert_eq!(result.phased.len(), result.plan.entries.len());
}

#[test]
fn phase_zero_holds_exactly_the_hospitals() {
    let result = plan(district(50).records(), &StandardRates::default(), &PlannerOptions::default()).unwrap();

    for phased in &result.phased {
        let is_hospital = phased.entry.category == BuildingCategory::Hospital;
        assert_eq!(phased.phase == 0, is_hospital, "{}", phased.entry.building_id);
    }
    let hospitals = result
        .plan
        .entries
        .iter()
        .filter(|e| e.category == BuildingCategory::Hospital)
        .count();
    assert_eq!(result.report.phase(0).map(|p| p.buildings.len()), Some(hospitals));
}

#[test]
fn schema_error_rejects_batch() {
    let rows: Vec<NetworkRecord> = serde_json::from_str(
        r#"[
            {"id_batiment": "B1", "type_batiment": "école", "nb_maisons": 3,
             "infra_id": "I1", "infra_type": "a_remplacer", "type_infra": "aerien", "longueur": 12.5},
            {"id_batiment": "B2", "type_batiment": "habitation", "nb_maisons": 1,
             "infra_id": "I2", "infra_type": "a_remplacer", "longueur": 4.0}
        ]"#,
    )
    .unwrap();

    let err = plan(&rows, &StandardRates::default(), &PlannerOptions::default()).unwrap_err();
    assert_eq!(err, PlannerError::MissingField { row: 1, field: "material" });
}

#[test]
fn large_house_counts_are_tallied_without_wrapping() {
    let rows = vec![
        NetworkRecord::new("B1", "habitation", 3_000_000_000, "I1", "a_remplacer", "aerien", 10.0),
        NetworkRecord::new("B1", "habitation", 3_000_000_000, "I2", "a_remplacer", "aerien", 10.0),
        NetworkRecord::new("B2", "habitation", 2_000_000_000, "I3", "a_remplacer", "aerien", 10.0),
    ];
    let result = plan(&rows, &StandardRates::default(), &PlannerOptions::default()).unwrap();

    assert_eq!(result.plan.houses_reconnected(), 8_000_000_000);
    assert_eq!(result.report.houses_reconnected, 8_000_000_000);
    assert_eq!(result.report.peak_workers, 24_000_000_000);
}

#[test]
fn worker_overflow_returns_error() {
    let rows = vec![
        NetworkRecord::new("B1", "habitation", i64::from(u32::MAX), "I1", "a_remplacer", "aerien", 10.0),
        NetworkRecord::new("B1", "habitation", i64::from(u32::MAX), "I2", "a_remplacer", "aerien", 10.0),
    ];
    let mut options = PlannerOptions::default();
    options.execution.workers_per_house = u32::MAX;

    let err = plan(&rows, &StandardRates::default(), &options).unwrap_err();
    assert!(matches!(
        &err,
        PlannerError::Overflow { quantity: "workers", building, .. } if building == "B1"
    ));
}

#[test]
fn options_load_with_partial_overrides() {
    let options: PlannerOptions = serde_json::from_str(
        r#"{"execution": {"generator_autonomy_hours": 500.0}, "phases": {"thresholds": [0.5, 0.7, 0.9]}}"#,
    )
    .unwrap();
    assert_eq!(options.execution.workers_per_house, 4);
    assert_eq!(options.score.epsilon, 1e-6);

    let result = plan(incident().records(), &StandardRates::default(), &options).unwrap();
    assert_eq!(result.report.warnings().count(), 0);
}

#[test]
fn empty_input_gives_empty_report() {
    let result = plan(&[], &StandardRates::default(), &PlannerOptions::default()).unwrap();
    assert!(result.plan.entries.is_empty());
    assert!(result.phased.is_empty());
    assert!(result.report.phases.is_empty());
    assert_eq!(result.report.total_cost, 0.0);
}
