use std::path::PathBuf;

use colony_tnr::{
    report::{project, ProjectionReport},
    scenario::ScenarioLoader,
};

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario_path() -> PathBuf {
    PathBuf::from("scenarios/riverside_colony.yaml")
}

#[test]
fn fixture_loads_and_validates() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    assert_eq!(scenario.name, "riverside_colony");
    assert!(scenario.description.is_some());

    let params = scenario.parameters().unwrap();
    assert_eq!(params.colony().current_size, 50.0);
    assert_eq!(params.control().months, 24);
    assert!(!params.is_monte_carlo());
    assert!((params.environment().carrying_capacity() - 100.0).abs() < 1e-9);
    assert_eq!(scenario.settings().seed, 2024);
}

#[test]
fn fixture_projects_a_growing_colony() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let report = project(&scenario.parameters().unwrap(), scenario.settings()).unwrap();
    match report {
        ProjectionReport::SingleRun(run) => {
            assert!(run.final_population > 50.0);
            assert_eq!(run.monthly_populations.len(), 25);
        }
        other => panic!("expected a single run, got {other:?}"),
    }
}

#[test]
fn fixture_can_be_switched_to_monte_carlo() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let mut control = scenario.control;
    control.use_monte_carlo = true;
    control.num_simulations = 64;
    let params = scenario.builder().control(control).build().unwrap();

    let report = project(&params, scenario.settings()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["mode"], "monte_carlo");
    assert_eq!(json["num_simulations"], 64);
    assert!(json["final_population"]["ci_upper"].as_f64().unwrap() > 0.0);
    assert_eq!(json["monthly_populations"].as_array().unwrap().len(), 25);
}
