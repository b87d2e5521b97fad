use colony_tnr::{
    error::ErrorKind,
    monte_carlo::OrchestratorSettings,
    params::{
        BreedingParams, ColonySeed, EnvironmentParams, ParameterSet, ParameterSetBuilder,
        SurvivalParams,
    },
    report::{project, ProjectionReport, SingleRunReport},
    simulator::SingleRunSimulator,
};

/// Fifty unsterilized cats, equal cause risks, no intervention.
fn baseline() -> ParameterSetBuilder {
    ParameterSet::builder()
        .colony(ColonySeed::new(50.0, 0.0))
        .survival(SurvivalParams {
            urban_risk: 0.1,
            disease_risk: 0.1,
            natural_risk: 0.1,
            ..Default::default()
        })
        .months(24)
        .monthly_sterilization_rate(0.0)
}

fn single_run(params: &ParameterSet) -> SingleRunReport {
    match project(params, OrchestratorSettings::default()).unwrap() {
        ProjectionReport::SingleRun(report) => report,
        other => panic!("expected a single run, got {other:?}"),
    }
}

#[test]
fn unmanaged_colony_grows() {
    let report = single_run(&baseline().build().unwrap());
    assert!(report.final_population > 50.0);
    assert_eq!(report.final_sterilized, 0.0);
    assert_eq!(report.total_cost, 0.0);
    assert_eq!(report.monthly_populations.len(), 25);
    assert!(report.total_births > 0.0);
}

#[test]
fn sterilization_slows_growth() {
    let unmanaged = single_run(&baseline().build().unwrap());
    let managed = single_run(&baseline().monthly_sterilization_rate(10.0).build().unwrap());

    assert!(managed.final_sterilized > 0.0);
    assert!(managed.population_growth <= unmanaged.population_growth);
    assert!(managed.total_births < unmanaged.total_births);
    assert!(managed.total_cost > 0.0);
}

#[test]
fn intervention_cost_accumulates_per_procedure() {
    let params = baseline().monthly_sterilization_rate(2.0).months(12).build().unwrap();
    let report = single_run(&params);
    for pair in report.monthly_costs.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    // A colony of fifty never runs out of reproductive cats at two a month.
    let expected = 12.0 * 2.0 * params.intervention().sterilization_cost;
    assert!((report.total_cost - expected).abs() < 1e-6);
}

#[test]
fn sterilized_tally_never_falls_without_intervention() {
    let params = baseline()
        .colony(ColonySeed::new(50.0, 20.0))
        .build()
        .unwrap();
    let run = SingleRunSimulator::new().run(&params).unwrap();
    let report = SingleRunReport::from_run(&run).unwrap();

    for pair in report.monthly_sterilized.windows(2) {
        assert!(pair[1] >= pair[0], "sterilized_count fell: {} -> {}", pair[0], pair[1]);
    }
    assert_eq!(report.final_sterilized, 20.0);
    // The living sterile adults still die off.
    let living = &report.monthly_sterile_adults;
    assert_eq!(living[0], 20.0);
    assert!(living[24] < 20.0);
    let last = run.final_state().unwrap();
    assert!(
        (last.current_size - (last.sterile_adults + last.reproductive_count + last.kitten_count))
            .abs()
            < 1e-9
    );
}

#[test]
fn fully_sterilized_single_cat_never_breeds() {
    for rate in [0.0, 0.5, 1.0] {
        let params = ParameterSet::builder()
            .colony(ColonySeed::new(1.0, 1.0))
            .breeding(BreedingParams {
                breeding_rate: rate,
                ..Default::default()
            })
            .months(36)
            .build()
            .unwrap();
        let report = single_run(&params);
        assert_eq!(report.total_births, 0.0);
        assert!(report.monthly_births.iter().all(|births| *births == 0.0));
        assert!(report.monthly_kittens.iter().all(|kittens| *kittens == 0.0));
    }
}

#[test]
fn one_month_horizon_returns_only_the_seed() {
    let params = baseline().months(1).build().unwrap();
    let run = SingleRunSimulator::new().run(&params).unwrap();
    assert_eq!(run.snapshots.len(), 1);
    assert_eq!(run.final_population, 50.0);
    assert_eq!(run.total_deaths, 0.0);
    assert_eq!(run.population_growth, 0.0);
}

#[test]
fn zero_territory_is_rejected_before_simulation() {
    let err = baseline()
        .environment(EnvironmentParams {
            territory_size: 0.0,
            ..Default::default()
        })
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(err.field(), Some("territory_size"));
}

#[test]
fn out_of_range_horizon_is_rejected() {
    for months in [0, 121] {
        let err = baseline().months(months).build().unwrap_err();
        assert_eq!(err.field(), Some("months"));
    }
}

#[test]
fn sterilized_cannot_exceed_colony() {
    let err = ParameterSet::builder()
        .colony(ColonySeed::new(10.0, 11.0))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn single_runs_are_bit_identical() {
    let params = baseline().monthly_sterilization_rate(3.5).build().unwrap();
    let simulator = SingleRunSimulator::new();
    assert_eq!(simulator.run(&params).unwrap(), simulator.run(&params).unwrap());
}

#[test]
fn crowding_caps_the_colony() {
    let roomy = baseline()
        .environment(EnvironmentParams {
            base_food_capacity: 400.0,
            ..Default::default()
        })
        .build()
        .unwrap();
    let crowded = baseline()
        .environment(EnvironmentParams {
            base_food_capacity: 10.0,
            food_scaling_factor: 0.0,
            ..Default::default()
        })
        .build()
        .unwrap();
    let roomy = single_run(&roomy);
    let crowded = single_run(&crowded);
    assert!(crowded.final_population < roomy.final_population);
}
