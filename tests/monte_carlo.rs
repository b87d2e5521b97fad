use colony_tnr::{
    aggregate::{MetricSummary, ResultAggregator},
    monte_carlo::{MonteCarloOrchestrator, OrchestratorSettings},
    params::{ColonySeed, ParameterSet, SurvivalParams},
    report::{project, MonteCarloReport, ProjectionReport},
};

fn ensemble(num_simulations: u32, variation_coefficient: f64) -> ParameterSet {
    ParameterSet::builder()
        .colony(ColonySeed::new(50.0, 0.0))
        .survival(SurvivalParams {
            urban_risk: 0.1,
            disease_risk: 0.1,
            natural_risk: 0.1,
            ..Default::default()
        })
        .months(24)
        .monte_carlo(num_simulations, variation_coefficient)
        .build()
        .unwrap()
}

fn monte_carlo(params: &ParameterSet, seed: u64) -> MonteCarloReport {
    let settings = OrchestratorSettings {
        seed,
        ..Default::default()
    };
    match project(params, settings).unwrap() {
        ProjectionReport::MonteCarlo(report) => report,
        other => panic!("expected a Monte Carlo report, got {other:?}"),
    }
}

fn assert_brackets_mean(name: &str, summary: &MetricSummary) {
    assert!(
        summary.ci_lower <= summary.mean && summary.mean <= summary.ci_upper,
        "{name}: {summary:?}"
    );
    assert!(summary.std >= 0.0, "{name}: {summary:?}");
}

#[test]
fn confidence_bands_bracket_the_mean() {
    let report = monte_carlo(&ensemble(500, 0.2), 2024);
    let aggregate = &report.aggregate;
    assert_eq!(report.num_simulations, 500);
    assert_eq!(aggregate.num_runs, 500);

    let varying = [
        ("final_population", &aggregate.final_population),
        ("total_deaths", &aggregate.total_deaths),
        ("total_births", &aggregate.total_births),
        ("kitten_deaths", &aggregate.kitten_deaths),
        ("adult_deaths", &aggregate.adult_deaths),
        ("natural_deaths", &aggregate.natural_deaths),
        ("urban_deaths", &aggregate.urban_deaths),
        ("disease_deaths", &aggregate.disease_deaths),
        ("population_growth", &aggregate.population_growth),
    ];
    for (name, summary) in varying {
        assert_brackets_mean(name, summary);
        assert!(summary.ci_upper > summary.ci_lower, "{name}: {summary:?}");
    }
    assert_brackets_mean("total_cost", &aggregate.total_cost);
    assert_brackets_mean("final_sterilized", &aggregate.final_sterilized);

    for series in [
        &aggregate.monthly_populations,
        &aggregate.monthly_sterilized,
        &aggregate.monthly_sterile_adults,
        &aggregate.monthly_reproductive,
        &aggregate.monthly_kittens,
        &aggregate.monthly_costs,
        &aggregate.monthly_births,
    ] {
        assert_eq!(series.len(), 25);
        for summary in series {
            assert_brackets_mean("monthly", summary);
        }
    }
    for summary in &aggregate.monthly_populations[3..] {
        assert!(summary.ci_upper > summary.ci_lower);
    }
}

#[test]
fn fractional_seed_is_bracketed_exactly() {
    let params = ParameterSet::builder()
        .colony(ColonySeed::new(50.0, 0.1))
        .months(24)
        .monte_carlo(500, 0.2)
        .build()
        .unwrap();
    let report = monte_carlo(&params, 2024);
    let seeded = &report.aggregate.monthly_sterilized[0];
    assert_eq!(seeded.mean, 0.1);
    assert_eq!(seeded.std, 0.0);
    assert_eq!((seeded.ci_lower, seeded.ci_upper), (0.1, 0.1));
    for summary in &report.aggregate.monthly_sterilized {
        assert_brackets_mean("monthly_sterilized", summary);
    }
}

#[test]
fn seeded_month_has_no_spread() {
    let report = monte_carlo(&ensemble(200, 0.3), 5);
    let seed_month = &report.aggregate.monthly_populations[0];
    assert_eq!(seed_month.mean, 50.0);
    assert_eq!(seed_month.std, 0.0);
    assert_eq!(seed_month.ci_width(), 0.0);
}

#[test]
fn wider_variation_never_narrows_the_band() {
    let widths: Vec<f64> = [0.0, 0.05, 0.15, 0.3]
        .into_iter()
        .map(|cv| {
            monte_carlo(&ensemble(500, cv), 77)
                .aggregate
                .final_population
                .ci_width()
        })
        .collect();
    assert_eq!(widths[0], 0.0);
    for pair in widths.windows(2) {
        assert!(pair[1] >= pair[0], "{widths:?}");
    }
}

#[test]
fn same_seed_reproduces_the_ensemble() {
    let params = ensemble(150, 0.2);
    let a = monte_carlo(&params, 31);
    let b = monte_carlo(&params, 31);
    let c = monte_carlo(&params, 32);
    assert_eq!(a, b);
    assert_ne!(
        a.aggregate.final_population.mean,
        c.aggregate.final_population.mean
    );
}

#[test]
fn aggregate_is_independent_of_completion_order() {
    let params = ensemble(96, 0.25);
    let orchestrator = MonteCarloOrchestrator::new(OrchestratorSettings {
        workers: Some(3),
        parallel_threshold: 1,
        ..Default::default()
    })
    .unwrap();
    let mut runs = orchestrator.run(&params).unwrap();
    let aggregator = ResultAggregator::new();
    let ordered = aggregator.aggregate(&runs).unwrap();

    runs.sort_by(|a, b| b.final_population.total_cmp(&a.final_population));
    let shuffled = aggregator.aggregate(&runs).unwrap();
    assert_eq!(ordered.final_population.ci_lower, shuffled.final_population.ci_lower);
    assert_eq!(ordered.final_population.ci_upper, shuffled.final_population.ci_upper);
    assert!((ordered.final_population.mean - shuffled.final_population.mean).abs() < 1e-9);
    for (a, b) in ordered
        .monthly_populations
        .iter()
        .zip(shuffled.monthly_populations.iter())
    {
        assert_eq!(a.ci_lower, b.ci_lower);
        assert_eq!(a.ci_upper, b.ci_upper);
    }
}

#[test]
fn mortality_breakdown_follows_cause_risks() {
    let report = monte_carlo(&ensemble(100, 0.1), 8);
    let mortality = &report.aggregate.mortality;
    let causes =
        mortality.natural_share.mean + mortality.urban_share.mean + mortality.disease_share.mean;
    assert!((causes - 1.0).abs() < 1e-9);
    assert!(mortality.kitten_share.mean > 0.0);
    assert!(mortality.kitten_share.ci_upper <= 1.0);
}
