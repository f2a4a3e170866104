use factbench::{
    fac_iter, fac_rec, measure_rounds, register_workloads, try_measure_rounds, BenchRunner,
    BenchmarkConfig, HarnessError, RunnerConfig, SuiteResult, Variant, WorkloadError,
};

#[test]
fn noop_workload_end_to_end() {
    let config = BenchmarkConfig::new(1000, 5).unwrap();
    let rounds = measure_rounds(&config, || {});

    assert_eq!(rounds.as_slice().len(), 5);
    assert!(rounds.as_slice().iter().all(|&us| us >= 0.0));

    let summary = rounds.summary().unwrap();
    // a no-op costs well under a microsecond per call on any machine
    assert!(summary.mean < 1.0, "mean {}µs", summary.mean);
    assert!(summary.stdev().unwrap() < 1.0);
}

#[test]
fn single_round_has_no_stdev() {
    let config = BenchmarkConfig::new(10, 1).unwrap();
    let summary = measure_rounds(&config, || fac_iter(10)).summary().unwrap();
    assert_eq!(
        summary.stdev(),
        Err(HarnessError::InsufficientSamples { got: 1 })
    );
}

#[test]
fn invalid_configs_are_rejected() {
    for (repeats, rounds) in [(0, 1), (1, 0), (-5, 1), (1, -5), (0, 0)] {
        assert!(
            matches!(
                BenchmarkConfig::new(repeats, rounds),
                Err(HarnessError::InvalidConfig { .. })
            ),
            "({repeats}, {rounds}) accepted"
        );
    }
}

#[test]
fn depth_failure_propagates_out_of_harness() {
    let config = BenchmarkConfig::new(3, 3).unwrap();
    let result = try_measure_rounds(&config, || fac_rec(200, 100));
    assert_eq!(
        result,
        Err(WorkloadError::DepthExceeded {
            n: 200,
            max_depth: 100
        })
    );
}

#[test]
fn suite_writes_json_that_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunnerConfig::new()
        .bench(BenchmarkConfig::new(20, 3).unwrap())
        .output_dir(dir.path())
        .verbose(false)
        .git_sha("abc123");

    let mut runner = BenchRunner::with_config("factorial", config);
    register_workloads(&mut runner, &Variant::ALL, 50, 100).unwrap();
    let suite = runner.finish();
    assert_eq!(suite.results.len(), 3);

    let loaded = SuiteResult::load(dir.path().join("factorial.json")).unwrap();
    let names: Vec<_> = loaded.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "factorial/fac_iter(50)",
            "factorial/fac_while(50)",
            "factorial/fac_rec(50)"
        ]
    );
    assert_eq!(loaded.git_sha.as_deref(), Some("abc123"));
    for r in &loaded.results {
        assert_eq!(r.rounds(), 3);
        assert_eq!(r.repeats, 20);
        assert!(r.summary.stdev().is_ok());
    }
}

#[test]
fn register_stops_at_first_failing_variant() {
    let config = RunnerConfig::new()
        .bench(BenchmarkConfig::new(1, 1).unwrap())
        .verbose(false);
    let mut runner = BenchRunner::with_config("factorial", config);
    runner.reporters(vec![]);

    let err = register_workloads(&mut runner, &[Variant::Iter, Variant::Rec], 500, 100)
        .unwrap_err();
    assert!(matches!(err, WorkloadError::DepthExceeded { n: 500, .. }));
    assert_eq!(runner.finish().results.len(), 1);
}
