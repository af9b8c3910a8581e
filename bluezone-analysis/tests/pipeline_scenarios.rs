use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use bluezone_analysis::metrics::{
    AVG_DISTANCE_TO_CENTER, DERIVED_METRICS, ELIMINATIONS_PER_ROUND, KILL_VARIANCE,
};
use bluezone_analysis::{
    CompareError, ComparisonSummary, RunRecord, aggregate_runs, build_comparison,
    load_runs_from_dir, select_recent,
};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

fn temp_results(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "bluezone-pipeline-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    fs::create_dir_all(&dir).expect("create results dir");
    dir
}

fn write_run(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(format!("run-{name}.json")), body).expect("write run");
}

fn summary_for(dir: &Path, limit: usize) -> Result<ComparisonSummary> {
    let report = load_runs_from_dir(dir)?;
    Ok(build_comparison(&report.runs, limit)?)
}

#[test]
fn adaptive_vs_random_distance_scenario() -> Result<()> {
    let dir = temp_results("scenario");
    for (idx, distance) in [1.0, 2.0, 3.0].iter().enumerate() {
        let body = json!({
            "mode": "adaptive",
            "timestamp": format!("2025-02-0{}T12:00:00Z", idx + 1),
            "metrics": { "avgDistanceToCenter": distance }
        });
        write_run(&dir, &format!("a{idx}"), &body.to_string());
    }
    for (idx, distance) in [5.0, 7.0].iter().enumerate() {
        let body = json!({
            "mode": "random",
            "timestamp": format!("2025-02-0{}T12:00:00Z", idx + 1),
            "metrics": { "avgDistanceToCenter": distance }
        });
        write_run(&dir, &format!("r{idx}"), &body.to_string());
    }

    let summary = summary_for(&dir, 10)?;
    let distance = summary
        .comparison
        .metric(AVG_DISTANCE_TO_CENTER)
        .expect("distance metric");
    assert_eq!(distance.adaptive.mean, Some(2.0));
    assert_eq!(distance.random.mean, Some(6.0));
    assert_eq!(distance.diff, Some(4.0));
    assert_eq!(summary.comparison.derived.fairness_improvement, Some(-4.0));
    assert_eq!(summary.adaptive_runs.len(), 3);
    assert!(summary.adaptive_runs[0].ends_with("run-a2.json"));
    assert_eq!(summary.random_runs.len(), 2);
    Ok(())
}

#[test]
fn malformed_documents_are_repaired_or_skipped() -> Result<()> {
    let dir = temp_results("repair");
    write_run(
        &dir,
        "adaptive",
        r#"{"mode": "adaptive", "metrics": {"avgDistanceToCenter": 3,14}}"#,
    );
    write_run(&dir, "broken", r#"{"mode": "random", "metrics": {"#);
    write_run(
        &dir,
        "random",
        r#"{"mode": "random", "metrics": {"avgDistanceToCenter": 4.14}}"#,
    );

    let report = load_runs_from_dir(&dir)?;
    assert_eq!(report.runs.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("run-broken.json"));

    let summary = build_comparison(&report.runs, 5)?;
    let distance = summary
        .comparison
        .metric(AVG_DISTANCE_TO_CENTER)
        .expect("distance metric");
    assert_eq!(distance.adaptive.values, vec![Some(3.14)]);
    let diff = distance.diff.expect("diff present");
    assert!((diff - 1.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn non_object_documents_are_skipped_not_counted() -> Result<()> {
    let dir = temp_results("junk");
    write_run(
        &dir,
        "a",
        r#"{"mode": "adaptive", "metrics": {"avgKills": 4}}"#,
    );
    write_run(
        &dir,
        "r",
        r#"{"mode": "random", "metrics": {"avgKills": 2}}"#,
    );
    write_run(&dir, "junk", "[]");
    write_run(
        &dir,
        "players",
        r#"{"mode": "adaptive", "players": [[7, true, 3]]}"#,
    );

    let report = load_runs_from_dir(&dir)?;
    assert_eq!(report.runs.len(), 2);
    let failed: Vec<_> = report
        .failures
        .iter()
        .filter_map(|failure| failure.path.file_name())
        .collect();
    assert_eq!(failed, ["run-junk.json", "run-players.json"]);

    let summary = build_comparison(&report.runs, 10)?;
    assert_eq!(summary.adaptive_runs.len(), 1);
    assert!(summary.adaptive_runs[0].ends_with("run-a.json"));
    let kills = summary
        .comparison
        .metric("avgKills")
        .expect("kills metric");
    assert_eq!(kills.adaptive.mean, Some(4.0));
    assert_eq!((kills.adaptive.count, kills.adaptive.total), (Some(1), 1));
    Ok(())
}

#[test]
fn runs_without_metrics_are_derived_from_players() -> Result<()> {
    let dir = temp_results("derived");
    write_run(
        &dir,
        "adaptive",
        &json!({ "mode": "adaptive", "players": [], "rounds": 0 }).to_string(),
    );
    write_run(
        &dir,
        "random",
        &json!({
            "mode": "random",
            "rounds": 2,
            "winnerLeftId": 1,
            "players": [
                { "id": 1, "alive": true, "kills": 2, "distance": 4 },
                { "id": 2, "alive": false, "kills": 0, "distance": 8 }
            ],
            "metrics": {}
        })
        .to_string(),
    );

    let summary = summary_for(&dir, 3)?;
    for name in DERIVED_METRICS {
        let metric = summary.comparison.metric(name).expect(name);
        assert_eq!(metric.adaptive.mean, Some(0.0), "{name}");
        assert_eq!(metric.adaptive.std, Some(0.0), "{name}");
    }
    let eliminations = summary
        .comparison
        .metric(ELIMINATIONS_PER_ROUND)
        .expect("eliminations");
    assert_eq!(eliminations.random.mean, Some(0.5));
    assert_eq!(summary.comparison.derived.stability_gain, Some(-1.0));
    Ok(())
}

#[test]
fn heterogeneous_metric_sets_keep_presence_counts() -> Result<()> {
    let dir = temp_results("hetero");
    write_run(
        &dir,
        "a1",
        r#"{"mode": "adaptive", "timestamp": "2025-01-01T00:00:00Z", "metrics": {"killVariance": 2.0, "extra": 1}}"#,
    );
    write_run(
        &dir,
        "a2",
        r#"{"mode": "adaptive", "timestamp": "2025-01-02T00:00:00Z", "metrics": {"killVariance": 4.0}}"#,
    );
    write_run(
        &dir,
        "r1",
        r#"{"mode": "random", "timestamp": "2025-01-02T00:00:00Z", "metrics": {"killVariance": 1.0, "randomOnly": "x"}}"#,
    );

    let summary = summary_for(&dir, 10)?;
    let extra = summary.comparison.metric("extra").expect("extra");
    assert_eq!(extra.adaptive.count, Some(1));
    assert_eq!(extra.adaptive.total, 2);
    assert_eq!(extra.adaptive.values, vec![None, Some(1.0)]);
    assert_eq!(extra.diff, None);

    let random_only = summary.comparison.metric("randomOnly").expect("randomOnly");
    assert_eq!(random_only.random.count, Some(0));
    assert_eq!(random_only.random.mean, None);
    assert_eq!(random_only.adaptive.count, None);

    let variance = summary.comparison.metric(KILL_VARIANCE).expect("variance");
    assert_eq!(variance.adaptive.mean, Some(3.0));
    assert_eq!(variance.adaptive.std, Some(1.0));
    assert_eq!(summary.comparison.derived.stability_gain, Some(2.0));
    Ok(())
}

#[test]
fn permuting_distinctly_dated_runs_changes_nothing() {
    let runs: Vec<RunRecord> = (0..12)
        .map(|idx| {
            let mode = if idx % 3 == 0 { "random" } else { "adaptive" };
            RunRecord::from_value(json!({
                "mode": mode,
                "timestamp": format!("2025-03-{:02}T08:00:00Z", idx + 1),
                "metrics": { "avgKills": f64::from(idx) * 0.75, "idx": idx }
            }))
            .expect("valid run")
        })
        .collect();

    let baseline = select_recent(&runs, 4);
    let baseline_stats: Vec<_> = baseline
        .values()
        .map(|selected| aggregate_runs(selected.iter().copied()))
        .collect();

    let mut rng = ChaCha8Rng::seed_from_u64(0x00B1_7E20);
    for _ in 0..8 {
        let mut shuffled = runs.clone();
        shuffled.shuffle(&mut rng);
        let groups = select_recent(&shuffled, 4);
        assert_eq!(
            groups.keys().collect::<Vec<_>>(),
            baseline.keys().collect::<Vec<_>>()
        );
        for ((mode, selected), expected) in groups.iter().zip(&baseline_stats) {
            let idx_of = |run: &&RunRecord| run.metrics().and_then(|m| m.get("idx")).cloned();
            let picked: Vec<_> = selected.iter().map(idx_of).collect();
            let wanted: Vec<_> = baseline[mode].iter().map(idx_of).collect();
            assert_eq!(picked, wanted, "{mode}");

            let stats = aggregate_runs(selected.iter().copied());
            for (name, aggregate) in &stats {
                let reference = &expected[name];
                let (mean, reference_mean) = (aggregate.mean.unwrap(), reference.mean.unwrap());
                let (std, reference_std) = (aggregate.std.unwrap(), reference.std.unwrap());
                assert!((mean - reference_mean).abs() < 1e-9);
                assert!((std - reference_std).abs() < 1e-9);
                assert_eq!(aggregate.count + aggregate.missing(), aggregate.total);
            }
        }
    }
}

#[test]
fn single_mode_results_are_terminal() -> Result<()> {
    let dir = temp_results("single-mode");
    write_run(&dir, "a", r#"{"metrics": {"avgKills": 1}}"#);
    let report = load_runs_from_dir(&dir)?;
    let err = build_comparison(&report.runs, 5).unwrap_err();
    let CompareError::MissingModes { found, .. } = err;
    assert_eq!(found, vec!["adaptive".to_string()]);
    Ok(())
}
