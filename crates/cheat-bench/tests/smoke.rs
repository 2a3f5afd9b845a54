use std::fs;

use cheat_bench::config::BenchConfig;
use cheat_bench::runner::SeriesRunner;
use tempfile::tempdir;

fn load_config(output_dir: &std::path::Path) -> BenchConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
games:
  seed: 4242
  count: 6
  max_turns: 2000
agents:
  - name: "steady"
    kind: "basic"
  - name: "counter"
    kind: "thinker"
  - name: "shark"
    kind: "master"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("games.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn a_short_series_writes_rows_and_a_summary() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path());
    let outputs = config.resolved_outputs();

    let runner = SeriesRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("series completes");

    assert_eq!(summary.games_played, 6);
    assert_eq!(summary.rows_written, 6 * 3);

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let mut rows = 0;
    for line in jsonl.lines() {
        let value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        assert_eq!(value["run_id"], "test_smoke");
        assert!(value["game_seed"].as_u64().is_some());
        assert!(value["turns"].as_u64().is_some());
        assert!(value["agent"].as_str().is_some());
        rows += 1;
    }
    assert_eq!(rows, summary.rows_written);

    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    assert!(markdown.contains("# Series Summary"));
    assert!(markdown.contains("| steady |"));
    assert!(markdown.contains("| counter |"));
    assert!(markdown.contains("| shark |"));
}

#[test]
fn the_same_seed_writes_identical_rows() {
    let first_dir = tempdir().expect("temp dir");
    let second_dir = tempdir().expect("temp dir");

    let first = {
        let config = load_config(first_dir.path());
        let outputs = config.resolved_outputs();
        let runner = SeriesRunner::new(config, outputs).expect("runner created");
        runner.run().expect("series completes")
    };
    let second = {
        let config = load_config(second_dir.path());
        let outputs = config.resolved_outputs();
        let runner = SeriesRunner::new(config, outputs).expect("runner created");
        runner.run().expect("series completes")
    };

    let first_rows = fs::read_to_string(&first.jsonl_path).expect("first jsonl");
    let second_rows = fs::read_to_string(&second.jsonl_path).expect("second jsonl");
    assert_eq!(first_rows, second_rows);
}
