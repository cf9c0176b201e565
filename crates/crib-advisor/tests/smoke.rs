use std::fs;

use crib_advisor::config::AdvisorConfig;
use crib_advisor::runner::AdvisorRunner;
use tempfile::tempdir;

fn load_config(output_dir: &std::path::Path, format: &str) -> AdvisorConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
hands:
  - "5H 5C JD 4S 6C KH"
  - "ah 2c 3d 4s 9h kd"
analysis:
  cut_mode: "fixed"
  parallel: true
output:
  format: "{format}"
  path: "{report}"
logging:
  enable_structured: false
"#,
        report = output_dir.join("{run_id}").join("report.out").display(),
    );

    let mut cfg: AdvisorConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

#[test]
fn text_report_lists_every_discard() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), "text");
    let outputs = config.resolved_outputs();
    let expected_path = dir.path().join("test_smoke").join("report.out");
    assert_eq!(outputs.report.as_deref(), Some(expected_path.as_path()));

    let runner = AdvisorRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("analysis completes");
    assert_eq!(summary.hands_analyzed, 2);
    assert_eq!(summary.discards_evaluated, 30);

    let text = fs::read_to_string(&expected_path).expect("report readable");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 34);
    assert_eq!(lines[0], "[ 5H 5C JD 4S 6C KH ]");
    assert_eq!(lines[12], "JD KH [19.4 0.5 12..40] [11.5 0.2 -1..19]");
    assert_eq!(lines[16], "");
    assert_eq!(lines[17], "[ AH 2C 3D 4S 9H KD ]");
    assert_eq!(lines[18].split(' ').take(2).collect::<Vec<_>>(), ["AH", "2C"]);
}

#[test]
fn json_report_writes_one_row_per_discard() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), "json");
    let outputs = config.resolved_outputs();
    let runner = AdvisorRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("analysis completes");

    let report_path = summary.report_path.expect("report path");
    let jsonl = fs::read_to_string(report_path).expect("report readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes to JSON"))
        .collect();
    assert_eq!(rows.len(), 30);
    assert!(rows.iter().all(|row| row["run_id"] == "test_smoke"));
    assert!(rows.iter().all(|row| row["samples"] == 15_180));
    assert_eq!(rows[15]["hand"], "AH 2C 3D 4S 9H KD");

    for hand_rows in rows.chunks(15) {
        let dealer_picks = hand_rows.iter().filter(|row| row["dealer_pick"] == true).count();
        let pone_picks = hand_rows.iter().filter(|row| row["pone_pick"] == true).count();
        assert_eq!((dealer_picks, pone_picks), (1, 1));
    }

    let first = &rows[0];
    assert_eq!(first["discard"], "5H 5C");
    assert_eq!(first["keep"], "JD 4S 6C KH");
    assert_eq!(first["mine"]["stats"]["min"], 2);
    assert_eq!(first["theirs"]["stats"]["max"], 3);
}

#[test]
fn markdown_report_recommends_discards() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), "markdown");
    let outputs = config.resolved_outputs();
    let runner = AdvisorRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("analysis completes");
    assert_eq!(summary.recommendations.len(), 2);
    assert_eq!(summary.recommendations[0].dealer.as_deref(), Some("JD KH"));

    let markdown =
        fs::read_to_string(summary.report_path.expect("report path")).expect("report readable");
    assert!(markdown.starts_with("# Discard analysis `test_smoke`"));
    assert_eq!(markdown.matches("## Hand `").count(), 2);
    assert!(markdown.contains("- Dealer: discard **JD KH**"));
}
