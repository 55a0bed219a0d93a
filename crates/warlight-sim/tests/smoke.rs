use std::fs;
use std::path::Path;

use warlight_sim::config::SimConfig;
use warlight_sim::replay::{ReplayRunner, RunnerError};

const MAP_JSON: &str = r#"{
    "id": 1,
    "name": "pair of bonuses",
    "territories": [
        { "id": 1, "connected_to": [2] },
        { "id": 2, "connected_to": [1, 3] },
        { "id": 3, "connected_to": [2, 4] },
        { "id": 4, "connected_to": [3] }
    ],
    "bonuses": [
        { "id": 1, "name": "west", "territories": [1, 2], "amount": 5 },
        { "id": 2, "name": "east", "territories": [3, 4], "amount": 3 }
    ]
}"#;

const STANDINGS: &str = r#"{"turn":1,"territories":{"1":{"owner":{"kind":"owned_by","player":10},"armies":5},"2":{"owner":{"kind":"neutral"},"armies":2},"3":{"owner":{"kind":"owned_by","player":20},"armies":5},"4":{"owner":{"kind":"owned_by","player":20},"armies":5}}}

{"turn":2,"territories":{"1":{"owner":{"kind":"owned_by","player":10},"armies":5},"2":{"owner":{"kind":"owned_by","player":10},"armies":3},"3":{"owner":{"kind":"owned_by","player":20},"armies":6},"4":{"owner":{"kind":"fogged"}}}}
{"turn":3,"territories":{"1":{"owner":{"kind":"owned_by","player":10},"armies":5},"2":{"owner":{"kind":"owned_by","player":10},"armies":8},"3":{"owner":{"kind":"fogged"}},"4":{"owner":{"kind":"fogged"}}}}
"#;

fn write_inputs(dir: &Path, bot: &str) -> std::path::PathBuf {
    fs::write(dir.join("map.json"), MAP_JSON).unwrap();
    fs::write(dir.join("turns.jsonl"), STANDINGS).unwrap();
    let yaml = format!(
        r#"
run_id: "smoke"
map: "map.json"
standings: "turns.jsonl"
bot: "{bot}"
perspective:
  me: 10
settings:
  minimum_army_bonus: 5
income: 6
outputs:
  jsonl: "{out}"
"#,
        out = dir.join("out").join("{run_id}.jsonl").display()
    );
    let config_path = dir.join("replay.yaml");
    fs::write(&config_path, yaml).unwrap();
    config_path
}

#[test]
fn pybot_replay_writes_one_row_per_turn() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = write_inputs(dir.path(), "pybot");
    let config = SimConfig::from_path(&config_path).expect("config loads");
    let outputs = config.resolved_outputs();

    let runner = ReplayRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("replay completes");

    assert_eq!(summary.turns_played, 3);
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.jsonl_path, dir.path().join("out").join("smoke.jsonl"));
    // East stays frozen at enemy-held under fog: 5 + 3.
    assert_eq!(summary.final_enemy_income, Some(8.0));

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let rows: Vec<serde_json::Value> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).expect("row decodes"))
        .collect();
    assert_eq!(rows.len(), 3);
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(row["turn"], index as u64 + 1);
        assert_eq!(row["bot"], "PyBot");
        assert_eq!(row["armies_deployed"], 6);
        assert_eq!(row["estimated_income"], 8.0);
    }
    assert_eq!(rows[0]["visible_enemy"], 2);
    assert_eq!(rows[2]["fogged"], 2);
    assert_eq!(rows[2]["mean_probability"], 0.5);
}

#[test]
fn bots_without_tracker_report_no_estimate() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = write_inputs(dir.path(), "WUNDERWAFFE");
    let config = SimConfig::from_path(&config_path).expect("config loads");
    let outputs = config.resolved_outputs();

    let summary = ReplayRunner::new(config, outputs)
        .expect("runner created")
        .run()
        .expect("replay completes");
    assert_eq!(summary.final_enemy_income, None);

    let jsonl = fs::read_to_string(&summary.jsonl_path).unwrap();
    let last: serde_json::Value = serde_json::from_str(jsonl.lines().last().unwrap()).unwrap();
    assert!(last["estimated_income"].is_null());
    assert_eq!(last["orders"][0]["territory"], 2);
}

#[test]
fn unknown_bot_is_a_configuration_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = write_inputs(dir.path(), "Foo");
    let err = SimConfig::from_path(&config_path).expect_err("Foo is not registered");
    let message = err.to_string();
    assert!(message.contains("no bot found named Foo"));
    assert!(message.contains("PyBot, Wunderwaffe, Prod, ProdRandom, Cowzow"));

    let mut config: SimConfig =
        serde_yaml::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
    config.map = dir.path().join("map.json");
    let outputs = config.resolved_outputs();
    assert!(matches!(
        ReplayRunner::new(config, outputs),
        Err(RunnerError::Factory(_))
    ));
}
