use std::process::Command;

const RULES: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../boardsim-game/data/golden_key.yaml"
);

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "boardsim-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run_json(extra: &[&str]) -> serde_json::Value {
    let exe = env!("CARGO_BIN_EXE_boardsim-runner");
    let output = Command::new(exe)
        .args(["--rules", RULES, "--report", "json", "-n", "12"])
        .args(extra)
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json report")
}

#[test]
fn cli_list_strategies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_boardsim-runner");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available strategies"));
    assert!(content.contains("expert"));
    assert!(content.contains("passive"));
    assert!(content.contains("Agent profiles"));
    assert!(content.contains("conservative"));
}

#[test]
fn cli_pits_profiles_from_a_file_against_presets() {
    let profiles_path = temp_path("profiles");
    std::fs::write(
        &profiles_path,
        "profiles:\n  gambler:\n    description: bets on everything\n    traits: { risk_tolerance: 1.0, bluff_tendency: 0.0 }\n",
    )
    .expect("write profiles");
    let profiles = profiles_path.to_string_lossy().into_owned();
    let report = run_json(&["--profiles", &profiles, "--p1", "gambler", "--p2", "aggressive"]);
    assert_eq!(report["agent_a"], "gambler");
    assert_eq!(report["agent_b"], "aggressive");
    assert_eq!(report["batches"][0]["stats"]["games_played"], 12);
    let _ = std::fs::remove_file(profiles_path);
}

#[test]
fn cli_json_report_covers_every_seed() {
    let report = run_json(&["--seeds", "1,2"]);
    assert_eq!(report["game"], "The Golden Key");
    let batches = report["batches"].as_array().expect("batches");
    assert_eq!(batches.len(), 2);
    for batch in batches {
        assert_eq!(batch["stats"]["games_played"], 12);
    }
}

#[test]
fn cli_same_seed_gives_identical_reports() {
    let parallel = run_json(&["--seeds", "7"]);
    let sequential = run_json(&["--seeds", "7", "--sequential"]);
    assert_eq!(parallel["batches"][0]["stats"], sequential["batches"][0]["stats"]);
}

#[test]
fn cli_log_prints_a_single_game() {
    let exe = env!("CARGO_BIN_EXE_boardsim-runner");
    let output = Command::new(exe)
        .args(["--rules", RULES, "--log", "--seeds", "3", "--p1", "passive"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[turn   1]"));
    assert!(stdout.contains("Outcome:"));
}

#[test]
fn cli_rejects_unknown_strategy() {
    let exe = env!("CARGO_BIN_EXE_boardsim-runner");
    let output = Command::new(exe)
        .args(["--rules", RULES, "--p1", "wizard"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown strategy"));
}

#[test]
fn cli_reports_missing_rules_file() {
    let exe = env!("CARGO_BIN_EXE_boardsim-runner");
    let output = Command::new(exe)
        .args(["--rules", "/nonexistent/rules.yaml"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load rules"));
}
