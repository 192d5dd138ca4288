//! Running the certora-ci binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use super::helpers::*;

const CONFIG: &str = r#"
rule_dir = "./rules"

[[contracts]]
name = "Registry.sol"
rules = ["privRegistry.sh", "registry.sh"]

[[contracts]]
name = "Proxy.sol"
rules = ["proxy.sh proxy"]
"#;

fn setup(registry_body: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let rules = temp.path().join("rules");
    fs::create_dir(&rules).unwrap();
    write_rule_script(&rules, "privRegistry.sh", &accepted_body("R1"));
    write_rule_script(&rules, "registry.sh", registry_body);
    write_rule_script(&rules, "proxy.sh", &accepted_body("P-$1"));
    fs::write(temp.path().join("certora-ci.toml"), CONFIG).unwrap();
    temp
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_certora-ci"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run certora-ci")
}

#[test]
fn test_all_range_json_report() {
    let temp = setup(&accepted_body("R2"));

    let output = run(temp.path(), &["--range", "all", "--format", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let contracts = report["contracts"].as_array().unwrap();
    assert_eq!(contracts.len(), 2);
    assert_eq!(contracts[0]["contract"], "Registry.sol");
    assert_eq!(contracts[0]["rules"][0]["rule"], "privRegistry.sh");
    assert_eq!(contracts[0]["rules"][0]["job_id"], "R1");
    assert_eq!(contracts[0]["rules"][1]["job_id"], "R2");
    assert_eq!(contracts[1]["rules"][0]["job_id"], "P-proxy");
    assert_eq!(report["summary"]["accepted"], 3);
}

#[test]
fn test_text_report() {
    let temp = setup("echo 'Fatal error: no solc'");

    let output = run(temp.path(), &["-r", "all"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--- Report Output ---"));
    assert!(stdout.contains("(privRegistry.sh) job_id:"));
    assert!(stdout.contains("R1"));
    assert!(stdout.contains("Fatal error: no solc"));
    assert!(stdout.contains("https://prover.example/output/7/R1?anonymousKey=abc"));
}

#[test]
fn test_fail_on_error_exit_status() {
    let temp = setup("echo 'Fatal error: no solc'");

    let output = run(temp.path(), &["--range", "all", "--fail-on-error"]);
    assert!(!output.status.success());
    // Report is still printed before failing
    assert!(String::from_utf8_lossy(&output.stdout).contains("Report Output"));
}

#[test]
fn test_rule_dir_override() {
    let temp = setup(&accepted_body("R2"));
    let other = temp.path().join("other");
    fs::create_dir(&other).unwrap();
    write_rule_script(&other, "privRegistry.sh", &accepted_body("O1"));
    write_rule_script(&other, "registry.sh", &accepted_body("O2"));
    write_rule_script(&other, "proxy.sh", &accepted_body("O3"));

    let output = run(
        temp.path(),
        &["--range", "all", "--format", "json", "--rule-dir", "other"],
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["contracts"][0]["rules"][0]["job_id"], "O1");
}

#[test]
fn test_missing_config_fails() {
    let temp = TempDir::new().unwrap();

    let output = run(temp.path(), &["--range", "all"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("certora-ci.toml"));
}

#[test]
fn test_diff_range_in_git_repo() {
    let repo = init_test_repo();
    let rules = repo.path().join("rules");
    fs::create_dir(&rules).unwrap();
    write_rule_script(&rules, "privRegistry.sh", &accepted_body("R1"));
    write_rule_script(&rules, "registry.sh", &accepted_body("R2"));
    write_rule_script(&rules, "proxy.sh", &accepted_body("P"));
    fs::write(repo.path().join("certora-ci.toml"), CONFIG).unwrap();
    commit_files(&["contracts/Proxy.sol", "contracts/Unlisted.sol"], "proxy", repo.path());

    let output = run(repo.path(), &["--format", "json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let contracts = report["contracts"].as_array().unwrap();
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0]["contract"], "Proxy.sol");
}
