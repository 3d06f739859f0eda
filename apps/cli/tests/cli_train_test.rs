//! Integration tests for the `dagsweep train` and `dagsweep contract` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dagsweep(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dagsweep").unwrap();
    cmd.current_dir(temp_dir.path()).env("HOME", temp_dir.path());
    cmd
}

#[test]
fn test_train_dry_run_echoes_canonical_tokens() {
    let temp_dir = TempDir::new().unwrap();

    dagsweep(&temp_dir)
        .args([
            "train",
            "--dry-run",
            "--",
            "--seed",
            "2",
            "erdos_renyi_lingauss",
            "--num_variables",
            "10",
            "--num_edges",
            "5",
            "--num_samples",
            "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("--seed 2"))
        .stdout(predicate::str::contains("--prefill 1000"))
        .stdout(predicate::str::contains("erdos_renyi_lingauss --num_variables 10 --num_edges 5 --num_samples 100"));
}

#[test]
fn test_train_sachs_needs_no_fields() {
    let temp_dir = TempDir::new().unwrap();

    dagsweep(&temp_dir)
        .args(["train", "--dry-run", "--", "sachs_continuous"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sachs_continuous"));
}

#[test]
fn test_train_missing_field_names_it() {
    let temp_dir = TempDir::new().unwrap();

    dagsweep(&temp_dir)
        .args(["train", "--dry-run", "--", "erdos_renyi_lingauss", "--num_variables", "10", "--num_edges", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--num_samples"));
}

#[test]
fn test_train_unknown_flag_names_it() {
    let temp_dir = TempDir::new().unwrap();

    dagsweep(&temp_dir)
        .args(["train", "--dry-run", "--", "--bogus", "1", "sachs_continuous"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_train_bad_choice_names_it() {
    let temp_dir = TempDir::new().unwrap();

    dagsweep(&temp_dir)
        .args(["train", "--dry-run", "--", "--prior", "gaussian", "sachs_continuous"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--prior"))
        .stderr(predicate::str::contains("erdos_renyi"));
}

#[test]
fn test_train_without_graph_type_fails() {
    let temp_dir = TempDir::new().unwrap();

    dagsweep(&temp_dir)
        .args(["train", "--dry-run", "--", "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("graph type is required"));
}

#[test]
fn test_train_help_shows_contract() {
    let temp_dir = TempDir::new().unwrap();

    dagsweep(&temp_dir)
        .args(["train", "--dry-run", "--", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replay Buffer"))
        .stdout(predicate::str::contains("erdos_renyi_lingauss"));
}

#[test]
fn test_contract_json_lists_options() {
    let temp_dir = TempDir::new().unwrap();

    let output = dagsweep(&temp_dir).args(["contract", "--json"]).output().unwrap();
    assert!(output.status.success());

    let specs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let flags: Vec<&str> = specs.as_array().unwrap().iter().map(|s| s["flag"].as_str().unwrap()).collect();
    assert!(flags.contains(&"--num_envs"));
    assert!(flags.contains(&"--output_folder"));
    assert!(flags.contains(&"--num_samples"));
}

#[test]
fn test_contract_table() {
    let temp_dir = TempDir::new().unwrap();

    dagsweep(&temp_dir)
        .arg("contract")
        .assert()
        .success()
        .stdout(predicate::str::contains("Training argument contract"))
        .stdout(predicate::str::contains("sachs_interventional"));
}
