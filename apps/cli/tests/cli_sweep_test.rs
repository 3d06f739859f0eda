//! Integration tests for the `dagsweep sweep` and `dagsweep plan` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SWEEP: &str = r#"
[variables.10]
num_edges = 5
data_size = [100, 500]

[variables.20]
num_edges = [2, 4]
data_size = [[50], [50, 200]]
"#;

/// Helper to build a command isolated from any user-level config
fn dagsweep(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dagsweep").unwrap();
    cmd.current_dir(temp_dir.path()).env("HOME", temp_dir.path());
    cmd
}

fn write_sweep(temp_dir: &TempDir, content: &str) -> String {
    let path = temp_dir.path().join("sweep.toml");
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_plan_json_lists_every_run() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(&temp_dir, SWEEP);

    let output = dagsweep(&temp_dir)
        .args(["plan", &sweep, "--json", "--num-iterations", "100000", "--output-root", "out"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let runs = plan.as_array().unwrap();
    assert_eq!(runs.len(), 5);

    let first = &runs[0];
    assert_eq!(first["run"]["num_variables"], 10);
    assert_eq!(first["output_folder"], "out/10_5_100_0");
    let tokens: Vec<&str> = first["tokens"].as_array().unwrap().iter().map(|t| t.as_str().unwrap()).collect();
    assert_eq!(
        tokens,
        vec![
            "--num_iterations",
            "100000",
            "--prefill",
            "1000",
            "--output_folder",
            "out/10_5_100_0",
            "--seed",
            "0",
            "erdos_renyi_lingauss",
            "--num_variables",
            "10",
            "--num_edges",
            "5",
            "--num_samples",
            "100",
        ]
    );
}

#[test]
fn test_plan_repeats_runs_per_seed() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(&temp_dir, SWEEP);

    dagsweep(&temp_dir)
        .args(["plan", &sweep, "--seed", "1", "--seed", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sweep plan (10 runs)"))
        .stdout(predicate::str::contains("20_4_200_2"));
}

#[test]
fn test_sweep_dry_run_prints_progress_notices() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(&temp_dir, SWEEP);

    dagsweep(&temp_dir)
        .args(["sweep", &sweep, "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Performing experiment with 10 variables and 5 edges, data size: 100, seed: 0",
        ))
        .stdout(predicate::str::contains(
            "Performing experiment with 20 variables and 4 edges, data size: 200, seed: 0",
        ))
        .stdout(predicate::str::contains("Sweep complete"));

    // A dry run never touches the output folders.
    assert!(!temp_dir.path().join("output").exists());
}

#[test]
fn test_sweep_without_trainer_fails() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(&temp_dir, SWEEP);

    dagsweep(&temp_dir)
        .args(["sweep", &sweep])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No trainer program configured"));
}

#[test]
fn test_mismatched_jagged_sweep_fails_before_any_run() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(
        &temp_dir,
        "[variables.20]\nnum_edges = [2, 4]\ndata_size = [[50]]\n",
    );

    dagsweep(&temp_dir)
        .args(["sweep", &sweep, "--dry-run"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Performing experiment").not())
        .stderr(predicate::str::contains("2 edge counts but 1 data_size lists"));
}

#[test]
fn test_invalid_base_option_names_the_flag() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(
        &temp_dir,
        "[options]\n\"--prior\" = \"gaussian\"\n\n[variables.10]\nnum_edges = 5\ndata_size = [100]\n",
    );

    dagsweep(&temp_dir)
        .args(["plan", &sweep])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--prior"));
}

#[test]
fn test_base_options_with_graph_fields_and_negative_floats() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(
        &temp_dir,
        "[options]\n\"--num_samples\" = 7\n\"--delta\" = -0.5\n\n[variables.10]\nnum_edges = 5\ndata_size = [100]\n",
    );

    dagsweep(&temp_dir)
        .args(["plan", &sweep])
        .assert()
        .success()
        .stdout(predicate::str::contains("--delta -0.5"))
        .stdout(predicate::str::contains("--num_edges 5 --num_samples 100"));
}

#[test]
fn test_malformed_entry_names_its_key() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(&temp_dir, "[variables.12]\nnum_edges = 5\ndata_size = [[1]]\n");

    dagsweep(&temp_dir)
        .args(["plan", &sweep])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sweep entry for 12 variables"));
}

#[test]
fn test_config_file_supplies_settings() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(&temp_dir, "[variables.3]\nnum_edges = 1\ndata_size = [10]\n");
    fs::write(
        temp_dir.path().join("dagsweep.toml"),
        "seeds = [7]\nnum_iterations = 500\noutput_root = \"results\"\n",
    )
    .unwrap();

    dagsweep(&temp_dir)
        .args(["plan", &sweep])
        .assert()
        .success()
        .stdout(predicate::str::contains("results/3_1_10_7"))
        .stdout(predicate::str::contains("--prefill 5"));
}

#[cfg(unix)]
#[test]
fn test_sweep_with_program_records_each_invocation() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(&temp_dir, SWEEP);

    dagsweep(&temp_dir)
        .args(["sweep", &sweep, "--program", "true", "--output-root", "runs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sweep complete"));

    for folder in ["10_5_100_0", "10_5_500_0", "20_2_50_0", "20_4_50_0", "20_4_200_0"] {
        let manifest = Path::new("runs").join(folder).join("invocation.json");
        assert!(temp_dir.path().join(&manifest).is_file(), "{} missing", manifest.display());
    }
}

#[cfg(unix)]
#[test]
fn test_failing_program_stops_the_sweep() {
    let temp_dir = TempDir::new().unwrap();
    let sweep = write_sweep(&temp_dir, SWEEP);

    dagsweep(&temp_dir)
        .args(["sweep", &sweep, "--program", "false", "--output-root", "runs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("aborted"));

    assert!(temp_dir.path().join("runs/10_5_100_0").exists());
    assert!(!temp_dir.path().join("runs/10_5_500_0").exists());
}
