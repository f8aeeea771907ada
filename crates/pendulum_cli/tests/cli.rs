//! End-to-end tests for the `spring-pendulum` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn pendulum_cmd() -> Command {
    let mut cmd = Command::cargo_bin("spring-pendulum").unwrap();
    cmd.env_remove("SPRING_PENDULUM_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// =============================================================================
// parameters
// =============================================================================

#[test]
fn test_parameters_lists_selectable_columns() {
    pendulum_cmd()
        .arg("parameters")
        .assert()
        .success()
        .stdout(predicate::str::contains("spring_length"))
        .stdout(predicate::str::contains("Acceleration (m/s²)"))
        .stdout(predicate::str::contains("Time (s)").not());
}

// =============================================================================
// integrate
// =============================================================================

#[test]
fn test_integrate_prints_table() {
    pendulum_cmd()
        .args(["integrate", "--until", "1", "--sample", "0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("time"))
        .stdout(predicate::str::contains("spring_length"))
        .stdout(predicate::str::contains("0.500"))
        .stdout(predicate::str::contains("1.000"));
}

#[test]
fn test_integrate_json_lines() {
    let output = pendulum_cmd()
        .args(["integrate", "--until", "0.2", "--sample", "0.1", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["spring_length"].as_f64().unwrap() >= 0.1);
    }
}

#[test]
fn test_integrate_custom_columns() {
    pendulum_cmd()
        .args(["integrate", "--until", "0", "--columns", "x,y,gravity_force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gravity_force"))
        .stdout(predicate::str::contains("9.810000"))
        .stdout(predicate::str::contains("spring_length").not());
}

#[test]
fn test_integrate_overrides_apply() {
    pendulum_cmd()
        .args([
            "--mass",
            "2",
            "integrate",
            "--until",
            "0",
            "--columns",
            "gravity_force",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("19.620000"));
}

#[test]
fn test_integrate_rejects_bad_sample() {
    pendulum_cmd()
        .args(["integrate", "--sample", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--sample must be a positive"));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_file_is_used() {
    let file = config_file("[parameters]\ngravity = 1.62\n");
    pendulum_cmd()
        .arg("--config")
        .arg(file.path())
        .args(["integrate", "--until", "0", "--columns", "gravity_force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.620000"));
}

#[test]
fn test_config_from_environment() {
    let file = config_file("[parameters]\nmass = 3.0\n");
    pendulum_cmd()
        .env("SPRING_PENDULUM_CONFIG", file.path())
        .args(["integrate", "--until", "0", "--columns", "gravity_force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("29.430000"));
}

#[test]
fn test_flag_overrides_config_file() {
    let file = config_file("[parameters]\nmass = 3.0\n");
    pendulum_cmd()
        .arg("-c")
        .arg(file.path())
        .args(["integrate", "--until", "0", "--columns", "gravity_force", "--mass", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9.810000"));
}

#[test]
fn test_invalid_parameter_is_rejected() {
    pendulum_cmd()
        .args(["--mass", "-1", "integrate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid simulation parameters"))
        .stderr(predicate::str::contains("mass"));
}

#[test]
fn test_invalid_parameter_in_file_is_rejected() {
    let file = config_file("[parameters]\nspring_constant = 0.0\n");
    pendulum_cmd()
        .arg("-c")
        .arg(file.path())
        .args(["run", "--duration", "0.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("spring_constant"));
}

#[test]
fn test_missing_config_file() {
    pendulum_cmd()
        .args(["-c", "/nonexistent/pendulum.toml", "integrate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_unknown_config_key() {
    let file = config_file("[engine]\nwarp = 9\n");
    pendulum_cmd()
        .arg("-c")
        .arg(file.path())
        .arg("integrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

// =============================================================================
// run
// =============================================================================

#[test]
fn test_run_prints_snapshots_in_real_time() {
    let output = pendulum_cmd()
        .args(["run", "--duration", "0.3", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let times: Vec<f64> = stdout
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["time"].as_f64().unwrap())
        .collect();
    assert!(times.len() >= 3, "{stdout}");
    assert!(times[0].abs() < f64::EPSILON);
    assert!(times.windows(2).all(|w| w[0] < w[1]));
    // Real time at speed 1: well under one simulated second in 0.3 s
    assert!(*times.last().unwrap() < 1.0);
}

#[test]
fn test_run_verbose_logs_to_stderr() {
    pendulum_cmd()
        .args(["-v", "run", "--duration", "0.1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Simulation started"))
        .stdout(predicate::str::contains("Simulation started").not());
}

#[test]
fn test_run_rejects_huge_duration() {
    pendulum_cmd()
        .args(["run", "--duration", "1e20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too large"));
}

#[test]
fn test_integrate_rejects_huge_until() {
    pendulum_cmd()
        .args(["integrate", "--until", "1e30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--until must be at most"));
}

#[test]
fn test_no_subcommand_is_an_error() {
    pendulum_cmd().assert().failure();
}
