//! End-to-end tests running the `melt` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const GOOD: &str = "科室名称,2024-02,2024-01,合计\n外科,5,3,8\n";
const BAD_PERIOD: &str = "科室名称,2024-01,Feb-2024\n外科,1,2\n";
const BOM: &[u8] = "\u{feff}".as_bytes();

fn melt(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_melt"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn exit_status_reports_failed_files() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("inputs");
    let out = dir.path().join("out");
    fs::create_dir(&inputs).unwrap();
    fs::write(inputs.join("a_bad.csv"), BAD_PERIOD).unwrap();
    fs::write(inputs.join("b_good.csv"), GOOD).unwrap();
    let config = dir.path().join("melt.toml");
    fs::write(&config, "").unwrap();

    let output = melt(
        &config,
        &["convert", path_arg(&inputs), "--output-dir", path_arg(&out)],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("PeriodParseError"), "{stderr}");
    assert!(!out.join("清洗_a_bad.csv").exists());
    assert!(out.join("清洗_b_good.csv").exists());
}

#[test]
fn successful_run_exits_zero_and_uses_config_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("good.csv");
    let out = dir.path().join("out");
    fs::write(&input, GOOD).unwrap();
    let config = dir.path().join("melt.toml");
    fs::write(&config, "[output]\nprefix = \"long_\"\n").unwrap();

    let output = melt(
        &config,
        &["convert", path_arg(&input), "-o", path_arg(&out)],
    );

    assert_eq!(output.status.code(), Some(0));
    let bytes = fs::read(out.join("long_good.csv")).unwrap();
    assert!(bytes.starts_with(BOM));
}

#[test]
fn prefix_flag_and_no_bom_override_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("good.csv");
    let out = dir.path().join("out");
    fs::write(&input, GOOD).unwrap();
    let config = dir.path().join("melt.toml");
    fs::write(&config, "[output]\nprefix = \"long_\"\ncsv_bom = true\n").unwrap();

    let output = melt(
        &config,
        &[
            "convert",
            path_arg(&input),
            "-o",
            path_arg(&out),
            "--prefix",
            "p_",
            "--no-bom",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(!out.join("long_good.csv").exists());
    let text = fs::read_to_string(out.join("p_good.csv")).unwrap();
    assert!(text.starts_with("序号,"), "{text}");
}

#[test]
fn malformed_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("melt.toml");
    fs::write(&config, "[output\nprefix = ").unwrap();

    let output = melt(&config, &["config"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("parse config file"));
}

#[test]
fn config_command_prints_disabled_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("melt.toml");
    fs::write(&config, "").unwrap();

    let output = melt(&config, &["--no-aggregate-column", "config"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("aggregate_column = \"\""), "{stdout}");
}
