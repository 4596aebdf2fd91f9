//! Integration tests for the batch driver.

use std::fs;
use std::path::{Path, PathBuf};

use melt_cli::batch::{BatchOptions, BatchRequest, FailureKind, run_batch};
use melt_model::ReshapeConfig;

const GOOD: &str = "科室名称,2024-02,2024-01,合计\n外科,5,3,8\n内科,7,6,13\n";
const MISSING_CATEGORY: &str = "部门,2024-01\n外科,1\n";
const BAD_PERIOD: &str = "科室名称,2024-01,Feb-2024\n外科,1,2\n";

fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn options() -> BatchOptions {
    BatchOptions {
        write: melt_output::WriteOptions { csv_bom: false },
        ..BatchOptions::default()
    }
}

#[test]
fn converts_with_default_names() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let input = write_input(input_dir.path(), "出院.csv", GOOD);

    let request = BatchRequest::from_inputs(output_dir.path(), &[input], "清洗_");
    let report = run_batch(&request, &ReshapeConfig::default(), &options());

    assert!(!report.has_failures());
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.output, output_dir.path().join("清洗_出院.csv"));
    let summary = outcome.result.as_ref().unwrap();
    assert_eq!(summary.categories, 2);
    assert_eq!(summary.periods, 2);
    assert_eq!(summary.records, 4);
    assert!(summary.written);

    let text = fs::read_to_string(&outcome.output).unwrap();
    insta::assert_snapshot!(text, @r"
    序号,科室,日期,年份,月份,出院人数
    1,外科,2024-01,2024年,01月,3
    2,外科,2024-02,2024年,02月,5
    3,内科,2024-01,2024年,01月,6
    4,内科,2024-02,2024年,02月,7
    ");
}

#[test]
fn failures_do_not_stop_later_files() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let inputs = vec![
        write_input(input_dir.path(), "a.csv", MISSING_CATEGORY),
        write_input(input_dir.path(), "b.csv", BAD_PERIOD),
        input_dir.path().join("missing.csv"),
        write_input(input_dir.path(), "d.csv", GOOD),
    ];

    let request = BatchRequest::from_inputs(output_dir.path(), &inputs, "清洗_");
    let report = run_batch(&request, &ReshapeConfig::default(), &options());

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 3);

    let kinds: Vec<Option<FailureKind>> = report
        .outcomes
        .iter()
        .map(|o| o.failure().map(|f| f.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            Some(FailureKind::MissingCategoryColumn),
            Some(FailureKind::PeriodParse),
            Some(FailureKind::Io),
            None,
        ]
    );
    let period_failure = report.outcomes[1].failure().unwrap();
    assert!(period_failure.message.contains("Feb-2024"));

    for outcome in &report.outcomes[..3] {
        assert!(!outcome.output.exists(), "{}", outcome.output.display());
    }
    assert!(report.outcomes[3].output.exists());
    assert_eq!(fs::read_dir(output_dir.path()).unwrap().count(), 1);
}

#[test]
fn explicit_names_and_workbook_output() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let input = write_input(input_dir.path(), "in.csv", GOOD);

    let request = BatchRequest::with_output_names(
        output_dir.path(),
        &[input],
        &["2024年出院人数.xls".to_string()],
    )
    .unwrap();
    let report = run_batch(&request, &ReshapeConfig::default(), &options());

    let expected = output_dir.path().join("2024年出院人数.xlsx");
    assert_eq!(report.outcomes[0].output, expected);
    assert!(expected.exists());
}

#[test]
fn dry_run_writes_nothing() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let input = write_input(input_dir.path(), "in.csv", GOOD);

    let request = BatchRequest::from_inputs(output_dir.path().join("out"), &[input], "清洗_");
    let options = BatchOptions {
        dry_run: true,
        ..options()
    };
    let report = run_batch(&request, &ReshapeConfig::default(), &options);

    let summary = report.outcomes[0].result.as_ref().unwrap();
    assert_eq!(summary.records, 4);
    assert!(!summary.written);
    assert!(!output_dir.path().join("out").exists());
}

#[test]
fn parallel_run_keeps_request_order() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let inputs: Vec<PathBuf> = (0..6)
        .map(|i| {
            let content = if i == 2 { MISSING_CATEGORY } else { GOOD };
            write_input(input_dir.path(), &format!("{i}.csv"), content)
        })
        .collect();

    let request = BatchRequest::from_inputs(output_dir.path(), &inputs, "清洗_");
    let options = BatchOptions {
        jobs: 3,
        ..options()
    };
    let report = run_batch(&request, &ReshapeConfig::default(), &options);

    let order: Vec<&Path> = report.outcomes.iter().map(|o| o.input.as_path()).collect();
    let expected: Vec<&Path> = inputs.iter().map(PathBuf::as_path).collect();
    assert_eq!(order, expected);
    assert_eq!(report.failed(), 1);
    assert!(!report.outcomes[2].is_success());
    assert_eq!(report.total_records(), 20);
}

#[test]
fn config_overrides_change_classification() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    let input = write_input(input_dir.path(), "a.csv", MISSING_CATEGORY);

    let config = ReshapeConfig::default().with_category_column("部门");
    let request = BatchRequest::from_inputs(output_dir.path(), &[input], "清洗_");
    let report = run_batch(&request, &config, &options());

    assert!(!report.has_failures());
    assert_eq!(report.total_records(), 1);
}
