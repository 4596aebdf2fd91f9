//! Batch conversion driver.
//!
//! A [`BatchRequest`] lists every input file with the name its output should
//! get. [`run_batch`] converts each one independently: a file that fails is
//! logged and reported, and the remaining files are still converted.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Result, ensure};
use melt_ingest::{IngestError, read_wide_table};
use melt_model::{ReshapeConfig, ReshapeError};
use melt_output::{OutputError, WriteOptions, resolve_output_path, write_long_table};
use melt_transform::{ReshapeEvent, ReshapeObserver, TracingObserver, reshape_with_observer};
use rayon::ThreadPoolBuilder;
use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use tracing::{Span, error, info, info_span, warn};

/// Prefix of default output names: `报表.xlsx` becomes `清洗_报表.xlsx`.
pub const DEFAULT_OUTPUT_PREFIX: &str = "清洗_";

/// Default output file name for `input`.
pub fn default_output_name(input: &Path, prefix: &str) -> String {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{prefix}{file_name}")
}

/// One input file and the name of its output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output_name: String,
}

impl BatchItem {
    pub fn new(input: impl Into<PathBuf>, output_name: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output_name: output_name.into(),
        }
    }

    /// Item whose output name is `prefix` followed by the input file name.
    pub fn with_prefix(input: impl Into<PathBuf>, prefix: &str) -> Self {
        let input = input.into();
        let output_name = default_output_name(&input, prefix);
        Self { input, output_name }
    }
}

/// Everything a batch run needs to know about its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub output_dir: PathBuf,
    pub items: Vec<BatchItem>,
}

impl BatchRequest {
    pub fn new(output_dir: impl Into<PathBuf>, items: Vec<BatchItem>) -> Self {
        Self {
            output_dir: output_dir.into(),
            items,
        }
    }

    /// Request with default output names for every input.
    pub fn from_inputs(output_dir: impl Into<PathBuf>, inputs: &[PathBuf], prefix: &str) -> Self {
        let items = inputs
            .iter()
            .map(|input| BatchItem::with_prefix(input.clone(), prefix))
            .collect();
        Self::new(output_dir, items)
    }

    /// Request with one explicit output name per input, paired in order.
    pub fn with_output_names(
        output_dir: impl Into<PathBuf>,
        inputs: &[PathBuf],
        names: &[String],
    ) -> Result<Self> {
        ensure!(
            inputs.len() == names.len(),
            "{} output names given for {} input files",
            names.len(),
            inputs.len()
        );
        let request = Self::new(
            output_dir,
            inputs
                .iter()
                .zip(names)
                .map(|(input, name)| BatchItem::new(input.clone(), name.clone()))
                .collect(),
        );
        for item in &request.items {
            request.output_path(item)?;
        }
        Ok(request)
    }

    /// Destination path of `item`, with the extension fixed up for writing.
    ///
    /// Fails if the output name is not a plain file name.
    pub fn output_path(&self, item: &BatchItem) -> std::result::Result<PathBuf, OutputError> {
        resolve_output_path(&self.output_dir, &item.output_name)
    }
}

/// Options for a batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Reshape every file but write nothing.
    pub dry_run: bool,
    /// Number of files converted concurrently.
    pub jobs: usize,
    pub write: WriteOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 1,
            write: WriteOptions::default(),
        }
    }
}

/// Failure categories reported per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingCategoryColumn,
    PeriodParse,
    /// Reading, decoding or writing a file failed.
    Io,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCategoryColumn => "MissingCategoryColumn",
            Self::PeriodParse => "PeriodParseError",
            Self::Io => "IOError",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a file was not converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<ReshapeError> for FileFailure {
    fn from(err: ReshapeError) -> Self {
        let kind = match err {
            ReshapeError::MissingCategoryColumn { .. } => FailureKind::MissingCategoryColumn,
            ReshapeError::PeriodParse { .. } => FailureKind::PeriodParse,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<IngestError> for FileFailure {
    fn from(err: IngestError) -> Self {
        Self {
            kind: FailureKind::Io,
            message: err.to_string(),
        }
    }
}

impl From<OutputError> for FileFailure {
    fn from(err: OutputError) -> Self {
        Self {
            kind: FailureKind::Io,
            message: err.to_string(),
        }
    }
}

/// Counts for a converted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSummary {
    pub categories: usize,
    pub periods: usize,
    pub records: usize,
    /// False for dry runs.
    pub written: bool,
}

/// Result of converting one batch item.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub duration: Duration,
    pub result: std::result::Result<FileSummary, FileFailure>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn failure(&self) -> Option<&FileFailure> {
        self.result.as_ref().err()
    }
}

/// Outcomes of a batch run, in request order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub duration: Duration,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn total_records(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|summary| summary.records)
            .sum()
    }
}

/// Converts every item of `request`.
///
/// Items run one after another unless `options.jobs` is greater than one,
/// in which case they run on a rayon pool of that many threads. The report
/// lists outcomes in request order either way.
pub fn run_batch(
    request: &BatchRequest,
    config: &ReshapeConfig,
    options: &BatchOptions,
) -> BatchReport {
    let span = info_span!(
        "batch",
        files = request.items.len(),
        output_dir = %request.output_dir.display(),
        dry_run = options.dry_run
    );
    let _guard = span.enter();
    let start = Instant::now();

    let jobs = options.jobs.clamp(1, request.items.len().max(1));
    let outcomes = if jobs == 1 {
        request
            .items
            .iter()
            .map(|item| process_item(&span, request, item, config, options))
            .collect()
    } else {
        run_parallel(&span, request, config, options, jobs)
    };

    let report = BatchReport {
        outcomes,
        duration: start.elapsed(),
    };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        records = report.total_records(),
        duration_ms = report.duration.as_millis(),
        "batch complete"
    );
    report
}

fn run_parallel(
    batch: &Span,
    request: &BatchRequest,
    config: &ReshapeConfig,
    options: &BatchOptions,
    jobs: usize,
) -> Vec<FileOutcome> {
    let convert = |item: &BatchItem| process_item(batch, request, item, config, options);
    match ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => pool.install(|| request.items.par_iter().map(convert).collect()),
        Err(error) => {
            warn!(%error, jobs, "could not start worker pool, converting sequentially");
            request.items.iter().map(convert).collect()
        }
    }
}

/// Converts one item. `batch` is set as the parent of the file span, since
/// worker threads do not see the caller's entered span.
fn process_item(
    batch: &Span,
    request: &BatchRequest,
    item: &BatchItem,
    config: &ReshapeConfig,
    options: &BatchOptions,
) -> FileOutcome {
    let span = info_span!(parent: batch, "file", input = %item.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let (output, result) = match request.output_path(item) {
        Ok(output) => {
            let result = convert_file(&item.input, &output, config, options);
            (output, result)
        }
        Err(err) => (
            request.output_dir.join(&item.output_name),
            Err(FileFailure::from(err)),
        ),
    };
    match &result {
        Ok(summary) => info!(
            output = %output.display(),
            categories = summary.categories,
            periods = summary.periods,
            records = summary.records,
            written = summary.written,
            "file converted"
        ),
        Err(failure) => error!(
            kind = %failure.kind,
            file = %item.input.display(),
            message = %failure.message,
            "file conversion failed"
        ),
    }

    FileOutcome {
        input: item.input.clone(),
        output,
        duration: start.elapsed(),
        result,
    }
}

fn convert_file(
    input: &Path,
    output: &Path,
    config: &ReshapeConfig,
    options: &BatchOptions,
) -> std::result::Result<FileSummary, FileFailure> {
    let wide = read_wide_table(input)?;
    let mut observer = CountingObserver::default();
    let long = reshape_with_observer(&wide, config, &mut observer)?;
    if !options.dry_run {
        write_long_table(&long, output, options.write)?;
    }
    Ok(FileSummary {
        categories: observer.categories,
        periods: observer.periods,
        records: long.len(),
        written: !options.dry_run,
    })
}

/// Records layout counts and forwards every event to tracing.
#[derive(Debug, Default)]
struct CountingObserver {
    periods: usize,
    categories: usize,
    tracing: TracingObserver,
}

impl ReshapeObserver for CountingObserver {
    fn on_event(&mut self, event: &ReshapeEvent<'_>) {
        match *event {
            ReshapeEvent::ColumnsClassified { period_columns, .. } => {
                self.periods = period_columns;
            }
            ReshapeEvent::Completed { categories, .. } => self.categories = categories,
            _ => {}
        }
        self.tracing.on_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output_name(Path::new("/data/出院人数.xlsx"), DEFAULT_OUTPUT_PREFIX),
            "清洗_出院人数.xlsx"
        );
        assert_eq!(default_output_name(Path::new("a.csv"), "long_"), "long_a.csv");
    }

    #[test]
    fn test_output_names_must_match_inputs() {
        let inputs = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
        let err = BatchRequest::with_output_names("out", &inputs, &["x.csv".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("1 output names given for 2 input files"));

        let request = BatchRequest::with_output_names(
            "out",
            &inputs,
            &["x.csv".to_string(), "y".to_string()],
        )
        .unwrap();
        assert_eq!(
            request.output_path(&request.items[1]).unwrap(),
            PathBuf::from("out").join("y.xlsx")
        );
    }

    #[test]
    fn test_output_names_cannot_leave_output_dir() {
        let inputs = vec![PathBuf::from("a.csv")];
        let err = BatchRequest::with_output_names("out", &inputs, &["../a.csv".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("../a.csv"));
    }

    #[test]
    fn test_failure_kinds() {
        let failure = FileFailure::from(ReshapeError::MissingCategoryColumn {
            column: "科室名称".to_string(),
        });
        assert_eq!(failure.kind.as_str(), "MissingCategoryColumn");

        let failure = FileFailure::from(ReshapeError::PeriodParse {
            label: "Jan-24".to_string(),
            column_index: 2,
        });
        assert_eq!(failure.kind.to_string(), "PeriodParseError");
        assert!(failure.message.contains("Jan-24"));

        let failure = FileFailure::from(IngestError::FileNotFound {
            path: PathBuf::from("missing.csv"),
        });
        assert_eq!(failure.kind, FailureKind::Io);
    }
}
