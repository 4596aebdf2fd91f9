//! Per-file log spans keep their batch parent on worker threads.
//!
//! Installs a global subscriber, so it lives in its own test binary.

use std::fs;
use std::sync::{Arc, Mutex};

use melt_cli::batch::{BatchOptions, BatchRequest, run_batch};
use melt_model::ReshapeConfig;
use tracing::span::{Attributes, Id};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Records the parent name of every `file` span.
#[derive(Clone, Default)]
struct FileSpanParents {
    parents: Arc<Mutex<Vec<Option<String>>>>,
}

impl<S> Layer<S> for FileSpanParents
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        if attrs.metadata().name() != "file" {
            return;
        }
        let parent = ctx
            .span(id)
            .and_then(|span| span.parent())
            .map(|parent| parent.name().to_string());
        self.parents.lock().unwrap().push(parent);
    }
}

#[test]
fn parallel_file_spans_are_children_of_batch() {
    let recorder = FileSpanParents::default();
    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(recorder.clone()))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<_> = (0..4)
        .map(|i| {
            let path = dir.path().join(format!("{i}.csv"));
            fs::write(&path, "科室名称,2024-01\n内科,1\n").unwrap();
            path
        })
        .collect();
    let request = BatchRequest::from_inputs(dir.path().join("out"), &inputs, "清洗_");
    let options = BatchOptions {
        jobs: 2,
        dry_run: true,
        ..BatchOptions::default()
    };

    let report = run_batch(&request, &ReshapeConfig::default(), &options);

    assert!(!report.has_failures());
    let parents = recorder.parents.lock().unwrap();
    assert_eq!(parents.len(), 4);
    assert!(
        parents.iter().all(|p| p.as_deref() == Some("batch")),
        "{parents:?}"
    );
}
