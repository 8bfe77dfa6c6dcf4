//! Each anomaly reaches the log stream once, even when the catalog is
//! written alongside the cohort table.

use std::sync::{Arc, Mutex};

use ruleout_cli::pipeline::{ExportOptions, export_cases};
use ruleout_ingest::{enumerate_cases, parse_document};
use ruleout_model::{AllowList, CohortDefinition, DiagnosticKind, IdentityAttributes};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, registry};

const EXPORT: &str = r#"<MintExport>
  <Trial>
    <TrialArm>
      <Case CaseID="C1">
        <Patient LastName="Doe" PatientID="P1" InstitutionName="Charite"/>
        <Question Label="Orphan" Answer="x"/>
        <Question Label="Age" QuestionType="age" Answer="45"/>
      </Case>
      <Case CaseID="C2">
        <Patient LastName="Roe" PatientID="P2" InstitutionName="Charite"/>
        <Question Label="Age" QuestionType="age"/>
      </Case>
    </TrialArm>
  </Trial>
</MintExport>"#;

#[derive(Clone, Default)]
struct LevelCounter {
    counts: Arc<Mutex<(usize, usize)>>,
}

impl LevelCounter {
    fn warnings_and_errors(&self) -> (usize, usize) {
        *self.counts.lock().expect("counter lock")
    }
}

impl<S: Subscriber> Layer<S> for LevelCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut counts = self.counts.lock().expect("counter lock");
        match *event.metadata().level() {
            Level::WARN => counts.0 += 1,
            Level::ERROR => counts.1 += 1,
            _ => {}
        }
    }
}

#[test]
fn export_with_catalog_logs_each_diagnostic_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let document = parse_document(EXPORT).expect("parse");
    let cases = enumerate_cases(&document);
    let options = ExportOptions {
        output: dir.path().join("cohort.csv"),
        catalog: Some(dir.path().join("catalog.csv")),
        cohort: CohortDefinition {
            name: "events".to_string(),
            allow_list: AllowList::new(["age"]).expect("allow list"),
            identity: IdentityAttributes::default(),
            filter: None,
        },
    };

    let counter = LevelCounter::default();
    let subscriber = registry().with(counter.clone());
    let result = tracing::subscriber::with_default(subscriber, || {
        export_cases(&cases, &options, |_, _| {}).expect("export")
    });

    assert_eq!(
        result.diagnostics.get(&DiagnosticKind::MissingTypeAttribute),
        Some(&1)
    );
    assert_eq!(result.diagnostics.get(&DiagnosticKind::CaseDropped), Some(&1));
    assert_eq!(result.catalog.expect("catalog").dropped.len(), 1);
    assert_eq!(counter.warnings_and_errors(), (1, 1));
}
