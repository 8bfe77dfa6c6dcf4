//! Run stages shared by the subcommands.
//!
//! Each stage returns `anyhow::Result` with context naming the stage, so a
//! fatal error reads as a chain from the failing file up to the command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ruleout_core::{AssessmentBuilder, Diagnostics, build_label_catalog, case_fields};
use ruleout_ingest::{Document, Node, load_document};
use ruleout_model::{CaseOutcome, CohortDefinition, IdentityAttributes, load_cohort_definition};
use ruleout_report::{apply_range_filter, build_cohort_frame, write_catalog_csv, write_cohort_csv};
use tracing::{info, info_span};

use crate::types::{CatalogResult, ExportResult, FieldRow};

pub const DEFAULT_INPUT: &str = "MintExportRACOON.xml";
pub const DEFAULT_OUTPUT: &str = "MintExportRACOON.csv";
pub const DEFAULT_CATALOG_OUTPUT: &str = "MintExportRACOON-catalog.csv";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output: PathBuf,
    /// Also write the label catalog here.
    pub catalog: Option<PathBuf>,
    pub cohort: CohortDefinition,
}

pub fn read_export(input: &Path) -> Result<Document> {
    load_document(input).with_context(|| format!("load export {}", input.display()))
}

/// Cohort file when given, otherwise the built-in rule-out cohort.
pub fn resolve_cohort(path: Option<&Path>) -> Result<CohortDefinition> {
    match path {
        Some(path) => load_cohort_definition(path)
            .with_context(|| format!("load cohort definition {}", path.display())),
        None => Ok(CohortDefinition::ruleout()),
    }
}

/// Assess, filter, and write one cohort table.
///
/// The table is written even when every case was dropped.
pub fn export_cases<F>(cases: &[&Node], options: &ExportOptions, on_case: F) -> Result<ExportResult>
where
    F: FnMut(usize, &CaseOutcome),
{
    let cohort_def = &options.cohort;
    info!(cohort = %cohort_def.name, fields = cohort_def.allow_list.len(), "exporting cohort");

    let builder = AssessmentBuilder::from_cohort(cohort_def);
    let assessment = builder.assess_cohort_with(cases, on_case);
    let dropped: Vec<_> = assessment.failures().cloned().collect();
    let exported = assessment.exported_count();
    let random_ids = assessment.random_id_count();
    let diagnostics = assessment.diagnostics.counts();
    let records = assessment.into_records();

    let mut frame =
        build_cohort_frame(&records, &cohort_def.allow_list).context("build cohort table")?;
    let filtered = match &cohort_def.filter {
        Some(filter) => apply_range_filter(&mut frame, filter).context("apply post-filter")?,
        None => 0,
    };

    let write_span = info_span!("write", path = %options.output.display());
    write_span
        .in_scope(|| write_cohort_csv(&options.output, &frame))
        .with_context(|| format!("write cohort table {}", options.output.display()))?;

    let catalog = match &options.catalog {
        // The assessment pass already logged every anomaly of these cases.
        Some(path) => Some(write_catalog(
            cases,
            &cohort_def.identity,
            path,
            Diagnostics::silent(),
        )?),
        None => None,
    };

    Ok(ExportResult {
        cohort: cohort_def.name.clone(),
        output: options.output.clone(),
        catalog,
        cases_found: cases.len(),
        exported,
        dropped,
        filtered,
        rows_written: frame.height(),
        random_ids,
        diagnostics,
    })
}

/// Build the label catalog over all cases and write it.
pub fn catalog_cases(
    cases: &[&Node],
    identity: &IdentityAttributes,
    output: &Path,
) -> Result<CatalogResult> {
    write_catalog(cases, identity, output, Diagnostics::new())
}

fn write_catalog(
    cases: &[&Node],
    identity: &IdentityAttributes,
    output: &Path,
    mut diagnostics: Diagnostics,
) -> Result<CatalogResult> {
    let build = build_label_catalog(cases, identity, &mut diagnostics);
    let write_span = info_span!("write", path = %output.display());
    write_span
        .in_scope(|| write_catalog_csv(output, &build.catalog))
        .with_context(|| format!("write label catalog {}", output.display()))?;
    Ok(CatalogResult {
        output: output.to_path_buf(),
        cases_found: cases.len(),
        fields: build.catalog.len(),
        dropped: build.failures,
    })
}

/// Every field of the first case, sorted by field key.
///
/// Empty when the export has no cases.
pub fn first_case_fields(cases: &[&Node]) -> Result<Vec<FieldRow>> {
    let Some(case) = cases.first() else {
        return Ok(Vec::new());
    };
    let mut diagnostics = Diagnostics::new();
    let fields = case_fields(case, &mut diagnostics).context("read fields of first case")?;
    Ok(fields
        .into_iter()
        .map(|(key, field)| FieldRow {
            field_key: key.into_inner(),
            label: field.label,
            value: field.value,
        })
        .collect())
}
