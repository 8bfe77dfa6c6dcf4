use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use ruleout_cli::pipeline::{
    ExportOptions, catalog_cases, export_cases, first_case_fields, read_export, resolve_cohort,
};
use ruleout_cli::types::{CatalogResult, ExportResult, FieldRow};
use ruleout_ingest::enumerate_cases;
use ruleout_model::IdentityAttributes;

use crate::cli::{CatalogArgs, ExportArgs, FieldsArgs};

pub fn run_export(args: &ExportArgs) -> Result<ExportResult> {
    let cohort = resolve_cohort(args.cohort.as_deref())?;
    let document = read_export(&args.input)?;
    let cases = enumerate_cases(&document);
    let options = ExportOptions {
        output: args.output.clone(),
        catalog: args.catalog.clone(),
        cohort,
    };
    let progress = case_progress(cases.len());
    let result = export_cases(&cases, &options, |_, _| progress.inc(1));
    progress.finish_and_clear();
    result
}

pub fn run_catalog(args: &CatalogArgs) -> Result<CatalogResult> {
    let document = read_export(&args.input)?;
    let cases = enumerate_cases(&document);
    catalog_cases(&cases, &IdentityAttributes::default(), &args.output)
}

pub fn run_fields(args: &FieldsArgs) -> Result<Vec<FieldRow>> {
    let document = read_export(&args.input)?;
    let cases = enumerate_cases(&document);
    first_case_fields(&cases)
}

/// Per-case progress on stderr; hidden when stderr is not a terminal.
fn case_progress(len: usize) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} assessing cases [{bar:40.cyan/blue}] {pos}/{len}")
        .map(|style| style.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::new(len as u64);
    bar.set_style(style);
    bar
}
