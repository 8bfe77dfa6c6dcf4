//! End-to-end runs of the export stages against files on disk.

use std::fs;
use std::path::Path;

use ruleout_cli::pipeline::{
    ExportOptions, catalog_cases, export_cases, first_case_fields, read_export, resolve_cohort,
};
use ruleout_core::pseudonymous_id;
use ruleout_ingest::enumerate_cases;
use ruleout_model::{CohortDefinition, DiagnosticKind, IdentityAttributes};

const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MintExport>
  <Trial Name="RACOON">
    <TrialArm Name="Ruleout">
      <Case CaseID="C1">
        <Patient LastName="Doe" PatientID="P1" InstitutionName="Charite"/>
        <Question Label="Age" QuestionType="age" Answer="150"/>
        <Question Question="Age (years)" Type="age" Answer=""/>
        <Question Label="Parenchyma" QuestionType="lung" Answer="normal"/>
      </Case>
      <Case CaseID="C2">
        <Question Label="Age" QuestionType="age" Answer="45"/>
      </Case>
      <Case CaseID="C3" Status="incomplete">
        <Patient LastName="Roe" PatientID="P3" InstitutionName="Charite"/>
        <Question Label="Age" QuestionType="age"/>
      </Case>
      <Case CaseID="C4">
        <Patient LastName="Poe" PatientID="P4" InstitutionName="Charite"/>
        <Question Label="Parenchyma" QuestionType="lung" Answer="opacities"/>
      </Case>
    </TrialArm>
  </Trial>
</MintExport>
"#;

const COHORT: &str = r#"
[cohort]
name = "ruleout-age"

[fields]
allow = ["lung", "age"]

[filter]
field = "age"
max = 100
"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read output")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn export_with_cohort_file_filters_and_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write(dir.path(), "export.xml", EXPORT);
    let cohort_path = write(dir.path(), "cohort.toml", COHORT);
    let output = dir.path().join("cohort.csv");

    let cohort = resolve_cohort(Some(&cohort_path)).expect("cohort");
    let document = read_export(&input).expect("document");
    let cases = enumerate_cases(&document);
    let options = ExportOptions {
        output: output.clone(),
        catalog: None,
        cohort,
    };
    let mut seen = 0;
    let result = export_cases(&cases, &options, |_, _| seen += 1).expect("export");

    assert_eq!(seen, 4);
    assert_eq!(result.cohort, "ruleout-age");
    assert_eq!(result.cases_found, 4);
    assert_eq!(result.exported, 3);
    assert_eq!(result.dropped.len(), 1);
    assert_eq!(result.dropped[0].case_id.as_deref(), Some("C3"));
    assert!(result.has_dropped());
    assert_eq!(result.filtered, 1);
    assert_eq!(result.rows_written, 2);
    assert_eq!(result.random_ids, 1);
    assert_eq!(result.diagnostics.get(&DiagnosticKind::CaseDropped), Some(&1));
    assert_eq!(
        result.diagnostics.get(&DiagnosticKind::ConflictingValues),
        Some(&1)
    );

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ID,lung,age");
    assert!(lines[1].ends_with(",,45"));
    assert_eq!(
        lines[2],
        format!("{},opacities,", pseudonymous_id("C4", "Poe", "P4", "Charite"))
    );
}

#[test]
fn default_cohort_keeps_only_the_ruleout_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write(dir.path(), "export.xml", EXPORT);
    let output = dir.path().join("cohort.csv");
    let catalog = dir.path().join("catalog.csv");

    let document = read_export(&input).expect("document");
    let cases = enumerate_cases(&document);
    let options = ExportOptions {
        output: output.clone(),
        catalog: Some(catalog.clone()),
        cohort: resolve_cohort(None).expect("cohort"),
    };
    let result = export_cases(&cases, &options, |_, _| {}).expect("export");

    assert_eq!(result.filtered, 0);
    assert_eq!(result.rows_written, 3);
    let lines = read_lines(&output);
    assert_eq!(
        lines[0],
        "ID,racoon-covid-19-annotation-pathology-lung-parenchyma"
    );
    assert!(lines[1..].iter().all(|line| line.ends_with(',')));

    let catalog_result = result.catalog.expect("catalog written");
    assert_eq!(catalog_result.fields, 2);
    let catalog_lines = read_lines(&catalog);
    assert_eq!(catalog_lines[0], "field_key,label,value_count,values");
    assert_eq!(catalog_lines[1], "age,Age (years),2,150 | 45");
    assert_eq!(catalog_lines[2], "lung,Parenchyma,2,normal | opacities");
}

#[test]
fn catalog_subcommand_stage_writes_every_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write(dir.path(), "export.xml", EXPORT);
    let output = dir.path().join("nested").join("catalog.csv");

    let document = read_export(&input).expect("document");
    let cases = enumerate_cases(&document);
    let result =
        catalog_cases(&cases, &IdentityAttributes::default(), &output).expect("catalog");

    assert_eq!(result.cases_found, 4);
    assert_eq!(result.fields, 2);
    assert_eq!(result.dropped.len(), 1);
    assert!(output.exists());
}

#[test]
fn fields_lists_first_case_sorted_by_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write(dir.path(), "export.xml", EXPORT);
    let document = read_export(&input).expect("document");
    let cases = enumerate_cases(&document);

    let rows = first_case_fields(&cases).expect("fields");
    let keys: Vec<&str> = rows.iter().map(|row| row.field_key.as_str()).collect();
    assert_eq!(keys, vec!["age", "lung"]);
    assert_eq!(rows[0].value, "150");
    assert_eq!(rows[1].label, "Parenchyma");
}

#[test]
fn missing_input_is_fatal_with_context() {
    let dir = tempfile::tempdir().expect("tempdir");
    let error = read_export(&dir.path().join("absent.xml")).expect_err("missing");
    assert!(format!("{error:#}").contains("load export"));
}

#[test]
fn invalid_cohort_file_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write(dir.path(), "cohort.toml", "[cohort]\nname = \"x\"\n[fields]\nallow = []\n");
    let error = resolve_cohort(Some(&path)).expect_err("empty allow list");
    assert!(format!("{error:#}").contains("load cohort definition"));
}

#[test]
fn built_in_cohort_matches_resolved_default() {
    assert_eq!(
        resolve_cohort(None).expect("cohort"),
        CohortDefinition::ruleout()
    );
}
