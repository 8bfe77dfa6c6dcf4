use std::fs;

use ruleout_ingest::{IngestError, enumerate_cases, load_document};

#[test]
fn loads_export_file_and_enumerates_cases() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("MintExportRACOON.xml");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<MintExport>
  <Trial Name="RACOON">
    <TrialArm Name="Ruleout">
      <Case CaseID="A1">
        <Patient LastName="Doe" PatientID="P1" InstitutionName="Clinic"/>
        <Question Label="Lung parenchyma" QuestionType="lung" Answer="normal"/>
      </Case>
      <Case CaseID="A2"/>
    </TrialArm>
  </Trial>
</MintExport>
"#,
    )
    .expect("write export");

    let document = load_document(&path).expect("load");
    let cases = enumerate_cases(&document);
    assert_eq!(cases.len(), 2);
    let first = cases[0];
    assert_eq!(first.attr("CaseID"), Some("A1"));
    assert_eq!(
        first.first_child().and_then(|child| child.attr("PatientID")),
        Some("P1")
    );
    assert_eq!(first.descendants_named("Question").count(), 1);
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = load_document(&dir.path().join("absent.xml")).expect_err("missing");
    assert!(matches!(error, IngestError::FileNotFound { .. }));
}

#[test]
fn malformed_file_fails_whole_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("broken.xml");
    fs::write(&path, r#"<MintExport><Trial></TrialArm></MintExport>"#).expect("write");
    assert!(load_document(&path).is_err());
}

#[test]
fn latin1_export_is_decoded_from_its_declaration() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("latin1.xml");
    let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n".to_vec();
    bytes.extend_from_slice(b"<MintExport><Trial><TrialArm><Case CaseID=\"A1\">");
    bytes.extend_from_slice(b"<Patient LastName=\"M\xfcller\" InstitutionName=\"Universit\xe4t\"/>");
    bytes.extend_from_slice(b"</Case></TrialArm></Trial></MintExport>");
    fs::write(&path, &bytes).expect("write export");

    let document = load_document(&path).expect("load latin-1 export");
    let cases = enumerate_cases(&document);
    let patient = cases[0].first_child().expect("patient");
    assert_eq!(patient.attr("LastName"), Some("Müller"));
    assert_eq!(patient.attr("InstitutionName"), Some("Universität"));
}
