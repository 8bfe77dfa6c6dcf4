//! Cohort table: one row per case, `ID` first, then allow-listed fields in
//! configured order. Fields a case did not report are null.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use ruleout_model::{AllowList, CaseAssessment, ID_COLUMN};
use tracing::debug;

use crate::error::Result;

pub fn build_cohort_frame(records: &[CaseAssessment], allow_list: &AllowList) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(allow_list.len() + 1);

    let ids: Vec<Option<String>> = records.iter().map(|record| Some(record.id.clone())).collect();
    columns.push(Series::new(ID_COLUMN.into(), ids).into_column());

    for key in allow_list.iter() {
        let values: Vec<Option<String>> = records
            .iter()
            .map(|record| record.fields.get(key).cloned())
            .collect();
        columns.push(Series::new(key.as_str().into(), values).into_column());
    }

    let frame = DataFrame::new(columns)?;
    debug!(rows = frame.height(), columns = frame.width(), "built cohort table");
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::cell_text;
    use ruleout_model::{FieldKey, IdentitySource};

    #[test]
    fn columns_follow_allow_list_order() {
        let mut record = CaseAssessment::new("id-1", IdentitySource::Pseudonymous);
        record.fields.insert(FieldKey::new("age"), "45".to_string());
        let allow_list = AllowList::new(["lung", "age"]).expect("allow list");

        let frame = build_cohort_frame(&[record], &allow_list).expect("frame");
        let names: Vec<&str> = frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["ID", "lung", "age"]);
        assert_eq!(frame.height(), 1);

        let lung = frame.column("lung").expect("lung");
        assert_eq!(cell_text(lung, 0), None);
        let age = frame.column("age").expect("age");
        assert_eq!(cell_text(age, 0).as_deref(), Some("45"));
    }

    #[test]
    fn empty_cohort_keeps_schema() {
        let allow_list = AllowList::new(["age"]).expect("allow list");
        let frame = build_cohort_frame(&[], &allow_list).expect("frame");
        assert_eq!(frame.height(), 0);
        assert_eq!(frame.width(), 2);
    }
}
