//! Post-filter: drop rows with implausible integer values in one field.
//!
//! Advisory cleanup only. Missing or unparseable values are kept, and a
//! field that is not in the table turns the filter into a no-op.

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use ruleout_model::{ID_COLUMN, RangeFilter};
use tracing::{debug, info, info_span};

use crate::error::Result;
use crate::values::{cell_text, parse_i64};

/// Remove out-of-range rows in place and return how many were removed.
pub fn apply_range_filter(frame: &mut DataFrame, filter: &RangeFilter) -> Result<usize> {
    let span = info_span!("filter", field = %filter.field);
    let _guard = span.enter();

    let keep = {
        let Ok(column) = frame.column(filter.field.as_str()) else {
            debug!("field not in table; filter skipped");
            return Ok(0);
        };
        let ids = frame.column(ID_COLUMN).ok();
        let mut keep = Vec::with_capacity(frame.height());
        for row in 0..frame.height() {
            let value = cell_text(column, row).and_then(|text| parse_i64(&text));
            let out_of_range = value.is_some_and(|value| filter.is_out_of_range(value));
            if out_of_range {
                let id = ids.and_then(|ids| cell_text(ids, row)).unwrap_or_default();
                info!(id = %id, value = ?value, "removed implausible row");
            }
            keep.push(!out_of_range);
        }
        keep
    };

    let removed = keep.iter().filter(|kept| !**kept).count();
    if removed > 0 {
        let mask = BooleanChunked::from_slice("range_filter".into(), &keep);
        *frame = frame.filter(&mask)?;
    }
    Ok(removed)
}
