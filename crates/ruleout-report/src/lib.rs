//! Cohort table assembly and output.

pub mod error;
pub mod filter;
pub mod table;
pub mod values;
pub mod writer;

pub use error::{ReportError, Result};
pub use filter::apply_range_filter;
pub use table::build_cohort_frame;
pub use values::{cell_text, parse_i64};
pub use writer::{
    EMPTY_VALUE, VALUE_SEPARATOR, write_catalog, write_catalog_csv, write_cohort,
    write_cohort_csv,
};
