//! Library side of the `ruleout` command: logging setup and run stages.

pub mod logging;
pub mod pipeline;
pub mod types;
