//! Case enumeration: `Trial > TrialArm > Case`, in document order.

use tracing::info;

use crate::document::{Document, Node};

pub const TRIAL: &str = "Trial";
pub const TRIAL_ARM: &str = "TrialArm";
pub const CASE: &str = "Case";

/// Collect every `Case` element that sits below a `TrialArm`, which itself
/// sits below a `Trial`. Each case is returned once, in document order.
///
/// Cases nested inside another case are not enumerated separately.
pub fn enumerate_cases(document: &Document) -> Vec<&Node> {
    let mut cases = Vec::new();
    for root in document.roots() {
        collect_cases(root, false, false, &mut cases);
    }
    info!(cases = cases.len(), "enumerated cases");
    cases
}

fn collect_cases<'a>(node: &'a Node, in_trial: bool, in_arm: bool, cases: &mut Vec<&'a Node>) {
    let in_trial = in_trial || node.name() == TRIAL;
    let in_arm = in_arm || (in_trial && node.name() == TRIAL_ARM);
    if in_arm && node.name() == CASE {
        cases.push(node);
        return;
    }
    for child in node.children() {
        collect_cases(child, in_trial, in_arm, cases);
    }
}
