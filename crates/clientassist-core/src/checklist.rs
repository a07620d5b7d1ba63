//! Checklist aggregation.
//!
//! The review form renders one checkbox group per checklist item; the field
//! ids are derived from the item index here, and parsed back here, so the
//! rendered form and the tally always agree on which answer is which item.

use clientassist_types::catalog::{CheckboxSelections, ChecklistDefinition, ChecklistTally};
use clientassist_types::event::{FieldValue, FormValues};

const ITEM_BLOCK_PREFIX: &str = "checklist_item_";
const ITEM_ACTION_PREFIX: &str = "checkbox_";

/// Value of the single option in every item's checkbox group.
pub const CHECKED_VALUE: &str = "checked";

pub fn item_block_id(index: usize) -> String {
    format!("{ITEM_BLOCK_PREFIX}{index}")
}

pub fn item_action_id(index: usize) -> String {
    format!("{ITEM_ACTION_PREFIX}{index}")
}

/// Item index for a form block id, if it is one of ours.
pub fn parse_item_block_id(block_id: &str) -> Option<usize> {
    block_id.strip_prefix(ITEM_BLOCK_PREFIX)?.parse().ok()
}

/// Collect checkbox answers from a submitted review form.
///
/// Only checkbox groups under an item block count; anything else in the
/// form (the read-only draft, stray fields) is ignored.
pub fn selections_from_form(values: &FormValues) -> CheckboxSelections {
    let mut selections = CheckboxSelections::new();
    for (block_id, _action_id, value) in values.iter() {
        let Some(index) = parse_item_block_id(block_id) else {
            continue;
        };
        if let FieldValue::Multi(selected) = value {
            selections
                .entry(index)
                .or_default()
                .extend(selected.iter().cloned());
        }
    }
    selections
}

/// Tally a submission against its checklist.
pub fn tally(definition: &ChecklistDefinition, selections: &CheckboxSelections) -> ChecklistTally {
    let total = definition.items.len();
    let completed = selections
        .range(..total)
        .filter(|(_, selected)| !selected.is_empty())
        .count();
    ChecklistTally { completed, total }
}
