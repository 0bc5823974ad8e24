//! Tag selection for prune operations.

use crate::engine::EngineClient;
use crate::errors::WorkflowError;
use crate::inventory;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionMethod {
    /// Every auto-managed tag, including `latest`.
    All,
    /// Every timestamp tag except the newest; `latest` survives.
    Old,
}

impl SelectionMethod {
    /// Parse a method token, accepting the documented synonyms.
    pub fn parse(token: &str) -> Result<Self, WorkflowError> {
        match token {
            "a" | "all" => Ok(SelectionMethod::All),
            "o" | "old" => Ok(SelectionMethod::Old),
            _ => Err(WorkflowError::UnknownSelectionMethod(token.to_string())),
        }
    }
}

/// Compute the tags a prune with `method` acts on, ascending.
pub fn select(
    engine: &EngineClient,
    image: &str,
    method: SelectionMethod,
) -> Result<Vec<String>, WorkflowError> {
    match method {
        SelectionMethod::All => inventory::list_auto_tags(engine, image),
        SelectionMethod::Old => Ok(drop_newest(inventory::list_timestamp_tags(engine, image)?)),
    }
}

/// Remove the newest (last) element of an ascending inventory. Inventories
/// of size 0 or 1 have nothing old, so the result is empty.
pub fn drop_newest(mut tags: Vec<String>) -> Vec<String> {
    tags.pop();
    tags
}
