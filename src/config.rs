use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How to pick a record when several payments fall in the same calendar month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum DuplicateMonthPolicy {
    #[default]
    #[schemars(description = "The record appearing later in the input replaces earlier ones.")]
    LastWriteWins,

    #[schemars(
        description = "The record with the later due date wins. Equal due dates fall back to input order."
    )]
    LatestDueDate,

    #[schemars(description = "More than one record in a month is a data error.")]
    Reject,
}

/// What to do with a lease whose end date precedes its start date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum InvalidRangePolicy {
    #[default]
    #[schemars(description = "Produce an empty schedule.")]
    Empty,

    #[schemars(description = "Fail with an invalid range error.")]
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub duplicate_policy: DuplicateMonthPolicy,
    pub invalid_range_policy: InvalidRangePolicy,
}

impl ReconcilerConfig {
    pub fn strict() -> Self {
        Self {
            duplicate_policy: DuplicateMonthPolicy::Reject,
            invalid_range_policy: InvalidRangePolicy::Reject,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(ReconcilerConfig);
        serde_json::to_string_pretty(&schema)
    }
}
