//! Typed invocation request and the closed input enumerations.

use crate::error::Error;

/// One pipeline-trigger request, marshalled once from action inputs and
/// read-only afterwards. Optional fields are absent-by-default and only ever
/// emitted to `bdy` when present.
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub workspace: String,
    pub project: String,
    pub identifier: String,
    pub comment: Option<String>,
    pub wait: Option<String>,
    pub branch: Option<String>,
    pub tag: Option<String>,
    pub revision: Option<String>,
    pub pull_request: Option<String>,
    pub refresh: bool,
    pub clear_cache: bool,
    pub priority: Option<String>,
    pub region: Option<String>,
    pub variable: Option<String>,
    pub variable_masked: Option<String>,
    pub schedule: Option<String>,
    pub action: Option<String>,
    pub api: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Normal,
    High,
}

impl Priority {
    /// Case-insensitive parse; the error names the input and the valid set.
    pub fn parse(value: &str) -> Result<Self, Error> {
        match value.to_uppercase().as_str() {
            "LOW" => Ok(Priority::Low),
            "NORMAL" => Ok(Priority::Normal),
            "HIGH" => Ok(Priority::High),
            _ => Err(Error::InvalidPriority {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Normal => "NORMAL",
            Priority::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Eu,
    Us,
    Ap,
}

impl Region {
    pub fn parse(value: &str) -> Result<Self, Error> {
        match value.to_uppercase().as_str() {
            "EU" => Ok(Region::Eu),
            "US" => Ok(Region::Us),
            "AP" => Ok(Region::Ap),
            _ => Err(Error::InvalidRegion {
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Eu => "EU",
            Region::Us => "US",
            Region::Ap => "AP",
        }
    }
}

/// Delimiter policy for list-valued inputs.
///
/// Variables split on newlines only, because variable values may legitimately
/// contain commas. Actions carry no values and split on both.
#[derive(Debug, Clone, Copy)]
pub enum ListSplit {
    Newlines,
    NewlinesAndCommas,
}

/// Split a list-valued input, trim entries, and drop empty ones.
pub fn parse_list(input: &str, split: ListSplit) -> Vec<String> {
    let parts: Vec<&str> = match split {
        ListSplit::Newlines => input.split('\n').collect(),
        ListSplit::NewlinesAndCommas => input.split(['\n', ',']).collect(),
    };
    parts
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
