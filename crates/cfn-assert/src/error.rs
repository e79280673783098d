//! failures reported by templates and resource matchers
use crate::matcher::MatchResult;
use crate::pattern::Pattern;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse JSON template")]
    JsonParseFailed(#[from] serde_json::Error),
    #[error("Unable to parse YAML template")]
    YamlParseFailed(#[from] serde_yaml::Error),
    #[error("Template must be an object")]
    NotAnObject,
}

/// Why a resource matcher assertion failed
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Failure {
    #[error("Resource not found!")]
    NotFound,
    #[error("Resource is not unique, multiple one found!")]
    NotUnique { ids: Vec<String> },
    #[error("Resource does not exist!")]
    DoesNotExist,
    #[error("Resource exists!")]
    Exists { ids: Vec<String> },
    #[error("Resource count does not match! Expected {expected} but found {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("There is no such tag like {key}")]
    TagMissing { key: String },
    #[error("Tag {key} has value {actual}, expected {expected:?}")]
    TagValueMismatch {
        key: String,
        expected: String,
        actual: Value,
    },
    #[error("There is no such {0}!")]
    RuleMissing(String),
}

/// What a matcher was looking for and what the template holds of the same type
#[derive(Debug, Clone, serde::Serialize, derive_new::new)]
#[serde(rename_all = "camelCase")]
pub struct DebugContext {
    pub config: Pattern,
    pub similar_type: IndexMap<String, Value>,
}

impl fmt::Display for DebugContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// A failed resource matcher assertion
///
/// The message always carries the [DebugContext] so a failing test shows what was searched for
/// and which resources of that type exist.
#[derive(thiserror::Error, Debug, derive_new::new)]
#[error("{failure}\nInfo: {context}")]
pub struct AssertionError {
    pub failure: Failure,
    pub context: DebugContext,
}

/// A failed template level assertion
#[derive(Debug, derive_new::new)]
pub struct TemplateMismatch {
    pub message: String,
    /// Mismatches of the candidate that came closest
    pub closest: Option<MatchResult>,
}

impl std::error::Error for TemplateMismatch {}

impl fmt::Display for TemplateMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(closest) = &self.closest {
            write!(f, "\nThe closest result:\n{closest}")?;
        }
        Ok(())
    }
}
