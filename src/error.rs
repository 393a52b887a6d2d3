//! Error type shared by template construction, application and configuration.

use thiserror::Error;

/// Everything that makes a template definition invalid.
///
/// `NoMeasurement` and `GreedyConflict` come from the template itself; the
/// remaining variants are raised while reading template lines from
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("no measurement specified for template. {0:?}")]
    NoMeasurement(String),

    #[error("either 'field*' or 'measurement*' can be used in each template (but not both together): {0:?}")]
    GreedyConflict(String),

    #[error("invalid template format: {0:?}")]
    InvalidSpec(String),

    #[error("invalid default tag {0:?} (expected key=value)")]
    InvalidTag(String),

    #[error("invalid filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("duplicate filter {filter:?} found at position {position}")]
    DuplicateFilter { filter: String, position: usize },
}

pub type Result<T> = std::result::Result<T, TemplateError>;
