use crate::engine::{Engine, Origin};
use crate::error::Result;
use crate::template::{DEFAULT_SEPARATOR, Decomposition};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Template used when no configured template applies to a line.
pub const DEFAULT_TEMPLATE: &str = "measurement*";

static DEFAULT_ENGINE: Lazy<Result<Engine>> = Lazy::new(|| Engine::new(&Options::default()));

/// Engine configuration.
///
/// Deserializable so it can be embedded in a host agent's configuration; any
/// missing key takes its default.
///
/// ```
/// use flatmetric::Options;
///
/// let opts: Options = serde_json::from_str(r#"{"templates": ["cpu.* measurement.field"]}"#).unwrap();
/// assert_eq!(opts.separator(), ".");
/// assert_eq!(opts.default_template.as_deref(), Some("measurement*"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Delimiter between segments of lines and patterns.
    pub separator: String,
    /// Delimiter used to re-assemble multi-segment captures. Defaults to the
    /// separator.
    pub joiner: Option<String>,
    /// Template lines: `[filter] pattern [key=value,...]`.
    pub templates: Vec<String>,
    /// Pattern used when nothing else applies; `None` leaves such lines
    /// unparsed.
    pub default_template: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            joiner: None,
            templates: Vec::new(),
            default_template: Some(DEFAULT_TEMPLATE.to_string()),
        }
    }
}

impl Options {
    pub fn separator(&self) -> &str {
        if self.separator.is_empty() { DEFAULT_SEPARATOR } else { &self.separator }
    }

    pub fn joiner(&self) -> &str {
        self.joiner.as_deref().unwrap_or_else(|| self.separator())
    }
}

/// Which template handled a line, for reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    /// Rank of the configured spec; `None` for the fallback template.
    pub rank: Option<usize>,
    pub filter: String,
    pub pattern: String,
    pub tags: String,
}

/// Result from [`decompose_verbose_with`].
#[derive(Debug, Clone)]
pub struct DecomposeVerbose {
    pub line: String,
    /// `None` when no template applied.
    pub selection: Option<SelectionSummary>,
    /// Present whenever a template was selected.
    pub outcome: Option<Result<Decomposition>>,
    pub elapsed: Duration,
}

/// Decompose `line` with the default engine: `.` separator and the
/// `measurement*` fallback.
///
/// # Example
/// ```
/// use flatmetric::decompose;
///
/// let out = decompose("cpu.usage.idle").unwrap().unwrap();
/// assert_eq!(out.measurement, "cpu.usage.idle");
/// ```
pub fn decompose(line: &str) -> Result<Option<Decomposition>> {
    let engine = (*DEFAULT_ENGINE).as_ref().map_err(Clone::clone)?;
    decompose_with(line, engine)
}

/// Decompose `line` with a configured engine.
pub fn decompose_with(line: &str, engine: &Engine) -> Result<Option<Decomposition>> {
    engine.apply(line)
}

/// Decompose `line` and report which template was used and how long it took.
pub fn decompose_verbose_with(line: &str, engine: &Engine) -> DecomposeVerbose {
    let start = Instant::now();

    let selected = engine.select(line);
    let selection = selected.map(|s| match s.origin {
        Origin::Spec(candidate) => SelectionSummary {
            rank: Some(candidate.rank),
            filter: candidate.spec.filter.clone(),
            pattern: candidate.spec.template.clone(),
            tags: candidate.spec.tagstring.clone(),
        },
        Origin::Fallback => SelectionSummary {
            rank: None,
            filter: String::new(),
            pattern: s.template.pattern(engine.separator()),
            tags: String::new(),
        },
    });
    let outcome = selected.map(|s| s.template.apply(line, engine.joiner()));

    DecomposeVerbose { line: line.to_string(), selection, outcome, elapsed: start.elapsed() }
}
