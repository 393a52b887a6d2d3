//! Compiled templates and line decomposition.
//!
//! A template is a separator-delimited pattern such as
//! `measurement.host.field*`. Each part of the pattern is resolved once, at
//! construction, into a `Part`; applying the template to a line is then a
//! single pass that routes every line segment into one of three ordered
//! accumulators (measurement, field, per-key tags) and joins them at the end.
//!
//! ```text
//! pattern:  measurement . host     . field*
//! line:     cpu         . server01 . usage . idle
//!           │             │          └──────┴── field = "usage.idle"
//!           │             └── tags["host"] = "server01"
//!           └── measurement = "cpu"
//! ```
//!
//! Default tags seed the tag accumulator before any segment is routed, so a
//! default whose key the pattern also extracts is joined in front of the
//! extracted values.

use crate::error::{Result, TemplateError};
use std::collections::BTreeMap;

/// Separator used when none is configured.
pub const DEFAULT_SEPARATOR: &str = ".";

const LOG_TARGET: &str = "flatmetric::template";

bitflags::bitflags! {
    /// Greedy parts present in a pattern.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Greedy: u8 {
        const MEASUREMENT = 1 << 0;
        const FIELD       = 1 << 1;
    }
}

/// One pattern part, resolved from its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Part {
    /// `measurement`
    Measurement,
    /// `field`
    Field,
    /// `measurement*`
    MeasurementGreedy,
    /// `field*`
    FieldGreedy,
    /// An empty label: the matching segment is dropped.
    Skip,
    /// Any other label names a tag key.
    Tag(String),
}

impl Part {
    fn from_label(label: &str) -> Self {
        match label {
            "" => Part::Skip,
            "measurement" => Part::Measurement,
            "field" => Part::Field,
            "measurement*" => Part::MeasurementGreedy,
            "field*" => Part::FieldGreedy,
            tag => Part::Tag(tag.to_string()),
        }
    }

    fn label(&self) -> &str {
        match self {
            Part::Measurement => "measurement",
            Part::Field => "field",
            Part::MeasurementGreedy => "measurement*",
            Part::FieldGreedy => "field*",
            Part::Skip => "",
            Part::Tag(name) => name.as_str(),
        }
    }
}

/// Structured result of applying a template to a line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    /// Measurement name; empty when the line had no measurement segment.
    pub measurement: String,
    /// Tag key to joined tag value, including default tags.
    pub tags: BTreeMap<String, String>,
    /// Field name; empty when the pattern captured no field.
    pub field: String,
}

/// A compiled pattern plus its default tags.
///
/// Immutable after construction, so a single template can be shared freely
/// between threads.
#[derive(Debug, Clone)]
pub struct Template {
    separator: String,
    parts: Vec<Part>,
    default_tags: BTreeMap<String, String>,
    greedy: Greedy,
}

impl Template {
    /// Compile `pattern`, split on `separator`, with `default_tags` applied to
    /// every decomposition.
    ///
    /// Fails when no part is labelled `measurement` or `measurement*`. A
    /// pattern holding both `field*` and `measurement*` compiles; it is
    /// rejected every time it is applied.
    pub fn new(separator: &str, pattern: &str, default_tags: BTreeMap<String, String>) -> Result<Self> {
        let separator = if separator.is_empty() { DEFAULT_SEPARATOR } else { separator };
        let parts: Vec<Part> = pattern.split(separator).map(Part::from_label).collect();

        let has_measurement = parts.iter().any(|p| matches!(p, Part::Measurement | Part::MeasurementGreedy));
        if !has_measurement {
            return Err(TemplateError::NoMeasurement(pattern.to_string()));
        }

        let greedy = greedy_of(&parts);
        Ok(Template { separator: separator.to_string(), parts, default_tags, greedy })
    }

    /// Compile `pattern` with the default separator and no default tags.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        Self::new(DEFAULT_SEPARATOR, pattern, BTreeMap::new())
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn default_tags(&self) -> &BTreeMap<String, String> {
        &self.default_tags
    }

    pub fn greedy(&self) -> Greedy {
        self.greedy
    }

    /// The pattern's labels joined with `joiner`.
    pub fn pattern(&self, joiner: &str) -> String {
        self.parts.iter().map(Part::label).collect::<Vec<_>>().join(joiner)
    }

    /// Check the greedy mutual-exclusion rule.
    ///
    /// [`Template::apply`] runs this on every call; configuration loaders can
    /// run it up front to reject a bad template before any line arrives.
    pub fn validate(&self, joiner: &str) -> Result<()> {
        if self.greedy.contains(Greedy::MEASUREMENT | Greedy::FIELD) {
            return Err(TemplateError::GreedyConflict(self.pattern(joiner)));
        }
        Ok(())
    }

    /// Decompose `line` into measurement, tags and field.
    ///
    /// Segments beyond the pattern are dropped, pattern parts beyond the line
    /// are ignored, and multi-segment captures are re-assembled with
    /// `joiner`. The only error is the greedy conflict.
    pub fn apply(&self, line: &str, joiner: &str) -> Result<Decomposition> {
        let segments: Vec<&str> = line.split(self.separator.as_str()).collect();

        let mut measurement: Vec<&str> = Vec::new();
        let mut field: Vec<&str> = Vec::new();
        let mut tags: BTreeMap<&str, Vec<&str>> =
            self.default_tags.iter().map(|(k, v)| (k.as_str(), vec![v.as_str()])).collect();

        self.validate(joiner)?;

        for (i, part) in self.parts.iter().enumerate() {
            let Some(segment) = segments.get(i).copied() else {
                continue;
            };

            match part {
                Part::Skip => {}
                Part::Measurement => measurement.push(segment),
                Part::Field => field.push(segment),
                Part::FieldGreedy => {
                    field.extend_from_slice(&segments[i..]);
                    break;
                }
                Part::MeasurementGreedy => {
                    measurement.extend_from_slice(&segments[i..]);
                    break;
                }
                Part::Tag(key) => tags.entry(key.as_str()).or_default().push(segment),
            }
        }

        let out = Decomposition {
            measurement: measurement.join(joiner),
            tags: tags.into_iter().map(|(k, values)| (k.to_string(), values.join(joiner))).collect(),
            field: field.join(joiner),
        };

        log::trace!(target: LOG_TARGET, "{line:?} -> {out:?}");
        Ok(out)
    }
}

fn greedy_of(parts: &[Part]) -> Greedy {
    parts.iter().fold(Greedy::empty(), |acc, part| match part {
        Part::MeasurementGreedy => acc | Greedy::MEASUREMENT,
        Part::FieldGreedy => acc | Greedy::FIELD,
        _ => acc,
    })
}

#[cfg(test)]
#[path = "template/tests.rs"]
mod tests;
