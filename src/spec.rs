//! Template specs: configuration lines and their ranking.
//!
//! A template line has up to three whitespace-separated fields:
//!
//! ```text
//! [filter] pattern [tags]
//!
//! cpu.*   measurement.host.field*   region=us,dc=eu
//! ^filter ^pattern                  ^default tags
//! ```
//!
//! Specs carry no decomposition logic. They exist so the engine can order
//! candidates once, at load time: specs with a filter are tried before the
//! filter-less catch-all, and within each group patterns with fewer separators
//! come first.

use crate::error::{Result, TemplateError};
use crate::template::{DEFAULT_SEPARATOR, Template};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A template line split into its constituent parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSpec {
    pub separator: String,
    /// Empty for the catch-all.
    pub filter: String,
    pub template: String,
    /// Raw `key=value,...` default tag string.
    pub tagstring: String,
}

impl TemplateSpec {
    /// Parse one template line.
    ///
    /// With two fields the second one is read as tags when it contains `=`,
    /// otherwise as the pattern following a filter.
    pub fn parse(separator: &str, line: &str) -> Result<Self> {
        let separator = if separator.is_empty() { DEFAULT_SEPARATOR } else { separator };
        let fields: Vec<&str> = crate::regex!(r"\s+").split(line.trim()).filter(|f| !f.is_empty()).collect();

        let (filter, template, tagstring) = match fields.as_slice() {
            [template] => ("", *template, ""),
            [template, tags] if tags.contains('=') => ("", *template, *tags),
            [filter, template] => (*filter, *template, ""),
            [filter, template, tags] => (*filter, *template, *tags),
            _ => return Err(TemplateError::InvalidSpec(line.to_string())),
        };

        Ok(TemplateSpec {
            separator: separator.to_string(),
            filter: filter.to_string(),
            template: template.to_string(),
            tagstring: tagstring.to_string(),
        })
    }

    /// Parse the default tag string.
    pub fn default_tags(&self) -> Result<BTreeMap<String, String>> {
        parse_tags(&self.tagstring)
    }

    /// Compile this spec into a [`Template`].
    pub fn build(&self) -> Result<Template> {
        Template::new(&self.separator, &self.template, self.default_tags()?)
    }

    pub fn is_catch_all(&self) -> bool {
        self.filter.is_empty()
    }

    /// Number of separators in the raw pattern.
    pub fn depth(&self) -> usize {
        self.template.matches(self.separator.as_str()).count()
    }

    /// Ranking order: filtered specs first, then fewer separators first.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.is_catch_all().cmp(&other.is_catch_all()).then_with(|| self.depth().cmp(&other.depth()))
    }
}

/// Sort specs into the order a selector should try them.
///
/// The sort is stable, so specs that rank equal keep their configured order.
pub fn rank(specs: &mut [TemplateSpec]) {
    specs.sort_by(TemplateSpec::rank_cmp);
}

/// Parse `key=value,key=value` into a tag map. Empty entries are skipped.
pub fn parse_tags(tagstring: &str) -> Result<BTreeMap<String, String>> {
    let mut tags = BTreeMap::new();
    for entry in tagstring.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(TemplateError::InvalidTag(entry.to_string()));
        };
        if key.is_empty() {
            return Err(TemplateError::InvalidTag(entry.to_string()));
        }
        tags.insert(key.to_string(), value.to_string());
    }
    Ok(tags)
}
