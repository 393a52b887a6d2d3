//! Template engine.
//!
//! This module is the entry point that ties the pieces together: configured
//! template lines become ranked, compiled candidates, and every incoming line
//! is routed to exactly one template (or none).
//!
//! ## How the parts work together
//!
//! ```text
//! Options.templates ──┐
//!                     │  TemplateSpec::parse          (spec.rs)
//!                     └──────────────┬────────────────
//!                                    │
//!                         Selector::new (selector.rs)
//!                           - duplicate filter check
//!                           - compile Template + greedy check
//!                           - rank once, compile Filters (filter.rs)
//!                                    │
//! line ─────────────── Selector::select
//!                           - filtered candidates in rank order
//!                           - catch-all
//!                           - fallback template
//!                                    │
//!                                    v
//!                        Template::apply (template.rs)
//!                                    │
//!                                    v
//!                             Decomposition
//! ```
//!
//! ## Responsibilities by module
//!
//! - `filter.rs`: segment-wise wildcard filters deciding candidacy.
//! - `selector.rs`: load-time validation and ranking, per-line selection.
//!
//! ## Logging
//!
//! Loading logs each ranked template at `debug` level; per-line selection is
//! logged at `trace` level under the `flatmetric::engine` target.

#[path = "engine/filter.rs"]
mod filter;
#[path = "engine/selector.rs"]
mod selector;

pub use filter::Filter;
pub use selector::{Candidate, Origin, Selected, Selector};

use crate::api::Options;
use crate::error::Result;
use crate::spec::TemplateSpec;
use crate::template::{Decomposition, Template};
use std::collections::BTreeMap;

const LOG_TARGET: &str = "flatmetric::engine";

/// Ranked set of templates plus the joiner used to apply them.
#[derive(Debug, Clone)]
pub struct Engine {
    separator: String,
    joiner: String,
    selector: Selector,
}

impl Engine {
    /// Parse, validate and rank every template in `options`.
    pub fn new(options: &Options) -> Result<Self> {
        let separator = options.separator();
        let joiner = options.joiner();

        let specs = options
            .templates
            .iter()
            .map(|line| TemplateSpec::parse(separator, line))
            .collect::<Result<Vec<_>>>()?;

        let fallback = match options.default_template.as_deref() {
            Some(pattern) => {
                let template = Template::new(separator, pattern, BTreeMap::new())?;
                template.validate(joiner)?;
                Some(template)
            }
            None => None,
        };

        log::debug!(
            target: LOG_TARGET,
            "loading {} template(s), separator={separator:?}, joiner={joiner:?}, fallback={:?}",
            specs.len(),
            options.default_template
        );

        let selector = Selector::new(specs, fallback, joiner)?;
        Ok(Engine { separator: separator.to_string(), joiner: joiner.to_string(), selector })
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn joiner(&self) -> &str {
        &self.joiner
    }

    /// Configured candidates in the order they are tried.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.selector.candidates()
    }

    /// Template used when no candidate applies.
    pub fn fallback(&self) -> Option<&Template> {
        self.selector.fallback()
    }

    /// Pick the template for `line`, if any.
    pub fn select(&self, line: &str) -> Option<Selected<'_>> {
        self.selector.select(line)
    }

    /// Select a template for `line` and decompose it.
    ///
    /// `Ok(None)` means no template applies: no filter matched and there is
    /// neither a catch-all nor a fallback.
    pub fn apply(&self, line: &str) -> Result<Option<Decomposition>> {
        match self.select(line) {
            Some(selected) => selected.template.apply(line, &self.joiner).map(Some),
            None => {
                log::debug!(target: LOG_TARGET, "no template for {line:?}");
                Ok(None)
            }
        }
    }
}
