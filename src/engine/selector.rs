//! Ranked template selection.
//!
//! The selector is built once from every configured [`TemplateSpec`]:
//!
//! 1. reject duplicate filters (including a second catch-all),
//! 2. compile each spec into a [`Template`] and check the greedy rule early,
//! 3. rank the specs (see [`crate::spec::rank`]) and compile their filters.
//!
//! Per line, `select` walks the filtered candidates in rank order, then the
//! catch-all, then the optional fallback template. The first hit wins.

use super::filter::Filter;
use crate::error::{Result, TemplateError};
use crate::spec::{self, TemplateSpec};
use crate::template::Template;
use std::collections::HashSet;

const LOG_TARGET: &str = "flatmetric::engine";

/// A ranked spec with its compiled template and filter.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Position after ranking.
    pub rank: usize,
    pub spec: TemplateSpec,
    pub filter: Option<Filter>,
    pub template: Template,
}

/// Where a selected template came from.
#[derive(Debug, Clone, Copy)]
pub enum Origin<'a> {
    /// A configured spec, filtered or catch-all.
    Spec(&'a Candidate),
    /// The engine-wide fallback template.
    Fallback,
}

/// Result of a successful selection.
#[derive(Debug, Clone, Copy)]
pub struct Selected<'a> {
    pub template: &'a Template,
    pub origin: Origin<'a>,
}

#[derive(Debug, Clone, Default)]
pub struct Selector {
    filtered: Vec<Candidate>,
    catch_all: Option<Candidate>,
    fallback: Option<Template>,
}

impl Selector {
    /// Build a selector from specs in configuration order.
    pub fn new(mut specs: Vec<TemplateSpec>, fallback: Option<Template>, joiner: &str) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::new();
        for (position, spec) in specs.iter().enumerate() {
            if !seen.insert(spec.filter.as_str()) {
                return Err(TemplateError::DuplicateFilter { filter: spec.filter.clone(), position });
            }
        }

        spec::rank(&mut specs);

        let mut selector = Selector { fallback, ..Selector::default() };
        for (rank, spec) in specs.into_iter().enumerate() {
            let template = spec.build()?;
            template.validate(joiner)?;

            let filter = if spec.is_catch_all() { None } else { Some(Filter::new(&spec.separator, &spec.filter)?) };

            log::debug!(
                target: LOG_TARGET,
                "template #{rank}: filter={:?} pattern={:?} tags={:?}",
                spec.filter,
                spec.template,
                spec.tagstring
            );

            let candidate = Candidate { rank, spec, filter, template };
            if candidate.filter.is_some() {
                selector.filtered.push(candidate);
            } else {
                selector.catch_all = Some(candidate);
            }
        }

        Ok(selector)
    }

    /// Candidates in the order they are tried, catch-all last.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.filtered.iter().chain(self.catch_all.as_ref())
    }

    pub fn fallback(&self) -> Option<&Template> {
        self.fallback.as_ref()
    }

    pub fn select(&self, line: &str) -> Option<Selected<'_>> {
        let matched = self.filtered.iter().find(|c| c.filter.as_ref().is_some_and(|f| f.matches(line)));

        if let Some(candidate) = matched.or(self.catch_all.as_ref()) {
            log::trace!(target: LOG_TARGET, "{line:?} -> template #{} ({:?})", candidate.rank, candidate.spec.template);
            return Some(Selected { template: &candidate.template, origin: Origin::Spec(candidate) });
        }

        let template = self.fallback.as_ref()?;
        log::trace!(target: LOG_TARGET, "{line:?} -> fallback template");
        Some(Selected { template, origin: Origin::Fallback })
    }
}
