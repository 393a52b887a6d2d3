//! Template-driven decomposition of flat metric names.
//!
//! Flat-namespace metric systems name series with dotted paths such as
//! `cpu.server01.usage.idle`. A template like `measurement.host.field*` turns
//! that path into a structured record:
//!
//! ```
//! use flatmetric::Template;
//!
//! let template = Template::with_pattern("measurement.host.field*").unwrap();
//! let out = template.apply("cpu.server01.usage.idle", ".").unwrap();
//!
//! assert_eq!(out.measurement, "cpu");
//! assert_eq!(out.tags["host"], "server01");
//! assert_eq!(out.field, "usage.idle");
//! ```
//!
//! Several templates can be configured at once, each guarded by a filter; the
//! [`Engine`] ranks them once and picks one per line.

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod spec;
mod template;

pub use api::{
    DEFAULT_TEMPLATE, DecomposeVerbose, Options, SelectionSummary, decompose, decompose_verbose_with, decompose_with,
};
pub use engine::{Candidate, Engine, Filter, Origin, Selected};
pub use error::{Result, TemplateError};
pub use spec::{TemplateSpec, parse_tags, rank};
pub use template::{DEFAULT_SEPARATOR, Decomposition, Greedy, Template};
