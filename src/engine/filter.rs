//! Segment-wise filter matching.
//!
//! A filter is split on the separator exactly like a line. Each filter segment
//! is a tiny glob (`*` = any run of characters, `?` = one character, anything
//! else literal) compiled into an anchored regex. A line matches when its
//! leading segments match the filter segments one for one; extra trailing
//! line segments are allowed.
//!
//! ```text
//! filter: cpu*  . server??
//! line:   cpu0  . server01 . usage . idle    -> match
//! line:   cpu0  . db01     . usage           -> no match (segment 1)
//! line:   cpu0                               -> no match (too short)
//! ```

use crate::error::{Result, TemplateError};
use regex::Regex;

/// A compiled filter.
#[derive(Debug, Clone)]
pub struct Filter {
    raw: String,
    separator: String,
    segments: Vec<Regex>,
}

impl Filter {
    pub fn new(separator: &str, filter: &str) -> Result<Self> {
        let segments = filter
            .split(separator)
            .map(|glob| {
                Regex::new(&glob_to_regex(glob))
                    .map_err(|e| TemplateError::InvalidFilter { filter: filter.to_string(), reason: e.to_string() })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Filter { raw: filter.to_string(), separator: separator.to_string(), segments })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, line: &str) -> bool {
        let mut line_segments = line.split(self.separator.as_str());
        self.segments.iter().all(|re| line_segments.next().is_some_and(|segment| re.is_match(segment)))
    }
}

fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::with_capacity(glob.len() + 2);
    pattern.push('^');

    let mut literal = String::new();
    for c in glob.chars() {
        match c {
            '*' | '?' => {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();
                pattern.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    pattern.push_str(&regex::escape(&literal));

    pattern.push('$');
    pattern
}
