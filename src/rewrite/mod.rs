//! Rewrite engine: migrate bare object-literal returns to schema-qualified
//! `create()` calls in the target service file.
//!
//! One ordered table of match/replace rules applied over the file's text.
//! Load, apply, save; no AST, no rollback, no state across runs.

mod engine;
mod rules;

pub use engine::{apply_rules, Applied, Replacement, RewriteReport, Rule, RuleOutcome};
pub use rules::default_rules;

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Load `path`, run the default rule table, and write the result back.
///
/// The write is a plain overwrite: no backup, no atomic rename. Read and
/// write failures are fatal and propagate to the caller; a rule matching
/// zero times is not a failure and is only reflected in the report.
pub fn rewrite_file(path: &Path) -> Result<RewriteReport> {
    let content = fs::read_to_string(path)?;
    let (rewritten, mut report) = apply_rules(&default_rules(), &content)?;
    fs::write(path, &rewritten)?;
    report.applied = true;
    Ok(report)
}
