use std::path::Path;

use protofix::rewrite;
use protofix::{log_status, Result};

/// The one file this tool exists to fix. Not parameterized: the rule table
/// is written against this exact file's method order.
const TARGET_FILE: &str = "src/services/strategyService.ts";

fn main() -> Result<()> {
    let report = rewrite::rewrite_file(Path::new(TARGET_FILE))?;

    for outcome in &report.outcomes {
        if outcome.matches == 0 {
            log_status!(
                "rewrite",
                "rule '{}' matched nothing; the target's method order may have drifted",
                outcome.rule
            );
        }
    }

    println!("Fixed strategyService.ts");
    Ok(())
}
