use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;
use shelf_app::books::models::BookInput;
use shelf_app::books::validation::{self, ValidationError};

/// Validate every entry in `path`, printing one line per entry.
pub fn run(path: &Path, update: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let entries =
        parse_entries(&raw).with_context(|| format!("failed to parse {}", path.display()))?;

    let total = entries.len();
    let mut rejected = 0;
    for (index, input) in entries.into_iter().enumerate() {
        match check(input, update) {
            Ok(()) => println!("entry #{index}: ok"),
            Err(err) => {
                rejected += 1;
                println!("entry #{index}: rejected");
                for violation in err.violations() {
                    println!("  - {violation}");
                }
            }
        }
    }

    if rejected > 0 {
        bail!("{rejected} of {total} entries rejected");
    }
    Ok(())
}

fn parse_entries(raw: &str) -> anyhow::Result<Vec<BookInput>> {
    let entries = match serde_json::from_str::<Value>(raw)? {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<BookInput>, _>>()?,
        single => vec![serde_json::from_value(single)?],
    };
    Ok(entries)
}

fn check(input: BookInput, update: bool) -> Result<(), ValidationError> {
    if update {
        validation::validate_update(input).map(drop)
    } else {
        validation::validate(input).map(drop)
    }
}
