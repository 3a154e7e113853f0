use std::fs;
use std::path::Path;

use docdelta_diff::{DiffKind, DiffOptions, DiffStats, diff_html};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    original: String,
    modified: String,
    #[serde(default)]
    options: DiffOptions,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
struct Expected {
    has_changes: bool,
    item_types: Vec<DiffKind>,
    stats: DiffStats,
    finding_codes: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let fixtures_dir = repo_root.join("fixtures");

    let mut entries = fs::read_dir(&fixtures_dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|e| e.path());

    let mut checked = 0usize;
    for entry in entries {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let raw = fs::read_to_string(&path)?;
        let fixture: Fixture = serde_json::from_str(&raw)?;
        let result = diff_html(&fixture.original, &fixture.modified, &fixture.options)?;

        if result.has_changes != fixture.expected.has_changes {
            return Err(format!(
                "fixture {}: has_changes mismatch: expected {}, got {}",
                fixture.name, fixture.expected.has_changes, result.has_changes
            )
            .into());
        }

        let item_types = result
            .diff_items
            .iter()
            .map(|item| item.kind)
            .collect::<Vec<_>>();
        if item_types != fixture.expected.item_types {
            return Err(format!(
                "fixture {}: item_types mismatch: expected {:?}, got {:?}",
                fixture.name, fixture.expected.item_types, item_types
            )
            .into());
        }

        if result.stats != fixture.expected.stats {
            return Err(format!(
                "fixture {}: stats mismatch: expected {:?}, got {:?}",
                fixture.name, fixture.expected.stats, result.stats
            )
            .into());
        }

        let finding_codes = result
            .findings
            .iter()
            .map(|f| f.code.clone())
            .collect::<Vec<_>>();
        if finding_codes != fixture.expected.finding_codes {
            return Err(format!(
                "fixture {}: finding_codes mismatch: expected {:?}, got {:?}",
                fixture.name, fixture.expected.finding_codes, finding_codes
            )
            .into());
        }

        checked += 1;
    }

    println!("replayed {checked} fixture(s)");
    Ok(())
}
