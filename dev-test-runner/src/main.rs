//! Fixture runner: derive each fixture's schema, render it as TypeScript and
//! compare against the expected text.
//!
//! Fixture files are JSON: `{ "name": ..., "schema": ..., "typescript": ... }`
//! or an array of such cases.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use schema_typeof::codegen::render;
use schema_typeof::path_de::from_str_with_path;
use schema_typeof::type_of_schema;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    name: String,
    schema: Value,
    typescript: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Many(Vec<Case>),
    One(Case),
}

/// Every `*.json` file directly under `dir`, in path order.
fn fixture_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/*.json", dir.display());
    let mut paths = glob::glob(&pattern)
        .with_context(|| format!("bad fixture pattern {pattern}"))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to list {}", dir.display()))?;
    paths.sort();
    Ok(paths)
}

fn load_cases(path: &Path) -> Result<Vec<Case>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file = from_str_with_path::<FixtureFile>(&source)
        .with_context(|| format!("bad fixture {}", path.display()))?;
    Ok(match file {
        FixtureFile::Many(cases) => cases,
        FixtureFile::One(case) => vec![case],
    })
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));

    let mut passed = 0usize;
    let mut failed = 0usize;
    for path in fixture_paths(&dir)? {
        for case in load_cases(&path)? {
            let actual = render(&type_of_schema(&case.schema));
            if actual == case.typescript {
                passed += 1;
                eprintln!("{} {}", "✅ pass".green(), case.name);
            } else {
                failed += 1;
                eprintln!("{} {} ({})", "❌ fail".red(), case.name, path.display());
                eprintln!("   expected: {}", case.typescript);
                eprintln!("   actual:   {}", actual.yellow());
            }
        }
    }

    eprintln!("—— {passed} passed, {failed} failed ——");
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    #[test]
    fn lists_json_fixtures_in_order() {
        let names = fixture_paths(&fixtures_dir())
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect::<Vec<_>>();
        assert_eq!(names, ["arrays.json", "combinators.json", "objects.json", "primitives.json"]);
    }

    #[test]
    fn every_fixture_passes() {
        for path in fixture_paths(&fixtures_dir()).unwrap() {
            for case in load_cases(&path).unwrap() {
                assert_eq!(render(&type_of_schema(&case.schema)), case.typescript, "{}", case.name);
            }
        }
    }
}
