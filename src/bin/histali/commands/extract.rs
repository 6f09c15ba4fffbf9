use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use histali::catalog::write_json_pretty;
use histali::{build_catalog, extract, get_tables, Config, Tables};

use super::report_missing;
use crate::cli::ExtractArgs;

const TRANSLATION_PREFIX: &str = "translated-";

/// The `translated-*.html` file in `dir` that sorts last by name.
fn latest_translation(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(TRANSLATION_PREFIX) && n.ends_with(".html"));
        if matches {
            candidates.push(path);
        }
    }
    candidates.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    Ok(candidates.into_iter().next())
}

fn resolve_input(args: &ExtractArgs) -> Result<PathBuf> {
    if let Some(path) = &args.input {
        return Ok(path.clone());
    }
    match latest_translation(&args.translations_dir)? {
        Some(path) => {
            if let Some(name) = path.file_name() {
                println!("Using latest translation: {}", name.to_string_lossy());
            }
            Ok(path)
        }
        None => Ok(args.fallback.clone()),
    }
}

fn load_tables(args: &ExtractArgs) -> Result<Tables> {
    match &args.tables {
        Some(path) => Tables::from_file(path)
            .with_context(|| format!("failed to load tables from {}", path.display())),
        None => get_tables(&args.locale)
            .with_context(|| format!("no bundled tables for locale {}", args.locale)),
    }
}

pub fn run(args: ExtractArgs) -> Result<bool> {
    let html_path = resolve_input(&args)?;
    if !html_path.exists() {
        report_missing("HTML file", &html_path, "Run ./scripts/pdf_to_html.sh first to generate the HTML file");
        return Ok(false);
    }

    let tables = load_tables(&args)?;
    let config = Config::default()
        .with_derive_unknown_subcategories(args.derive_unknown_subcategories)
        .with_report_incomplete(!args.no_report_incomplete);

    println!("Loading {}...", html_path.display());
    let html = fs::read_to_string(&html_path)
        .with_context(|| format!("failed to read {}", html_path.display()))?;
    let extraction = extract(&html, &tables, &config)?;
    if !extraction.started {
        warn!(
            marker = %tables.start_category().marker,
            "start marker not found, no records extracted"
        );
    }
    info!(
        records = extraction.records.len(),
        incomplete = extraction.incomplete.len(),
        locale = %tables.locale,
        "extracted records"
    );
    println!("Found {} food items", extraction.records.len());

    println!("Removing duplicates...");
    let (catalog, duplicates) = build_catalog(extraction.records, &tables);
    println!("Unique items: {}", catalog.foods.len());
    if !duplicates.is_empty() {
        info!(duplicates = duplicates.len(), "dropped duplicate names");
    }

    println!("Creating JSON...");
    write_json_pretty(&args.output, &catalog)
        .with_context(|| format!("failed to write catalog {}", args.output.display()))?;
    println!("Saved to {}", args.output.display());

    println!("\nFirst 10 items:");
    for food in catalog.foods.iter().take(10) {
        let record = &food.record;
        let flags = if record.flags.is_empty() {
            "none".to_string()
        } else {
            record
                .flags
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let level = record.histamine_level.as_str();
        let short = level.get(..4).unwrap_or(level);
        println!("  [{short}] {} (flags: {flags})", record.name);
    }

    println!("\nStatistics:");
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for food in &catalog.foods {
        *counts.entry(food.record.histamine_level.as_str()).or_insert(0) += 1;
    }
    for (level, count) in counts {
        println!("  {level}: {count}");
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_translation_sorts_by_name_descending() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "translated-2024-01-05.html",
            "translated-2024-08-29.html",
            "notes.html",
            "translated-2024-03-01.txt",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let latest = latest_translation(dir.path()).unwrap().unwrap();
        assert_eq!(latest.file_name().unwrap(), "translated-2024-08-29.html");
    }

    #[test]
    fn test_missing_translations_dir_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(latest_translation(&dir.path().join("missing")).unwrap().is_none());
    }
}
