use anyhow::{Context, Result};
use tracing::info;

use histali::catalog::write_json_pretty;
use histali::get_tables;
use histali::merge::merge_chunks;

use super::report_missing;
use crate::cli::MergeArgs;

pub fn run(args: MergeArgs) -> Result<bool> {
    if !args.chunks_dir.is_dir() {
        report_missing("chunks directory", &args.chunks_dir, "Place chunk-*.json files there first");
        return Ok(false);
    }

    let tables = get_tables(&args.locale)
        .with_context(|| format!("no bundled tables for locale {}", args.locale))?;
    let (catalog, report) = merge_chunks(&args.chunks_dir, &tables)?;

    for (path, count) in &report.chunks {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("{name}: {count} items");
    }
    if report.chunks.is_empty() {
        info!(dir = %args.chunks_dir.display(), "no chunk files found");
    }

    println!("\nTotal items before deduplication: {}", report.total_before_dedup);
    println!("Duplicates removed: {}", report.duplicates.len());
    println!("Unique items: {}", catalog.foods.len());

    write_json_pretty(&args.output, &catalog)
        .with_context(|| format!("failed to write catalog {}", args.output.display()))?;

    println!("\nOutput written to: {}", args.output.display());
    println!("Final item count: {}", catalog.foods.len());

    println!("\nCategory breakdown:");
    for (category, count) in &report.categories {
        println!("  {category}: {count}");
    }

    Ok(true)
}
