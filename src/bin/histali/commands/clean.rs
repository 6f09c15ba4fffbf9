use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use histali::preprocess::clean_html;

use super::{group_thousands, report_missing};
use crate::cli::CleanArgs;

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_clean.html"))
}

pub fn run(args: CleanArgs) -> Result<bool> {
    if !args.input.exists() {
        report_missing("HTML file", &args.input, "Run ./scripts/pdf_to_html.sh first to generate the HTML file");
        return Ok(false);
    }
    let output = args.output.unwrap_or_else(|| default_output(&args.input));

    let html = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let (cleaned, stats) = clean_html(&html);
    fs::write(&output, cleaned).with_context(|| format!("failed to write {}", output.display()))?;

    info!(input = %args.input.display(), output = %output.display(), "cleaned html");

    println!("Original size: {} bytes", group_thousands(stats.original_size));
    println!("Final size: {} bytes", group_thousands(stats.final_size));
    println!("Reduction: {:.1}%", stats.reduction_percent());
    println!("Data URLs removed: {}", stats.data_urls_removed);
    println!("Font-face blocks removed: {}", stats.font_faces_removed);
    Ok(true)
}
