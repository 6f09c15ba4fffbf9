use anyhow::Result;

use histali::validate::{percent, validate_file, Distribution, Issue};

use super::report_missing;
use crate::cli::ValidateArgs;

const SHOWN: usize = 10;

fn print_distribution(title: &str, dist: &Distribution, total: Option<usize>) {
    println!("{title}:");
    for (value, count) in dist.iter() {
        match total {
            Some(total) => println!("  {value}: {count} ({:.1}%)", percent(count, total)),
            None => println!("  {value}: {count}"),
        }
    }
}

fn print_issues(title: &str, issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }
    println!("\n{title}:");
    for issue in issues.iter().take(SHOWN) {
        println!("  - {issue}");
    }
    if issues.len() > SHOWN {
        println!("  ... and {} more", issues.len() - SHOWN);
    }
}

pub fn run(args: ValidateArgs) -> Result<bool> {
    if !args.catalog.exists() {
        report_missing("catalog", &args.catalog, "Run `histali merge` or `histali extract` first");
        return Ok(false);
    }

    let report = validate_file(&args.catalog)?;
    println!("Validating {} food items...\n", report.total);

    print_distribution("Histamine level distribution", &report.levels, Some(report.total));
    println!();
    print_distribution("Flag distribution", &report.flags, None);
    println!();
    print_distribution("Category distribution", &report.categories, Some(report.total));

    println!("\n{}", "=".repeat(50));
    println!("Validation complete:");
    println!("  Total items: {}", report.total);
    println!("  Errors: {}", report.errors.len());
    println!("  Warnings: {}", report.warnings.len());
    if !report.duplicates.is_empty() {
        println!("  Potential duplicates: {}", report.duplicates.len());
    }

    print_issues("Errors", &report.errors);
    print_issues("Warnings", &report.warnings);

    if report.meets_minimum(args.min_items) {
        println!("\n✓ Item count ({}) meets expectations", report.total);
    } else {
        println!(
            "\n⚠️  Only {} items, expected at least {}",
            report.total, args.min_items
        );
    }

    Ok(report.is_success())
}
