use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "histali",
    version,
    about = "Extract a histamine food compatibility catalog from pdftohtml output"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Strip embedded base64 images and fonts from an HTML file.
    Clean(CleanArgs),
    /// Extract food records from the HTML into a JSON catalog.
    Extract(ExtractArgs),
    /// Merge chunk-*.json fragments into one catalog.
    Merge(MergeArgs),
    /// Check a catalog and print distributions.
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    pub input: PathBuf,

    /// Defaults to `<stem>_clean.html` next to the input.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Defaults to the latest translation, then to the fallback file.
    pub input: Option<PathBuf>,

    #[arg(long, default_value = "data/sk.json")]
    pub output: PathBuf,

    #[arg(long, default_value = "sk")]
    pub locale: String,

    /// Custom lookup tables (TOML); overrides --locale.
    #[arg(long)]
    pub tables: Option<PathBuf>,

    #[arg(long, default_value = "source/translations")]
    pub translations_dir: PathBuf,

    #[arg(long, default_value = "foodlist.html")]
    pub fallback: PathBuf,

    #[arg(long, default_value_t = false)]
    pub derive_unknown_subcategories: bool,

    #[arg(long, default_value_t = false)]
    pub no_report_incomplete: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    #[arg(long, default_value = "extraction/chunks")]
    pub chunks_dir: PathBuf,

    #[arg(long, default_value = "extraction/output/en.json")]
    pub output: PathBuf,

    #[arg(long, default_value = "en")]
    pub locale: String,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(default_value = "extraction/output/en.json")]
    pub catalog: PathBuf,

    #[arg(long, default_value_t = histali::validate::DEFAULT_MIN_ITEMS)]
    pub min_items: usize,
}
