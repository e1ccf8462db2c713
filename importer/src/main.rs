//! catalog-import CLI - Turn a catalog CSV into an SQL script
//!
//! ```bash
//! catalog-import catalog.csv                      # output/out_<ts>/insert.sql
//! catalog-import catalog.csv --layout file        # output/out_<ts>.sql
//! catalog-import catalog.csv --upsert --schema    # ON DUPLICATE KEY UPDATE + CREATE TABLE
//! catalog-import --version
//! ```

use clap::Parser;
use catalog_import::{import_csv, ImportOptions, OutputLayout, ParseOptions, WriteMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "catalog-import", version)]
#[command(about = "Convert a music lesson catalog CSV into SQL insert statements", long_about = None)]
struct Cli {
    /// Path to input file
    file: PathBuf,

    /// Column translation file
    #[arg(long, env = "CATALOG_IMPORT_LANG", default_value = "lang.json")]
    lang: PathBuf,

    /// Directory receiving the out_<timestamp> output
    #[arg(short, long, env = "CATALOG_IMPORT_OUTPUT", default_value = "output")]
    output_dir: PathBuf,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputLayout::Directory)]
    layout: OutputLayout,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// CSV encoding label, e.g. utf-8 or windows-1252 (auto-detect if not specified)
    #[arg(short, long)]
    encoding: Option<String>,

    /// Render INSERT ... ON DUPLICATE KEY UPDATE instead of plain INSERT
    #[arg(long)]
    upsert: bool,

    /// Prepend CREATE TABLE statements
    #[arg(long)]
    schema: bool,
}

impl Cli {
    fn options(&self) -> ImportOptions {
        ImportOptions {
            translations_path: self.lang.clone(),
            output_root: self.output_dir.clone(),
            layout: self.layout,
            parse: ParseOptions {
                delimiter: self.delimiter,
                encoding: self.encoding.clone(),
            },
            write_mode: if self.upsert { WriteMode::Upsert } else { WriteMode::Insert },
            include_schema: self.schema,
            ..ImportOptions::default()
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    eprintln!("📄 Processing: {}", cli.file.display());

    match import_csv(&cli.file, &cli.options()) {
        Ok(report) => {
            eprintln!("\n📊 Summary:");
            eprintln!("   Rows: {} ({} duplicate IDs dropped)",
                report.csv_info.row_count, report.duplicates_dropped);
            eprintln!("   Types: {}", report.types);
            eprintln!("   Tags: {}", report.tags);
            eprintln!("   Pieces: {}", report.pieces);
            eprintln!("   Bindings: {}", report.bindings);
            eprintln!("   💾 {} statements written to: {}",
                report.statements, report.output.sql_file.display());
            eprintln!("\n✨ Done!");
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}
