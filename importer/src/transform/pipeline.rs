//! High-level import API: CSV file in, SQL script out.
//!
//! Combines parsing, translation loading, the catalog transform, statement
//! rendering and output layout.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_import::{import_csv, ImportOptions};
//! use std::path::Path;
//!
//! let report = import_csv(Path::new("catalog.csv"), &ImportOptions::default())?;
//! println!("Wrote {} statements to {}", report.statements, report.output.sql_file.display());
//! ```

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::catalog::{transform_with_columns, CatalogColumns};
use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::NormalizedCatalog;
use crate::parser::{parse_csv_file, ParseOptions};
use crate::sql::{create_table, insert, upsert, Fields};
use crate::translation::TranslationTable;

pub const TYPES_TABLE: &str = "types";
pub const TAGS_TABLE: &str = "tags";
pub const PIECES_TABLE: &str = "pieces";
pub const PIECE_TAGS_TABLE: &str = "piece_tags";

/// SQL script name inside a run directory
pub const SQL_FILE_NAME: &str = "insert.sql";
/// Upload directory inside a run directory
pub const UPLOADS_DIR_NAME: &str = "uploads";

/// Where a run writes its SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// `<root>/out_<ts>/insert.sql` plus an empty `uploads/` directory
    #[default]
    Directory,
    /// `<root>/out_<ts>.sql`
    File,
}

/// Statement kind used for every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Plain `INSERT`
    #[default]
    Insert,
    /// `INSERT ... ON DUPLICATE KEY UPDATE`
    Upsert,
}

impl WriteMode {
    pub fn render(self, table: &str, fields: &Fields) -> String {
        match self {
            WriteMode::Insert => insert(table, fields),
            WriteMode::Upsert => upsert(table, fields),
        }
    }
}

/// Options for an import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Column translation resource
    pub translations_path: PathBuf,

    /// Directory that receives the `out_<ts>` outputs
    pub output_root: PathBuf,

    pub layout: OutputLayout,

    /// Delimiter / encoding overrides
    #[serde(default)]
    pub parse: ParseOptions,

    pub write_mode: WriteMode,

    /// Prepend CREATE TABLE statements
    pub include_schema: bool,

    #[serde(default)]
    pub columns: CatalogColumns,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            translations_path: PathBuf::from("lang.json"),
            output_root: PathBuf::from("output"),
            layout: OutputLayout::default(),
            parse: ParseOptions::default(),
            write_mode: WriteMode::default(),
            include_schema: false,
            columns: CatalogColumns::default(),
        }
    }
}

/// Paths allocated for one run
#[derive(Debug, Clone, Serialize)]
pub struct OutputTarget {
    pub sql_file: PathBuf,
    /// Run directory (directory layout only)
    pub run_dir: Option<PathBuf>,
    /// Upload directory (directory layout only)
    pub uploads_dir: Option<PathBuf>,
}

impl OutputTarget {
    /// Allocate the output location for a run started at `timestamp`.
    ///
    /// Fails if the run directory already exists.
    pub fn create(root: &Path, layout: OutputLayout, timestamp: i64) -> PipelineResult<Self> {
        fs::create_dir_all(root).map_err(|e| PipelineError::output(root, e))?;

        match layout {
            OutputLayout::Directory => {
                let run_dir = root.join(format!("out_{}", timestamp));
                fs::create_dir(&run_dir).map_err(|e| PipelineError::output(&run_dir, e))?;

                let uploads_dir = run_dir.join(UPLOADS_DIR_NAME);
                fs::create_dir(&uploads_dir).map_err(|e| PipelineError::output(&uploads_dir, e))?;

                Ok(Self {
                    sql_file: run_dir.join(SQL_FILE_NAME),
                    run_dir: Some(run_dir),
                    uploads_dir: Some(uploads_dir),
                })
            }
            OutputLayout::File => Ok(Self {
                sql_file: root.join(format!("out_{}.sql", timestamp)),
                run_dir: None,
                uploads_dir: None,
            }),
        }
    }
}

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub output: OutputTarget,
    pub csv_info: CsvInfo,
    /// `(source, canonical)` column renames
    pub renamed: Vec<(String, String)>,
    pub duplicates_dropped: usize,
    pub types: usize,
    pub tags: usize,
    pub pieces: usize,
    pub bindings: usize,
    pub statements: usize,
}

/// Import a catalog CSV and write its SQL script.
///
/// 1. Parses the CSV
/// 2. Loads the translation table
/// 3. Runs the catalog transform
/// 4. Renders the statements
/// 5. Allocates `out_<unix-ts>` under the output root and writes them
///
/// Nothing is written unless steps 1-4 succeed.
pub fn import_csv(path: &Path, options: &ImportOptions) -> PipelineResult<ImportReport> {
    let timestamp = chrono::Utc::now().timestamp();
    import_csv_at(path, options, timestamp)
}

/// [`import_csv`] with an explicit run timestamp.
pub fn import_csv_at(
    path: &Path,
    options: &ImportOptions,
    timestamp: i64,
) -> PipelineResult<ImportReport> {
    log_info(format!("📖 Reading CSV file: {}", path.display()));
    let parsed = parse_csv_file(path, &options.parse)?;
    log_success(format!("Encoding: {}", parsed.encoding));
    log_success(format!("Delimiter: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} rows", parsed.table.len()));

    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter,
        headers: parsed.table.headers.clone(),
        row_count: parsed.table.len(),
    };

    log_info(format!("📋 CSV has {} columns:", csv_info.headers.len()));
    for (i, col) in csv_info.headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }

    log_info(format!("🌐 Loading translations: {}", options.translations_path.display()));
    let translations = TranslationTable::load(&options.translations_path)?;
    log_success(format!("{} canonical columns", translations.len()));

    let catalog = transform_with_columns(parsed.table, &translations, &options.columns)?;

    log_info("⚙️  Rendering SQL...");
    let statements = render_statements(&catalog, options);

    log_info("📁 Creating output location...");
    let output = OutputTarget::create(&options.output_root, options.layout, timestamp)?;
    log_success(format!("Output: {}", output.sql_file.display()));

    write_statements(&output.sql_file, &statements)?;
    log_success(format!("Wrote {} statements", statements.len()));

    // Binding catalog rows to uploaded files has no defined behavior yet;
    // `uploads/` is created empty for it.
    log_info("Generating items");
    log_warning("Item generation is not supported, skipped");

    Ok(ImportReport {
        output,
        csv_info,
        renamed: catalog.renamed,
        duplicates_dropped: catalog.duplicates_dropped,
        types: catalog.types.len(),
        tags: catalog.tags.len(),
        pieces: catalog.pieces.len(),
        bindings: catalog.bindings.len(),
        statements: statements.len(),
    })
}

/// CREATE TABLE statements for the target schema.
pub fn schema_statements() -> Vec<String> {
    vec![
        create_table(
            TYPES_TABLE,
            &[
                ("id", "integer primary key auto_increment"),
                ("type", "varchar(255) not null unique"),
            ],
        ),
        create_table(
            TAGS_TABLE,
            &[
                ("id", "integer primary key auto_increment"),
                ("name", "varchar(255) not null unique"),
            ],
        ),
        create_table(
            PIECES_TABLE,
            &[
                ("id", "integer primary key auto_increment"),
                ("name", "varchar(255) not null unique"),
            ],
        ),
        create_table(
            PIECE_TAGS_TABLE,
            &[
                ("piece", "varchar(255) not null references pieces(name)"),
                ("tag", "varchar(255) not null references tags(name)"),
            ],
        ),
    ]
}

/// Render the whole script: schema (optional), types, tags, pieces, bindings.
pub fn render_statements(catalog: &NormalizedCatalog, options: &ImportOptions) -> Vec<String> {
    let mode = options.write_mode;
    let mut statements = Vec::new();

    if options.include_schema {
        statements.extend(schema_statements());
    }

    statements.extend(
        catalog
            .types
            .iter()
            .map(|t| mode.render(TYPES_TABLE, &Fields::new().with("type", t))),
    );
    statements.extend(
        catalog
            .tags
            .iter()
            .map(|t| mode.render(TAGS_TABLE, &Fields::new().with("name", t))),
    );
    statements.extend(
        catalog
            .pieces
            .iter()
            .map(|p| mode.render(PIECES_TABLE, &Fields::new().with("name", p))),
    );
    statements.extend(catalog.bindings.iter().map(|b| {
        mode.render(
            PIECE_TAGS_TABLE,
            &Fields::new().with("piece", &b.piece).with("tag", &b.tag),
        )
    }));

    statements
}

/// Write statements one per line. Never overwrites an existing file.
pub fn write_statements(path: &Path, statements: &[String]) -> PipelineResult<()> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| PipelineError::output(path, e))?;

    let mut writer = BufWriter::new(file);
    for statement in statements {
        writeln!(writer, "{}", statement).map_err(|e| PipelineError::output(path, e))?;
    }
    writer.flush().map_err(|e| PipelineError::output(path, e))
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use tempfile::TempDir;

    const LANG: &str = r#"{
        "ID": [ { "en": "ID", "nb": "ID" } ],
        "Type": [ { "en": "Type", "nb": "Type" } ],
        "Name": [ { "en": "Name", "nb": "Navn" } ],
        "Composer": [ { "en": "Composer", "nb": "Komponist" } ],
        "Instrument": [ { "en": "Instrument", "nb": "Instrument" } ],
        "Grade": [ { "en": "Grade", "nb": "Nivå" } ],
        "Scale": [ { "en": "Scale", "nb": "Skala" } ]
    }"#;

    struct Fixture {
        dir: TempDir,
        options: ImportOptions,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let lang = dir.path().join("lang.json");
            fs::write(&lang, LANG).unwrap();
            let options = ImportOptions {
                translations_path: lang,
                output_root: dir.path().join("output"),
                ..ImportOptions::default()
            };
            Self { dir, options }
        }

        fn csv(&self, content: &str) -> PathBuf {
            let path = self.dir.path().join("catalog.csv");
            fs::write(&path, content).unwrap();
            path
        }
    }

    #[test]
    fn test_default_options() {
        let opts = ImportOptions::default();
        assert_eq!(opts.translations_path, PathBuf::from("lang.json"));
        assert_eq!(opts.output_root, PathBuf::from("output"));
        assert_eq!(opts.layout, OutputLayout::Directory);
        assert_eq!(opts.write_mode, WriteMode::Insert);
        assert!(!opts.include_schema);
    }

    #[test]
    fn test_options_from_json() {
        let opts: ImportOptions = serde_json::from_str(
            r#"{
                "translations_path": "lang.json",
                "output_root": "out",
                "layout": "file",
                "write_mode": "upsert",
                "include_schema": true
            }"#,
        )
        .unwrap();
        assert_eq!(opts.layout, OutputLayout::File);
        assert_eq!(opts.write_mode, WriteMode::Upsert);
        assert_eq!(opts.columns, CatalogColumns::default());
    }

    #[test]
    fn test_end_to_end_directory_layout() {
        let fx = Fixture::new();
        let csv = fx.csv(
            "ID,Type,Navn,Komponist,Instrument,Nivå,Skala\n\
             1,Sheet,Minuet,Bach/Handel,Violin,1,G major\n\
             1,Sheet,Minuet,Telemann,Flute,2,D major\n",
        );

        let report = import_csv_at(&csv, &fx.options, 1_700_000_000).unwrap();

        let run_dir = fx.options.output_root.join("out_1700000000");
        assert_eq!(report.output.run_dir.as_deref(), Some(run_dir.as_path()));
        assert_eq!(report.output.sql_file, run_dir.join("insert.sql"));
        assert!(run_dir.join("uploads").is_dir());
        assert_eq!(fs::read_dir(run_dir.join("uploads")).unwrap().count(), 0);

        assert_eq!(report.csv_info.row_count, 2);
        assert_eq!(report.duplicates_dropped, 1);

        let sql = fs::read_to_string(&report.output.sql_file).unwrap();
        let lines: Vec<&str> = sql.lines().collect();
        assert_eq!(
            lines,
            vec![
                "INSERT INTO types (type) VALUES ('Sheet');",
                "INSERT INTO tags (name) VALUES ('Bach');",
                "INSERT INTO tags (name) VALUES ('Handel');",
                "INSERT INTO tags (name) VALUES ('Violin');",
                "INSERT INTO tags (name) VALUES ('1');",
                "INSERT INTO tags (name) VALUES ('G major');",
                "INSERT INTO pieces (name) VALUES ('Minuet');",
                "INSERT INTO piece_tags (piece, tag) VALUES ('Minuet', 'Bach');",
                "INSERT INTO piece_tags (piece, tag) VALUES ('Minuet', 'Handel');",
                "INSERT INTO piece_tags (piece, tag) VALUES ('Minuet', 'Violin');",
                "INSERT INTO piece_tags (piece, tag) VALUES ('Minuet', '1');",
                "INSERT INTO piece_tags (piece, tag) VALUES ('Minuet', 'G major');",
            ]
        );
        assert_eq!(report.statements, lines.len());
    }

    #[test]
    fn test_flat_file_layout_with_upsert_and_schema() {
        let mut fx = Fixture::new();
        fx.options.layout = OutputLayout::File;
        fx.options.write_mode = WriteMode::Upsert;
        fx.options.include_schema = true;
        let csv = fx.csv("ID;Navn\n1;Gavotte\n");

        let report = import_csv_at(&csv, &fx.options, 42).unwrap();

        assert_eq!(report.output.sql_file, fx.options.output_root.join("out_42.sql"));
        assert!(report.output.run_dir.is_none());

        let sql = fs::read_to_string(&report.output.sql_file).unwrap();
        assert!(sql.starts_with("CREATE TABLE types ("));
        assert!(sql.contains(
            "INSERT INTO pieces (name) VALUES ('Gavotte') ON DUPLICATE KEY UPDATE name = 'Gavotte';"
        ));
    }

    #[test]
    fn test_existing_run_directory_is_an_error() {
        let fx = Fixture::new();
        let csv = fx.csv("ID,Name\n1,Minuet\n");

        import_csv_at(&csv, &fx.options, 7).unwrap();
        let err = import_csv_at(&csv, &fx.options, 7).unwrap_err();
        assert!(matches!(err, PipelineError::Output { .. }));
    }

    #[test]
    fn test_missing_name_column_is_schema_error() {
        let fx = Fixture::new();
        let csv = fx.csv("ID,Komponist\n1,Bach\n");

        let err = import_csv_at(&csv, &fx.options, 1).unwrap_err();
        assert!(matches!(err, PipelineError::Catalog(CatalogError::MissingColumn(ref c)) if c == "Name"));
    }

    #[test]
    fn test_missing_input_is_csv_error() {
        let fx = Fixture::new();
        let err = import_csv_at(&fx.dir.path().join("nope.csv"), &fx.options, 1).unwrap_err();
        assert!(matches!(err, PipelineError::Csv(_)));
    }

    #[test]
    fn test_failed_run_writes_nothing() {
        let fx = Fixture::new();
        import_csv_at(&fx.dir.path().join("nope.csv"), &fx.options, 5).unwrap_err();
        assert!(!fx.options.output_root.join("out_5").exists());

        let csv = fx.csv("ID,Komponist\n1,Bach\n");
        import_csv_at(&csv, &fx.options, 6).unwrap_err();
        assert!(!fx.options.output_root.join("out_6").exists());

        let mut fx = fx;
        fx.options.layout = OutputLayout::File;
        fx.options.translations_path = fx.dir.path().join("missing.json");
        let csv = fx.csv("ID,Name\n1,Minuet\n");
        import_csv_at(&csv, &fx.options, 7).unwrap_err();
        assert!(!fx.options.output_root.join("out_7.sql").exists());
    }

    #[test]
    fn test_missing_translations_is_translation_error() {
        let mut fx = Fixture::new();
        fx.options.translations_path = fx.dir.path().join("missing.json");
        let csv = fx.csv("ID,Name\n1,Minuet\n");

        let err = import_csv_at(&csv, &fx.options, 1).unwrap_err();
        assert!(matches!(err, PipelineError::Translation(_)));
    }

    #[test]
    fn test_write_statements_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("insert.sql");
        write_statements(&path, &["SELECT 1;".to_string()]).unwrap();
        assert!(write_statements(&path, &[]).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "SELECT 1;\n");
    }

    #[test]
    fn test_schema_statements_cover_every_table() {
        let schema = schema_statements().join("\n");
        for table in [TYPES_TABLE, TAGS_TABLE, PIECES_TABLE, PIECE_TAGS_TABLE] {
            assert!(schema.contains(&format!("CREATE TABLE {} (", table)));
        }
    }
}
