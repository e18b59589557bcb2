//! # Storage Layer
//!
//! File adapters around the pure domain: reading engagement lists, writing
//! analysis results and loading configuration. Nothing is persisted between
//! runs; every command reads its input file whole and analyzes it once.
//!
//! ## File Formats
//!
//! | Data | Format | Notes |
//! |------|--------|-------|
//! | Engagements | CSV / TSV sheet | Header row located by `사업명` |
//! | Engagements | JSON / YAML | Array of camelCase records |
//! | Results | CSV | Input columns plus a summary block |
//! | Results | JSON | Engagements, analysis and statistics |
//! | Config | TOML | `career-span.toml` or the global config dir |
//!
//! ## Key Types
//!
//! - [`EngagementReader`] - Reads engagements from a file
//! - [`ResultsExport`] - Writes analysis results
//! - [`Config`] - Effective configuration

mod config;
mod export;
mod import;
mod template;

pub use config::{
    ColumnMap, Config, ConfigError, ExportConfig, ImportConfig, OutputFormat, Settings,
    LOCAL_CONFIG_FILE,
};
pub use export::{ExportFormat, ResultsExport};
pub use import::{
    normalize_month, parse_records, parse_rows, read_rows, EngagementReader, ImportError,
    ImportReport, InputFormat, SkipReason, SkippedRow,
};
pub use template::{default_file_name as default_template_name, write_template};
