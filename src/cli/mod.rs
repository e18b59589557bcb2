//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `analyze <file>` | Print career statistics and overlap ranges |
//! | `export <file>` | Write results as CSV or JSON |
//! | `template` | Write a blank input sheet |
//! | `config show`, `config path` | Inspect configuration |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! career-span --verbose analyze career.csv
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod analyze;
mod app;
mod config_cmd;
mod output;
mod template_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
