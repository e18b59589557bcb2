//! Template command

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::output::Output;
use crate::storage::{default_template_name, write_template};

/// Writes the input template to `destination`, stdout for `-`
pub fn run(output: &Output, destination: Option<&Path>) -> Result<()> {
    if destination == Some(Path::new("-")) {
        output.verbose_ctx("template", "Writing template to stdout");
        return write_template(io::stdout().lock());
    }

    let path = destination
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_template_name()));
    output.verbose_ctx("template", &format!("Writing template to {}", path.display()));

    let file = File::create(&path)
        .with_context(|| format!("Failed to create template: {}", path.display()))?;
    write_template(BufWriter::new(file))?;

    output.success(&format!("Created template {}", path.display()));
    Ok(())
}
