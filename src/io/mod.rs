pub mod loader;
pub mod output;

pub use loader::{
    append_feedback, load_advisory, load_feedback, load_testcases, parse_feedback_value,
    parse_testcases,
};
pub use output::{create_writer, OutputFormat, OutputWriter};

use anyhow::Result;
use std::fs;
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}
