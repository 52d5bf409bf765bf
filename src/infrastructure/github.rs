//! GitHub Actions step outputs

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Append `key=value` to the `GITHUB_OUTPUT` file
pub fn append_output(output_file: &Path, key: &str, value: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_file)?;
    writeln!(file, "{key}={value}")
}
