use anyhow::{Context, Result};
use std::process::Command;

/// Check if the encoder binary is available and return its version line
pub fn encoder_version(program: &str) -> Result<String> {
    let output = Command::new(program)
        .arg("-version")
        .output()
        .with_context(|| format!("Failed to execute {program}. Is it installed and in PATH?"))?;

    if !output.status.success() {
        anyhow::bail!("{program} command failed with status: {}", output.status);
    }

    let version_output = String::from_utf8_lossy(&output.stdout);
    let first_line = version_output.lines().next().unwrap_or("Unknown version");

    Ok(first_line.to_string())
}
