use crate::repair::{self, RepairOutcome};
use crate::{Colorize, Result};
use std::path::{Path, PathBuf};

/// Derive `<input>-fixed.xml` next to the input
pub fn default_output(input: &Path) -> PathBuf {
    let name = input.to_string_lossy();
    let stem = name.strip_suffix(".xml").unwrap_or(&name);
    PathBuf::from(format!("{}-fixed.xml", stem))
}

/// Repair a document and write the result.
///
/// Returns false (exit 1) when the input is missing or carries none of
/// the six fixable sequences.
pub fn run(input: &Path, output: Option<&Path>) -> Result<bool> {
    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input));

    println!("Input file:  {}", input.display());
    println!("Output file: {}", output.display());
    println!("{}\n", "=".repeat(70));

    let content = std::fs::read_to_string(input)?;
    let (fixed, report) = repair::repair_document(&content)?;

    for (name, count) in &report.scan.counts {
        println!("Replacing {} {} character(s)", count, name);
    }

    if report.outcome == RepairOutcome::NoIssues {
        println!("No problematic UTF-8 characters found.");
        println!("File may have other issues.");
        return Ok(false);
    }

    println!("\nTotal replacements: {}", report.scan.total);
    println!("\nFixing PHP serialized data...");

    for detail in &report.details {
        println!("  {} {}", "✓".green(), detail);
    }
    for warning in &report.warnings {
        println!("  {} {}", "⚠ WARNING:".yellow(), warning);
    }

    // Buffered in memory, written in one call
    std::fs::write(&output, fixed)?;

    println!(
        "\n{} Fixed file saved to: {}",
        "✓".green(),
        output.display()
    );
    println!("\nPlease validate the fixed file using:");
    println!("  wxrkit validate \"{}\"", output.display());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_name() {
        assert_eq!(
            default_output(Path::new("Listening Test 6.xml")),
            PathBuf::from("Listening Test 6-fixed.xml")
        );
        assert_eq!(
            default_output(Path::new("export")),
            PathBuf::from("export-fixed.xml")
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(run(Path::new("/nonexistent/file.xml"), None).is_err());
    }
}
