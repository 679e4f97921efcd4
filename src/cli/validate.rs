use crate::cli::fix::default_output;
use crate::validator;
use crate::{Colorize, Result};
use std::path::Path;

/// Run the four-check validator; `--fix` writes a sibling `-fixed.xml`.
///
/// Returns false (exit 1) only on hard issues that were not fixed.
pub fn run(file: &Path, fix: bool) -> Result<bool> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    println!("Validating: {}", file.display());
    println!("{}\n", "=".repeat(70));

    let content = std::fs::read_to_string(file)?;
    let (report, fixed) = validator::validate_basic(&content, fix)?;

    report.print_summary("VALIDATION SUMMARY");

    if let Some(fixed_content) = fixed {
        let output = default_output(file);
        std::fs::write(&output, fixed_content)?;
        println!(
            "\n{} FIXED VERSION SAVED TO: {}",
            "✓".green(),
            output.display()
        );
        println!("\nPlease re-run validation on the fixed file to confirm all issues are resolved.");
        return Ok(true);
    }

    if !report.passed() {
        println!("\nTo automatically fix issues, run:");
        println!("  wxrkit validate \"{}\" --fix", file.display());
        return Ok(false);
    }

    Ok(true)
}
