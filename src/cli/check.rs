use crate::validator;
use crate::Result;
use std::path::Path;

/// Run the comprehensive eight-check validator
pub fn run(file: &Path) -> Result<bool> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    println!("{}", "=".repeat(72));
    println!("COMPREHENSIVE XML VALIDATION");
    println!("{}", "=".repeat(72));
    println!("File: {}\n", file.display());

    let content = std::fs::read_to_string(file)?;
    let report = validator::validate_comprehensive(&content)?;

    report.print_summary("VALIDATION SUMMARY");

    Ok(report.passed())
}
