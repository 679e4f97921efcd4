use crate::validator;
use crate::{combine, Colorize, Result};
use std::path::Path;

/// Merge the four section files and re-validate the result
pub fn run(dir: &Path) -> Result<bool> {
    let result = combine::combine(dir)?;

    println!(
        "\n{} Combined XML written to: {}",
        "✓".green(),
        result.output_path.display()
    );
    println!("  Question elements: {}", result.question_elements);
    if !result.skipped.is_empty() {
        for entry in &result.skipped {
            println!("  {} Skipped {}", "⚠".yellow(), entry);
        }
    }

    println!("\n{}", "Validating with comprehensive validator...".cyan());
    let content = std::fs::read_to_string(&result.output_path)?;
    let report = validator::validate_comprehensive(&content)?;
    report.print_summary("VALIDATION SUMMARY");

    Ok(report.passed())
}
