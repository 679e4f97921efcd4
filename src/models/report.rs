use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Hard issue - the file should not be imported, exit code 1
    Issue,
    /// Non-fatal - the file may import but deserves review
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub message: String,
    pub severity: Severity,
}

/// Accumulated result of a validation run.
///
/// Mirrors the original scripts: hard issues and warnings are collected
/// separately, plus informational key/value lines for the summary block.
#[derive(Debug, Default)]
pub struct Report {
    pub findings: Vec<Finding>,
    pub info: Vec<(String, String)>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, message: impl Into<String>) {
        self.findings.push(Finding {
            message: message.into(),
            severity: Severity::Issue,
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.findings.push(Finding {
            message: message.into(),
            severity: Severity::Warning,
        });
    }

    pub fn note(&mut self, key: impl Into<String>, value: impl ToString) {
        self.info.push((key.into(), value.to_string()));
    }

    pub fn issues(&self) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Issue)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .collect()
    }

    /// Passed means no hard issues; warnings do not fail a run
    pub fn passed(&self) -> bool {
        self.issues().is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Print the summary block in the original validators' layout
    pub fn print_summary(&self, banner: &str) {
        println!("\n{}", "=".repeat(72));
        println!("{}", banner);
        println!("{}\n", "=".repeat(72));

        if !self.info.is_empty() {
            println!("FILE INFORMATION:");
            for (key, value) in &self.info {
                println!("  - {}: {}", key, value);
            }
            println!();
        }

        if self.is_clean() {
            println!("{}", "✓ ALL CHECKS PASSED".green());
            return;
        }

        let issues = self.issues();
        if !issues.is_empty() {
            println!("{}", format!("❌ ISSUES FOUND ({}):", issues.len()).red());
            for (i, finding) in issues.iter().enumerate() {
                println!("  {}. {}", i + 1, finding.message);
            }
            println!();
        }

        let warnings = self.warnings();
        if !warnings.is_empty() {
            println!("{}", format!("⚠ WARNINGS ({}):", warnings.len()).yellow());
            for (i, finding) in warnings.iter().enumerate() {
                println!("  {}. {}", i + 1, finding.message);
            }
            println!();
        }

        if !issues.is_empty() {
            println!("{}", "❌ VALIDATION FAILED".red());
        } else {
            println!("{}", "⚠ VALIDATION PASSED WITH WARNINGS".yellow());
        }
    }
}
