use crate::models::analyze;
use crate::php::decode;
use crate::wxr::extract;
use crate::{Colorize, Result};
use std::path::Path;

/// Decode a payload and dump it as JSON with a per-type tally
pub fn run(file: &Path, key: Option<&str>) -> Result<bool> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    let content = std::fs::read_to_string(file)?;
    let key = key.unwrap_or(extract::QUESTIONS_KEY);

    let Some(pair) = extract::find_meta(&content, key)? else {
        println!("{} No {} meta key found", "⚠".yellow(), key);
        return Ok(false);
    };

    let value = match decode(pair.value.as_bytes()) {
        Ok(value) => value,
        Err(err) => {
            println!("{} Cannot unserialize {}: {}", "❌".red(), key, err);
            return Ok(false);
        }
    };

    println!("{}", serde_json::to_string_pretty(&value.to_json())?);

    if value.as_array().is_some() {
        let stats = analyze(&value);
        println!("\nElements: {}", stats.elements);
        println!("Question numbers covered: {}", stats.numbers_covered);
        if !stats.type_tally.is_empty() {
            println!("Types:");
            for (type_name, count) in &stats.type_tally {
                println!("  - {}: {}", type_name, count);
            }
        }
        for warning in &stats.warnings {
            println!("{} {}", "⚠".yellow(), warning);
        }
    }

    Ok(true)
}
