// Wxrkit - toolkit for WordPress WXR quiz exports
// Serializes, validates, repairs and combines the PHP-serialized
// question payloads embedded in WXR CDATA blocks.

pub mod cli;
pub mod combine;
pub mod models;
pub mod php;
pub mod repair;
pub mod validator;
pub mod wxr;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{PayloadStats, Question, Report, Severity};
pub use php::{decode, serialize, DecodeError, PhpKey, PhpValue};
