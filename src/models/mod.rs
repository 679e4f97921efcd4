pub mod question;
pub mod report;

pub use question::{analyze, PayloadStats, Question, QuestionType};
pub use report::{Finding, Report, Severity};
