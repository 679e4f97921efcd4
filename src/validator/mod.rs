pub mod basic;
pub mod comprehensive;

pub use basic::validate as validate_basic;
pub use comprehensive::validate as validate_comprehensive;
