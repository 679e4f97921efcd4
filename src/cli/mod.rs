pub mod check;
pub mod combine;
pub mod fix;
pub mod generate;
pub mod inspect;
pub mod validate;
