pub mod de;
pub mod ser;
pub mod value;

pub use de::{decode, DecodeError};
pub use ser::serialize;
pub use value::{PhpKey, PhpValue};
