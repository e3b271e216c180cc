mod cents;
mod helpers;
mod op;
mod secret;

pub use cents::{Cents, CentsConversionError, DEFAULT_CURRENCY};
pub use helpers::parse_boolean_flag;
pub use secret::Secret;
