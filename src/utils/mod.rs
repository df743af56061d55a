pub mod normalize;
pub mod validate;

pub use normalize::normalize_name;
pub use validate::{require, validate_email, ValidationError};
