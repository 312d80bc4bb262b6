pub mod errors;
pub mod types;

pub use errors::{ConvertError, ErrorCode, Result};
pub use types::{HandlerReference, HandlerSignature};
