pub mod error;
pub mod float;
pub mod types;
pub mod value;

pub use error::{ErrorKind, IppError};
pub use types::*;
pub use value::*;
