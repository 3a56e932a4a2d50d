//! Stylesheet scanning.

mod context;
mod error;
mod filters;
mod scanner;
pub(crate) mod text;

pub use error::{EXCERPT_RADIUS, ScanError, ScanErrorKind};
pub use scanner::parse;
