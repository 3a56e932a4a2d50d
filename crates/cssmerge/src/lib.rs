//! Stylesheet compiler that shrinks CSS by deduplicating rules.
//!
//! The compiler scans stylesheet text into a style tree and then rewrites the
//! tree twice:
//!
//! - **Merge by header**: siblings sharing a selector list or an at-rule
//!   header are folded together, unioning their declarations or children.
//! - **Merge by content**: rules with identical declaration sets are folded
//!   together, unioning their selectors.
//!
//! Each merged tree records where every node came from, and an integrity
//! verifier checks each rewrite against its input.
//!
//! # Example
//!
//! ```ignore
//! use cssmerge::prelude::*;
//!
//! let compilation = Compiler::new(CompilerConfig::default())
//!     .compile(".a { color: red } .b { color: red } .a { margin: 0 }")?;
//!
//! assert!(compilation.is_consistent());
//! println!("{}", compilation.output());
//! ```

pub mod config;
pub mod merge;
pub mod metadata;
pub mod parser;
pub mod printer;
pub mod tree;
pub mod verify;

mod compiler;
mod error;

pub use compiler::{Compilation, Compiler, SizeReport};
pub use error::{Error, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::compiler::{Compilation, Compiler, SizeReport};
    pub use crate::config::{CompilerConfig, Indent, PrintOptions};
    pub use crate::merge::{MergeStats, merge_by_content, merge_by_header};
    pub use crate::metadata::split_metadata;
    pub use crate::parser::{ScanError, ScanErrorKind, parse};
    pub use crate::printer::print;
    pub use crate::tree::{NodeKind, StyleNode};
    pub use crate::verify::{IntegrityError, verify};
}
