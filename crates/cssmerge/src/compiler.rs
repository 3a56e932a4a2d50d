//! The compile pipeline: parse, merge twice, verify.

use std::path::Path;

use crate::config::CompilerConfig;
use crate::error::{Error, Result};
use crate::merge::{MergeStats, merge_by_content_with, merge_by_header_with};
use crate::metadata::split_metadata;
use crate::parser::parse;
use crate::printer::print;
use crate::tree::StyleNode;
use crate::verify::{IntegrityError, verify};

/// Compiles stylesheets with a fixed configuration.
///
/// A compiler holds no scan or merge state between calls; every
/// [`compile`](Self::compile) starts from scratch.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Create a compiler.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compile stylesheet text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scan`] when the text cannot be parsed. Integrity
    /// violations do not fail the call; they are collected in
    /// [`Compilation::integrity_errors`].
    pub fn compile(&self, text: &str) -> Result<Compilation> {
        let (metadata, body) = split_metadata(text);
        let parsed = parse(body)?;

        let mut stats = MergeStats::new();
        let by_header = merge_by_header_with(&parsed, &mut stats);
        let by_content = merge_by_content_with(&by_header, &mut stats);

        let mut integrity_errors = Vec::new();
        if self.config.verify {
            integrity_errors.extend(verify(&parsed, &by_header));
            integrity_errors.extend(verify(&by_header, &by_content));
            for error in &integrity_errors {
                tracing::warn!("{}", error);
            }
        }

        tracing::debug!(
            "Compiled {} nodes into {} ({} values merged)",
            parsed.count_descendants(),
            by_content.count_descendants(),
            stats.total_merged
        );

        Ok(Compilation {
            config: self.config.clone(),
            metadata: metadata.map(str::to_string),
            parsed,
            by_header,
            by_content,
            stats,
            integrity_errors,
        })
    }

    /// Read and compile a stylesheet file.
    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<Compilation> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.compile(&text)
    }
}

/// The result of one compile call.
#[derive(Debug, Clone)]
pub struct Compilation {
    config: CompilerConfig,
    /// Leading UserStyle metadata block, if the input had one.
    pub metadata: Option<String>,
    /// Tree as parsed.
    pub parsed: StyleNode,
    /// Tree after merging by header.
    pub by_header: StyleNode,
    /// Tree after merging by content; the compressed result.
    pub by_content: StyleNode,
    /// Merge counters for this call.
    pub stats: MergeStats,
    /// Every integrity violation found. Empty when verification is disabled.
    pub integrity_errors: Vec<IntegrityError>,
}

impl Compilation {
    /// The compressed stylesheet text, preceded by the metadata block when
    /// configured to keep it.
    pub fn output(&self) -> String {
        let css = print(&self.by_content, &self.config.print);
        match &self.metadata {
            Some(metadata) if self.config.preserve_metadata => format!("{metadata}\n{css}"),
            _ => css,
        }
    }

    /// Printed sizes of the parsed and compressed trees.
    pub fn size_report(&self) -> SizeReport {
        SizeReport {
            original: print(&self.parsed, &self.config.print).len(),
            compressed: print(&self.by_content, &self.config.print).len(),
        }
    }

    /// Whether verification found no violations.
    pub fn is_consistent(&self) -> bool {
        self.integrity_errors.is_empty()
    }
}

/// Printed sizes before and after merging, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub original: usize,
    pub compressed: usize,
}

impl SizeReport {
    /// Share of the original size removed, in percent.
    pub fn saved_percent(&self) -> f64 {
        if self.original == 0 {
            return 0.0;
        }
        100.0 - (self.compressed as f64 * 100.0 / self.original as f64)
    }
}
