//! Compiler configuration.
//!
//! Configuration is plain data loaded from TOML. Every field has a default,
//! so an empty file is a valid configuration:
//!
//! ```toml
//! verify = true
//! preserve_metadata = true
//!
//! [print]
//! color = false
//! indent = { spaces = 4 }   # or "tabs", or "none"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options of a [`Compiler`](crate::Compiler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Run the integrity verifier after each merge pass.
    pub verify: bool,
    /// Keep a leading `==UserStyle==` metadata block in the output.
    pub preserve_metadata: bool,
    /// How trees are printed.
    pub print: PrintOptions,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            verify: true,
            preserve_metadata: true,
            print: PrintOptions::default(),
        }
    }
}

impl CompilerConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config("<string>", e.to_string()))
    }

    /// Read a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = toml::from_str(&text).map_err(|e| Error::config(path, e.to_string()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config("<string>", e.to_string()))
    }
}

/// Printer options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Wrap each printed piece in an ANSI color chosen by nesting depth.
    pub color: bool,
    /// Indentation style.
    pub indent: Indent,
}

impl PrintOptions {
    /// Single-line output without color.
    pub fn minified() -> Self {
        Self::default()
    }

    /// One piece per line, indented with four spaces per level.
    pub fn pretty() -> Self {
        Self {
            color: false,
            indent: Indent::Spaces(4),
        }
    }
}

/// Indentation style of printed output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indent {
    /// Everything on one line.
    #[default]
    None,
    /// `n` spaces per nesting level.
    Spaces(usize),
    /// One tab per nesting level.
    Tabs,
}

impl Indent {
    /// Whether pieces are placed on separate lines.
    pub fn is_multiline(&self) -> bool {
        !matches!(self, Indent::None)
    }

    /// The indentation string for one nesting level.
    pub fn unit(&self) -> String {
        match self {
            Indent::None => String::new(),
            Indent::Spaces(n) => " ".repeat(*n),
            Indent::Tabs => "\t".to_string(),
        }
    }
}
