use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use cssmerge::config::{CompilerConfig, Indent};

#[derive(Parser, Debug)]
#[command(name = "cssmerge")]
#[command(about = "Compress a stylesheet by merging duplicate rules")]
#[command(version)]
pub struct Cli {
    /// Stylesheet to compile.
    pub input: PathBuf,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Color output by nesting depth.
    #[arg(long)]
    pub color: bool,

    /// Indentation style.
    #[arg(long, value_enum)]
    pub indent: Option<IndentArg>,

    /// Spaces per level with `--indent spaces`.
    #[arg(long, default_value_t = 4)]
    pub indent_width: usize,

    /// Skip the integrity check.
    #[arg(long)]
    pub no_verify: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndentArg {
    None,
    Spaces,
    Tabs,
}

impl Cli {
    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, mut config: CompilerConfig) -> CompilerConfig {
        if self.color {
            config.print.color = true;
        }
        if let Some(indent) = self.indent {
            config.print.indent = match indent {
                IndentArg::None => Indent::None,
                IndentArg::Spaces => Indent::Spaces(self.indent_width),
                IndentArg::Tabs => Indent::Tabs,
            };
        }
        if self.no_verify {
            config.verify = false;
        }
        config
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::INFO,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
