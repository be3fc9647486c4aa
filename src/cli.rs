use crate::schema::ExpressionField;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Normalize, validate and compare tag filter expressions
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a json5 config file
    #[arg(long, global = true, env = "TAG_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Attribute whose wire model is used (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub field: Option<ExpressionField>,

    /// When to color console output (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorMode>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the canonical form of an expression
    Normalize { expression: String },

    /// Check that an expression can be parsed and mapped
    Validate { expression: String },

    /// Check whether changing OLD to NEW would be suppressed as a diff
    Compare { old: String, new: String },

    /// Print the wire model of an expression as JSON
    Json {
        expression: String,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Render wire model JSON read from FILE (or stdin) as an expression
    Render { file: Option<PathBuf> },

    /// List the tokens of an expression
    Tokens { expression: String },
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
