pub mod cli;
pub mod config;
pub mod display;
pub mod filter;
pub mod restapi;
pub mod schema;

use anyhow::Context;
use colored::Colorize;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use crate::display::{
    apply_color_mode, compute_text_diff, print_failure, print_success, token_table,
};
use crate::restapi::{MatchExpression, TagFilter};
pub use cli::{ColorMode, Commands, cli_parse};
pub use filter::{FilterError, equivalent, normalize, parse, render, to_api_model, tokenize};
pub use schema::{EntityFilter, ExpressionField};

/// Wire model JSON of an expression under the given attribute's model
pub fn wire_json(field: ExpressionField, expression: &str) -> anyhow::Result<serde_json::Value> {
    let value = match field {
        ExpressionField::MatchSpecification => {
            serde_json::to_value(filter::to_model::<MatchExpression>(expression)?)?
        }
        ExpressionField::TagFilter => {
            serde_json::to_value(filter::to_model::<TagFilter>(expression)?)?
        }
    };
    Ok(value)
}

/// Canonical expression of a wire model JSON document
pub fn render_wire_json(field: ExpressionField, json: &str) -> anyhow::Result<String> {
    let rendered = match field {
        ExpressionField::MatchSpecification => {
            let expr: MatchExpression =
                serde_json::from_str(json).context("Invalid match specification JSON")?;
            filter::render_match_expression(&expr)
        }
        ExpressionField::TagFilter => {
            let tag_filter: TagFilter =
                serde_json::from_str(json).context("Invalid tag filter JSON")?;
            filter::render(&tag_filter)
        }
    };
    Ok(rendered)
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = cli_parse();
    let config = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    let field = cli.field.unwrap_or(config.field);
    apply_color_mode(cli.color.unwrap_or(config.output.color));

    match &cli.command {
        Commands::Normalize { expression } => {
            println!("{}", field.normalize(expression)?);
        }
        Commands::Validate { expression } => {
            let (warnings, errors) = field.validate(expression);
            for warning in &warnings {
                eprintln!("{} {warning}", "warning:".yellow().bold());
            }
            if !errors.is_empty() {
                for error in &errors {
                    print_failure(&error.to_string());
                }
                return Ok(ExitCode::FAILURE);
            }
            print_success("valid");
        }
        Commands::Compare { old, new } => {
            if field.diff_suppress(old, new) {
                print_success("equivalent");
                return Ok(ExitCode::SUCCESS);
            }
            print_failure("different");
            print!(
                "{}",
                compute_text_diff(&field.state_func(old), &field.state_func(new))
            );
            return Ok(ExitCode::FAILURE);
        }
        Commands::Json {
            expression,
            compact,
        } => {
            let value = wire_json(field, expression)?;
            let json = if config.output.pretty_json && !compact {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            println!("{json}");
        }
        Commands::Render { file } => {
            let json = read_input(file.as_deref())?;
            println!("{}", render_wire_json(field, &json)?);
        }
        Commands::Tokens { expression } => {
            let tokens = tokenize(expression)?;
            println!("{}", token_table(&tokens));
        }
    }

    Ok(ExitCode::SUCCESS)
}
