use crate::cli::ColorMode;
use crate::filter::Token;
use crate::filter::TokenKind;
use colored::Colorize;
use comfy_table::{Cell, Table};
use similar::{ChangeTag, TextDiff};

pub fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
}

/// Builds a table with one row per token
pub fn token_table(tokens: &[Token]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Offset", "Kind", "Text", "Value"]);

    for token in tokens {
        table.add_row(vec![
            Cell::new(token.offset),
            Cell::new(token.kind.name()),
            Cell::new(&token.text),
            Cell::new(token_value(&token.kind)),
        ]);
    }

    table
}

fn token_value(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Identifier(value) | TokenKind::String(value) => value.clone(),
        TokenKind::Number(value) => value.to_string(),
        TokenKind::Boolean(value) => value.to_string(),
        TokenKind::Operator(op) => op.to_string(),
        TokenKind::Origin(entity) => format!("{entity:?}"),
        TokenKind::And | TokenKind::Or => kind.name().to_uppercase(),
        TokenKind::OpenBracket | TokenKind::CloseBracket | TokenKind::Colon => String::new(),
    }
}

/// Computes a colored line diff between two normalized expressions
pub fn compute_text_diff(old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut result = String::new();

    for change in diff.iter_all_changes() {
        let line = format!("{}{}", change.tag(), change);
        let line = if change.missing_newline() {
            format!("{line}\n")
        } else {
            line
        };
        match change.tag() {
            ChangeTag::Delete => result.push_str(&line.red().to_string()),
            ChangeTag::Insert => result.push_str(&line.green().to_string()),
            ChangeTag::Equal => continue,
        }
    }

    result
}

pub fn print_success(text: &str) {
    println!("{}", text.green().bold());
}

pub fn print_failure(text: &str) {
    println!("{}", text.red().bold());
}
