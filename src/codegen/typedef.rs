//! Recovery of the config struct name from generated C++
//!
//! Grammar of a struct declaration line:
//!
//! ```text
//! struct_line := "struct" IDENT ( ":" ... | "{" ... | ";" | <end of line> )
//! ```
//!
//! Line comments (`// ...`) are ignored.
//!
//! The line must start with `struct ` in its first column. Config generators
//! emit nested configs (e.g. an activation sub-config) before the layer's own
//! config, so the last struct line of a block names the layer config.

use logos::Logos;

use crate::error::WriterError;
use crate::model::Layer;

/// Alias the generated operator expects for the main layer config
pub const CONFIG_ALIAS: &str = "hconfig";

const STRUCT_PREFIX: &str = "struct ";

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"//[^\n]*")]
enum Token {
    #[token("struct")]
    Struct,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),
    #[token(":")]
    Colon,
    #[token("{")]
    BraceOpen,
    #[token(";")]
    Semicolon,
}

/// Parse the declared name out of a single struct declaration line
///
/// Returns `None` if the line does not follow the struct line grammar.
pub fn parse_struct_name(line: &str) -> Option<String> {
    if !line.starts_with(STRUCT_PREFIX) {
        return None;
    }

    let mut lexer = Token::lexer(line);
    match lexer.next() {
        Some(Ok(Token::Struct)) => {}
        _ => return None,
    }
    let name = match lexer.next() {
        Some(Ok(Token::Ident(name))) => name,
        _ => return None,
    };
    match lexer.next() {
        None
        | Some(Ok(Token::Colon))
        | Some(Ok(Token::BraceOpen))
        | Some(Ok(Token::Semicolon)) => Some(name),
        _ => None,
    }
}

/// Emit `typedef <config struct> hconfig;` for the main layer
///
/// A layer without config text yields an empty string. Config text without
/// any parseable struct declaration is a [`WriterError::MalformedConfig`].
pub fn extract_config_typedef(main_layer: &Layer) -> Result<String, WriterError> {
    let Some(config) = main_layer.config_text.as_deref().filter(|c| !c.is_empty()) else {
        return Ok(String::new());
    };

    let last_struct = config
        .lines()
        .rev()
        .find(|line| line.starts_with(STRUCT_PREFIX))
        .ok_or_else(|| WriterError::malformed_config(&main_layer.name, config))?;

    let name = parse_struct_name(last_struct)
        .ok_or_else(|| WriterError::malformed_config(&main_layer.name, config))?;

    Ok(format!("typedef {} {};\n", name, CONFIG_ALIAS))
}
