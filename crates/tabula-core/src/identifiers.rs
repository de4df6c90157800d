//! SQL identifier validation and quoting.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Plain identifiers, optionally schema-qualified (`db.table`).
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_$]*(\.[A-Za-z_][A-Za-z0-9_$]*)?$";

fn identifier_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).ok()).as_ref()
}

/// Whether `ident` is a plain (optionally qualified) SQL identifier.
pub fn is_plain_identifier(ident: &str) -> bool {
    identifier_regex().is_some_and(|re| re.is_match(ident))
}

/// Reject anything that is not a plain identifier.
///
/// Table names are spliced into statement text, so they must not carry
/// quotes, whitespace or statement separators.
pub fn validate_identifier(ident: &str) -> Result<()> {
    if is_plain_identifier(ident) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(ident.to_string()))
    }
}

/// Quote an identifier with ANSI double quotes, doubling embedded quotes.
///
/// Qualified names are quoted per part: `db.t` becomes `"db"."t"`.
pub fn quote_ident(ident: &str) -> String {
    if is_plain_identifier(ident) && ident.contains('.') {
        return ident
            .split('.')
            .map(quote_part)
            .collect::<Vec<_>>()
            .join(".");
    }
    quote_part(ident)
}

/// Quote an identifier with MySQL backticks.
pub fn quote_ident_mysql(ident: &str) -> String {
    if is_plain_identifier(ident) && ident.contains('.') {
        return ident
            .split('.')
            .map(|part| format!("`{}`", part))
            .collect::<Vec<_>>()
            .join(".");
    }
    format!("`{}`", ident.replace('`', "``"))
}

fn quote_part(part: &str) -> String {
    format!("\"{}\"", part.replace('"', "\"\""))
}
