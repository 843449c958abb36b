//! SQL quoting and criterion text helpers.
//!
//! Every value that ends up inside generated SQL goes through
//! [`quote_literal`]: a single quote is doubled, nothing else is touched.
//!
//! In criterion text `\%` is a literal percent sign, any other `%` is a
//! wildcard and any other backslash is just a backslash. A LIKE pattern that
//! needs a literal percent sign is emitted with `ESCAPE '\'`, which also
//! means its literal backslashes are written doubled.

use crate::lexer::is_number_text;
use arcadex_schema::FieldRef;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::str::FromStr;

/// Quote text as an SQL string literal, doubling embedded quotes
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// A name that SQLite accepts without quoting
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '$'))
}

/// Double-quote one identifier segment if it needs it
pub fn quote_identifier(name: &str) -> Cow<'_, str> {
    if is_plain_identifier(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}

/// `table.field` as SQL, quoting each part as needed
pub fn field_sql(field: &FieldRef) -> String {
    format!(
        "{}.{}",
        quote_identifier(&field.table),
        quote_identifier(&field.field)
    )
}

/// Plain decimal number text: optional sign, digits, optional fraction.
/// Such values are emitted unquoted.
pub fn is_numeric(text: &str) -> bool {
    is_number_text(text) && Decimal::from_str(text).is_ok()
}

/// One element of a LIKE pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LikePart {
    Char(char),
    Wildcard,
}

/// Split criterion text into pattern parts
pub(crate) fn criterion_parts(text: &str) -> Vec<LikePart> {
    let mut parts = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'%') => {
                chars.next();
                parts.push(LikePart::Char('%'));
            }
            '%' => parts.push(LikePart::Wildcard),
            c => parts.push(LikePart::Char(c)),
        }
    }
    parts
}

/// Criterion text for pattern parts. A literal backslash directly before a
/// wildcard has no criterion form.
pub(crate) fn parts_criterion(parts: &[LikePart]) -> Option<String> {
    let mut out = String::with_capacity(parts.len());
    for (idx, part) in parts.iter().enumerate() {
        match part {
            LikePart::Wildcard => out.push('%'),
            LikePart::Char('%') => out.push_str("\\%"),
            LikePart::Char('\\') if parts.get(idx + 1) == Some(&LikePart::Wildcard) => {
                return None
            }
            LikePart::Char(c) => out.push(*c),
        }
    }
    Some(out)
}

/// Parse an SQL LIKE pattern. The only escape character understood is `\`,
/// and under it only `\\` and `\%`.
pub(crate) fn parse_like(pattern: &str, escape: Option<&str>) -> Option<Vec<LikePart>> {
    let escaped = match escape {
        None => false,
        Some("\\") => true,
        Some(_) => return None,
    };
    let mut parts = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' if escaped => match chars.next()? {
                c @ ('\\' | '%') => parts.push(LikePart::Char(c)),
                _ => return None,
            },
            '%' => parts.push(LikePart::Wildcard),
            c => parts.push(LikePart::Char(c)),
        }
    }
    Some(parts)
}

/// `field LIKE 'pattern'`, with `ESCAPE '\'` when a literal percent sign
/// needs one
pub(crate) fn like_sql(field: &str, parts: &[LikePart]) -> String {
    let escaped = parts.contains(&LikePart::Char('%'));
    let mut pattern = String::with_capacity(parts.len() + 2);
    for part in parts {
        match part {
            LikePart::Wildcard => pattern.push('%'),
            LikePart::Char(c @ ('\\' | '%')) if escaped => {
                pattern.push('\\');
                pattern.push(*c);
            }
            LikePart::Char(c) => pattern.push(*c),
        }
    }
    if escaped {
        format!("{} LIKE {} ESCAPE '\\'", field, quote_literal(&pattern))
    } else {
        format!("{} LIKE {}", field, quote_literal(&pattern))
    }
}

/// Whether criterion text has a wildcard `%`
pub(crate) fn has_unescaped_percent(text: &str) -> bool {
    criterion_parts(text).contains(&LikePart::Wildcard)
}
