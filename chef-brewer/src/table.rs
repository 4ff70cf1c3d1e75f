//! Macro table parsing
//!
//! Declarations are `name: value` pairs terminated by `;` and a newline. Layout
//! whitespace is insignificant except inside single-quoted literals:
//!
//! ```text
//! PLUS     : '+';
//! ELSE_IF  : 'else' ' ' 'if';
//! ```

use crate::error::BrewError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

static DECLARATION_TERMINATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r";\r?\n").expect("terminator pattern is valid"));

/// Remove whitespace outside single-quoted spans.
///
/// Quotes toggle the escaped state and are always kept.
pub fn strip_declaration(fragment: &str) -> String {
    let mut escaped = false;
    let mut result = String::with_capacity(fragment.len());
    for c in fragment.trim().chars() {
        if c.is_whitespace() {
            if escaped {
                result.push(c);
            }
        } else {
            if c == '\'' {
                escaped = !escaped;
            }
            result.push(c);
        }
    }
    result
}

/// Parse one declaration fragment into `(name, value)`.
///
/// The fragment is split on its first `:`, so values may contain colons.
pub fn parse_declaration(fragment: &str) -> Result<(String, String), BrewError> {
    let cleaned = strip_declaration(fragment);
    match cleaned.split_once(':') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(BrewError::MalformedDeclaration {
            fragment: fragment.trim().to_string(),
        }),
    }
}

/// Name to replacement text, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MacroTable {
    entries: BTreeMap<String, String>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text following the separator.
    ///
    /// Blank fragments are skipped. The last declaration of a name wins. Any
    /// malformed fragment fails the whole table.
    pub fn parse(section: &str) -> Result<Self, BrewError> {
        let mut table = MacroTable::new();
        let mut fragments = DECLARATION_TERMINATOR.split(section).peekable();
        while let Some(fragment) = fragments.next() {
            let mut fragment = fragment.trim();
            if fragments.peek().is_none() {
                // last declaration of a file without a final newline
                fragment = fragment.strip_suffix(';').unwrap_or(fragment).trim_end();
            }
            if fragment.is_empty() {
                continue;
            }
            let (name, value) = parse_declaration(fragment)?;
            table.insert(name, value);
        }
        Ok(table)
    }

    /// Insert a macro, returning the value it replaced
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<N, V> FromIterator<(N, V)> for MacroTable
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut table = MacroTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}
