//! Grammar document splitting
//!
//! A versioned grammar source carries its macro table at the bottom, after a
//! separator comment:
//!
//! ```text
//! statement: IF expression THEN block;
//!
//! // InjectedTokens
//! IF: 'if';
//! THEN: 'then';
//! ```
//!
//! Only a document with exactly one separator has a macro table. With no
//! separator, or with several, the whole document is the rule body.

/// Separator between the rule body and the macro table
pub const DEFAULT_SEPARATOR: &str = "// InjectedTokens";

/// A grammar document split into its two regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarDocument<'a> {
    /// The grammar rules proper
    pub body: &'a str,
    /// Text following the separator, if the document has a macro table
    pub macro_section: Option<&'a str>,
}

impl<'a> GrammarDocument<'a> {
    /// Whether a macro section was found
    pub fn has_macros(&self) -> bool {
        self.macro_section.is_some()
    }
}

/// Split `document` on `separator`.
///
/// An empty separator never matches.
pub fn split_document<'a>(document: &'a str, separator: &str) -> GrammarDocument<'a> {
    let whole = GrammarDocument {
        body: document,
        macro_section: None,
    };
    if separator.is_empty() {
        return whole;
    }

    let mut parts = document.splitn(3, separator);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(body), Some(section), None) => GrammarDocument {
            body,
            macro_section: Some(section),
        },
        _ => whole,
    }
}
