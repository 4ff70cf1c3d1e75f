//! The macro brewer
//!
//! `Brewer` turns a versioned grammar source into a stand-alone grammar:
//! split off the macro table, parse it, then expand the rule body to a fixed
//! point. It does no I/O; see [`recipe`](crate::recipe) for the file side.

use crate::document::{split_document, DEFAULT_SEPARATOR};
use crate::error::BrewError;
use crate::expansion::{Expander, MatchMode, DEFAULT_EXTRA_ITERATIONS};
use crate::table::MacroTable;

/// First line of every generated grammar
pub const DEFAULT_HEADER: &str = "// AUTO-GENERATED FILE - DO NOT EDIT";

/// Knobs for a brewing pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrewOptions {
    pub separator: String,
    pub header: String,
    pub matching: MatchMode,
    pub extra_iterations: usize,
}

impl Default for BrewOptions {
    fn default() -> Self {
        BrewOptions {
            separator: DEFAULT_SEPARATOR.to_string(),
            header: DEFAULT_HEADER.to_string(),
            matching: MatchMode::default(),
            extra_iterations: DEFAULT_EXTRA_ITERATIONS,
        }
    }
}

/// Outcome of brewing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brew {
    /// Rule body with every macro expanded
    pub body: String,
    /// The table that was applied (empty without a separator)
    pub macros: MacroTable,
    /// Expansion passes used
    pub passes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Brewer {
    options: BrewOptions,
}

impl Brewer {
    pub fn new(options: BrewOptions) -> Self {
        Brewer { options }
    }

    pub fn options(&self) -> &BrewOptions {
        &self.options
    }

    /// Parse the macro table of `document` without expanding anything.
    pub fn macros(&self, document: &str) -> Result<MacroTable, BrewError> {
        match split_document(document, &self.options.separator).macro_section {
            Some(section) => MacroTable::parse(section),
            None => Ok(MacroTable::new()),
        }
    }

    /// Brew `document`, keeping the table and pass count alongside the body.
    pub fn brew_with_report(&self, document: &str) -> Result<Brew, BrewError> {
        let split = split_document(document, &self.options.separator);
        let Some(section) = split.macro_section else {
            return Ok(Brew {
                body: document.to_string(),
                macros: MacroTable::new(),
                passes: 0,
            });
        };

        let macros = MacroTable::parse(section)?;
        let expander = Expander::new(&macros, self.options.matching, self.options.extra_iterations)?;
        let expansion = expander.expand(split.body)?;
        Ok(Brew {
            body: expansion.text,
            macros,
            passes: expansion.passes,
        })
    }

    /// Expand the macros of `document` into its rule body.
    pub fn brew(&self, document: &str) -> Result<String, BrewError> {
        self.brew_with_report(document).map(|brew| brew.body)
    }

    /// Prefix a brewed body with the generated-file header.
    pub fn with_header(&self, body: &str) -> String {
        format!("{}\n{}", self.options.header, body)
    }

    /// Brew `document` into the full generated grammar, header included.
    pub fn render(&self, document: &str) -> Result<String, BrewError> {
        let body = self.brew(document)?;
        Ok(self.with_header(&body))
    }
}

/// Brew with default options
pub fn brew(document: &str) -> Result<String, BrewError> {
    Brewer::default().brew(document)
}

/// Render with default options
pub fn render(document: &str) -> Result<String, BrewError> {
    Brewer::default().render(document)
}
