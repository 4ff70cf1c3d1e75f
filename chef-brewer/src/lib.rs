//! # chef-brewer
//!
//! The grammar macro brewer used by `chef`.
//!
//! Versioned Caramel grammars (`grammar/Caramel_vN.g4`) declare a table of
//! token macros below a `// InjectedTokens` comment. Brewing expands those
//! macros into the rule body and produces the stand-alone `Caramel.g4` that
//! the ANTLR tooling consumes.
//!
//! - [`brewer`]: the pure text transformation
//! - [`table`] and [`expansion`]: its two halves, usable on their own
//! - [`recipe`]: source discovery, freshness check and output writing

pub mod brewer;
pub mod document;
pub mod error;
pub mod expansion;
pub mod recipe;
pub mod table;

pub use brewer::{brew, render, Brew, BrewOptions, Brewer, DEFAULT_HEADER};
pub use document::{split_document, GrammarDocument, DEFAULT_SEPARATOR};
pub use error::BrewError;
pub use expansion::{expand, Expander, Expansion, MatchMode, DEFAULT_EXTRA_ITERATIONS};
pub use recipe::{find_latest_source, is_stale, Outcome, Recipe, RecipeError, SourceSelector};
pub use table::{parse_declaration, strip_declaration, MacroTable};
