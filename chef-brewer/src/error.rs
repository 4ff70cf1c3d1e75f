//! Error types for brewing

use std::fmt;

/// Errors that abort a brewing pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewError {
    /// A macro declaration without a `name:` prefix
    MalformedDeclaration { fragment: String },
    /// A macro name that could not be turned into a matcher
    ///
    /// Names are escaped before compiling, so this only trips on the regex
    /// size limit (an absurdly long name).
    InvalidMacroName { name: String, message: String },
    /// A macro that reaches itself through the values it expands to
    CircularDefinition { cycle: Vec<String> },
    /// Substitution still rewrote text after the last allowed pass
    NonConvergent {
        passes: usize,
        last_changed: Vec<String>,
    },
}

impl fmt::Display for BrewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrewError::MalformedDeclaration { fragment } => write!(
                f,
                "Malformed macro declaration (expected `name: value`): {:?}",
                fragment
            ),
            BrewError::InvalidMacroName { name, message } => {
                write!(f, "Invalid macro name {:?}: {}", name, message)
            }
            BrewError::CircularDefinition { cycle } => write!(
                f,
                "Circular macro definition, expansion would never settle: {}",
                cycle.join(" -> ")
            ),
            BrewError::NonConvergent {
                passes,
                last_changed,
            } => write!(
                f,
                "Macro expansion did not settle after {} passes; still rewriting: {} \
                 (circular macro definition?)",
                passes,
                last_changed.join(", ")
            ),
        }
    }
}

impl std::error::Error for BrewError {}

impl From<BrewError> for String {
    fn from(err: BrewError) -> Self {
        err.to_string()
    }
}
