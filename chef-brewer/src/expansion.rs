//! Fixed-point macro expansion
//!
//! Every pass rewrites the working text once per macro, in name order. Values
//! may mention other macros, so passes repeat until one of them rewrites
//! nothing. Definitions that reach themselves (`A: B; B: A;`, or
//! `List: List ',' List;`) are rejected up front. The number of passes is
//! capped as well, for rewrites that only appear once values land next to
//! other text.

use crate::error::BrewError;
use crate::table::MacroTable;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

/// Passes allowed on top of one per macro
pub const DEFAULT_EXTRA_ITERATIONS: usize = 2;

/// How a macro name is located in the rule body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Only whole words: `IF` leaves `IFELSE` and `ELSE_IF` alone
    #[default]
    WordBoundary,
    /// Every occurrence, even inside longer identifiers
    Substring,
}

/// A compiled matcher for one macro
#[derive(Debug, Clone)]
struct Rule {
    name: String,
    value: String,
    pattern: Regex,
}

impl Rule {
    fn compile(name: &str, value: &str, mode: MatchMode) -> Result<Self, BrewError> {
        let pattern = Regex::new(&name_pattern(name, mode)).map_err(|e| {
            BrewError::InvalidMacroName {
                name: name.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Rule {
            name: name.to_string(),
            value: value.to_string(),
            pattern,
        })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Build the regex source for `name`.
///
/// The name is always matched literally. In word-boundary mode a `\b` is only
/// added on an edge that is itself a word character, so names such as `'+'`
/// still match next to anything.
fn name_pattern(name: &str, mode: MatchMode) -> String {
    let escaped = regex::escape(name);
    match mode {
        MatchMode::Substring => escaped,
        MatchMode::WordBoundary => {
            let leading = name.chars().next().is_some_and(is_word_char);
            let trailing = name.chars().next_back().is_some_and(is_word_char);
            format!(
                "{}{}{}",
                if leading { r"\b" } else { "" },
                escaped,
                if trailing { r"\b" } else { "" }
            )
        }
    }
}

/// Result of a converged expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// The macro-free text
    pub text: String,
    /// Passes run, including the final pass that rewrote nothing
    pub passes: usize,
}

/// Applies a macro table to rule bodies
#[derive(Debug, Clone)]
pub struct Expander {
    rules: Vec<Rule>,
    max_passes: usize,
}

impl Expander {
    /// Compile `table` with the given matching mode and pass allowance.
    ///
    /// A macro whose value is exactly its name rewrites nothing and is
    /// dropped. Any other macro reachable from its own value is a circular
    /// definition and rejected before a single pass runs.
    pub fn new(
        table: &MacroTable,
        mode: MatchMode,
        extra_iterations: usize,
    ) -> Result<Self, BrewError> {
        let mut rules = Vec::with_capacity(table.len());
        for (name, value) in table.iter() {
            if name.is_empty() {
                return Err(BrewError::MalformedDeclaration {
                    fragment: format!(":{}", value),
                });
            }
            if name == value {
                continue;
            }
            rules.push(Rule::compile(name, value, mode)?);
        }
        if let Some(cycle) = find_cycle(&rules) {
            return Err(BrewError::CircularDefinition { cycle });
        }
        let max_passes = rules.len() + extra_iterations.max(1);
        Ok(Expander { rules, max_passes })
    }

    /// Upper bound on passes before giving up
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Rewrite `body` until a pass finds no macro name left.
    pub fn expand(&self, body: &str) -> Result<Expansion, BrewError> {
        let mut text = body.to_string();
        let mut last_changed = Vec::new();

        for pass in 1..=self.max_passes {
            last_changed.clear();
            for rule in &self.rules {
                let matches = rule.pattern.find_iter(&text).count();
                if matches == 0 {
                    continue;
                }
                text = rule
                    .pattern
                    .replace_all(&text, NoExpand(&rule.value))
                    .into_owned();
                tracing::trace!(pass, name = %rule.name, matches, "substituted macro");
                last_changed.push(rule.name.clone());
            }
            if last_changed.is_empty() {
                return Ok(Expansion { text, passes: pass });
            }
        }

        Err(BrewError::NonConvergent {
            passes: self.max_passes,
            last_changed,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

/// Find a macro that can reach itself through the values it expands to.
///
/// An edge `a -> b` means `b`'s matcher hits somewhere in `a`'s value.
/// Returns the names along the cycle, first name repeated at the end.
fn find_cycle(rules: &[Rule]) -> Option<Vec<String>> {
    let edges: Vec<Vec<usize>> = rules
        .iter()
        .map(|owner| {
            rules
                .iter()
                .enumerate()
                .filter(|(_, rule)| rule.pattern.is_match(&owner.value))
                .map(|(index, _)| index)
                .collect()
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; rules.len()];
    let mut path = Vec::new();
    for start in 0..rules.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        if let Some(cycle) = visit(start, &edges, &mut marks, &mut path) {
            return Some(cycle.into_iter().map(|i| rules[i].name.clone()).collect());
        }
    }
    None
}

fn visit(
    node: usize,
    edges: &[Vec<usize>],
    marks: &mut [Mark],
    path: &mut Vec<usize>,
) -> Option<Vec<usize>> {
    marks[node] = Mark::Active;
    path.push(node);
    for &next in &edges[node] {
        match marks[next] {
            Mark::Active => {
                let start = path.iter().position(|&n| n == next)?;
                let mut cycle = path[start..].to_vec();
                cycle.push(next);
                return Some(cycle);
            }
            Mark::Unvisited => {
                if let Some(cycle) = visit(next, edges, marks, path) {
                    return Some(cycle);
                }
            }
            Mark::Done => {}
        }
    }
    path.pop();
    marks[node] = Mark::Done;
    None
}

/// Expand `body` with `table` using default settings.
pub fn expand(body: &str, table: &MacroTable) -> Result<Expansion, BrewError> {
    Expander::new(table, MatchMode::default(), DEFAULT_EXTRA_ITERATIONS)?.expand(body)
}
