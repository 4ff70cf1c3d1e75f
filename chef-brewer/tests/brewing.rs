//! End-to-end brewing of grammar documents

use chef_brewer::{brew, render, BrewError, BrewOptions, Brewer, MacroTable, MatchMode};
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture to be readable")
}

#[rstest]
#[case::no_separator("rule: A B;\n", "rule: A B;\n")]
#[case::single_substitution("A B A\n// InjectedTokens\nA: x;\n", "x B x\n")]
#[case::transitive("A\n// InjectedTokens\nA: B;\nB: y;\n", "y\n")]
#[case::duplicated_separator(
    "A\n// InjectedTokens\nA: x;\n// InjectedTokens\n",
    "A\n// InjectedTokens\nA: x;\n// InjectedTokens\n"
)]
#[case::quoted_whitespace("X\n// InjectedTokens\n  X   :  'a b'  ;\n", "'a b'\n")]
#[case::last_declaration_wins("X\n// InjectedTokens\nX: 'a';\nX: 'b';\n", "'b'\n")]
#[case::empty_table("X\n// InjectedTokens\n", "X\n")]
fn brews_documents(#[case] document: &str, #[case] expected: &str) {
    assert_eq!(brew(document).unwrap(), expected);
}

#[rstest]
#[case::missing_colon("r\n// InjectedTokens\nBADLINE;\n", "BADLINE")]
#[case::empty_name("r\n// InjectedTokens\n: 'x';\n", ": 'x'")]
fn rejects_malformed_declarations(#[case] document: &str, #[case] fragment: &str) {
    let err = brew(document).unwrap_err();
    assert_eq!(
        err,
        BrewError::MalformedDeclaration {
            fragment: fragment.to_string()
        }
    );
}

#[test]
fn circular_macros_fail_instead_of_looping() {
    let err = brew("A\n// InjectedTokens\nA: B;\nB: A;\n").unwrap_err();
    assert!(matches!(err, BrewError::CircularDefinition { .. }));
    assert!(err.to_string().contains("A -> B -> A"));
}

#[test]
fn self_doubling_macro_is_rejected_quickly() {
    let mut document = String::from("r: List;\n// InjectedTokens\nList: List ',' List;\n");
    for i in 0..30 {
        document.push_str(&format!("Filler{}: 'f';\n", i));
    }
    let started = Instant::now();
    let err = brew(&document).unwrap_err();
    assert_eq!(
        err,
        BrewError::CircularDefinition {
            cycle: vec!["List".to_string(), "List".to_string()]
        }
    );
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn identity_macro_leaves_body_alone() {
    assert_eq!(brew("r: A;\n// InjectedTokens\nA: A;\n").unwrap(), "r: A;\n");
}

#[test]
fn word_boundaries_protect_longer_identifiers() {
    let document = "s: IF IFELSE;\n// InjectedTokens\nIF: 'if';\n";
    assert_eq!(brew(document).unwrap(), "s: 'if' IFELSE;\n");

    let substring = Brewer::new(BrewOptions {
        matching: MatchMode::Substring,
        ..BrewOptions::default()
    });
    assert_eq!(substring.brew(document).unwrap(), "s: 'if' 'if'ELSE;\n");
}

#[test]
fn brews_caramel_fixture() {
    let rendered = render(&fixture("Caramel_v1.g4")).unwrap();
    insta::assert_snapshot!(rendered.trim_end(), @r"
// AUTO-GENERATED FILE - DO NOT EDIT
grammar Caramel;

r
  : statements EOF
  ;

statements
  : (statement ';')*
  ;

statement
  : 'if' expression 'then' block ('else' block)?
  | 'while' expression block
  | 'return' expression?
  ;

block
  : '{' statements '}'
  ;

expression
  : Identifier
  | Number
  | expression '+' expression
  ;

Identifier
  : [a-zA-Z_] [a-zA-Z0-9_]*
  ;

Number
  : [0-9]+
  ;
");
}

#[test]
fn fixture_macro_table_serializes_by_name() {
    let table: MacroTable = Brewer::default()
        .macros(&fixture("Caramel_v1.g4"))
        .unwrap();
    assert_eq!(table.len(), 9);
    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["PLUS"], "'+'");
    assert_eq!(json["InstructionSeparator"], "';'");
}
