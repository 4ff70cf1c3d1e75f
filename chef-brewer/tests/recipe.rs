//! Brewing grammar files on disk

use chef_brewer::{BrewError, Brewer, Outcome, Recipe, RecipeError, SourceSelector};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

const PATTERN: &str = r"Caramel_v([0-9]+)\.g4";

fn latest_recipe(dir: &Path) -> Recipe {
    Recipe::new(
        Brewer::default(),
        SourceSelector::Latest {
            dir: dir.to_path_buf(),
            pattern: PATTERN.to_string(),
        },
        dir.join("Caramel.g4"),
    )
}

fn set_modified(path: &Path, time: SystemTime) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}

#[test]
fn cooks_latest_source_then_reports_up_to_date() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Caramel_v1.g4"),
        "old: A;\n// InjectedTokens\nA: 'a';\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Caramel_v2.g4"),
        "new: A B;\n// InjectedTokens\nA: B;\nB: 'b';\n",
    )
    .unwrap();
    let recipe = latest_recipe(dir.path());

    let outcome = recipe.cook(false).unwrap();
    assert_eq!(
        outcome,
        Outcome::Brewed {
            source: dir.path().join("Caramel_v2.g4"),
            output: dir.path().join("Caramel.g4"),
            macros: 2,
            passes: 2,
        }
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("Caramel.g4")).unwrap(),
        "// AUTO-GENERATED FILE - DO NOT EDIT\nnew: 'b' 'b';\n"
    );

    let later = SystemTime::now() + Duration::from_secs(60);
    set_modified(&dir.path().join("Caramel.g4"), later);
    assert!(matches!(
        recipe.cook(false).unwrap(),
        Outcome::UpToDate { .. }
    ));
    assert!(matches!(recipe.cook(true).unwrap(), Outcome::Brewed { .. }));
}

#[test]
fn newer_source_triggers_rebrew() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("Caramel_v1.g4");
    let output = dir.path().join("Caramel.g4");
    fs::write(&source, "r: A;\n// InjectedTokens\nA: 'a';\n").unwrap();
    fs::write(&output, "stale\n").unwrap();
    set_modified(&output, SystemTime::now() - Duration::from_secs(3600));

    let outcome = latest_recipe(dir.path()).cook(false).unwrap();
    assert!(matches!(outcome, Outcome::Brewed { .. }));
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "// AUTO-GENERATED FILE - DO NOT EDIT\nr: 'a';\n"
    );
}

#[test]
fn explicit_source_writes_into_new_directory() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("custom.g4");
    fs::write(&source, "r: X;\n").unwrap();
    let output = dir.path().join("build").join("Caramel.g4");

    let recipe = Recipe::new(
        Brewer::default(),
        SourceSelector::Path(source.clone()),
        &output,
    );
    recipe.cook(false).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "// AUTO-GENERATED FILE - DO NOT EDIT\nr: X;\n"
    );
}

#[test]
fn brew_failure_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Caramel_v1.g4"),
        "r: A;\n// InjectedTokens\nBADLINE;\n",
    )
    .unwrap();
    fs::write(dir.path().join("Caramel.g4"), "previous\n").unwrap();
    set_modified(
        &dir.path().join("Caramel.g4"),
        SystemTime::now() - Duration::from_secs(3600),
    );

    let err = latest_recipe(dir.path()).cook(false).unwrap_err();
    match err {
        RecipeError::Brew { path, error } => {
            assert_eq!(path, dir.path().join("Caramel_v1.g4"));
            assert!(matches!(error, BrewError::MalformedDeclaration { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        fs::read_to_string(dir.path().join("Caramel.g4")).unwrap(),
        "previous\n"
    );
}

#[test]
fn missing_explicit_source_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let recipe = Recipe::new(
        Brewer::default(),
        SourceSelector::Path(dir.path().join("missing.g4")),
        dir.path().join("Caramel.g4"),
    );
    assert!(matches!(recipe.cook(false), Err(RecipeError::Io { .. })));
}

#[test]
fn render_does_not_write_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Caramel_v1.g4"),
        "r: A;\n// InjectedTokens\nA: 'a';\n",
    )
    .unwrap();
    let recipe = latest_recipe(dir.path());
    assert_eq!(
        recipe.render().unwrap(),
        "// AUTO-GENERATED FILE - DO NOT EDIT\nr: 'a';\n"
    );
    assert!(!recipe.output().exists());
}
