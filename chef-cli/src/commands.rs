//! Subcommand handlers
//!
//! Handlers load the layered configuration, build a [`Recipe`] from it and
//! report failures as plain messages for `main` to log.

use chef_brewer::{Brewer, Outcome, Recipe, SourceSelector};
use chef_config::{ChefConfig, Loader};
use clap::ArgMatches;
use std::path::{Path, PathBuf};

/// Output formats of `chef macros`
pub const AVAILABLE_FORMATS: &[&str] = &["text", "json"];

fn load_config(matches: &ArgMatches) -> Result<ChefConfig, String> {
    let explicit = matches.get_one::<String>("config").map(Path::new);
    // Only `brew` defines these
    let matching = matches
        .try_get_one::<String>("matching")
        .ok()
        .flatten()
        .map(String::as_str);
    let output = matches
        .try_get_one::<String>("output")
        .ok()
        .flatten()
        .map(Path::new);

    Loader::for_project(explicit)
        .with_matching(matching)
        .map_err(|e| format!("Invalid --matching: {}", e))?
        .with_output(output)
        .map_err(|e| format!("Invalid --output: {}", e))?
        .build()
        .map_err(|e| format!("Configuration error: {}", e))
}

fn recipe_for(matches: &ArgMatches, config: &ChefConfig) -> Recipe {
    let source = match matches.get_one::<String>("source") {
        Some(path) => SourceSelector::Path(PathBuf::from(path)),
        None => config.paths.latest_source(),
    };
    Recipe::new(
        Brewer::new((&config.brew).into()),
        source,
        config.paths.output.clone(),
    )
}

/// Handle the brew command
pub fn handle_brew_command(matches: &ArgMatches) -> Result<(), String> {
    let config = load_config(matches)?;
    let recipe = recipe_for(matches, &config);

    if matches.get_flag("stdout") {
        let rendered = recipe.render().map_err(|e| e.to_string())?;
        print!("{}", rendered);
        return Ok(());
    }

    match recipe.cook(matches.get_flag("force")).map_err(|e| e.to_string())? {
        Outcome::Brewed {
            source,
            output,
            macros,
            passes,
        } => tracing::debug!(
            "Brewed {} into {} ({} macros, {} passes).",
            source.display(),
            output.display(),
            macros,
            passes
        ),
        Outcome::UpToDate { source, output } => tracing::debug!(
            "{} is newer than {}, nothing to do.",
            output.display(),
            source.display()
        ),
    }
    Ok(())
}

/// Handle the macros command
pub fn handle_macros_command(matches: &ArgMatches) -> Result<(), String> {
    let config = load_config(matches)?;
    let recipe = recipe_for(matches, &config);
    let brewer = Brewer::new((&config.brew).into());

    let (path, text) = recipe.read_source().map_err(|e| e.to_string())?;
    let table = brewer
        .macros(&text)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&table)
                .map_err(|e| format!("JSON serialization failed: {}", e))?;
            println!("{}", json);
        }
        _ => {
            if table.is_empty() {
                tracing::warn!("{} declares no macros.", path.display());
            }
            for (name, value) in table.iter() {
                println!("{} = {}", name, value);
            }
        }
    }
    Ok(())
}
