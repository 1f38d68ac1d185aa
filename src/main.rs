use std::env;
use std::path::PathBuf;
use std::process;

use imprinted_levels::{
    OverlapPolicy, Registry, ToolCatalog, ValidationOptions, load_levels_from_file,
};

fn main() {
    env_logger::init();

    let mut lenient = false;
    let mut partial = false;
    let mut path: Option<PathBuf> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--lenient" => lenient = true,
            "--partial" => partial = true,
            _ => path = Some(PathBuf::from(arg)),
        }
    }
    let path = path.unwrap_or_else(|| PathBuf::from("public/levels.json"));

    let raw = match load_levels_from_file(&path) {
        Ok(raw) => {
            println!("Using level file: {}", path.display());
            raw
        }
        Err(e) => {
            eprintln!("Failed to load level file '{}': {e}", path.display());
            process::exit(1);
        }
    };

    let options = ValidationOptions {
        overlap: if lenient {
            OverlapPolicy::Lenient
        } else {
            OverlapPolicy::Strict
        },
    };
    let catalog = ToolCatalog::standard();

    if partial {
        let (registry, failures) = Registry::load_partial(raw, &catalog, options);
        report(&registry, &catalog);
        if !failures.is_empty() {
            eprintln!();
            for failure in &failures {
                eprintln!("{failure}");
            }
            process::exit(1);
        }
    } else {
        match Registry::load(raw, &catalog, options) {
            Ok(registry) => report(&registry, &catalog),
            Err(e) => {
                eprint!("{e}");
                process::exit(1);
            }
        }
    }
}

fn report(registry: &Registry, catalog: &ToolCatalog) {
    for level in registry.levels() {
        let clip_count: usize = level.layers.iter().map(|l| l.clips.len()).sum();
        println!(
            "{}  {:>4}s  {} layer(s), {} clip(s), {} tool(s)",
            level.key,
            level.total_duration,
            level.layers.len(),
            clip_count,
            level.tools(catalog).len()
        );
    }
    println!("\n{} level(s) valid", registry.len());
}
