use clap::{Parser, Subcommand};
use papermark_markup::{Diagnostic, TagRegistry};
use papermark_tree::Tree;
use std::path::Path;

#[derive(Parser)]
#[command(name = "papermark")]
#[command(about = "papermark: bracket-tag markup renderer")]
#[command(version)]
struct Cli {
    /// TOML file with extra `[[tag]]` rows
    #[arg(long, global = true, value_name = "FILE")]
    tags: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markup file to HTML on stdout
    Render {
        /// Input markup file
        path: String,
    },

    /// Report diagnostics, exiting with status 1 if there are any
    Check {
        /// Input markup file
        path: String,
    },

    /// Print the recovered tree
    Tree {
        /// Input markup file
        path: String,

        /// Print JSON instead of an outline
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let registry = load_registry(cli.tags.as_deref());

    match cli.command {
        Command::Render { path } => cmd_render(&path, &registry),
        Command::Check { path } => cmd_check(&path, &registry),
        Command::Tree { path, json } => cmd_tree(&path, &registry, json),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn load_registry(tags: Option<&str>) -> TagRegistry {
    let mut registry = TagRegistry::builtin();
    if let Some(path) = tags {
        let source = read_source(path);
        if let Err(e) = registry.extend_from_toml(&source) {
            eprintln!("Error in {path}: {e}");
            std::process::exit(1);
        }
        log::debug!("loaded tag rows from {path}");
    }
    registry
}

fn parse_tree(path: &str, registry: &TagRegistry) -> Tree {
    let source = read_source(path);
    match papermark_tree::parse_with(&source, registry) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Parse error: {e}");
            std::process::exit(1);
        }
    }
}

fn report(path: &str, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{path}:{diagnostic}");
    }
}

fn cmd_render(path: &str, registry: &TagRegistry) {
    let tree = parse_tree(path, registry);
    report(path, &tree.diagnostics);
    println!("{}", papermark_html::render(&tree));
}

fn cmd_check(path: &str, registry: &TagRegistry) {
    let tree = parse_tree(path, registry);
    if !tree.diagnostics.is_empty() {
        report(path, &tree.diagnostics);
        eprintln!("{} problem(s) in {path}", tree.diagnostics.len());
        std::process::exit(1);
    }
    eprintln!("OK: {path}");
}

fn cmd_tree(path: &str, registry: &TagRegistry, json: bool) {
    let tree = parse_tree(path, registry);
    report(path, &tree.diagnostics);

    if !json {
        print!("{}", tree.root);
        return;
    }
    match serde_json::to_string_pretty(&tree) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error serializing tree: {e}");
            std::process::exit(1);
        }
    }
}
