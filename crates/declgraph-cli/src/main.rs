//! declgraph CLI - build and query declaration graphs from node dumps

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use declgraph_builder::{build, BuildOptions, Severity};
use declgraph_frontend::TranslationUnit;
use declgraph_model::Decl;

#[derive(Parser)]
#[command(name = "declgraph")]
#[command(about = "Declaration graph builder for front-end node dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the graph from a node dump and output it as JSON
    Build {
        /// Input node dump (JSON)
        file: PathBuf,
        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
        /// Also visit declarations from system headers
        #[arg(long)]
        system: bool,
        /// Keep typedefs of anonymous aggregates as separate nodes
        #[arg(long)]
        no_squash: bool,
    },
    /// Look up a declaration by qualified name
    Query {
        /// Input node dump (JSON)
        file: PathBuf,
        /// Qualified name (e.g. "gfx::Vector3")
        #[arg(short, long)]
        name: String,
        /// Search the system root instead of the user root
        #[arg(long)]
        system: bool,
    },
    /// Show summary information about a node dump
    Info {
        /// Input node dump (JSON)
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            file,
            pretty,
            system,
            no_squash,
        } => cmd_build(&file, pretty, system, no_squash),
        Commands::Query { file, name, system } => cmd_query(&file, &name, system),
        Commands::Info { file } => cmd_info(&file),
    }
}

fn load_unit(file: &PathBuf) -> TranslationUnit {
    let source = match fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&source) {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("Error parsing {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn options(system: bool, no_squash: bool) -> BuildOptions {
    BuildOptions {
        auto_squash_typedef: !no_squash,
        parse_system_includes: system,
        ..Default::default()
    }
}

fn cmd_build(file: &PathBuf, pretty: bool, system: bool, no_squash: bool) {
    let unit = load_unit(file);
    let result = build(&unit, options(system, no_squash));

    for diagnostic in &result.diagnostics {
        eprintln!("{}", diagnostic);
    }

    let json = if pretty {
        serde_json::to_string_pretty(&result.graph).unwrap()
    } else {
        serde_json::to_string(&result.graph).unwrap()
    };
    println!("{}", json);

    if result
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error)
    {
        std::process::exit(1);
    }
}

fn cmd_query(file: &PathBuf, name: &str, system: bool) {
    let unit = load_unit(file);
    let result = build(&unit, options(system, false));
    let graph = &result.graph;

    let root = if system {
        graph.system_root()
    } else {
        graph.user_root()
    };
    match graph.find_by_qualified_name(root, name) {
        Some(decl) => {
            let json = serde_json::to_string_pretty(graph.decl(decl)).unwrap();
            println!("{}", json);
        }
        None => {
            eprintln!("✗ no declaration named `{}`", name);
            std::process::exit(1);
        }
    }
}

fn cmd_info(file: &PathBuf) {
    let unit = load_unit(file);
    let result = build(&unit, options(true, false));
    let graph = &result.graph;

    let mut namespaces = 0usize;
    let mut classes = 0usize;
    let mut enums = 0usize;
    let mut typedefs = 0usize;
    let mut functions = 0usize;
    for (_, decl) in graph.decls() {
        match decl {
            Decl::Namespace(_) => namespaces += 1,
            Decl::Class(_) => classes += 1,
            Decl::Enum(_) => enums += 1,
            Decl::Typedef(_) => typedefs += 1,
            Decl::Function(_) => functions += 1,
            Decl::TranslationUnit(_) => {}
        }
    }

    println!("{}:", file.display());
    println!("  nodes:       {}", unit.node_count());
    println!("  raw types:   {}", unit.type_count());
    println!("  namespaces:  {}", namespaces);
    println!("  classes:     {}", classes);
    println!("  enums:       {}", enums);
    println!("  typedefs:    {}", typedefs);
    println!("  functions:   {}", functions);
    println!("  types:       {}", graph.type_count());
    println!("  diagnostics: {}", result.diagnostics.len());
}
