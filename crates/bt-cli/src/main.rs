//! btree - behavior tree authoring CLI.
//!
//! - `btree compile` - compile every tree in the project
//! - `btree check-keys` - compile shared access-key sets
//! - `btree inspect` - print a tree's states and hierarchy
//! - `btree migrate` - rewrite a legacy document in the current format
//! - `btree new` / `btree init` - scaffolding

mod config;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use bt_compiler::{
    compile_access_keys_with, compile_tree_with, CompileOptions, CompileResult, Severity,
};
use bt_document::{load_access_keys_from, load_tree_from, save_tree_to, FileStore, LoadedTree};
use bt_model::{is_identifier, AccessKeySet, BehaviorTree, NodeId, NodeKind, ParameterSet};

use config::{ProjectConfig, CONFIG_PATH, DEFAULT_CONFIG};

#[derive(Parser)]
#[command(name = "btree")]
#[command(about = "Behavior tree authoring tools", version)]
struct Cli {
    /// Project root directory
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile behavior trees (all trees in the project when none are given)
    Compile {
        trees: Vec<PathBuf>,
    },

    /// Compile access-key documents (all in the project when none are given)
    CheckKeys {
        files: Vec<PathBuf>,
    },

    /// Print a tree's states, hierarchy and load report
    Inspect {
        tree: PathBuf,
    },

    /// Load a document and save it back in the current format
    Migrate {
        tree: PathBuf,

        /// Write here instead of overwriting the input
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create a new tree with a single Default state
    New {
        name: String,
    },

    /// Initialize a new project
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let project_root = match cli.project {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Some(Commands::Compile { trees }) => compile(&project_root, trees),
        Some(Commands::CheckKeys { files }) => check_keys(&project_root, files),
        Some(Commands::Inspect { tree }) => inspect(&tree),
        Some(Commands::Migrate { tree, out }) => migrate(&tree, out),
        Some(Commands::New { name }) => new_tree(&project_root, &name),
        Some(Commands::Init) => init_project(&project_root),
        None => {
            println!("btree - Behavior Tree Authoring");
            println!();
            println!("Usage: btree <COMMAND>");
            println!();
            println!("Commands:");
            println!("  compile     Compile behavior trees");
            println!("  check-keys  Compile access-key sets");
            println!("  inspect     Print a tree");
            println!("  migrate     Rewrite a document in the current format");
            println!("  new         Create a new tree");
            println!("  init        Initialize a new project");
            println!();
            println!("Run 'btree --help' for more information.");
            Ok(())
        }
    }
}

fn load_config(project_root: &Path) -> Result<ProjectConfig> {
    let mut config = ProjectConfig::load_from_project(project_root)?;
    config.resolve_paths(project_root);
    tracing::debug!(
        version = config.version.as_deref().unwrap_or("-"),
        trees = %config.trees_dir.display(),
        access_keys = %config.access_keys_dir.display(),
        "Loaded project config"
    );
    Ok(config)
}

/// `*.json` files directly under `dir`, sorted. A missing directory has none.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_tree_file(path: &Path) -> Result<LoadedTree> {
    let mut loaded = load_tree_from(&FileStore::new(path))
        .with_context(|| format!("Failed to load tree from {}", path.display()))?;

    if loaded.tree.name().is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            loaded.tree.set_name(stem);
        }
    }
    Ok(loaded)
}

fn load_access_key_file(path: &Path) -> Result<AccessKeySet> {
    load_access_keys_from(&FileStore::new(path))
        .with_context(|| format!("Failed to load access keys from {}", path.display()))
}

fn print_result(label: &str, result: &CompileResult) {
    let status = if result.passed { "ok" } else { "FAILED" };
    println!(
        "{label}: {status} ({} errors, {} warnings)",
        result.error_count(),
        result.warning_count()
    );
    for diagnostic in &result.diagnostics {
        let tag = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("  {tag}: {}", diagnostic.issue);
    }
}

fn compile(project_root: &Path, trees: Vec<PathBuf>) -> Result<()> {
    let config = load_config(project_root)?;
    let options = CompileOptions {
        warnings_as_errors: config.compile.warnings_as_errors,
    };

    let trees = if trees.is_empty() {
        json_files(&config.trees_dir)?
    } else {
        trees
    };
    if trees.is_empty() {
        println!("No behavior trees found in {}", config.trees_dir.display());
        return Ok(());
    }

    let mut key_sets = Vec::new();
    let mut failed = 0usize;
    for path in json_files(&config.access_keys_dir)? {
        let set = load_access_key_file(&path)?;
        if config.compile.check_access_keys {
            let result = compile_access_keys_with(&set, options);
            print_result(&format!("access keys {}", set.name), &result);
            if !result.passed {
                failed += 1;
            }
        }
        key_sets.push(set);
    }

    for path in &trees {
        let loaded = load_tree_file(path)?;
        let result = compile_tree_with(&loaded.tree, &key_sets, options);
        print_result(loaded.tree.name(), &result);
        if !result.passed {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} document(s) failed to compile");
    }
    Ok(())
}

fn check_keys(project_root: &Path, files: Vec<PathBuf>) -> Result<()> {
    let config = load_config(project_root)?;
    let options = CompileOptions {
        warnings_as_errors: config.compile.warnings_as_errors,
    };

    let files = if files.is_empty() {
        json_files(&config.access_keys_dir)?
    } else {
        files
    };

    let mut failed = 0usize;
    for path in &files {
        let set = load_access_key_file(path)?;
        let result = compile_access_keys_with(&set, options);
        print_result(&set.name, &result);
        if !result.passed {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} access-key set(s) failed to compile");
    }
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let LoadedTree { tree, report } = load_tree_file(path)?;

    println!("Tree: {}", tree.name());
    println!("  Default state: {}", tree.default_state());
    println!("  Nodes: {}", tree.len());
    println!();

    for &state in tree.states() {
        print_node(&tree, state, None, 1);
    }

    let extras = tree.extra_behaviors();
    if !extras.is_empty() {
        println!();
        println!("Detached:");
        for id in extras {
            print_node(&tree, id, None, 1);
        }
    }

    if !report.is_clean() {
        println!();
        println!("Load warnings:");
        for warning in &report.warnings {
            println!("  {warning}");
        }
    }
    Ok(())
}

fn print_node(tree: &BehaviorTree, id: NodeId, bindings: Option<&ParameterSet>, depth: usize) {
    let Some(node) = tree.node(id) else {
        return;
    };

    let kind = match node.kind() {
        NodeKind::Composite(composite) => composite.composite_type().to_string(),
        NodeKind::Decorator(decorator) => match decorator.access_limit() {
            Some(limit) => format!("AccessLimit {}.{}", limit.class_name, limit.access_key),
            None => decorator.decorator_type().to_string(),
        },
        NodeKind::ChangeState(change) => format!("ChangeState -> {}", change.destination_state),
        other => other.behavior_type().to_string(),
    };
    let bindings = bindings.map(ToString::to_string).unwrap_or_default();

    println!(
        "{:indent$}{}{} [{}]",
        "",
        node.name(),
        bindings,
        kind,
        indent = depth * 2
    );

    for edge in node.edges() {
        print_node(tree, edge.child(), Some(edge.bindings()), depth + 1);
    }
}

fn migrate(path: &Path, out: Option<PathBuf>) -> Result<()> {
    let LoadedTree { tree, report } = load_tree_file(path)?;

    for warning in &report.warnings {
        println!("  {warning}");
    }

    let target = FileStore::new(out.unwrap_or_else(|| path.to_path_buf()));
    save_tree_to(&target, &tree)
        .with_context(|| format!("Failed to save tree to {}", target.path().display()))?;

    println!("Migrated {} -> {}", path.display(), target.path().display());
    Ok(())
}

fn new_tree(project_root: &Path, name: &str) -> Result<()> {
    if !is_identifier(name) {
        bail!("'{name}' is not a valid tree name");
    }

    let config = load_config(project_root)?;
    let store = FileStore::new(config.trees_dir.join(format!("{name}.json")));
    if store.path().exists() {
        bail!("{} already exists", store.path().display());
    }

    save_tree_to(&store, &BehaviorTree::new(name))
        .with_context(|| format!("Failed to save tree to {}", store.path().display()))?;

    println!("Created {}", store.path().display());
    Ok(())
}

fn init_project(project_root: &Path) -> Result<()> {
    let config_path = project_root.join(CONFIG_PATH);
    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Create default config
    if !config_path.exists() {
        std::fs::write(&config_path, DEFAULT_CONFIG)?;
    }

    let config = load_config(project_root)?;
    std::fs::create_dir_all(&config.trees_dir)?;
    std::fs::create_dir_all(&config.access_keys_dir)?;

    println!("Initialized behavior tree project in {}", project_root.display());
    println!();
    println!("Created:");
    println!("  {CONFIG_PATH}");
    println!("  {}", config.trees_dir.display());
    println!("  {}", config.access_keys_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Create a tree: btree new <NAME>");
    println!("  2. Compile: btree compile");

    Ok(())
}
