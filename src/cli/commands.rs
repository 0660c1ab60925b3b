//! Command dispatch: each subcommand loads a tree literal into an arena and
//! runs one tree operation on it.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::{env, fs, io};

use clap::CommandFactory;
use clap_complete::generate;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, OutputFormat, Settings};
use crate::domain::{NodeArena, NodeId, TreeRecord};
use crate::util::path::{join_tree_path, split_tree_path};

/// Arena used by the CLI: string names, JSON data, JSON event payloads.
pub type JsonTree = NodeArena<String, Value, Value>;

/// A tree literal loaded into an arena.
#[derive(Debug)]
pub struct LoadedTree {
    pub arena: JsonTree,
    pub root: NodeId,
}

/// One listener invocation observed while an event bubbled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub path: String,
    pub is_child: bool,
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = cli.config_dir.clone().or_else(|| env::current_dir().ok());
    let settings = Settings::load(config_dir.as_deref())?;
    debug!(?settings, "effective settings");

    match &cli.command {
        Some(Commands::Show { file, format }) => show(file, format.unwrap_or(settings.format), &settings),
        Some(Commands::Get { file, path }) => get(file, path, &settings),
        Some(Commands::Find { file, data }) => find(file, data, &settings),
        Some(Commands::Leaves { file }) => leaves(file, &settings),
        Some(Commands::Remove { file, path, output }) => remove(file, path, output.as_deref(), &settings),
        Some(Commands::Emit {
            file,
            path,
            event,
            payload,
        }) => emit(file, path, event, payload.as_deref(), &settings),
        Some(Commands::Demo) => demo(&settings),
        Some(Commands::Config { command }) => config(command, &settings),
        Some(Commands::Completion { shell }) => {
            generate(*shell, &mut Cli::command(), "nodetree", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Parse a tree literal from JSON text.
pub fn parse_tree(text: &str, context: &str) -> CliResult<LoadedTree> {
    let record: TreeRecord<String, Value> =
        serde_json::from_str(text).map_err(|e| CliError::json(context, e))?;
    let mut arena = JsonTree::with_capacity(record.size());
    let root = arena.from_record(record);
    Ok(LoadedTree { arena, root })
}

/// Read and parse a tree literal file.
#[instrument(level = "debug")]
pub fn load_tree(file: &Path) -> CliResult<LoadedTree> {
    let text = fs::read_to_string(file)
        .map_err(|e| CliError::io(format!("read {}", file.display()), e))?;
    let tree = parse_tree(&text, &file.display().to_string())?;
    debug!(nodes = tree.arena.len(), "tree loaded");
    Ok(tree)
}

/// Resolve a textual path (relative to the root) to a node.
pub fn resolve_path(tree: &LoadedTree, path: &str, settings: &Settings) -> CliResult<NodeId> {
    let segments = split_tree_path(path, &settings.path_separator);
    tree.arena
        .get_node_by_path(tree.root, &segments)
        .ok_or_else(|| CliError::NotFound(path.to_string()))
}

/// Interpret a command-line value as JSON, falling back to a plain string.
pub fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Render the whole tree in the requested format.
pub fn render(tree: &LoadedTree, format: OutputFormat, pretty: bool) -> CliResult<String> {
    match format {
        OutputFormat::Tree => Ok(tree.arena.to_tree_string(tree.root)?.to_string()),
        OutputFormat::Json => to_json(&tree.arena.to_record(tree.root)?, pretty),
    }
}

fn to_json(record: &TreeRecord<String, Value>, pretty: bool) -> CliResult<String> {
    let result = if pretty {
        serde_json::to_string_pretty(record)
    } else {
        serde_json::to_string(record)
    };
    result.map_err(|e| CliError::json("serialize tree", e))
}

fn node_path(tree: &LoadedTree, id: NodeId, settings: &Settings) -> CliResult<String> {
    Ok(join_tree_path(&tree.arena.path(id)?, &settings.path_separator))
}

/// Register a recording listener for `event` on every node, then emit at
/// `target`. Returns the hops in invocation order.
#[instrument(level = "debug", skip(tree, payload, settings))]
pub fn trace_emission(
    tree: &mut LoadedTree,
    target: NodeId,
    event: &str,
    payload: Option<Value>,
    settings: &Settings,
) -> CliResult<Vec<Hop>> {
    let hops: Rc<RefCell<Vec<Hop>>> = Rc::default();
    let ids: Vec<NodeId> = tree.arena.iter(tree.root).map(|node| node.id()).collect();

    for id in ids {
        let hops = Rc::clone(&hops);
        let separator = settings.path_separator.clone();
        let name = event.to_string();
        tree.arena.add_event_listener(id, event, move |arena, e| {
            let path = join_tree_path(&arena.path(e.current)?, &separator);
            info!(event = %name, current = %path, is_child = e.is_child, "listener fired");
            hops.borrow_mut().push(Hop {
                path,
                is_child: e.is_child,
            });
            Ok(())
        })?;
    }

    tree.arena.emit_event(target, event, payload.as_ref())?;
    let hops = hops.borrow().clone();
    Ok(hops)
}

#[instrument(level = "debug", skip(settings))]
fn show(file: &Path, format: OutputFormat, settings: &Settings) -> CliResult<()> {
    let tree = load_tree(file)?;
    output::info(&render(&tree, format, settings.pretty)?);
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn get(file: &Path, path: &str, settings: &Settings) -> CliResult<()> {
    let tree = load_tree(file)?;
    let id = resolve_path(&tree, path, settings)?;
    let node = tree
        .arena
        .node(id)
        .ok_or_else(|| CliError::NotFound(path.to_string()))?;

    output::action("path", &node_path(&tree, id, settings)?);
    match node.data() {
        Some(data) => output::action("data", data),
        None => output::action("data", "-"),
    }
    let children: Vec<&str> = node.children().map(|child| child.name().as_str()).collect();
    output::action(
        "children",
        &format!("{} [{}]", node.node().child_count(), children.join(", ")),
    );
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn find(file: &Path, data: &str, settings: &Settings) -> CliResult<()> {
    let tree = load_tree(file)?;
    let wanted = parse_value(data);
    let id = tree
        .arena
        .find_node_by_condition(tree.root, |node| node.data() == Some(&wanted))
        .ok_or_else(|| CliError::NotFound(format!("node with data {}", wanted)))?;
    output::info(&node_path(&tree, id, settings)?);
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn leaves(file: &Path, settings: &Settings) -> CliResult<()> {
    let tree = load_tree(file)?;
    for leaf in tree.arena.leaves(tree.root) {
        output::info(&node_path(&tree, leaf, settings)?);
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn remove(file: &Path, path: &str, out: Option<&Path>, settings: &Settings) -> CliResult<()> {
    let mut tree = load_tree(file)?;
    let segments = split_tree_path(path, &settings.path_separator);
    if segments.is_empty() {
        return Err(CliError::InvalidArgs("the root cannot be removed".into()));
    }
    if !tree.arena.remove(tree.root, &segments) {
        return Err(CliError::NotFound(path.to_string()));
    }

    let json = to_json(&tree.arena.to_record(tree.root)?, settings.pretty)?;
    match out {
        Some(out) => {
            fs::write(out, json).map_err(|e| CliError::io(format!("write {}", out.display()), e))?;
            output::action("Removed", &format!("{} (written to {})", path, out.display()));
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn emit(file: &Path, path: &str, event: &str, payload: Option<&str>, settings: &Settings) -> CliResult<()> {
    let mut tree = load_tree(file)?;
    let target = resolve_path(&tree, path, settings)?;
    let payload = payload.map(parse_value);

    let hops = trace_emission(&mut tree, target, event, payload, settings)?;
    output::header(&format!("{} → {} listener(s)", event, hops.len()));
    for hop in &hops {
        output::hop(hop.is_child, &hop.path);
    }
    Ok(())
}

/// The sample tree literal: `Root` with a single `Child`.
pub fn demo_record() -> TreeRecord<String, Value> {
    TreeRecord::new("Root".to_string(), Some(Value::from("Root Data")))
        .with_children([TreeRecord::new("Child".to_string(), Some(Value::from("Child Data")))])
}

fn demo(settings: &Settings) -> CliResult<()> {
    let mut arena = JsonTree::new();
    let root = arena.from_record(demo_record());
    let tree = LoadedTree { arena, root };

    output::header("tree");
    output::info(&render(&tree, OutputFormat::Tree, settings.pretty)?);
    output::header("tree literal");
    output::info(&render(&tree, OutputFormat::Json, settings.pretty)?);
    Ok(())
}

fn config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::detail("no config directory available"),
        },
    }
    Ok(())
}
