//! Command dispatch and implementations

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use serde::Serialize;
use termtree::Tree;
use tracing::{debug, info, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, TreeSource};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{
    DomainResult, Entry, NestedSet, NestedSetBuilder, NodeId, TreeArena, TreeNode,
};
use crate::generator::{sample_tree, sequential_ids, TreeGenerator};
use crate::tree_traits::TreeNodeConvert;

/// Largest tree the `tree` command renders.
const MAX_RENDERED_NODES: usize = 10_000;

/// Largest tree any command generates.
const MAX_GENERATED_NODES: usize = 50_000_000;

/// Input tree resolved from the command line.
#[derive(Debug)]
pub enum InputTree {
    Sample(TreeNode),
    Generated(TreeArena),
}

impl InputTree {
    /// Sample tree if requested, otherwise a generated tree whose shape
    /// falls back to the settings for anything not given on the command line.
    #[instrument(level = "debug", skip(settings))]
    pub fn resolve(source: &TreeSource, settings: &Settings) -> CliResult<Self> {
        if source.sample {
            return Ok(Self::Sample(sample_tree()));
        }

        let depth = source.depth.unwrap_or(settings.generator.depth);
        let generator = match source.fanout {
            Some(0) => {
                return Err(CliError::InvalidArgs("fanout must be at least 1".to_string()));
            }
            Some(fanout) => TreeGenerator::new(fanout),
            None => settings.tree_generator(),
        };
        match generator.node_count(depth) {
            Some(nodes) if nodes <= MAX_GENERATED_NODES => {}
            _ => {
                return Err(CliError::InvalidArgs(format!(
                    "tree with depth {} and fanout {} exceeds the limit of {} nodes",
                    depth,
                    generator.fanout(),
                    MAX_GENERATED_NODES
                )));
            }
        }

        let arena =
            generator.create_arena_tree(depth, sequential_ids(settings.generator.first_id))?;
        debug!(
            depth,
            fanout = generator.fanout(),
            nodes = arena.len(),
            "generated input tree"
        );
        Ok(Self::Generated(arena))
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Sample(tree) => tree.len(),
            Self::Generated(arena) => arena.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn build(&self, builder: &NestedSetBuilder) -> DomainResult<NestedSet> {
        match self {
            Self::Sample(tree) => builder.build(Some(tree)),
            Self::Generated(arena) => builder.build(arena.root_node()),
        }
    }

    pub fn to_tree_string(&self) -> Tree<String> {
        match self {
            Self::Sample(tree) => tree.to_tree_string(),
            Self::Generated(arena) => arena.to_tree_string(),
        }
    }
}

/// TOML document for `build --toml`.
#[derive(Serialize)]
struct EntriesDocument<'a> {
    entries: &'a [Entry],
}

/// Ids stepped over and subtrees absorbed by one walk.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub stepped: Vec<NodeId>,
    pub extracted: Vec<Vec<NodeId>>,
}

/// Steps an enumerator over `set`, extracting the subtree whenever the cursor
/// lands on one of `extract_at`.
pub fn walk(set: &NestedSet, extract_at: &[NodeId]) -> DomainResult<WalkReport> {
    let mut report = WalkReport::default();
    let mut enumerator = set.enumerator();

    while !enumerator.is_terminal() {
        let id = enumerator.current_id()?;
        if extract_at.contains(&id) {
            let mut subtree = Vec::new();
            enumerator.extract_subtree(|id| subtree.push(id))?;
            report.extracted.push(subtree);
        } else {
            report.stepped.push(id);
        }
        enumerator.advance();
    }
    Ok(report)
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build { source, toml }) => _build(cli, source, *toml),
        Some(Commands::Tree { source }) => _tree(cli, source),
        Some(Commands::Walk { source, extract }) => _walk(cli, source, extract),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    Ok(Settings::load(cli.config.as_deref())?)
}

#[instrument(skip(cli))]
fn _build(cli: &Cli, source: &TreeSource, as_toml: bool) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let input = InputTree::resolve(source, &settings)?;
    let set = input.build(&settings.nested_set_builder())?;
    info!(nodes = input.len(), entries = set.len(), "built nested set");

    if as_toml {
        let document = EntriesDocument {
            entries: set.entries(),
        };
        output::info(&toml::to_string_pretty(&document)?);
        return Ok(());
    }

    output::header(&format!("{:>10} {:>10} {:>10}", "id", "left", "right"));
    for entry in &set {
        output::entry_row(entry.id, entry.left, entry.right);
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _tree(cli: &Cli, source: &TreeSource) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let input = InputTree::resolve(source, &settings)?;
    if input.len() > MAX_RENDERED_NODES {
        return Err(CliError::InvalidArgs(format!(
            "tree too large to render: {} nodes, limit is {}",
            input.len(),
            MAX_RENDERED_NODES
        )));
    }
    let set = input.build(&settings.nested_set_builder())?;

    output::header("source tree");
    output::info(&input.to_tree_string());
    output::header("nested set");
    output::info(&set.to_tree_string());
    Ok(())
}

#[instrument(skip(cli))]
fn _walk(cli: &Cli, source: &TreeSource, extract: &[NodeId]) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let input = InputTree::resolve(source, &settings)?;
    let set = input.build(&settings.nested_set_builder())?;

    let report = walk(&set, extract)?;
    for subtree in &report.extracted {
        output::action("extracted", &subtree.iter().join(" "));
    }
    output::action("stepped", &report.stepped.iter().join(" "));
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::error("no config directory available on this platform"),
        },
    }
    Ok(())
}
