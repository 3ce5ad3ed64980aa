//! `ConnTree` CLI - Command-line interface for the connection tree
//!
//! Provides commands for printing the tree, moving nodes between groups,
//! listing valid parent groups and checking the stored hierarchy.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use conntree_core::config::{AppSettings, ConfigManager};
use conntree_core::error::{TreeError, TreeErrorKind, TreeResult};
use conntree_core::models::{Node, SortBy, SortDirection, SortPolicy};
use conntree_core::tree::{self, Commit, DropPosition, NodeIndex, ParentChoice, VisibleRow};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// `ConnTree` command-line interface for organizing connections
#[derive(Parser)]
#[command(name = "conntree-cli")]
#[command(author, version, about = "ConnTree command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration directory (defaults to ~/.config/conntree)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the visible tree
    #[command(about = "Print the connection tree")]
    Tree {
        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,

        /// Sort key (defaults to the configured one)
        #[arg(short, long, value_enum)]
        sort_by: Option<SortByArg>,

        /// Sort direction (defaults to the configured one)
        #[arg(short, long, value_enum)]
        direction: Option<DirectionArg>,

        /// Also show the contents of collapsed groups
        #[arg(short, long)]
        all: bool,
    },

    /// List the direct children of a group
    #[command(about = "List the children of a group (root level if omitted)")]
    Children {
        /// Parent group name or UUID
        parent: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,

        /// Sort key (defaults to the configured one)
        #[arg(short, long, value_enum)]
        sort_by: Option<SortByArg>,

        /// Sort direction (defaults to the configured one)
        #[arg(short, long, value_enum)]
        direction: Option<DirectionArg>,
    },

    /// Move a node relative to another node
    #[command(about = "Move a node before, after or inside another node")]
    Move {
        /// Node name or UUID to move
        item: String,

        /// Target node name or UUID
        target: String,

        /// Where to place the node relative to the target
        #[arg(short, long, value_enum)]
        position: PositionArg,
    },

    /// Move a node to the end of the root level
    #[command(about = "Move a node to the root level")]
    MoveRoot {
        /// Node name or UUID to move
        item: String,
    },

    /// List the groups a node could be moved into
    #[command(about = "Show valid parent groups for a node")]
    Parents {
        /// Node name or UUID
        item: String,
    },

    /// Validate the stored tree
    #[command(about = "Check the tree for dangling parents, cycles and excess depth")]
    Check,

    /// Expand a group
    #[command(about = "Expand a group")]
    Expand {
        /// Group name or UUID
        group: String,
    },

    /// Collapse a group
    #[command(about = "Collapse a group")]
    Collapse {
        /// Group name or UUID
        group: String,
    },

    /// Store the configured sort as the manual order
    #[command(about = "Apply the configured sort as the custom order of a group")]
    Sort {
        /// Parent group name or UUID (root level if omitted)
        parent: Option<String>,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Display as indented text
    #[default]
    Table,
    /// Output as JSON
    Json,
}

/// Sort key options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortByArg {
    /// By name
    Name,
    /// By protocol
    Protocol,
    /// By host
    Hostname,
    /// By creation time
    CreatedAt,
    /// By last modification time
    UpdatedAt,
    /// By last use
    RecentlyUsed,
    /// By manual order
    Custom,
}

impl From<SortByArg> for SortBy {
    fn from(arg: SortByArg) -> Self {
        match arg {
            SortByArg::Name => Self::Name,
            SortByArg::Protocol => Self::Protocol,
            SortByArg::Hostname => Self::Hostname,
            SortByArg::CreatedAt => Self::CreatedAt,
            SortByArg::UpdatedAt => Self::UpdatedAt,
            SortByArg::RecentlyUsed => Self::RecentlyUsed,
            SortByArg::Custom => Self::Custom,
        }
    }
}

/// Sort direction options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DirectionArg {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Asc => Self::Asc,
            DirectionArg::Desc => Self::Desc,
        }
    }
}

/// Drop position options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PositionArg {
    /// Directly before the target
    Before,
    /// Directly after the target
    After,
    /// As the first child of the target group
    Inside,
}

impl From<PositionArg> for DropPosition {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::Before => Self::Before,
            PositionArg::After => Self::After,
            PositionArg::Inside => Self::Inside,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = Context::load(cli.config.as_deref()).and_then(|ctx| {
        init_logging(&ctx.settings.logging.level);
        run(&ctx, cli.command)
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

/// Installs the fmt subscriber, preferring `RUST_LOG` over the configured level
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Tree {
            format,
            sort_by,
            direction,
            all,
        } => cmd_tree(ctx, format, ctx.policy(sort_by, direction), all),
        Commands::Children {
            parent,
            format,
            sort_by,
            direction,
        } => cmd_children(
            ctx,
            parent.as_deref(),
            format,
            ctx.policy(sort_by, direction),
        ),
        Commands::Move {
            item,
            target,
            position,
        } => cmd_move(ctx, &item, &target, position.into()),
        Commands::MoveRoot { item } => cmd_move_root(ctx, &item),
        Commands::Parents { item } => cmd_parents(ctx, &item),
        Commands::Check => cmd_check(ctx),
        Commands::Expand { group } => cmd_set_expanded(ctx, &group, true),
        Commands::Collapse { group } => cmd_set_expanded(ctx, &group, false),
        Commands::Sort { parent } => cmd_sort(ctx, parent.as_deref()),
    }
}

/// Loaded configuration shared by all commands
struct Context {
    manager: ConfigManager,
    settings: AppSettings,
}

impl Context {
    fn load(config_dir: Option<&Path>) -> Result<Self, CliError> {
        let manager = match config_dir {
            Some(dir) => ConfigManager::with_config_dir(dir.to_path_buf()),
            None => ConfigManager::new()
                .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}")))?,
        };
        let settings = manager
            .load_settings()
            .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))?;
        Ok(Self { manager, settings })
    }

    fn load_nodes(&self) -> Result<Vec<Node>, CliError> {
        self.manager
            .load_nodes()
            .map_err(|e| CliError::Config(format!("Failed to load tree: {e}")))
    }

    fn save_nodes(&self, nodes: &[Node]) -> Result<(), CliError> {
        self.manager
            .save_nodes(nodes)
            .map_err(|e| CliError::Config(format!("Failed to save tree: {e}")))?;
        tracing::debug!(
            dir = %self.manager.config_dir().display(),
            count = nodes.len(),
            "Saved tree"
        );
        Ok(())
    }

    const fn max_depth(&self) -> usize {
        self.settings.tree.max_nesting_depth
    }

    /// Configured sort policy with optional per-command overrides
    fn policy(&self, sort_by: Option<SortByArg>, direction: Option<DirectionArg>) -> SortPolicy {
        let tree = &self.settings.tree;
        SortPolicy::new(
            sort_by.map_or(tree.sort_by, Into::into),
            direction.map_or(tree.sort_direction, Into::into),
        )
        .with_reorder_enabled(tree.reorder_enabled)
    }
}

// ============================================================================
// Tree display
// ============================================================================

/// Print tree command handler
fn cmd_tree(
    ctx: &Context,
    format: OutputFormat,
    policy: SortPolicy,
    all: bool,
) -> Result<(), CliError> {
    let mut nodes = ctx.load_nodes()?;
    if all {
        for node in nodes.iter_mut().filter(|n| n.is_group) {
            node.expanded = true;
        }
    }

    let rows = tree::build_visible_rows(&nodes, &policy);
    match format {
        OutputFormat::Table => println!("{}", format_tree(&rows, &nodes)),
        OutputFormat::Json => println!("{}", format_rows_json(&rows, &nodes)?),
    }
    Ok(())
}

/// Format visible rows as an indented tree
#[must_use]
pub fn format_tree(rows: &[VisibleRow], nodes: &[Node]) -> String {
    if rows.is_empty() {
        return "No nodes found.".to_string();
    }

    let index = NodeIndex::new(nodes);
    let mut output = String::new();

    for row in rows {
        let Some(node) = index.get(row.id) else {
            continue;
        };
        let indent = "  ".repeat(row.depth);
        let marker = match (row.is_group, row.expanded) {
            (true, true) => "[-] ",
            (true, false) => "[+] ",
            (false, _) => "",
        };
        let _ = write!(output, "{indent}{marker}{}", node.name);
        if let (Some(protocol), Some(host)) = (node.protocol, node.host.as_deref()) {
            let _ = write!(output, "  ({protocol} {host})");
        }
        output.push('\n');
    }

    output.trim_end().to_string()
}

/// Simplified row output for JSON
#[derive(Serialize)]
struct RowOutput<'a> {
    id: Uuid,
    name: &'a str,
    depth: usize,
    is_group: bool,
    expanded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    protocol: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<&'a str>,
}

/// Format visible rows as a JSON array
///
/// # Errors
///
/// Returns `CliError::Output` if JSON serialization fails.
pub fn format_rows_json(rows: &[VisibleRow], nodes: &[Node]) -> Result<String, CliError> {
    let index = NodeIndex::new(nodes);
    let output: Vec<RowOutput<'_>> = rows
        .iter()
        .filter_map(|row| {
            index.get(row.id).map(|node| RowOutput {
                id: node.id,
                name: &node.name,
                depth: row.depth,
                is_group: row.is_group,
                expanded: row.expanded,
                protocol: node.protocol.map(|p| p.as_str()),
                host: node.host.as_deref(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::Output(format!("Failed to serialize to JSON: {e}")))
}

/// List children command handler
fn cmd_children(
    ctx: &Context,
    parent: Option<&str>,
    format: OutputFormat,
    policy: SortPolicy,
) -> Result<(), CliError> {
    let nodes = ctx.load_nodes()?;
    let parent_id = parent
        .map(|p| find_group(&nodes, p).map(|g| g.id))
        .transpose()?;

    let children = tree::build_children(&nodes, parent_id, &policy);
    match format {
        OutputFormat::Table => println!("{}", format_children(&children)),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&children)
                .map_err(|e| CliError::Output(format!("Failed to serialize to JSON: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Format sibling nodes as a table
#[must_use]
pub fn format_children(children: &[&Node]) -> String {
    if children.is_empty() {
        return "No nodes found.".to_string();
    }

    let mut output = String::new();

    let name_width = children
        .iter()
        .map(|n| n.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let type_width = 10;
    let order_width = 5;

    let _ = writeln!(
        output,
        "{:<name_width$}  {:<type_width$}  {:>order_width$}  HOST",
        "NAME", "TYPE", "ORDER"
    );
    let _ = writeln!(
        output,
        "{:-<name_width$}  {:-<type_width$}  {:->order_width$}  {:-<4}",
        "", "", "", ""
    );

    for node in children {
        let kind = if node.is_group {
            "group".to_string()
        } else {
            node.protocol.map_or_else(|| "-".to_string(), |p| p.to_string())
        };
        let _ = writeln!(
            output,
            "{:<name_width$}  {:<type_width$}  {:>order_width$}  {}",
            node.name,
            kind,
            node.sort_order,
            node.host.as_deref().unwrap_or("-")
        );
    }

    output.trim_end().to_string()
}

// ============================================================================
// Moving nodes
// ============================================================================

/// Move command handler
fn cmd_move(
    ctx: &Context,
    item: &str,
    target: &str,
    position: DropPosition,
) -> Result<(), CliError> {
    let nodes = ctx.load_nodes()?;
    let item = find_node(&nodes, item)?;
    let target = find_node(&nodes, target)?;

    let result = tree::move_node(&nodes, item.id, target.id, position, ctx.max_depth());
    commit_move(ctx, result)
}

/// Move-to-root command handler
fn cmd_move_root(ctx: &Context, item: &str) -> Result<(), CliError> {
    let nodes = ctx.load_nodes()?;
    let item = find_node(&nodes, item)?;

    let result = tree::move_to_root(&nodes, item.id, ctx.max_depth());
    commit_move(ctx, result)
}

/// Saves a committed move; a no-op is reported but not treated as a failure
fn commit_move(ctx: &Context, result: TreeResult<Commit>) -> Result<(), CliError> {
    match result {
        Ok(commit) => {
            ctx.save_nodes(&commit.nodes)?;
            println!("{}", describe_move(&commit));
            Ok(())
        }
        Err(e) if e.kind() == TreeErrorKind::NoOp => {
            println!("{e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Human-readable summary of a committed move
#[must_use]
pub fn describe_move(commit: &Commit) -> String {
    let summary = &commit.summary;
    let name = commit
        .nodes
        .iter()
        .find(|n| n.id == summary.node_id)
        .map_or("?", |n| n.name.as_str());
    let destination = summary
        .new_parent
        .and_then(|id| tree::group_path(id, &commit.nodes))
        .map_or_else(|| "root level".to_string(), |path| format!("'{path}'"));

    format!(
        "Moved '{name}' to {destination} at position {}",
        summary.new_order
    )
}

/// Parent picker command handler
fn cmd_parents(ctx: &Context, item: &str) -> Result<(), CliError> {
    let nodes = ctx.load_nodes()?;
    let node = find_node(&nodes, item)?;
    let max_depth = ctx.max_depth();

    let root = tree::check_move_to_parent(node.id, None, &nodes, max_depth).err();
    let choices = tree::parent_choices(node.id, &nodes, max_depth);
    println!(
        "{}",
        format_parent_choices(root.as_ref(), &choices, node.parent_id)
    );
    Ok(())
}

/// Format parent choices with the reason each disabled entry is unavailable
#[must_use]
pub fn format_parent_choices(
    root: Option<&TreeError>,
    choices: &[ParentChoice],
    current: Option<Uuid>,
) -> String {
    let status = |id: Option<Uuid>, disabled: Option<&TreeError>| match disabled {
        Some(e) => e.to_string(),
        None if id == current => "current".to_string(),
        None => "available".to_string(),
    };

    let path_width = choices
        .iter()
        .map(|c| c.path.chars().count())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    let _ = writeln!(output, "{:<path_width$}  STATUS", "GROUP");
    let _ = writeln!(output, "{:-<path_width$}  {:-<20}", "", "");
    let _ = writeln!(output, "{:<path_width$}  {}", "(root)", status(None, root));
    for choice in choices {
        let _ = writeln!(
            output,
            "{:<path_width$}  {}",
            choice.path,
            status(Some(choice.id), choice.disabled.as_ref())
        );
    }

    output.trim_end().to_string()
}

// ============================================================================
// Maintenance commands
// ============================================================================

/// Check command handler
fn cmd_check(ctx: &Context) -> Result<(), CliError> {
    let nodes = ctx.load_nodes()?;
    tree::validate_forest(&nodes, ctx.max_depth()).map_err(CliError::InvalidTree)?;

    let groups = nodes.iter().filter(|n| n.is_group).count();
    println!(
        "Tree OK: {} nodes ({groups} groups, {} connections)",
        nodes.len(),
        nodes.len() - groups
    );
    Ok(())
}

/// Expand/collapse command handler
fn cmd_set_expanded(ctx: &Context, group: &str, expanded: bool) -> Result<(), CliError> {
    let nodes = ctx.load_nodes()?;
    let group = find_group(&nodes, group)?;

    let updated = tree::set_expanded(&nodes, group.id, expanded)?;
    ctx.save_nodes(&updated)?;

    let verb = if expanded { "Expanded" } else { "Collapsed" };
    println!("{verb} '{}'", group.name);
    Ok(())
}

/// Sort command handler
fn cmd_sort(ctx: &Context, parent: Option<&str>) -> Result<(), CliError> {
    let nodes = ctx.load_nodes()?;
    let parent = parent.map(|p| find_group(&nodes, p)).transpose()?;
    let policy = ctx.settings.tree.sort_policy();

    let updated = tree::apply_sort_as_custom_order(&nodes, parent.map(|g| g.id), &policy);
    let changed = updated
        .iter()
        .zip(&nodes)
        .filter(|(new, old)| new.sort_order != old.sort_order)
        .count();
    ctx.save_nodes(&updated)?;

    let scope = parent.map_or_else(|| "root level".to_string(), |g| format!("'{}'", g.name));
    println!(
        "Applied {} order to {scope} ({changed} nodes renumbered)",
        policy.sort_by.as_str()
    );
    Ok(())
}

// ============================================================================
// Lookup helpers
// ============================================================================

/// Find a node by name or UUID
fn find_node<'a>(nodes: &'a [Node], name_or_id: &str) -> Result<&'a Node, CliError> {
    lookup(nodes.iter(), name_or_id)
}

/// Find a group by name or UUID
fn find_group<'a>(nodes: &'a [Node], name_or_id: &str) -> Result<&'a Node, CliError> {
    lookup(nodes.iter().filter(|n| n.is_group), name_or_id)
}

fn lookup<'a>(
    candidates: impl Iterator<Item = &'a Node>,
    name_or_id: &str,
) -> Result<&'a Node, CliError> {
    let candidates: Vec<&Node> = candidates.collect();

    // Try UUID first
    if let Ok(uuid) = Uuid::parse_str(name_or_id) {
        if let Some(node) = candidates.iter().copied().find(|n| n.id == uuid) {
            return Ok(node);
        }
    }

    // Search by name (case-insensitive)
    let matches: Vec<&Node> = candidates
        .into_iter()
        .filter(|n| n.name.eq_ignore_ascii_case(name_or_id))
        .collect();

    match matches.as_slice() {
        [] => Err(CliError::NotFound(name_or_id.to_string())),
        [node] => Ok(*node),
        _ => Err(CliError::Ambiguous(name_or_id.to_string())),
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Exit codes for CLI commands
pub mod exit_codes {
    /// General error - configuration, IO or output errors
    pub const GENERAL_ERROR: i32 = 1;
    /// A node name or UUID could not be resolved
    pub const NOT_FOUND: i32 = 2;
    /// The requested move was rejected or the stored tree is invalid
    pub const REJECTED: i32 = 3;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No node matches the given name or UUID
    #[error("Node not found: {0}")]
    NotFound(String),

    /// More than one node matches the given name
    #[error("Ambiguous name: {0}")]
    Ambiguous(String),

    /// The tree operation was rejected
    #[error("Move rejected: {0}")]
    Rejected(#[from] TreeError),

    /// The stored tree violates the hierarchy rules
    #[error("Invalid tree: {0}")]
    InvalidTree(TreeError),

    /// Output formatting error
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) | Self::Ambiguous(_) => exit_codes::NOT_FOUND,
            Self::Rejected(_) | Self::InvalidTree(_) => exit_codes::REJECTED,
            Self::Config(_) | Self::Output(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
