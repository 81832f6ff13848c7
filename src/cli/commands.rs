//! Command dispatch and implementations

use std::io::{self, BufRead, Write};

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::application::{labeled_outline, parse_values, Layout, TreeNodeConvert};
use crate::cli::args::{Cli, Commands, ConfigCommands, TreeInput};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{slot_count, DomainError, InsertMode, Placed, SearchTree};
use crate::exitcode;

/// Run the parsed command line. Returns the process exit code.
pub fn execute(cli: &Cli) -> CliResult<i32> {
    if let Commands::Completion { shell } = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(exitcode::OK);
    }

    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "effective settings");

    match &cli.command {
        Commands::Show { input } => cmd_show(input, &settings),
        Commands::Outline { input } => cmd_outline(input, &settings),
        Commands::Levels { input, level } => cmd_levels(input, *level, &settings),
        Commands::Search { input, target } => cmd_search(input, *target, &settings),
        Commands::Validate { input } => cmd_validate(input, &settings),
        Commands::Layout { input } => cmd_layout(input, &settings),
        Commands::Interactive { mode } => {
            let mode = mode.map(InsertMode::from).unwrap_or(settings.mode);
            let stdin = io::stdin();
            run_interactive(stdin.lock(), io::stdout(), mode)?;
            Ok(exitcode::OK)
        }
        Commands::Config { command } => cmd_config(command, &settings, cli),
        Commands::Completion { .. } => Ok(exitcode::OK),
    }
}

/// Build the tree described by the command line input.
///
/// Initial values use the requested (or configured) mode, then every
/// `--corrupt` value is inserted at the leftmost position. The height is
/// recomputed after the last insertion.
#[instrument(level = "debug", skip(settings))]
pub fn build_tree(input: &TreeInput, settings: &Settings) -> CliResult<SearchTree<i64>> {
    let values = parse_values(&input.values)?;
    let mode = input.mode.map(InsertMode::from).unwrap_or(settings.mode);
    let mut tree = SearchTree::from_values(values, mode)?;

    for value in &input.corrupt {
        tree.insert_leftmost_corrupt(*value)?;
    }
    if !input.corrupt.is_empty() {
        tree.recompute_height();
    }
    Ok(tree)
}

/// Runs of empty slots up to this length are printed dash by dash.
const MAX_SPELLED_RUN: usize = 3;

/// One level as text: the value for an occupied slot, `-` for an empty one.
///
/// Longer runs of empty slots collapse to `[-; n]`, so deep levels of a
/// sparse tree stay readable.
pub fn format_level(tree: &SearchTree<i64>, level: usize, placed: &[Placed]) -> CliResult<String> {
    let slots = slot_count(level).ok_or(DomainError::TooDeep { level })?;
    let mut tokens: Vec<String> = Vec::new();
    let push_gap = |tokens: &mut Vec<String>, gap: usize| {
        if gap > MAX_SPELLED_RUN {
            tokens.push(format!("[-; {gap}]"));
        } else {
            tokens.extend(std::iter::repeat("-".to_string()).take(gap));
        }
    };

    let mut cursor = 0;
    for &(slot, idx) in placed {
        push_gap(&mut tokens, slot - cursor);
        tokens.push(tree.value(idx).map(ToString::to_string).unwrap_or_default());
        cursor = slot + 1;
    }
    push_gap(&mut tokens, slots - cursor);

    Ok(tokens.iter().join(" "))
}

fn cmd_show(input: &TreeInput, settings: &Settings) -> CliResult<i32> {
    let tree = build_tree(input, settings)?;
    output::info(&tree.to_tree_string());
    output::detail(&format!("height: {}", tree.height()));
    output::detail(&format!("nodes:  {}", tree.len()));
    output::detail(&format!("valid:  {}", tree.is_valid()));
    Ok(exitcode::OK)
}

fn cmd_outline(input: &TreeInput, settings: &Settings) -> CliResult<i32> {
    let tree = build_tree(input, settings)?;
    for line in labeled_outline(&tree) {
        output::info(&line);
    }
    output::info(&tree.height());
    Ok(exitcode::OK)
}

fn cmd_levels(input: &TreeInput, level: Option<usize>, settings: &Settings) -> CliResult<i32> {
    let tree = build_tree(input, settings)?;
    for (level, placed) in select_levels(&tree, level)? {
        output::info(&format!("{level}: {}", format_level(&tree, level, &placed)?));
    }
    Ok(exitcode::OK)
}

/// Levels to print with their occupied slots: all levels up to the height,
/// or the single requested one. The level just below the leaves is the
/// deepest one accepted.
pub fn select_levels(tree: &SearchTree<i64>, level: Option<usize>) -> CliResult<Vec<(usize, Vec<Placed>)>> {
    let height = tree.height();
    match level {
        Some(0) => Err(CliError::InvalidArgs("levels start at 1".to_string())),
        Some(level) if level > height + 1 => Err(CliError::InvalidArgs(format!(
            "level {level} is below the tree (height {height})"
        ))),
        Some(level) => {
            let placed = tree.occupied_levels(level)?.pop().unwrap_or_default();
            Ok(vec![(level, placed)])
        }
        None => Ok(tree
            .occupied_levels(height)?
            .into_iter()
            .enumerate()
            .map(|(offset, placed)| (offset + 1, placed))
            .collect()),
    }
}

fn cmd_search(input: &TreeInput, target: i64, settings: &Settings) -> CliResult<i32> {
    let tree = build_tree(input, settings)?;
    output::detail(&format!("strategy: {}", tree.search_strategy()));

    match tree.search(&target) {
        Some(idx) => {
            let depth = tree.arena().depth(idx).unwrap_or_default();
            output::success(&format!("found {target} at level {depth}"));
            Ok(exitcode::OK)
        }
        None => {
            output::failure(&format!("{target} not found"));
            Ok(exitcode::NEGATIVE)
        }
    }
}

fn cmd_validate(input: &TreeInput, settings: &Settings) -> CliResult<i32> {
    let tree = build_tree(input, settings)?;
    let valid = tree.is_valid();
    let ordered = tree.is_fully_ordered();

    if valid {
        output::success("valid binary search tree (single-chain check)");
    } else {
        output::failure("not a valid binary search tree (single-chain check)");
    }
    if ordered {
        output::success("every subtree in order (full check)");
    } else {
        output::failure("some subtree out of order (full check)");
    }

    Ok(if valid { exitcode::OK } else { exitcode::NEGATIVE })
}

fn cmd_layout(input: &TreeInput, settings: &Settings) -> CliResult<i32> {
    let tree = build_tree(input, settings)?;
    let layout = Layout::compute(&tree, &settings.layout)?;

    output::header(&format!(
        "canvas {}x{}, radius {}",
        layout.width, layout.height, layout.radius
    ));
    for node in &layout.nodes {
        output::detail(&format!(
            "node {:>6}  level {} slot {}  at ({:.1}, {:.1})",
            node.value, node.level, node.slot, node.center.x, node.center.y
        ));
    }
    for edge in &layout.edges {
        let child = tree.value(edge.child).map(ToString::to_string).unwrap_or_default();
        let parent = tree.value(edge.parent).map(ToString::to_string).unwrap_or_default();
        output::detail(&format!(
            "edge {child} -> {parent}  ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            edge.from.x, edge.from.y, edge.to.x, edge.to.y
        ));
    }
    Ok(exitcode::OK)
}

fn cmd_config(command: &ConfigCommands, settings: &Settings, cli: &Cli) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "exists" } else { "not found" };
                    output::info(&format!("global: {} ({state})", path.display()));
                }
                None => output::warning("no config directory for this platform"),
            }
            if let Some(local) = &cli.config {
                output::info(&format!("local:  {}", local.display()));
            }
        }
    }
    Ok(exitcode::OK)
}

/// Interactive session over any reader/writer pair.
///
/// The first line holds the initial values. Every following line holds one
/// or more values inserted with `mode`; the tree is printed after each line.
/// `q`, `quit` or end of input ends the session. Malformed lines and
/// duplicates are reported and skipped.
#[instrument(level = "debug", skip(reader, writer))]
pub fn run_interactive<R: BufRead, W: Write>(reader: R, mut writer: W, mode: InsertMode) -> CliResult<SearchTree<i64>> {
    let write_err = |e| CliError::io("write output", e);
    let mut lines = reader.lines();

    writeln!(writer, "Enter initial tree:").map_err(write_err)?;
    let first = match lines.next() {
        Some(line) => line.map_err(|e| CliError::io("read input", e))?,
        None => String::new(),
    };
    let mut tree = SearchTree::from_values(parse_values(&first)?, mode)?;
    print_state(&mut writer, &tree).map_err(write_err)?;

    loop {
        writeln!(writer, "Enter value (q to quit):").map_err(write_err)?;
        let Some(line) = lines.next() else { break };
        let line = line.map_err(|e| CliError::io("read input", e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        let values = match parse_values(line) {
            Ok(values) => values,
            Err(e) => {
                warn!("{e}");
                writeln!(writer, "bad format").map_err(write_err)?;
                continue;
            }
        };
        for value in values {
            match tree.insert(value, mode) {
                Ok(_) => {}
                Err(DomainError::DuplicateValue(v)) => {
                    writeln!(writer, "value {v} already in tree").map_err(write_err)?;
                }
                Err(e) => return Err(e.into()),
            }
        }
        tree.recompute_height();
        print_state(&mut writer, &tree).map_err(write_err)?;
    }

    Ok(tree)
}

fn print_state<W: Write>(writer: &mut W, tree: &SearchTree<i64>) -> io::Result<()> {
    write!(writer, "{}", tree.to_tree_string())?;
    writeln!(
        writer,
        "height: {}, valid: {}",
        tree.height(),
        tree.is_valid()
    )
}
