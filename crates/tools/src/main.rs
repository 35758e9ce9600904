use std::env;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bomber_ai::{AgentConfig, EnemyScope, Pos, RouteFinder, ThreatOracle};
use clap::{Parser, Subcommand};
use tools::{CrossBlastOracle, Scenario};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "BOMBER_AI_CONFIG";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scenario JSON file
    #[arg(short, long)]
    scenario: PathBuf,

    /// Planner/executor TOML config; falls back to $BOMBER_AI_CONFIG, then defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bombs with at most this much fuse left count as imminent
    #[arg(long, default_value_t = 500)]
    imminent_fuse_ms: u32,

    #[command(subcommand)]
    query: Query,
}

#[derive(Subcommand)]
enum Query {
    /// Direct route from the agent to a cell, or to the nearest enemy
    Route {
        #[arg(long, value_parser = parse_cell)]
        to: Option<Pos>,
        #[arg(long)]
        humans_only: bool,
    },
    /// Bomb-aware route to the nearest enemy
    Enemy {
        #[arg(long)]
        humans_only: bool,
    },
    /// Escape from every tile currently affected by bombs
    Escape,
    /// Route to the closest bonus this agent can claim
    Upgrade,
    /// Escape plan if a bomb placed now is worth it
    Gate {
        #[arg(long)]
        humans_only: bool,
    },
    /// Whether a cell (default: the agent's) is an enclosure under current blasts
    Enclosure {
        #[arg(long, value_parser = parse_cell)]
        at: Option<Pos>,
    },
    /// Nearest enemy cell
    Nearest {
        #[arg(long)]
        humans_only: bool,
    },
}

fn parse_cell(text: &str) -> Result<Pos, String> {
    let (x, y) = text.split_once(',').ok_or_else(|| format!("expected X,Y, got {text:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {text:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {text:?}: {e}"))?;
    Ok(Pos::new(x, y))
}

fn scope(humans_only: bool) -> EnemyScope {
    if humans_only { EnemyScope::HumansOnly } else { EnemyScope::AllOpponents }
}

fn load_config(explicit: Option<&Path>) -> Result<AgentConfig> {
    let path =
        explicit.map(Path::to_path_buf).or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => AgentConfig::load(&path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(AgentConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("Failed to read scenario: {}", args.scenario.display()))?;
    let (arena, agent) = scenario.build(config.geometry).context("Failed to build arena")?;
    let oracle = CrossBlastOracle::new(&arena).with_imminent_fuse(args.imminent_fuse_ms);
    let finder = RouteFinder::new(&arena, agent, &oracle, &config.planner);
    info!(agent = %scenario.agent, players = arena.players.len(), "arena loaded");

    let output = match args.query {
        Query::Route { to, humans_only } => {
            let goal = to.or_else(|| finder.nearest_enemy(scope(humans_only)));
            serde_json::to_string(&finder.find_route(finder.agent_cell(), goal))?
        }
        Query::Enemy { humans_only } => {
            let goal = finder.nearest_enemy(scope(humans_only));
            serde_json::to_string(&finder.plan_to_enemy(finder.agent_cell(), goal))?
        }
        Query::Escape => {
            let danger = oracle.tiles_affected_by_bombs();
            serde_json::to_string(&finder.escape_from_explosion(&danger))?
        }
        Query::Upgrade => serde_json::to_string(&finder.route_to_upgrade())?,
        Query::Gate { humans_only } => {
            serde_json::to_string(&finder.can_put_bomb_and_escape(scope(humans_only)))?
        }
        Query::Enclosure { at } => {
            let position = at.or_else(|| finder.agent_cell()).context("Agent has no cell")?;
            let danger = oracle.tiles_affected_by_bombs();
            serde_json::to_string(&finder.is_enclosure(&danger, position))?
        }
        Query::Nearest { humans_only } => {
            serde_json::to_string(&finder.nearest_enemy(scope(humans_only)))?
        }
    };

    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn cells_parse_from_comma_pairs() {
        assert_eq!(parse_cell("3,4"), Ok(Pos::new(3, 4)));
        assert_eq!(parse_cell(" 0 , 12 "), Ok(Pos::new(0, 12)));
        assert!(parse_cell("3").is_err());
        assert!(parse_cell("a,1").is_err());
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.toml");
        assert!(load_config(Some(&missing)).is_err());

        let present = dir.path().join("agent.toml");
        fs::write(&present, "[planner]\ngate_limit_all = 2\n").expect("write");
        let config = load_config(Some(&present)).expect("config");
        assert_eq!(config.planner.gate_limit_all, 2);
    }
}
