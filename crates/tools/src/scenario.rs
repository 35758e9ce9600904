//! JSON scenario files: a glyph grid, players, bombs and the agent to plan for.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use bomber_ai::state::centred_pixel;
use bomber_ai::{Arena, Bomb, Controller, Geometry, Grid, GridParseError, Player, PlayerId, Pos};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bad grid: {0}")]
    Grid(#[from] GridParseError),

    #[error("duplicate player name {0:?}")]
    DuplicatePlayer(String),

    #[error("agent {0:?} is not one of the scenario's players")]
    UnknownAgent(String),

    #[error("{what} at {cell:?} lies outside the grid")]
    OutOfBounds { what: String, cell: Pos },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub grid: Vec<String>,
    pub players: Vec<PlayerSpec>,
    #[serde(default)]
    pub bombs: Vec<BombSpec>,
    /// Name of the player the planner acts for.
    pub agent: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    pub controller: Controller,
    pub cell: Pos,
    #[serde(default = "alive")]
    pub alive: bool,
    #[serde(default)]
    pub bomb_range: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BombSpec {
    pub cell: Pos,
    pub radius: u32,
    #[serde(default = "default_fuse")]
    pub fuse_ms: u32,
}

fn alive() -> bool {
    true
}

fn default_fuse() -> u32 {
    2000
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Builds the arena and resolves the acting agent's id.
    pub fn build(&self, geometry: Geometry) -> Result<(Arena, PlayerId), ScenarioError> {
        let grid = Grid::parse(self.grid.as_slice())?;
        let mut arena = Arena::new(grid, geometry);

        let mut names = BTreeSet::new();
        for spec in &self.players {
            if !names.insert(spec.name.as_str()) {
                return Err(ScenarioError::DuplicatePlayer(spec.name.clone()));
            }
            check_bounds(&arena.grid, &format!("player {}", spec.name), spec.cell)?;
            let mut player = Player::at(&spec.name, spec.controller, spec.cell, &geometry);
            player.alive = spec.alive;
            if let Some(range) = spec.bomb_range {
                player.bomb_range = range;
            }
            arena.add_player(player);
        }

        for spec in &self.bombs {
            check_bounds(&arena.grid, "bomb", spec.cell)?;
            let pixel = centred_pixel(spec.cell, &geometry);
            let bomb = Bomb { owner: None, pixel, fuse_ms: spec.fuse_ms, radius: spec.radius };
            arena.bombs.push(bomb);
        }

        let agent = arena
            .player_named(&self.agent)
            .ok_or_else(|| ScenarioError::UnknownAgent(self.agent.clone()))?;
        Ok((arena, agent))
    }
}

fn check_bounds(grid: &Grid, what: &str, cell: Pos) -> Result<(), ScenarioError> {
    if grid.in_bounds(cell) {
        return Ok(());
    }
    Err(ScenarioError::OutOfBounds { what: what.to_string(), cell })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    const SAMPLE: &str = r#"{
        "grid": ["....", ".#+.", "...R"],
        "players": [
            {
                "name": "bot", "controller": "Autonomous",
                "cell": { "x": 0, "y": 0 }, "bomb_range": 2
            },
            { "name": "you", "controller": "Human", "cell": { "x": 3, "y": 0 } }
        ],
        "bombs": [ { "cell": { "x": 2, "y": 2 }, "radius": 1 } ],
        "agent": "bot"
    }"#;

    #[test]
    fn sample_builds_an_arena() {
        let scenario = Scenario::from_json_str(SAMPLE).expect("parse");
        let (arena, agent) = scenario.build(Geometry::default()).expect("build");

        assert_eq!(arena.grid.bounds(), (4, 3));
        assert_eq!(arena.players.len(), 2);
        assert_eq!(arena.player(agent).map(|p| p.bomb_range), Some(2));
        assert_eq!(arena.bomb_cells(), vec![Pos::new(2, 2)]);
        assert_eq!(arena.bombs[0].fuse_ms, 2000);
    }

    #[test]
    fn unknown_agent_is_rejected() {
        let mut scenario = Scenario::from_json_str(SAMPLE).expect("parse");
        scenario.agent = "nobody".to_string();
        let err = scenario.build(Geometry::default()).expect_err("unknown agent");
        assert!(matches!(err, ScenarioError::UnknownAgent(name) if name == "nobody"));
    }

    #[test]
    fn players_outside_the_grid_are_rejected() {
        let mut scenario = Scenario::from_json_str(SAMPLE).expect("parse");
        scenario.players[1].cell = Pos::new(9, 0);
        let err = scenario.build(Geometry::default()).expect_err("out of bounds");
        assert!(matches!(err, ScenarioError::OutOfBounds { .. }));
    }

    #[test]
    fn load_reports_io_and_json_errors() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"{ not json").expect("write");
        assert!(matches!(Scenario::load(file.path()), Err(ScenarioError::Json(_))));

        let missing = file.path().with_extension("missing");
        assert!(matches!(Scenario::load(&missing), Err(ScenarioError::Io(_))));
    }
}
