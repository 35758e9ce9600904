//! Read model of the arena: terrain grid, live bombs and players.
//! The planning engine only reads these; the game loop owns mutation.

use std::sync::{Arc, RwLock};

use slotmap::SlotMap;
use thiserror::Error;

use crate::config::Geometry;
use crate::types::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellKind>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridParseError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph { row: usize, column: usize, glyph: char },
}

impl Grid {
    pub fn new(width: usize, height: usize, fill: CellKind) -> Self {
        Self { width, height, cells: vec![fill; width * height] }
    }

    /// Builds a grid from glyph rows; row index is `y`, column index is `x`.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridParseError> {
        let width = rows.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(GridParseError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(GridParseError::RaggedRow { row, expected: width, found });
            }
            for (column, glyph) in line.chars().enumerate() {
                let kind = CellKind::from_glyph(glyph)
                    .ok_or(GridParseError::UnknownGlyph { row, column, glyph })?;
                cells.push(kind);
            }
        }
        Ok(Self { width, height: rows.len(), cells })
    }

    pub fn render(&self) -> Vec<String> {
        self.cells.chunks(self.width).map(|row| row.iter().map(|c| c.glyph()).collect()).collect()
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Cell kind at `pos`; anything outside the grid reads as `Solid`.
    pub fn classify(&self, pos: Pos) -> CellKind {
        if !self.in_bounds(pos) {
            return CellKind::Solid;
        }
        self.cells[self.index(pos)]
    }

    pub fn set(&mut self, pos: Pos, kind: CellKind) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.cells[idx] = kind;
    }

    pub fn is_directly_passable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.classify(pos).is_directly_passable()
    }

    pub fn is_passable_through_soft(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.classify(pos).is_passable_through_soft()
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Pos::new(x as i32, y as i32)))
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bomb {
    pub owner: Option<PlayerId>,
    pub pixel: PixelPos,
    pub fuse_ms: u32,
    pub radius: u32,
}

impl Bomb {
    pub fn cell(&self, geometry: &Geometry) -> Pos {
        Pos::new(
            self.pixel.x.div_euclid(geometry.block_size),
            self.pixel.y.div_euclid(geometry.block_size),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub controller: Controller,
    pub cell: Pos,
    pub pixel: PixelPos,
    pub alive: bool,
    pub speed: u32,
    pub max_bombs: u32,
    pub bomb_range: u32,
    pub intent: Intent,
}

impl Player {
    /// Player standing centred on `cell`.
    pub fn at(name: &str, controller: Controller, cell: Pos, geometry: &Geometry) -> Self {
        Self {
            name: name.to_string(),
            controller,
            cell,
            pixel: centred_pixel(cell, geometry),
            alive: true,
            speed: 150,
            max_bombs: 1,
            bomb_range: 3,
            intent: Intent::NEUTRAL,
        }
    }

    pub fn is_autonomous(&self) -> bool {
        self.controller == Controller::Autonomous
    }
}

/// Top-left pixel of a footprint centred in `cell`.
pub fn centred_pixel(cell: Pos, geometry: &Geometry) -> PixelPos {
    let inset = (geometry.block_size - geometry.player_size) / 2;
    PixelPos::new(cell.x * geometry.block_size + inset, cell.y * geometry.block_size + inset)
}

/// Pixel origin of `cell`.
pub fn cell_origin(cell: Pos, geometry: &Geometry) -> PixelPos {
    PixelPos::new(cell.x * geometry.block_size, cell.y * geometry.block_size)
}

/// Point-in-time view of the arena used by the planners.
#[derive(Clone, Debug)]
pub struct Arena {
    pub grid: Grid,
    pub geometry: Geometry,
    pub players: SlotMap<PlayerId, Player>,
    pub bombs: Vec<Bomb>,
}

impl Arena {
    pub fn new(grid: Grid, geometry: Geometry) -> Self {
        Self { grid, geometry, players: SlotMap::with_key(), bombs: Vec::new() }
    }

    pub fn add_player(&mut self, player: Player) -> PlayerId {
        self.players.insert(player)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_named(&self, name: &str) -> Option<PlayerId> {
        self.players.iter().find(|(_, player)| player.name == name).map(|(id, _)| id)
    }

    /// Cells currently occupied by a live bomb.
    pub fn bomb_cells(&self) -> Vec<Pos> {
        self.bombs.iter().map(|bomb| bomb.cell(&self.geometry)).collect()
    }
}

/// Arena shared between the game loop and agent tasks.
#[derive(Clone, Debug)]
pub struct SharedArena {
    inner: Arc<RwLock<Arena>>,
}

impl SharedArena {
    pub fn new(arena: Arena) -> Self {
        Self { inner: Arc::new(RwLock::new(arena)) }
    }

    /// Copy of the current arena; `None` if the lock was poisoned.
    pub fn snapshot(&self) -> Option<Arena> {
        self.inner.read().ok().map(|arena| arena.clone())
    }

    pub fn read<R>(&self, f: impl FnOnce(&Arena) -> R) -> Option<R> {
        self.inner.read().ok().map(|arena| f(&arena))
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Arena) -> R) -> Option<R> {
        self.inner.write().ok().map(|mut arena| f(&mut arena))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_render_are_inverse() {
        let rows = ["..+#", "o*bB", "rsRS"];
        let grid = Grid::parse(&rows).expect("grid should parse");
        assert_eq!(grid.bounds(), (4, 3));
        assert_eq!(grid.classify(Pos::new(2, 0)), CellKind::Soft);
        assert_eq!(grid.classify(Pos::new(3, 1)), CellKind::BonusBomb);
        assert_eq!(grid.render(), rows.map(String::from).to_vec());
    }

    #[test]
    fn parse_rejects_ragged_and_unknown_rows() {
        assert_eq!(Grid::parse::<&str>(&[]), Err(GridParseError::Empty));
        assert_eq!(
            Grid::parse(&["...", ".."]),
            Err(GridParseError::RaggedRow { row: 1, expected: 3, found: 2 })
        );
        assert_eq!(
            Grid::parse(&["..x"]),
            Err(GridParseError::UnknownGlyph { row: 0, column: 2, glyph: 'x' })
        );
    }

    #[test]
    fn out_of_bounds_reads_as_solid() {
        let grid = Grid::new(3, 3, CellKind::Blank);
        assert_eq!(grid.classify(Pos::new(-1, 0)), CellKind::Solid);
        assert_eq!(grid.classify(Pos::new(0, 3)), CellKind::Solid);
        assert!(!grid.is_directly_passable(Pos::new(3, 0)));
        assert!(grid.is_directly_passable(Pos::new(2, 2)));
    }

    #[test]
    fn bomb_cell_is_derived_from_pixel_position() {
        let geometry = Geometry::default();
        let pixel = PixelPos::new(2 * 64 + 7, 3 * 64 + 7);
        let bomb = Bomb { owner: None, pixel, fuse_ms: 0, radius: 1 };
        assert_eq!(bomb.cell(&geometry), Pos::new(2, 3));
    }

    #[test]
    fn centred_player_footprint_sits_inside_its_cell() {
        let geometry = Geometry::default();
        let pixel = centred_pixel(Pos::new(1, 2), &geometry);
        assert_eq!(pixel, PixelPos::new(64 + 16, 128 + 16));
    }

    #[test]
    fn shared_arena_hands_out_independent_snapshots() {
        let arena = Arena::new(Grid::new(2, 2, CellKind::Blank), Geometry::default());
        let shared = SharedArena::new(arena);
        let snapshot = shared.snapshot().expect("snapshot");
        shared.write(|arena| arena.grid.set(Pos::new(0, 0), CellKind::Solid));
        assert_eq!(snapshot.grid.classify(Pos::new(0, 0)), CellKind::Blank);
        assert_eq!(
            shared.read(|arena| arena.grid.classify(Pos::new(0, 0))),
            Some(CellKind::Solid)
        );
    }
}
