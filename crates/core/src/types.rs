use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct PlayerId;
}

/// Grid coordinate. `x` grows to the right, `y` grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell reached by taking `action` from here. Non-directional actions stay put.
    pub fn step(self, action: Action) -> Pos {
        match action {
            Action::Up => Pos { x: self.x, y: self.y.saturating_sub(1) },
            Action::Down => Pos { x: self.x, y: self.y.saturating_add(1) },
            Action::Left => Pos { x: self.x.saturating_sub(1), y: self.y },
            Action::Right => Pos { x: self.x.saturating_add(1), y: self.y },
            Action::PlaceBomb | Action::Wait => self,
        }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }
}

/// Arena pixel position (top-left corner of an entity's footprint).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Blank,
    Soft,
    Solid,
    Hole,
    Blast,
    PenaltyBomb,
    PenaltyRange,
    PenaltySpeed,
    BonusBomb,
    BonusRange,
    BonusSpeed,
}

impl CellKind {
    pub fn is_penalty(self) -> bool {
        matches!(self, CellKind::PenaltyBomb | CellKind::PenaltyRange | CellKind::PenaltySpeed)
    }

    pub fn is_bonus(self) -> bool {
        matches!(self, CellKind::BonusBomb | CellKind::BonusRange | CellKind::BonusSpeed)
    }

    /// Walkable for ordinary movement.
    pub fn is_directly_passable(self) -> bool {
        !matches!(self, CellKind::Solid | CellKind::Soft | CellKind::Hole) && !self.is_penalty()
    }

    /// Walkable once soft blocks are assumed destroyed by a bomb.
    pub fn is_passable_through_soft(self) -> bool {
        self == CellKind::Soft || self.is_directly_passable()
    }

    pub fn glyph(self) -> char {
        match self {
            CellKind::Blank => '.',
            CellKind::Soft => '+',
            CellKind::Solid => '#',
            CellKind::Hole => 'o',
            CellKind::Blast => '*',
            CellKind::PenaltyBomb => 'b',
            CellKind::PenaltyRange => 'r',
            CellKind::PenaltySpeed => 's',
            CellKind::BonusBomb => 'B',
            CellKind::BonusRange => 'R',
            CellKind::BonusSpeed => 'S',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<CellKind> {
        let kind = match glyph {
            '.' => CellKind::Blank,
            '+' => CellKind::Soft,
            '#' => CellKind::Solid,
            'o' => CellKind::Hole,
            '*' => CellKind::Blast,
            'b' => CellKind::PenaltyBomb,
            'r' => CellKind::PenaltyRange,
            's' => CellKind::PenaltySpeed,
            'B' => CellKind::BonusBomb,
            'R' => CellKind::BonusRange,
            'S' => CellKind::BonusSpeed,
            _ => return None,
        };
        Some(kind)
    }
}

/// One discrete step of a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    PlaceBomb,
    Wait,
}

impl Action {
    pub const DIRECTIONS: [Action; 4] = [Action::Right, Action::Left, Action::Down, Action::Up];

    pub fn direction(self) -> Option<Direction> {
        match self {
            Action::Up => Some(Direction::Up),
            Action::Down => Some(Direction::Down),
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
            Action::PlaceBomb | Action::Wait => None,
        }
    }

    /// Opposite direction; non-directional actions have no inverse.
    pub fn inverse(self) -> Option<Action> {
        match self {
            Action::Up => Some(Action::Down),
            Action::Down => Some(Action::Up),
            Action::Left => Some(Action::Right),
            Action::Right => Some(Action::Left),
            Action::PlaceBomb | Action::Wait => None,
        }
    }

    /// Directional action that moves from `from` to the adjacent cell `to`.
    pub fn between(from: Pos, to: Pos) -> Option<Action> {
        match (to.x - from.x, to.y - from.y) {
            (1, 0) => Some(Action::Right),
            (-1, 0) => Some(Action::Left),
            (0, 1) => Some(Action::Down),
            (0, -1) => Some(Action::Up),
            _ => None,
        }
    }
}

pub type Plan = Vec<Action>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Input slot the executor writes and the physics tick reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub movement: Option<Direction>,
    pub bomb: bool,
}

impl Intent {
    pub const NEUTRAL: Intent = Intent { movement: None, bomb: false };

    pub fn moving(direction: Direction) -> Self {
        Self { movement: Some(direction), bomb: false }
    }

    pub fn placing_bomb() -> Self {
        Self { movement: None, bomb: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Autonomous,
}

/// Which opponents an enemy query considers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyScope {
    /// Every other live player.
    AllOpponents,
    /// Only human-controlled players.
    HumansOnly,
}

/// Terminal state of a single executed action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Arrived,
    /// Agent died or the destination became imminently dangerous.
    Aborted,
    StuckTimeout,
}
