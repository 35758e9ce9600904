//! The executor's view of the agent it drives.

use crate::state::SharedArena;
use crate::types::{Intent, PixelPos, PlayerId, Pos};

/// Live agent state the executor polls, plus the single intent slot it writes.
/// `None` means the agent is no longer present.
pub trait AgentBody: Send + Sync {
    fn cell(&self) -> Option<Pos>;
    fn pixel(&self) -> Option<PixelPos>;
    fn is_alive(&self) -> bool;
    fn set_intent(&self, intent: Intent);
}

/// Agent backed by the shared arena. Each call takes the lock for exactly one
/// read or write.
#[derive(Clone, Debug)]
pub struct LiveAgent {
    arena: SharedArena,
    id: PlayerId,
}

impl LiveAgent {
    pub fn new(arena: SharedArena, id: PlayerId) -> Self {
        Self { arena, id }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }
}

impl AgentBody for LiveAgent {
    fn cell(&self) -> Option<Pos> {
        self.arena.read(|arena| arena.player(self.id).map(|player| player.cell)).flatten()
    }

    fn pixel(&self) -> Option<PixelPos> {
        self.arena.read(|arena| arena.player(self.id).map(|player| player.pixel)).flatten()
    }

    fn is_alive(&self) -> bool {
        self.arena.read(|arena| arena.player(self.id).is_some_and(|p| p.alive)).unwrap_or(false)
    }

    fn set_intent(&self, intent: Intent) {
        self.arena.write(|arena| {
            if let Some(player) = arena.players.get_mut(self.id) {
                player.intent = intent;
            }
        });
    }
}
