//! Per-match mutable state.
//!
//! Everything a resolver may mutate lives in one [`World`]: the entity arena,
//! the scoreboard, the blast ledger, the tick's event log and the match RNG.
//! Resolvers receive `&mut World` in turn; nothing else touches it while a
//! tick runs.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::arena::Arena;
use crate::entity::components::Tick;
use crate::entity::{EntityId, PlayerId, ShipComponents};
use crate::event::{CombatEvent, EventLog};
use crate::ledger::BlastLedger;
use crate::scoreboard::Scoreboard;

/// Mutable state of one match.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) arena: Arena,
    pub(crate) scores: Scoreboard,
    pub(crate) ledger: BlastLedger,
    pub(crate) events: EventLog,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) over: bool,
}

impl World {
    /// Empty world seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64, starting_health: u32) -> Self {
        Self {
            arena: Arena::new(),
            scores: Scoreboard::new(starting_health),
            ledger: BlastLedger::new(),
            events: EventLog::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            over: false,
        }
    }

    /// Entity arena.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Scoreboard.
    #[must_use]
    pub const fn scores(&self) -> &Scoreboard {
        &self.scores
    }

    /// Blast idempotency ledger.
    #[must_use]
    pub const fn ledger(&self) -> &BlastLedger {
        &self.ledger
    }

    /// Events recorded so far this tick.
    #[must_use]
    pub fn pending_events(&self) -> &[CombatEvent] {
        self.events.as_slice()
    }

    /// Returns `true` once the match-over event has been emitted.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.over
    }

    /// Current tick.
    #[must_use]
    pub const fn tick(&self) -> Tick {
        self.arena.current_tick()
    }

    /// Entity ID of `player`'s ship.
    #[must_use]
    pub fn ship_id(&self, player: PlayerId) -> Option<EntityId> {
        self.arena
            .entities_sorted()
            .find(|e| e.as_ship().is_some_and(|s| s.player == player))
            .map(crate::entity::Entity::id)
    }

    /// `player`'s ship.
    #[must_use]
    pub fn ship(&self, player: PlayerId) -> Option<&ShipComponents> {
        self.ship_id(player).and_then(|id| self.arena.ship(id))
    }

    /// Records an event.
    pub(crate) fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Adds `amount` to `player`'s score and requests both score redraws.
    pub(crate) fn credit(&mut self, player: PlayerId, amount: i64) {
        self.scores.credit(player, amount);
        self.emit(CombatEvent::ScoreCredited { player, amount });
        self.emit(CombatEvent::ScoreRefresh);
        self.emit(CombatEvent::HighScoreRefresh);
    }
}
