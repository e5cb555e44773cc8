//! Gate layer: state checks that can suppress an otherwise valid hit.
//!
//! Every resolver that damages a ship asks [`ship_gate`] first and handles the
//! three outcomes the same way:
//!
//! - [`Gate::Ignore`]: the hazard is left alone (no removal, no score, no
//!   health change).
//! - [`Gate::Shield`]: the hazard is absorbed by [`absorb`] and the hit is
//!   never forwarded.
//! - [`Gate::Open`]: the hit proceeds.
//!
//! Aliens are gated by immunity only; a frozen alien is still targetable.

use tracing::debug;

use crate::arena::Arena;
use crate::entity::{AlienComponents, EntityId, ShipComponents, StatusFlags};
use crate::event::{CombatEvent, SoundEffect};
use crate::geometry::Rect;
use crate::world::World;

/// Outcome of gating a ship against a hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Resolve the hit
    Open,
    /// Absorb the hazard with the shield
    Shield,
    /// Skip the hazard entirely
    Ignore,
}

/// Gates a ship.
///
/// A ship is ignored while it is down, immune, or has already spent a
/// shield this tick. A shielded ship absorbs; anything else is open.
#[must_use]
pub const fn ship_gate(ship: &ShipComponents) -> Gate {
    let status = &ship.status;
    if !status.contains(StatusFlags::ALIVE)
        || status.contains(StatusFlags::IMMUNE)
        || status.contains(StatusFlags::SHIELD_SPENT)
    {
        Gate::Ignore
    } else if status.contains(StatusFlags::SHIELDED) {
        Gate::Shield
    } else {
        Gate::Open
    }
}

/// Rectangles of every alien hazards may currently resolve against.
#[must_use]
pub fn targetable_aliens(arena: &Arena) -> Vec<(EntityId, Rect)> {
    arena.collect_rects(|e| e.as_alien().is_some_and(AlienComponents::is_targetable))
}

/// Consumes `ship`'s shield on `hazard`.
///
/// The hazard is removed unless it is a boss. The ship keeps
/// [`StatusFlags::SHIELD_SPENT`] until the next tick, so further hazards
/// overlapping it this tick are ignored.
pub fn absorb(world: &mut World, ship: EntityId, hazard: EntityId) {
    let now = world.tick();
    let Some(components) = world.arena.ship_mut(ship) else {
        return;
    };
    components.status.clear(StatusFlags::SHIELDED);
    components.status.apply(StatusFlags::SHIELD_SPENT, now, Some(1));
    let player = components.player;

    let boss = world.arena.alien(hazard).is_some_and(AlienComponents::is_boss);
    if !boss {
        world.arena.despawn(hazard);
        world.ledger.retire_hazard(hazard);
    }

    debug!(%player, %hazard, boss, "shield absorbed hazard");
    world.emit(CombatEvent::sound(SoundEffect::ShieldAbsorb));
    world.emit(CombatEvent::ShieldAbsorbed { player, hazard });
}
