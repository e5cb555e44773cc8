//! Multi-hit boss resolution.

use tracing::{debug, info};

use crate::config::CombatConfig;
use crate::entity::{EntityId, PlayerId};
use crate::event::{CombatEvent, SoundEffect};
use crate::world::World;

use super::Strike;

/// Resolves a boss whose hit count the caller has already incremented.
///
/// Below `threshold` the boss stays and only a [`CombatEvent::BossDamaged`]
/// is recorded. At or above it the boss is removed, `boss_points` go to
/// `player`, and the blast ledger is cleared. Removal guards the award: a
/// removed boss cannot be struck again.
pub(super) fn resolve_boss(
    world: &mut World,
    config: &CombatConfig,
    boss: EntityId,
    player: PlayerId,
    threshold: u32,
) -> Strike {
    let Some(hit_count) = world.arena.alien(boss).map(|a| a.hit_count) else {
        return Strike::Missing;
    };

    if hit_count < threshold {
        debug!(%boss, hit_count, threshold, "boss damaged");
        world.emit(CombatEvent::BossDamaged {
            boss,
            hit_count,
            threshold,
        });
        return Strike::BossDamaged;
    }

    let Some(entity) = world.arena.despawn(boss) else {
        return Strike::Missing;
    };
    world.ledger.clear();

    info!(%boss, %player, hit_count, "boss destroyed");
    world.emit(CombatEvent::sound(SoundEffect::BossDestroyed));
    world.emit(CombatEvent::DestructionAnimation {
        entity: boss,
        center: entity.rect().center(),
    });
    world.credit(player, config.scoring.boss_points);
    world.emit(CombatEvent::BossDestroyed { boss, by: player });
    Strike::BossDestroyed
}
