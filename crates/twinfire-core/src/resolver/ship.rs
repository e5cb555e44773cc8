//! Unguarded hits on player ships.

use glam::Vec2;
use tracing::{debug, info};

use crate::config::{CombatConfig, GameMode};
use crate::entity::{EntityId, StatusFlags};
use crate::event::{CombatEvent, SoundEffect};
use crate::world::World;

/// Applies one unguarded hit to a ship.
///
/// The ship loses a health point (all of them in single-life mode). A ship
/// left with health is moved back to its spawn point and made immune; a ship
/// at zero health stops being alive and plays its explosion, but stays in the
/// arena.
pub(crate) fn ship_hit(world: &mut World, config: &CombatConfig, ship: EntityId) {
    let now = world.tick();
    let Some(player) = world.arena.ship(ship).map(|s| s.player) else {
        return;
    };

    let remaining = if config.mode == GameMode::SingleLife {
        world.scores.set_health(player, 0);
        0
    } else {
        world.scores.damage(player)
    };
    world.emit(CombatEvent::ShipHit { player });
    world.emit(CombatEvent::HealthRefresh);

    let Some(components) = world.arena.ship_mut(ship) else {
        return;
    };

    if remaining == 0 {
        components.status.clear(StatusFlags::ALIVE);
        components.status.clear(StatusFlags::SHIELDED);
        components
            .status
            .apply(StatusFlags::EXPLODING, now, Some(config.durations.explosion_ticks));
        components.body.velocity = Vec2::ZERO;
        let center = components.body.center();

        info!(%player, "ship destroyed");
        world.emit(CombatEvent::sound(SoundEffect::ShipExplosion));
        world.emit(CombatEvent::DestructionAnimation {
            entity: ship,
            center,
        });
        world.emit(CombatEvent::ShipDestroyed { player });
    } else {
        components.body.position = components.spawn_point;
        components
            .status
            .apply(StatusFlags::IMMUNE, now, Some(config.durations.immunity_ticks));

        debug!(%player, remaining, "ship hit");
        world.emit(CombatEvent::sound(SoundEffect::ShipHit));
    }
}
