//! Resolution of one qualifying hit on an alien.

use glam::Vec2;
use rand::Rng;
use tracing::debug;

use crate::config::{CombatConfig, GameMode};
use crate::entity::{AlienComponents, AlienKind, EntityId, EntityInner, PlayerId, StatusFlags};
use crate::event::{CombatEvent, SoundEffect};
use crate::geometry::Body;
use crate::world::World;

use super::boss;

/// What a strike did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strike {
    /// The target was already gone
    Missing,
    /// A regular alien was destroyed
    Destroyed,
    /// A boss took the hit and survived
    BossDamaged,
    /// A boss reached its threshold and was destroyed
    BossDestroyed,
}

/// Applies one qualifying hit from `player` to `alien`.
///
/// The hit count always increments. Bosses are routed to the boss resolver;
/// a regular alien is destroyed, scored, split and removed.
pub(crate) fn strike_alien(
    world: &mut World,
    config: &CombatConfig,
    alien: EntityId,
    player: PlayerId,
) -> Strike {
    let Some(components) = world.arena.alien_mut(alien) else {
        return Strike::Missing;
    };
    components.hit_count += 1;
    let kind = components.kind;

    match kind {
        AlienKind::Boss { threshold } => boss::resolve_boss(world, config, alien, player, threshold),
        AlienKind::Regular => {
            destroy_regular(world, config, alien, player);
            Strike::Destroyed
        }
    }
}

/// Credits a regular kill to `player`: hit sound, score, kill counter.
pub(crate) fn credit_kill(world: &mut World, config: &CombatConfig, player: PlayerId) {
    world.emit(CombatEvent::sound(SoundEffect::AlienHit));
    world.credit(player, config.scoring.alien_points);
    if let Some(ship) = world
        .ship_id(player)
        .and_then(|id| world.arena.ship_mut(id))
    {
        ship.kills += 1;
    }
}

fn destroy_regular(world: &mut World, config: &CombatConfig, alien: EntityId, player: PlayerId) {
    let Some(entity) = world.arena.despawn(alien) else {
        return;
    };
    let EntityInner::Alien(parent) = entity.inner() else {
        return;
    };

    credit_kill(world, config, player);
    world.emit(CombatEvent::AlienDestroyed {
        alien,
        by: Some(player),
    });
    world.emit(CombatEvent::DestructionAnimation {
        entity: alien,
        center: parent.body.center(),
    });

    let children = spawn_babies(world, config, parent);
    if !children.is_empty() {
        debug!(%alien, children = children.len(), "alien split");
        world.emit(CombatEvent::AlienSplit {
            parent: alien,
            children,
        });
    }
}

/// Rolls the split chance for a destroyed alien and spawns its babies.
///
/// Babies, bosses and single-life matches never split. Every other alien
/// draws once from the match RNG, and on success spawns between one and
/// `max_split_children` babies side by side around its center.
pub(crate) fn spawn_babies(
    world: &mut World,
    config: &CombatConfig,
    parent: &AlienComponents,
) -> Vec<EntityId> {
    if parent.is_baby || parent.is_boss() || config.mode == GameMode::SingleLife {
        return Vec::new();
    }
    if !world.rng.gen_bool(config.fleet.split_chance) {
        return Vec::new();
    }

    let count = world.rng.gen_range(1..=config.fleet.max_split_children);
    let size = parent.body.size * config.fleet.baby_scale;
    let center = parent.body.center();
    let now = world.tick();

    #[allow(clippy::cast_precision_loss)]
    let half_span = (count - 1) as f32 * 0.5;
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let offset = Vec2::new((i as f32 - half_span) * size.x, 0.0);
            let mut baby = AlienComponents::regular(Body::centered(
                center + offset,
                size,
                parent.body.velocity,
            ));
            baby.is_baby = true;
            if config.durations.baby_immunity_ticks > 0 {
                baby.status.apply(
                    StatusFlags::IMMUNE,
                    now,
                    Some(config.durations.baby_immunity_ticks),
                );
            }
            world.arena.spawn(EntityInner::Alien(baby))
        })
        .collect()
}
