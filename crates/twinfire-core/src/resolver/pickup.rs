//! Power-up collection and mystery effects.

use rand::seq::SliceRandom;
use tracing::debug;

use crate::config::{CombatConfig, GameMode};
use crate::entity::components::{EffectLabel, MysteryEffect, PickupKind, Tick};
use crate::entity::{EntityId, EntityInner, EntityTag, StatusFlags};
use crate::event::{CombatEvent, SoundEffect};
use crate::overlap::overlapping;
use crate::world::World;

use super::Resolver;

/// Live ships collect every pickup they overlap.
///
/// Health and weapon pickups are forwarded to their collaborators. A mystery
/// pickup applies one random effect from the pool allowed in the current
/// mode and labels the ship with the effect's name.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickupResolver;

impl Resolver for PickupResolver {
    fn name(&self) -> &'static str {
        "pickup"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        for ship_id in world.arena.ids_with_tag(EntityTag::Ship) {
            let Some(ship) = world.arena.ship(ship_id) else {
                continue;
            };
            if !ship.is_alive() {
                continue;
            }
            let player = ship.player;
            let rect = ship.body.rect();
            let pickups = world
                .arena
                .collect_rects(|e| matches!(e.inner(), EntityInner::Pickup(_)));

            for pickup in overlapping(&rect, &pickups) {
                let Some(kind) = world
                    .arena
                    .despawn(pickup)
                    .and_then(|e| e.inner().as_pickup().map(|p| p.kind))
                else {
                    continue;
                };
                world.emit(CombatEvent::PickupCollected { player, kind });

                match kind {
                    PickupKind::Health => {
                        world.scores.heal(player, config.ships.max_health);
                        world.emit(CombatEvent::sound(SoundEffect::PowerUp));
                        world.emit(CombatEvent::IncrementHealth { player });
                        world.emit(CombatEvent::HealthRefresh);
                    }
                    PickupKind::Weapon => {
                        world.emit(CombatEvent::sound(SoundEffect::PowerUp));
                        world.emit(CombatEvent::WeaponChange { player });
                    }
                    PickupKind::Mystery => {
                        let pool = mystery_pool(config.mode);
                        if let Some(&effect) = pool.choose(&mut world.rng) {
                            apply_effect(world, config, ship_id, effect);
                        }
                    }
                }
            }
        }
    }
}

/// Mystery effects available in `mode`.
///
/// Ammo refills only exist with limited ammunition, and freezing the fleet
/// is withheld in versus matches.
pub(crate) fn mystery_pool(mode: GameMode) -> Vec<MysteryEffect> {
    MysteryEffect::ALL
        .into_iter()
        .filter(|effect| match effect {
            MysteryEffect::AmmoRefill => mode == GameMode::LimitedAmmo,
            MysteryEffect::FreezeAliens => !mode.is_versus(),
            _ => true,
        })
        .collect()
}

/// Applies `effect` to the ship `ship_id` and labels it.
pub(crate) fn apply_effect(
    world: &mut World,
    config: &CombatConfig,
    ship_id: EntityId,
    effect: MysteryEffect,
) {
    let now = world.tick();
    let durations = &config.durations;
    let Some(ship) = world.arena.ship_mut(ship_id) else {
        return;
    };
    let player = ship.player;
    ship.effect_label = Some(EffectLabel {
        effect,
        expires_at: now + durations.effect_label_ticks,
    });

    let status = match effect {
        MysteryEffect::Shield => Some((StatusFlags::SHIELDED, durations.shield_ticks)),
        MysteryEffect::Invincibility => {
            Some((StatusFlags::IMMUNE, Some(durations.invincibility_ticks)))
        }
        MysteryEffect::Empower => Some((StatusFlags::EMPOWERED, Some(durations.empower_ticks))),
        MysteryEffect::ScaledWeapon => Some((
            StatusFlags::SCALED_WEAPON,
            Some(durations.scaled_weapon_ticks),
        )),
        MysteryEffect::Disarm => Some((StatusFlags::DISARMED, Some(durations.disarm_ticks))),
        MysteryEffect::ReverseControls => {
            Some((StatusFlags::REVERSED, Some(durations.reverse_ticks)))
        }
        MysteryEffect::AmmoRefill
        | MysteryEffect::FreezeAliens
        | MysteryEffect::BonusPoints
        | MysteryEffect::ScorePenalty => None,
    };
    if let Some((flag, duration)) = status {
        ship.status.apply(flag, now, duration);
    }
    if effect == MysteryEffect::AmmoRefill {
        ship.ammo = Some(config.weapons.starting_ammo);
    }

    match effect {
        MysteryEffect::AmmoRefill => world.emit(CombatEvent::AmmoRefresh { player }),
        MysteryEffect::FreezeAliens => freeze_aliens(world, now, durations.freeze_ticks),
        MysteryEffect::BonusPoints => world.credit(player, config.scoring.bonus_points),
        MysteryEffect::ScorePenalty => world.credit(player, -config.scoring.penalty_points),
        _ => {}
    }

    let sound = if effect == MysteryEffect::FreezeAliens {
        SoundEffect::Freeze
    } else if effect.is_penalty() {
        SoundEffect::PowerDown
    } else {
        SoundEffect::PowerUp
    };
    debug!(%player, ?effect, "mystery effect applied");
    world.emit(CombatEvent::sound(sound));
    world.emit(CombatEvent::ShowEffect { player, effect });
}

fn freeze_aliens(world: &mut World, now: Tick, ticks: Tick) {
    for entity in world.arena.entities_sorted_mut() {
        if let Some(alien) = entity.as_alien_mut() {
            alien.status.apply(StatusFlags::FROZEN, now, Some(ticks));
        }
    }
}
