//! Player-versus-player hits.

use std::sync::Arc;

use tracing::debug;

use crate::animation::BlastGeometry;
use crate::config::CombatConfig;
use crate::entity::components::ProjectileKind;
use crate::entity::{EntityId, EntityTag, PlayerId};
use crate::event::{CombatEvent, SoundEffect};
use crate::gate::{absorb, ship_gate, Gate};
use crate::geometry::Rect;
use crate::world::World;

use super::{blast_frame, detonate, ship_hit, Resolver};

/// Resolves each player's projectiles against the opposing ship.
///
/// Only active in versus mode. A bullet is consumed by the hit, a missile
/// detonates on it, a laser persists. Blasts of the opponent's detonated
/// missiles damage a ship at most once per missile, tracked in the blast
/// ledger. Every landed hit credits `pvp_hit_points` to the shooter.
pub struct VersusResolver {
    geometry: Arc<dyn BlastGeometry>,
}

impl VersusResolver {
    /// Creates the resolver with the blast geometry used for missiles.
    #[must_use]
    pub fn new(geometry: Arc<dyn BlastGeometry>) -> Self {
        Self { geometry }
    }

    fn land_hit(world: &mut World, config: &CombatConfig, ship: EntityId, shooter: PlayerId) {
        ship_hit(world, config, ship);
        world.credit(shooter, config.scoring.pvp_hit_points);
        world.emit(CombatEvent::sound(SoundEffect::Impact));
    }

    fn direct_hits(world: &mut World, config: &CombatConfig, ship: EntityId, rect: Rect) {
        let Some(target) = world.arena.ship(ship).map(|s| s.player) else {
            return;
        };
        let shooter = target.other();
        let incoming = world.arena.collect_rects(|e| {
            e.as_projectile().is_some_and(|p| {
                p.player() == Some(shooter) && p.missile().map_or(true, |m| !m.detonated)
            })
        });

        for (hazard, hazard_rect) in incoming {
            if !rect.intersects(&hazard_rect) {
                continue;
            }
            let Some(gate) = world.arena.ship(ship).map(ship_gate) else {
                return;
            };
            let Some(kind) = world.arena.projectile(hazard).map(|p| p.kind) else {
                continue;
            };
            match gate {
                Gate::Ignore => return,
                Gate::Shield => {
                    absorb(world, ship, hazard);
                    continue;
                }
                Gate::Open => {}
            }

            match kind {
                ProjectileKind::Bullet => {
                    world.arena.despawn(hazard);
                }
                ProjectileKind::Missile(_) => {
                    let now = world.tick();
                    if detonate(world, hazard, now, config.durations.blast_ticks) {
                        world.ledger.mark(hazard, ship);
                        world.emit(CombatEvent::MissileDetonated {
                            missile: hazard,
                            player: shooter,
                        });
                    }
                }
                ProjectileKind::Laser { .. } | ProjectileKind::EnemyBullet => {}
            }
            debug!(%shooter, %target, %hazard, "direct versus hit");
            Self::land_hit(world, config, ship, shooter);
        }
    }

    fn blast_hits(&self, world: &mut World, config: &CombatConfig, ship: EntityId) {
        let now = world.tick();
        let Some((target, rect)) = world.arena.ship(ship).map(|s| (s.player, s.body.rect())) else {
            return;
        };
        let shooter = target.other();

        let blasts: Vec<(EntityId, Rect)> = world
            .arena
            .entities_sorted()
            .filter_map(|e| {
                let projectile = e.as_projectile()?;
                if projectile.player() != Some(shooter) {
                    return None;
                }
                let frame = blast_frame(projectile.missile()?, now)?;
                Some((e.id(), self.geometry.blast_rect(projectile.body.center(), frame)))
            })
            .collect();

        for (missile, blast) in blasts {
            if !blast.intersects(&rect) || world.ledger.contains(missile, ship) {
                continue;
            }
            let Some(gate) = world.arena.ship(ship).map(ship_gate) else {
                return;
            };
            match gate {
                Gate::Ignore => return,
                Gate::Shield => absorb(world, ship, missile),
                Gate::Open => {
                    world.ledger.mark(missile, ship);
                    debug!(%shooter, %target, %missile, "blast versus hit");
                    Self::land_hit(world, config, ship, shooter);
                }
            }
        }
    }
}

impl Resolver for VersusResolver {
    fn name(&self) -> &'static str {
        "versus"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        if !config.mode.is_versus() {
            return;
        }
        for ship in world.arena.ids_with_tag(EntityTag::Ship) {
            let Some(rect) = world.arena.ship(ship).map(|s| s.body.rect()) else {
                continue;
            };
            Self::direct_hits(world, config, ship, rect);
            self.blast_hits(world, config, ship);
        }
    }
}
