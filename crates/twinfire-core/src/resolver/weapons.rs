//! Player projectile motion.

use glam::Vec2;
use tracing::trace;

use crate::config::CombatConfig;
use crate::entity::components::{Facing, ProjectileKind};
use crate::entity::{EntityId, EntityTag};
use crate::geometry::{Body, Field};
use crate::world::World;

use super::Resolver;

/// Beam body from `muzzle` to the field edge the ship faces.
#[must_use]
pub(crate) fn laser_body(muzzle: Vec2, facing: Facing, width: f32, field: &Field) -> Body {
    let x = muzzle.x - width * 0.5;
    match facing {
        Facing::Up => Body::new(Vec2::new(x, 0.0), Vec2::new(width, muzzle.y.max(0.0))),
        Facing::Down => Body::new(
            Vec2::new(x, muzzle.y),
            Vec2::new(width, (field.height - muzzle.y).max(0.0)),
        ),
    }
}

/// Moves bullets and undetonated missiles, keeps lasers anchored to their
/// ship, and culls player projectiles that are spent.
///
/// A detonated missile holds its position while the blast plays. A laser
/// ends when its timer runs out or its ship goes down.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeaponMotionResolver;

impl Resolver for WeaponMotionResolver {
    fn name(&self) -> &'static str {
        "weapon_motion"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        let now = world.tick();
        let mut spent: Vec<EntityId> = Vec::new();

        for id in world.arena.ids_with_tag(EntityTag::Projectile) {
            let Some(projectile) = world.arena.projectile(id) else {
                continue;
            };
            let Some(player) = projectile.player() else {
                continue;
            };
            let kind = projectile.kind;
            let width = projectile.body.size.x;

            match kind {
                ProjectileKind::Laser { expires_at } => {
                    let anchor = world
                        .ship(player)
                        .filter(|ship| ship.is_alive())
                        .map(|ship| (ship.muzzle(), ship.facing));
                    match anchor {
                        Some((muzzle, facing)) if now < expires_at => {
                            if let Some(beam) = world.arena.projectile_mut(id) {
                                beam.body = laser_body(muzzle, facing, width, &config.field);
                            }
                        }
                        _ => spent.push(id),
                    }
                }
                ProjectileKind::Missile(state) if state.detonated => {}
                ProjectileKind::Bullet | ProjectileKind::Missile(_) => {
                    if let Some(moving) = world.arena.projectile_mut(id) {
                        moving.body.advance();
                        if config.field.is_outside(&moving.body.rect()) {
                            spent.push(id);
                        }
                    }
                }
                ProjectileKind::EnemyBullet => {}
            }
        }

        for id in spent {
            trace!(projectile = %id, "player projectile spent");
            world.arena.despawn(id);
            world.ledger.retire_hazard(id);
        }
    }
}
