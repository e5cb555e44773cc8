//! Enemy projectile movement and resolution.

use tracing::trace;

use crate::config::CombatConfig;
use crate::entity::components::ProjectileKind;
use crate::entity::{Entity, EntityId, EntityTag};
use crate::gate::{absorb, ship_gate, Gate};
use crate::overlap::first_overlapping;
use crate::world::World;

use super::{ship_hit, Resolver};

fn is_enemy_bullet(entity: &Entity) -> bool {
    entity
        .as_projectile()
        .is_some_and(|p| p.kind == ProjectileKind::EnemyBullet)
}

/// Moves enemy bullets, culls those that left the field, and resolves the
/// rest against the ships.
///
/// A bullet that hits an open ship is consumed; a shielded ship absorbs it;
/// an immune or downed ship lets it pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostileFireResolver;

impl Resolver for HostileFireResolver {
    fn name(&self) -> &'static str {
        "hostile_fire"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        let mut culled: Vec<EntityId> = Vec::new();
        for entity in world.arena.entities_sorted_mut() {
            if !is_enemy_bullet(entity) {
                continue;
            }
            let id = entity.id();
            let body = entity.inner_mut().body_mut();
            body.advance();
            if config.field.is_outside(&body.rect()) {
                culled.push(id);
            }
        }
        for id in culled {
            trace!(bullet = %id, "enemy bullet left the field");
            world.arena.despawn(id);
        }

        for ship_id in world.arena.ids_with_tag(EntityTag::Ship) {
            let Some(ship) = world.arena.ship(ship_id) else {
                continue;
            };
            let gate = ship_gate(ship);
            if gate == Gate::Ignore {
                continue;
            }
            let rect = ship.body.rect();
            let bullets = world.arena.collect_rects(is_enemy_bullet);
            let Some(bullet) = first_overlapping(&rect, &bullets) else {
                continue;
            };
            match gate {
                Gate::Shield => absorb(world, ship_id, bullet),
                Gate::Open => {
                    world.arena.despawn(bullet);
                    ship_hit(world, config, ship_id);
                }
                Gate::Ignore => {}
            }
        }
    }
}
