//! Fleet and environment movement.

use tracing::trace;

use crate::config::CombatConfig;
use crate::entity::components::{ObstacleComponents, PickupComponents};
use crate::entity::{EntityId, EntityInner, StatusFlags};
use crate::world::World;

use super::Resolver;

/// Moves the alien fleet, obstacles and pickups.
///
/// Frozen aliens hold position. When any moving alien reaches a side edge
/// while heading outward, every moving alien reverses and drops by
/// `fleet_drop`. Obstacles and pickups drift and are removed once they have
/// fallen past the bottom edge or left the field sideways.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlienMotionResolver;

impl Resolver for AlienMotionResolver {
    fn name(&self) -> &'static str {
        "alien_motion"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        let field = &config.field;
        let mut edge_reached = false;
        let mut drifted_off: Vec<EntityId> = Vec::new();

        for entity in world.arena.entities_sorted_mut() {
            let id = entity.id();
            match entity.inner_mut() {
                EntityInner::Alien(alien) => {
                    if alien.status.contains(StatusFlags::FROZEN) {
                        continue;
                    }
                    alien.body.advance();
                    let rect = alien.body.rect();
                    let vx = alien.body.velocity.x;
                    if (vx > 0.0 && rect.right() >= field.width) || (vx < 0.0 && rect.left() <= 0.0)
                    {
                        edge_reached = true;
                    }
                }
                EntityInner::Obstacle(ObstacleComponents { body })
                | EntityInner::Pickup(PickupComponents { body, .. }) => {
                    body.advance();
                    let rect = body.rect();
                    if rect.top() >= field.height || rect.right() <= 0.0 || rect.left() >= field.width
                    {
                        drifted_off.push(id);
                    }
                }
                EntityInner::Ship(_) | EntityInner::Projectile(_) => {}
            }
        }

        if edge_reached {
            trace!("fleet reversing");
            for entity in world.arena.entities_sorted_mut() {
                if let Some(alien) = entity.as_alien_mut() {
                    if alien.status.contains(StatusFlags::FROZEN) {
                        continue;
                    }
                    alien.body.velocity.x = -alien.body.velocity.x;
                    alien.body.position.y += config.fleet.fleet_drop;
                }
            }
        }

        for id in drifted_off {
            world.arena.despawn(id);
        }
    }
}
