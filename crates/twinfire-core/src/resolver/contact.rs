//! Body contact between ships and aliens or obstacles.

use tracing::debug;

use crate::config::CombatConfig;
use crate::entity::{AlienComponents, EntityInner, EntityTag};
use crate::event::CombatEvent;
use crate::gate::{absorb, ship_gate, Gate};
use crate::overlap::first_overlapping;
use crate::world::World;

use super::{ship_hit, Resolver};

/// Resolves ships touching alien bodies or obstacles.
///
/// An open ship takes a hit and the thing it touched is destroyed without
/// scoring, except a boss, which stays. A shielded ship absorbs the contact
/// instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactResolver;

impl Resolver for ContactResolver {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        for ship_id in world.arena.ids_with_tag(EntityTag::Ship) {
            let Some(ship) = world.arena.ship(ship_id) else {
                continue;
            };
            let gate = ship_gate(ship);
            if gate == Gate::Ignore {
                continue;
            }
            let rect = ship.body.rect();
            let bodies = world.arena.collect_rects(|e| {
                matches!(e.inner(), EntityInner::Alien(_) | EntityInner::Obstacle(_))
            });
            let Some(hazard) = first_overlapping(&rect, &bodies) else {
                continue;
            };

            if gate == Gate::Shield {
                absorb(world, ship_id, hazard);
                continue;
            }

            let is_boss = world.arena.alien(hazard).is_some_and(AlienComponents::is_boss);
            if !is_boss {
                if let Some(entity) = world.arena.despawn(hazard) {
                    world.ledger.retire_hazard(hazard);
                    if entity.is_alien() {
                        world.emit(CombatEvent::DestructionAnimation {
                            entity: hazard,
                            center: entity.rect().center(),
                        });
                        world.emit(CombatEvent::AlienDestroyed {
                            alien: hazard,
                            by: None,
                        });
                    }
                }
            }
            debug!(%ship_id, %hazard, is_boss, "ship collision");
            ship_hit(world, config, ship_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::{Facing, ObstacleComponents};
    use crate::entity::{PlayerId, ShipComponents, StatusFlags};
    use crate::geometry::Body;
    use glam::Vec2;

    fn setup() -> (World, crate::entity::EntityId) {
        let mut world = World::new(0, 3);
        let ship = world.arena.spawn(EntityInner::Ship(ShipComponents::new(
            PlayerId::One,
            Vec2::new(100.0, 700.0),
            Vec2::splat(40.0),
            Facing::Up,
        )));
        (world, ship)
    }

    #[test]
    fn alien_contact_costs_health_without_score() {
        let (mut world, _) = setup();
        let alien = world.arena.spawn(EntityInner::Alien(AlienComponents::regular(Body::new(
            Vec2::new(110.0, 690.0),
            Vec2::splat(30.0),
        ))));
        ContactResolver.resolve(&mut world, &CombatConfig::default());

        assert!(!world.arena.contains(alien));
        assert_eq!(world.scores.health(PlayerId::One), 2);
        assert_eq!(world.scores.score(PlayerId::One), 0);
        assert!(world.pending_events().contains(&CombatEvent::AlienDestroyed {
            alien,
            by: None
        }));
    }

    #[test]
    fn boss_contact_leaves_boss() {
        let (mut world, _) = setup();
        let boss = world.arena.spawn(EntityInner::Alien(AlienComponents::boss(
            Body::new(Vec2::new(80.0, 650.0), Vec2::splat(100.0)),
            10,
        )));
        ContactResolver.resolve(&mut world, &CombatConfig::default());
        assert!(world.arena.contains(boss));
        assert_eq!(world.scores.health(PlayerId::One), 2);
    }

    #[test]
    fn obstacle_contact_removes_obstacle() {
        let (mut world, _) = setup();
        let rock = world.arena.spawn(EntityInner::Obstacle(ObstacleComponents {
            body: Body::new(Vec2::new(120.0, 720.0), Vec2::splat(10.0)),
        }));
        ContactResolver.resolve(&mut world, &CombatConfig::default());
        assert!(!world.arena.contains(rock));
        assert_eq!(world.scores.health(PlayerId::One), 2);
    }

    #[test]
    fn immune_ship_passes_through() {
        let (mut world, ship) = setup();
        world
            .arena
            .ship_mut(ship)
            .unwrap()
            .status
            .apply(StatusFlags::IMMUNE, 0, Some(50));
        let alien = world.arena.spawn(EntityInner::Alien(AlienComponents::regular(Body::new(
            Vec2::new(110.0, 690.0),
            Vec2::splat(30.0),
        ))));
        ContactResolver.resolve(&mut world, &CombatConfig::default());
        assert!(world.arena.contains(alien));
        assert_eq!(world.scores.health(PlayerId::One), 3);
    }
}
