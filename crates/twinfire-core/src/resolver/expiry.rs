//! Expiry of timed states.

use tracing::trace;

use crate::config::CombatConfig;
use crate::entity::EntityInner;
use crate::world::World;

use super::Resolver;

/// Clears every timed status whose expiry tick has arrived.
///
/// Runs first so that every later stage of the tick sees a consistent view
/// of immunity, freeze, shields and disarm.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpiryResolver;

impl Resolver for ExpiryResolver {
    fn name(&self) -> &'static str {
        "expiry"
    }

    fn resolve(&self, world: &mut World, _config: &CombatConfig) {
        let now = world.tick();
        for entity in world.arena.entities_sorted_mut() {
            let id = entity.id();
            match entity.inner_mut() {
                EntityInner::Ship(ship) => {
                    let expired = ship.status.expire(now);
                    if !expired.is_empty() {
                        trace!(player = %ship.player, ?expired, "ship status expired");
                    }
                    if ship.effect_label.is_some_and(|label| now >= label.expires_at) {
                        ship.effect_label = None;
                    }
                }
                EntityInner::Alien(alien) => {
                    let expired = alien.status.expire(now);
                    if !expired.is_empty() {
                        trace!(alien = %id, ?expired, "alien status expired");
                    }
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::{EffectLabel, Facing, MysteryEffect};
    use crate::entity::{AlienComponents, PlayerId, ShipComponents, StatusFlags};
    use crate::geometry::Body;
    use glam::Vec2;

    #[test]
    fn expires_ship_and_alien_states() {
        let mut world = World::new(0, 3);
        let mut ship = ShipComponents::new(PlayerId::One, Vec2::ZERO, Vec2::ONE, Facing::Up);
        ship.status.apply(StatusFlags::IMMUNE, 0, Some(2));
        ship.effect_label = Some(EffectLabel {
            effect: MysteryEffect::Shield,
            expires_at: 2,
        });
        let ship_id = world.arena.spawn(EntityInner::Ship(ship));

        let mut alien = AlienComponents::regular(Body::new(Vec2::ZERO, Vec2::ONE));
        alien.status.apply(StatusFlags::FROZEN, 0, Some(3));
        let alien_id = world.arena.spawn(EntityInner::Alien(alien));

        let config = CombatConfig::default();
        world.arena.advance_tick();
        ExpiryResolver.resolve(&mut world, &config);
        assert!(world.arena.ship(ship_id).unwrap().status.contains(StatusFlags::IMMUNE));

        world.arena.advance_tick();
        ExpiryResolver.resolve(&mut world, &config);
        let ship = world.arena.ship(ship_id).unwrap();
        assert!(!ship.status.contains(StatusFlags::IMMUNE));
        assert!(ship.effect_label.is_none());
        assert!(world
            .arena
            .alien(alien_id)
            .unwrap()
            .status
            .contains(StatusFlags::FROZEN));

        world.arena.advance_tick();
        ExpiryResolver.resolve(&mut world, &config);
        assert!(!world
            .arena
            .alien(alien_id)
            .unwrap()
            .status
            .contains(StatusFlags::FROZEN));
    }
}
