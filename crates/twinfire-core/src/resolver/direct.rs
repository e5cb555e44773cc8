//! Direct hits from bullets and lasers on aliens.

use std::collections::BTreeSet;

use tracing::trace;

use crate::config::CombatConfig;
use crate::entity::components::WeaponKind;
use crate::entity::{Entity, EntityId};
use crate::gate::targetable_aliens;
use crate::overlap::detect_overlaps;
use crate::world::World;

use super::strike::credit_kill;
use super::{strike_alien, Resolver, Strike};

fn is_direct_weapon(entity: &Entity) -> bool {
    entity.as_projectile().is_some_and(|p| {
        matches!(p.weapon(), Some(WeaponKind::Bullet | WeaponKind::Laser))
    })
}

/// Resolves player bullets and lasers against targetable aliens.
///
/// Overlaps are detected against a snapshot taken before any hit is
/// applied, then resolved in hazard ID order. Bullets are not consumed by a
/// hit; they keep flying until they leave the field.
///
/// A regular alien destroyed earlier in the pass may still overlap later
/// projectiles. With `credit_simultaneous_kills` set, the first later
/// projectile of each other weapon category is credited with the kill too,
/// so a bullet and a laser landing together pay both owners. The category
/// that destroyed the alien is never paid twice. The alien is removed and
/// split only once.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectHitResolver;

impl Resolver for DirectHitResolver {
    fn name(&self) -> &'static str {
        "direct_hit"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        let hazards = world.arena.collect_rects(is_direct_weapon);
        if hazards.is_empty() {
            return;
        }
        let targets = targetable_aliens(&world.arena);
        let hits = detect_overlaps(&hazards, &targets);

        let mut destroyed: BTreeSet<EntityId> = BTreeSet::new();
        let mut shared: BTreeSet<(EntityId, WeaponKind)> = BTreeSet::new();

        for (hazard, aliens) in hits {
            let Some((player, weapon)) = world
                .arena
                .projectile(hazard)
                .and_then(|p| Some((p.player()?, p.weapon()?)))
            else {
                continue;
            };

            for alien in aliens {
                if world.arena.contains(alien) {
                    if strike_alien(world, config, alien, player) == Strike::Destroyed {
                        destroyed.insert(alien);
                        shared.insert((alien, weapon));
                    }
                } else if destroyed.contains(&alien)
                    && config.scoring.credit_simultaneous_kills
                    && shared.insert((alien, weapon))
                {
                    trace!(%hazard, %alien, "simultaneous kill credited");
                    credit_kill(world, config, player);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::{Facing, Owner, ProjectileKind};
    use crate::entity::{
        AlienComponents, EntityInner, PlayerId, ProjectileComponents, ShipComponents,
        StatusFlags,
    };
    use crate::event::CombatEvent;
    use crate::geometry::Body;
    use glam::Vec2;

    fn setup() -> (World, CombatConfig) {
        let mut world = World::new(0, 3);
        for player in PlayerId::ALL {
            world.arena.spawn(EntityInner::Ship(ShipComponents::new(
                player,
                Vec2::new(0.0, 760.0),
                Vec2::splat(40.0),
                Facing::Up,
            )));
        }
        let mut config = CombatConfig::default();
        config.fleet.split_chance = 0.0;
        (world, config)
    }

    fn alien_at(world: &mut World, position: Vec2) -> EntityId {
        world
            .arena
            .spawn(EntityInner::Alien(AlienComponents::regular(Body::new(
                position,
                Vec2::splat(40.0),
            ))))
    }

    fn bullet_at(world: &mut World, player: PlayerId, position: Vec2) -> EntityId {
        world.arena.spawn(EntityInner::Projectile(ProjectileComponents {
            kind: ProjectileKind::Bullet,
            owner: Owner::Player(player),
            body: Body::new(position, Vec2::new(4.0, 10.0)),
        }))
    }

    fn kill_credits(world: &World) -> usize {
        world
            .pending_events()
            .iter()
            .filter(|e| matches!(e, CombatEvent::ScoreCredited { amount: 10, .. }))
            .count()
    }

    fn laser_at(world: &mut World, player: PlayerId, position: Vec2) -> EntityId {
        world.arena.spawn(EntityInner::Projectile(ProjectileComponents {
            kind: ProjectileKind::Laser { expires_at: 30 },
            owner: Owner::Player(player),
            body: Body::new(position, Vec2::new(12.0, 200.0)),
        }))
    }

    fn destroyed_events(world: &World) -> usize {
        world
            .pending_events()
            .iter()
            .filter(|e| matches!(e, CombatEvent::AlienDestroyed { .. }))
            .count()
    }

    #[test]
    fn bullet_destroys_alien_and_keeps_flying() {
        let (mut world, config) = setup();
        let alien = alien_at(&mut world, Vec2::new(100.0, 100.0));
        let bullet = bullet_at(&mut world, PlayerId::One, Vec2::new(110.0, 110.0));
        DirectHitResolver.resolve(&mut world, &config);

        assert!(!world.arena.contains(alien));
        assert!(world.arena.contains(bullet));
        assert_eq!(world.scores.score(PlayerId::One), 10);
    }

    #[test]
    fn two_bullets_from_one_player_pay_once() {
        let (mut world, config) = setup();
        alien_at(&mut world, Vec2::new(100.0, 100.0));
        bullet_at(&mut world, PlayerId::One, Vec2::new(105.0, 110.0));
        bullet_at(&mut world, PlayerId::One, Vec2::new(120.0, 110.0));
        DirectHitResolver.resolve(&mut world, &config);

        assert_eq!(kill_credits(&world), 1);
        assert_eq!(world.scores.score(PlayerId::One), 10);
        assert_eq!(world.ship(PlayerId::One).unwrap().kills, 1);
        assert_eq!(destroyed_events(&world), 1);
    }

    #[test]
    fn same_category_from_both_players_pays_the_killer_only() {
        let (mut world, config) = setup();
        alien_at(&mut world, Vec2::new(100.0, 100.0));
        bullet_at(&mut world, PlayerId::One, Vec2::new(105.0, 110.0));
        bullet_at(&mut world, PlayerId::Two, Vec2::new(120.0, 110.0));
        DirectHitResolver.resolve(&mut world, &config);

        assert_eq!(kill_credits(&world), 1);
        assert_eq!(world.scores.score(PlayerId::One), 10);
        assert_eq!(world.scores.score(PlayerId::Two), 0);
    }

    #[test]
    fn bullet_and_laser_both_credited() {
        let (mut world, config) = setup();
        alien_at(&mut world, Vec2::new(100.0, 100.0));
        bullet_at(&mut world, PlayerId::One, Vec2::new(105.0, 110.0));
        laser_at(&mut world, PlayerId::Two, Vec2::new(115.0, 0.0));
        DirectHitResolver.resolve(&mut world, &config);

        assert_eq!(kill_credits(&world), 2);
        assert_eq!(world.scores.score(PlayerId::One), 10);
        assert_eq!(world.scores.score(PlayerId::Two), 10);
        assert_eq!(destroyed_events(&world), 1);
    }

    #[test]
    fn third_projectile_is_not_credited() {
        let (mut world, config) = setup();
        alien_at(&mut world, Vec2::new(100.0, 100.0));
        bullet_at(&mut world, PlayerId::One, Vec2::new(102.0, 110.0));
        laser_at(&mut world, PlayerId::Two, Vec2::new(112.0, 0.0));
        laser_at(&mut world, PlayerId::Two, Vec2::new(122.0, 0.0));
        DirectHitResolver.resolve(&mut world, &config);
        assert_eq!(kill_credits(&world), 2);
    }

    #[test]
    fn simultaneous_credit_can_be_disabled() {
        let (mut world, mut config) = setup();
        config.scoring.credit_simultaneous_kills = false;
        alien_at(&mut world, Vec2::new(100.0, 100.0));
        bullet_at(&mut world, PlayerId::One, Vec2::new(105.0, 110.0));
        laser_at(&mut world, PlayerId::Two, Vec2::new(120.0, 0.0));
        DirectHitResolver.resolve(&mut world, &config);
        assert_eq!(kill_credits(&world), 1);
    }

    #[test]
    fn bullet_strikes_boss_once_per_pass() {
        let (mut world, config) = setup();
        let boss = world.arena.spawn(EntityInner::Alien(AlienComponents::boss(
            Body::new(Vec2::new(100.0, 100.0), Vec2::new(160.0, 120.0)),
            10,
        )));
        let bullet = bullet_at(&mut world, PlayerId::One, Vec2::new(150.0, 150.0));

        DirectHitResolver.resolve(&mut world, &config);
        assert_eq!(world.arena.alien(boss).unwrap().hit_count, 1);

        DirectHitResolver.resolve(&mut world, &config);
        assert_eq!(world.arena.alien(boss).unwrap().hit_count, 2);
        assert!(world.arena.contains(bullet));
        assert_eq!(world.scores.score(PlayerId::One), 0);
    }

    #[test]
    fn immune_alien_is_untouched() {
        let (mut world, config) = setup();
        let alien = alien_at(&mut world, Vec2::new(100.0, 100.0));
        world
            .arena
            .alien_mut(alien)
            .unwrap()
            .status
            .insert(StatusFlags::IMMUNE);
        bullet_at(&mut world, PlayerId::One, Vec2::new(110.0, 110.0));
        DirectHitResolver.resolve(&mut world, &config);

        assert!(world.arena.contains(alien));
        assert_eq!(world.arena.alien(alien).unwrap().hit_count, 0);
        assert!(world.pending_events().is_empty());
    }

    #[test]
    fn frozen_alien_is_still_hit() {
        let (mut world, config) = setup();
        let alien = alien_at(&mut world, Vec2::new(100.0, 100.0));
        world
            .arena
            .alien_mut(alien)
            .unwrap()
            .status
            .insert(StatusFlags::FROZEN);
        bullet_at(&mut world, PlayerId::One, Vec2::new(110.0, 110.0));
        DirectHitResolver.resolve(&mut world, &config);
        assert!(!world.arena.contains(alien));
    }
}
