//! Enemy volleys.

use glam::Vec2;
use rand::seq::SliceRandom;
use tracing::trace;

use crate::config::CombatConfig;
use crate::entity::components::{Owner, ProjectileKind};
use crate::entity::{EntityId, EntityInner, ProjectileComponents, StatusFlags};
use crate::event::{CombatEvent, SoundEffect};
use crate::geometry::Body;
use crate::world::World;

use super::Resolver;

/// Every `enemy_fire_interval` ticks, one random eligible alien fires.
///
/// An alien is eligible when it is not frozen and its own cooldown has
/// elapsed. With no eligible alien the volley is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnemyVolleyResolver;

impl Resolver for EnemyVolleyResolver {
    fn name(&self) -> &'static str {
        "enemy_volley"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        let now = world.tick();
        let fleet = &config.fleet;
        if now == 0 || now % fleet.enemy_fire_interval != 0 {
            return;
        }

        let candidates: Vec<EntityId> = world
            .arena
            .entities_sorted()
            .filter_map(|e| {
                let alien = e.as_alien()?;
                let rested = alien
                    .last_bullet_time
                    .map_or(true, |last| now.saturating_sub(last) >= fleet.alien_fire_cooldown);
                (rested && !alien.status.contains(StatusFlags::FROZEN)).then(|| e.id())
            })
            .collect();

        let Some(&shooter) = candidates.choose(&mut world.rng) else {
            trace!("no eligible shooter");
            return;
        };
        let Some(alien) = world.arena.alien_mut(shooter) else {
            return;
        };
        alien.last_bullet_time = Some(now);
        let rect = alien.body.rect();

        let muzzle = Vec2::new(rect.center().x, rect.bottom());
        let bullet = world.arena.spawn(EntityInner::Projectile(ProjectileComponents {
            kind: ProjectileKind::EnemyBullet,
            owner: Owner::Alien(shooter),
            body: Body::centered(
                muzzle,
                fleet.enemy_bullet_size,
                Vec2::new(0.0, fleet.enemy_bullet_speed),
            ),
        }));

        trace!(%shooter, %bullet, "enemy fired");
        world.emit(CombatEvent::sound(SoundEffect::EnemyFire));
        world.emit(CombatEvent::EnemyFired {
            alien: shooter,
            bullet,
        });
    }
}
