//! Resolution pipeline.
//!
//! A tick is a fixed sequence of resolvers. Each resolver reads the world as
//! earlier resolvers left it and mutates it in place, so a target destroyed by
//! one stage is simply absent for every later stage.
//!
//! # Stage Order
//!
//! 1. [`ExpiryResolver`]: expire timed statuses and effect labels
//! 2. [`EnemyVolleyResolver`]: one random eligible alien fires
//! 3. [`PickupResolver`]: ships collect power-ups
//! 4. [`ShieldResolver`]: shielded ships absorb one hostile hazard
//! 5. [`HostileFireResolver`]: enemy bullets move and hit ships
//! 6. [`WeaponMotionResolver`]: player projectiles move, lasers anchor
//! 7. [`DirectHitResolver`]: bullets and lasers hit aliens
//! 8. [`VersusResolver`]: player projectiles hit the opposing ship
//! 9. [`MissileResolver`]: missile contact, blast and countdown
//! 10. [`AlienMotionResolver`]: fleet, obstacle and pickup movement
//! 11. [`BreachResolver`]: aliens crossing the bottom edge
//! 12. [`ContactResolver`]: alien bodies and obstacles hit ships
//! 13. [`HousekeepingResolver`]: match-over detection
//!
//! # Invariants
//!
//! - Resolvers iterate entities in ID order and draw randomness only from the
//!   world RNG, so a tick is a pure function of world state and inputs
//! - Resolving against an entity that is already gone is a silent no-op

mod boss;
mod breach;
mod contact;
mod direct;
mod expiry;
mod hostile;
mod housekeeping;
mod missile;
mod motion;
mod pickup;
mod shield;
mod ship;
mod strike;
mod versus;
mod volley;
mod weapons;

pub use breach::BreachResolver;
pub use contact::ContactResolver;
pub use direct::DirectHitResolver;
pub use expiry::ExpiryResolver;
pub use hostile::HostileFireResolver;
pub use housekeeping::HousekeepingResolver;
pub use missile::MissileResolver;
pub use motion::AlienMotionResolver;
pub use pickup::PickupResolver;
pub use shield::ShieldResolver;
pub use versus::VersusResolver;
pub use volley::EnemyVolleyResolver;
pub use weapons::WeaponMotionResolver;

pub(crate) use pickup::{apply_effect, mystery_pool};
pub(crate) use ship::ship_hit;
pub(crate) use strike::{spawn_babies, strike_alien, Strike};
pub(crate) use weapons::laser_body;

use std::sync::Arc;

use crate::animation::BlastGeometry;
use crate::arena::Arena;
use crate::config::CombatConfig;
use crate::entity::components::{MissileState, ProjectileKind, Tick};
use crate::entity::{EntityId, EntityInner};
use crate::geometry::Rect;
use crate::world::World;

/// One stage of the tick pipeline.
///
/// # Example
///
/// ```
/// use twinfire_core::config::CombatConfig;
/// use twinfire_core::resolver::Resolver;
/// use twinfire_core::world::World;
///
/// struct Noop;
///
/// impl Resolver for Noop {
///     fn name(&self) -> &'static str {
///         "noop"
///     }
///
///     fn resolve(&self, _world: &mut World, _config: &CombatConfig) {}
/// }
///
/// let mut world = World::new(7, 3);
/// Noop.resolve(&mut world, &CombatConfig::default());
/// ```
pub trait Resolver: Send + Sync {
    /// Stage name used in trace output.
    fn name(&self) -> &'static str;

    /// Runs the stage against the world.
    ///
    /// # Invariants
    ///
    /// - Must be deterministic given the same world state and configuration
    /// - Must treat missing entities as already resolved
    fn resolve(&self, world: &mut World, config: &CombatConfig);
}

/// The full pipeline in tick order.
#[must_use]
pub fn default_pipeline(geometry: &Arc<dyn BlastGeometry>) -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(ExpiryResolver),
        Box::new(EnemyVolleyResolver),
        Box::new(PickupResolver),
        Box::new(ShieldResolver),
        Box::new(HostileFireResolver),
        Box::new(WeaponMotionResolver),
        Box::new(DirectHitResolver),
        Box::new(VersusResolver::new(Arc::clone(geometry))),
        Box::new(MissileResolver::new(Arc::clone(geometry))),
        Box::new(AlienMotionResolver),
        Box::new(BreachResolver),
        Box::new(ContactResolver),
        Box::new(HousekeepingResolver),
    ]
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Hazards that threaten ships from the alien side, in category order:
/// alien bodies, enemy bullets, obstacles.
pub(crate) fn hostile_hazards(arena: &Arena) -> Vec<(EntityId, Rect)> {
    let mut hazards = arena.collect_rects(crate::entity::Entity::is_alien);
    hazards.extend(arena.collect_rects(|e| {
        e.as_projectile()
            .is_some_and(|p| p.kind == ProjectileKind::EnemyBullet)
    }));
    hazards.extend(arena.collect_rects(|e| matches!(e.inner(), EntityInner::Obstacle(_))));
    hazards
}

/// Starts a missile's blast countdown and stops it in place.
///
/// # Returns
///
/// `false` if the missile is gone or already detonated.
pub(crate) fn detonate(world: &mut World, missile: EntityId, now: Tick, blast_ticks: u32) -> bool {
    let Some(projectile) = world.arena.projectile_mut(missile) else {
        return false;
    };
    let Some(state) = projectile.missile_mut() else {
        return false;
    };
    if state.detonated {
        return false;
    }
    *state = MissileState {
        detonated: true,
        detonated_at: Some(now),
        destroy_delay: blast_ticks,
    };
    projectile.body.velocity = glam::Vec2::ZERO;
    true
}

/// Blast frame of a detonated missile at `now`, if its blast is live.
///
/// Frames start at 1 on the tick after detonation.
pub(crate) fn blast_frame(state: &MissileState, now: Tick) -> Option<u32> {
    let at = state.detonated_at?;
    if !state.detonated || now <= at || state.destroy_delay == 0 {
        return None;
    }
    Some(u32::try_from(now - at).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ExpandingBlast;

    #[test]
    fn resolver_is_object_safe() {
        fn _accepts_boxed(_resolver: Box<dyn Resolver>) {}
        fn _accepts_slice(_resolvers: &[Box<dyn Resolver>]) {}
    }

    #[test]
    fn pipeline_order() {
        let geometry: Arc<dyn BlastGeometry> = Arc::new(ExpandingBlast::default());
        let names: Vec<_> = default_pipeline(&geometry).iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "expiry",
                "enemy_volley",
                "pickup",
                "shield",
                "hostile_fire",
                "weapon_motion",
                "direct_hit",
                "versus",
                "missile",
                "alien_motion",
                "breach",
                "contact",
                "housekeeping",
            ]
        );
    }

    #[test]
    fn blast_frames() {
        let state = MissileState {
            detonated: true,
            detonated_at: Some(10),
            destroy_delay: 3,
        };
        assert_eq!(blast_frame(&state, 10), None);
        assert_eq!(blast_frame(&state, 11), Some(1));
        assert_eq!(blast_frame(&state, 13), Some(3));
        assert_eq!(blast_frame(&MissileState::default(), 11), None);
    }
}
