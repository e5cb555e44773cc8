//! Scripted pilots for headless matches.
//!
//! Each ship chases the nearest target horizontally and fires when lined up.
//! In versus matches the target is the opposing ship; otherwise it is the
//! lowest alien, which is the one closest to breaching.

use glam::Vec2;
use twinfire_core::entity::{Entity, PlayerId, WeaponKind};
use twinfire_core::simulation::{FireOutcome, Simulation};
use twinfire_core::world::World;

/// Horizontal distance within which a pilot considers itself lined up.
const AIM_TOLERANCE: f32 = 12.0;

/// What a pilot does on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orders {
    /// Steering direction, zero to hold position
    pub steer: Vec2,
    /// Weapon to fire, if any
    pub fire: Option<WeaponKind>,
}

/// Aim-and-fire pilot for one player.
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    player: PlayerId,
}

impl Autopilot {
    /// Pilot for `player`.
    #[must_use]
    pub const fn new(player: PlayerId) -> Self {
        Self { player }
    }

    /// Chooses this tick's orders from the current world.
    #[must_use]
    pub fn plan(&self, sim: &Simulation) -> Orders {
        let world = sim.world();
        let idle = Orders {
            steer: Vec2::ZERO,
            fire: None,
        };
        let Some(ship) = world.ship(self.player) else {
            return idle;
        };
        if !ship.is_alive() {
            return idle;
        }
        let Some(target) = self.target_x(world, sim.config().mode.is_versus()) else {
            return idle;
        };

        let dx = target - ship.body.center().x;
        if dx.abs() > AIM_TOLERANCE {
            return Orders {
                steer: Vec2::new(dx.signum(), 0.0),
                fire: None,
            };
        }

        let weapon = if ship.kills >= sim.config().weapons.laser_kill_requirement {
            WeaponKind::Laser
        } else if Self::boss_present(world) {
            WeaponKind::Missile
        } else {
            WeaponKind::Bullet
        };
        Orders {
            steer: Vec2::ZERO,
            fire: Some(weapon),
        }
    }

    /// Plans and applies this tick's orders.
    ///
    /// # Returns
    ///
    /// The fire outcome, if the pilot tried to fire.
    pub fn drive(&self, sim: &mut Simulation) -> Option<FireOutcome> {
        let orders = self.plan(sim);
        if orders.steer != Vec2::ZERO {
            sim.steer(self.player, orders.steer);
        }
        orders.fire.map(|weapon| sim.fire(self.player, weapon))
    }

    fn target_x(&self, world: &World, versus: bool) -> Option<f32> {
        if versus {
            return world
                .ship(self.player.other())
                .filter(|s| s.is_alive())
                .map(|s| s.body.center().x);
        }
        world
            .arena()
            .entities_sorted()
            .filter_map(Entity::as_alien)
            .filter(|a| a.is_targetable())
            .max_by(|a, b| a.body.rect().bottom().total_cmp(&b.body.rect().bottom()))
            .map(|a| a.body.center().x)
    }

    fn boss_present(world: &World) -> bool {
        world
            .arena()
            .entities_sorted()
            .any(|e| e.as_alien().is_some_and(|a| a.is_boss()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twinfire_core::config::{CombatConfig, GameMode};

    #[test]
    fn steers_toward_lowest_alien() {
        let mut sim = Simulation::new(CombatConfig::default(), 1).unwrap();
        let ship_x = sim.world().ship(PlayerId::One).unwrap().body.center().x;
        sim.spawn_alien(Vec2::new(ship_x + 200.0, 300.0));
        sim.spawn_alien(Vec2::new(ship_x - 300.0, 100.0));

        let orders = Autopilot::new(PlayerId::One).plan(&sim);
        assert_eq!(orders.steer, Vec2::X);
        assert_eq!(orders.fire, None);
    }

    #[test]
    fn fires_when_lined_up() {
        let mut sim = Simulation::new(CombatConfig::default(), 1).unwrap();
        let center = sim.world().ship(PlayerId::One).unwrap().body.center();
        let size = sim.config().fleet.alien_size;
        sim.spawn_alien(Vec2::new(center.x - size.x * 0.5, 200.0));

        let pilot = Autopilot::new(PlayerId::One);
        assert_eq!(pilot.plan(&sim).fire, Some(WeaponKind::Bullet));
        assert!(matches!(pilot.drive(&mut sim), Some(FireOutcome::Fired(_))));
    }

    #[test]
    fn versus_pilot_aims_at_opponent() {
        let sim = Simulation::new(CombatConfig::for_mode(GameMode::Versus), 1).unwrap();
        let orders = Autopilot::new(PlayerId::Two).plan(&sim);
        assert_eq!(orders.fire, Some(WeaponKind::Bullet));
    }

    #[test]
    fn idle_without_targets() {
        let sim = Simulation::new(CombatConfig::default(), 1).unwrap();
        let orders = Autopilot::new(PlayerId::One).plan(&sim);
        assert_eq!(orders.steer, Vec2::ZERO);
        assert_eq!(orders.fire, None);
    }
}
