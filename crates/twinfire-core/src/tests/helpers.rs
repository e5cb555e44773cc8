//! Test helper functions for setting up matches and placing entities.
//!
//! The quiet configuration switches off everything that would move or fire
//! on its own (fleet drift, enemy volleys, splitting) so a scenario only
//! contains what the test placed.

use glam::Vec2;

use crate::config::{CombatConfig, Difficulty, GameMode};
use crate::entity::{EntityId, PlayerId, StatusFlags};
use crate::event::CombatEvent;
use crate::simulation::Simulation;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for `mode` with no autonomous motion, fire or splitting.
///
/// Bosses get exactly `boss.base_hp` hit points (easy difficulty, level one).
pub fn quiet_config(mode: GameMode) -> CombatConfig {
    let mut config = CombatConfig::for_mode(mode);
    config.difficulty = Difficulty::Easy;
    config.fleet.alien_speed = 0.0;
    config.fleet.split_chance = 0.0;
    config.fleet.enemy_fire_interval = u64::MAX;
    config.boss.speed = 0.0;
    config
}

/// Quiet match in `mode`.
///
/// # Panics
///
/// Panics if the quiet configuration fails validation.
pub fn quiet_sim(mode: GameMode) -> Simulation {
    Simulation::new(quiet_config(mode), 1).expect("quiet config is valid")
}

// =============================================================================
// Placement
// =============================================================================

/// Center of `player`'s ship.
///
/// # Panics
///
/// Panics if the ship does not exist.
pub fn ship_center(sim: &Simulation, player: PlayerId) -> Vec2 {
    sim.world()
        .ship(player)
        .expect("ship exists")
        .body
        .center()
}

/// Spawns a regular alien centered on `center`.
pub fn alien_at(sim: &mut Simulation, center: Vec2) -> EntityId {
    let size = sim.config().fleet.alien_size;
    sim.spawn_alien(center - size * 0.5)
}

/// Spawns a regular alien straight above `player`'s muzzle, `distance`
/// units away.
pub fn alien_above(sim: &mut Simulation, player: PlayerId, distance: f32) -> EntityId {
    let center = ship_center(sim, player);
    alien_at(sim, center - Vec2::new(0.0, distance))
}

/// Sets `flag` on `player`'s ship with no expiry.
///
/// # Panics
///
/// Panics if the ship does not exist.
pub fn set_ship_flag(sim: &mut Simulation, player: PlayerId, flag: StatusFlags) {
    let id = sim.world().ship_id(player).expect("ship exists");
    sim.world_mut()
        .arena
        .ship_mut(id)
        .expect("ship exists")
        .status
        .insert(flag);
}

/// Sets `flag` on an alien with no expiry.
///
/// # Panics
///
/// Panics if the alien does not exist.
pub fn set_alien_flag(sim: &mut Simulation, alien: EntityId, flag: StatusFlags) {
    sim.world_mut()
        .arena
        .alien_mut(alien)
        .expect("alien exists")
        .status
        .insert(flag);
}

// =============================================================================
// Running
// =============================================================================

/// Steps `ticks` times and returns every event produced.
pub fn run(sim: &mut Simulation, ticks: u64) -> Vec<CombatEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(sim.step());
    }
    events
}

/// Number of events matching `pred`.
pub fn count<F>(events: &[CombatEvent], pred: F) -> usize
where
    F: Fn(&CombatEvent) -> bool,
{
    events.iter().filter(|e| pred(e)).count()
}
