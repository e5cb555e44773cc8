//! Match driver.
//!
//! [`Simulation`] owns the configuration snapshot, the [`World`] and the
//! resolver pipeline. Between ticks it accepts player input (firing,
//! steering, manual detonation) and spawn requests; [`Simulation::step`] runs
//! one tick and returns the events it produced.
//!
//! # Determinism
//!
//! Given the same configuration, seed and sequence of calls, a match produces
//! identical event streams across runs and platforms:
//! - Entities are iterated in ID order (via `BTreeMap`)
//! - Every random draw comes from the single match RNG
//! - Saving and restoring carries the RNG position along
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use twinfire_core::config::CombatConfig;
//! use twinfire_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(CombatConfig::default(), 7)?;
//! let alien = sim.spawn_alien(Vec2::new(100.0, 100.0));
//!
//! for _ in 0..10 {
//!     sim.step();
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! assert!(sim.world().arena().contains(alien));
//! # Ok::<(), twinfire_core::config::ConfigError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use tracing::{debug, info, trace};

use crate::animation::{BlastGeometry, ExpandingBlast};
use crate::config::{CombatConfig, ConfigError, GameMode};
use crate::entity::components::{
    Facing, MissileState, Owner, PickupComponents, PickupKind, ProjectileKind,
};
use crate::entity::{
    AlienComponents, EntityId, EntityInner, EntityTag, ObstacleComponents, PlayerId,
    ProjectileComponents, ShipComponents, StatusFlags, Tick, WeaponKind,
};
use crate::event::{CombatEvent, SoundEffect};
use crate::geometry::Body;
use crate::resolver::{default_pipeline, detonate, laser_body, Resolver};
use crate::scoreboard::Scoreboard;
use crate::snapshot::{LoadError, MatchSnapshot, SaveError};
use crate::world::World;

/// Side length of a pickup.
pub const PICKUP_SIZE: f32 = 24.0;

/// Gap between a ship and the field edge it spawns against.
const SPAWN_MARGIN: f32 = 10.0;

/// Top of the first fleet row.
const FLEET_TOP: f32 = 60.0;

// =============================================================================
// Fire Outcome
// =============================================================================

/// Result of a fire request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A projectile was spawned
    Fired(EntityId),
    /// The ship is down
    ShipDown,
    /// The ship is disarmed
    Disarmed,
    /// The weapon's cooldown has not elapsed
    CoolingDown,
    /// No ammunition left
    OutOfAmmo,
    /// Not enough kills for the laser
    LaserLocked,
}

// =============================================================================
// Simulation
// =============================================================================

/// A running match.
///
/// `Simulation` manages:
/// - The immutable [`CombatConfig`] captured at creation
/// - The mutable [`World`] the resolvers work on
/// - The resolver pipeline, run in order once per tick
/// - The blast geometry shared by the missile-aware stages
pub struct Simulation {
    world: World,
    config: CombatConfig,
    geometry: Arc<dyn BlastGeometry>,
    resolvers: Vec<Box<dyn Resolver>>,
    seed: u64,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("config", &self.config)
            .field("resolvers", &format!("[{} resolvers]", self.resolvers.len()))
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a match with both ships spawned.
    ///
    /// In versus mode player two starts at the top of the field facing down;
    /// otherwise both ships start at the bottom facing up. Limited-ammo
    /// matches hand each ship `starting_ammo` rounds.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration snapshot for the whole match
    /// * `seed` - Seed of the match RNG
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by [`CombatConfig::validate`].
    pub fn new(config: CombatConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut world = World::new(seed, config.ships.starting_health);
        for player in PlayerId::ALL {
            let ship = Self::ship_for(&config, player);
            world.arena.spawn(EntityInner::Ship(ship));
        }

        let geometry: Arc<dyn BlastGeometry> = Arc::new(ExpandingBlast::from_config(&config.blast));
        info!(seed, mode = ?config.mode, difficulty = ?config.difficulty, "match created");
        Ok(Self {
            world,
            resolvers: default_pipeline(&geometry),
            geometry,
            config,
            seed,
        })
    }

    fn ship_for(config: &CombatConfig, player: PlayerId) -> ShipComponents {
        let field = &config.field;
        let size = config.ships.size;
        let bottom = field.height - size.y - SPAWN_MARGIN;

        let (x_fraction, y, facing) = match (config.mode, player) {
            (GameMode::Versus, PlayerId::One) => (0.5, bottom, Facing::Up),
            (GameMode::Versus, PlayerId::Two) => (0.5, SPAWN_MARGIN, Facing::Down),
            (_, PlayerId::One) => (1.0 / 3.0, bottom, Facing::Up),
            (_, PlayerId::Two) => (2.0 / 3.0, bottom, Facing::Up),
        };
        let spawn = Vec2::new(field.width * x_fraction - size.x * 0.5, y);

        let mut ship = ShipComponents::new(player, spawn, size, facing);
        if config.mode == GameMode::LimitedAmmo {
            ship.ammo = Some(config.weapons.starting_ammo);
        }
        ship
    }

    /// Replaces the blast geometry and rebuilds the default pipeline with it.
    #[must_use]
    pub fn with_blast_geometry(mut self, geometry: Arc<dyn BlastGeometry>) -> Self {
        self.resolvers = default_pipeline(&geometry);
        self.geometry = geometry;
        self
    }

    /// Runs one tick and returns everything it produced.
    ///
    /// Events recorded by input calls since the previous step come first,
    /// followed by each stage's events in pipeline order.
    pub fn step(&mut self) -> Vec<CombatEvent> {
        let tick = self.world.tick();
        for resolver in &self.resolvers {
            trace!(tick, stage = resolver.name(), "resolving");
            resolver.resolve(&mut self.world, &self.config);
        }
        self.world.arena.advance_tick();
        self.world.events.take()
    }

    // =========================================================================
    // Player input
    // =========================================================================

    /// Fires `weapon` from `player`'s ship.
    ///
    /// Empowered ships cool down twice as fast. A laser needs
    /// `laser_kill_requirement` kills and spends them. Scaled-weapon ships
    /// fire projectiles enlarged by `scaled_weapon_factor`.
    pub fn fire(&mut self, player: PlayerId, weapon: WeaponKind) -> FireOutcome {
        let now = self.world.tick();
        let weapons = &self.config.weapons;
        let Some(ship) = self
            .world
            .ship_id(player)
            .and_then(|id| self.world.arena.ship_mut(id))
        else {
            return FireOutcome::ShipDown;
        };

        if !ship.is_alive() {
            return FireOutcome::ShipDown;
        }
        if ship.status.contains(StatusFlags::DISARMED) {
            return FireOutcome::Disarmed;
        }
        let mut cooldown = weapons.cooldown(weapon);
        if ship.status.contains(StatusFlags::EMPOWERED) {
            cooldown = (cooldown / 2).max(1);
        }
        if ship
            .last_fire_tick
            .is_some_and(|last| now < last + cooldown)
        {
            return FireOutcome::CoolingDown;
        }
        if ship.ammo == Some(0) {
            return FireOutcome::OutOfAmmo;
        }
        if weapon == WeaponKind::Laser && ship.kills < weapons.laser_kill_requirement {
            return FireOutcome::LaserLocked;
        }

        ship.last_fire_tick = Some(now);
        if weapon == WeaponKind::Laser {
            ship.kills = 0;
        }
        let tracked = if let Some(ammo) = ship.ammo.as_mut() {
            *ammo -= 1;
            true
        } else {
            false
        };
        let scale = if ship.status.contains(StatusFlags::SCALED_WEAPON) {
            weapons.scaled_weapon_factor
        } else {
            1.0
        };
        let muzzle = ship.muzzle();
        let facing = ship.facing;

        let ahead = |size: Vec2, speed: f32| {
            let center = muzzle + Vec2::new(0.0, facing.sign() * size.y * 0.5);
            Body::centered(center, size, Vec2::new(0.0, facing.sign() * speed))
        };
        let (kind, body) = match weapon {
            WeaponKind::Bullet => (
                ProjectileKind::Bullet,
                ahead(weapons.bullet_size * scale, weapons.bullet_speed),
            ),
            WeaponKind::Missile => (
                ProjectileKind::Missile(MissileState::default()),
                ahead(weapons.missile_size * scale, weapons.missile_speed),
            ),
            WeaponKind::Laser => (
                ProjectileKind::Laser {
                    expires_at: now + self.config.durations.laser_ticks,
                },
                laser_body(muzzle, facing, weapons.laser_width * scale, &self.config.field),
            ),
        };

        let projectile = self.world.arena.spawn(EntityInner::Projectile(ProjectileComponents {
            kind,
            owner: Owner::Player(player),
            body,
        }));
        debug!(%player, ?weapon, %projectile, "fired");

        if tracked {
            self.world.emit(CombatEvent::AmmoRefresh { player });
        }
        self.world.emit(CombatEvent::sound(SoundEffect::for_weapon(weapon)));
        self.world.emit(CombatEvent::ProjectileFired {
            player,
            weapon,
            projectile,
        });
        FireOutcome::Fired(projectile)
    }

    /// Moves `player`'s ship one step toward `direction`.
    ///
    /// Reversed controls invert the direction. The ship stays inside the
    /// field.
    pub fn steer(&mut self, player: PlayerId, direction: Vec2) {
        let Some(ship) = self
            .world
            .ship_id(player)
            .and_then(|id| self.world.arena.ship_mut(id))
        else {
            return;
        };
        if !ship.is_alive() {
            return;
        }
        let direction = if ship.status.contains(StatusFlags::REVERSED) {
            -direction
        } else {
            direction
        };
        ship.body.position += direction.normalize_or_zero() * self.config.ships.speed;
        self.config.field.clamp(&mut ship.body);
    }

    /// Detonates every flying missile `player` owns.
    ///
    /// # Returns
    ///
    /// The number of missiles detonated.
    pub fn detonate_missiles(&mut self, player: PlayerId) -> usize {
        let now = self.world.tick();
        let missiles: Vec<EntityId> = self
            .world
            .arena
            .entities_sorted()
            .filter(|e| {
                e.as_projectile().is_some_and(|p| {
                    p.player() == Some(player) && p.missile().is_some_and(|m| !m.detonated)
                })
            })
            .map(crate::entity::Entity::id)
            .collect();

        let mut count = 0;
        for missile in missiles {
            if detonate(&mut self.world, missile, now, self.config.durations.blast_ticks) {
                self.world
                    .emit(CombatEvent::MissileDetonated { missile, player });
                count += 1;
            }
        }
        debug!(%player, count, "manual detonation");
        count
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Spawns a regular alien at `position` marching right.
    pub fn spawn_alien(&mut self, position: Vec2) -> EntityId {
        let fleet = &self.config.fleet;
        let body = Body::moving(position, fleet.alien_size, Vec2::new(fleet.alien_speed, 0.0));
        self.world
            .arena
            .spawn(EntityInner::Alien(AlienComponents::regular(body)))
    }

    /// Spawns a boss at `position`.
    ///
    /// Its threshold comes from [`CombatConfig::boss_hp`]. The blast ledger
    /// is cleared so no earlier blast entries carry into the fight.
    pub fn spawn_boss(&mut self, position: Vec2) -> EntityId {
        let threshold = self.config.boss_hp();
        let boss = &self.config.boss;
        let body = Body::moving(position, boss.size, Vec2::new(boss.speed, 0.0));
        let id = self
            .world
            .arena
            .spawn(EntityInner::Alien(AlienComponents::boss(body, threshold)));

        self.world.ledger.clear();
        info!(boss = %id, threshold, "boss spawned");
        self.world.emit(CombatEvent::BossSpawned {
            boss: id,
            threshold,
        });
        id
    }

    /// Spawns a `rows` by `cols` fleet centered horizontally.
    pub fn spawn_fleet(&mut self, rows: u32, cols: u32) -> Vec<EntityId> {
        let spacing = self.config.fleet.spacing;
        #[allow(clippy::cast_precision_loss)]
        let span = cols.saturating_sub(1) as f32 * spacing.x + self.config.fleet.alien_size.x;
        let left = ((self.config.field.width - span) * 0.5).max(0.0);

        let mut ids = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                #[allow(clippy::cast_precision_loss)]
                let position = Vec2::new(
                    left + col as f32 * spacing.x,
                    FLEET_TOP + row as f32 * spacing.y,
                );
                ids.push(self.spawn_alien(position));
            }
        }
        debug!(rows, cols, "fleet spawned");
        ids
    }

    /// Spawns a drifting obstacle.
    pub fn spawn_obstacle(&mut self, position: Vec2, size: Vec2, velocity: Vec2) -> EntityId {
        self.world.arena.spawn(EntityInner::Obstacle(ObstacleComponents {
            body: Body::moving(position, size, velocity),
        }))
    }

    /// Spawns a pickup drifting with `velocity`.
    pub fn spawn_pickup(&mut self, kind: PickupKind, position: Vec2, velocity: Vec2) -> EntityId {
        self.world.arena.spawn(EntityInner::Pickup(PickupComponents {
            kind,
            body: Body::moving(position, Vec2::splat(PICKUP_SIZE), velocity),
        }))
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Serializes the match to a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError`] if serialization fails.
    pub fn save(&self) -> Result<String, SaveError> {
        MatchSnapshot::capture(&self.world, self.config.mode).to_json()
    }

    /// Replaces the match state with a snapshot.
    ///
    /// The snapshot is parsed and validated in full before anything is
    /// swapped in; on error the running match is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] for malformed or incompatible snapshots.
    pub fn restore(&mut self, json: &str) -> Result<(), LoadError> {
        let world = MatchSnapshot::from_json(json)?.into_world(self.config.mode)?;
        info!(tick = world.tick(), entities = world.arena.entity_count(), "match restored");
        self.world = world;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Match state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Configuration snapshot.
    #[must_use]
    pub const fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Scoreboard.
    #[must_use]
    pub const fn scores(&self) -> &Scoreboard {
        &self.world.scores
    }

    /// Next tick to run.
    #[must_use]
    pub const fn tick(&self) -> Tick {
        self.world.tick()
    }

    /// Returns `true` once the match is over.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.world.over
    }

    /// Seed the match RNG was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Blast geometry used by the pipeline.
    #[must_use]
    pub fn blast_geometry(&self) -> &Arc<dyn BlastGeometry> {
        &self.geometry
    }

    /// Appends a custom resolver after the default stages.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Number of resolvers in the pipeline.
    #[must_use]
    pub fn resolver_count(&self) -> usize {
        self.resolvers.len()
    }

    /// IDs of every live alien, in ID order.
    #[must_use]
    pub fn aliens(&self) -> Vec<EntityId> {
        self.world.arena.ids_with_tag(EntityTag::Alien)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(mode: GameMode) -> Simulation {
        Simulation::new(CombatConfig::for_mode(mode), 11).unwrap()
    }

    mod creation_tests {
        use super::*;

        #[test]
        fn invalid_config_is_rejected() {
            let mut config = CombatConfig::default();
            config.durations.blast_ticks = 0;
            assert!(matches!(
                Simulation::new(config, 1),
                Err(ConfigError::NonPositive { .. })
            ));
        }

        #[test]
        fn versus_ships_face_each_other() {
            let sim = sim(GameMode::Versus);
            let one = sim.world().ship(PlayerId::One).unwrap();
            let two = sim.world().ship(PlayerId::Two).unwrap();
            assert_eq!(one.facing, Facing::Up);
            assert_eq!(two.facing, Facing::Down);
            assert!(two.body.position.y < one.body.position.y);
        }

        #[test]
        fn coop_ships_share_the_bottom() {
            let sim = sim(GameMode::Coop);
            let one = sim.world().ship(PlayerId::One).unwrap();
            let two = sim.world().ship(PlayerId::Two).unwrap();
            assert_eq!(one.body.position.y, two.body.position.y);
            assert_eq!(two.facing, Facing::Up);
            assert_eq!(one.ammo, None);
        }

        #[test]
        fn limited_ammo_hands_out_rounds() {
            let sim = sim(GameMode::LimitedAmmo);
            assert_eq!(sim.world().ship(PlayerId::Two).unwrap().ammo, Some(50));
        }

        #[test]
        fn pipeline_has_every_stage() {
            assert_eq!(sim(GameMode::Coop).resolver_count(), 13);
        }
    }

    mod fire_tests {
        use super::*;

        #[test]
        fn bullet_fires_then_cools_down() {
            let mut sim = sim(GameMode::Coop);
            assert!(matches!(
                sim.fire(PlayerId::One, WeaponKind::Bullet),
                FireOutcome::Fired(_)
            ));
            assert_eq!(
                sim.fire(PlayerId::One, WeaponKind::Bullet),
                FireOutcome::CoolingDown
            );
            for _ in 0..sim.config().weapons.bullet_cooldown {
                sim.step();
            }
            assert!(matches!(
                sim.fire(PlayerId::One, WeaponKind::Bullet),
                FireOutcome::Fired(_)
            ));
        }

        #[test]
        fn empowered_cooldown_is_halved() {
            let mut sim = sim(GameMode::Coop);
            let id = sim.world.ship_id(PlayerId::One).unwrap();
            sim.world
                .arena
                .ship_mut(id)
                .unwrap()
                .status
                .insert(StatusFlags::EMPOWERED);
            sim.fire(PlayerId::One, WeaponKind::Bullet);
            for _ in 0..sim.config().weapons.bullet_cooldown / 2 {
                sim.step();
            }
            assert!(matches!(
                sim.fire(PlayerId::One, WeaponKind::Bullet),
                FireOutcome::Fired(_)
            ));
        }

        #[test]
        fn laser_needs_kills_and_spends_them() {
            let mut sim = sim(GameMode::Coop);
            assert_eq!(
                sim.fire(PlayerId::One, WeaponKind::Laser),
                FireOutcome::LaserLocked
            );
            let id = sim.world.ship_id(PlayerId::One).unwrap();
            sim.world.arena.ship_mut(id).unwrap().kills = 10;

            let FireOutcome::Fired(laser) = sim.fire(PlayerId::One, WeaponKind::Laser) else {
                panic!("laser should fire");
            };
            assert_eq!(sim.world().ship(PlayerId::One).unwrap().kills, 0);
            let beam = sim.world().arena().projectile(laser).unwrap();
            assert_eq!(beam.body.position.y, 0.0);
        }

        #[test]
        fn disarmed_and_downed_ships_refuse() {
            let mut sim = sim(GameMode::Coop);
            let one = sim.world.ship_id(PlayerId::One).unwrap();
            let two = sim.world.ship_id(PlayerId::Two).unwrap();
            sim.world
                .arena
                .ship_mut(one)
                .unwrap()
                .status
                .insert(StatusFlags::DISARMED);
            sim.world
                .arena
                .ship_mut(two)
                .unwrap()
                .status
                .clear(StatusFlags::ALIVE);
            assert_eq!(sim.fire(PlayerId::One, WeaponKind::Bullet), FireOutcome::Disarmed);
            assert_eq!(sim.fire(PlayerId::Two, WeaponKind::Bullet), FireOutcome::ShipDown);
        }

        #[test]
        fn ammo_runs_out() {
            let mut config = CombatConfig::for_mode(GameMode::LimitedAmmo);
            config.weapons.starting_ammo = 1;
            let mut sim = Simulation::new(config, 3).unwrap();
            sim.fire(PlayerId::One, WeaponKind::Bullet);
            let events = sim.step();
            assert!(events.contains(&CombatEvent::AmmoRefresh {
                player: PlayerId::One
            }));
            for _ in 0..20 {
                sim.step();
            }
            assert_eq!(sim.fire(PlayerId::One, WeaponKind::Bullet), FireOutcome::OutOfAmmo);
        }

        #[test]
        fn scaled_weapon_enlarges_projectiles() {
            let mut sim = sim(GameMode::Coop);
            let id = sim.world.ship_id(PlayerId::One).unwrap();
            sim.world
                .arena
                .ship_mut(id)
                .unwrap()
                .status
                .insert(StatusFlags::SCALED_WEAPON);
            let FireOutcome::Fired(bullet) = sim.fire(PlayerId::One, WeaponKind::Bullet) else {
                panic!("bullet should fire");
            };
            let expected = sim.config().weapons.bullet_size * 2.0;
            assert_eq!(sim.world().arena().projectile(bullet).unwrap().body.size, expected);
        }
    }

    mod steer_tests {
        use super::*;

        #[test]
        fn steering_moves_and_clamps() {
            let mut sim = sim(GameMode::Coop);
            let start = sim.world().ship(PlayerId::One).unwrap().body.position;
            sim.steer(PlayerId::One, Vec2::new(-1.0, 0.0));
            let moved = sim.world().ship(PlayerId::One).unwrap().body.position;
            assert_eq!(moved, start - Vec2::new(6.0, 0.0));

            for _ in 0..500 {
                sim.steer(PlayerId::One, Vec2::new(-1.0, 1.0));
            }
            let clamped = sim.world().ship(PlayerId::One).unwrap().body;
            assert_eq!(clamped.position.x, 0.0);
            assert_eq!(clamped.rect().bottom(), sim.config().field.height);
        }

        #[test]
        fn reversed_controls_invert() {
            let mut sim = sim(GameMode::Coop);
            let id = sim.world.ship_id(PlayerId::One).unwrap();
            sim.world
                .arena
                .ship_mut(id)
                .unwrap()
                .status
                .insert(StatusFlags::REVERSED);
            let start = sim.world().ship(PlayerId::One).unwrap().body.position;
            sim.steer(PlayerId::One, Vec2::new(1.0, 0.0));
            let moved = sim.world().ship(PlayerId::One).unwrap().body.position;
            assert!(moved.x < start.x);
        }
    }

    mod spawn_tests {
        use super::*;

        #[test]
        fn fleet_has_rows_times_cols() {
            let mut sim = sim(GameMode::Coop);
            let ids = sim.spawn_fleet(3, 4);
            assert_eq!(ids.len(), 12);
            assert_eq!(sim.aliens(), ids);
        }

        #[test]
        fn boss_threshold_follows_config() {
            let mut sim = sim(GameMode::Coop);
            let boss = sim.spawn_boss(Vec2::new(500.0, 60.0));
            let threshold = sim.config().boss_hp();
            assert_eq!(
                sim.world().arena().alien(boss).unwrap().kind,
                crate::entity::AlienKind::Boss { threshold }
            );
            let events = sim.step();
            assert!(events.contains(&CombatEvent::BossSpawned { boss, threshold }));
        }

        #[test]
        fn manual_detonation() {
            let mut sim = sim(GameMode::Coop);
            sim.fire(PlayerId::One, WeaponKind::Missile);
            sim.step();
            assert_eq!(sim.detonate_missiles(PlayerId::One), 1);
            assert_eq!(sim.detonate_missiles(PlayerId::One), 0);
        }
    }
}
