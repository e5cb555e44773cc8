//! Match configuration.
//!
//! A [`CombatConfig`] is an immutable snapshot captured when a match starts
//! and passed by reference into every resolver. All durations are in ticks.
//! Every section implements `Default` and is marked `#[serde(default)]`, so a
//! configuration file only needs the values it changes:
//!
//! ```
//! use twinfire_core::config::{CombatConfig, GameMode};
//!
//! let config = CombatConfig::from_json(r#"{ "mode": "versus", "scoring": { "alien_points": 25 } }"#)?;
//! assert_eq!(config.mode, GameMode::Versus);
//! assert_eq!(config.scoring.alien_points, 25);
//! assert_eq!(config.scoring.boss_points, 500);
//! # Ok::<(), twinfire_core::config::ConfigError>(())
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::components::{Tick, WeaponKind};
use crate::geometry::Field;

/// Errors surfaced when a configuration is loaded or validated.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value that must be positive is zero or negative.
    #[error("{field} must be positive")]
    NonPositive {
        /// Dotted path of the offending field
        field: &'static str,
    },
    /// A probability outside `[0, 1]`.
    #[error("{field} must be within [0, 1], got {value}")]
    Probability {
        /// Dotted path of the offending field
        field: &'static str,
        /// Rejected value
        value: f64,
    },
    /// Split children outside `1..=4`.
    #[error("fleet.max_split_children must be within 1..=4, got {0}")]
    SplitChildren(u32),
    /// Ships would start with more health than they may ever hold.
    #[error("ships.starting_health ({starting}) exceeds ships.max_health ({max})")]
    HealthAboveMax {
        /// Configured starting health
        starting: u32,
        /// Configured maximum health
        max: u32,
    },
}

/// Rule variant for the whole match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Both players fight the fleet together
    #[default]
    Coop,
    /// Players shoot each other; player two starts at the top
    Versus,
    /// Any hit destroys a ship; aliens never split
    SingleLife,
    /// Every shot spends ammunition
    LimitedAmmo,
}

impl GameMode {
    /// Returns `true` in player-vs-player mode.
    #[must_use]
    pub const fn is_versus(self) -> bool {
        matches!(self, Self::Versus)
    }
}

/// Difficulty setting, used to scale boss hit points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Rank 0
    Easy,
    /// Rank 1
    #[default]
    Normal,
    /// Rank 2
    Hard,
}

impl Difficulty {
    /// Numeric rank used by the boss threshold formula.
    #[must_use]
    pub const fn rank(self) -> u32 {
        match self {
            Self::Easy => 0,
            Self::Normal => 1,
            Self::Hard => 2,
        }
    }
}

/// Score values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points for destroying a regular alien
    pub alien_points: i64,
    /// Points for destroying a boss
    pub boss_points: i64,
    /// Points deducted from both players when an alien breaches
    pub breach_penalty: i64,
    /// Points for hitting the opposing ship in versus mode
    pub pvp_hit_points: i64,
    /// Bonus-points mystery effect
    pub bonus_points: i64,
    /// Score-penalty mystery effect
    pub penalty_points: i64,
    /// Credit both owners when a bullet and a laser kill the same alien in
    /// one tick
    pub credit_simultaneous_kills: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alien_points: 10,
            boss_points: 500,
            breach_penalty: 25,
            pvp_hit_points: 50,
            bonus_points: 100,
            penalty_points: 50,
            credit_simultaneous_kills: true,
        }
    }
}

/// Boss tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Hit points at easy difficulty on level one
    pub base_hp: u32,
    /// Extra hit points per difficulty rank
    pub per_difficulty: u32,
    /// Extra hit points per level beyond the first
    pub per_level: u32,
    /// Image size
    pub size: Vec2,
    /// Horizontal speed
    pub speed: f32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            base_hp: 10,
            per_difficulty: 5,
            per_level: 2,
            size: Vec2::new(160.0, 100.0),
            speed: 1.5,
        }
    }
}

/// Transient state durations, in ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    /// Immunity after a non-fatal ship hit
    pub immunity_ticks: Tick,
    /// Invincibility mystery effect
    pub invincibility_ticks: Tick,
    /// Freeze-aliens mystery effect
    pub freeze_ticks: Tick,
    /// Shield mystery effect; `None` holds until a hazard is absorbed
    pub shield_ticks: Option<Tick>,
    /// Disarm mystery effect
    pub disarm_ticks: Tick,
    /// Reverse-controls mystery effect
    pub reverse_ticks: Tick,
    /// Scaled-weapon mystery effect
    pub scaled_weapon_ticks: Tick,
    /// Empower mystery effect
    pub empower_ticks: Tick,
    /// Ticks a missile blast stays live
    pub blast_ticks: u32,
    /// Ticks a laser beam stays live
    pub laser_ticks: Tick,
    /// Ship destruction animation
    pub explosion_ticks: Tick,
    /// Mystery effect label display
    pub effect_label_ticks: Tick,
    /// Immunity of freshly split baby aliens
    pub baby_immunity_ticks: Tick,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            immunity_ticks: 120,
            invincibility_ticks: 300,
            freeze_ticks: 300,
            shield_ticks: Some(600),
            disarm_ticks: 180,
            reverse_ticks: 300,
            scaled_weapon_ticks: 600,
            empower_ticks: 600,
            blast_ticks: 12,
            laser_ticks: 45,
            explosion_ticks: 30,
            effect_label_ticks: 90,
            baby_immunity_ticks: 10,
        }
    }
}

/// Player weapon tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Ticks between bullets
    pub bullet_cooldown: Tick,
    /// Ticks between missiles
    pub missile_cooldown: Tick,
    /// Ticks between laser beams
    pub laser_cooldown: Tick,
    /// Bullet speed in units per tick
    pub bullet_speed: f32,
    /// Missile speed in units per tick
    pub missile_speed: f32,
    /// Bullet image size
    pub bullet_size: Vec2,
    /// Missile image size
    pub missile_size: Vec2,
    /// Laser beam width
    pub laser_width: f32,
    /// Kills needed before a laser can be fired
    pub laser_kill_requirement: u32,
    /// Ammunition per ship in limited-ammo mode
    pub starting_ammo: u32,
    /// Projectile size multiplier while the scaled-weapon effect is active
    pub scaled_weapon_factor: f32,
}

impl WeaponConfig {
    /// Cooldown of the given weapon.
    #[must_use]
    pub const fn cooldown(&self, weapon: WeaponKind) -> Tick {
        match weapon {
            WeaponKind::Bullet => self.bullet_cooldown,
            WeaponKind::Missile => self.missile_cooldown,
            WeaponKind::Laser => self.laser_cooldown,
        }
    }
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            bullet_cooldown: 15,
            missile_cooldown: 40,
            laser_cooldown: 60,
            bullet_speed: 12.0,
            missile_speed: 8.0,
            bullet_size: Vec2::new(4.0, 14.0),
            missile_size: Vec2::new(10.0, 22.0),
            laser_width: 12.0,
            laser_kill_requirement: 10,
            starting_ammo: 50,
            scaled_weapon_factor: 2.0,
        }
    }
}

/// Missile blast geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastConfig {
    /// Blast side length on its first frame
    pub base_size: f32,
    /// Growth of the side length per frame
    pub growth: f32,
    /// Largest side length
    pub max_size: f32,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            base_size: 40.0,
            growth: 12.0,
            max_size: 160.0,
        }
    }
}

/// Alien fleet tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Regular alien image size
    pub alien_size: Vec2,
    /// Horizontal fleet speed
    pub alien_speed: f32,
    /// Distance the fleet drops on each edge bounce
    pub fleet_drop: f32,
    /// Grid spacing between alien origins
    pub spacing: Vec2,
    /// Probability that a destroyed non-baby alien splits
    pub split_chance: f64,
    /// Largest number of babies one split produces
    pub max_split_children: u32,
    /// Baby size relative to the parent
    pub baby_scale: f32,
    /// Ticks between enemy volleys
    pub enemy_fire_interval: Tick,
    /// Ticks an alien waits after firing
    pub alien_fire_cooldown: Tick,
    /// Enemy bullet speed
    pub enemy_bullet_speed: f32,
    /// Enemy bullet image size
    pub enemy_bullet_size: Vec2,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            alien_size: Vec2::new(48.0, 36.0),
            alien_speed: 2.0,
            fleet_drop: 20.0,
            spacing: Vec2::new(70.0, 55.0),
            split_chance: 0.1,
            max_split_children: 4,
            baby_scale: 0.6,
            enemy_fire_interval: 45,
            alien_fire_cooldown: 120,
            enemy_bullet_speed: 6.0,
            enemy_bullet_size: Vec2::new(6.0, 12.0),
        }
    }
}

/// Player ship tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Image size
    pub size: Vec2,
    /// Steering speed in units per tick
    pub speed: f32,
    /// Health at match start
    pub starting_health: u32,
    /// Health cap for health pickups
    pub max_health: u32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(50.0, 40.0),
            speed: 6.0,
            starting_health: 3,
            max_health: 5,
        }
    }
}

/// Immutable configuration snapshot for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Rule variant
    pub mode: GameMode,
    /// Difficulty setting
    pub difficulty: Difficulty,
    /// Current level, starting at one
    pub level: u32,
    /// Play field
    pub field: Field,
    /// Score values
    pub scoring: ScoringConfig,
    /// Boss tuning
    pub boss: BossConfig,
    /// Transient state durations
    pub durations: DurationConfig,
    /// Player weapons
    pub weapons: WeaponConfig,
    /// Missile blast geometry
    pub blast: BlastConfig,
    /// Alien fleet
    pub fleet: FleetConfig,
    /// Player ships
    pub ships: ShipConfig,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            level: 1,
            field: Field::default(),
            scoring: ScoringConfig::default(),
            boss: BossConfig::default(),
            durations: DurationConfig::default(),
            weapons: WeaponConfig::default(),
            blast: BlastConfig::default(),
            fleet: FleetConfig::default(),
            ships: ShipConfig::default(),
        }
    }
}

impl CombatConfig {
    /// Default configuration for `mode`.
    #[must_use]
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the matching
    /// validation error for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Hit points of a boss spawned under this configuration.
    ///
    /// `base + rank * per_difficulty + (level - 1) * per_level`, saturating at `u32::MAX`.
    #[must_use]
    pub fn boss_hp(&self) -> u32 {
        self.boss
            .base_hp
            .saturating_add(self.difficulty.rank().saturating_mul(self.boss.per_difficulty))
            .saturating_add(self.level.saturating_sub(1).saturating_mul(self.boss.per_level))
    }

    /// Checks every tunable that would make resolution misbehave.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::NonPositive { field })
            }
        }
        fn nonzero<T: Default + PartialEq>(value: T, field: &'static str) -> Result<(), ConfigError> {
            if value == T::default() {
                Err(ConfigError::NonPositive { field })
            } else {
                Ok(())
            }
        }

        positive(self.field.width, "field.width")?;
        positive(self.field.height, "field.height")?;
        nonzero(self.level, "level")?;
        nonzero(self.durations.blast_ticks, "durations.blast_ticks")?;
        nonzero(self.durations.laser_ticks, "durations.laser_ticks")?;
        nonzero(self.boss.base_hp, "boss.base_hp")?;
        nonzero(self.ships.starting_health, "ships.starting_health")?;
        nonzero(self.fleet.enemy_fire_interval, "fleet.enemy_fire_interval")?;
        positive(self.ships.size.x.min(self.ships.size.y), "ships.size")?;
        positive(self.fleet.alien_size.x.min(self.fleet.alien_size.y), "fleet.alien_size")?;
        positive(self.weapons.laser_width, "weapons.laser_width")?;
        positive(self.weapons.scaled_weapon_factor, "weapons.scaled_weapon_factor")?;
        positive(self.fleet.baby_scale, "fleet.baby_scale")?;
        positive(self.blast.base_size, "blast.base_size")?;

        if !(0.0..=1.0).contains(&self.fleet.split_chance) {
            return Err(ConfigError::Probability {
                field: "fleet.split_chance",
                value: self.fleet.split_chance,
            });
        }
        if !(1..=4).contains(&self.fleet.max_split_children) {
            return Err(ConfigError::SplitChildren(self.fleet.max_split_children));
        }
        if self.ships.starting_health > self.ships.max_health {
            return Err(ConfigError::HealthAboveMax {
                starting: self.ships.starting_health,
                max: self.ships.max_health,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod defaults_tests {
        use super::*;

        #[test]
        fn default_is_valid() {
            CombatConfig::default().validate().unwrap();
        }

        #[test]
        fn partial_json_keeps_defaults() {
            let config = CombatConfig::from_json(r#"{"durations": {"blast_ticks": 4}}"#).unwrap();
            assert_eq!(config.durations.blast_ticks, 4);
            assert_eq!(config.durations.laser_ticks, 45);
            assert_eq!(config.mode, GameMode::Coop);
            assert_eq!(config.level, 1);
        }

        #[test]
        fn mode_names() {
            let config = CombatConfig::from_json(r#"{"mode": "limited_ammo", "difficulty": "hard"}"#)
                .unwrap();
            assert_eq!(config.mode, GameMode::LimitedAmmo);
            assert_eq!(config.difficulty, Difficulty::Hard);
        }
    }

    mod boss_hp_tests {
        use super::*;

        #[test]
        fn scales_with_difficulty_and_level() {
            let mut config = CombatConfig::default();
            config.difficulty = Difficulty::Easy;
            assert_eq!(config.boss_hp(), 10);
            config.difficulty = Difficulty::Hard;
            assert_eq!(config.boss_hp(), 20);
            config.level = 3;
            assert_eq!(config.boss_hp(), 24);
        }

        #[test]
        fn huge_level_saturates() {
            let mut config = CombatConfig::default();
            config.level = u32::MAX;
            assert_eq!(config.boss_hp(), u32::MAX);
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn rejects_zero_blast_duration() {
            let err = CombatConfig::from_json(r#"{"durations": {"blast_ticks": 0}}"#).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::NonPositive {
                    field: "durations.blast_ticks"
                }
            ));
        }

        #[test]
        fn rejects_bad_split_chance() {
            let mut config = CombatConfig::default();
            config.fleet.split_chance = 1.5;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Probability { .. })
            ));
        }

        #[test]
        fn rejects_split_children_out_of_range() {
            let mut config = CombatConfig::default();
            config.fleet.max_split_children = 0;
            assert!(matches!(config.validate(), Err(ConfigError::SplitChildren(0))));
            config.fleet.max_split_children = 5;
            assert!(matches!(config.validate(), Err(ConfigError::SplitChildren(5))));
        }

        #[test]
        fn rejects_health_above_max() {
            let mut config = CombatConfig::default();
            config.ships.starting_health = 9;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::HealthAboveMax { starting: 9, max: 5 })
            ));
        }

        #[test]
        fn rejects_empty_field() {
            let mut config = CombatConfig::default();
            config.field.height = 0.0;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositive { field: "field.height" })
            ));
        }

        #[test]
        fn malformed_json_is_parse_error() {
            assert!(matches!(
                CombatConfig::from_json("{ nope"),
                Err(ConfigError::Parse(_))
            ));
        }

        #[test]
        fn error_messages() {
            let err = ConfigError::SplitChildren(7);
            assert_eq!(
                err.to_string(),
                "fleet.max_split_children must be within 1..=4, got 7"
            );
        }
    }

    #[test]
    fn weapon_cooldowns() {
        let weapons = WeaponConfig::default();
        assert_eq!(weapons.cooldown(WeaponKind::Bullet), 15);
        assert_eq!(weapons.cooldown(WeaponKind::Laser), 60);
    }
}
