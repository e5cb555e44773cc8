//! Versioned save files.
//!
//! A [`MatchSnapshot`] carries everything needed to resume a match so that
//! every later tick resolves exactly as it would have in-process: the tick,
//! the next entity ID, the scoreboard, the blast ledger, the RNG position and
//! every entity. Aliens are written with explicit `hit_count`, `is_baby`,
//! `immune_state`, `frozen_state`, `last_bullet_time`, `position` and
//! `image_size` fields.
//!
//! Loading parses and validates the whole file before a [`World`] is built,
//! so a rejected file never leaves a half-restored match behind.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::arena::Arena;
use crate::config::GameMode;
use crate::entity::components::{PickupComponents, Tick};
use crate::entity::{
    AlienComponents, AlienKind, Entity, EntityId, EntityInner, ObstacleComponents,
    ProjectileComponents, ShipComponents, StatusEffects, StatusFlags,
};
use crate::event::{CombatEvent, EventLog};
use crate::geometry::Body;
use crate::ledger::BlastLedger;
use crate::scoreboard::Scoreboard;
use crate::world::World;

/// Version written by [`MatchSnapshot::to_json`].
pub const SNAPSHOT_VERSION: u32 = 1;

const ENTITY_TYPES: [&str; 5] = ["ship", "alien", "projectile", "obstacle", "pickup"];

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while loading a snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The JSON is malformed or does not match the snapshot layout.
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The snapshot was written by an incompatible version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Version this build reads
        expected: u32,
    },
    /// The snapshot belongs to a match with a different game mode.
    #[error("snapshot was saved in {saved:?} mode, match is running {running:?}")]
    ModeMismatch {
        /// Mode in the file
        saved: GameMode,
        /// Mode of the running match
        running: GameMode,
    },
    /// An entity record names a type the engine does not know.
    #[error("entity #{index} has unknown type {kind:?}")]
    UnknownEntityType {
        /// Position of the record in the entity list
        index: usize,
        /// Type name found in the record
        kind: String,
    },
    /// Two entity records share an ID.
    #[error("entity {0} appears more than once")]
    DuplicateEntity(EntityId),
}

/// Errors raised while writing a snapshot.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Serialization failed.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

// =============================================================================
// Records
// =============================================================================

/// Position of the match RNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    /// Key the stream was seeded with
    pub seed: [u8; 32],
    /// Stream number
    pub stream: u64,
    /// Word position within the stream
    pub word_pos: u128,
}

impl RngState {
    fn capture(rng: &ChaCha8Rng) -> Self {
        Self {
            seed: rng.get_seed(),
            stream: rng.get_stream(),
            word_pos: rng.get_word_pos(),
        }
    }

    fn rebuild(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(self.seed);
        rng.set_stream(self.stream);
        rng.set_word_pos(self.word_pos);
        rng
    }
}

/// A timed alien state as written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedState {
    /// Whether the state is set
    pub active: bool,
    /// First tick on which it is no longer set, if timed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Tick>,
}

impl TimedState {
    fn capture(status: &StatusEffects, flag: StatusFlags) -> Self {
        Self {
            active: status.contains(flag),
            expires_at: status.expires_at(flag),
        }
    }

    fn restore(self, status: &mut StatusEffects, flag: StatusFlags) {
        match (self.active, self.expires_at) {
            (false, _) => status.clear(flag),
            (true, Some(at)) => status.insert_until(flag, at),
            (true, None) => status.insert(flag),
        }
    }
}

/// Saved ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedShip {
    /// Entity ID
    pub id: EntityId,
    /// Ship state
    pub ship: ShipComponents,
}

/// Saved alien or boss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAlien {
    /// Entity ID
    pub id: EntityId,
    /// Regular or boss with its threshold
    pub kind: AlienKind,
    /// Qualifying hits taken
    pub hit_count: u32,
    /// Spawned by a split
    pub is_baby: bool,
    /// Immunity state
    pub immune_state: TimedState,
    /// Freeze state
    pub frozen_state: TimedState,
    /// Tick of the alien's last shot
    pub last_bullet_time: Option<Tick>,
    /// Top-left corner
    pub position: Vec2,
    /// Image size
    pub image_size: Vec2,
    /// Fleet velocity
    #[serde(default)]
    pub velocity: Vec2,
}

impl SavedAlien {
    fn capture(id: EntityId, alien: &AlienComponents) -> Self {
        Self {
            id,
            kind: alien.kind,
            hit_count: alien.hit_count,
            is_baby: alien.is_baby,
            immune_state: TimedState::capture(&alien.status, StatusFlags::IMMUNE),
            frozen_state: TimedState::capture(&alien.status, StatusFlags::FROZEN),
            last_bullet_time: alien.last_bullet_time,
            position: alien.body.position,
            image_size: alien.body.size,
            velocity: alien.body.velocity,
        }
    }

    fn rebuild(&self) -> AlienComponents {
        let mut status = StatusEffects::default();
        self.immune_state.restore(&mut status, StatusFlags::IMMUNE);
        self.frozen_state.restore(&mut status, StatusFlags::FROZEN);
        AlienComponents {
            kind: self.kind,
            body: Body::moving(self.position, self.image_size, self.velocity),
            status,
            hit_count: self.hit_count,
            is_baby: self.is_baby,
            last_bullet_time: self.last_bullet_time,
        }
    }
}

/// Saved projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedProjectile {
    /// Entity ID
    pub id: EntityId,
    /// Projectile state
    pub projectile: ProjectileComponents,
}

/// Saved obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedObstacle {
    /// Entity ID
    pub id: EntityId,
    /// Obstacle state
    pub obstacle: ObstacleComponents,
}

/// Saved pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPickup {
    /// Entity ID
    pub id: EntityId,
    /// Pickup state
    pub pickup: PickupComponents,
}

/// One entity record, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SavedEntity {
    /// A player ship
    Ship(SavedShip),
    /// An alien or boss
    Alien(SavedAlien),
    /// A projectile
    Projectile(SavedProjectile),
    /// An obstacle
    Obstacle(SavedObstacle),
    /// A pickup
    Pickup(SavedPickup),
}

impl SavedEntity {
    fn capture(entity: &Entity) -> Self {
        let id = entity.id();
        match entity.inner() {
            EntityInner::Ship(ship) => Self::Ship(SavedShip {
                id,
                ship: ship.clone(),
            }),
            EntityInner::Alien(alien) => Self::Alien(SavedAlien::capture(id, alien)),
            EntityInner::Projectile(projectile) => Self::Projectile(SavedProjectile {
                id,
                projectile: projectile.clone(),
            }),
            EntityInner::Obstacle(obstacle) => Self::Obstacle(SavedObstacle {
                id,
                obstacle: obstacle.clone(),
            }),
            EntityInner::Pickup(pickup) => Self::Pickup(SavedPickup {
                id,
                pickup: pickup.clone(),
            }),
        }
    }

    /// ID of the saved entity.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        match self {
            Self::Ship(saved) => saved.id,
            Self::Alien(saved) => saved.id,
            Self::Projectile(saved) => saved.id,
            Self::Obstacle(saved) => saved.id,
            Self::Pickup(saved) => saved.id,
        }
    }

    fn into_entity(self) -> Entity {
        let id = self.id();
        let inner = match self {
            Self::Ship(saved) => EntityInner::Ship(saved.ship),
            Self::Alien(saved) => EntityInner::Alien(saved.rebuild()),
            Self::Projectile(saved) => EntityInner::Projectile(saved.projectile),
            Self::Obstacle(saved) => EntityInner::Obstacle(saved.obstacle),
            Self::Pickup(saved) => EntityInner::Pickup(saved.pickup),
        };
        Entity::new(id, inner)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Complete saved state of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Format version
    pub version: u32,
    /// Game mode of the saved match
    pub mode: GameMode,
    /// Next tick to run
    pub tick: Tick,
    /// Next entity ID to assign
    pub next_id: u64,
    /// Scores, health and high score
    pub scores: Scoreboard,
    /// Resolved `(hazard, target)` blast pairs
    pub ledger: BlastLedger,
    /// RNG position
    pub rng: RngState,
    /// Whether the match-over event was already emitted
    pub over: bool,
    /// Events recorded since the last tick
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<CombatEvent>,
    /// Every entity, in ID order
    pub entities: Vec<SavedEntity>,
}

/// Snapshot layout with entity records left unparsed.
#[derive(Deserialize)]
struct RawSnapshot {
    version: u32,
    mode: GameMode,
    tick: Tick,
    next_id: u64,
    scores: Scoreboard,
    ledger: BlastLedger,
    rng: RngState,
    over: bool,
    #[serde(default)]
    pending: Vec<CombatEvent>,
    entities: Vec<serde_json::Value>,
}

impl MatchSnapshot {
    /// Captures the state of `world`, saved under `mode`.
    #[must_use]
    pub fn capture(world: &World, mode: GameMode) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            mode,
            tick: world.tick(),
            next_id: world.arena.next_id(),
            scores: world.scores.clone(),
            ledger: world.ledger.clone(),
            rng: RngState::capture(&world.rng),
            over: world.over,
            pending: world.events.as_slice().to_vec(),
            entities: world.arena.entities_sorted().map(SavedEntity::capture).collect(),
        }
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot, checking its version and every entity type.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Malformed`] for invalid JSON or records
    /// - [`LoadError::UnsupportedVersion`] for other format versions
    /// - [`LoadError::UnknownEntityType`] for records of unknown type
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw: RawSnapshot = serde_json::from_str(json).inspect_err(|err| {
            warn!(%err, "snapshot rejected");
        })?;

        if raw.version != SNAPSHOT_VERSION {
            warn!(found = raw.version, "snapshot rejected: unsupported version");
            return Err(LoadError::UnsupportedVersion {
                found: raw.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let entities = raw
            .entities
            .into_iter()
            .enumerate()
            .map(|(index, record)| parse_entity(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version: raw.version,
            mode: raw.mode,
            tick: raw.tick,
            next_id: raw.next_id,
            scores: raw.scores,
            ledger: raw.ledger,
            rng: raw.rng,
            over: raw.over,
            pending: raw.pending,
            entities,
        })
    }

    /// Builds a world from the snapshot for a match running `mode`.
    ///
    /// # Errors
    ///
    /// - [`LoadError::ModeMismatch`] if the snapshot was saved in another mode
    /// - [`LoadError::DuplicateEntity`] if two records share an ID
    pub fn into_world(self, mode: GameMode) -> Result<World, LoadError> {
        if self.mode != mode {
            warn!(saved = ?self.mode, running = ?mode, "snapshot rejected: mode mismatch");
            return Err(LoadError::ModeMismatch {
                saved: self.mode,
                running: mode,
            });
        }

        let mut entities = BTreeMap::new();
        for saved in self.entities {
            let entity = saved.into_entity();
            let id = entity.id();
            if entities.insert(id, entity).is_some() {
                warn!(%id, "snapshot rejected: duplicate entity");
                return Err(LoadError::DuplicateEntity(id));
            }
        }

        let mut events = EventLog::new();
        for event in self.pending {
            events.push(event);
        }

        Ok(World {
            arena: Arena::from_parts(self.next_id, self.tick, entities),
            scores: self.scores,
            ledger: self.ledger,
            events,
            rng: self.rng.rebuild(),
            over: self.over,
        })
    }
}

fn parse_entity(index: usize, record: serde_json::Value) -> Result<SavedEntity, LoadError> {
    let kind = record
        .get("type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    if !ENTITY_TYPES.contains(&kind) {
        warn!(index, kind, "snapshot rejected: unknown entity type");
        return Err(LoadError::UnknownEntityType {
            index,
            kind: kind.to_owned(),
        });
    }
    Ok(serde_json::from_value(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::Facing;
    use crate::entity::PlayerId;
    use rand::Rng;

    fn sample_world() -> World {
        let mut world = World::new(99, 3);
        world.arena.spawn(EntityInner::Ship(ShipComponents::new(
            PlayerId::One,
            Vec2::new(100.0, 700.0),
            Vec2::splat(40.0),
            Facing::Up,
        )));
        let mut alien = AlienComponents::boss(
            Body::moving(Vec2::new(300.0, 80.0), Vec2::new(160.0, 100.0), Vec2::new(1.5, 0.0)),
            12,
        );
        alien.hit_count = 4;
        alien.status.apply(StatusFlags::IMMUNE, 0, Some(5));
        alien.status.apply(StatusFlags::FROZEN, 0, Some(30));
        alien.last_bullet_time = Some(45);
        world.arena.spawn(EntityInner::Alien(alien));
        world.ledger.mark(EntityId::new(7), EntityId::new(1));
        world.scores.credit(PlayerId::One, 120);
        world
    }

    mod alien_record_tests {
        use super::*;

        #[test]
        fn alien_fields_are_explicit() {
            let world = sample_world();
            let json = MatchSnapshot::capture(&world, GameMode::Coop).to_json().unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            let alien = &value["entities"][1];
            assert_eq!(alien["type"], "alien");
            assert_eq!(alien["hit_count"], 4);
            assert_eq!(alien["is_baby"], false);
            assert_eq!(alien["immune_state"]["active"], true);
            assert_eq!(alien["immune_state"]["expires_at"], 5);
            assert_eq!(alien["frozen_state"]["expires_at"], 30);
            assert_eq!(alien["last_bullet_time"], 45);
            assert_eq!(alien["image_size"], serde_json::json!([160.0, 100.0]));
        }

        #[test]
        fn alien_state_round_trips() {
            let world = sample_world();
            let json = MatchSnapshot::capture(&world, GameMode::Coop).to_json().unwrap();
            let restored = MatchSnapshot::from_json(&json)
                .unwrap()
                .into_world(GameMode::Coop)
                .unwrap();

            let id = EntityId::new(1);
            assert!(restored.arena.alien(id).is_some());
            assert_eq!(restored.arena.alien(id), world.arena.alien(id));
            assert_eq!(restored.ledger, world.ledger);
            assert_eq!(restored.scores, world.scores);
            assert_eq!(restored.arena.next_id(), world.arena.next_id());
        }
    }

    mod rng_tests {
        use super::*;

        #[test]
        fn rng_position_survives() {
            let mut world = sample_world();
            let _: u64 = world.rng.gen();
            let json = MatchSnapshot::capture(&world, GameMode::Coop).to_json().unwrap();
            let mut restored = MatchSnapshot::from_json(&json)
                .unwrap()
                .into_world(GameMode::Coop)
                .unwrap();

            let expected: [u32; 4] = world.rng.gen();
            let actual: [u32; 4] = restored.rng.gen();
            assert_eq!(expected, actual);
        }
    }

    mod rejection_tests {
        use super::*;

        fn saved_value() -> serde_json::Value {
            let json = MatchSnapshot::capture(&sample_world(), GameMode::Coop)
                .to_json()
                .unwrap();
            serde_json::from_str(&json).unwrap()
        }

        #[test]
        fn unknown_entity_type() {
            let mut value = saved_value();
            value["entities"][1]["type"] = serde_json::json!("mothership");
            let err = MatchSnapshot::from_json(&value.to_string()).unwrap_err();
            assert!(matches!(
                err,
                LoadError::UnknownEntityType { index: 1, ref kind } if kind == "mothership"
            ));
        }

        #[test]
        fn unsupported_version() {
            let mut value = saved_value();
            value["version"] = serde_json::json!(99);
            let err = MatchSnapshot::from_json(&value.to_string()).unwrap_err();
            assert!(matches!(err, LoadError::UnsupportedVersion { found: 99, .. }));
        }

        #[test]
        fn mode_mismatch() {
            let value = saved_value();
            let err = MatchSnapshot::from_json(&value.to_string())
                .unwrap()
                .into_world(GameMode::Versus)
                .unwrap_err();
            assert!(matches!(err, LoadError::ModeMismatch { .. }));
        }

        #[test]
        fn duplicate_entities() {
            let mut value = saved_value();
            let copy = value["entities"][1].clone();
            value["entities"].as_array_mut().unwrap().push(copy);
            let err = MatchSnapshot::from_json(&value.to_string())
                .unwrap()
                .into_world(GameMode::Coop)
                .unwrap_err();
            assert!(matches!(err, LoadError::DuplicateEntity(id) if id == EntityId::new(1)));
        }

        #[test]
        fn garbage_is_malformed() {
            assert!(matches!(
                MatchSnapshot::from_json("{ not json"),
                Err(LoadError::Malformed(_))
            ));
        }
    }
}
