//! Combat events emitted by the resolution pipeline.
//!
//! Resolvers never call collaborators directly. They append [`CombatEvent`]s
//! to the world's [`EventLog`]; [`Simulation::step`](crate::simulation::Simulation::step)
//! drains the log at the end of the tick and the caller forwards it to a
//! [`CombatSink`](crate::sink::CombatSink). The log doubles as a replay
//! record: two runs with the same seed and inputs produce identical streams.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::components::{MysteryEffect, PickupKind, WeaponKind};
use crate::entity::{EntityId, PlayerId};

/// Sound keys handed to the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    /// A player fired a bullet
    BulletFire,
    /// A player launched a missile
    MissileLaunch,
    /// A player fired a laser
    LaserFire,
    /// An alien fired
    EnemyFire,
    /// A regular alien or a boss took a direct hit
    AlienHit,
    /// A missile blast or a versus shot connected
    Impact,
    /// A boss was destroyed
    BossDestroyed,
    /// A shield absorbed a hazard
    ShieldAbsorb,
    /// A ship lost a health point
    ShipHit,
    /// A ship was destroyed
    ShipExplosion,
    /// A beneficial pickup
    PowerUp,
    /// A harmful mystery effect
    PowerDown,
    /// The freeze mystery effect
    Freeze,
}

impl SoundEffect {
    /// Firing sound for a weapon.
    #[must_use]
    pub const fn for_weapon(weapon: WeaponKind) -> Self {
        match weapon {
            WeaponKind::Bullet => Self::BulletFire,
            WeaponKind::Missile => Self::MissileLaunch,
            WeaponKind::Laser => Self::LaserFire,
        }
    }
}

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    /// Play a sound
    Sound {
        /// Sound key
        effect: SoundEffect,
    },
    /// A player's score changed by `amount`
    ScoreCredited {
        /// Credited player
        player: PlayerId,
        /// Signed change
        amount: i64,
    },
    /// Redraw the score display
    ScoreRefresh,
    /// Redraw the high score display
    HighScoreRefresh,
    /// Redraw the health display
    HealthRefresh,
    /// Redraw a player's ammunition display
    AmmoRefresh {
        /// Player whose ammunition changed
        player: PlayerId,
    },
    /// Play the destruction animation of an entity
    DestructionAnimation {
        /// Destroyed entity
        entity: EntityId,
        /// Center of the entity when it was destroyed
        center: Vec2,
    },
    /// A health pickup was collected
    IncrementHealth {
        /// Collecting player
        player: PlayerId,
    },
    /// A weapon pickup was collected
    WeaponChange {
        /// Collecting player
        player: PlayerId,
    },
    /// A ship took an unguarded hit
    ShipHit {
        /// Hit player
        player: PlayerId,
    },
    /// A ship ran out of health
    ShipDestroyed {
        /// Destroyed player
        player: PlayerId,
    },
    /// A mystery effect label should be shown
    ShowEffect {
        /// Collecting player
        player: PlayerId,
        /// Applied effect
        effect: MysteryEffect,
    },
    /// A player projectile was fired
    ProjectileFired {
        /// Firing player
        player: PlayerId,
        /// Weapon category
        weapon: WeaponKind,
        /// New projectile
        projectile: EntityId,
    },
    /// An alien fired at the ships
    EnemyFired {
        /// Shooter
        alien: EntityId,
        /// New enemy bullet
        bullet: EntityId,
    },
    /// A regular alien was destroyed
    AlienDestroyed {
        /// Destroyed alien
        alien: EntityId,
        /// Crediting player, `None` for contact kills
        by: Option<PlayerId>,
    },
    /// A destroyed alien split into babies
    AlienSplit {
        /// Destroyed parent
        parent: EntityId,
        /// Spawned babies
        children: Vec<EntityId>,
    },
    /// An alien crossed the bottom of the field
    AlienBreached {
        /// Removed alien
        alien: EntityId,
    },
    /// A boss entered the field
    BossSpawned {
        /// New boss
        boss: EntityId,
        /// Hits needed to destroy it
        threshold: u32,
    },
    /// A boss took a hit and survived
    BossDamaged {
        /// Damaged boss
        boss: EntityId,
        /// Hits taken so far
        hit_count: u32,
        /// Hits needed
        threshold: u32,
    },
    /// A boss was destroyed
    BossDestroyed {
        /// Destroyed boss
        boss: EntityId,
        /// Credited player
        by: PlayerId,
    },
    /// A missile exploded
    MissileDetonated {
        /// Exploding missile
        missile: EntityId,
        /// Owning player
        player: PlayerId,
    },
    /// A shield absorbed a hazard
    ShieldAbsorbed {
        /// Shielded player
        player: PlayerId,
        /// Absorbed hazard
        hazard: EntityId,
    },
    /// A pickup was collected
    PickupCollected {
        /// Collecting player
        player: PlayerId,
        /// Pickup category
        kind: PickupKind,
    },
    /// The match ended
    MatchOver {
        /// Winner in versus mode
        winner: Option<PlayerId>,
    },
}

impl CombatEvent {
    /// Shorthand for [`CombatEvent::Sound`].
    #[must_use]
    pub const fn sound(effect: SoundEffect) -> Self {
        Self::Sound { effect }
    }
}

/// Ordered list of events recorded during a tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events in order.
    pub fn take(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recorded events.
    #[must_use]
    pub fn as_slice(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
