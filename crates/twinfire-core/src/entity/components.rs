//! Component structs for each entity type.
//!
//! The component structs hold all state for a particular entity type. Timed
//! states are expressed as an explicit `expires_at` tick that the expiry stage
//! evaluates once at the top of every tick.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{EntityId, PlayerId};
use crate::geometry::{Body, Rect};

/// Logical simulation tick.
pub type Tick = u64;

// =============================================================================
// Status Flags
// =============================================================================

bitflags! {
    /// Transient state flags shared by ships and aliens.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StatusFlags: u32 {
        /// Entity takes part in the match
        const ALIVE = 1 << 0;
        /// Destruction animation is playing
        const EXPLODING = 1 << 1;
        /// Absorbs the next hazard
        const SHIELDED = 1 << 2;
        /// A shield was consumed this tick; further hazards are ignored
        const SHIELD_SPENT = 1 << 3;
        /// Hazards are ignored entirely
        const IMMUNE = 1 << 4;
        /// Movement and firing are suspended (aliens)
        const FROZEN = 1 << 5;
        /// Ship cannot fire
        const DISARMED = 1 << 6;
        /// Ship steering is inverted
        const REVERSED = 1 << 7;
        /// Ship fires enlarged projectiles
        const SCALED_WEAPON = 1 << 8;
        /// Ship fires at double rate
        const EMPOWERED = 1 << 9;
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::ALIVE
    }
}

/// Expiry record for one timed flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expiry {
    /// The flag that expires
    pub flag: StatusFlags,
    /// First tick on which the flag is no longer set
    pub expires_at: Tick,
}

/// Status flags plus the expiry ticks of the timed ones.
///
/// A flag inserted with a duration gets an [`Expiry`]; a flag inserted
/// without one stays set until it is cleared explicitly (for example a shield
/// that lasts until it absorbs a hazard).
///
/// # Example
///
/// ```
/// use twinfire_core::entity::components::{StatusEffects, StatusFlags};
///
/// let mut status = StatusEffects::default();
/// status.apply(StatusFlags::IMMUNE, 10, Some(5));
/// assert!(status.contains(StatusFlags::IMMUNE));
///
/// assert!(status.expire(14).is_empty());
/// assert_eq!(status.expire(15), StatusFlags::IMMUNE);
/// assert!(!status.contains(StatusFlags::IMMUNE));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    flags: StatusFlags,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    expiries: Vec<Expiry>,
}

impl StatusEffects {
    /// Creates status effects with the given flags and no timers.
    #[must_use]
    pub const fn new(flags: StatusFlags) -> Self {
        Self {
            flags,
            expiries: Vec::new(),
        }
    }

    /// Current flag set.
    #[must_use]
    pub const fn flags(&self) -> StatusFlags {
        self.flags
    }

    /// Returns `true` if every flag in `flag` is set.
    #[must_use]
    pub const fn contains(&self, flag: StatusFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Sets `flag` with no expiry, cancelling any pending timer on it.
    pub fn insert(&mut self, flag: StatusFlags) {
        self.flags.insert(flag);
        self.expiries.retain(|e| e.flag != flag);
    }

    /// Sets `flag` starting at `now`.
    ///
    /// # Arguments
    ///
    /// * `flag` - The flag to set
    /// * `now` - Current tick
    /// * `duration` - Ticks until expiry, or `None` to hold until cleared
    ///
    /// Re-applying a flag restarts its timer.
    pub fn apply(&mut self, flag: StatusFlags, now: Tick, duration: Option<Tick>) {
        self.insert(flag);
        if let Some(duration) = duration {
            self.expiries.push(Expiry {
                flag,
                expires_at: now + duration,
            });
        }
    }

    /// Sets `flag` until the absolute tick `expires_at`.
    pub fn insert_until(&mut self, flag: StatusFlags, expires_at: Tick) {
        self.insert(flag);
        self.expiries.push(Expiry { flag, expires_at });
    }

    /// Clears `flag` and its timer.
    pub fn clear(&mut self, flag: StatusFlags) {
        self.flags.remove(flag);
        self.expiries.retain(|e| e.flag != flag);
    }

    /// Expiry tick of `flag`, if it is set and timed.
    #[must_use]
    pub fn expires_at(&self, flag: StatusFlags) -> Option<Tick> {
        self.expiries
            .iter()
            .find(|e| e.flag == flag)
            .map(|e| e.expires_at)
    }

    /// Clears every timed flag whose expiry is at or before `now`.
    ///
    /// # Returns
    ///
    /// The flags that were cleared.
    pub fn expire(&mut self, now: Tick) -> StatusFlags {
        let mut expired = StatusFlags::empty();
        self.expiries.retain(|e| {
            if now >= e.expires_at {
                expired.insert(e.flag);
                false
            } else {
                true
            }
        });
        self.flags.remove(expired);
        expired
    }
}

// =============================================================================
// Ships
// =============================================================================

/// Direction a ship's weapons fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Toward the top of the field
    #[default]
    Up,
    /// Toward the bottom of the field
    Down,
}

impl Facing {
    /// Sign of the `y` velocity of projectiles fired this way.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Up => -1.0,
            Self::Down => 1.0,
        }
    }
}

/// Player weapon categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// Fast direct-hit projectile
    Bullet,
    /// Guided missile with a lingering blast
    Missile,
    /// Beam anchored to the firing ship
    Laser,
}

/// Random effects granted by mystery pickups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MysteryEffect {
    /// One-shot shield
    Shield,
    /// Temporary immunity
    Invincibility,
    /// Halved weapon cooldown
    Empower,
    /// Enlarged projectiles
    ScaledWeapon,
    /// Ammunition restored (limited-ammo mode)
    AmmoRefill,
    /// Every alien stops moving and firing
    FreezeAliens,
    /// Flat score bonus
    BonusPoints,
    /// Weapons locked
    Disarm,
    /// Steering inverted
    ReverseControls,
    /// Flat score deduction
    ScorePenalty,
}

impl MysteryEffect {
    /// Every effect, in pool order.
    pub const ALL: [Self; 10] = [
        Self::Shield,
        Self::Invincibility,
        Self::Empower,
        Self::ScaledWeapon,
        Self::AmmoRefill,
        Self::FreezeAliens,
        Self::BonusPoints,
        Self::Disarm,
        Self::ReverseControls,
        Self::ScorePenalty,
    ];

    /// Name shown on screen after the effect is picked up.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Shield => "Shield",
            Self::Invincibility => "Invincible",
            Self::Empower => "Rapid Fire",
            Self::ScaledWeapon => "Big Shots",
            Self::AmmoRefill => "Ammo Refill",
            Self::FreezeAliens => "Freeze",
            Self::BonusPoints => "Bonus Points",
            Self::Disarm => "Disarmed",
            Self::ReverseControls => "Reversed",
            Self::ScorePenalty => "Point Penalty",
        }
    }

    /// Returns `true` for effects that hurt the player who picked them up.
    #[must_use]
    pub const fn is_penalty(self) -> bool {
        matches!(
            self,
            Self::Disarm | Self::ReverseControls | Self::ScorePenalty
        )
    }
}

/// Transient on-screen feedback for a picked-up effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectLabel {
    /// The effect that was applied
    pub effect: MysteryEffect,
    /// First tick on which the label is no longer shown
    pub expires_at: Tick,
}

/// Components for player ships.
///
/// Ships are never deallocated mid-match: a destroyed ship loses
/// [`StatusFlags::ALIVE`] and stays in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipComponents {
    /// Owning player
    pub player: PlayerId,
    /// Position and image size
    pub body: Body,
    /// Transient states
    pub status: StatusEffects,
    /// Firing direction
    pub facing: Facing,
    /// Top-left position the ship returns to after a hit
    pub spawn_point: Vec2,
    /// Remaining ammunition, `None` when ammunition is unlimited
    pub ammo: Option<u32>,
    /// Tick of the last accepted shot
    pub last_fire_tick: Option<Tick>,
    /// Kills since the last laser shot
    pub kills: u32,
    /// Label of the most recent mystery effect
    pub effect_label: Option<EffectLabel>,
}

impl ShipComponents {
    /// Creates a live ship at `spawn_point`.
    #[must_use]
    pub fn new(player: PlayerId, spawn_point: Vec2, size: Vec2, facing: Facing) -> Self {
        Self {
            player,
            body: Body::new(spawn_point, size),
            status: StatusEffects::default(),
            facing,
            spawn_point,
            ammo: None,
            last_fire_tick: None,
            kills: 0,
            effect_label: None,
        }
    }

    /// Returns `true` while the ship takes part in the match.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.status.contains(StatusFlags::ALIVE)
    }

    /// Point from which projectiles leave the ship.
    #[must_use]
    pub fn muzzle(&self) -> Vec2 {
        let rect = self.body.rect();
        match self.facing {
            Facing::Up => Vec2::new(rect.center().x, rect.top()),
            Facing::Down => Vec2::new(rect.center().x, rect.bottom()),
        }
    }
}

// =============================================================================
// Aliens
// =============================================================================

/// Alien role, checked once at resolution entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlienKind {
    /// Destroyed by any qualifying hit
    Regular,
    /// Destroyed once `hit_count` reaches `threshold`
    Boss {
        /// Hits required to destroy the boss
        threshold: u32,
    },
}

/// Components for aliens and bosses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlienComponents {
    /// Regular or boss
    pub kind: AlienKind,
    /// Position, image size and fleet velocity
    pub body: Body,
    /// Transient states (immunity, freeze)
    pub status: StatusEffects,
    /// Qualifying hits taken
    pub hit_count: u32,
    /// Spawned by splitting a destroyed parent
    pub is_baby: bool,
    /// Tick of this alien's last shot
    pub last_bullet_time: Option<Tick>,
}

impl AlienComponents {
    /// Creates a regular alien.
    #[must_use]
    pub fn regular(body: Body) -> Self {
        Self {
            kind: AlienKind::Regular,
            body,
            status: StatusEffects::default(),
            hit_count: 0,
            is_baby: false,
            last_bullet_time: None,
        }
    }

    /// Creates a boss that needs `threshold` hits.
    #[must_use]
    pub fn boss(body: Body, threshold: u32) -> Self {
        Self {
            kind: AlienKind::Boss { threshold },
            ..Self::regular(body)
        }
    }

    /// Returns `true` for the multi-hit boss variant.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        matches!(self.kind, AlienKind::Boss { .. })
    }

    /// Returns `true` while hazards can resolve against this alien.
    ///
    /// Frozen aliens stay targetable; only immunity excludes them.
    #[must_use]
    pub const fn is_targetable(&self) -> bool {
        !self.status.contains(StatusFlags::IMMUNE)
    }
}

// =============================================================================
// Projectiles
// =============================================================================

/// Countdown state of a missile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissileState {
    /// Direct hit registered or manually exploded
    pub detonated: bool,
    /// Tick the missile detonated on
    pub detonated_at: Option<Tick>,
    /// Remaining blast ticks
    pub destroy_delay: u32,
}

/// Projectile categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Player bullet; persists until it leaves the field
    Bullet,
    /// Player beam; persists until `expires_at`
    Laser {
        /// First tick on which the beam is gone
        expires_at: Tick,
    },
    /// Player missile
    Missile(MissileState),
    /// Alien bullet
    EnemyBullet,
}

/// Who fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// A player ship
    Player(PlayerId),
    /// An alien
    Alien(EntityId),
}

/// Components for projectiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileComponents {
    /// Category and category state
    pub kind: ProjectileKind,
    /// Firing entity
    pub owner: Owner,
    /// Position, size and velocity
    pub body: Body,
}

impl ProjectileComponents {
    /// Owning player, if fired by a ship.
    #[must_use]
    pub const fn player(&self) -> Option<PlayerId> {
        match self.owner {
            Owner::Player(player) => Some(player),
            Owner::Alien(_) => None,
        }
    }

    /// Weapon category for player projectiles.
    #[must_use]
    pub const fn weapon(&self) -> Option<WeaponKind> {
        match self.kind {
            ProjectileKind::Bullet => Some(WeaponKind::Bullet),
            ProjectileKind::Laser { .. } => Some(WeaponKind::Laser),
            ProjectileKind::Missile(_) => Some(WeaponKind::Missile),
            ProjectileKind::EnemyBullet => None,
        }
    }

    /// Missile state, if this is a missile.
    #[must_use]
    pub const fn missile(&self) -> Option<&MissileState> {
        match &self.kind {
            ProjectileKind::Missile(state) => Some(state),
            _ => None,
        }
    }

    /// Mutable missile state, if this is a missile.
    #[must_use]
    pub fn missile_mut(&mut self) -> Option<&mut MissileState> {
        match &mut self.kind {
            ProjectileKind::Missile(state) => Some(state),
            _ => None,
        }
    }

    /// Current screen rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }
}

// =============================================================================
// Obstacles and Pickups
// =============================================================================

/// Components for environmental obstacles (drifting debris).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleComponents {
    /// Position, size and drift
    pub body: Body,
}

/// Pickup categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    /// Restores one health point
    Health,
    /// Hands a new weapon to the external weapon collaborator
    Weapon,
    /// Random effect from the mode-filtered pool
    Mystery,
}

/// Components for power-up pickups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupComponents {
    /// What the pickup grants
    pub kind: PickupKind,
    /// Position, size and drift
    pub body: Body,
}
