//! Entity types for the combat simulation.
//!
//! - [`EntityId`]: Unique identifier for entities
//! - [`PlayerId`]: One of the two players
//! - [`EntityTag`]: Type classification used for filtering
//! - [`EntityInner`]: Type-safe storage for entity-specific components
//! - [`Entity`]: The complete entity container
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use twinfire_core::entity::{Entity, EntityId, EntityInner, EntityTag, PlayerId};
//! use twinfire_core::entity::components::{Facing, ShipComponents};
//!
//! let ship = Entity::new(
//!     EntityId::new(42),
//!     EntityInner::Ship(ShipComponents::new(
//!         PlayerId::One,
//!         Vec2::new(100.0, 700.0),
//!         Vec2::new(40.0, 30.0),
//!         Facing::Up,
//!     )),
//! );
//!
//! assert_eq!(ship.id().as_u64(), 42);
//! assert_eq!(ship.tag(), EntityTag::Ship);
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    AlienComponents, AlienKind, Facing, ObstacleComponents, PickupComponents,
    ProjectileComponents, ShipComponents, StatusEffects, StatusFlags, Tick, WeaponKind,
};

use crate::geometry::{Body, Rect};

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. Entity IDs are immutable
/// once assigned, never reused within a match, and survive save/restore.
///
/// # Ordering
///
/// Entity IDs are ordered by their numeric value, which is used to ensure
/// deterministic iteration order across all entities.
///
/// # Example
///
/// ```
/// use twinfire_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// One of the two players.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerId {
    /// Player one (bottom of the field)
    One,
    /// Player two (bottom in co-op, top in versus)
    Two,
}

impl PlayerId {
    /// Both players in order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Zero-based index into per-player arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// The opposing player.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "P1"),
            Self::Two => write!(f, "P2"),
        }
    }
}

/// Entity type tag.
///
/// Always derived from the [`EntityInner`] variant, so the two can never
/// disagree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTag {
    /// Player ship
    Ship,
    /// Regular alien or boss
    Alien,
    /// Friendly or hostile projectile
    Projectile,
    /// Environmental obstacle
    Obstacle,
    /// Power-up pickup
    Pickup,
}

impl EntityTag {
    /// Snake-case name used in save files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ship => "ship",
            Self::Alien => "alien",
            Self::Projectile => "projectile",
            Self::Obstacle => "obstacle",
            Self::Pickup => "pickup",
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ship => write!(f, "Ship"),
            Self::Alien => write!(f, "Alien"),
            Self::Projectile => write!(f, "Projectile"),
            Self::Obstacle => write!(f, "Obstacle"),
            Self::Pickup => write!(f, "Pickup"),
        }
    }
}

/// Type-safe storage for entity-specific components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Player ship
    Ship(ShipComponents),
    /// Regular alien or boss
    Alien(AlienComponents),
    /// Friendly or hostile projectile
    Projectile(ProjectileComponents),
    /// Environmental obstacle
    Obstacle(ObstacleComponents),
    /// Power-up pickup
    Pickup(PickupComponents),
}

impl EntityInner {
    /// Returns the corresponding `EntityTag` for this inner storage.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Ship(_) => EntityTag::Ship,
            Self::Alien(_) => EntityTag::Alien,
            Self::Projectile(_) => EntityTag::Projectile,
            Self::Obstacle(_) => EntityTag::Obstacle,
            Self::Pickup(_) => EntityTag::Pickup,
        }
    }

    /// The entity's kinematic body.
    #[must_use]
    pub const fn body(&self) -> &Body {
        match self {
            Self::Ship(c) => &c.body,
            Self::Alien(c) => &c.body,
            Self::Projectile(c) => &c.body,
            Self::Obstacle(c) => &c.body,
            Self::Pickup(c) => &c.body,
        }
    }

    /// Mutable access to the entity's kinematic body.
    #[must_use]
    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Self::Ship(c) => &mut c.body,
            Self::Alien(c) => &mut c.body,
            Self::Projectile(c) => &mut c.body,
            Self::Obstacle(c) => &mut c.body,
            Self::Pickup(c) => &mut c.body,
        }
    }

    /// Returns a reference to the ship components, if this is a ship.
    #[must_use]
    pub const fn as_ship(&self) -> Option<&ShipComponents> {
        match self {
            Self::Ship(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the ship components, if this is a ship.
    #[must_use]
    pub fn as_ship_mut(&mut self) -> Option<&mut ShipComponents> {
        match self {
            Self::Ship(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the alien components, if this is an alien.
    #[must_use]
    pub const fn as_alien(&self) -> Option<&AlienComponents> {
        match self {
            Self::Alien(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the alien components, if this is an alien.
    #[must_use]
    pub fn as_alien_mut(&mut self) -> Option<&mut AlienComponents> {
        match self {
            Self::Alien(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the projectile components, if this is a projectile.
    #[must_use]
    pub const fn as_projectile(&self) -> Option<&ProjectileComponents> {
        match self {
            Self::Projectile(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a mutable reference to the projectile components, if this is a projectile.
    #[must_use]
    pub fn as_projectile_mut(&mut self) -> Option<&mut ProjectileComponents> {
        match self {
            Self::Projectile(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the obstacle components, if this is an obstacle.
    #[must_use]
    pub const fn as_obstacle(&self) -> Option<&ObstacleComponents> {
        match self {
            Self::Obstacle(components) => Some(components),
            _ => None,
        }
    }

    /// Returns a reference to the pickup components, if this is a pickup.
    #[must_use]
    pub const fn as_pickup(&self) -> Option<&PickupComponents> {
        match self {
            Self::Pickup(components) => Some(components),
            _ => None,
        }
    }
}

/// A complete entity in the combat simulation.
///
/// # Invariants
///
/// - The `EntityId` must be unique within an arena
/// - The tag is derived from the `EntityInner` variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
}

impl Entity {
    /// Creates a new entity with the given ID and inner storage.
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self { id, inner }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's type tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Returns a reference to the entity's inner component storage.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns a mutable reference to the entity's inner component storage.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Current screen rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.inner.body().rect()
    }

    /// Returns `true` if this entity is a ship.
    #[must_use]
    pub const fn is_ship(&self) -> bool {
        matches!(self.inner, EntityInner::Ship(_))
    }

    /// Returns `true` if this entity is an alien or boss.
    #[must_use]
    pub const fn is_alien(&self) -> bool {
        matches!(self.inner, EntityInner::Alien(_))
    }

    /// Returns `true` if this entity is a projectile.
    #[must_use]
    pub const fn is_projectile(&self) -> bool {
        matches!(self.inner, EntityInner::Projectile(_))
    }

    /// Returns a reference to the ship components, if this is a ship.
    #[must_use]
    pub const fn as_ship(&self) -> Option<&ShipComponents> {
        self.inner.as_ship()
    }

    /// Returns a mutable reference to the ship components, if this is a ship.
    #[must_use]
    pub fn as_ship_mut(&mut self) -> Option<&mut ShipComponents> {
        self.inner.as_ship_mut()
    }

    /// Returns a reference to the alien components, if this is an alien.
    #[must_use]
    pub const fn as_alien(&self) -> Option<&AlienComponents> {
        self.inner.as_alien()
    }

    /// Returns a mutable reference to the alien components, if this is an alien.
    #[must_use]
    pub fn as_alien_mut(&mut self) -> Option<&mut AlienComponents> {
        self.inner.as_alien_mut()
    }

    /// Returns a reference to the projectile components, if this is a projectile.
    #[must_use]
    pub const fn as_projectile(&self) -> Option<&ProjectileComponents> {
        self.inner.as_projectile()
    }

    /// Returns a mutable reference to the projectile components, if this is a projectile.
    #[must_use]
    pub fn as_projectile_mut(&mut self) -> Option<&mut ProjectileComponents> {
        self.inner.as_projectile_mut()
    }
}
