//! Arena module for the combat simulation.
//!
//! The Arena is the container for all entities in a match. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - Entity lifecycle management (spawn/despawn)
//! - Typed lookups and rectangle collection for the overlap detector
//! - Simulation tick tracking
//!
//! # Determinism
//!
//! Entity IDs are monotonically increasing and never reused, and the
//! `BTreeMap`'s natural ordering guarantees that every stage walks entities in
//! the same sequence on every run.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use twinfire_core::arena::Arena;
//! use twinfire_core::entity::{AlienComponents, EntityInner};
//! use twinfire_core::geometry::Body;
//!
//! let mut arena = Arena::new();
//! let a = arena.spawn(EntityInner::Alien(AlienComponents::regular(Body::new(
//!     Vec2::new(0.0, 0.0),
//!     Vec2::splat(10.0),
//! ))));
//! let b = arena.spawn(EntityInner::Alien(AlienComponents::regular(Body::new(
//!     Vec2::new(20.0, 0.0),
//!     Vec2::splat(10.0),
//! ))));
//!
//! let ids: Vec<_> = arena.entity_ids_sorted().collect();
//! assert_eq!(ids, vec![a, b]);
//! assert!(arena.alien(a).is_some());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::components::Tick;
use crate::entity::{
    AlienComponents, Entity, EntityId, EntityInner, EntityTag, ProjectileComponents,
    ShipComponents,
};
use crate::geometry::Rect;

// =============================================================================
// Arena
// =============================================================================

/// Match arena containing all simulation entities.
///
/// # Despawn Semantics
///
/// Despawning an entity that is already gone is a silent no-op. Resolvers
/// rely on this: a target removed earlier in the same tick may be resolved
/// again by a later stage without fault.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// Current simulation tick.
    tick: Tick,
}

impl Arena {
    /// Creates a new empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an arena from saved parts.
    ///
    /// `next_id` is raised above the largest entity ID if needed so future
    /// spawns never collide with restored entities.
    #[must_use]
    pub fn from_parts(next_id: u64, tick: Tick, entities: BTreeMap<EntityId, Entity>) -> Self {
        let floor = entities
            .keys()
            .next_back()
            .map_or(0, |id| id.as_u64() + 1);
        Self {
            next_id: next_id.max(floor),
            entities,
            tick,
        }
    }

    /// Spawns a new entity in the arena.
    ///
    /// # Arguments
    ///
    /// * `inner` - The entity's component storage; the tag is derived from it
    ///
    /// # Returns
    ///
    /// The unique ID assigned to the new entity.
    pub fn spawn(&mut self, inner: EntityInner) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, inner));
        id
    }

    /// Despawns an entity from the arena.
    ///
    /// # Returns
    ///
    /// The removed entity, if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Returns `true` if the entity is still in the arena.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Ship components by ID.
    #[must_use]
    pub fn ship(&self, id: EntityId) -> Option<&ShipComponents> {
        self.get(id).and_then(Entity::as_ship)
    }

    /// Mutable ship components by ID.
    #[must_use]
    pub fn ship_mut(&mut self, id: EntityId) -> Option<&mut ShipComponents> {
        self.get_mut(id).and_then(Entity::as_ship_mut)
    }

    /// Alien components by ID.
    #[must_use]
    pub fn alien(&self, id: EntityId) -> Option<&AlienComponents> {
        self.get(id).and_then(Entity::as_alien)
    }

    /// Mutable alien components by ID.
    #[must_use]
    pub fn alien_mut(&mut self, id: EntityId) -> Option<&mut AlienComponents> {
        self.get_mut(id).and_then(Entity::as_alien_mut)
    }

    /// Projectile components by ID.
    #[must_use]
    pub fn projectile(&self, id: EntityId) -> Option<&ProjectileComponents> {
        self.get(id).and_then(Entity::as_projectile)
    }

    /// Mutable projectile components by ID.
    #[must_use]
    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut ProjectileComponents> {
        self.get_mut(id).and_then(Entity::as_projectile_mut)
    }

    /// Returns an iterator over entity IDs in deterministic (sorted) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over entities in deterministic (sorted by ID) order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Returns an iterator over mutable entities in deterministic order.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    /// IDs of every entity with `tag`, in ID order.
    #[must_use]
    pub fn ids_with_tag(&self, tag: EntityTag) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.tag() == tag)
            .map(Entity::id)
            .collect()
    }

    /// Collects `(id, rect)` pairs for every entity accepted by `pred`.
    ///
    /// This is the input format of
    /// [`detect_overlaps`](crate::overlap::detect_overlaps).
    pub fn collect_rects<F>(&self, mut pred: F) -> Vec<(EntityId, Rect)>
    where
        F: FnMut(&Entity) -> bool,
    {
        self.entities
            .values()
            .filter(|&e| pred(e))
            .map(|e| (e.id(), e.rect()))
            .collect()
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Next ID that [`spawn`](Self::spawn) will hand out.
    #[must_use]
    pub const fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Advances the simulation tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::{Facing, ObstacleComponents};
    use crate::entity::PlayerId;
    use crate::geometry::Body;
    use glam::Vec2;

    fn alien_at(x: f32, y: f32) -> EntityInner {
        EntityInner::Alien(AlienComponents::regular(Body::new(
            Vec2::new(x, y),
            Vec2::splat(10.0),
        )))
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn new_arena_is_empty() {
            let arena = Arena::new();
            assert!(arena.is_empty());
            assert_eq!(arena.current_tick(), 0);
            assert_eq!(arena.next_id(), 0);
        }

        #[test]
        fn spawn_assigns_monotonic_ids() {
            let mut arena = Arena::new();
            let a = arena.spawn(alien_at(0.0, 0.0));
            let b = arena.spawn(alien_at(0.0, 0.0));
            assert!(a < b);
            assert_eq!(arena.entity_count(), 2);
        }

        #[test]
        fn ids_are_not_reused() {
            let mut arena = Arena::new();
            let a = arena.spawn(alien_at(0.0, 0.0));
            arena.despawn(a);
            let b = arena.spawn(alien_at(0.0, 0.0));
            assert_ne!(a, b);
        }

        #[test]
        fn despawn_twice_is_noop() {
            let mut arena = Arena::new();
            let a = arena.spawn(alien_at(0.0, 0.0));
            assert!(arena.despawn(a).is_some());
            assert!(arena.despawn(a).is_none());
            assert!(!arena.contains(a));
        }

        #[test]
        fn advance_tick() {
            let mut arena = Arena::new();
            arena.advance_tick();
            arena.advance_tick();
            assert_eq!(arena.current_tick(), 2);
        }
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn typed_accessors() {
            let mut arena = Arena::new();
            let alien = arena.spawn(alien_at(0.0, 0.0));
            let ship = arena.spawn(EntityInner::Ship(ShipComponents::new(
                PlayerId::One,
                Vec2::ZERO,
                Vec2::splat(10.0),
                Facing::Up,
            )));

            assert!(arena.alien(alien).is_some());
            assert!(arena.ship(alien).is_none());
            assert!(arena.ship(ship).is_some());
            assert!(arena.projectile(ship).is_none());

            arena.alien_mut(alien).unwrap().hit_count = 3;
            assert_eq!(arena.alien(alien).unwrap().hit_count, 3);
        }

        #[test]
        fn ids_with_tag_filters_and_sorts() {
            let mut arena = Arena::new();
            let a = arena.spawn(alien_at(0.0, 0.0));
            arena.spawn(EntityInner::Obstacle(ObstacleComponents {
                body: Body::new(Vec2::ZERO, Vec2::ONE),
            }));
            let c = arena.spawn(alien_at(0.0, 0.0));
            assert_eq!(arena.ids_with_tag(EntityTag::Alien), vec![a, c]);
        }

        #[test]
        fn collect_rects_uses_current_bodies() {
            let mut arena = Arena::new();
            let a = arena.spawn(alien_at(5.0, 6.0));
            let rects = arena.collect_rects(Entity::is_alien);
            assert_eq!(rects, vec![(a, Rect::new(5.0, 6.0, 10.0, 10.0))]);
        }
    }

    mod restore_tests {
        use super::*;

        #[test]
        fn from_parts_raises_next_id() {
            let mut entities = BTreeMap::new();
            let id = EntityId::new(41);
            entities.insert(id, Entity::new(id, alien_at(0.0, 0.0)));
            let mut arena = Arena::from_parts(3, 17, entities);
            assert_eq!(arena.next_id(), 42);
            assert_eq!(arena.current_tick(), 17);
            assert_eq!(arena.spawn(alien_at(0.0, 0.0)), EntityId::new(42));
        }
    }
}
