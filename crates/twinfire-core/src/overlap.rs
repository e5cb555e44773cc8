//! Spatial overlap detection between two entity collections.
//!
//! The detector is a pure function of current rectangles: it never mutates
//! the arena, and the same inputs always produce the same mapping. There is no
//! continuous collision, so a fast projectile may tunnel through a thin
//! target between ticks.

use std::collections::BTreeMap;

use crate::entity::EntityId;
use crate::geometry::Rect;

/// Maps each hazard to the targets it currently overlaps.
///
/// Hazards that overlap nothing are absent from the map. Target lists keep the
/// order of the `targets` slice.
///
/// # Arguments
///
/// * `hazards` - `(id, rect)` pairs of the hazard collection
/// * `targets` - `(id, rect)` pairs of the target collection
///
/// # Example
///
/// ```
/// use twinfire_core::entity::EntityId;
/// use twinfire_core::geometry::Rect;
/// use twinfire_core::overlap::detect_overlaps;
///
/// let bullet = (EntityId::new(1), Rect::new(5.0, 5.0, 2.0, 6.0));
/// let near = (EntityId::new(2), Rect::new(0.0, 0.0, 10.0, 10.0));
/// let far = (EntityId::new(3), Rect::new(50.0, 0.0, 10.0, 10.0));
///
/// let hits = detect_overlaps(&[bullet], &[near, far]);
/// assert_eq!(hits[&EntityId::new(1)], vec![EntityId::new(2)]);
/// ```
#[must_use]
pub fn detect_overlaps(
    hazards: &[(EntityId, Rect)],
    targets: &[(EntityId, Rect)],
) -> BTreeMap<EntityId, Vec<EntityId>> {
    let mut hits = BTreeMap::new();
    for (hazard, hazard_rect) in hazards {
        let found = overlapping(hazard_rect, targets);
        if !found.is_empty() {
            hits.insert(*hazard, found);
        }
    }
    hits
}

/// Targets whose rectangle overlaps `rect`, in slice order.
#[must_use]
pub fn overlapping(rect: &Rect, targets: &[(EntityId, Rect)]) -> Vec<EntityId> {
    targets
        .iter()
        .filter(|(_, target)| rect.intersects(target))
        .map(|(id, _)| *id)
        .collect()
}

/// First target overlapping `rect`, if any.
#[must_use]
pub fn first_overlapping(rect: &Rect, targets: &[(EntityId, Rect)]) -> Option<EntityId> {
    targets
        .iter()
        .find(|(_, target)| rect.intersects(target))
        .map(|(id, _)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u64) -> EntityId {
        EntityId::new(n)
    }

    fn rects(first_id: u64) -> impl Strategy<Value = Vec<(EntityId, Rect)>> {
        let dims = (0.0f32..500.0, 0.0f32..500.0, 1.0f32..80.0, 1.0f32..80.0);
        prop::collection::vec(dims, 0..12).prop_map(move |boxes| {
            boxes
                .into_iter()
                .zip(first_id..)
                .map(|((x, y, w, h), n)| (id(n), Rect::new(x, y, w, h)))
                .collect()
        })
    }

    #[test]
    fn empty_inputs() {
        assert!(detect_overlaps(&[], &[]).is_empty());
        assert!(detect_overlaps(&[(id(1), Rect::new(0.0, 0.0, 1.0, 1.0))], &[]).is_empty());
        assert!(detect_overlaps(&[], &[(id(1), Rect::new(0.0, 0.0, 1.0, 1.0))]).is_empty());
    }

    #[test]
    fn one_hazard_many_targets() {
        let blast = (id(10), Rect::new(0.0, 0.0, 100.0, 100.0));
        let targets = [
            (id(1), Rect::new(10.0, 10.0, 5.0, 5.0)),
            (id(2), Rect::new(200.0, 10.0, 5.0, 5.0)),
            (id(3), Rect::new(90.0, 90.0, 20.0, 20.0)),
        ];
        let hits = detect_overlaps(&[blast], &targets);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[&id(10)], vec![id(1), id(3)]);
    }

    #[test]
    fn misses_are_absent() {
        let hazards = [
            (id(1), Rect::new(0.0, 0.0, 5.0, 5.0)),
            (id(2), Rect::new(100.0, 100.0, 5.0, 5.0)),
        ];
        let targets = [(id(3), Rect::new(2.0, 2.0, 5.0, 5.0))];
        let hits = detect_overlaps(&hazards, &targets);
        assert!(hits.contains_key(&id(1)));
        assert!(!hits.contains_key(&id(2)));
    }

    #[test]
    fn touching_is_not_overlap() {
        let hazards = [(id(1), Rect::new(0.0, 0.0, 5.0, 5.0))];
        let targets = [(id(2), Rect::new(5.0, 0.0, 5.0, 5.0))];
        assert!(detect_overlaps(&hazards, &targets).is_empty());
    }

    #[test]
    fn first_overlapping_respects_order() {
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        let targets = [
            (id(7), Rect::new(100.0, 0.0, 5.0, 5.0)),
            (id(4), Rect::new(10.0, 0.0, 5.0, 5.0)),
            (id(2), Rect::new(20.0, 0.0, 5.0, 5.0)),
        ];
        assert_eq!(first_overlapping(&rect, &targets), Some(id(4)));
        assert_eq!(first_overlapping(&rect, &targets[..1]), None);
    }

    proptest! {
        #[test]
        fn detection_is_repeatable(hazards in rects(0), targets in rects(100)) {
            prop_assert_eq!(
                detect_overlaps(&hazards, &targets),
                detect_overlaps(&hazards, &targets)
            );
        }

        #[test]
        fn swapping_roles_mirrors_pairs(hazards in rects(0), targets in rects(100)) {
            let forward = detect_overlaps(&hazards, &targets);
            let backward = detect_overlaps(&targets, &hazards);
            for (hazard, hit) in &forward {
                for target in hit {
                    prop_assert!(backward[target].contains(hazard));
                }
            }
            let pairs = |map: &BTreeMap<EntityId, Vec<EntityId>>| {
                map.values().map(Vec::len).sum::<usize>()
            };
            prop_assert_eq!(pairs(&forward), pairs(&backward));
        }
    }
}
