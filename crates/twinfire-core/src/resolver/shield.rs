//! Dedicated shield pass.

use tracing::trace;

use crate::config::CombatConfig;
use crate::entity::EntityTag;
use crate::gate::{absorb, ship_gate, Gate};
use crate::overlap::first_overlapping;
use crate::world::World;

use super::{hostile_hazards, Resolver};

/// Lets every shielded ship absorb one overlapping hostile hazard before any
/// damaging stage runs.
///
/// Hazards are checked in category order (alien bodies, enemy bullets,
/// obstacles) and by ID within a category. Only the first overlap is
/// absorbed; the spent shield guards the ship for the rest of the tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShieldResolver;

impl Resolver for ShieldResolver {
    fn name(&self) -> &'static str {
        "shield"
    }

    fn resolve(&self, world: &mut World, _config: &CombatConfig) {
        for ship_id in world.arena.ids_with_tag(EntityTag::Ship) {
            let Some(ship) = world.arena.ship(ship_id) else {
                continue;
            };
            if ship_gate(ship) != Gate::Shield {
                continue;
            }
            let rect = ship.body.rect();
            let hazards = hostile_hazards(&world.arena);
            if let Some(hazard) = first_overlapping(&rect, &hazards) {
                trace!(%ship_id, %hazard, "shield pass absorbing");
                absorb(world, ship_id, hazard);
            }
        }
    }
}
