//! Match-over detection.

use tracing::info;

use crate::config::CombatConfig;
use crate::entity::PlayerId;
use crate::event::CombatEvent;
use crate::world::World;

use super::Resolver;

/// Ends the match once its losing condition holds.
///
/// In versus mode the match ends when a ship goes down, and the other
/// player wins. Otherwise it ends when every ship is down. The match-over
/// event is emitted once.
#[derive(Debug, Clone, Copy, Default)]
pub struct HousekeepingResolver;

impl Resolver for HousekeepingResolver {
    fn name(&self) -> &'static str {
        "housekeeping"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        if world.over {
            return;
        }
        let alive = |player: PlayerId| world.ship(player).is_some_and(|s| s.is_alive());
        let (one, two) = (alive(PlayerId::One), alive(PlayerId::Two));

        let outcome = if config.mode.is_versus() {
            match (one, two) {
                (true, true) => None,
                (true, false) => Some(Some(PlayerId::One)),
                (false, true) => Some(Some(PlayerId::Two)),
                (false, false) => Some(None),
            }
        } else {
            (!one && !two).then_some(None)
        };

        if let Some(winner) = outcome {
            info!(tick = world.tick(), ?winner, "match over");
            world.over = true;
            world.emit(CombatEvent::MatchOver { winner });
        }
    }
}
