//! Aliens reaching the bottom edge.

use tracing::debug;

use crate::config::CombatConfig;
use crate::entity::{AlienComponents, EntityId, EntityTag, PlayerId};
use crate::event::CombatEvent;
use crate::world::World;

use super::Resolver;

/// Removes every alien whose rectangle reaches the bottom of the field.
///
/// A breach costs both players `breach_penalty`, whoever was closer. No
/// sound is played. A breaching boss also clears the blast ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreachResolver;

impl Resolver for BreachResolver {
    fn name(&self) -> &'static str {
        "breach"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        let height = config.field.height;
        let breached: Vec<EntityId> = world
            .arena
            .ids_with_tag(EntityTag::Alien)
            .into_iter()
            .filter(|&id| {
                world
                    .arena
                    .alien(id)
                    .is_some_and(|a| a.body.rect().bottom() >= height)
            })
            .collect();

        for alien in breached {
            let Some(entity) = world.arena.despawn(alien) else {
                continue;
            };
            let boss = entity.as_alien().is_some_and(AlienComponents::is_boss);

            let penalty = -config.scoring.breach_penalty;
            for player in PlayerId::ALL {
                world.scores.credit(player, penalty);
                world.emit(CombatEvent::ScoreCredited {
                    player,
                    amount: penalty,
                });
            }
            world.emit(CombatEvent::ScoreRefresh);
            world.emit(CombatEvent::HighScoreRefresh);
            world.emit(CombatEvent::AlienBreached { alien });
            if boss {
                world.ledger.clear();
            }
            debug!(%alien, boss, "alien breached");
        }
    }
}
