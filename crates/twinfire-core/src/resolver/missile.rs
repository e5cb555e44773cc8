//! Missile contact, blast and countdown.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::animation::BlastGeometry;
use crate::config::CombatConfig;
use crate::entity::components::MissileState;
use crate::entity::{EntityId, EntityTag, PlayerId};
use crate::event::{CombatEvent, SoundEffect};
use crate::gate::targetable_aliens;
use crate::overlap::overlapping;
use crate::world::World;

use super::{blast_frame, detonate, strike_alien, Resolver};

/// Resolves player missiles against aliens.
///
/// A flying missile that touches a targetable alien detonates and strikes
/// every alien it touches. While the blast plays, every alien inside the
/// blast rectangle is struck once per missile; the blast ledger records each
/// `(missile, alien)` pair so repeated frames never re-resolve it. When the
/// countdown reaches zero the missile is removed and its ledger entries
/// retired.
pub struct MissileResolver {
    geometry: Arc<dyn BlastGeometry>,
}

impl MissileResolver {
    /// Creates the resolver with the blast geometry used for missiles.
    #[must_use]
    pub fn new(geometry: Arc<dyn BlastGeometry>) -> Self {
        Self { geometry }
    }

    fn strike_new(
        world: &mut World,
        config: &CombatConfig,
        missile: EntityId,
        player: PlayerId,
        aliens: Vec<EntityId>,
        impact: bool,
    ) {
        for alien in aliens {
            if !world.arena.contains(alien) || !world.ledger.mark(missile, alien) {
                continue;
            }
            if impact {
                world.emit(CombatEvent::sound(SoundEffect::Impact));
            }
            let outcome = strike_alien(world, config, alien, player);
            trace!(%missile, %alien, ?outcome, "missile strike");
        }
    }
}

impl Resolver for MissileResolver {
    fn name(&self) -> &'static str {
        "missile"
    }

    fn resolve(&self, world: &mut World, config: &CombatConfig) {
        let now = world.tick();

        for missile in world.arena.ids_with_tag(EntityTag::Projectile) {
            let Some((player, state, body)) = world.arena.projectile(missile).and_then(|p| {
                Some((p.player()?, *p.missile()?, p.body))
            }) else {
                continue;
            };

            if !state.detonated {
                let aliens = overlapping(&body.rect(), &targetable_aliens(&world.arena));
                if aliens.is_empty() {
                    continue;
                }
                if detonate(world, missile, now, config.durations.blast_ticks) {
                    debug!(%missile, %player, "missile detonated on contact");
                    world.emit(CombatEvent::MissileDetonated { missile, player });
                }
                Self::strike_new(world, config, missile, player, aliens, false);
                continue;
            }

            if let Some(frame) = blast_frame(&state, now) {
                let blast = self.geometry.blast_rect(body.center(), frame);
                let aliens = overlapping(&blast, &targetable_aliens(&world.arena));
                Self::strike_new(world, config, missile, player, aliens, true);
            }

            if now > state.detonated_at.unwrap_or(now) {
                let remaining = state.destroy_delay.saturating_sub(1);
                if let Some(live) = world
                    .arena
                    .projectile_mut(missile)
                    .and_then(|p| p.missile_mut())
                {
                    *live = MissileState {
                        destroy_delay: remaining,
                        ..state
                    };
                }
                if remaining == 0 {
                    trace!(%missile, "blast finished");
                    world.arena.despawn(missile);
                    world.ledger.retire_hazard(missile);
                }
            }
        }
    }
}
