//! Collaborator that logs every call through `tracing`.

use glam::Vec2;
use tracing::{debug, info, trace};
use twinfire_core::entity::components::MysteryEffect;
use twinfire_core::entity::{EntityId, PlayerId};
use twinfire_core::event::{CombatEvent, SoundEffect};
use twinfire_core::sink::CombatSink;

/// Logs collaborator calls and keeps a few running totals for the summary.
#[derive(Debug, Default)]
pub struct LogSink {
    /// Sounds requested
    pub sounds: usize,
    /// Destruction animations started
    pub explosions: usize,
    /// Unguarded ship hits per player
    pub ship_hits: [u32; 2],
    /// Aliens destroyed, including contact kills
    pub aliens_destroyed: usize,
    /// Aliens that reached the bottom edge
    pub breaches: usize,
    /// Hazards absorbed by shields
    pub absorbed: usize,
}

impl CombatSink for LogSink {
    fn play_sound(&mut self, effect: SoundEffect) {
        self.sounds += 1;
        trace!(?effect, "sound");
    }

    fn credit_score(&mut self, player: PlayerId, amount: i64) {
        debug!(%player, amount, "score");
    }

    fn refresh_health_display(&mut self) {
        trace!("health display refreshed");
    }

    fn refresh_ammo_display(&mut self, player: PlayerId) {
        trace!(%player, "ammo display refreshed");
    }

    fn play_destruction_animation(&mut self, entity: EntityId, center: Vec2) {
        self.explosions += 1;
        trace!(%entity, x = center.x, y = center.y, "explosion");
    }

    fn increment_health(&mut self, player: PlayerId) {
        debug!(%player, "health pickup");
    }

    fn change_weapon(&mut self, player: PlayerId) {
        debug!(%player, "weapon pickup");
    }

    fn ship_hit(&mut self, player: PlayerId) {
        self.ship_hits[player.index()] += 1;
        debug!(%player, "ship hit");
    }

    fn show_effect(&mut self, player: PlayerId, effect: MysteryEffect) {
        info!(%player, effect = effect.display_name(), "mystery effect");
    }

    fn observe(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::AlienDestroyed { .. } => self.aliens_destroyed += 1,
            CombatEvent::AlienBreached { alien } => {
                self.breaches += 1;
                debug!(%alien, "alien breached");
            }
            CombatEvent::ShieldAbsorbed { player, hazard } => {
                self.absorbed += 1;
                debug!(%player, %hazard, "shield absorbed");
            }
            CombatEvent::BossSpawned { boss, threshold } => {
                info!(%boss, threshold, "boss incoming");
            }
            CombatEvent::BossDestroyed { boss, by } => info!(%boss, %by, "boss down"),
            CombatEvent::ShipDestroyed { player } => info!(%player, "ship destroyed"),
            CombatEvent::MatchOver { winner } => info!(?winner, "match over"),
            _ => {}
        }
    }
}
