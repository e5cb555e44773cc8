//! Collaborator interface for presentation, audio and stats.
//!
//! The engine itself never renders, plays audio or redraws a HUD. A front end
//! implements [`CombatSink`] and feeds each tick's events through
//! [`dispatch`]. Every method has an empty default so an implementation only
//! overrides what it cares about.

use glam::Vec2;

use crate::entity::components::MysteryEffect;
use crate::entity::{EntityId, PlayerId};
use crate::event::{CombatEvent, SoundEffect};

/// Receives collaborator calls derived from [`CombatEvent`]s.
///
/// # Example
///
/// ```
/// use twinfire_core::entity::PlayerId;
/// use twinfire_core::event::CombatEvent;
/// use twinfire_core::sink::{dispatch, CombatSink};
///
/// #[derive(Default)]
/// struct Totals([i64; 2]);
///
/// impl CombatSink for Totals {
///     fn credit_score(&mut self, player: PlayerId, amount: i64) {
///         self.0[player.index()] += amount;
///     }
/// }
///
/// let mut totals = Totals::default();
/// dispatch(
///     &[CombatEvent::ScoreCredited { player: PlayerId::Two, amount: 10 }],
///     &mut totals,
/// );
/// assert_eq!(totals.0, [0, 10]);
/// ```
pub trait CombatSink {
    /// Fire-and-forget sound playback.
    fn play_sound(&mut self, _effect: SoundEffect) {}

    /// A player's score changed.
    fn credit_score(&mut self, _player: PlayerId, _amount: i64) {}

    /// Redraw both scores.
    fn refresh_score_display(&mut self) {}

    /// Redraw the high score.
    fn refresh_high_score(&mut self) {}

    /// Redraw both health bars.
    fn refresh_health_display(&mut self) {}

    /// Redraw a player's ammunition counter.
    fn refresh_ammo_display(&mut self, _player: PlayerId) {}

    /// Start the destruction animation of an entity.
    fn play_destruction_animation(&mut self, _entity: EntityId, _center: Vec2) {}

    /// A health pickup was collected.
    fn increment_health(&mut self, _player: PlayerId) {}

    /// A weapon pickup was collected.
    fn change_weapon(&mut self, _player: PlayerId) {}

    /// A ship took an unguarded hit.
    fn ship_hit(&mut self, _player: PlayerId) {}

    /// Show a mystery effect label.
    fn show_effect(&mut self, _player: PlayerId, _effect: MysteryEffect) {}

    /// Any event, before it is routed to the specific calls above.
    fn observe(&mut self, _event: &CombatEvent) {}
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CombatSink for NullSink {}

/// Routes events to the matching collaborator calls, in order.
pub fn dispatch<S: CombatSink + ?Sized>(events: &[CombatEvent], sink: &mut S) {
    for event in events {
        sink.observe(event);
        match event {
            CombatEvent::Sound { effect } => sink.play_sound(*effect),
            CombatEvent::ScoreCredited { player, amount } => sink.credit_score(*player, *amount),
            CombatEvent::ScoreRefresh => sink.refresh_score_display(),
            CombatEvent::HighScoreRefresh => sink.refresh_high_score(),
            CombatEvent::HealthRefresh => sink.refresh_health_display(),
            CombatEvent::AmmoRefresh { player } => sink.refresh_ammo_display(*player),
            CombatEvent::DestructionAnimation { entity, center } => {
                sink.play_destruction_animation(*entity, *center);
            }
            CombatEvent::IncrementHealth { player } => sink.increment_health(*player),
            CombatEvent::WeaponChange { player } => sink.change_weapon(*player),
            CombatEvent::ShipHit { player } => sink.ship_hit(*player),
            CombatEvent::ShowEffect { player, effect } => sink.show_effect(*player, *effect),
            _ => {}
        }
    }
}
