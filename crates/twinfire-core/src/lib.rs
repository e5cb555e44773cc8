//! # Twinfire Core
//!
//! Combat resolution engine for Twinfire, a two-player arcade shooter.
//!
//! Each tick decides, in a fixed order, which hazards hit which targets and
//! what follows: removals, splits, score credits, health loss, and transient
//! states such as shields, immunity and freeze. Presentation, audio and HUD
//! live outside the crate and are driven through the event stream.
//!
//! ## Architecture
//!
//! - **Entities**: ships, aliens and bosses, projectiles, obstacles, pickups,
//!   stored in an [`arena::Arena`] keyed by stable [`entity::EntityId`]s
//! - **Resolvers**: the tick pipeline in [`resolver`], each stage a
//!   [`resolver::Resolver`] run against the shared [`world::World`]
//! - **Collaborators**: [`sink::CombatSink`] for audio, animation and stats,
//!   [`animation::BlastGeometry`] for missile blast frames
//!
//! ## Usage
//!
//! ```
//! use twinfire_core::config::CombatConfig;
//! use twinfire_core::entity::{PlayerId, WeaponKind};
//! use twinfire_core::simulation::{FireOutcome, Simulation};
//!
//! let mut sim = Simulation::new(CombatConfig::default(), 42)?;
//! sim.spawn_fleet(2, 5);
//!
//! assert!(matches!(sim.fire(PlayerId::One, WeaponKind::Bullet), FireOutcome::Fired(_)));
//! for _ in 0..60 {
//!     let _events = sim.step();
//! }
//! assert_eq!(sim.tick(), 60);
//! # Ok::<(), twinfire_core::config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod animation;
pub mod arena;
pub mod config;
pub mod entity;
pub mod event;
pub mod gate;
pub mod geometry;
pub mod ledger;
pub mod overlap;
pub mod resolver;
pub mod scoreboard;
pub mod simulation;
pub mod sink;
pub mod snapshot;
pub mod world;

#[cfg(test)]
mod tests;
