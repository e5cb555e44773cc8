//! Per-match score and health bookkeeping.
//!
//! Scores are signed: breach penalties and the score-penalty effect may push a
//! player below zero.

use serde::{Deserialize, Serialize};

use crate::entity::PlayerId;

/// Score and health of one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Current score
    pub score: i64,
    /// Remaining health points
    pub health: u32,
}

/// Stats of both players plus the session high score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    players: [PlayerStats; 2],
    high_score: i64,
}

impl Scoreboard {
    /// Both players at zero score with `starting_health`.
    #[must_use]
    pub fn new(starting_health: u32) -> Self {
        let stats = PlayerStats {
            score: 0,
            health: starting_health,
        };
        Self {
            players: [stats; 2],
            high_score: 0,
        }
    }

    /// Stats of `player`.
    #[must_use]
    pub const fn player(&self, player: PlayerId) -> &PlayerStats {
        &self.players[player.index()]
    }

    /// Score of `player`.
    #[must_use]
    pub const fn score(&self, player: PlayerId) -> i64 {
        self.players[player.index()].score
    }

    /// Health of `player`.
    #[must_use]
    pub const fn health(&self, player: PlayerId) -> u32 {
        self.players[player.index()].health
    }

    /// Highest score seen this session.
    #[must_use]
    pub const fn high_score(&self) -> i64 {
        self.high_score
    }

    /// Adds `amount` (possibly negative) to `player`'s score and raises the
    /// high score if it was beaten.
    pub fn credit(&mut self, player: PlayerId, amount: i64) {
        let stats = &mut self.players[player.index()];
        stats.score += amount;
        self.high_score = self.high_score.max(stats.score);
    }

    /// Removes one health point.
    ///
    /// # Returns
    ///
    /// Health remaining afterwards.
    pub fn damage(&mut self, player: PlayerId) -> u32 {
        let stats = &mut self.players[player.index()];
        stats.health = stats.health.saturating_sub(1);
        stats.health
    }

    /// Adds one health point up to `max`.
    ///
    /// # Returns
    ///
    /// `true` if health increased.
    pub fn heal(&mut self, player: PlayerId, max: u32) -> bool {
        let stats = &mut self.players[player.index()];
        if stats.health < max {
            stats.health += 1;
            true
        } else {
            false
        }
    }

    /// Sets `player`'s health outright.
    pub fn set_health(&mut self, player: PlayerId, health: u32) {
        self.players[player.index()].health = health;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_tracks_high_score() {
        let mut board = Scoreboard::new(3);
        board.credit(PlayerId::One, 40);
        board.credit(PlayerId::Two, 25);
        board.credit(PlayerId::One, -30);
        assert_eq!(board.score(PlayerId::One), 10);
        assert_eq!(board.score(PlayerId::Two), 25);
        assert_eq!(board.high_score(), 40);
    }

    #[test]
    fn scores_may_go_negative() {
        let mut board = Scoreboard::new(3);
        board.credit(PlayerId::Two, -25);
        assert_eq!(board.score(PlayerId::Two), -25);
        assert_eq!(board.high_score(), 0);
    }

    #[test]
    fn damage_saturates() {
        let mut board = Scoreboard::new(1);
        assert_eq!(board.damage(PlayerId::One), 0);
        assert_eq!(board.damage(PlayerId::One), 0);
        assert_eq!(board.health(PlayerId::Two), 1);
    }

    #[test]
    fn heal_respects_cap() {
        let mut board = Scoreboard::new(4);
        assert!(board.heal(PlayerId::One, 5));
        assert!(!board.heal(PlayerId::One, 5));
        assert_eq!(board.player(PlayerId::One).health, 5);
    }
}
