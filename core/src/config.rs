use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// What happens to a participant whose health drops to zero.
///
/// Must be the same on every client of one deployment: it changes the live
/// count, the termination condition and the final snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Elimination {
    /// Drop the participant from the world.
    #[default]
    Remove,
    /// Keep it as a stationary, non-colliding ghost.
    Ghost,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub step_seconds: f64,
    pub max_ticks: u64,
    pub spawn_span: f64,
    pub playfield_half_extent: f64,
    pub entity_half_size: f64,
    pub participant_speed: f64,
    pub hostile_speed: f64,
    pub resource_speed: f64,
    pub initial_health: i32,
    pub min_hostiles: usize,
    pub min_resources: usize,
    pub resource_ratio: f64,
    pub elimination: Elimination,
    pub start_debounce_seconds: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            step_seconds: STEP_SECONDS,
            max_ticks: MAX_TICKS,
            spawn_span: SPAWN_SPAN,
            playfield_half_extent: PLAYFIELD_HALF_EXTENT,
            entity_half_size: ENTITY_HALF_SIZE,
            participant_speed: PARTICIPANT_SPEED,
            hostile_speed: HOSTILE_SPEED,
            resource_speed: RESOURCE_SPEED,
            initial_health: INITIAL_HEALTH,
            min_hostiles: MIN_HOSTILES,
            min_resources: MIN_RESOURCES,
            resource_ratio: RESOURCE_RATIO,
            elimination: Elimination::Remove,
            start_debounce_seconds: START_DEBOUNCE_SECONDS,
        }
    }
}

impl MatchConfig {
    pub fn with_elimination(mut self, elimination: Elimination) -> Self {
        self.elimination = elimination;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Reject values no match can run with. Configs read from outside should
    /// pass through here before a match starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step_seconds.is_finite() || self.step_seconds <= 0.0 {
            return Err(ConfigError::StepSeconds(self.step_seconds));
        }
        if !self.entity_half_size.is_finite() || self.entity_half_size < 0.0 {
            return Err(ConfigError::EntityHalfSize(self.entity_half_size));
        }
        if !self.playfield_half_extent.is_finite() || self.playfield_half_extent < 0.0 {
            return Err(ConfigError::PlayfieldHalfExtent(self.playfield_half_extent));
        }
        if !self.resource_ratio.is_finite() {
            return Err(ConfigError::ResourceRatio(self.resource_ratio));
        }
        Ok(())
    }

    /// `max(min_hostiles, player_count)`.
    pub fn hostile_count(&self, player_count: usize) -> usize {
        self.min_hostiles.max(player_count)
    }

    /// `max(min_resources, floor(player_count * resource_ratio))`.
    pub fn resource_count(&self, player_count: usize) -> usize {
        let scaled = (player_count as f64 * self.resource_ratio).floor() as usize;
        self.min_resources.max(scaled)
    }
}
