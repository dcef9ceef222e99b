//! Engine configuration.
//!
//! All tuning constants of the selection and scoring math live here so a
//! host can adjust them without touching the engine. Defaults reproduce the
//! standard game.

use serde::{Deserialize, Serialize};

/// Engine tuning parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Points needed within a level to reach the next one.
    pub level_up_points: f64,

    /// Decay value a fresh player starts with in every category.
    pub player_initial_decay: f64,

    /// Pool-wide category decay start value.
    pub category_initial_decay: f64,

    /// Growth of the pool-wide category decay per round.
    pub category_decay_step: f64,

    /// Average clothing count of a female player (strip weighting).
    pub female_clothing: i32,

    /// Average clothing count of a male player (strip weighting).
    pub male_clothing: i32,

    /// Players required to start or resume a game.
    pub min_players: usize,

    /// Upper bound on draw/match attempts before a round gives up.
    pub max_draw_attempts: usize,

    /// Milliseconds after the last action during which resume is offered.
    pub resume_window_ms: u64,

    /// Token in quest texts replaced by the partner's name.
    pub partner_placeholder: String,

    /// Minimum starting level when the "already drunk" setting is on.
    pub drunk_level: u32,

    /// Divisor applied to partial rewards (whole-pool quests).
    pub partial_reward_divisor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            level_up_points: 100.0,
            player_initial_decay: 2.1,
            category_initial_decay: 1.0,
            category_decay_step: 1.0,
            female_clothing: 5,
            male_clothing: 4,
            min_players: 2,
            max_draw_attempts: 1000,
            resume_window_ms: 12 * 60 * 60 * 1000,
            partner_placeholder: "{partner}".to_string(),
            drunk_level: 4,
            partial_reward_divisor: 2.0,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Use a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the points ceiling for a level-up.
    #[must_use]
    pub fn with_level_up_points(mut self, points: f64) -> Self {
        self.level_up_points = points;
        self
    }

    /// Set the minimum number of players.
    #[must_use]
    pub fn with_min_players(mut self, count: usize) -> Self {
        self.min_players = count;
        self
    }

    /// Set the retry bound for quest preparation.
    #[must_use]
    pub fn with_max_draw_attempts(mut self, attempts: usize) -> Self {
        self.max_draw_attempts = attempts;
        self
    }

    /// Set the resume window in milliseconds.
    #[must_use]
    pub fn with_resume_window_ms(mut self, window: u64) -> Self {
        self.resume_window_ms = window;
        self
    }

    /// Set the partner placeholder token.
    #[must_use]
    pub fn with_partner_placeholder(mut self, token: impl Into<String>) -> Self {
        self.partner_placeholder = token.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.level_up_points, 100.0);
        assert_eq!(config.min_players, 2);
        assert_eq!(config.resume_window_ms, 43_200_000);
        assert!((config.player_initial_decay - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_seed(123)
            .with_min_players(3)
            .with_partner_placeholder("%p");

        assert_eq!(config.seed, Some(123));
        assert_eq!(config.min_players, 3);
        assert_eq!(config.partner_placeholder, "%p");
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"seed": 9, "min_players": 4}"#).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.min_players, 4);
        assert_eq!(config.male_clothing, 4);
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig::default().with_seed(5);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
