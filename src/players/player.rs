//! Players and their per-category progression.
//!
//! A `Player` tracks how long ago it was last called for each category
//! (its decay vector), its level and points, and a clothing counter used
//! by the strip/reclothe categories. Equality is by name.

use serde::{Deserialize, Serialize};

use crate::core::{Category, CategoryMap, EngineConfig};

/// Player sex, used by player and partner selectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// The other sex.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Sex::Female => Sex::Male,
            Sex::Male => Sex::Female,
        }
    }
}

/// A participant in the game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    name: String,
    sex: Sex,
    level: u32,
    points: f64,
    clothing: i32,
    last_called: CategoryMap<f64>,
    muted: bool,
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Player {}

impl Player {
    /// Create a fresh player at level 1.
    pub fn new(name: impl Into<String>, sex: Sex, config: &EngineConfig) -> Self {
        Self {
            name: name.into(),
            sex,
            level: 1,
            points: 0.0,
            clothing: 0,
            last_called: CategoryMap::with_value(config.player_initial_decay),
            muted: false,
        }
    }

    /// Restore a player from stored progression.
    pub fn with_progress(mut self, level: u32, points: f64, clothing: i32) -> Self {
        self.level = level.max(1);
        self.points = points;
        self.clothing = clothing;
        self
    }

    /// Unique name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// Current level, starting at 1.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Points gathered within the current level.
    #[must_use]
    pub fn points(&self) -> f64 {
        self.points
    }

    /// Clothes put back on (positive) or taken off (negative).
    #[must_use]
    pub fn clothing(&self) -> i32 {
        self.clothing
    }

    /// Decay counter of one category.
    #[must_use]
    pub fn last_called(&self, category: Category) -> f64 {
        self.last_called[category]
    }

    /// Whether the next weight lookup is suppressed.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Selection weight for a round of `categories`.
    ///
    /// Sums the decay of each category, amplified by remaining clothing
    /// for strip quests and dampened by the reclothe counter for
    /// clothes-back-on quests. A muted player returns 1.0 once and is
    /// unmuted.
    pub fn call_weight(&mut self, categories: &[Category], config: &EngineConfig) -> f64 {
        if std::mem::take(&mut self.muted) {
            return 1.0;
        }

        categories
            .iter()
            .map(|&category| {
                let decay = self.last_called[category];
                match category {
                    Category::StripClothes => {
                        let remaining = self.average_clothing(config) + self.clothing;
                        match remaining {
                            r if r > 0 => decay * f64::from(r),
                            r if r < 0 => decay / f64::from(r.abs()),
                            _ => decay,
                        }
                    }
                    Category::ClothesBackOn if self.clothing > 0 => {
                        decay / f64::from(self.clothing)
                    }
                    _ => decay,
                }
            })
            .sum()
    }

    fn average_clothing(&self, config: &EngineConfig) -> i32 {
        match self.sex {
            Sex::Female => config.female_clothing,
            Sex::Male => config.male_clothing,
        }
    }

    /// Advance every decay counter by one round.
    pub fn tick(&mut self) {
        for (_, decay) in self.last_called.iter_mut() {
            *decay += 1.0;
        }
    }

    /// Mark the player as just called for `categories`.
    ///
    /// The categories' decay drops to zero and the next weight lookup is
    /// muted.
    pub fn mark_called(&mut self, categories: &[Category]) {
        for &category in categories {
            self.last_called[category] = 0.0;
        }
        self.muted = true;
    }

    /// Halve the decay of `categories` after a whole-pool quest.
    pub fn mark_group_called(&mut self, categories: &[Category]) {
        for &category in categories {
            self.last_called[category] /= 2.0;
        }
    }

    /// Score a finished quest.
    ///
    /// Averages the category deltas, scales them by quest and player
    /// level and divides partial rewards. Returns `true` on a level-up,
    /// after which points restart at 0.
    pub fn score(
        &mut self,
        categories: &[Category],
        quest_level: u32,
        full_reward: bool,
        success: bool,
        config: &EngineConfig,
    ) -> bool {
        if categories.is_empty() {
            return false;
        }

        let mut total = 0.0;
        for &category in categories {
            match category {
                Category::ClothesBackOn => self.clothing += 1,
                Category::StripClothes if full_reward => self.clothing -= 1,
                _ => {}
            }
            total += category.score_delta(success, self.level);
        }
        let average = total / categories.len() as f64;

        let level = f64::from(self.level);
        let mut gained = average * (1.0 + f64::from(quest_level) / level) / (level + 1.0);
        if !full_reward {
            gained /= config.partial_reward_divisor;
        }
        self.points += gained;

        if self.points >= config.level_up_points {
            self.level += 1;
            self.points = 0.0;
            tracing::info!(player = %self.name, level = self.level, "level up");
            true
        } else {
            false
        }
    }

    /// Reset progression for a new game.
    pub fn reset(&mut self, config: &EngineConfig) {
        self.level = 1;
        self.points = 0.0;
        self.clothing = 0;
        self.last_called = CategoryMap::with_value(config.player_initial_decay);
        self.muted = false;
    }

    /// Start at `level` or higher.
    pub fn raise_level_to(&mut self, level: u32) {
        self.level = self.level.max(level);
    }
}
