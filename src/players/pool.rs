//! The round pool: active players, weighted matching and scoring.
//!
//! ## Category draw
//!
//! Categories are drawn from a prefix sum of `decay[c] * probability[c]`.
//! Pool-wide decay of the chosen categories drops to zero when a round is
//! matched and every category grows by a fixed step when a round is
//! scored, so under-served categories come back sooner.
//!
//! ## Player search
//!
//! Each player's weight is `(call_weight + 2)^max(5 - position, 1)`, zero
//! if excluded by a sex filter. Early pool positions get a steeper
//! exponent. A bound player moves to the back of the pool.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::player::{Player, Sex};
use crate::core::{Category, CategoryMap, EngineConfig, EngineError, GameRng, MatchError};
use crate::quests::{PartnerSelector, QuestConfiguration};

/// Active players of a game and the current round's binding.
#[derive(Clone, Debug)]
pub struct PlayerPool {
    config: EngineConfig,
    players: Vec<Player>,
    player: Option<String>,
    partner: Option<String>,
    quest_config: Option<QuestConfiguration>,
    categories: SmallVec<[Category; 2]>,
    category_decay: CategoryMap<f64>,
    avg_level: f64,
    changed: FxHashSet<String>,
}

impl PlayerPool {
    /// Create an empty pool.
    pub fn new(config: EngineConfig) -> Self {
        let category_decay = CategoryMap::with_value(config.category_initial_decay);
        Self {
            config,
            players: Vec::new(),
            player: None,
            partner: None,
            quest_config: None,
            categories: SmallVec::new(),
            category_decay,
            avg_level: 1.0,
            changed: FxHashSet::default(),
        }
    }

    /// Append a player to the pool.
    pub fn add_player(&mut self, player: Player) -> Result<(), EngineError> {
        if self.contains(player.name()) {
            return Err(EngineError::DuplicatePlayer(player.name().to_string()));
        }
        tracing::debug!(player = %player.name(), sex = ?player.sex(), "player joined");
        self.players.push(player);
        self.recompute_avg_level();
        Ok(())
    }

    /// Remove a player by name, clearing the round binding if it was them.
    pub fn remove_player(&mut self, name: &str) -> Result<Player, EngineError> {
        let position = self
            .position(name)
            .ok_or_else(|| EngineError::UnknownPlayer(name.to_string()))?;
        let player = self.players.remove(position);

        if self.player.as_deref() == Some(name) {
            self.player = None;
        }
        if self.partner.as_deref() == Some(name) {
            self.partner = None;
        }
        self.changed.remove(name);
        self.recompute_avg_level();

        tracing::debug!(player = %name, "player left");
        Ok(player)
    }

    /// Whether a player with this name is pooled.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name() == name)
    }

    /// Get a pooled player by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name() == name)
    }

    /// Players in pool order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Whether enough players are pooled to start a game.
    #[must_use]
    pub fn enough_players(&self) -> bool {
        self.players.len() >= self.config.min_players
    }

    /// The shared sex of a single-sex pool.
    ///
    /// `None` for an empty or mixed pool.
    #[must_use]
    pub fn sex_restriction(&self) -> Option<Sex> {
        let first = self.players.first()?.sex();
        self.players.iter().all(|p| p.sex() == first).then_some(first)
    }

    /// Begin a game.
    ///
    /// A full reset restores every player's progression and the pool-wide
    /// category decay. With `already_drunk`, players start at the
    /// configured drunk level.
    pub fn start_game(&mut self, full_reset: bool, already_drunk: bool) -> Result<(), EngineError> {
        if self.players.is_empty() {
            return Err(EngineError::EmptyPool);
        }

        if full_reset {
            for player in &mut self.players {
                player.reset(&self.config);
                if already_drunk {
                    player.raise_level_to(self.config.drunk_level);
                }
                self.changed.insert(player.name().to_string());
            }
            self.category_decay = CategoryMap::with_value(self.config.category_initial_decay);
        }

        self.player = None;
        self.partner = None;
        self.quest_config = None;
        self.categories.clear();
        self.recompute_avg_level();

        tracing::info!(
            players = self.players.len(),
            full_reset,
            avg_level = self.avg_level,
            "game started"
        );
        Ok(())
    }

    /// Draw a category weighted by pool-wide decay and `probability`.
    ///
    /// Categories with zero weight are never drawn. When every weighted
    /// category has zero decay the draw falls back to `probability` alone.
    /// Returns `None` when every probability is zero.
    pub fn return_category(&self, probability: &CategoryMap<u32>, rng: &mut GameRng) -> Option<Category> {
        let weighted = CategoryMap::new(|c| self.category_decay[c] * f64::from(probability[c]));
        if let Some(category) = draw_weighted(&weighted, rng) {
            return Some(category);
        }
        tracing::trace!("category decay exhausted, drawing by probability only");
        draw_weighted(&CategoryMap::new(|c| f64::from(probability[c])), rng)
    }

    /// Weighted pick of one player for `categories`.
    ///
    /// Only players matching `sex` (if given) are considered. Evaluating a
    /// muted player consumes its mute.
    pub fn search_player(
        &mut self,
        categories: &[Category],
        sex: Option<Sex>,
        rng: &mut GameRng,
    ) -> Option<usize> {
        let mut cumulative: SmallVec<[f64; 16]> = SmallVec::with_capacity(self.players.len());
        let mut total = 0.0;
        for (position, player) in self.players.iter_mut().enumerate() {
            if sex.map_or(true, |s| s == player.sex()) {
                let exponent = (5 - position.min(4) as i32).max(1);
                total += (player.call_weight(categories, &self.config) + 2.0).powi(exponent);
            }
            cumulative.push(total);
        }
        if total <= 0.0 {
            return None;
        }

        let draw = rng.next_f64() * total;
        cumulative.iter().position(|&weight| draw < weight)
    }

    /// Bind the player and partner for a round.
    ///
    /// Zeroes the pool-wide decay of `categories`, resolves the player and
    /// then the partner per the configuration's selectors and updates every
    /// player's decay. On error the caller should discard the quest and
    /// draw another; decay changes made so far are kept.
    pub fn find_player(
        &mut self,
        categories: &[Category],
        config: &QuestConfiguration,
        rng: &mut GameRng,
    ) -> Result<(), MatchError> {
        for &category in categories {
            self.category_decay[category] = 0.0;
        }
        self.quest_config = Some(config.clone());
        self.categories = categories.iter().copied().collect();
        self.player = None;
        self.partner = None;

        let player_sex = match config.player.single() {
            Some(filter) => {
                let position = self
                    .search_player(categories, filter, rng)
                    .ok_or(MatchError::NoPlayer(config.player))?;
                let mut player = self.players.remove(position);
                self.tick_all();
                player.tick();
                player.mark_called(categories);
                let sex = player.sex();
                self.player = Some(player.name().to_string());
                self.players.push(player);
                sex
            }
            None => {
                for player in &mut self.players {
                    player.tick();
                    player.mark_group_called(categories);
                }
                return Ok(());
            }
        };

        let partner_filter = match config.partner {
            PartnerSelector::Female => Some(Sex::Female),
            PartnerSelector::Male => Some(Sex::Male),
            PartnerSelector::OppositeSex => Some(player_sex.opposite()),
            PartnerSelector::Yes => None,
            PartnerSelector::No => return Ok(()),
            PartnerSelector::All
            | PartnerSelector::AllOpposite
            | PartnerSelector::Boys
            | PartnerSelector::Girls => {
                // The rest of the pool plays along.
                let bound = self.player.as_deref();
                for other in self.players.iter_mut().filter(|p| Some(p.name()) != bound) {
                    other.mark_group_called(categories);
                }
                return Ok(());
            }
        };

        let position = self
            .search_player(categories, partner_filter, rng)
            .ok_or(MatchError::NoPartner(config.partner))?;
        let partner = &mut self.players[position];
        if self.player.as_deref() == Some(partner.name()) {
            tracing::trace!(player = %partner.name(), "partner resolved to the player");
            return Err(MatchError::SamePerson);
        }
        partner.mark_called(categories);
        self.partner = Some(partner.name().to_string());
        Ok(())
    }

    fn tick_all(&mut self) {
        for player in &mut self.players {
            player.tick();
        }
    }

    /// Score the current round.
    ///
    /// A bound player (with a bound partner, or on a partnerless quest)
    /// gets the full reward together with the partner; otherwise every
    /// pooled player gets the partial reward. Returns the number of
    /// level-ups.
    pub fn apply_score(&mut self, success: bool) -> usize {
        let Some(quest_config) = &self.quest_config else {
            return 0;
        };
        let quest_level = quest_config.level;
        let full_reward = self.player.is_some()
            && (self.partner.is_some() || quest_config.partner == PartnerSelector::No);

        let mut level_ups = 0;
        for player in &mut self.players {
            let rewarded = if full_reward {
                self.player.as_deref() == Some(player.name())
                    || self.partner.as_deref() == Some(player.name())
            } else {
                true
            };
            if !rewarded {
                continue;
            }
            if player.score(&self.categories, quest_level, full_reward, success, &self.config) {
                level_ups += 1;
            }
            self.changed.insert(player.name().to_string());
        }

        for (category, decay) in self.category_decay.iter_mut() {
            if self.categories.contains(&category) {
                *decay = 0.0;
            }
            *decay += self.config.category_decay_step;
        }
        self.recompute_avg_level();

        tracing::debug!(success, full_reward, level_ups, avg_level = self.avg_level, "round scored");
        level_ups
    }

    fn recompute_avg_level(&mut self) {
        if self.players.is_empty() {
            return;
        }
        let sum: u32 = self.players.iter().map(Player::level).sum();
        self.avg_level = f64::from(sum) / self.players.len() as f64;
    }

    /// Mean player level.
    #[must_use]
    pub fn avg_level(&self) -> f64 {
        self.avg_level
    }

    /// Rounded mean level used for quest draws.
    #[must_use]
    pub fn level(&self) -> u32 {
        (self.avg_level.round() as u32).max(1)
    }

    /// The bound player of the current round.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.player.as_deref().and_then(|name| self.get(name))
    }

    /// The bound partner of the current round.
    #[must_use]
    pub fn current_partner(&self) -> Option<&Player> {
        self.partner.as_deref().and_then(|name| self.get(name))
    }

    /// The configuration of the current round.
    #[must_use]
    pub fn quest_config(&self) -> Option<&QuestConfiguration> {
        self.quest_config.as_ref()
    }

    /// Categories of the current round.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Pool-wide decay of a category.
    #[must_use]
    pub fn category_decay(&self, category: Category) -> f64 {
        self.category_decay[category]
    }

    /// Players changed since the last drain, in pool order.
    pub fn drain_changed(&mut self) -> Vec<Player> {
        let changed = std::mem::take(&mut self.changed);
        self.players
            .iter()
            .filter(|p| changed.contains(p.name()))
            .cloned()
            .collect()
    }
}

/// Prefix-sum draw over per-category weights.
fn draw_weighted(weights: &CategoryMap<f64>, rng: &mut GameRng) -> Option<Category> {
    let total: f64 = weights.values().sum();
    if total <= 0.0 {
        return None;
    }

    let draw = rng.next_f64() * total;
    let mut cumulative = 0.0;
    weights.iter().find_map(|(category, &weight)| {
        cumulative += weight;
        (draw < cumulative).then_some(category)
    })
}
