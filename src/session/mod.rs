//! The session facade.
//!
//! A [`Session`] owns everything a running game needs: settings, the quest
//! index, the player pool, the round state and the storage backend. The
//! shell drives it with two buttons and renders [`Presentation`]s.
//!
//! ## Example
//!
//! ```
//! use party_quest::core::EngineConfig;
//! use party_quest::players::Sex;
//! use party_quest::round::{Button, RoundState};
//! use party_quest::session::Session;
//! use party_quest::store::MemoryStore;
//!
//! let config = EngineConfig::default().with_seed(7);
//! let mut session = Session::new(config, MemoryStore::new()).unwrap();
//! session
//!     .load_quests(r#"[{"categories": ["DRINKING"], "texts": ["Cheers"], "configs": [{"level": 1}]}]"#)
//!     .unwrap();
//! session.add_player("Ann", Sex::Female).unwrap();
//! session.add_player("Bob", Sex::Male).unwrap();
//!
//! assert_eq!(session.press(Button::Go, 0).unwrap(), RoundState::Ready);
//! assert_eq!(session.press(Button::Go, 1).unwrap(), RoundState::Quest);
//! assert_eq!(session.quest_text(), Some("Cheers"));
//! ```

use smallvec::SmallVec;

use crate::core::{Category, CategoryMap, EngineConfig, EngineError, GameRng};
use crate::players::{Player, PlayerPool, Sex};
use crate::quests::{
    parse_feed, FriendshipLevel, Location, Quest, QuestCollection, QuestId, Requirement, RuleMap,
};
use crate::round::{Button, Presentation, QuestView, ReadyView, RoundAction, RoundState};
use crate::settings::Settings;
use crate::store::{KeyValueStore, PlayerRecord, Storage};

/// A game session over a storage backend.
pub struct Session<S: KeyValueStore> {
    config: EngineConfig,
    rng: GameRng,
    settings: Settings,
    storage: Storage<S>,
    quests: QuestCollection,
    rules: RuleMap,
    pool: PlayerPool,
    state: RoundState,
    current: Option<QuestId>,
    quest_text: Option<String>,
    /// Level announced on the last Ready screen.
    shown_level: Option<u32>,
    level_change: Option<(usize, bool)>,
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session, loading settings and the active players.
    pub fn new(config: EngineConfig, backend: S) -> Result<Self, EngineError> {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let storage = Storage::new(backend, config.resume_window_ms);
        let settings = storage.load_settings();

        let mut pool = PlayerPool::new(config.clone());
        for record in storage.load_players(true) {
            pool.add_player(record.to_player(&config))?;
        }
        tracing::info!(players = pool.len(), seed = rng.seed(), "session opened");

        Ok(Self {
            config,
            rng,
            settings,
            storage,
            quests: QuestCollection::new(),
            rules: RuleMap::new(),
            pool,
            state: RoundState::Start,
            current: None,
            quest_text: None,
            shown_level: None,
            level_change: None,
        })
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Load a JSON quest feed. Returns the number of quests added.
    pub fn load_quests(&mut self, json: &str) -> Result<usize, EngineError> {
        let feed = parse_feed(json)?;
        let added = feed.quests.len();
        for quest in feed.quests {
            self.quests.add(quest);
        }
        self.revalidate();
        tracing::info!(added, skipped = feed.skipped, "quest feed loaded");
        Ok(added)
    }

    /// Add a single quest.
    pub fn add_quest(&mut self, quest: Quest) -> QuestId {
        let id = self.quests.add(quest);
        self.revalidate();
        id
    }

    /// Register a rule text.
    pub fn add_rule(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.rules.insert(id, text);
    }

    fn revalidate(&mut self) {
        let ctx = self.settings.validation_context(self.pool.sex_restriction());
        self.quests.validate(&ctx);
    }

    // =========================================================================
    // Players
    // =========================================================================

    /// Add a player to the game.
    ///
    /// A known player keeps its stored progression. Either way the player
    /// joins at the back of the pool.
    pub fn add_player(&mut self, name: &str, sex: Sex) -> Result<(), EngineError> {
        if self.pool.contains(name) {
            return Err(EngineError::DuplicatePlayer(name.to_string()));
        }
        let player = match self.storage.load_player(name) {
            Some(record) if record.sex == sex => record.to_player(&self.config),
            _ => Player::new(name, sex, &self.config),
        };
        let seq = self.storage.next_seq();
        self.storage.save_player(&PlayerRecord::from_player(&player, true, seq))?;
        self.pool.add_player(player)?;
        self.revalidate();
        Ok(())
    }

    /// Take a player out of the game. The stored record is kept inactive.
    pub fn remove_player(&mut self, name: &str) -> Result<(), EngineError> {
        let player = self.pool.remove_player(name)?;
        let seq = self.storage.seq_of(name);
        self.storage.save_player(&PlayerRecord::from_player(&player, false, seq))?;
        self.revalidate();
        Ok(())
    }

    /// Every stored player, active or not.
    pub fn known_players(&self) -> Vec<PlayerRecord> {
        self.storage.load_players(false)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    fn update_settings(&mut self, update: impl FnOnce(&mut Settings)) -> Result<(), EngineError> {
        update(&mut self.settings);
        self.revalidate();
        self.storage.save_settings(&self.settings)?;
        Ok(())
    }

    pub fn set_location(&mut self, location: Location) -> Result<(), EngineError> {
        self.update_settings(|s| s.location = location)
    }

    pub fn set_friendship(&mut self, friendship: FriendshipLevel) -> Result<(), EngineError> {
        self.update_settings(|s| s.friendship = friendship)
    }

    pub fn add_requirement(&mut self, requirement: Requirement) -> Result<(), EngineError> {
        self.update_settings(|s| {
            s.add_requirement(requirement);
        })
    }

    pub fn remove_requirement(&mut self, requirement: Requirement) -> Result<(), EngineError> {
        self.update_settings(|s| {
            s.remove_requirement(requirement);
        })
    }

    /// Override the computed category weights, or restore them with `None`.
    pub fn set_custom_probability(
        &mut self,
        probability: Option<CategoryMap<u32>>,
    ) -> Result<(), EngineError> {
        self.update_settings(|s| s.custom_probability = probability)
    }

    pub fn set_already_drunk(&mut self, already_drunk: bool) -> Result<(), EngineError> {
        self.update_settings(|s| s.already_drunk = already_drunk)
    }

    // =========================================================================
    // Round flow
    // =========================================================================

    /// Offer to resume the previous game after reopening.
    ///
    /// Switches Start to Resume when the last action lies within the resume
    /// window and enough players are active.
    pub fn offer_resume(&mut self, now_ms: u64) -> bool {
        if self.state != RoundState::Start
            || !self.pool.enough_players()
            || !self.storage.can_resume(now_ms)
        {
            return false;
        }
        self.state = RoundState::Resume;
        tracing::debug!("resume offered");
        true
    }

    /// Press a round button at time `now_ms`.
    ///
    /// On error no transition happens, except that a failed quest
    /// preparation leaves the session in Start. A running game refuses
    /// every press once players have left below the minimum.
    pub fn press(&mut self, button: Button, now_ms: u64) -> Result<RoundState, EngineError> {
        let transition = self.state.on_button(button);
        tracing::debug!(from = %self.state, to = %transition.next, ?button, "button pressed");

        if self.state.in_game() {
            self.check_players()?;
        }
        match transition.action {
            RoundAction::StartGame { full_reset } => {
                self.check_players()?;
                self.pool.start_game(full_reset, self.settings.already_drunk)?;
                self.shown_level = None;
                self.revalidate();
            }
            RoundAction::Reveal => self.reveal(),
            RoundAction::Score { success } => {
                self.pool.apply_score(success);
            }
            RoundAction::Discard | RoundAction::None => {}
        }

        if transition.next != RoundState::Quest {
            self.current = None;
            self.quest_text = None;
        }
        if transition.next == RoundState::Ready {
            if let Err(error) = self.enter_ready(now_ms) {
                tracing::warn!(%error, "could not prepare a quest");
                self.state = RoundState::Start;
                return Err(error);
            }
        }

        self.state = transition.next;
        Ok(self.state)
    }

    fn check_players(&self) -> Result<(), EngineError> {
        if self.pool.is_empty() {
            return Err(EngineError::EmptyPool);
        }
        if !self.pool.enough_players() {
            return Err(EngineError::NotEnoughPlayers {
                have: self.pool.len(),
                need: self.config.min_players,
            });
        }
        Ok(())
    }

    fn reveal(&mut self) {
        if self.pool.quest_config().is_some_and(|c| c.deletable) {
            self.quests.mark_current_non_repeatable();
        }
        let Some(quest) = self.current.and_then(|id| self.quests.get(id)) else {
            return;
        };
        let mut text = quest.choose_text(&mut self.rng).to_string();
        if let Some(partner) = self.pool.current_partner() {
            text = text.replace(&self.config.partner_placeholder, partner.name());
        }
        self.quest_text = Some(text);
    }

    fn enter_ready(&mut self, now_ms: u64) -> Result<(), EngineError> {
        self.prepare_next_quest()?;

        let level = self.pool.level();
        self.level_change = match self.shown_level {
            Some(shown) if level <= shown => None,
            shown => Some((self.quests.linked_text_count(), shown.is_some() && level != 1)),
        };
        self.shown_level = Some(level);

        for player in self.pool.drain_changed() {
            self.storage.save_progress(&player)?;
        }
        self.storage.record_action(now_ms)?;
        Ok(())
    }

    /// Draw categories and quests until one can be matched to players.
    ///
    /// Categories found empty at the current level are left out of later
    /// draws; once none remain the content is exhausted.
    fn prepare_next_quest(&mut self) -> Result<(), EngineError> {
        let level = self.pool.level();
        let mut available = self.settings.category_probability(self.pool.len());
        let ctx = self.settings.validation_context(self.pool.sex_restriction());

        for attempt in 1..=self.config.max_draw_attempts {
            let category = self
                .pool
                .return_category(&available, &mut self.rng)
                .ok_or(EngineError::NoCategoryWeight)?;

            let Some(id) = self.quests.draw_random(level, category, &mut self.rng) else {
                available[category] = 0;
                if available.values().all(|&weight| weight == 0) {
                    return Err(EngineError::ContentExhausted { attempts: attempt });
                }
                continue;
            };
            let Some(quest) = self.quests.get(id) else {
                continue;
            };

            let quest_config = quest.choose_config(&ctx, level, &mut self.rng).clone();
            let categories: SmallVec<[Category; 2]> = quest.categories().iter().copied().collect();
            match self.pool.find_player(&categories, &quest_config, &mut self.rng) {
                Ok(()) => {
                    tracing::debug!(quest = %id, %category, attempt, level, "quest prepared");
                    self.current = Some(id);
                    return Ok(());
                }
                Err(error) => tracing::trace!(quest = %id, %error, "match failed, redrawing"),
            }
        }

        Err(EngineError::ContentExhausted {
            attempts: self.config.max_draw_attempts,
        })
    }

    /// Screen contents for the current state.
    pub fn presentation(&self) -> Presentation {
        match self.state {
            RoundState::Start => Presentation::start(),
            RoundState::Resume => Presentation::resume(),
            RoundState::Ready => {
                let player = self.pool.current_player();
                Presentation::ready(ReadyView {
                    player: player.map(|p| p.name().to_string()),
                    partner: self
                        .pool
                        .current_partner()
                        .map(|p| (p.name().to_string(), p.sex())),
                    dare: self
                        .current_quest()
                        .is_some_and(|q| q.has_category(Category::Dare)),
                    level_change: self.level_change,
                    avg_level: self.pool.level(),
                    player_level: player.map(Player::level),
                    quest_level: self.pool.quest_config().map_or(0, |c| c.level),
                })
            }
            RoundState::Quest => {
                let quest = self.current_quest();
                Presentation::quest(QuestView {
                    player: self.pool.current_player().map(|p| p.name().to_string()),
                    text: self.quest_text.clone().unwrap_or_default(),
                    comments: quest.map(|q| q.comments().to_vec()).unwrap_or_default(),
                    rules: quest
                        .map(|q| q.rules(&self.rules).map(str::to_string).collect())
                        .unwrap_or_default(),
                    source: quest.and_then(Quest::source).map(str::to_string),
                    skippable: self.pool.quest_config().is_some_and(|c| c.skippable),
                })
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> RoundState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    #[must_use]
    pub fn quests(&self) -> &QuestCollection {
        &self.quests
    }

    #[must_use]
    pub fn rules(&self) -> &RuleMap {
        &self.rules
    }

    #[must_use]
    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    /// Close the session and hand back the backend.
    pub fn into_store(self) -> S {
        self.storage.into_backend()
    }

    /// The quest bound for the current round.
    #[must_use]
    pub fn current_quest(&self) -> Option<&Quest> {
        self.current.and_then(|id| self.quests.get(id))
    }

    #[must_use]
    pub fn current_quest_id(&self) -> Option<QuestId> {
        self.current
    }

    /// Text of the revealed quest.
    #[must_use]
    pub fn quest_text(&self) -> Option<&str> {
        self.quest_text.as_deref()
    }

    /// Distinct prompts playable under the current settings.
    #[must_use]
    pub fn valid_text_count(&self) -> usize {
        self.quests.valid_text_count()
    }

    /// Distinct prompts unlocked at the current level.
    #[must_use]
    pub fn linked_text_count(&self) -> usize {
        self.quests.linked_text_count()
    }
}
