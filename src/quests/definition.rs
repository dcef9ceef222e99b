//! Quest definitions - immutable prompt records.
//!
//! A `Quest` is created once from the quest feed and never changes. The
//! index only tracks whether it is currently valid, linked or deleted.
//!
//! Invariants enforced at construction:
//! - at least one category
//! - at least one prompt text
//! - at least one private configuration
//! - a public configuration set, when present, is non-empty

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::configuration::{Location, QuestConfiguration, ValidationContext};
use super::rules::RuleMap;
use crate::core::{Category, GameRng, QuestError};

/// Handle of a quest inside a [`QuestCollection`](super::QuestCollection).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestId(pub u32);

impl QuestId {
    /// Create a new quest ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for QuestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Quest({})", self.0)
    }
}

/// Something the group needs at hand for a quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Requirement {
    /// Cream or something comparable.
    Cream,
    /// A place to dance.
    Dance,
    /// Ice cubes.
    IceCube,
    /// Something to swim in.
    Pool,
}

impl Requirement {
    /// All requirements.
    pub const ALL: [Requirement; 4] = [
        Requirement::Cream,
        Requirement::Dance,
        Requirement::IceCube,
        Requirement::Pool,
    ];
}

/// Immutable quest record.
///
/// ## Example
///
/// ```
/// use party_quest::core::Category;
/// use party_quest::quests::{Quest, QuestConfiguration};
///
/// let quest = Quest::new(Category::Dare, "Sing a song", QuestConfiguration::new(1))
///     .with_text("Sing a song loudly")
///     .with_comment("Any song counts");
///
/// assert_eq!(quest.texts().len(), 2);
/// assert_eq!(quest.categories(), &[Category::Dare]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuestRecord", into = "QuestRecord")]
pub struct Quest {
    categories: SmallVec<[Category; 2]>,
    requirements: SmallVec<[Requirement; 2]>,
    source: Option<String>,
    texts: Vec<String>,
    comments: Vec<String>,
    rule_ids: Vec<String>,
    configs: Vec<QuestConfiguration>,
    public_configs: Option<Vec<QuestConfiguration>>,
}

impl Quest {
    /// Create a quest with one category, one text and one configuration.
    pub fn new(category: Category, text: impl Into<String>, config: QuestConfiguration) -> Self {
        let mut categories = SmallVec::new();
        categories.push(category);
        Self {
            categories,
            requirements: SmallVec::new(),
            source: None,
            texts: vec![text.into()],
            comments: Vec::new(),
            rule_ids: Vec::new(),
            configs: vec![config],
            public_configs: None,
        }
    }

    /// Add another category. Duplicates are ignored.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    /// Add a requirement.
    #[must_use]
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        if !self.requirements.contains(&requirement) {
            self.requirements.push(requirement);
        }
        self
    }

    /// Set the source attribution.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add an alternative prompt text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.texts.push(text.into());
        self
    }

    /// Add a comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// Add a rule reference.
    #[must_use]
    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_ids.push(rule_id.into());
        self
    }

    /// Add a private configuration.
    #[must_use]
    pub fn with_config(mut self, config: QuestConfiguration) -> Self {
        self.configs.push(config);
        self
    }

    /// Add a public configuration.
    #[must_use]
    pub fn with_public_config(mut self, config: QuestConfiguration) -> Self {
        self.public_configs.get_or_insert_with(Vec::new).push(config);
        self
    }

    /// Categories, in the order given by the feed.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Whether the quest belongs to a category.
    #[must_use]
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Required items.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Source attribution.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Alternative prompt texts. Never empty.
    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Comments shown with the prompt.
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Rule references.
    #[must_use]
    pub fn rule_ids(&self) -> &[String] {
        &self.rule_ids
    }

    /// Private configurations. Never empty.
    #[must_use]
    pub fn configs(&self) -> &[QuestConfiguration] {
        &self.configs
    }

    /// Public configurations, if the quest has a public variant.
    #[must_use]
    pub fn public_configs(&self) -> Option<&[QuestConfiguration]> {
        self.public_configs.as_deref()
    }

    /// The configuration set that applies at a location.
    ///
    /// Public play falls back to the private set when the quest has no
    /// public variant.
    #[must_use]
    pub fn configs_for(&self, location: Location) -> &[QuestConfiguration] {
        match (location, self.public_configs.as_deref()) {
            (Location::Public, Some(public)) if !public.is_empty() => public,
            _ => &self.configs,
        }
    }

    /// Validate against the current settings.
    ///
    /// Returns the lowest level among the valid configurations, or `None`
    /// if the quest cannot be played under these settings.
    #[must_use]
    pub fn min_valid_level(&self, ctx: &ValidationContext) -> Option<u32> {
        if !self.requirements.iter().all(|&r| ctx.has_requirement(r)) {
            return None;
        }
        self.configs_for(ctx.location)
            .iter()
            .filter(|c| c.is_valid(ctx))
            .map(|c| c.level)
            .min()
    }

    /// Pick the configuration to play at `level`.
    ///
    /// Prefers configurations valid under `ctx` that are unlocked at
    /// `level`, then any unlocked configuration, then the lowest-level one.
    pub fn choose_config(
        &self,
        ctx: &ValidationContext,
        level: u32,
        rng: &mut GameRng,
    ) -> &QuestConfiguration {
        let set = self.configs_for(ctx.location);

        let valid: SmallVec<[&QuestConfiguration; 4]> = set
            .iter()
            .filter(|c| c.level <= level && c.is_valid(ctx))
            .collect();
        if let Some(&conf) = rng.choose(&valid) {
            return conf;
        }

        let unlocked: SmallVec<[&QuestConfiguration; 4]> =
            set.iter().filter(|c| c.level <= level).collect();
        if let Some(&conf) = rng.choose(&unlocked) {
            return conf;
        }

        // Sets are never empty, so the fallback always exists.
        set.iter().min_by_key(|c| c.level).unwrap_or(&self.configs[0])
    }

    /// Pick one of the alternative prompt texts.
    pub fn choose_text(&self, rng: &mut GameRng) -> &str {
        rng.choose(&self.texts).map_or("", String::as_str)
    }

    /// Resolve the rule references to rule texts, skipping unknown ids.
    pub fn rules<'a>(&'a self, rule_map: &'a RuleMap) -> impl Iterator<Item = &'a str> + 'a {
        self.rule_ids.iter().filter_map(|id| rule_map.get(id))
    }
}

/// Raw quest record as it appears in a quest feed.
///
/// Converted into a [`Quest`] with [`TryFrom`], which enforces the quest
/// invariants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub texts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_ids: Vec<String>,
    pub configs: Vec<QuestConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_configs: Option<Vec<QuestConfiguration>>,
}

impl TryFrom<QuestRecord> for Quest {
    type Error = QuestError;

    fn try_from(record: QuestRecord) -> Result<Self, Self::Error> {
        if record.categories.is_empty() {
            return Err(QuestError::NoCategory);
        }
        if record.texts.is_empty() {
            return Err(QuestError::NoText);
        }
        if record.configs.is_empty() {
            return Err(QuestError::NoConfiguration);
        }
        if matches!(&record.public_configs, Some(public) if public.is_empty()) {
            return Err(QuestError::EmptyPublicConfiguration);
        }

        let mut categories: SmallVec<[Category; 2]> = SmallVec::new();
        for category in record.categories {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        let mut requirements: SmallVec<[Requirement; 2]> = SmallVec::new();
        for requirement in record.requirements {
            if !requirements.contains(&requirement) {
                requirements.push(requirement);
            }
        }

        Ok(Self {
            categories,
            requirements,
            source: record.source,
            texts: record.texts,
            comments: record.comments,
            rule_ids: record.rule_ids,
            configs: record.configs,
            public_configs: record.public_configs,
        })
    }
}

impl From<Quest> for QuestRecord {
    fn from(quest: Quest) -> Self {
        Self {
            categories: quest.categories.into_vec(),
            requirements: quest.requirements.into_vec(),
            source: quest.source,
            texts: quest.texts,
            comments: quest.comments,
            rule_ids: quest.rule_ids,
            configs: quest.configs,
            public_configs: quest.public_configs,
        }
    }
}
