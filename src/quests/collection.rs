//! The quest index.
//!
//! Quests live in an arena (`Vec`) and are addressed by [`QuestId`]. Each
//! category keeps three views over that arena:
//!
//! - **all**: every quest of the category, in insertion order. Static.
//! - **valid**: the subsequence of *all* passing the current settings.
//!   Rebuilt by [`QuestCollection::validate`].
//! - **linked**: the subsequence of *valid* unlocked at the current level
//!   and not deleted. Rebuilt by [`QuestCollection::relink`], lazily on the
//!   first draw after a level change.
//!
//! `linked ⊆ valid ⊆ all` holds for every category after each rebuild.
//! Quests themselves are never mutated; only view membership and the
//! per-quest `deleted` flag change.

use super::configuration::ValidationContext;
use super::definition::{Quest, QuestId};
use crate::core::{Category, CategoryMap, GameRng};

#[derive(Clone, Debug)]
struct Entry {
    quest: Quest,
    /// Lowest valid configuration level from the last validation.
    min_level: Option<u32>,
    deleted: bool,
}

/// Per-category filtered quest index with uniform random draws.
///
/// ## Example
///
/// ```
/// use party_quest::core::{Category, GameRng};
/// use party_quest::quests::{Quest, QuestCollection, QuestConfiguration, ValidationContext};
///
/// let mut quests = QuestCollection::new();
/// let id = quests.add(Quest::new(Category::Dare, "Sing", QuestConfiguration::new(1)));
/// quests.validate(&ValidationContext::permissive());
///
/// let mut rng = GameRng::new(42);
/// assert_eq!(quests.draw_random(1, Category::Dare, &mut rng), Some(id));
/// assert_eq!(quests.draw_random(1, Category::Kissing, &mut rng), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct QuestCollection {
    entries: Vec<Entry>,
    all: CategoryMap<Vec<QuestId>>,
    valid: CategoryMap<Vec<QuestId>>,
    linked: CategoryMap<Vec<QuestId>>,
    /// Level the linked views were built for. `None` when stale.
    linked_level: Option<u32>,
    last_drawn: Option<QuestId>,
}

impl QuestCollection {
    /// Create a new empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quest to the *all* view of each of its categories.
    ///
    /// The quest is not drawable until the next [`validate`](Self::validate).
    pub fn add(&mut self, quest: Quest) -> QuestId {
        let id = QuestId::new(self.entries.len() as u32);
        for &category in quest.categories() {
            self.all[category].push(id);
        }
        self.entries.push(Entry {
            quest,
            min_level: None,
            deleted: false,
        });
        id
    }

    /// Rebuild every *valid* view against the current settings.
    ///
    /// Must be called whenever location, friendship level, requirements or
    /// the pool's sex composition change. Marks the linked views stale.
    pub fn validate(&mut self, ctx: &ValidationContext) {
        for entry in &mut self.entries {
            entry.min_level = entry.quest.min_valid_level(ctx);
        }

        let entries = &self.entries;
        for (category, ids) in self.all.iter() {
            self.valid[category] = ids
                .iter()
                .copied()
                .filter(|id| entries[id.index()].min_level.is_some())
                .collect();
        }
        self.linked_level = None;

        tracing::debug!(
            quests = self.entries.len(),
            valid_texts = self.valid_text_count(),
            location = ?ctx.location,
            friendship = ?ctx.friendship,
            "quest index validated"
        );
    }

    /// Rebuild every *linked* view for `level`.
    pub fn relink(&mut self, level: u32) {
        let entries = &self.entries;
        for (category, ids) in self.valid.iter() {
            self.linked[category] = ids
                .iter()
                .copied()
                .filter(|id| {
                    let entry = &entries[id.index()];
                    !entry.deleted && entry.min_level.is_some_and(|min| min <= level)
                })
                .collect();
        }
        self.linked_level = Some(level);

        tracing::debug!(level, linked_texts = self.linked_text_count(), "quest index relinked");
    }

    /// Draw a quest of `category` uniformly from its linked view.
    ///
    /// Relinks first if the view is stale or was built for another level.
    /// Returns `None` if no quest of the category is playable.
    pub fn draw_random(&mut self, level: u32, category: Category, rng: &mut GameRng) -> Option<QuestId> {
        if self.linked_level != Some(level) {
            self.relink(level);
        }
        let ids = &self.linked[category];
        let id = ids[rng.gen_index(ids.len())?];
        self.last_drawn = Some(id);
        Some(id)
    }

    /// Flag the most recently drawn quest as deleted and relink.
    ///
    /// Returns the flagged quest, if any was drawn.
    pub fn mark_current_non_repeatable(&mut self) -> Option<QuestId> {
        let id = self.last_drawn?;
        self.entries[id.index()].deleted = true;
        if let Some(level) = self.linked_level {
            self.relink(level);
        }
        tracing::debug!(quest = %id, "quest removed from rotation");
        Some(id)
    }

    /// Get a quest by ID.
    #[must_use]
    pub fn get(&self, id: QuestId) -> Option<&Quest> {
        self.entries.get(id.index()).map(|e| &e.quest)
    }

    /// Number of quests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all quests with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (QuestId, &Quest)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (QuestId::new(i as u32), &e.quest))
    }

    /// The *all* view of a category.
    #[must_use]
    pub fn all(&self, category: Category) -> &[QuestId] {
        &self.all[category]
    }

    /// The *valid* view of a category.
    #[must_use]
    pub fn valid(&self, category: Category) -> &[QuestId] {
        &self.valid[category]
    }

    /// The *linked* view of a category, as of the last relink.
    #[must_use]
    pub fn linked(&self, category: Category) -> &[QuestId] {
        &self.linked[category]
    }

    /// Level the linked views are current for.
    #[must_use]
    pub fn linked_level(&self) -> Option<u32> {
        self.linked_level
    }

    /// Lowest valid level recorded by the last validation.
    #[must_use]
    pub fn min_level(&self, id: QuestId) -> Option<u32> {
        self.entries.get(id.index()).and_then(|e| e.min_level)
    }

    /// Whether a quest was removed from rotation.
    #[must_use]
    pub fn is_deleted(&self, id: QuestId) -> bool {
        self.entries.get(id.index()).is_some_and(|e| e.deleted)
    }

    /// The most recently drawn quest.
    #[must_use]
    pub fn last_drawn(&self) -> Option<QuestId> {
        self.last_drawn
    }

    /// Distinct prompt texts reachable through the valid views.
    #[must_use]
    pub fn valid_text_count(&self) -> usize {
        self.distinct_text_count(&self.valid)
    }

    /// Distinct prompt texts reachable through the linked views.
    #[must_use]
    pub fn linked_text_count(&self) -> usize {
        self.distinct_text_count(&self.linked)
    }

    fn distinct_text_count(&self, views: &CategoryMap<Vec<QuestId>>) -> usize {
        let mut seen = vec![false; self.entries.len()];
        let mut count = 0;
        for id in views.values().flatten() {
            if !std::mem::replace(&mut seen[id.index()], true) {
                count += self.entries[id.index()].quest.texts().len();
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quests::{FriendshipLevel, QuestConfiguration};

    fn quest(category: Category, level: u32) -> Quest {
        Quest::new(category, format!("{category} at {level}"), QuestConfiguration::new(level))
    }

    #[test]
    fn test_add_appends_to_all_views() {
        let mut quests = QuestCollection::new();
        let a = quests.add(quest(Category::Dare, 1));
        let b = quests.add(quest(Category::Dare, 1).with_category(Category::Kissing));

        assert_eq!(quests.all(Category::Dare), &[a, b]);
        assert_eq!(quests.all(Category::Kissing), &[b]);
        assert!(quests.valid(Category::Dare).is_empty());
    }

    #[test]
    fn test_validate_filters_by_friendship() {
        let mut quests = QuestCollection::new();
        let loose = quests.add(quest(Category::Dare, 1));
        let good = quests.add(Quest::new(
            Category::Dare,
            "good",
            QuestConfiguration::new(1).with_friendship(FriendshipLevel::Good),
        ));

        let mut ctx = ValidationContext::permissive();
        ctx.friendship = FriendshipLevel::Loose;
        quests.validate(&ctx);
        assert_eq!(quests.valid(Category::Dare), &[loose]);

        ctx.friendship = FriendshipLevel::Good;
        quests.validate(&ctx);
        assert_eq!(quests.valid(Category::Dare), &[loose, good]);
    }

    #[test]
    fn test_relink_respects_level() {
        let mut quests = QuestCollection::new();
        let low = quests.add(quest(Category::Drinking, 1));
        let high = quests.add(quest(Category::Drinking, 3));
        quests.validate(&ValidationContext::permissive());

        quests.relink(2);
        assert_eq!(quests.linked(Category::Drinking), &[low]);
        assert_eq!(quests.min_level(high), Some(3));

        quests.relink(3);
        assert_eq!(quests.linked(Category::Drinking), &[low, high]);
    }

    #[test]
    fn test_draw_relinks_lazily() {
        let mut quests = QuestCollection::new();
        quests.add(quest(Category::Drinking, 2));
        quests.validate(&ValidationContext::permissive());
        assert_eq!(quests.linked_level(), None);

        let mut rng = GameRng::new(3);
        assert_eq!(quests.draw_random(1, Category::Drinking, &mut rng), None);
        assert_eq!(quests.linked_level(), Some(1));

        assert!(quests.draw_random(2, Category::Drinking, &mut rng).is_some());
        assert_eq!(quests.linked_level(), Some(2));
    }

    #[test]
    fn test_draw_is_uniform_over_linked() {
        let mut quests = QuestCollection::new();
        let ids: Vec<_> = (0..4).map(|_| quests.add(quest(Category::Condition, 1))).collect();
        quests.validate(&ValidationContext::permissive());

        let mut counts = [0usize; 4];
        let mut rng = GameRng::new(11);
        for _ in 0..4000 {
            let id = quests.draw_random(1, Category::Condition, &mut rng).unwrap();
            counts[ids.iter().position(|&x| x == id).unwrap()] += 1;
        }
        for count in counts {
            assert!((800..1200).contains(&count), "skewed draw: {counts:?}");
        }
    }

    #[test]
    fn test_mark_non_repeatable() {
        let mut quests = QuestCollection::new();
        let a = quests.add(quest(Category::Dare, 1));
        let b = quests.add(quest(Category::Dare, 1));
        quests.validate(&ValidationContext::permissive());

        let mut rng = GameRng::new(5);
        let first = quests.draw_random(1, Category::Dare, &mut rng).unwrap();
        assert_eq!(quests.mark_current_non_repeatable(), Some(first));
        assert!(quests.is_deleted(first));

        let other = if first == a { b } else { a };
        for _ in 0..20 {
            assert_eq!(quests.draw_random(1, Category::Dare, &mut rng), Some(other));
        }
    }

    #[test]
    fn test_mark_without_draw_is_noop() {
        let mut quests = QuestCollection::new();
        quests.add(quest(Category::Dare, 1));
        assert_eq!(quests.mark_current_non_repeatable(), None);
    }

    #[test]
    fn test_text_counts_are_distinct() {
        let mut quests = QuestCollection::new();
        quests.add(
            quest(Category::Dare, 1)
                .with_category(Category::Kissing)
                .with_text("alt"),
        );
        quests.add(quest(Category::Drinking, 5));
        quests.validate(&ValidationContext::permissive());
        quests.relink(1);

        // Two texts counted once although the quest sits in two categories.
        assert_eq!(quests.valid_text_count(), 3);
        assert_eq!(quests.linked_text_count(), 2);
    }
}
