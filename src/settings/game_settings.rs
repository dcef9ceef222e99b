use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::probability::default_probability;
use crate::core::CategoryMap;
use crate::players::Sex;
use crate::quests::{FriendshipLevel, Location, Requirement, ValidationContext};

/// Settings chosen by the group.
///
/// Stored as one positional bincode value, so a record written by another
/// layout fails to decode and the whole value falls back to
/// [`Settings::default`]. Missing fields only take their defaults in
/// self-describing formats such as JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the game is played.
    pub location: Location,
    /// How close the group is.
    pub friendship: FriendshipLevel,
    /// Props the group has at hand.
    pub requirements: SmallVec<[Requirement; 4]>,
    /// Overrides the computed category weights.
    pub custom_probability: Option<CategoryMap<u32>>,
    /// Players start a new game at a raised level.
    pub already_drunk: bool,
}

impl Settings {
    /// Create default settings: private, loose friends, no props.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn with_friendship(mut self, friendship: FriendshipLevel) -> Self {
        self.friendship = friendship;
        self
    }

    #[must_use]
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.add_requirement(requirement);
        self
    }

    /// Make a prop available. Returns `false` if it already was.
    pub fn add_requirement(&mut self, requirement: Requirement) -> bool {
        if self.requirements.contains(&requirement) {
            return false;
        }
        self.requirements.push(requirement);
        true
    }

    /// Remove a prop. Returns `false` if it was not available.
    pub fn remove_requirement(&mut self, requirement: Requirement) -> bool {
        let before = self.requirements.len();
        self.requirements.retain(|r| *r != requirement);
        self.requirements.len() != before
    }

    /// Category weights for the given number of players.
    #[must_use]
    pub fn category_probability(&self, players: usize) -> CategoryMap<u32> {
        match &self.custom_probability {
            Some(custom) => custom.clone(),
            None => default_probability(self.friendship, players),
        }
    }

    /// The context quests are validated against.
    #[must_use]
    pub fn validation_context(&self, sex_restriction: Option<Sex>) -> ValidationContext {
        ValidationContext {
            location: self.location,
            friendship: self.friendship,
            sex_restriction,
            requirements: self.requirements.clone(),
        }
    }
}
