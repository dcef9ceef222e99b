//! Quest configurations and the validation context they are checked against.
//!
//! A quest carries one or more [`QuestConfiguration`]s per location. Each
//! names the level it unlocks at, who plays it, and how intimate the group
//! must be. Validation decides which quests enter the "valid" view of the
//! index; configuration choice decides how a drawn quest is played.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::Requirement;
use crate::players::Sex;

/// How close the group is. Gates which configurations are valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipLevel {
    /// Most intimate tier: every configuration is allowed.
    Benefits,
    /// Good friends.
    Good,
    /// Most permissive tier: configurations at this level suit any group.
    #[default]
    Loose,
}

/// Where the game is played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    /// At home; private configurations apply.
    #[default]
    Private,
    /// Somewhere public; public configurations apply when a quest has them.
    Public,
}

/// Who plays a quest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerSelector {
    /// Everybody.
    #[default]
    All,
    /// One female player.
    AFemale,
    /// One male player.
    AMale,
    /// All male players.
    Boys,
    /// All female players.
    Girls,
    /// One player of any sex.
    One,
}

impl PlayerSelector {
    /// The sex filter used to search for a single player, or `None` if the
    /// selector addresses a group instead of one person.
    #[must_use]
    pub fn single(self) -> Option<Option<Sex>> {
        match self {
            PlayerSelector::AFemale => Some(Some(Sex::Female)),
            PlayerSelector::AMale => Some(Some(Sex::Male)),
            PlayerSelector::One => Some(None),
            PlayerSelector::All | PlayerSelector::Boys | PlayerSelector::Girls => None,
        }
    }

    /// Whether a single-sex pool of `sex` can play this selector.
    #[must_use]
    pub fn compatible_with(self, sex: Sex) -> bool {
        match self {
            PlayerSelector::One | PlayerSelector::All => true,
            PlayerSelector::AFemale | PlayerSelector::Girls => sex == Sex::Female,
            PlayerSelector::AMale | PlayerSelector::Boys => sex == Sex::Male,
        }
    }
}

/// Who partners the player in a quest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerSelector {
    /// Everybody else.
    All,
    /// Everybody of the opposite sex.
    AllOpposite,
    /// All male players.
    Boys,
    /// One female partner.
    Female,
    /// All female players.
    Girls,
    /// One male partner.
    Male,
    /// No partner.
    #[default]
    No,
    /// One partner of the player's opposite sex.
    OppositeSex,
    /// One partner of any sex.
    Yes,
}

impl PartnerSelector {
    /// Whether a single-sex pool of `sex` can play this selector.
    #[must_use]
    pub fn compatible_with(self, sex: Sex) -> bool {
        match self {
            PartnerSelector::No | PartnerSelector::Yes | PartnerSelector::All => true,
            PartnerSelector::Female | PartnerSelector::Girls => sex == Sex::Female,
            PartnerSelector::Male | PartnerSelector::Boys => sex == Sex::Male,
            PartnerSelector::AllOpposite | PartnerSelector::OppositeSex => false,
        }
    }
}

/// One way of playing a quest.
///
/// Omitted fields in a quest feed fall back to the defaults of
/// [`QuestConfiguration::new`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestConfiguration {
    /// Level this configuration unlocks at. Level 0 is never valid.
    pub level: u32,

    /// Who plays.
    #[serde(default)]
    pub player: PlayerSelector,

    /// Who partners.
    #[serde(default)]
    pub partner: PartnerSelector,

    /// Friendship level this configuration is written for.
    #[serde(default)]
    pub friendship: FriendshipLevel,

    /// Whether the player may abort the quest.
    #[serde(default)]
    pub skippable: bool,

    /// Whether the quest is removed after being played once.
    #[serde(default)]
    pub deletable: bool,
}

impl QuestConfiguration {
    /// Create a configuration for everybody, no partner, loose friendship.
    #[must_use]
    pub fn new(level: u32) -> Self {
        Self {
            level,
            player: PlayerSelector::default(),
            partner: PartnerSelector::default(),
            friendship: FriendshipLevel::default(),
            skippable: false,
            deletable: false,
        }
    }

    /// Set the player selector.
    #[must_use]
    pub fn with_player(mut self, player: PlayerSelector) -> Self {
        self.player = player;
        self
    }

    /// Set the partner selector.
    #[must_use]
    pub fn with_partner(mut self, partner: PartnerSelector) -> Self {
        self.partner = partner;
        self
    }

    /// Set the friendship level.
    #[must_use]
    pub fn with_friendship(mut self, friendship: FriendshipLevel) -> Self {
        self.friendship = friendship;
        self
    }

    /// Allow the quest to be aborted.
    #[must_use]
    pub fn skippable(mut self) -> Self {
        self.skippable = true;
        self
    }

    /// Remove the quest after it has been played.
    #[must_use]
    pub fn deletable(mut self) -> Self {
        self.deletable = true;
        self
    }

    /// Check this configuration against the current settings.
    ///
    /// Requirements are checked per quest, not here.
    #[must_use]
    pub fn is_valid(&self, ctx: &ValidationContext) -> bool {
        if self.level == 0 {
            return false;
        }
        let friendship_ok = self.friendship == ctx.friendship
            || self.friendship == FriendshipLevel::Loose
            || ctx.friendship == FriendshipLevel::Benefits;
        let sex_ok = ctx.sex_restriction.map_or(true, |sex| {
            self.player.compatible_with(sex) && self.partner.compatible_with(sex)
        });
        friendship_ok && sex_ok
    }
}

/// Snapshot of the settings a quest is validated against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Current location.
    pub location: Location,
    /// Current friendship level.
    pub friendship: FriendshipLevel,
    /// Set when every pooled player has the same sex.
    pub sex_restriction: Option<Sex>,
    /// Requirements available to the group.
    pub requirements: SmallVec<[Requirement; 4]>,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::permissive()
    }
}

impl ValidationContext {
    /// Private location, most intimate friendship, no sex restriction and
    /// every requirement available.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            location: Location::Private,
            friendship: FriendshipLevel::Benefits,
            sex_restriction: None,
            requirements: Requirement::ALL.iter().copied().collect(),
        }
    }

    /// Whether a requirement is available.
    #[must_use]
    pub fn has_requirement(&self, requirement: Requirement) -> bool {
        self.requirements.contains(&requirement)
    }
}
