//! Base category weights.
//!
//! Weights start from a fixed table and shift with the friendship level.
//! Several categories scale with the player count in brackets of
//! more than 9, 7, 5 and 3 players.

use crate::core::{Category, CategoryMap};
use crate::quests::FriendshipLevel;

/// Pick a bracket value for `players`.
///
/// `values` are for more than 9, 7, 5 and 3 players, then the rest.
fn bracket(players: usize, values: [i32; 5]) -> i32 {
    match players {
        p if p > 9 => values[0],
        p if p > 7 => values[1],
        p if p > 5 => values[2],
        p if p > 3 => values[3],
        _ => values[4],
    }
}

const fn base(category: Category) -> i32 {
    match category {
        Category::ClothesBackOn => 2,
        Category::Condition => 10,
        Category::Dare => 1,
        Category::DoFunnyThings => 5,
        Category::Drinking => 45,
        Category::Kissing => 5,
        Category::MoveIt => 1,
        Category::Naughty => 10,
        Category::NeverHaveI => 15,
        Category::NonAlkDrinking => 1,
        Category::StripClothes => 5,
    }
}

fn adjustment(category: Category, friendship: FriendshipLevel, players: usize) -> i32 {
    use FriendshipLevel::{Benefits, Good, Loose};

    // Shared by kissing and strip quests.
    let intimate = |friendship: FriendshipLevel| match friendship {
        Good => bracket(players, [4, 3, 2, 1, 0]),
        Benefits => bracket(players, [5, 4, 3, 2, 1]),
        Loose => 0,
    };

    match category {
        Category::ClothesBackOn if friendship == Benefits => 1,
        Category::Condition if friendship == Benefits => -5,
        Category::Dare if friendship == Benefits => bracket(players, [0, 1, 2, 3, 4]),
        Category::DoFunnyThings => match friendship {
            Loose => 5,
            Good => 0,
            Benefits => -5,
        },
        Category::Kissing | Category::StripClothes => intimate(friendship),
        Category::Naughty => match friendship {
            Loose => bracket(players, [-9, -8, -7, -6, -5]),
            Good => bracket(players, [-8, -6, -4, -2, 0]),
            Benefits => bracket(players, [6, 7, 8, 9, 10]),
        },
        Category::NeverHaveI => match friendship {
            Loose => bracket(players, [4, 3, 2, 1, 0]),
            Good => 0,
            Benefits => -5,
        },
        _ => 0,
    }
}

/// Category weights for a friendship level and player count.
///
/// ## Example
///
/// ```
/// use party_quest::core::Category;
/// use party_quest::quests::FriendshipLevel;
/// use party_quest::settings::default_probability;
///
/// let weights = default_probability(FriendshipLevel::Loose, 4);
/// assert_eq!(weights[Category::Drinking], 45);
/// assert_eq!(weights[Category::Naughty], 4);
/// ```
#[must_use]
pub fn default_probability(friendship: FriendshipLevel, players: usize) -> CategoryMap<u32> {
    CategoryMap::new(|category| {
        let weight = base(category) + adjustment(category, friendship, players);
        weight.max(0).unsigned_abs()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_small_group() {
        let weights = default_probability(FriendshipLevel::Loose, 2);
        assert_eq!(weights[Category::ClothesBackOn], 2);
        assert_eq!(weights[Category::DoFunnyThings], 10);
        assert_eq!(weights[Category::Kissing], 5);
        assert_eq!(weights[Category::Naughty], 5);
        assert_eq!(weights[Category::NeverHaveI], 15);
    }

    #[test]
    fn test_benefits_brackets() {
        let small = default_probability(FriendshipLevel::Benefits, 3);
        assert_eq!(small[Category::Dare], 5);
        assert_eq!(small[Category::Naughty], 20);
        assert_eq!(small[Category::Condition], 5);
        assert_eq!(small[Category::DoFunnyThings], 0);

        let large = default_probability(FriendshipLevel::Benefits, 10);
        assert_eq!(large[Category::Dare], 1);
        assert_eq!(large[Category::Kissing], 10);
        assert_eq!(large[Category::StripClothes], 10);
        assert_eq!(large[Category::Naughty], 16);
    }

    #[test]
    fn test_good_brackets() {
        let weights = default_probability(FriendshipLevel::Good, 6);
        assert_eq!(weights[Category::Kissing], 7);
        assert_eq!(weights[Category::Naughty], 6);
        assert_eq!(weights[Category::NeverHaveI], 15);
    }

    #[test]
    fn test_weights_never_negative() {
        for friendship in [FriendshipLevel::Loose, FriendshipLevel::Good, FriendshipLevel::Benefits] {
            for players in 0..12 {
                let weights = default_probability(friendship, players);
                assert!(weights.values().sum::<u32>() > 0);
            }
        }
    }
}
