//! Quest categories and per-category data storage.
//!
//! ## Category
//!
//! Closed set of quest themes. Every decay counter, probability weight and
//! index view is keyed by category.
//!
//! ## CategoryMap
//!
//! Dense per-category storage backed by `Vec` for O(1) access.
//! Supports iteration and indexing by `Category`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Quest category tag.
///
/// Discriminants are dense and start at 0 so a category doubles as an
/// index into a [`CategoryMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Put clothes back on. Scoring is inverted for this category.
    ClothesBackOn,
    /// Drink if a condition applies to you.
    Condition,
    /// Dares.
    Dare,
    /// Do funny things.
    DoFunnyThings,
    /// Somebody always drinks.
    Drinking,
    /// Kissing.
    Kissing,
    /// Exercise or move around.
    MoveIt,
    /// Naughty stuff.
    Naughty,
    /// Never have I ever.
    NeverHaveI,
    /// Drink something without alcohol. Always rewarded.
    NonAlkDrinking,
    /// Take clothes off.
    StripClothes,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 11;

    /// All categories in index order.
    pub const ALL: [Category; Self::COUNT] = [
        Category::ClothesBackOn,
        Category::Condition,
        Category::Dare,
        Category::DoFunnyThings,
        Category::Drinking,
        Category::Kissing,
        Category::MoveIt,
        Category::Naughty,
        Category::NeverHaveI,
        Category::NonAlkDrinking,
        Category::StripClothes,
    ];

    /// Get the dense index of this category.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a category by its dense index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The tag used in quest feeds and stored settings.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Category::ClothesBackOn => "CLOTHES_BACK_ON",
            Category::Condition => "CONDITION",
            Category::Dare => "DARE",
            Category::DoFunnyThings => "DO_FUNNY_THINGS",
            Category::Drinking => "DRINKING",
            Category::Kissing => "KISSING",
            Category::MoveIt => "MOVE_IT",
            Category::Naughty => "NAUGHTY",
            Category::NeverHaveI => "NEVER_HAVE_I",
            Category::NonAlkDrinking => "NON_ALK_DRINKING",
            Category::StripClothes => "STRIP_CLOTHES",
        }
    }

    /// Point delta a player earns for this category.
    ///
    /// `success` is the button outcome; `level` is the player's level,
    /// used by the always-positive non-alcoholic category.
    #[must_use]
    pub fn score_delta(self, success: bool, level: u32) -> f64 {
        let magnitude = match self {
            Category::ClothesBackOn => return if success { -100.0 } else { 100.0 },
            Category::NonAlkDrinking => return 10.0 * f64::from(level),
            Category::DoFunnyThings | Category::Drinking => 25.0,
            Category::Condition | Category::Kissing | Category::NeverHaveI => 50.0,
            Category::MoveIt | Category::Naughty => 75.0,
            Category::Dare | Category::StripClothes => 100.0,
        };
        if success {
            magnitude
        } else {
            -magnitude
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.tag() == s)
            .ok_or_else(|| format!("unknown category tag {s:?}"))
    }
}

/// Per-category data storage with O(1) access.
///
/// Backed by a `Vec<T>` with exactly one entry per [`Category`].
///
/// ## Example
///
/// ```
/// use party_quest::core::{Category, CategoryMap};
///
/// let mut decay: CategoryMap<f64> = CategoryMap::with_value(1.0);
/// decay[Category::Dare] = 0.0;
///
/// assert_eq!(decay[Category::Dare], 0.0);
/// assert_eq!(decay[Category::Kissing], 1.0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CategoryMap<T> {
    data: Vec<T>,
}

impl<T> CategoryMap<T> {
    /// Create a new map with values from a factory function.
    pub fn new(factory: impl Fn(Category) -> T) -> Self {
        Self {
            data: Category::ALL.iter().map(|&c| factory(c)).collect(),
        }
    }

    /// Create a new map with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Build a map from values in category index order.
    ///
    /// Returns `None` unless exactly one value per category is given.
    pub fn from_vec(data: Vec<T>) -> Option<Self> {
        (data.len() == Category::COUNT).then_some(Self { data })
    }

    /// Iterate over (Category, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.iter().copied().zip(self.data.iter())
    }

    /// Iterate over (Category, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Category, &mut T)> {
        Category::ALL.iter().copied().zip(self.data.iter_mut())
    }

    /// Iterate over values in category index order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T: Default> Default for CategoryMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T: Serialize> Serialize for CategoryMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CategoryMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = Vec::<T>::deserialize(deserializer)?;
        let len = data.len();
        Self::from_vec(data).ok_or_else(|| {
            serde::de::Error::invalid_length(len, &"one value per category")
        })
    }
}

impl<T> Index<Category> for CategoryMap<T> {
    type Output = T;

    fn index(&self, category: Category) -> &Self::Output {
        &self.data[category.index()]
    }
}

impl<T> IndexMut<Category> for CategoryMap<T> {
    fn index_mut(&mut self, category: Category) -> &mut Self::Output {
        &mut self.data[category.index()]
    }
}
