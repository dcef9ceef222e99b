//! Game settings.
//!
//! - `Settings`: location, friendship level, available props and the
//!   category probability vector
//! - `default_probability`: base category weights for a friendship level
//!   and player count

mod game_settings;
mod probability;

pub use game_settings::Settings;
pub use probability::default_probability;
