//! Round flow.
//!
//! - `RoundState`: Start / Resume / Ready / Quest with a pure transition
//!   function
//! - `Presentation`: per-state screen contents

mod presentation;
mod state;

pub use presentation::{
    ButtonLabel, Detail, MainText, PreTitle, Presentation, QuestView, ReadyView, Title,
};
pub use state::{Button, RoundAction, RoundState, Transition};
