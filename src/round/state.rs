//! Round lifecycle.
//!
//! - **Start**: rules screen. Any button starts a fresh game.
//! - **Resume**: offered after reopening within the resume window. Go keeps
//!   the previous progression, No falls back to Start.
//! - **Ready**: a quest and its players are bound. Go shows the quest,
//!   No draws another one.
//! - **Quest**: the quest is shown. Go scores a success, No a decline.
//!
//! A quest is prepared on every entry to Ready.

use serde::{Deserialize, Serialize};

/// The two round buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// Affirm: start, resume, accept or complete.
    Go,
    /// Decline: new game, reroll or abort.
    No,
}

impl Button {
    /// `true` for [`Button::Go`].
    #[must_use]
    pub fn is_go(self) -> bool {
        matches!(self, Self::Go)
    }
}

/// State of the round flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundState {
    #[default]
    Start,
    Resume,
    Ready,
    Quest,
}

/// Work the session performs for a transition, before entering the next
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundAction {
    /// Begin a game, restoring progression when `full_reset` is set.
    StartGame { full_reset: bool },
    /// Drop the current quest without scoring it.
    Discard,
    /// Show the current quest, retiring it first if it is not repeatable.
    Reveal,
    /// Score the current quest.
    Score { success: bool },
    /// Nothing to do.
    None,
}

/// Result of pressing a button in a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: RoundAction,
    pub next: RoundState,
}

impl RoundState {
    /// The transition a button press triggers. Pure.
    #[must_use]
    pub fn on_button(self, button: Button) -> Transition {
        let (action, next) = match (self, button) {
            (Self::Start, _) => (RoundAction::StartGame { full_reset: true }, Self::Ready),
            (Self::Resume, Button::Go) => (RoundAction::StartGame { full_reset: false }, Self::Ready),
            (Self::Resume, Button::No) => (RoundAction::None, Self::Start),
            (Self::Ready, Button::Go) => (RoundAction::Reveal, Self::Quest),
            (Self::Ready, Button::No) => (RoundAction::Discard, Self::Ready),
            (Self::Quest, button) => (
                RoundAction::Score {
                    success: button.is_go(),
                },
                Self::Ready,
            ),
        };
        Transition { action, next }
    }

    /// Whether a game is running.
    #[must_use]
    pub fn in_game(self) -> bool {
        matches!(self, Self::Ready | Self::Quest)
    }
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Resume => "resume",
            Self::Ready => "ready",
            Self::Quest => "quest",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_starts_fresh_game() {
        for button in [Button::Go, Button::No] {
            let t = RoundState::Start.on_button(button);
            assert_eq!(t.next, RoundState::Ready);
            assert_eq!(t.action, RoundAction::StartGame { full_reset: true });
        }
    }

    #[test]
    fn test_resume() {
        let t = RoundState::Resume.on_button(Button::Go);
        assert_eq!(t.next, RoundState::Ready);
        assert_eq!(t.action, RoundAction::StartGame { full_reset: false });

        let t = RoundState::Resume.on_button(Button::No);
        assert_eq!(t.next, RoundState::Start);
        assert_eq!(t.action, RoundAction::None);
    }

    #[test]
    fn test_ready() {
        let t = RoundState::Ready.on_button(Button::Go);
        assert_eq!((t.action, t.next), (RoundAction::Reveal, RoundState::Quest));

        let t = RoundState::Ready.on_button(Button::No);
        assert_eq!((t.action, t.next), (RoundAction::Discard, RoundState::Ready));
    }

    #[test]
    fn test_quest_scores_button() {
        let t = RoundState::Quest.on_button(Button::Go);
        assert_eq!(t.action, RoundAction::Score { success: true });
        assert_eq!(t.next, RoundState::Ready);

        let t = RoundState::Quest.on_button(Button::No);
        assert_eq!(t.action, RoundAction::Score { success: false });
    }

    #[test]
    fn test_game_never_returns_to_start() {
        let mut state = RoundState::Start.on_button(Button::Go).next;
        for i in 0..50 {
            let button = if i % 3 == 0 { Button::No } else { Button::Go };
            state = state.on_button(button).next;
            assert!(state.in_game());
        }
    }
}
