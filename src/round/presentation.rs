//! What the shell shows for each round state.
//!
//! Presentation is plain data: typed fragments whose `Display` gives the
//! default English wording. Hosts that localize match on the variants
//! instead.

use std::fmt;

use crate::players::Sex;

/// Screen contents for the current state.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub pre_title: Option<PreTitle>,
    pub title: Title,
    pub main: MainText,
    pub details: Vec<Detail>,
    pub go_label: ButtonLabel,
    /// `None` hides the decline button.
    pub no_label: Option<ButtonLabel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreTitle {
    GiveTo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    Rules,
    Player(String),
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainText {
    Rules,
    ResumePrompt,
    /// A single player is up, optionally with a partner.
    PlayerReady { partner: Option<(String, Sex)> },
    /// A whole-pool dare.
    DoYouDare,
    EverybodyReady,
    /// The quest text, placeholders resolved.
    Quest(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    RulesComment,
    /// Prompts unlocked at the current level; `new_level` when the group
    /// just levelled up.
    QuestsAvailable { count: usize, new_level: bool },
    AverageLevel(u32),
    PlayerLevel(u32),
    QuestLevel(u32),
    Comment(String),
    Rule(String),
    Source(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonLabel {
    Go,
    Resume,
    NewGame,
    Skip,
    Done,
    Abort,
}

/// Data shown while a quest waits to be revealed.
#[derive(Debug, Clone, Default)]
pub struct ReadyView {
    pub player: Option<String>,
    pub partner: Option<(String, Sex)>,
    pub dare: bool,
    /// Linked prompt count, set when the average level rose since the
    /// last Ready screen.
    pub level_change: Option<(usize, bool)>,
    pub avg_level: u32,
    pub player_level: Option<u32>,
    pub quest_level: u32,
}

/// Data shown while a quest is played.
#[derive(Debug, Clone, Default)]
pub struct QuestView {
    pub player: Option<String>,
    pub text: String,
    pub comments: Vec<String>,
    pub rules: Vec<String>,
    pub source: Option<String>,
    pub skippable: bool,
}

impl Presentation {
    /// The rules screen.
    #[must_use]
    pub fn start() -> Self {
        Self {
            pre_title: None,
            title: Title::Rules,
            main: MainText::Rules,
            details: vec![Detail::RulesComment],
            go_label: ButtonLabel::Go,
            no_label: None,
        }
    }

    /// The resume prompt.
    #[must_use]
    pub fn resume() -> Self {
        Self {
            pre_title: None,
            title: Title::Rules,
            main: MainText::ResumePrompt,
            details: Vec::new(),
            go_label: ButtonLabel::Resume,
            no_label: Some(ButtonLabel::NewGame),
        }
    }

    #[must_use]
    pub fn ready(view: ReadyView) -> Self {
        let (pre_title, title) = match &view.player {
            Some(name) => (Some(PreTitle::GiveTo), Title::Player(name.clone())),
            None => (None, Title::All),
        };
        let main = if view.player.is_some() {
            MainText::PlayerReady {
                partner: view.partner,
            }
        } else if view.dare {
            MainText::DoYouDare
        } else {
            MainText::EverybodyReady
        };

        let mut details = Vec::with_capacity(4);
        if let Some((count, new_level)) = view.level_change {
            details.push(Detail::QuestsAvailable { count, new_level });
        }
        details.push(Detail::AverageLevel(view.avg_level));
        if let Some(level) = view.player_level {
            details.push(Detail::PlayerLevel(level));
        }
        details.push(Detail::QuestLevel(view.quest_level));

        Self {
            pre_title,
            title,
            main,
            details,
            go_label: ButtonLabel::Go,
            no_label: Some(ButtonLabel::Skip),
        }
    }

    #[must_use]
    pub fn quest(view: QuestView) -> Self {
        let details = view
            .comments
            .into_iter()
            .map(Detail::Comment)
            .chain(view.rules.into_iter().map(Detail::Rule))
            .chain(view.source.map(Detail::Source))
            .collect();

        Self {
            pre_title: None,
            title: view.player.map_or(Title::All, Title::Player),
            main: MainText::Quest(view.text),
            details,
            go_label: ButtonLabel::Done,
            no_label: view.skippable.then_some(ButtonLabel::Abort),
        }
    }
}

impl fmt::Display for PreTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GiveTo => f.write_str("Give the phone to"),
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules => f.write_str("Rules"),
            Self::Player(name) => f.write_str(name),
            Self::All => f.write_str("All"),
        }
    }
}

impl fmt::Display for MainText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules => f.write_str(
                "Pass the phone to whoever is named. Press Done once the quest is \
                 completed, or Abort if it is allowed and you chicken out.",
            ),
            Self::ResumePrompt => f.write_str("A game is still running. Resume it?"),
            Self::PlayerReady { partner: None } => f.write_str("Ready?"),
            Self::PlayerReady {
                partner: Some((name, Sex::Female)),
            } => write!(f, "Ready?\n\nYour partner is {name}. She should be ready too."),
            Self::PlayerReady {
                partner: Some((name, Sex::Male)),
            } => write!(f, "Ready?\n\nYour partner is {name}. He should be ready too."),
            Self::DoYouDare => f.write_str("Do you dare?"),
            Self::EverybodyReady => f.write_str("Everybody ready?"),
            Self::Quest(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RulesComment => f.write_str("Play responsibly."),
            Self::QuestsAvailable {
                count,
                new_level: true,
            } => write!(f, "New game level! {count} quests are available"),
            Self::QuestsAvailable {
                count,
                new_level: false,
            } => write!(f, "{count} quests are available"),
            Self::AverageLevel(level) => write!(f, "Average level: {level}"),
            Self::PlayerLevel(level) => write!(f, "Player level: {level}"),
            Self::QuestLevel(level) => write!(f, "Quest level: {level}"),
            Self::Comment(text) | Self::Rule(text) => f.write_str(text),
            Self::Source(source) => write!(f, "Source: {source}"),
        }
    }
}

impl fmt::Display for ButtonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Go => "Go",
            Self::Resume => "Resume",
            Self::NewGame => "New game",
            Self::Skip => "Skip",
            Self::Done => "Done",
            Self::Abort => "Abort",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_screen() {
        let p = Presentation::start();
        assert_eq!(p.title.to_string(), "Rules");
        assert_eq!(p.go_label.to_string(), "Go");
        assert!(p.no_label.is_none());
    }

    #[test]
    fn test_resume_screen() {
        let p = Presentation::resume();
        assert_eq!(p.main, MainText::ResumePrompt);
        assert_eq!(p.go_label, ButtonLabel::Resume);
        assert_eq!(p.no_label, Some(ButtonLabel::NewGame));
    }

    #[test]
    fn test_ready_with_player_and_partner() {
        let p = Presentation::ready(ReadyView {
            player: Some("Bob".into()),
            partner: Some(("Ann".into(), Sex::Female)),
            level_change: Some((12, false)),
            avg_level: 1,
            player_level: Some(2),
            quest_level: 1,
            ..ReadyView::default()
        });

        assert_eq!(p.pre_title, Some(PreTitle::GiveTo));
        assert_eq!(p.title, Title::Player("Bob".into()));
        assert!(p.main.to_string().contains("Your partner is Ann. She"));
        assert_eq!(
            p.details,
            vec![
                Detail::QuestsAvailable { count: 12, new_level: false },
                Detail::AverageLevel(1),
                Detail::PlayerLevel(2),
                Detail::QuestLevel(1),
            ]
        );
    }

    #[test]
    fn test_ready_whole_pool() {
        let dare = Presentation::ready(ReadyView {
            dare: true,
            ..ReadyView::default()
        });
        assert_eq!(dare.title, Title::All);
        assert_eq!(dare.main, MainText::DoYouDare);
        assert!(dare.pre_title.is_none());

        let all = Presentation::ready(ReadyView::default());
        assert_eq!(all.main.to_string(), "Everybody ready?");
    }

    #[test]
    fn test_quest_screen() {
        let p = Presentation::quest(QuestView {
            player: Some("Ann".into()),
            text: "Kiss Bob".into(),
            comments: vec!["On the cheek".into()],
            rules: vec!["No hands".into()],
            source: Some("Party lore".into()),
            skippable: false,
        });
        assert_eq!(p.main.to_string(), "Kiss Bob");
        assert_eq!(p.details.len(), 3);
        assert_eq!(p.details[2].to_string(), "Source: Party lore");
        assert_eq!(p.go_label, ButtonLabel::Done);
        assert!(p.no_label.is_none());

        let skippable = Presentation::quest(QuestView {
            skippable: true,
            ..QuestView::default()
        });
        assert_eq!(skippable.no_label, Some(ButtonLabel::Abort));
        assert_eq!(skippable.title, Title::All);
    }

    #[test]
    fn test_new_level_wording() {
        let detail = Detail::QuestsAvailable { count: 3, new_level: true };
        assert_eq!(detail.to_string(), "New game level! 3 quests are available");
    }
}
