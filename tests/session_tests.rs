//! Session flow tests.
//!
//! Drive a session through full games with the two buttons and check
//! state transitions, persistence, resume and presentation.

use party_quest::core::{Category, CategoryMap, EngineConfig, EngineError, GameRng};
use party_quest::players::Sex;
use party_quest::quests::{FriendshipLevel, PlayerSelector, Quest, QuestConfiguration};
use party_quest::round::{Button, ButtonLabel, Detail, MainText, Presentation, RoundState, Title};
use party_quest::session::Session;
use party_quest::store::{KeyValueStore, MemoryStore};

const HOUR_MS: u64 = 60 * 60 * 1000;

const FEED: &str = r#"[
    {"categories": ["DRINKING"], "texts": ["Take a sip", "Empty your glass"],
     "configs": [{"level": 1}]},
    {"categories": ["DARE"], "texts": ["Sing a song"],
     "configs": [{"level": 1, "player": "ONE", "skippable": true}],
     "comments": ["Any song counts"], "rule_ids": ["loud"], "source": "Campfire"},
    {"categories": ["NEVER_HAVE_I"], "texts": ["...lied in this game"],
     "configs": [{"level": 1}]},
    {"categories": ["KISSING"], "texts": ["Kiss {partner} on the cheek"],
     "configs": [{"level": 1, "player": "ONE", "partner": "OPPOSITE_SEX"}]}
]"#;

fn session_with(config: EngineConfig, store: MemoryStore) -> Session<MemoryStore> {
    let mut session = Session::new(config, store).unwrap();
    session.load_quests(FEED).unwrap();
    session.add_rule("loud", "Sing loud enough for everyone");
    session
}

fn party() -> Session<MemoryStore> {
    let mut session = session_with(EngineConfig::default().with_seed(11), MemoryStore::new());
    session.add_player("Ann", Sex::Female).unwrap();
    session.add_player("Bob", Sex::Male).unwrap();
    session.add_player("Cat", Sex::Female).unwrap();
    session
}

fn only(category: Category) -> Option<CategoryMap<u32>> {
    Some(CategoryMap::new(|c| u32::from(c == category)))
}

// =============================================================================
// State Machine Tests
// =============================================================================

/// Once a game runs, it cycles Ready and Quest and never returns to Start.
#[test]
fn test_game_never_revisits_start() {
    let mut session = party();
    let mut rng = GameRng::new(5);

    assert_eq!(session.press(Button::Go, 0).unwrap(), RoundState::Ready);
    for now in 1..200 {
        let button = if rng.next_f64() < 0.7 { Button::Go } else { Button::No };
        let before = session.state();
        let after = session.press(button, now).unwrap();

        assert!(after.in_game());
        match (before, button) {
            (RoundState::Ready, Button::Go) => assert_eq!(after, RoundState::Quest),
            _ => assert_eq!(after, RoundState::Ready),
        }
    }
}

/// Declining in Ready draws a fresh quest without scoring anyone.
#[test]
fn test_skip_does_not_score() {
    let mut session = party();
    session.press(Button::Go, 0).unwrap();
    for now in 1..10 {
        session.press(Button::No, now).unwrap();
    }
    assert!(session.pool().players().iter().all(|p| p.points() == 0.0));
}

/// Starting without quests fails and stays in Start.
#[test]
fn test_start_without_content() {
    let mut session = Session::new(EngineConfig::default().with_seed(1), MemoryStore::new()).unwrap();
    session.add_player("Ann", Sex::Female).unwrap();
    session.add_player("Bob", Sex::Male).unwrap();

    assert!(matches!(
        session.press(Button::Go, 0),
        Err(EngineError::ContentExhausted { .. })
    ));
    assert_eq!(session.state(), RoundState::Start);
}

/// Players leaving mid-game stop the rounds until enough are back.
#[test]
fn test_rounds_need_players() {
    let mut session = session_with(EngineConfig::default().with_seed(3), MemoryStore::new());
    session.add_player("Ann", Sex::Female).unwrap();
    session.add_player("Bob", Sex::Male).unwrap();
    assert_eq!(session.press(Button::Go, 0).unwrap(), RoundState::Ready);

    session.remove_player("Bob").unwrap();
    assert!(matches!(
        session.press(Button::Go, 1),
        Err(EngineError::NotEnoughPlayers { have: 1, need: 2 })
    ));
    assert_eq!(session.state(), RoundState::Ready);

    session.remove_player("Ann").unwrap();
    for button in [Button::Go, Button::No] {
        assert!(matches!(session.press(button, 2), Err(EngineError::EmptyPool)));
        assert_eq!(session.state(), RoundState::Ready);
    }
    assert_eq!(session.storage().last_action(), Some(0));

    session.add_player("Ann", Sex::Female).unwrap();
    session.add_player("Bob", Sex::Male).unwrap();
    assert_eq!(session.press(Button::No, 3).unwrap(), RoundState::Ready);
}

/// The same guard holds while a quest is shown.
#[test]
fn test_quest_not_scored_without_players() {
    let mut session = party();
    session.set_custom_probability(only(Category::Drinking)).unwrap();
    session.press(Button::Go, 0).unwrap();
    assert_eq!(session.press(Button::Go, 1).unwrap(), RoundState::Quest);

    for name in ["Ann", "Bob", "Cat"] {
        session.remove_player(name).unwrap();
    }
    assert!(matches!(session.press(Button::Go, 2), Err(EngineError::EmptyPool)));
    assert_eq!(session.state(), RoundState::Quest);
}

// =============================================================================
// Quest Tests
// =============================================================================

/// A deletable quest is played once and then never again.
#[test]
fn test_deletable_quest_played_once() {
    let mut session = Session::new(EngineConfig::default().with_seed(2), MemoryStore::new()).unwrap();
    let id = session.add_quest(Quest::new(
        Category::Drinking,
        "Finish the bottle",
        QuestConfiguration::new(1).deletable(),
    ));
    session.add_player("Ann", Sex::Female).unwrap();
    session.add_player("Bob", Sex::Male).unwrap();

    session.press(Button::Go, 0).unwrap();
    assert_eq!(session.current_quest_id(), Some(id));
    session.press(Button::Go, 1).unwrap();
    assert!(session.quests().is_deleted(id));

    // Nothing else to play: the next round cannot be prepared.
    assert!(session.press(Button::Go, 2).is_err());
    assert_eq!(session.state(), RoundState::Start);
}

/// The partner placeholder resolves to the bound partner.
#[test]
fn test_partner_named_in_text() {
    let mut session = party();
    session.set_custom_probability(only(Category::Kissing)).unwrap();

    session.press(Button::Go, 0).unwrap();
    let player = session.pool().current_player().unwrap();
    let partner = session.pool().current_partner().unwrap();
    assert_eq!(partner.sex(), player.sex().opposite());
    let expected = format!("Kiss {} on the cheek", partner.name());

    session.press(Button::Go, 1).unwrap();
    assert_eq!(session.quest_text(), Some(expected.as_str()));
}

/// Presentations follow the round.
#[test]
fn test_presentation_flow() {
    let mut session = party();
    session.set_custom_probability(only(Category::Dare)).unwrap();
    assert_eq!(session.presentation(), Presentation::start());

    session.press(Button::Go, 0).unwrap();
    let ready = session.presentation();
    let player = session.pool().current_player().unwrap().name().to_string();
    assert_eq!(ready.title, Title::Player(player.clone()));
    assert_eq!(ready.main, MainText::PlayerReady { partner: None });
    assert_eq!(ready.no_label, Some(ButtonLabel::Skip));
    assert!(matches!(
        ready.details[0],
        Detail::QuestsAvailable { new_level: false, .. }
    ));

    session.press(Button::Go, 1).unwrap();
    let quest = session.presentation();
    assert_eq!(quest.title, Title::Player(player));
    assert_eq!(quest.main, MainText::Quest("Sing a song".into()));
    assert_eq!(
        quest.details,
        vec![
            Detail::Comment("Any song counts".into()),
            Detail::Rule("Sing loud enough for everyone".into()),
            Detail::Source("Campfire".into()),
        ]
    );
    assert_eq!(quest.go_label, ButtonLabel::Done);
    assert_eq!(quest.no_label, Some(ButtonLabel::Abort));
}

/// Whole-pool quests address everybody.
#[test]
fn test_group_quest_presentation() {
    let mut session = party();
    session.set_custom_probability(only(Category::NeverHaveI)).unwrap();

    session.press(Button::Go, 0).unwrap();
    let ready = session.presentation();
    assert_eq!(ready.title, Title::All);
    assert_eq!(ready.main, MainText::EverybodyReady);
    assert!(ready.pre_title.is_none());
}

// =============================================================================
// Settings Tests
// =============================================================================

/// Friendship changes take effect immediately.
#[test]
fn test_friendship_gates_content() {
    let mut session = party();
    session.add_quest(Quest::new(
        Category::Naughty,
        "Whisper something naughty",
        QuestConfiguration::new(1)
            .with_player(PlayerSelector::One)
            .with_friendship(FriendshipLevel::Good),
    ));
    let before = session.valid_text_count();

    session.set_friendship(FriendshipLevel::Good).unwrap();
    assert_eq!(session.valid_text_count(), before + 1);

    session.set_friendship(FriendshipLevel::Loose).unwrap();
    assert_eq!(session.valid_text_count(), before);
}

// =============================================================================
// Persistence Tests
// =============================================================================

/// Scores reach the store when the next round is prepared.
#[test]
fn test_progress_saved() {
    let mut session = party();
    session.set_custom_probability(only(Category::Drinking)).unwrap();

    session.press(Button::Go, 0).unwrap();
    session.press(Button::Go, 1).unwrap();
    session.press(Button::Go, 2).unwrap();

    // Whole-pool drinking: 25 * (1 + 1) / 2, halved as a partial reward.
    for name in ["Ann", "Bob", "Cat"] {
        let record = session.storage().load_player(name).unwrap();
        assert_eq!(record.points, 12.5, "{name}");
        assert!(record.active);
    }
    assert_eq!(session.storage().last_action(), Some(2));
}

/// A reopened session within the window offers to resume and keeps
/// progress.
#[test]
fn test_resume_within_window() {
    let mut session = party();
    session.set_custom_probability(only(Category::Drinking)).unwrap();
    session.press(Button::Go, 0).unwrap();
    session.press(Button::Go, 1).unwrap();
    session.press(Button::Go, 1000).unwrap();

    let store = session.into_store();
    assert!(store.get("last_action").is_some());

    let mut reopened = Session::new(EngineConfig::default().with_seed(4), store).unwrap();
    reopened.load_quests(FEED).unwrap();
    assert_eq!(reopened.pool().len(), 3);

    assert!(reopened.offer_resume(1000 + 2 * HOUR_MS));
    assert_eq!(reopened.state(), RoundState::Resume);
    assert_eq!(reopened.presentation(), Presentation::resume());

    assert_eq!(reopened.press(Button::Go, 1000 + 2 * HOUR_MS).unwrap(), RoundState::Ready);
    assert!(reopened
        .pool()
        .players()
        .iter()
        .all(|p| p.points() == 12.5));
}

/// Declining to resume starts over with fresh progress.
#[test]
fn test_resume_declined() {
    let mut session = party();
    session.set_custom_probability(only(Category::Drinking)).unwrap();
    session.press(Button::Go, 0).unwrap();
    session.press(Button::Go, 1).unwrap();
    session.press(Button::Go, 2).unwrap();

    let mut reopened = session_with(EngineConfig::default().with_seed(4), session.into_store());
    assert!(reopened.offer_resume(3));
    assert_eq!(reopened.press(Button::No, 3).unwrap(), RoundState::Start);
    assert_eq!(reopened.press(Button::Go, 4).unwrap(), RoundState::Ready);
    assert!(reopened.pool().players().iter().all(|p| p.points() == 0.0));
}

/// No resume after the window has passed.
#[test]
fn test_resume_window_expired() {
    let mut session = party();
    session.press(Button::Go, 0).unwrap();

    let mut reopened = session_with(EngineConfig::default(), session.into_store());
    assert!(!reopened.offer_resume(13 * HOUR_MS));
    assert_eq!(reopened.state(), RoundState::Start);
}

/// A reopened session keeps the order players joined in.
#[test]
fn test_reopen_keeps_join_order() {
    let mut session = session_with(EngineConfig::default().with_seed(6), MemoryStore::new());
    session.add_player("Cat", Sex::Female).unwrap();
    session.add_player("Ann", Sex::Female).unwrap();
    session.add_player("Bob", Sex::Male).unwrap();
    session.remove_player("Ann").unwrap();
    session.add_player("Ann", Sex::Female).unwrap();

    let reopened = session_with(EngineConfig::default(), session.into_store());
    let names: Vec<_> = reopened.pool().players().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["Cat", "Bob", "Ann"]);
}

/// A returning player keeps their level.
#[test]
fn test_returning_player_keeps_level() {
    let config = EngineConfig::default().with_seed(9).with_level_up_points(10.0);
    let mut session = session_with(config.clone(), MemoryStore::new());
    session.add_player("Ann", Sex::Female).unwrap();
    session.add_player("Bob", Sex::Male).unwrap();
    session.set_custom_probability(only(Category::Drinking)).unwrap();

    session.press(Button::Go, 0).unwrap();
    session.press(Button::Go, 1).unwrap();
    session.press(Button::Go, 2).unwrap();
    assert_eq!(session.pool().get("Ann").unwrap().level(), 2);

    session.remove_player("Ann").unwrap();
    session.add_player("Ann", Sex::Female).unwrap();
    assert_eq!(session.pool().get("Ann").unwrap().level(), 2);
}
