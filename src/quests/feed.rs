//! Quest feed decoding.
//!
//! The feed is a JSON array of quest records. Records that fail the quest
//! invariants are skipped and logged so one bad entry does not take the
//! whole content pack down.

use serde_json::Value;

use super::definition::{Quest, QuestRecord};
use crate::core::EngineError;

/// Result of decoding a feed.
#[derive(Clone, Debug, Default)]
pub struct Feed {
    /// Well-formed quests in feed order.
    pub quests: Vec<Quest>,
    /// Number of records that were skipped.
    pub skipped: usize,
}

/// Decode a JSON quest feed.
///
/// Fails only if the document is not a JSON array. Individual malformed
/// records are skipped.
pub fn parse_feed(json: &str) -> Result<Feed, EngineError> {
    let records: Vec<Value> = serde_json::from_str(json)?;
    let mut feed = Feed::default();

    for (position, value) in records.into_iter().enumerate() {
        let quest = serde_json::from_value::<QuestRecord>(value)
            .map_err(|e| e.to_string())
            .and_then(|record| Quest::try_from(record).map_err(|e| e.to_string()));

        match quest {
            Ok(quest) => feed.quests.push(quest),
            Err(reason) => {
                tracing::warn!(position, %reason, "skipping malformed quest record");
                feed.skipped += 1;
            }
        }
    }

    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Category;

    #[test]
    fn test_parse_feed_skips_bad_records() {
        let json = r#"[
            {"categories": ["DARE"], "texts": ["Sing"], "configs": [{"level": 1}]},
            {"categories": ["DARE"], "texts": [], "configs": [{"level": 1}]},
            {"categories": ["SKYDIVING"], "texts": ["x"], "configs": [{"level": 1}]},
            {"categories": ["KISSING", "NAUGHTY"], "texts": ["Kiss {partner}"],
             "configs": [{"level": 2, "player": "ONE", "partner": "OPPOSITE_SEX"}],
             "requirements": ["ICE_CUBE"], "source": "Party lore"}
        ]"#;

        let feed = parse_feed(json).unwrap();
        assert_eq!(feed.quests.len(), 2);
        assert_eq!(feed.skipped, 2);
        assert_eq!(feed.quests[1].categories(), &[Category::Kissing, Category::Naughty]);
        assert_eq!(feed.quests[1].source(), Some("Party lore"));
    }

    #[test]
    fn test_parse_feed_rejects_non_array() {
        assert!(matches!(parse_feed("{}"), Err(EngineError::Feed(_))));
    }
}
