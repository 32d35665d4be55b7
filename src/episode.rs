use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// A single subtitle cue belonging to an [`Episode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    /// Unique across the whole corpus, not just within the episode.
    pub id: String,
    #[serde(with = "millis")]
    pub start: Duration,
    #[serde(with = "millis")]
    pub end: Duration,
    /// Cue lines in on-disk order. Empty lines are kept but never indexed.
    pub text: Vec<String>,
}

/// One video file and its parsed subtitle track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub id: String,
    pub path: PathBuf,
    /// Captions in chronological (on-disk) order.
    pub subtitles: Vec<Caption>,
}

/// A caption matched by a query, attributed to its episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub episode_id: String,
    pub caption: Caption,
    /// Relevance score from the text engine. Only comparable within one
    /// query.
    pub confidence: f64,
}

/// Generate a fresh opaque identifier for an episode or caption.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Serialize `Duration` as integer milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_json_uses_milliseconds() {
        let caption = Caption {
            id: "c1".to_string(),
            start: Duration::from_secs(10),
            end: Duration::from_millis(12_500),
            text: vec!["Hello there".to_string()],
        };

        let json = serde_json::to_value(&caption).unwrap();
        assert_eq!(json["start"], 10_000);
        assert_eq!(json["end"], 12_500);
        assert_eq!(json["text"][0], "Hello there");
    }

    #[test]
    fn search_result_field_names() {
        let result = SearchResult {
            episode_id: "e1".to_string(),
            caption: Caption {
                id: "c1".to_string(),
                start: Duration::ZERO,
                end: Duration::from_secs(1),
                text: vec![],
            },
            confidence: 1.5,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["episode_id"], "e1");
        assert_eq!(json["caption"]["id"], "c1");
        assert_eq!(json["confidence"], 1.5);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
