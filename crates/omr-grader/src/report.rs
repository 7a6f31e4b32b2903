//! The serializable answer map and its JSON file helpers.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::Letter;

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Final answer map: one entry per checked question.
///
/// `None` is the sentinel for "no confident mark"; it serializes as JSON
/// `null`. The JSON object keys are question numbers as strings, emitted in
/// numeric order (`"1"`, `"2"`, ..., `"10"`, ...).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnswerMap {
    entries: BTreeMap<u32, Option<Letter>>,
}

impl AnswerMap {
    pub fn insert(&mut self, question: u32, answer: Option<Letter>) {
        self.entries.insert(question, answer);
    }

    /// Recorded answer for a question; outer `None` when the question was
    /// never checked.
    pub fn get(&self, question: u32) -> Option<Option<Letter>> {
        self.entries.get(&question).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending question order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Option<Letter>)> + '_ {
        self.entries.iter().map(|(&q, &a)| (q, a))
    }
}

impl Serialize for AnswerMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // BTreeMap iteration gives numeric order; keys become strings here
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (question, answer) in &self.entries {
            map.serialize_entry(&question.to_string(), answer)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AnswerMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, Option<Letter>> = BTreeMap::deserialize(deserializer)?;
        let mut entries = BTreeMap::new();
        for (key, answer) in raw {
            let question: u32 = key
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid question key {key:?}")))?;
            entries.insert(question, answer);
        }
        Ok(Self { entries })
    }
}

/// Write the answer map to disk as pretty JSON.
pub fn save_answer_map(path: impl AsRef<Path>, answers: &AnswerMap) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(answers)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read an answer map back from disk.
pub fn load_answer_map(path: impl AsRef<Path>) -> Result<AnswerMap, ReportError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnswerMap {
        let mut map = AnswerMap::default();
        for q in 1..=12 {
            let answer = match q % 4 {
                0 => None,
                1 => Some(Letter::A),
                2 => Some(Letter::B),
                _ => Some(Letter::C),
            };
            map.insert(q, answer);
        }
        map
    }

    #[test]
    fn json_round_trip_preserves_the_mapping() {
        let map = sample();
        let json = serde_json::to_string(&map).unwrap();
        let back: AnswerMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn keys_are_emitted_in_numeric_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        // "2" must come before "10", which lexicographic order would flip
        let pos2 = json.find("\"2\"").unwrap();
        let pos10 = json.find("\"10\"").unwrap();
        assert!(pos2 < pos10, "{json}");
    }

    #[test]
    fn sentinel_serializes_as_null() {
        let mut map = AnswerMap::default();
        map.insert(4, None);
        assert_eq!(serde_json::to_string(&map).unwrap(), "{\"4\":null}");
    }

    #[test]
    fn non_numeric_keys_are_rejected() {
        assert!(serde_json::from_str::<AnswerMap>("{\"q1\":\"A\"}").is_err());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        let map = sample();
        save_answer_map(&path, &map).unwrap();
        assert_eq!(load_answer_map(&path).unwrap(), map);
    }
}
