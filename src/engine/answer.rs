use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A learner's current answer for one slide. The shape depends on the
/// interaction kind; the engine only looks inside when validating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// single-choice quiz
    Choice(usize),
    /// multiple-choice quiz
    Choices(Vec<usize>),
    /// sorting, timeline, sentence builder, listening in question order
    Sequence(Vec<String>),
    /// drag-drop, matching, fill-blanks, listening by question id
    Mapping(BTreeMap<String, String>),
    /// hotspots found, flashcards reviewed
    Selection(BTreeSet<String>),
    /// pronunciation
    Recordings(Recordings),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recordings {
    /// item id -> recording reference
    #[serde(default)]
    pub recordings: BTreeMap<String, String>,
    #[serde(default)]
    pub completed: bool,
}

impl Recordings {
    pub fn recorded(&self) -> usize {
        self.recordings
            .values()
            .filter(|reference| !reference.trim().is_empty())
            .count()
    }
}

impl Answer {
    /// Number of filled-in elements. Blank mapping values and empty
    /// recordings do not count.
    pub fn len(&self) -> usize {
        match self {
            Answer::Choice(_) => 1,
            Answer::Choices(choices) => choices.len(),
            Answer::Sequence(items) => items.len(),
            Answer::Mapping(map) => map.values().filter(|v| !v.trim().is_empty()).count(),
            Answer::Selection(set) => set.len(),
            Answer::Recordings(recordings) => recordings.recorded(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
