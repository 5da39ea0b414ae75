use std::{collections::HashMap, fmt};

use github_slugger::Slugger;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

use super::{Slide, SlideBody};

/// Stable key for all per-slide engine state.
///
/// Derived from the slide kind, the interaction kind for interactive slides,
/// and the slugged slide id, e.g. `quiz-capitals` or
/// `interactive-drag-drop-animals`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideIdentity(String);

impl SlideIdentity {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Identity of a slide on its own, without regard to the rest of its
    /// lesson.
    pub fn of(slide: &Slide) -> Self {
        Self(format!("{}-{}", prefix(slide), Slugger::default().slug(&slide.id)))
    }

    /// Identities for every slide of a lesson, in slide order.
    ///
    /// Ids whose slugs collide (`Q1` and `q1`, `q.1` and `q1!`) get a numeric
    /// suffix from one slugger per kind prefix, so `quiz-q1` and `quiz-q1-1`.
    /// Two slides of the same kind with the same raw id are an error.
    pub fn assign(slides: &[Slide]) -> Result<Vec<Self>, EngineError> {
        let mut sluggers: HashMap<String, Slugger> = HashMap::new();
        let mut seen: HashMap<(String, &str), usize> = HashMap::new();
        let mut identities: Vec<Self> = Vec::with_capacity(slides.len());

        for (index, slide) in slides.iter().enumerate() {
            let prefix = prefix(slide);
            if let Some(&first) = seen.get(&(prefix.clone(), slide.id.as_str())) {
                return Err(EngineError::DuplicateIdentity {
                    identity: identities[first].clone(),
                    first,
                    second: index,
                });
            }
            seen.insert((prefix.clone(), slide.id.as_str()), index);

            let slug = sluggers.entry(prefix.clone()).or_default().slug(&slide.id);
            identities.push(Self(format!("{}-{}", prefix, slug)));
        }

        Ok(identities)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn prefix(slide: &Slide) -> String {
    match &slide.body {
        SlideBody::Interactive { interaction } => format!(
            "{}-{}",
            slide.kind().as_str(),
            interaction.kind().as_str()
        ),
        _ => slide.kind().as_str().to_string(),
    }
}

impl fmt::Display for SlideIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slide(value: serde_json::Value) -> Slide {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn identity_includes_interaction_kind() {
        let drag = slide(json!({
            "id": "Animals 1",
            "kind": "interactive",
            "interaction": { "type": "drag-drop", "items": [] }
        }));

        assert_eq!(
            SlideIdentity::of(&drag).as_str(),
            "interactive-drag-drop-animals-1"
        );
    }

    #[test]
    fn identity_is_stable_across_calls() {
        let quiz = slide(json!({
            "id": "capitals",
            "kind": "quiz",
            "question": "Capital of France?",
            "options": ["Berlin", "Paris"],
            "correct": 1
        }));

        assert_eq!(SlideIdentity::of(&quiz), SlideIdentity::of(&quiz));
        assert_eq!(SlideIdentity::of(&quiz).to_string(), "quiz-capitals");
    }

    #[test]
    fn same_id_different_kind_is_distinct() {
        let text = slide(json!({ "id": "intro", "kind": "text", "content": "Hello" }));
        let video = slide(json!({
            "id": "intro",
            "kind": "video",
            "url": "https://example.com/v"
        }));

        assert_ne!(SlideIdentity::of(&text), SlideIdentity::of(&video));
    }

    #[test]
    fn ids_differing_in_case_or_punctuation_stay_distinct() {
        let slides: Vec<Slide> = serde_json::from_value(json!([
            { "id": "Q1", "kind": "quiz", "question": "?", "options": ["a", "b"], "correct": 0 },
            { "id": "q1", "kind": "quiz", "question": "?", "options": ["a", "b"], "correct": 1 },
            { "id": "q.1", "kind": "text", "content": "one" },
            { "id": "q1!", "kind": "text", "content": "two" }
        ]))
        .unwrap();

        let keys: Vec<String> = SlideIdentity::assign(&slides)
            .unwrap()
            .iter()
            .map(|identity| identity.to_string())
            .collect();

        assert_eq!(keys, ["quiz-q1", "quiz-q1-1", "text-q1", "text-q1-1"]);
    }

    #[test]
    fn repeated_raw_id_of_one_kind_is_rejected() {
        let slides: Vec<Slide> = serde_json::from_value(json!([
            { "id": "intro", "kind": "text", "content": "one" },
            { "id": "intro", "kind": "video", "url": "https://example.com/v" },
            { "id": "intro", "kind": "text", "content": "two" }
        ]))
        .unwrap();

        assert_eq!(
            SlideIdentity::assign(&slides),
            Err(EngineError::DuplicateIdentity {
                identity: SlideIdentity::new("text-intro"),
                first: 0,
                second: 2,
            })
        );
    }
}
