use std::{collections::BTreeMap, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::engine::Answer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub title: String,

    /// lesson slug, informational only
    #[serde(default)]
    pub slug: String,

    /// ordered slides, immutable for the session
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// author-assigned id, must be unique per kind within the lesson
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(flatten)]
    pub body: SlideBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideBody {
    Text {
        content: String,
    },
    Image {
        url: String,
        #[serde(default)]
        caption: Option<String>,
    },
    Video {
        url: String,
    },
    Quiz(QuizConfig),
    Code {
        #[serde(default)]
        language: Option<String>,
        source: String,
    },
    Interactive {
        interaction: Interaction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideKind {
    Text,
    Image,
    Video,
    Quiz,
    Code,
    Interactive,
}

impl SlideKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SlideKind::Text => "text",
            SlideKind::Image => "image",
            SlideKind::Video => "video",
            SlideKind::Quiz => "quiz",
            SlideKind::Code => "code",
            SlideKind::Interactive => "interactive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizConfig {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct: QuizKey,
}

/// `1` for single choice, `[0, 2]` for multiple choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizKey {
    Single(usize),
    Multiple(Vec<usize>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Interaction {
    DragDrop {
        #[serde(default)]
        instruction: String,
        items: Vec<DragItem>,
    },
    FillBlanks {
        #[serde(default)]
        instruction: String,
        /// blanks are runs of three or more underscores
        text: String,
        answers: Vec<String>,
    },
    Matching {
        #[serde(default)]
        instruction: String,
        pairs: Vec<MatchPair>,
    },
    /// items are listed in their correct order
    Sorting {
        #[serde(default)]
        instruction: String,
        items: Vec<String>,
    },
    Hotspot {
        #[serde(default)]
        instruction: String,
        #[serde(default)]
        image: Option<String>,
        hotspots: Vec<Hotspot>,
    },
    Timeline {
        #[serde(default)]
        instruction: String,
        events: Vec<TimelineEvent>,
    },
    Flashcard {
        #[serde(default)]
        instruction: String,
        cards: Vec<Flashcard>,
    },
    Pronunciation {
        #[serde(default)]
        instruction: String,
        items: Vec<PronunciationItem>,
    },
    Listening {
        #[serde(default)]
        instruction: String,
        #[serde(default)]
        audio: Option<String>,
        questions: Vec<ListeningQuestion>,
    },
    /// words are listed in their correct order
    SentenceBuilder {
        #[serde(default)]
        instruction: String,
        words: Vec<String>,
        #[serde(default)]
        distractors: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InteractionKind {
    DragDrop,
    FillBlanks,
    Matching,
    Sorting,
    Hotspot,
    Timeline,
    Flashcard,
    Pronunciation,
    Listening,
    SentenceBuilder,
}

impl InteractionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::DragDrop => "drag-drop",
            InteractionKind::FillBlanks => "fill-blanks",
            InteractionKind::Matching => "matching",
            InteractionKind::Sorting => "sorting",
            InteractionKind::Hotspot => "hotspot",
            InteractionKind::Timeline => "timeline",
            InteractionKind::Flashcard => "flashcard",
            InteractionKind::Pronunciation => "pronunciation",
            InteractionKind::Listening => "listening",
            InteractionKind::SentenceBuilder => "sentence-builder",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragItem {
    pub text: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub label: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PronunciationItem {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListeningQuestion {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
}

impl Slide {
    pub fn kind(&self) -> SlideKind {
        match self.body {
            SlideBody::Text { .. } => SlideKind::Text,
            SlideBody::Image { .. } => SlideKind::Image,
            SlideBody::Video { .. } => SlideKind::Video,
            SlideBody::Quiz(_) => SlideKind::Quiz,
            SlideBody::Code { .. } => SlideKind::Code,
            SlideBody::Interactive { .. } => SlideKind::Interactive,
        }
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        match &self.body {
            SlideBody::Interactive { interaction } => Some(interaction),
            _ => None,
        }
    }

    /// Number of elements a complete answer must contain.
    pub fn required_count(&self) -> usize {
        match &self.body {
            SlideBody::Quiz(_) => 1,
            SlideBody::Interactive { interaction } => interaction.required_count(),
            _ => 0,
        }
    }

    /// The known-correct answer carried by the slide's configuration, if the
    /// slide kind has one.
    pub fn correct_answer(&self) -> Option<Answer> {
        match &self.body {
            SlideBody::Quiz(quiz) => Some(match &quiz.correct {
                QuizKey::Single(index) => Answer::Choice(*index),
                QuizKey::Multiple(indices) => {
                    let mut indices = indices.clone();
                    indices.sort_unstable();
                    indices.dedup();
                    Answer::Choices(indices)
                }
            }),
            SlideBody::Interactive { interaction } => interaction.correct_answer(),
            _ => None,
        }
    }
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Interaction::DragDrop { .. } => InteractionKind::DragDrop,
            Interaction::FillBlanks { .. } => InteractionKind::FillBlanks,
            Interaction::Matching { .. } => InteractionKind::Matching,
            Interaction::Sorting { .. } => InteractionKind::Sorting,
            Interaction::Hotspot { .. } => InteractionKind::Hotspot,
            Interaction::Timeline { .. } => InteractionKind::Timeline,
            Interaction::Flashcard { .. } => InteractionKind::Flashcard,
            Interaction::Pronunciation { .. } => InteractionKind::Pronunciation,
            Interaction::Listening { .. } => InteractionKind::Listening,
            Interaction::SentenceBuilder { .. } => InteractionKind::SentenceBuilder,
        }
    }

    pub fn instruction(&self) -> &str {
        match self {
            Interaction::DragDrop { instruction, .. }
            | Interaction::FillBlanks { instruction, .. }
            | Interaction::Matching { instruction, .. }
            | Interaction::Sorting { instruction, .. }
            | Interaction::Hotspot { instruction, .. }
            | Interaction::Timeline { instruction, .. }
            | Interaction::Flashcard { instruction, .. }
            | Interaction::Pronunciation { instruction, .. }
            | Interaction::Listening { instruction, .. }
            | Interaction::SentenceBuilder { instruction, .. } => instruction,
        }
    }

    /// Number of source items, used to tell an empty activity apart from an
    /// unanswered one.
    pub fn item_count(&self) -> usize {
        match self {
            Interaction::DragDrop { items, .. } => items.len(),
            Interaction::FillBlanks { text, .. } => blank_count(text),
            Interaction::Matching { pairs, .. } => pairs.len(),
            Interaction::Sorting { items, .. } => items.len(),
            Interaction::Hotspot { hotspots, .. } => hotspots.len(),
            Interaction::Timeline { events, .. } => events.len(),
            Interaction::Flashcard { cards, .. } => cards.len(),
            Interaction::Pronunciation { items, .. } => items.len(),
            Interaction::Listening { questions, .. } => questions.len(),
            Interaction::SentenceBuilder { words, .. } => words.len(),
        }
    }

    pub fn required_count(&self) -> usize {
        match self {
            Interaction::Hotspot { hotspots, .. } => {
                hotspots.iter().filter(|spot| spot.correct).count()
            }
            // one recording is enough to be evaluated
            Interaction::Pronunciation { items, .. } => items.len().min(1),
            other => other.item_count(),
        }
    }

    pub fn correct_answer(&self) -> Option<Answer> {
        match self {
            Interaction::DragDrop { items, .. } => Some(Answer::Mapping(
                items
                    .iter()
                    .map(|item| (item.text.clone(), item.target.clone()))
                    .collect(),
            )),
            Interaction::FillBlanks { answers, .. } => Some(Answer::Mapping(
                answers
                    .iter()
                    .enumerate()
                    .map(|(index, word)| (index.to_string(), word.clone()))
                    .collect::<BTreeMap<_, _>>(),
            )),
            Interaction::Matching { pairs, .. } => Some(Answer::Mapping(
                pairs
                    .iter()
                    .map(|pair| (pair.left.clone(), pair.right.clone()))
                    .collect(),
            )),
            Interaction::Sorting { items, .. } => Some(Answer::Sequence(items.clone())),
            Interaction::Hotspot { hotspots, .. } => Some(Answer::Selection(
                hotspots
                    .iter()
                    .filter(|spot| spot.correct)
                    .map(|spot| spot.id.clone())
                    .collect(),
            )),
            Interaction::Timeline { events, .. } => {
                let mut ordered: Vec<&TimelineEvent> = events.iter().collect();
                ordered.sort_by_key(|event| event.year);
                Some(Answer::Sequence(
                    ordered.into_iter().map(|event| event.label.clone()).collect(),
                ))
            }
            Interaction::Listening { questions, .. } => Some(Answer::Sequence(
                questions.iter().map(|q| q.answer.clone()).collect(),
            )),
            Interaction::SentenceBuilder { words, .. } => Some(Answer::Sequence(words.clone())),
            Interaction::Flashcard { .. } | Interaction::Pronunciation { .. } => None,
        }
    }
}

/// Counts the blanks (`___`) in a fill-in template.
pub fn blank_count(text: &str) -> usize {
    static BLANK: OnceLock<Regex> = OnceLock::new();
    BLANK
        .get_or_init(|| Regex::new(r"_{3,}").expect("blank pattern is a valid regex"))
        .find_iter(text)
        .count()
}
