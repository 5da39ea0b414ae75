//! Per-kind grading rules.
//!
//! Each gradable kind (quizzes and the ten interaction kinds) has one entry
//! describing how completeness is worded, how correctness is decided, and
//! what happens after a check. Adding a kind means adding an entry here.

use crate::lesson::{InteractionKind, Slide, SlideBody};

use super::Answer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradedKind {
    Quiz,
    Interaction(InteractionKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// element-wise, order matters
    Ordered,
    /// mapping equality, key order irrelevant
    Unordered,
    /// set equality
    Set,
    /// the validator's verdict is final
    Verdict,
}

#[derive(Debug)]
pub struct KindRules {
    pub comparison: Comparison,
    /// completeness wording: "please {action} all {n} {unit} ({k} {done})"
    pub action: &'static str,
    pub unit: &'static str,
    pub done: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub auto_advance: bool,
    pub reset_on_error: bool,
}

impl KindRules {
    pub fn incomplete_message(&self, required: usize, provided: usize) -> String {
        format!(
            "Please {} all {} {} before checking ({} {}, {} missing)",
            self.action,
            required,
            self.unit,
            provided,
            self.done,
            required.saturating_sub(provided)
        )
    }
}

static QUIZ: KindRules = KindRules {
    comparison: Comparison::Ordered,
    action: "answer",
    unit: "questions",
    done: "answered",
    success: "Correct! Well done.",
    error: "Not quite. Review the question and try again.",
    auto_advance: true,
    reset_on_error: false,
};

static DRAG_DROP: KindRules = KindRules {
    comparison: Comparison::Unordered,
    action: "match",
    unit: "items",
    done: "matched",
    success: "Perfect! Every item is in the right place.",
    error: "Some items are in the wrong place. Try again!",
    auto_advance: false,
    reset_on_error: true,
};

static FILL_BLANKS: KindRules = KindRules {
    comparison: Comparison::Unordered,
    action: "fill in",
    unit: "blanks",
    done: "filled",
    success: "Excellent! All blanks are correct.",
    error: "Some blanks are incorrect. Check your spelling and try again.",
    auto_advance: false,
    reset_on_error: true,
};

static MATCHING: KindRules = KindRules {
    comparison: Comparison::Unordered,
    action: "connect",
    unit: "pairs",
    done: "connected",
    success: "Great! All pairs match.",
    error: "Some pairs don't match. Try again!",
    auto_advance: false,
    reset_on_error: true,
};

static SORTING: KindRules = KindRules {
    comparison: Comparison::Ordered,
    action: "place",
    unit: "items",
    done: "placed",
    success: "Well done! The order is correct.",
    error: "The order isn't right yet. Try again!",
    auto_advance: false,
    reset_on_error: true,
};

static HOTSPOT: KindRules = KindRules {
    comparison: Comparison::Set,
    action: "find",
    unit: "hotspots",
    done: "found",
    success: "Great eye! You found every hotspot.",
    error: "Some of your selections are wrong. Look again!",
    auto_advance: false,
    reset_on_error: true,
};

static TIMELINE: KindRules = KindRules {
    comparison: Comparison::Ordered,
    action: "arrange",
    unit: "events",
    done: "placed",
    success: "Correct chronology!",
    error: "The events are out of order. Check the dates and try again.",
    auto_advance: false,
    reset_on_error: true,
};

static FLASHCARD: KindRules = KindRules {
    comparison: Comparison::Verdict,
    action: "review",
    unit: "flashcards",
    done: "reviewed",
    success: "All flashcards reviewed!",
    error: "Review the remaining flashcards.",
    auto_advance: false,
    reset_on_error: false,
};

static PRONUNCIATION: KindRules = KindRules {
    comparison: Comparison::Verdict,
    action: "record",
    unit: "items",
    done: "recorded",
    success: "Recordings saved!",
    error: "Record at least one item to continue.",
    auto_advance: false,
    reset_on_error: false,
};

static LISTENING: KindRules = KindRules {
    comparison: Comparison::Ordered,
    action: "answer",
    unit: "questions",
    done: "answered",
    success: "Great listening!",
    error: "Some answers are incorrect. Listen again and retry.",
    auto_advance: false,
    reset_on_error: false,
};

static SENTENCE_BUILDER: KindRules = KindRules {
    comparison: Comparison::Ordered,
    action: "use",
    unit: "words",
    done: "used",
    success: "Perfect sentence!",
    error: "The sentence isn't correct. Rearrange the words and try again.",
    auto_advance: false,
    reset_on_error: true,
};

impl GradedKind {
    /// `None` for static slides, which take no answer.
    pub fn of(slide: &Slide) -> Option<Self> {
        match &slide.body {
            SlideBody::Quiz(_) => Some(GradedKind::Quiz),
            SlideBody::Interactive { interaction } => {
                Some(GradedKind::Interaction(interaction.kind()))
            }
            _ => None,
        }
    }

    pub fn rules(self) -> &'static KindRules {
        match self {
            GradedKind::Quiz => &QUIZ,
            GradedKind::Interaction(kind) => match kind {
                InteractionKind::DragDrop => &DRAG_DROP,
                InteractionKind::FillBlanks => &FILL_BLANKS,
                InteractionKind::Matching => &MATCHING,
                InteractionKind::Sorting => &SORTING,
                InteractionKind::Hotspot => &HOTSPOT,
                InteractionKind::Timeline => &TIMELINE,
                InteractionKind::Flashcard => &FLASHCARD,
                InteractionKind::Pronunciation => &PRONUNCIATION,
                InteractionKind::Listening => &LISTENING,
                InteractionKind::SentenceBuilder => &SENTENCE_BUILDER,
            },
        }
    }

    /// Listening answers keyed by question id are graded in aggregate.
    pub fn comparison_for(self, answer: &Answer) -> Comparison {
        match (self, answer) {
            (GradedKind::Interaction(InteractionKind::Listening), Answer::Mapping(_)) => {
                Comparison::Verdict
            }
            _ => self.rules().comparison,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GradedKind::Quiz => "quiz",
            GradedKind::Interaction(kind) => kind.as_str(),
        }
    }
}

/// Compares a structurally valid answer against the known-correct one.
/// Without a known-correct answer the validator's verdict stands.
pub fn answers_match(
    comparison: Comparison,
    answer: &Answer,
    correct: Option<&Answer>,
    validator_success: bool,
) -> bool {
    let Some(correct) = correct else {
        return validator_success;
    };

    match comparison {
        Comparison::Verdict => validator_success,
        Comparison::Ordered => match (answer, correct) {
            (Answer::Choice(a), Answer::Choice(b)) => a == b,
            (Answer::Choices(a), Answer::Choices(b)) => {
                let mut a = a.clone();
                a.sort_unstable();
                a.dedup();
                let mut b = b.clone();
                b.sort_unstable();
                b.dedup();
                a == b
            }
            (Answer::Sequence(a), Answer::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.trim() == y.trim())
            }
            _ => false,
        },
        Comparison::Unordered => match (answer, correct) {
            (Answer::Mapping(a), Answer::Mapping(b)) => {
                a.len() == b.len()
                    && b.iter().all(|(key, expected)| {
                        a.get(key)
                            .is_some_and(|given| normalize(given) == normalize(expected))
                    })
            }
            _ => false,
        },
        Comparison::Set => match (answer, correct) {
            (Answer::Selection(a), Answer::Selection(b)) => a == b,
            _ => false,
        },
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
