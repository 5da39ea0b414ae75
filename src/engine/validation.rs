use log::debug;
use serde::{Deserialize, Serialize};

use crate::lesson::{Interaction, QuizConfig, QuizKey, Slide, SlideBody, SlideIdentity};

use super::{rules::GradedKind, Answer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
}

impl ValidationResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }
}

/// Decides whether `answer` is complete enough to grade.
///
/// Completeness is checked before anything else: a short answer yields a
/// warning naming how many elements are missing. A complete answer yields
/// `success`; the actual correctness comparison is up to the caller, except
/// for pronunciation where a completed recording session is success outright.
pub fn validate(
    identity: &SlideIdentity,
    answer: Option<&Answer>,
    slide: &Slide,
) -> ValidationResult {
    let result = match &slide.body {
        SlideBody::Quiz(quiz) => validate_quiz(quiz, answer),
        SlideBody::Interactive { interaction } => validate_interaction(interaction, answer),
        _ => ValidationResult::warning("This slide has nothing to check"),
    };

    debug!(
        "validate: identity={} severity={:?} message={:?}",
        identity, result.severity, result.message
    );
    result
}

fn validate_quiz(quiz: &QuizConfig, answer: Option<&Answer>) -> ValidationResult {
    let rules = GradedKind::Quiz.rules();
    let options = quiz.options.len();

    if options == 0 {
        return ValidationResult::warning("This quiz has no valid options");
    }

    match (&quiz.correct, answer) {
        (QuizKey::Single(_), Some(Answer::Choice(choice))) if *choice < options => {
            ValidationResult::success(rules.success)
        }
        (QuizKey::Single(_), Some(Answer::Choice(_))) => {
            ValidationResult::warning(format!("Please select one of the {} options", options))
        }
        (QuizKey::Single(_), _) => {
            ValidationResult::warning("Please select an answer before checking")
        }
        (QuizKey::Multiple(_), Some(Answer::Choices(choices))) if !choices.is_empty() => {
            if choices.iter().all(|choice| *choice < options) {
                ValidationResult::success(rules.success)
            } else {
                ValidationResult::warning(format!(
                    "Please select only among the {} options",
                    options
                ))
            }
        }
        (QuizKey::Multiple(_), _) => {
            ValidationResult::warning("Please select at least one answer before checking")
        }
    }
}

fn validate_interaction(interaction: &Interaction, answer: Option<&Answer>) -> ValidationResult {
    let kind = interaction.kind();
    let rules = GradedKind::Interaction(kind).rules();

    if interaction.item_count() == 0 {
        return ValidationResult::warning("This activity has no valid items");
    }

    if let Interaction::Pronunciation { items, .. } = interaction {
        return validate_pronunciation(items.len(), answer);
    }

    let Some(answer) = answer.filter(|a| !a.is_empty()) else {
        return ValidationResult::warning("Please provide an answer before checking");
    };

    if !fits_shape(interaction, answer) {
        return ValidationResult::warning("This answer does not fit this activity");
    }

    let required = interaction.required_count();
    if required == 0 {
        return ValidationResult::warning("This activity has no valid items");
    }

    let provided = answer.len();
    if provided < required {
        return ValidationResult::warning(rules.incomplete_message(required, provided));
    }

    match interaction {
        Interaction::Flashcard { .. } => {
            ValidationResult::success(format!("All {} flashcards reviewed!", provided))
        }
        _ => ValidationResult::success(rules.success),
    }
}

fn validate_pronunciation(total: usize, answer: Option<&Answer>) -> ValidationResult {
    let recorded = match answer {
        Some(Answer::Recordings(recordings)) => recordings,
        _ => return ValidationResult::warning("Please record at least one item before checking"),
    };

    let count = recorded.recorded();
    if count == 0 {
        return ValidationResult::warning("Please record at least one item before checking");
    }

    if recorded.completed {
        ValidationResult::success(format!(
            "Great job! You recorded {} item{}.",
            count,
            if count == 1 { "" } else { "s" }
        ))
    } else {
        ValidationResult::success(format!("{} of {} items recorded", count, total))
    }
}

fn fits_shape(interaction: &Interaction, answer: &Answer) -> bool {
    match interaction {
        Interaction::DragDrop { .. }
        | Interaction::FillBlanks { .. }
        | Interaction::Matching { .. } => matches!(answer, Answer::Mapping(_)),
        Interaction::Sorting { .. }
        | Interaction::Timeline { .. }
        | Interaction::SentenceBuilder { .. } => matches!(answer, Answer::Sequence(_)),
        Interaction::Hotspot { .. } | Interaction::Flashcard { .. } => {
            matches!(answer, Answer::Selection(_))
        }
        Interaction::Listening { .. } => {
            matches!(answer, Answer::Sequence(_) | Answer::Mapping(_))
        }
        Interaction::Pronunciation { .. } => matches!(answer, Answer::Recordings(_)),
    }
}
