mod fetch;
mod identity;
mod slide;

pub use fetch::{fetch_lesson, parse_lesson_json, parse_lesson_yaml, read_lesson, RequestError};
pub use identity::SlideIdentity;
pub use slide::{
    blank_count, DragItem, Flashcard, Hotspot, Interaction, InteractionKind, Lesson,
    ListeningQuestion, MatchPair, PronunciationItem, QuizConfig, QuizKey, Slide, SlideBody,
    SlideKind, TimelineEvent,
};
