use thiserror::Error;

use crate::lesson::SlideIdentity;

/// Caller precondition violations. Wrong or incomplete answers are never
/// errors, they surface as validation results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("lesson has no slides")]
    EmptyLesson,

    #[error("slides {first} and {second} share the identity '{identity}'")]
    DuplicateIdentity {
        identity: SlideIdentity,
        first: usize,
        second: usize,
    },

    #[error("no slide with identity '{0}' in this lesson")]
    UnknownIdentity(SlideIdentity),

    #[error("slide '{0}' takes no answer")]
    NotAnswerable(SlideIdentity),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got '{value}'")]
    InvalidDuration { name: &'static str, value: String },
}
