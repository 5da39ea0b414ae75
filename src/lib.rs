//! Interactive lesson playback.
//!
//! A lesson is an ordered list of slides, some of them quizzes or interactive
//! exercises. [`engine::LessonEngine`] walks a learner through it: it checks
//! answers, keeps quizzes as checkpoints that must be passed before moving on,
//! and moves forward on its own after a correct quiz answer.

pub mod engine;
pub mod error;
pub mod lesson;

pub use engine::{
    Answer, Completion, EngineConfig, Host, LessonEngine, NoopHost, Recordings, Severity, Step,
    TickResult, ValidationResult,
};
pub use error::{ConfigError, EngineError};
pub use lesson::{Lesson, Slide, SlideIdentity};
