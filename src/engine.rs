//! Lesson playback: validation, gating, feedback and auto-progression.
//!
//! [`LessonEngine`] is the single entry point for a presentation layer. It is
//! driven by discrete calls (`set_answer`, `check_answer`, `next`, ...) plus a
//! periodic [`LessonEngine::tick`] carrying the host's clock, and never spawns
//! anything of its own.

mod answer;
mod completion;
mod config;
mod feedback;
mod host;
mod navigation;
mod player;
mod rules;
mod scheduler;
mod session;
mod validation;

pub use answer::{Answer, Recordings};
pub use completion::is_gate_slide;
pub use config::EngineConfig;
pub use feedback::hide_after;
pub use host::{Host, NoopHost};
pub use navigation::{Navigator, Step};
pub use player::{Completion, TickResult};
pub use rules::{answers_match, Comparison, GradedKind, KindRules};
pub use scheduler::{Scheduler, TimerKind};
pub use session::{Session, SlideState, Transition};
pub use validation::{validate, Severity, ValidationResult};

use crate::lesson::Slide;

pub struct LessonEngine<'a, H: Host = NoopHost> {
    slides: &'a [Slide],
    config: EngineConfig,
    session: Session,
    scheduler: Scheduler,
    nav: Navigator,
    host: H,
    on_complete: Box<dyn FnMut() + 'a>,
}
