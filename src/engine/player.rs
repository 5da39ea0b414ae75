use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};

use crate::{
    error::EngineError,
    lesson::{Slide, SlideIdentity},
};

use super::{
    answers_match, session::Transition, validate, Answer, Comparison, EngineConfig, GradedKind,
    Host, LessonEngine, Navigator, Scheduler, Session, Step, TimerKind, ValidationResult,
};

const GATE_MESSAGE: &str = "Please complete this quiz correctly before moving on";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Completion {
    Completed,
    Blocked {
        message: String,
        /// quiz slides still to pass
        pending: Vec<usize>,
    },
}

impl<'a, H: Host> LessonEngine<'a, H> {
    pub fn new(
        slides: &'a [Slide],
        host: H,
        on_complete: impl FnMut() + 'a,
    ) -> Result<Self, EngineError> {
        let session = Session::new(slides)?;
        let nav = Navigator::new(slides.len()).ok_or(EngineError::EmptyLesson)?;

        let mut engine = Self {
            slides,
            config: EngineConfig::default(),
            session,
            scheduler: Scheduler::new(),
            nav,
            host,
            on_complete: Box::new(on_complete),
        };
        engine.enter(0);
        Ok(engine)
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_slide_index(&self) -> usize {
        self.nav.current()
    }

    pub fn current_slide(&self) -> &'a Slide {
        &self.slides[self.nav.current()]
    }

    pub fn current_identity(&self) -> &SlideIdentity {
        self.session.identity(self.nav.current())
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn identity_at(&self, index: usize) -> Option<&SlideIdentity> {
        self.session.identities().get(index)
    }

    pub fn slide_index(&self, identity: &SlideIdentity) -> Option<usize> {
        self.session.index_of(identity)
    }

    pub fn progress_percent(&self) -> f32 {
        self.nav.progress_percent()
    }

    pub fn is_last_slide(&self) -> bool {
        self.nav.is_last()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.nav.is_fullscreen()
    }

    pub fn can_advance(&self) -> bool {
        self.session.can_advance_from(self.nav.current())
    }

    pub fn satisfied_slides(&self) -> BTreeSet<usize> {
        self.session.satisfied_slides()
    }

    pub fn gate_completion_map(&self) -> BTreeMap<SlideIdentity, bool> {
        self.session.gate_completion()
    }

    pub fn is_feedback_visible(&self, identity: &SlideIdentity) -> bool {
        self.session
            .index_of(identity)
            .is_some_and(|index| self.session.state(index).feedback_visible)
    }

    pub fn validation_result(&self, identity: &SlideIdentity) -> Option<&ValidationResult> {
        let index = self.session.index_of(identity)?;
        self.session.state(index).validation.as_ref()
    }

    pub fn answer(&self, identity: &SlideIdentity) -> Option<&Answer> {
        let index = self.session.index_of(identity)?;
        self.session.state(index).answer.as_ref()
    }

    pub fn pending_transitions(&self, identity: &SlideIdentity) -> usize {
        self.scheduler.pending_transitions(identity)
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// When the host should tick next, if anything is scheduled.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Records a new attempt. A reset still pending from an earlier wrong
    /// answer is dropped so it cannot wipe the new attempt.
    pub fn set_answer(
        &mut self,
        identity: &SlideIdentity,
        value: Answer,
    ) -> Result<(), EngineError> {
        let index = self.graded_index(identity)?.0;
        self.scheduler.cancel(identity, TimerKind::ResetAnswer);
        self.session.apply(index, Transition::Record(value));
        Ok(())
    }

    /// Validates and grades `user_answer` for the slide behind `identity`.
    ///
    /// `correct_answer` overrides the slide's own known-correct answer. Every
    /// call reveals feedback and replaces any timers the slide had pending.
    /// Returns whether the answer was correct.
    pub fn check_answer(
        &mut self,
        identity: &SlideIdentity,
        user_answer: Option<&Answer>,
        correct_answer: Option<&Answer>,
        now_ms: u64,
    ) -> Result<bool, EngineError> {
        let (index, kind) = self.graded_index(identity)?;
        let slides = self.slides;
        let slide = &slides[index];
        let rules = kind.rules();

        if let Some(answer) = user_answer {
            self.session.apply(index, Transition::Record(answer.clone()));
        }
        self.scheduler.cancel_slide(identity);

        let verdict = validate(identity, user_answer, slide);
        if !verdict.is_valid {
            self.reveal(index, verdict, now_ms);
            return Ok(false);
        }

        let correct = correct_answer.cloned().or_else(|| slide.correct_answer());
        let is_correct = match user_answer {
            Some(answer) => answers_match(
                kind.comparison_for(answer),
                answer,
                correct.as_ref(),
                verdict.is_success(),
            ),
            None => verdict.is_success(),
        };

        if is_correct {
            let message = match user_answer.map(|answer| kind.comparison_for(answer)) {
                Some(Comparison::Verdict) => verdict.message,
                _ => rules.success.to_string(),
            };

            if self.session.is_gate(index) {
                self.session.set_gate(index, true);
            } else {
                self.session.mark_satisfied(index);
            }
            self.host.celebrate();
            self.reveal(index, ValidationResult::success(message), now_ms);

            if rules.auto_advance && !self.nav.is_last_index(index) {
                self.scheduler.schedule(
                    identity,
                    TimerKind::AutoAdvance,
                    now_ms.saturating_add(self.config.quiz_advance_ms),
                );
            }
        } else {
            debug!("check: identity={} kind={} incorrect", identity, kind.name());
            if self.session.is_gate(index) {
                self.session.set_gate(index, false);
            }
            self.reveal(index, ValidationResult::error(rules.error), now_ms);

            if rules.reset_on_error {
                self.scheduler.schedule(
                    identity,
                    TimerKind::ResetAnswer,
                    now_ms.saturating_add(self.config.error_hide_ms),
                );
            }
        }

        Ok(is_correct)
    }

    /// Checks the current slide with its recorded answer against its own
    /// known-correct answer.
    pub fn submit(&mut self, now_ms: u64) -> Result<bool, EngineError> {
        let identity = self.current_identity().clone();
        let answer = self.answer(&identity).cloned();
        self.check_answer(&identity, answer.as_ref(), None, now_ms)
    }

    pub fn next(&mut self, now_ms: u64) -> Step {
        let index = self.nav.current();
        let step = self.nav.next(self.session.can_advance_from(index));

        match step {
            Step::Moved { from, to } => self.leave_for(from, to),
            Step::Blocked => {
                warn!("next blocked by gate {}", self.session.identity(index));
                self.reveal(index, ValidationResult::warning(GATE_MESSAGE), now_ms);
            }
            Step::AtBoundary => {}
        }
        step
    }

    pub fn previous(&mut self) -> Step {
        let step = self.nav.previous();
        if let Step::Moved { from, to } = step {
            self.leave_for(from, to);
        }
        step
    }

    /// Finishes the lesson if every quiz passes. Each successful call fires
    /// the celebration and `on_complete` once.
    pub fn complete(&mut self, now_ms: u64) -> Completion {
        let pending = self.session.pending_gates();

        if !pending.is_empty() {
            let message = format!(
                "Please answer every quiz correctly before finishing ({} remaining)",
                pending.len()
            );
            warn!("completion blocked: pending={:?}", pending);
            self.reveal(
                self.nav.current(),
                ValidationResult::warning(message.clone()),
                now_ms,
            );
            return Completion::Blocked { message, pending };
        }

        info!("lesson completed: slides={}", self.slides.len());
        self.host.celebrate();
        (self.on_complete)();
        Completion::Completed
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        let enabled = self.nav.toggle_fullscreen();
        self.host.set_fullscreen(enabled);
        enabled
    }

    /// Fires every timer due at `now_ms`, in deadline order.
    pub fn tick(&mut self, now_ms: u64) -> TickResult {
        let mut result = TickResult::NoRender;

        while let Some((identity, kind, deadline)) = self.scheduler.pop_due(now_ms) {
            let Some(index) = self.session.index_of(&identity) else {
                continue;
            };
            result = TickResult::RenderRequested;

            match kind {
                TimerKind::HideFeedback => self.hide_feedback(index),
                TimerKind::ResetAnswer => self.session.apply(index, Transition::ClearAnswer),
                TimerKind::AutoAdvance => {
                    self.hide_feedback(index);
                    self.scheduler.schedule(
                        &identity,
                        TimerKind::Settle,
                        deadline.saturating_add(self.config.settle_ms),
                    );
                }
                TimerKind::Settle => {
                    if let Step::Moved { from, to } = self.nav.advance_from(index) {
                        info!("auto-advance {} -> {}", from, to);
                        self.enter(to);
                    }
                }
            }
        }

        result
    }

    /// Replaces the lesson. All timers and per-slide state of the old lesson
    /// are dropped; on error the engine keeps the old lesson.
    pub fn load_lesson(&mut self, slides: &'a [Slide]) -> Result<(), EngineError> {
        let session = Session::new(slides)?;
        let nav = Navigator::new(slides.len()).ok_or(EngineError::EmptyLesson)?;
        let fullscreen = self.nav.is_fullscreen();

        self.scheduler.cancel_all();
        self.slides = slides;
        self.session = session;
        self.nav = nav;
        if fullscreen {
            self.nav.toggle_fullscreen();
        }
        self.enter(0);
        Ok(())
    }

    /// Teardown: drops every pending timer and all per-slide state.
    pub fn dispose(&mut self) {
        let canceled = self.scheduler.cancel_all();
        self.session.reset();
        debug!("dispose: canceled={}", canceled);
    }

    fn graded_index(&self, identity: &SlideIdentity) -> Result<(usize, GradedKind), EngineError> {
        let index = self
            .session
            .index_of(identity)
            .ok_or_else(|| EngineError::UnknownIdentity(identity.clone()))?;
        let kind = GradedKind::of(&self.slides[index])
            .ok_or_else(|| EngineError::NotAnswerable(identity.clone()))?;
        Ok((index, kind))
    }

    fn leave_for(&mut self, from: usize, to: usize) {
        let departing = self.session.identity(from).clone();
        if self.scheduler.cancel_transition(&departing) {
            debug!("ui-nav: left {} with a pending transition", departing);
        }
        self.scheduler.cancel(&departing, TimerKind::HideFeedback);
        self.hide_feedback(from);
        self.enter(to);
    }

    fn enter(&mut self, index: usize) {
        self.session.mark_satisfied(index);
    }
}
