use std::collections::HashMap;

use log::debug;

use crate::{
    error::EngineError,
    lesson::{Slide, SlideIdentity},
};

use super::{completion::is_gate_slide, Answer, ValidationResult};

/// Everything the engine knows about one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideState {
    pub answer: Option<Answer>,
    pub validation: Option<ValidationResult>,
    pub feedback_visible: bool,
    /// `Some` only once a gate slide has been graded
    pub gate: Option<bool>,
    pub satisfied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Record(Answer),
    ClearAnswer,
    Validated(ValidationResult),
    Feedback(bool),
    /// visited, or otherwise passed without a gate
    Satisfied,
    Gate(bool),
}

/// Per-slide state for one lesson, keyed by slide index with an identity
/// lookup. All mutation goes through [`Session::apply`], which keeps a gate
/// slide satisfied exactly when its gate has passed.
#[derive(Debug, Clone)]
pub struct Session {
    identities: Vec<SlideIdentity>,
    gates: Vec<bool>,
    lookup: HashMap<SlideIdentity, usize>,
    states: Vec<SlideState>,
}

impl Session {
    pub fn new(slides: &[Slide]) -> Result<Self, EngineError> {
        if slides.is_empty() {
            return Err(EngineError::EmptyLesson);
        }

        let identities = SlideIdentity::assign(slides)?;
        let mut lookup = HashMap::with_capacity(slides.len());

        for (index, identity) in identities.iter().enumerate() {
            if let Some(first) = lookup.insert(identity.clone(), index) {
                return Err(EngineError::DuplicateIdentity {
                    identity: identity.clone(),
                    first,
                    second: index,
                });
            }
        }

        Ok(Self {
            identities,
            gates: slides.iter().map(is_gate_slide).collect(),
            lookup,
            states: vec![SlideState::default(); slides.len()],
        })
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn index_of(&self, identity: &SlideIdentity) -> Option<usize> {
        self.lookup.get(identity).copied()
    }

    pub fn identity(&self, index: usize) -> &SlideIdentity {
        &self.identities[index]
    }

    pub fn identities(&self) -> &[SlideIdentity] {
        &self.identities
    }

    pub fn is_gate(&self, index: usize) -> bool {
        self.gates[index]
    }

    pub fn state(&self, index: usize) -> &SlideState {
        &self.states[index]
    }

    pub fn apply(&mut self, index: usize, transition: Transition) {
        let is_gate = self.gates[index];
        let state = &mut self.states[index];

        match transition {
            Transition::Record(answer) => state.answer = Some(answer),
            Transition::ClearAnswer => state.answer = None,
            Transition::Validated(result) => state.validation = Some(result),
            Transition::Feedback(visible) => state.feedback_visible = visible,
            Transition::Satisfied => {
                if !is_gate || state.gate == Some(true) {
                    state.satisfied = true;
                }
            }
            Transition::Gate(passed) => {
                if is_gate {
                    state.gate = Some(passed);
                    state.satisfied = passed;
                } else {
                    debug!(
                        "session: ignored gate={} for non-gate slide {}",
                        passed, self.identities[index]
                    );
                }
            }
        }
    }

    /// Discards all per-slide state, keeping the lesson layout.
    pub fn reset(&mut self) {
        self.states.iter_mut().for_each(|state| *state = SlideState::default());
    }
}
