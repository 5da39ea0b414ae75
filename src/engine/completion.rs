use std::collections::{BTreeMap, BTreeSet};

use log::info;

use crate::lesson::{Slide, SlideBody, SlideIdentity};

use super::session::{Session, Transition};

/// Only graded quizzes block forward navigation.
pub fn is_gate_slide(slide: &Slide) -> bool {
    matches!(slide.body, SlideBody::Quiz(_))
}

impl Session {
    /// No effect on a gate slide whose gate has not passed.
    pub fn mark_satisfied(&mut self, index: usize) {
        self.apply(index, Transition::Satisfied);
    }

    pub fn set_gate(&mut self, index: usize, passed: bool) {
        let previous = self.state(index).gate;
        self.apply(index, Transition::Gate(passed));

        match (previous, passed) {
            (Some(true), false) => info!("gate revoked: {}", self.identity(index)),
            (_, true) if previous != Some(true) => info!("gate passed: {}", self.identity(index)),
            _ => {}
        }
    }

    pub fn can_advance_from(&self, index: usize) -> bool {
        !self.is_gate(index) || self.state(index).gate == Some(true)
    }

    pub fn satisfied_slides(&self) -> BTreeSet<usize> {
        (0..self.len())
            .filter(|&index| self.state(index).satisfied)
            .collect()
    }

    /// Graded quiz slides and whether each one currently passes.
    pub fn gate_completion(&self) -> BTreeMap<SlideIdentity, bool> {
        (0..self.len())
            .filter_map(|index| {
                self.state(index)
                    .gate
                    .map(|passed| (self.identity(index).clone(), passed))
            })
            .collect()
    }

    /// Gate slides that do not pass yet, in lesson order.
    pub fn pending_gates(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&index| !self.can_advance_from(index))
            .collect()
    }
}
