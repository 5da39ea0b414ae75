use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved { from: usize, to: usize },
    /// already at the first or last slide
    AtBoundary,
    /// the current slide is an unpassed gate
    Blocked,
}

/// Current slide and fullscreen flag. The index never leaves `0..len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    len: usize,
    fullscreen: bool,
}

impl Navigator {
    /// `None` for an empty lesson.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self {
            current: 0,
            len,
            fullscreen: false,
        })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.len
    }

    pub fn is_last_index(&self, index: usize) -> bool {
        index + 1 >= self.len
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn progress_percent(&self) -> f32 {
        (self.current + 1) as f32 / self.len as f32 * 100.0
    }

    pub fn next(&mut self, can_advance: bool) -> Step {
        if self.is_last() {
            return Step::AtBoundary;
        }
        if !can_advance {
            debug!("ui-nav: next blocked at {}", self.current);
            return Step::Blocked;
        }
        self.move_to(self.current + 1)
    }

    /// Going back never checks gates.
    pub fn previous(&mut self) -> Step {
        if self.current == 0 {
            return Step::AtBoundary;
        }
        self.move_to(self.current - 1)
    }

    /// Auto-progression from `index`; does nothing if the learner already left it.
    pub fn advance_from(&mut self, index: usize) -> Step {
        if self.current != index || self.is_last() {
            return Step::AtBoundary;
        }
        self.move_to(index + 1)
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    fn move_to(&mut self, to: usize) -> Step {
        let from = self.current;
        self.current = to;
        debug!("ui-nav: move {} -> {} of {}", from, to, self.len);
        Step::Moved { from, to }
    }
}
