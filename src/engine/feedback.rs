use super::{
    session::Transition, EngineConfig, Host, LessonEngine, Severity, TimerKind, ValidationResult,
};

/// How long feedback of a given severity stays up. Success has no timeout:
/// it stays until the learner leaves the slide.
pub fn hide_after(severity: Severity, config: &EngineConfig) -> Option<u64> {
    match severity {
        Severity::Warning => Some(config.warning_hide_ms),
        Severity::Error => Some(config.error_hide_ms),
        Severity::Success => None,
    }
}

impl<H: Host> LessonEngine<'_, H> {
    /// Stores `result` for the slide at `index`, shows it, and schedules its
    /// hide when it has one.
    pub(super) fn reveal(&mut self, index: usize, result: ValidationResult, now_ms: u64) {
        let identity = self.session.identity(index).clone();
        let hide = hide_after(result.severity, &self.config);

        self.session.apply(index, Transition::Validated(result));
        self.session.apply(index, Transition::Feedback(true));

        match hide {
            Some(delay) => {
                self.scheduler.schedule(
                    &identity,
                    TimerKind::HideFeedback,
                    now_ms.saturating_add(delay),
                );
            }
            None => {
                self.scheduler.cancel(&identity, TimerKind::HideFeedback);
            }
        }
    }

    pub(super) fn hide_feedback(&mut self, index: usize) {
        self.session.apply(index, Transition::Feedback(false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_hide_before_errors() {
        let config = EngineConfig::default();

        assert_eq!(hide_after(Severity::Warning, &config), Some(3_000));
        assert_eq!(hide_after(Severity::Error, &config), Some(4_000));
        assert_eq!(hide_after(Severity::Success, &config), None);
    }
}
