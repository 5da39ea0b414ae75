use std::env;

use crate::error::ConfigError;

/// Timing of feedback and auto-progression, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// correct quiz answer -> feedback hidden
    pub quiz_advance_ms: u64,
    /// feedback hidden -> next slide
    pub settle_ms: u64,
    pub warning_hide_ms: u64,
    pub error_hide_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quiz_advance_ms: 2_500,
            settle_ms: 500,
            warning_hide_ms: 3_000,
            error_hide_ms: 4_000,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `LESSON_QUIZ_ADVANCE_MS`, `LESSON_SETTLE_MS`,
    /// `LESSON_WARNING_HIDE_MS` and `LESSON_ERROR_HIDE_MS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let read = |name: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(name) {
                Some(value) => value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidDuration { name, value }),
                None => Ok(default),
            }
        };

        Ok(Self {
            quiz_advance_ms: read("LESSON_QUIZ_ADVANCE_MS", defaults.quiz_advance_ms)?,
            settle_ms: read("LESSON_SETTLE_MS", defaults.settle_ms)?,
            warning_hide_ms: read("LESSON_WARNING_HIDE_MS", defaults.warning_hide_ms)?,
            error_hide_ms: read("LESSON_ERROR_HIDE_MS", defaults.error_hide_ms)?,
        })
    }
}
