/*!
 * Language fallback.
 *
 * When neither language was pinned by the caller and the provider reports that
 * it translated into the language it detected, the page was already in the
 * preferred language. The batch is then sent once more, aimed at the second
 * preferred language. There is never more than one such retry.
 */

use log::info;
use serde::{Deserialize, Serialize};

use crate::language_utils::language_codes_match;

use super::batch::BatchData;

/// The two languages a user reads, in order of preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePreferences {
    /// Default target language
    #[serde(default = "default_preferred")]
    pub preferred: String,

    /// Target used when the page is already in the preferred language
    #[serde(default = "default_second_preferred")]
    pub second_preferred: String,
}

impl Default for LanguagePreferences {
    fn default() -> Self {
        Self {
            preferred: default_preferred(),
            second_preferred: default_second_preferred(),
        }
    }
}

fn default_preferred() -> String {
    "zh-CN".to_string()
}

fn default_second_preferred() -> String {
    "en".to_string()
}

/// Where a page translation is in its fallback lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackState {
    /// First request not yet judged
    Primary,
    /// Retry issued; terminal
    Retried,
}

/// Which languages the caller pinned explicitly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinnedLanguages {
    pub source: bool,
    pub target: bool,
}

/// Decides on the single corrective retry
#[derive(Debug, Clone)]
pub struct LanguageFallback {
    state: FallbackState,
    preferences: LanguagePreferences,
    pinned: PinnedLanguages,
}

impl LanguageFallback {
    /// Start in the primary state
    pub fn new(preferences: LanguagePreferences, pinned: PinnedLanguages) -> Self {
        Self {
            state: FallbackState::Primary,
            preferences,
            pinned,
        }
    }

    /// Current state
    pub fn state(&self) -> FallbackState {
        self.state
    }

    /// Judge a reply; returns the retry target and moves to `Retried` when the
    /// retry should fire
    pub fn next_target(&mut self, reply: &BatchData) -> Option<String> {
        if self.state == FallbackState::Retried {
            return None;
        }

        if self.pinned.source || self.pinned.target {
            return None;
        }

        if !language_codes_match(&reply.source_language, &reply.target_language) {
            return None;
        }

        if language_codes_match(&self.preferences.preferred, &self.preferences.second_preferred) {
            return None;
        }

        info!(
            "Page is already in {}, retrying with {}",
            reply.target_language, self.preferences.second_preferred
        );
        self.state = FallbackState::Retried;
        Some(self.preferences.second_preferred.clone())
    }
}
