/*!
 * Fragment filtering.
 *
 * Decides which fragments are worth a remote call. Pure punctuation and short
 * numerals ("：", "12") are language-invariant and pass through untranslated.
 */

use serde::{Deserialize, Serialize};

use super::batch::FilteredFragment;
use super::document::Fragment;

/// Filtering thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Trimmed fragments shorter than this many characters are only sent
    /// when they contain a letter or CJK ideograph
    #[serde(default = "default_short_content_threshold")]
    pub short_content_threshold: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            short_content_threshold: default_short_content_threshold(),
        }
    }
}

fn default_short_content_threshold() -> usize {
    3
}

/// Result of splitting a flattened page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Fragments to submit
    pub selected: Vec<Fragment>,
    /// Fragments passed through verbatim
    pub passthrough: Vec<Fragment>,
}

impl FilterOutcome {
    /// The batch entries for the selected fragments
    pub fn batch_texts(&self) -> Vec<FilteredFragment> {
        self.selected
            .iter()
            .map(|fragment| FilteredFragment {
                id: fragment.id(),
                content: fragment.content.clone(),
            })
            .collect()
    }

    /// Whether nothing needs a remote call
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Splits fragments into those worth sending and those to keep as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentFilter {
    config: FilterConfig,
}

impl FragmentFilter {
    /// Create a filter with the given thresholds
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Whether a single fragment should be sent
    pub fn should_translate(&self, content: &str) -> bool {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return false;
        }

        if trimmed.chars().count() < self.config.short_content_threshold {
            return trimmed.chars().any(|c| c.is_alphabetic() || is_cjk_ideograph(c));
        }

        true
    }

    /// Split a flattened page, keeping original order within each side
    pub fn partition(&self, fragments: &[Fragment]) -> FilterOutcome {
        let (selected, passthrough): (Vec<Fragment>, Vec<Fragment>) = fragments
            .iter()
            .cloned()
            .partition(|fragment| self.should_translate(&fragment.content));

        FilterOutcome {
            selected,
            passthrough,
        }
    }
}

/// CJK Unified Ideographs and their extensions
fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}'
        | '\u{2A700}'..='\u{2EBEF}'
        | '\u{30000}'..='\u{3134F}'
    )
}
