/*!
 * Page text model.
 *
 * A page arrives as ordered groups of raw fragments, one group per block-level
 * element. The pipeline works on the row-major flattening of that structure and
 * must hand back a page with exactly the same shape.
 */

use serde::{Deserialize, Serialize};

use crate::errors::TranslationError;

/// Ordered fragments belonging to one block of the page
pub type ParagraphGroup = Vec<String>;

/// The full extracted text of a page
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageText {
    groups: Vec<ParagraphGroup>,
}

/// One fragment of the flattened page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Raw text as extracted
    pub content: String,
    /// Position in the flattened sequence
    pub original_index: usize,
    /// Index of the group the fragment came from
    pub group_index: usize,
}

impl Fragment {
    /// Batch identifier, `"<groupIndex>-<flatIndex>"`
    pub fn id(&self) -> String {
        format!("{}-{}", self.group_index, self.original_index)
    }
}

impl PageText {
    /// Create a page from its groups
    pub fn new(groups: Vec<ParagraphGroup>) -> Self {
        Self { groups }
    }

    /// The groups of this page
    pub fn groups(&self) -> &[ParagraphGroup] {
        &self.groups
    }

    /// Fragment count of every group, in order
    pub fn shape(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Total number of fragments
    pub fn fragment_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Whether the page has no groups at all
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Flatten the page row-major
    pub fn flatten(&self) -> Vec<Fragment> {
        let mut fragments = Vec::with_capacity(self.fragment_count());
        for (group_index, group) in self.groups.iter().enumerate() {
            for content in group {
                fragments.push(Fragment {
                    content: content.clone(),
                    original_index: fragments.len(),
                    group_index,
                });
            }
        }
        fragments
    }

    /// Re-nest a flat sequence into groups of the given shape
    pub fn from_shape(shape: &[usize], flat: Vec<String>) -> Result<Self, TranslationError> {
        let expected: usize = shape.iter().sum();
        if flat.len() != expected {
            return Err(TranslationError::CountMismatch(format!(
                "cannot re-nest {} fragments into a page of {}",
                flat.len(),
                expected
            )));
        }

        let mut remaining = flat.into_iter();
        let groups = shape
            .iter()
            .map(|&len| remaining.by_ref().take(len).collect())
            .collect();

        Ok(Self { groups })
    }
}

impl From<Vec<Vec<String>>> for PageText {
    fn from(groups: Vec<Vec<String>>) -> Self {
        Self::new(groups)
    }
}

impl From<Vec<Vec<&str>>> for PageText {
    fn from(groups: Vec<Vec<&str>>) -> Self {
        Self::new(
            groups
                .into_iter()
                .map(|group| group.into_iter().map(str::to_string).collect())
                .collect(),
        )
    }
}
