/*!
 * Response reconciliation.
 *
 * Maps the translations of a batch back onto the page it came from. Every
 * fragment that was sent is replaced by its translation (looked up by id),
 * every fragment that was filtered out keeps its original content, and the
 * result is re-nested with the input's group boundaries.
 */

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::errors::TranslationError;

use super::batch::{BatchData, FilteredFragment};
use super::document::PageText;

/// Rebuild a translated page from a batch reply
///
/// Fails with [`TranslationError::CountMismatch`] when the reply does not carry
/// exactly one translation per sent fragment, or when an id is unknown.
pub fn reconcile(
    page: &PageText,
    sent: &[FilteredFragment],
    data: &BatchData,
) -> Result<PageText, TranslationError> {
    if data.texts.len() != sent.len() {
        return Err(TranslationError::CountMismatch(format!(
            "sent {} fragments but received {} translations",
            sent.len(),
            data.texts.len()
        )));
    }

    let translations: HashMap<&str, &str> = data
        .texts
        .iter()
        .map(|t| (t.id.as_str(), t.translation.as_str()))
        .collect();
    let sent_ids: HashSet<&str> = sent.iter().map(|f| f.id.as_str()).collect();

    let fragments = page.flatten();
    let mut output = Vec::with_capacity(fragments.len());
    let mut matched = 0;

    for fragment in &fragments {
        let id = fragment.id();
        if !sent_ids.contains(id.as_str()) {
            output.push(fragment.content.clone());
            continue;
        }

        let translation = translations.get(id.as_str()).ok_or_else(|| {
            TranslationError::CountMismatch(format!("no translation returned for fragment {}", id))
        })?;
        output.push((*translation).to_string());
        matched += 1;
    }

    if matched != sent_ids.len() {
        return Err(TranslationError::CountMismatch(format!(
            "{} sent ids do not belong to this page",
            sent_ids.len() - matched
        )));
    }

    debug!(
        "Reconciled {} translated and {} pass-through fragments",
        matched,
        fragments.len() - matched
    );

    PageText::from_shape(&page.shape(), output)
}
