/*!
 * Core page translation service.
 *
 * This module contains the `TranslationService` that drives one page through
 * the pipeline: cache lookup, filtering, batch construction, transport,
 * reconciliation, the optional language fallback retry, and the cache write.
 */

use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info};

use crate::errors::TranslationError;
use crate::language_utils;
use crate::providers::Transport;

use super::batch::{BatchBuilder, BatchData, TranslationBatchRequest};
use super::cache::{content_digest, CacheKey, CachedTranslation, ResultCache};
use super::document::PageText;
use super::endpoint::EndpointParams;
use super::fallback::{LanguageFallback, LanguagePreferences, PinnedLanguages};
use super::filter::{FilterConfig, FragmentFilter};
use super::reconcile::reconcile;

/// Source language label used when the provider detects it
pub const AUTO_LANGUAGE: &str = "auto";

/// A provider the pipeline can send to, with its parsed endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Identifier callers use to select this provider
    pub id: String,
    /// Parsed endpoint parameters
    pub endpoint: EndpointParams,
}

/// Everything the pipeline needs from configuration, passed in explicitly
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationSettings {
    /// Enabled providers
    pub providers: Vec<ProviderSettings>,
    /// Preferred languages for target selection and fallback
    pub languages: LanguagePreferences,
    /// Fragment filter thresholds
    pub filter: FilterConfig,
}

impl TranslationSettings {
    /// Find the provider configured for a source identifier
    pub fn provider(&self, source_id: &str) -> Result<&ProviderSettings, TranslationError> {
        self.providers
            .iter()
            .find(|p| p.id == source_id)
            .ok_or_else(|| {
                TranslationError::Configuration(format!(
                    "no provider configured for source '{}'",
                    source_id
                ))
            })
    }
}

/// One page to translate
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Provider identifier
    pub source_id: String,
    /// Stable identity of the content for caching (selector, page address);
    /// a digest of the text is used when absent
    pub content_id: Option<String>,
    /// Extracted page text
    pub page: PageText,
    /// Explicit source language
    pub from: Option<String>,
    /// Explicit target language
    pub to: Option<String>,
}

impl PageRequest {
    /// Create a request with auto-detected languages
    pub fn new(source_id: impl Into<String>, page: PageText) -> Self {
        Self {
            source_id: source_id.into(),
            content_id: None,
            page,
            from: None,
            to: None,
        }
    }

    /// Pin the source language
    pub fn from_language(mut self, language: impl Into<String>) -> Self {
        self.from = Some(language.into());
        self
    }

    /// Pin the target language
    pub fn to_language(mut self, language: impl Into<String>) -> Self {
        self.to = Some(language.into());
        self
    }

    /// Set the content identity used in the cache key
    pub fn content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }
}

/// Result of translating one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageTranslation {
    /// Translated page, same shape as the input
    pub page: PageText,
    /// Source language reported by the provider, or the requested one
    pub source_language: String,
    /// Language the page ended up translated into, as reported by the provider
    pub target_language: String,
    /// Supported-table code of the last batch sent; safe to use in file names
    pub sent_target: String,
    /// Whether the language fallback retry fired
    pub retried: bool,
    /// Whether the result came from the cache
    pub from_cache: bool,
}

/// Page translation service
#[derive(Clone)]
pub struct TranslationService {
    /// Explicit settings
    settings: TranslationSettings,
    /// How batches reach the endpoint
    transport: Arc<dyn Transport>,
    /// Optional result cache
    cache: Option<Arc<dyn ResultCache>>,
}

impl TranslationService {
    /// Create a new service without a cache
    pub fn new(settings: TranslationSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
            cache: None,
        }
    }

    /// Attach a result cache
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Translate one page
    pub async fn translate_page(&self, request: &PageRequest) -> Result<PageTranslation, TranslationError> {
        let provider = self.settings.provider(&request.source_id)?;

        let source_language = match &request.from {
            Some(from) => language_utils::resolve_language(from)?.to_string(),
            None => AUTO_LANGUAGE.to_string(),
        };
        let requested_target = request
            .to
            .as_deref()
            .unwrap_or(self.settings.languages.preferred.as_str());
        let target_language = language_utils::resolve_language(requested_target)?;

        let cache_key = CacheKey::new(
            provider.id.clone(),
            source_language.clone(),
            target_language,
            request
                .content_id
                .clone()
                .unwrap_or_else(|| content_digest(&request.page)),
        );

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                if cached.page.shape() == request.page.shape() {
                    return Ok(PageTranslation {
                        page: cached.page,
                        source_language: cached.source_language,
                        target_language: cached.target_language,
                        sent_target: cached.sent_target,
                        retried: cached.retried,
                        from_cache: true,
                    });
                }
                debug!("Ignoring cached entry for {} with a different shape", cache_key);
            }
        }

        let filter = FragmentFilter::new(self.settings.filter);
        let outcome = filter.partition(&request.page.flatten());

        if outcome.is_empty() {
            debug!("Nothing to translate on page for {}, passing through", provider.id);
            let page = reconcile(&request.page, &[], &BatchData::default())?;
            return Ok(PageTranslation {
                page,
                source_language,
                target_language: target_language.to_string(),
                sent_target: target_language.to_string(),
                retried: false,
                from_cache: false,
            });
        }

        let builder = BatchBuilder::new(&provider.endpoint);
        let batch = builder.build(outcome.batch_texts(), target_language)?;

        let (mut page, mut data) = self.send_and_reconcile(provider, &request.page, &batch).await?;

        let mut fallback = LanguageFallback::new(
            self.settings.languages.clone(),
            PinnedLanguages {
                source: request.from.is_some(),
                target: request.to.is_some(),
            },
        );

        let mut retried = false;
        let mut sent_target = batch.target_language.clone();
        if let Some(second) = fallback.next_target(&data) {
            let retry = builder.build(batch.texts.clone(), &second)?;
            (page, data) = self.send_and_reconcile(provider, &request.page, &retry).await?;
            sent_target = retry.target_language;
            retried = true;
        }

        let result = PageTranslation {
            page,
            source_language: if data.source_language.is_empty() {
                source_language
            } else {
                data.source_language.clone()
            },
            target_language: if data.target_language.is_empty() {
                sent_target.clone()
            } else {
                data.target_language.clone()
            },
            sent_target,
            retried,
            from_cache: false,
        };

        if let Some(cache) = &self.cache {
            cache
                .put(
                    cache_key,
                    CachedTranslation {
                        page: result.page.clone(),
                        source_language: result.source_language.clone(),
                        target_language: result.target_language.clone(),
                        sent_target: result.sent_target.clone(),
                        retried: result.retried,
                    },
                )
                .await;
        }

        Ok(result)
    }

    /// Send one batch and map the reply back onto the page
    async fn send_and_reconcile(
        &self,
        provider: &ProviderSettings,
        page: &PageText,
        batch: &TranslationBatchRequest,
    ) -> Result<(PageText, BatchData), TranslationError> {
        let start_time = Instant::now();
        let outcome = self.transport.send(&provider.endpoint, batch).await.map_err(|e| {
            error!("Transport to {} failed: {}", provider.id, e);
            TranslationError::from(e)
        })?;

        let data = outcome.into_data().map_err(|e| {
            error!("Provider {} rejected batch: {}", provider.id, e);
            e
        })?;

        info!(
            "Translated {} fragments via {} ({} -> {}) in {:?}",
            batch.texts.len(),
            provider.id,
            data.source_language,
            data.target_language,
            start_time.elapsed()
        );

        let page = reconcile(page, &batch.texts, &data)?;
        Ok((page, data))
    }
}
