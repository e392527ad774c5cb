/*!
 * Page translation pipeline.
 *
 * This module contains the batch reconciliation pipeline that turns extracted
 * page text into a translated page of the same shape. It is split into several
 * submodules:
 *
 * - `document`: Page text model, flattening and re-nesting
 * - `filter`: Selection of fragments worth a remote call
 * - `endpoint`: Connection parameters parsed from the endpoint URL
 * - `batch`: Batch construction and the wire contract
 * - `reconcile`: Mapping replies back onto the page
 * - `fallback`: The single language fallback retry
 * - `cache`: Result caching
 * - `core`: The service tying the steps together
 */

// Re-export main types for easier usage
pub use self::batch::{
    BatchBuilder, BatchData, BatchOutcome, FilteredFragment, TranslatedText,
    TranslationBatchRequest,
};
pub use self::cache::{CacheKey, CachedTranslation, MemoryCache, ResultCache};
pub use self::core::{PageRequest, PageTranslation, ProviderSettings, TranslationService, TranslationSettings};
pub use self::document::{Fragment, PageText, ParagraphGroup};
pub use self::endpoint::EndpointParams;
pub use self::fallback::{FallbackState, LanguageFallback, LanguagePreferences, PinnedLanguages};
pub use self::filter::{FilterConfig, FilterOutcome, FragmentFilter};

// Submodules
pub mod batch;
pub mod cache;
pub mod core;
pub mod document;
pub mod endpoint;
pub mod fallback;
pub mod filter;
pub mod reconcile;
