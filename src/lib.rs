/*!
 * # page-translate - batch reconciliation core for page translation
 *
 * A Rust library that translates the text extracted from a web page through a
 * configurable remote translation endpoint, and hands back a translated page
 * with exactly the same structure.
 *
 * ## Features
 *
 * - Filtering of fragments not worth a remote call (punctuation, short numerals)
 * - One batch request per page against a generic JSON batch contract
 * - Reconciliation of replies by fragment id, with count checks
 * - A single language fallback retry when the page is already in the preferred language
 * - Read-through/write-through result caching
 * - Direct HTTP and message-relay transports
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: The page translation pipeline:
 *   - `translation::filter`: Fragment filtering
 *   - `translation::batch`: Batch construction and wire types
 *   - `translation::reconcile`: Reply reconciliation
 *   - `translation::fallback`: Language fallback retry
 *   - `translation::cache`: Result caching
 *   - `translation::core`: The translation service
 * - `providers`: Transports carrying batches to the endpoint:
 *   - `providers::http`: Direct HTTP
 *   - `providers::proxy`: Message relay to a worker
 *   - `providers::mock`: Scripted replies for tests
 * - `app_controller`: File-based front end used by the CLI
 * - `language_utils`: Supported language table and code matching
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, TransportError, TranslationError};
pub use language_utils::{get_language_name, language_codes_match, resolve_language};
pub use providers::Transport;
pub use translation::{PageRequest, PageText, PageTranslation, TranslationService};
