use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::{AppError, TranslationError};
use crate::providers::Transport;
use crate::providers::http::HttpTransport;
use crate::translation::{MemoryCache, PageRequest, PageText, PageTranslation, TranslationService};

// @module: Application controller for file-based page translation

/// Options for one translate run
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Provider id; the first enabled provider when absent
    pub source_id: Option<String>,
    /// Explicit source language
    pub from: Option<String>,
    /// Explicit target language
    pub to: Option<String>,
    /// Content identity for the cache key
    pub content_id: Option<String>,
    /// Output file; `<stem>.<target>.json` next to the input when absent
    pub output: Option<PathBuf>,
}

/// Main application controller for page translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Pipeline service
    service: TranslationService,
}

impl Controller {
    // @method: Create a controller sending over HTTP
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let transport = Arc::new(HttpTransport::new(Duration::from_secs(config.timeout_secs)));
        Self::with_transport(config, transport)
    }

    // @method: Create a controller with a custom transport
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self, AppError> {
        let mut service = TranslationService::new(config.settings()?, transport);
        if config.cache.enabled {
            service = service.with_cache(Arc::new(MemoryCache::new(true)));
        }

        Ok(Self { config, service })
    }

    /// Read a page from a JSON array of arrays of strings
    pub fn read_page<P: AsRef<Path>>(path: P) -> Result<PageText, AppError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AppError::File(format!("Input file does not exist: {:?}", path)));
        }

        let content = std::fs::read_to_string(path)?;
        let page: PageText = serde_json::from_str(&content)?;
        Ok(page)
    }

    // @generates: Output path for a translated page
    pub fn output_path<P: AsRef<Path>>(input_file: P, target_language: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(target_language);
        output_filename.push_str(".json");

        input_file.with_file_name(output_filename)
    }

    /// Translate a page already in memory
    pub async fn translate(&self, page: PageText, options: &TranslateOptions) -> Result<PageTranslation, AppError> {
        let source_id = match &options.source_id {
            Some(id) => id.clone(),
            None => self
                .config
                .default_provider_id()
                .ok_or_else(|| TranslationError::Configuration("no enabled provider".to_string()))?
                .to_string(),
        };

        let mut request = PageRequest::new(source_id, page);
        if let Some(from) = &options.from {
            request = request.from_language(from.clone());
        }
        if let Some(to) = &options.to {
            request = request.to_language(to.clone());
        }
        if let Some(content_id) = &options.content_id {
            request = request.content_id(content_id.clone());
        }

        Ok(self.service.translate_page(&request).await?)
    }

    /// Translate a page file and write the result next to it
    pub async fn run(&self, input_file: &Path, options: &TranslateOptions) -> Result<(PathBuf, PageTranslation), AppError> {
        let start_time = std::time::Instant::now();

        let page = Self::read_page(input_file)?;
        debug!(
            "Read {} groups with {} fragments from {:?}",
            page.groups().len(),
            page.fragment_count(),
            input_file
        );

        let translation = self.translate(page, options).await?;

        let output_path = options
            .output
            .clone()
            .unwrap_or_else(|| Self::output_path(input_file, &translation.sent_target));
        let json = serde_json::to_string_pretty(&translation.page)?;
        std::fs::write(&output_path, json)?;

        info!(
            "Translated {:?} ({} -> {}{}) in {:.2?}",
            input_file,
            translation.source_language,
            translation.target_language,
            if translation.retried { ", fallback" } else { "" },
            start_time.elapsed()
        );
        info!("Success: {:?}", output_path);

        Ok((output_path, translation))
    }
}
