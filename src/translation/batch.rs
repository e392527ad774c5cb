/*!
 * Batch request construction and the generic batch wire contract.
 *
 * Request body:
 *
 * ```json
 * { "texts": [{ "id": "0-0", "content": "Hello" }],
 *   "targetLanguage": "zh-CN", "translatorCode": 0, "promptBuilderCode": 0 }
 * ```
 *
 * A successful reply carries `code: "S000000"` and a `data` object with the
 * translated texts plus the source and target language the provider settled on.
 * Any other code is a failure with an optional `message`.
 */

use serde::{Deserialize, Serialize};

use crate::errors::{TransportError, TranslationError};
use crate::language_utils;

use super::endpoint::EndpointParams;

/// Code the endpoint uses for a successful reply
pub const SUCCESS_CODE: &str = "S000000";

/// A fragment selected for submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredFragment {
    /// `"<groupIndex>-<flatIndex>"`
    pub id: String,
    /// Text to translate
    pub content: String,
}

/// Request body sent to the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationBatchRequest {
    pub texts: Vec<FilteredFragment>,
    pub target_language: String,
    pub translator_code: i64,
    pub prompt_builder_code: i64,
}

/// One translated entry of a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedText {
    pub id: String,
    pub translation: String,
}

/// Payload of a successful reply
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchData {
    #[serde(default)]
    pub texts: Vec<TranslatedText>,
    #[serde(default)]
    pub source_language: String,
    #[serde(default)]
    pub target_language: String,
}

/// Raw reply as it comes off the wire
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchEnvelope {
    pub code: String,
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<BatchData>,
}

/// A reply after its status code has been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Success(BatchData),
    Failure { code: String, message: String },
}

impl BatchEnvelope {
    /// Check the status code and split into success or failure
    pub fn into_outcome(self) -> Result<BatchOutcome, TransportError> {
        if self.code != SUCCESS_CODE {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| self.code.clone());
            return Ok(BatchOutcome::Failure {
                code: self.code,
                message,
            });
        }

        match self.data {
            Some(data) => Ok(BatchOutcome::Success(data)),
            None => Err(TransportError::ParseError(
                "success reply carried no data".to_string(),
            )),
        }
    }
}

impl BatchOutcome {
    /// Decode a reply body
    pub fn from_json(body: &str) -> Result<Self, TransportError> {
        let envelope: BatchEnvelope = serde_json::from_str(body)
            .map_err(|e| TransportError::ParseError(e.to_string()))?;
        envelope.into_outcome()
    }

    /// Successful payload, or the provider's failure as an error
    pub fn into_data(self) -> Result<BatchData, TranslationError> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure { code, message } => Err(TranslationError::Provider { code, message }),
        }
    }
}

/// Builds batch requests for one configured endpoint
#[derive(Debug, Clone, Copy)]
pub struct BatchBuilder {
    translator_code: i64,
    prompt_builder_code: i64,
}

impl BatchBuilder {
    /// Create a builder using the endpoint's translator and prompt builder codes
    pub fn new(endpoint: &EndpointParams) -> Self {
        Self {
            translator_code: endpoint.translator_code(),
            prompt_builder_code: endpoint.prompt_builder_code(),
        }
    }

    /// Build a request, resolving the target against the supported table
    pub fn build(
        &self,
        texts: Vec<FilteredFragment>,
        target_language: &str,
    ) -> Result<TranslationBatchRequest, TranslationError> {
        let target_language = language_utils::resolve_language(target_language)?;

        Ok(TranslationBatchRequest {
            texts,
            target_language: target_language.to_string(),
            translator_code: self.translator_code,
            prompt_builder_code: self.prompt_builder_code,
        })
    }
}
