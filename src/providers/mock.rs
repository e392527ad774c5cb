/*!
 * Mock transport for testing.
 *
 * - `MockTransport::echo(source)` - Always succeeds, translating every fragment
 *   to `"[<target>] <content>"` and reporting `source` as the detected language
 * - `MockTransport::scripted(replies)` - Plays back the given replies in order,
 *   then falls back to echoing
 *
 * Every request is recorded so tests can inspect what was sent.
 */

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::TransportError;
use crate::translation::batch::{BatchData, BatchOutcome, TranslatedText, TranslationBatchRequest};
use crate::translation::endpoint::EndpointParams;

use super::Transport;

/// One scripted reply
pub type MockReply = Result<BatchOutcome, TransportError>;

/// Mock transport with scripted replies and request recording
#[derive(Debug)]
pub struct MockTransport {
    /// Replies still to be played back
    script: Mutex<VecDeque<MockReply>>,
    /// Every request received, in order
    requests: Mutex<Vec<TranslationBatchRequest>>,
    /// Source language reported by echo replies
    detected_source: String,
}

impl MockTransport {
    /// Create a mock that echoes every batch
    pub fn echo(detected_source: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            detected_source: detected_source.into(),
        }
    }

    /// Create a mock that plays back `replies` before echoing
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            detected_source: "en".to_string(),
        }
    }

    /// Queue another reply
    pub fn then(self, reply: MockReply) -> Self {
        self.script.lock().push_back(reply);
        self
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<TranslationBatchRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Echo reply for a request
    pub fn echo_outcome(request: &TranslationBatchRequest, detected_source: &str) -> BatchOutcome {
        BatchOutcome::Success(BatchData {
            texts: request
                .texts
                .iter()
                .map(|fragment| TranslatedText {
                    id: fragment.id.clone(),
                    translation: format!("[{}] {}", request.target_language, fragment.content),
                })
                .collect(),
            source_language: detected_source.to_string(),
            target_language: request.target_language.clone(),
        })
    }

    /// Successful reply with explicit translations and languages
    pub fn success(translations: &[(&str, &str)], source_language: &str, target_language: &str) -> MockReply {
        Ok(BatchOutcome::Success(BatchData {
            texts: translations
                .iter()
                .map(|(id, translation)| TranslatedText {
                    id: id.to_string(),
                    translation: translation.to_string(),
                })
                .collect(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }))
    }

    /// Provider failure reply
    pub fn failure(code: &str, message: &str) -> MockReply {
        Ok(BatchOutcome::Failure {
            code: code.to_string(),
            message: message.to_string(),
        })
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        _endpoint: &EndpointParams,
        request: &TranslationBatchRequest,
    ) -> Result<BatchOutcome, TransportError> {
        self.requests.lock().push(request.clone());

        let scripted = self.script.lock().pop_front();
        match scripted {
            Some(reply) => reply,
            None => Ok(Self::echo_outcome(request, &self.detected_source)),
        }
    }
}
