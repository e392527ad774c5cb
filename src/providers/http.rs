use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, header};

use crate::errors::TransportError;
use crate::translation::batch::{BatchEnvelope, BatchOutcome, TranslationBatchRequest, SUCCESS_CODE};
use crate::translation::endpoint::EndpointParams;

use super::Transport;

/// Header carrying the configured client origin
pub const CLIENT_ORIGIN_HEADER: &str = "X-Client-Origin";

/// Transport posting batches straight to the endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// HTTP client for API requests
    client: Client,
}

impl HttpTransport {
    /// Create a new HTTP transport with a per-request timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a transport over a preconfigured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

fn request_error(e: reqwest::Error) -> TransportError {
    if e.is_connect() || e.is_timeout() {
        TransportError::ConnectionError(e.to_string())
    } else {
        TransportError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &EndpointParams,
        request: &TranslationBatchRequest,
    ) -> Result<BatchOutcome, TransportError> {
        debug!(
            "Posting {} fragments to {} (target {})",
            request.texts.len(),
            endpoint.base_url(),
            request.target_language
        );

        let mut builder = self
            .client
            .post(endpoint.base_url())
            .header(header::CONTENT_TYPE, "application/json");

        if !endpoint.authorization().is_empty() {
            builder = builder.header(header::AUTHORIZATION, endpoint.authorization());
        }

        if let Some(origin) = endpoint.origin() {
            builder = builder.header(CLIENT_ORIGIN_HEADER, origin);
        }

        let response = builder.json(request).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Translation endpoint error ({}): {}", status, error_text);

            // Error statuses may still carry the provider's failure envelope
            if let Ok(envelope) = serde_json::from_str::<BatchEnvelope>(&error_text) {
                if envelope.code != SUCCESS_CODE {
                    return envelope.into_outcome();
                }
            }

            return Err(TransportError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await.map_err(request_error)?;
        BatchOutcome::from_json(&body)
    }
}
