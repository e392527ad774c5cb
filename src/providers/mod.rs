/*!
 * Transports for delivering translation batches.
 *
 * This module contains the implementations the pipeline can send batches through:
 * - `http`: direct HTTP POST to the configured endpoint
 * - `proxy`: message relay to a worker that owns another transport, the way an
 *   extension page hands requests to its background context
 * - `mock`: scripted replies for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::TransportError;
use crate::translation::batch::{BatchOutcome, TranslationBatchRequest};
use crate::translation::endpoint::EndpointParams;

/// Common trait for everything that can carry a batch to the endpoint
///
/// This trait keeps the pipeline independent of how the request actually
/// travels, so implementations can be used interchangeably.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Send a batch and return the decoded reply
    ///
    /// # Arguments
    /// * `endpoint` - Where and with which credentials to send
    /// * `request` - The batch to send
    ///
    /// # Returns
    /// * `Result<BatchOutcome, TransportError>` - The provider's verdict, or a delivery failure
    async fn send(
        &self,
        endpoint: &EndpointParams,
        request: &TranslationBatchRequest,
    ) -> Result<BatchOutcome, TransportError>;
}

pub mod http;
pub mod mock;
pub mod proxy;
