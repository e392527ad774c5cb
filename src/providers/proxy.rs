/*!
 * Message-relay transport.
 *
 * A page context that cannot call the endpoint itself (cross-origin rules)
 * posts each batch as a message to a worker holding a real transport, and
 * waits for the reply on a one-shot channel. If the worker is gone, or drops
 * the message without answering, the call fails with
 * [`TransportError::ChannelClosed`].
 */

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::errors::TransportError;
use crate::translation::batch::{BatchOutcome, TranslationBatchRequest};
use crate::translation::endpoint::EndpointParams;

use super::Transport;

/// Reply slot for one relayed batch
type ReplySender = oneshot::Sender<Result<BatchOutcome, TransportError>>;

/// A batch in flight to the worker
#[derive(Debug)]
pub struct ProxyMessage {
    pub endpoint: EndpointParams,
    pub request: TranslationBatchRequest,
    reply: ReplySender,
}

impl ProxyMessage {
    /// Answer the sender; returns false when the sender stopped waiting
    pub fn respond(self, result: Result<BatchOutcome, TransportError>) -> bool {
        self.reply.send(result).is_ok()
    }
}

/// Sending half, used by the pipeline as its transport
#[derive(Debug, Clone)]
pub struct ProxyTransport {
    sender: mpsc::Sender<ProxyMessage>,
}

/// Receiving half, owned by the worker
#[derive(Debug)]
pub struct ProxyReceiver {
    receiver: mpsc::Receiver<ProxyMessage>,
}

impl ProxyTransport {
    /// Create a connected transport/receiver pair
    pub fn channel(buffer: usize) -> (Self, ProxyReceiver) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender }, ProxyReceiver { receiver })
    }

    /// Create a transport whose worker relays to `inner` on a spawned task
    pub fn spawn(inner: Arc<dyn Transport>, buffer: usize) -> (Self, JoinHandle<()>) {
        let (transport, receiver) = Self::channel(buffer);
        let handle = tokio::spawn(receiver.serve(inner));
        (transport, handle)
    }
}

impl ProxyReceiver {
    /// Next relayed batch, or `None` once every sender is gone
    pub async fn next_message(&mut self) -> Option<ProxyMessage> {
        self.receiver.recv().await
    }

    /// Relay messages to `inner` until every sender is gone
    ///
    /// Each message is handled on its own task so independent pages do not
    /// wait on each other.
    pub async fn serve(mut self, inner: Arc<dyn Transport>) {
        while let Some(message) = self.next_message().await {
            let inner = inner.clone();
            tokio::spawn(async move {
                let result = inner.send(&message.endpoint, &message.request).await;
                if !message.respond(result) {
                    debug!("Proxy caller went away before the reply was delivered");
                }
            });
        }
        debug!("Proxy channel closed, worker exiting");
    }
}

#[async_trait]
impl Transport for ProxyTransport {
    async fn send(
        &self,
        endpoint: &EndpointParams,
        request: &TranslationBatchRequest,
    ) -> Result<BatchOutcome, TransportError> {
        let (reply, response) = oneshot::channel();
        let message = ProxyMessage {
            endpoint: endpoint.clone(),
            request: request.clone(),
            reply,
        };

        self.sender.send(message).await.map_err(|_| {
            warn!("Proxy worker is not listening");
            TransportError::ChannelClosed("proxy worker is not listening".to_string())
        })?;

        response.await.map_err(|_| {
            warn!("Proxy worker dropped the request without replying");
            TransportError::ChannelClosed("proxy worker dropped the request".to_string())
        })?
    }
}
