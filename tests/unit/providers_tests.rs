/*!
 * Tests for transport implementations
 */

use std::sync::Arc;
use std::time::Duration;

use page_translate::errors::{TransportError, TranslationError};
use page_translate::providers::Transport;
use page_translate::providers::http::HttpTransport;
use page_translate::providers::mock::MockTransport;
use page_translate::providers::proxy::ProxyTransport;
use page_translate::translation::{
    BatchOutcome, EndpointParams, FilteredFragment, TranslationBatchRequest,
};

use crate::common::{serve_once, TEST_ENDPOINT};

fn endpoint() -> EndpointParams {
    EndpointParams::parse(TEST_ENDPOINT).unwrap()
}

fn request(target: &str) -> TranslationBatchRequest {
    TranslationBatchRequest {
        texts: vec![FilteredFragment {
            id: "0-0".to_string(),
            content: "Hello".to_string(),
        }],
        target_language: target.to_string(),
        translator_code: 2,
        prompt_builder_code: 5,
    }
}

#[tokio::test]
async fn test_mock_echo_shouldTranslateAndRecord() {
    let mock = MockTransport::echo("en");
    let outcome = mock.send(&endpoint(), &request("fr")).await.unwrap();

    let data = outcome.into_data().unwrap();
    assert_eq!(data.texts[0].translation, "[fr] Hello");
    assert_eq!(data.source_language, "en");
    assert_eq!(data.target_language, "fr");
    assert_eq!(mock.call_count(), 1);
    assert_eq!(mock.requests()[0], request("fr"));
}

#[tokio::test]
async fn test_mock_scripted_shouldPlayBackInOrderThenEcho() {
    let mock = MockTransport::scripted(vec![MockTransport::failure("E1", "first")])
        .then(Err(TransportError::ConnectionError("second".into())));

    let first = mock.send(&endpoint(), &request("fr")).await.unwrap();
    assert!(matches!(first, BatchOutcome::Failure { .. }));

    let second = mock.send(&endpoint(), &request("fr")).await;
    assert!(matches!(second, Err(TransportError::ConnectionError(_))));

    let third = mock.send(&endpoint(), &request("fr")).await.unwrap();
    assert!(matches!(third, BatchOutcome::Success(_)));
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test]
async fn test_proxy_withSpawnedWorker_shouldRelayToInner() {
    let inner = Arc::new(MockTransport::echo("de"));
    let (proxy, _worker) = ProxyTransport::spawn(inner.clone(), 4);

    let outcome = proxy.send(&endpoint(), &request("en")).await.unwrap();
    let data = outcome.into_data().unwrap();

    assert_eq!(data.texts[0].translation, "[en] Hello");
    assert_eq!(data.source_language, "de");
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test]
async fn test_proxy_withDroppedReceiver_shouldFailChannelClosed() {
    let (proxy, receiver) = ProxyTransport::channel(1);
    drop(receiver);

    let result = proxy.send(&endpoint(), &request("en")).await;
    assert!(matches!(result, Err(TransportError::ChannelClosed(_))));
}

#[tokio::test]
async fn test_proxy_withUnansweredMessage_shouldFailChannelClosed() {
    let (proxy, mut receiver) = ProxyTransport::channel(1);

    let worker = tokio::spawn(async move {
        // Take the message and drop it without replying
        let message = receiver.next_message().await;
        assert!(message.is_some());
    });

    let result = proxy.send(&endpoint(), &request("en")).await;
    assert!(matches!(result, Err(TransportError::ChannelClosed(_))));
    worker.await.unwrap();
}

#[tokio::test]
async fn test_proxy_withManualReply_shouldDeliverIt() {
    let (proxy, mut receiver) = ProxyTransport::channel(1);

    let worker = tokio::spawn(async move {
        let message = receiver.next_message().await.unwrap();
        assert_eq!(message.request.target_language, "ja");
        assert_eq!(message.endpoint.authorization(), "Bearer secret");
        let reply = MockTransport::echo_outcome(&message.request, "en");
        assert!(message.respond(Ok(reply)));
    });

    let outcome = proxy.send(&endpoint(), &request("ja")).await.unwrap();
    assert!(matches!(outcome, BatchOutcome::Success(_)));
    worker.await.unwrap();
}

#[tokio::test]
async fn test_http_withUnreachableEndpoint_shouldFailAsTransportError() {
    let transport = local_transport();
    let endpoint = EndpointParams::parse("http://127.0.0.1:9/batch?key=k").unwrap();

    let result = transport.send(&endpoint, &request("fr")).await;
    assert!(matches!(
        result,
        Err(TransportError::ConnectionError(_)) | Err(TransportError::RequestFailed(_))
    ));
}

/// HTTP transport that ignores proxy settings from the environment
fn local_transport() -> HttpTransport {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    HttpTransport::with_client(client)
}

fn local_endpoint(base: &str, query: &str) -> EndpointParams {
    EndpointParams::parse(&format!("{}/api/batch?{}", base, query)).unwrap()
}

#[tokio::test]
async fn test_http_withSuccessReply_shouldSendWireContractAndDecode() {
    let reply = r#"{"code":"S000000","data":{"texts":[{"id":"0-0","translation":"Bonjour"}],"sourceLanguage":"en","targetLanguage":"fr"}}"#;
    let (base, server) = serve_once("200 OK", reply).await.unwrap();
    let endpoint = local_endpoint(&base, "key=secret&tc=2&pbc=5&org=reader");

    let outcome = local_transport().send(&endpoint, &request("fr")).await.unwrap();
    let captured = server.await.unwrap();

    assert!(captured.head.starts_with("POST /api/batch HTTP/1.1"));
    assert_eq!(captured.header("content-type").as_deref(), Some("application/json"));
    assert_eq!(captured.header("authorization").as_deref(), Some("Bearer secret"));
    assert_eq!(captured.header("x-client-origin").as_deref(), Some("reader"));

    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body["targetLanguage"], "fr");
    assert_eq!(body["translatorCode"], 2);
    assert_eq!(body["promptBuilderCode"], 5);
    assert_eq!(body["texts"][0]["id"], "0-0");
    assert_eq!(body["texts"][0]["content"], "Hello");

    let data = outcome.into_data().unwrap();
    assert_eq!(data.texts[0].translation, "Bonjour");
    assert_eq!(data.source_language, "en");
    assert_eq!(data.target_language, "fr");
}

#[tokio::test]
async fn test_http_withoutTokenOrOrigin_shouldOmitThoseHeaders() {
    let reply = r#"{"code":"S000000","data":{"texts":[{"id":"0-0","translation":"Hallo"}]}}"#;
    let (base, server) = serve_once("200 OK", reply).await.unwrap();
    let endpoint = local_endpoint(&base, "tc=1");

    local_transport().send(&endpoint, &request("de")).await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(captured.header("authorization"), None);
    assert_eq!(captured.header("x-client-origin"), None);
}

#[tokio::test]
async fn test_http_withFailureCodeOnSuccessStatus_shouldReturnFailure() {
    let (base, server) = serve_once("200 OK", r#"{"code":"E100001","message":"quota exhausted"}"#)
        .await
        .unwrap();
    let endpoint = local_endpoint(&base, "key=secret");

    let outcome = local_transport().send(&endpoint, &request("fr")).await.unwrap();
    server.await.unwrap();

    assert_eq!(
        outcome,
        BatchOutcome::Failure {
            code: "E100001".to_string(),
            message: "quota exhausted".to_string(),
        }
    );
}

#[tokio::test]
async fn test_http_withErrorStatusAndProviderEnvelope_shouldSurfaceProviderError() {
    let (base, server) = serve_once("401 Unauthorized", r#"{"code":"E401","message":"invalid token"}"#)
        .await
        .unwrap();
    let endpoint = local_endpoint(&base, "key=wrong");

    let outcome = local_transport().send(&endpoint, &request("fr")).await.unwrap();
    server.await.unwrap();

    let error = outcome.into_data().unwrap_err();
    assert_eq!(error.code(), "E_PROVIDER");
    assert_eq!(
        error,
        TranslationError::Provider {
            code: "E401".to_string(),
            message: "invalid token".to_string(),
        }
    );
}

#[tokio::test]
async fn test_http_withErrorStatusAndPlainBody_shouldFailAsApiError() {
    let (base, server) = serve_once("502 Bad Gateway", r#"{"error":"upstream down"}"#)
        .await
        .unwrap();
    let endpoint = local_endpoint(&base, "key=secret");

    let result = local_transport().send(&endpoint, &request("fr")).await;
    server.await.unwrap();

    match result {
        Err(TransportError::ApiError {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 502);
            assert!(message.contains("upstream down"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_withUndecodableSuccessBody_shouldFailAsParseError() {
    let (base, server) = serve_once("200 OK", "not json").await.unwrap();
    let endpoint = local_endpoint(&base, "key=secret");

    let result = local_transport().send(&endpoint, &request("fr")).await;
    server.await.unwrap();

    assert!(matches!(result, Err(TransportError::ParseError(_))));
}
