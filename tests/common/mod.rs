/*!
 * Common test utilities for the page-translate test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use page_translate::providers::mock::MockTransport;
use page_translate::translation::{
    EndpointParams, FilterConfig, LanguagePreferences, PageText, ProviderSettings,
    TranslationService, TranslationSettings,
};

/// Provider id used throughout the tests
pub const TEST_PROVIDER: &str = "test";

/// Endpoint URL used throughout the tests
pub const TEST_ENDPOINT: &str = "https://translate.example.com/api/batch?key=secret&tc=2&pbc=5";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Settings with one provider and the given preferred languages
pub fn test_settings(preferred: &str, second_preferred: &str) -> TranslationSettings {
    TranslationSettings {
        providers: vec![ProviderSettings {
            id: TEST_PROVIDER.to_string(),
            endpoint: EndpointParams::parse(TEST_ENDPOINT).expect("test endpoint should parse"),
        }],
        languages: LanguagePreferences {
            preferred: preferred.to_string(),
            second_preferred: second_preferred.to_string(),
        },
        filter: FilterConfig::default(),
    }
}

/// Service over a mock transport; the mock is returned for inspection
pub fn service_with(
    settings: TranslationSettings,
    transport: MockTransport,
) -> (TranslationService, Arc<MockTransport>) {
    let transport = Arc::new(transport);
    let service = TranslationService::new(settings, transport.clone());
    (service, transport)
}

/// Build a page from string literals
pub fn page(groups: Vec<Vec<&str>>) -> PageText {
    PageText::from(groups)
}

/// A request captured by [`serve_once`]
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request line and headers
    pub head: String,
    /// Raw request body
    pub body: String,
}

impl CapturedRequest {
    /// Value of a header, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

/// Answer a single HTTP request on a local port with `status` and a JSON `body`
///
/// Returns the base URL to post to and a handle resolving to the captured request.
pub async fn serve_once(status: &str, body: &str) -> Result<(String, JoinHandle<CapturedRequest>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("client should connect");
        let mut raw = Vec::new();
        let mut chunk = [0u8; 4096];

        let (head, body_start, content_length) = loop {
            let read = socket.read(&mut chunk).await.expect("request should be readable");
            assert!(read > 0, "connection closed before headers were complete");
            raw.extend_from_slice(&chunk[..read]);

            if let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&raw[..end]).to_string();
                let content_length = head
                    .lines()
                    .find_map(|line| {
                        let (key, value) = line.split_once(':')?;
                        key.trim().eq_ignore_ascii_case("content-length").then(|| value.trim().to_string())
                    })
                    .and_then(|value| value.parse::<usize>().ok())
                    .unwrap_or(0);
                break (head, end + 4, content_length);
            }
        };

        while raw.len() < body_start + content_length {
            let read = socket.read(&mut chunk).await.expect("body should be readable");
            assert!(read > 0, "connection closed before the body was complete");
            raw.extend_from_slice(&chunk[..read]);
        }

        socket
            .write_all(response.as_bytes())
            .await
            .expect("response should be writable");
        socket.shutdown().await.ok();

        CapturedRequest {
            head,
            body: String::from_utf8_lossy(&raw[body_start..body_start + content_length]).to_string(),
        }
    });

    Ok((format!("http://{}", address), handle))
}
