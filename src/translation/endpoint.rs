/*!
 * Endpoint parameter parsing.
 *
 * A provider is configured with a single URL whose query string carries the
 * connection parameters:
 *
 * - `key` - access token
 * - `tc`  - translator code
 * - `pbc` - prompt builder code
 * - `org` - optional client origin
 *
 * The URL without its query string is the POST target.
 */

use url::Url;

use crate::errors::TranslationError;

/// Connection parameters parsed once from a configured endpoint URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointParams {
    base_url: String,
    authorization: String,
    translator_code: i64,
    prompt_builder_code: i64,
    origin: Option<String>,
}

impl EndpointParams {
    /// Parse an endpoint URL
    pub fn parse(endpoint: &str) -> Result<Self, TranslationError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(TranslationError::Configuration(
                "endpoint URL cannot be empty".to_string(),
            ));
        }

        let url = Url::parse(endpoint).map_err(|e| {
            TranslationError::Configuration(format!("invalid endpoint URL '{}': {}", endpoint, e))
        })?;

        let mut token = None;
        let mut translator_code = None;
        let mut prompt_builder_code = None;
        let mut origin = None;

        for (name, value) in url.query_pairs() {
            match &*name {
                "key" if token.is_none() => token = Some(value.into_owned()),
                "tc" if translator_code.is_none() => translator_code = Some(parse_code("tc", &value)?),
                "pbc" if prompt_builder_code.is_none() => {
                    prompt_builder_code = Some(parse_code("pbc", &value)?)
                }
                "org" if origin.is_none() && !value.trim().is_empty() => {
                    origin = Some(value.trim().to_string())
                }
                _ => {}
            }
        }

        let mut base = url.clone();
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self {
            base_url: base.to_string(),
            authorization: bearer_token(token.as_deref().unwrap_or_default()),
            translator_code: translator_code.unwrap_or(0),
            prompt_builder_code: prompt_builder_code.unwrap_or(0),
            origin,
        })
    }

    /// POST target, without query string
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Authorization` header value; empty when no token is configured
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Translator selection code
    pub fn translator_code(&self) -> i64 {
        self.translator_code
    }

    /// Prompt builder selection code
    pub fn prompt_builder_code(&self) -> i64 {
        self.prompt_builder_code
    }

    /// Client origin sent along with requests, if configured
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}

fn parse_code(name: &str, value: &str) -> Result<i64, TranslationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }

    value.parse::<i64>().map_err(|_| {
        TranslationError::Configuration(format!(
            "query parameter '{}' must be an integer, got '{}'",
            name, value
        ))
    })
}

/// Normalize a raw token into a bearer credential
pub fn bearer_token(token: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        return String::new();
    }

    let has_scheme = token
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "));
    if has_scheme {
        token.to_string()
    } else {
        format!("Bearer {}", token)
    }
}
