//! Request normalization: from a [`RequestSpec`] to a ready-to-send request.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE, USER_AGENT};
use url::Url;

use crate::config::DEFAULT_USER_AGENT;
use crate::error_handling::EngineError;
use crate::request::spec::{HttpVersion, RequestSpec};

/// The fully resolved, ready-to-send request derived from a [`RequestSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    /// Resolved HTTP method.
    pub method: reqwest::Method,
    /// Parsed absolute URL.
    pub url: Url,
    /// Negotiation preference for the protocol version.
    pub version: HttpVersion,
    /// Merged header map, including User-Agent, Cookie, and Content-Type.
    pub headers: HeaderMap,
    /// Body, present only when the spec body is non-empty.
    pub body: Option<String>,
}

/// Serializes cookie pairs into a single `Cookie` header value:
/// `k1=v1; k2=v2` in iteration order, no trailing separator.
fn consolidate_cookies(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Assembles a [`NormalizedRequest`] from a spec.
///
/// Pure and idempotent: no network or trace side effects. Fails with
/// [`EngineError::InvalidRequest`] when the URL is empty or unparsable, or
/// when a header name or value cannot form a valid HTTP header.
///
/// Header merge rules:
/// - The default User-Agent is applied first, so a caller-supplied
///   `User-Agent` header (or the spec's `user_agent` field) overrides it.
/// - Spec headers are merged in iteration order; later duplicate keys
///   overwrite earlier ones.
/// - Cookies are consolidated into one `Cookie` header. When the spec also
///   carries an explicit `Cookie` header, the two are merged
///   deterministically: explicit value first, then the consolidated map.
pub fn build_request(spec: &RequestSpec) -> Result<NormalizedRequest, EngineError> {
    if spec.url.trim().is_empty() {
        return Err(EngineError::InvalidRequest("URL is empty".to_string()));
    }
    let url = Url::parse(&spec.url)
        .map_err(|e| EngineError::InvalidRequest(format!("invalid URL {:?}: {e}", spec.url)))?;

    let mut headers = HeaderMap::new();

    let user_agent = spec.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
    headers.insert(USER_AGENT, header_value(user_agent, "User-Agent")?);

    for (name, value) in &spec.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| EngineError::InvalidRequest(format!("invalid header name {name:?}: {e}")))?;
        headers.insert(header_name, header_value(value, name)?);
    }

    if !spec.cookies.is_empty() {
        let consolidated = consolidate_cookies(&spec.cookies);
        let merged = match headers.get(COOKIE) {
            Some(existing) => {
                let existing = existing.to_str().map_err(|e| {
                    EngineError::InvalidRequest(format!("invalid Cookie header: {e}"))
                })?;
                format!("{existing}; {consolidated}")
            }
            None => consolidated,
        };
        headers.insert(COOKIE, header_value(&merged, "Cookie")?);
    }

    let body = if spec.body.is_empty() {
        None
    } else {
        headers.insert(CONTENT_TYPE, header_value(&spec.content_type, "Content-Type")?);
        Some(spec.body.clone())
    };

    Ok(NormalizedRequest {
        method: spec.method.as_reqwest(),
        url,
        version: spec.http_version,
        headers,
        body,
    })
}

fn header_value(value: &str, name: &str) -> Result<HeaderValue, EngineError> {
    HeaderValue::from_str(value)
        .map_err(|e| EngineError::InvalidRequest(format!("invalid value for header {name:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::spec::Method;

    fn spec(url: &str) -> RequestSpec {
        RequestSpec::new(url)
    }

    #[test]
    fn test_empty_url_is_rejected() {
        let result = build_request(&spec(""));
        assert!(matches!(result, Err(EngineError::InvalidRequest(_))));
        let result = build_request(&spec("   "));
        assert!(matches!(result, Err(EngineError::InvalidRequest(_))));
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let result = build_request(&spec("/just/a/path"));
        assert!(matches!(result, Err(EngineError::InvalidRequest(_))));
    }

    #[test]
    fn test_default_user_agent_applied() {
        let request = build_request(&spec("https://example.test/")).unwrap();
        assert_eq!(
            request.headers.get(USER_AGENT).unwrap().to_str().unwrap(),
            DEFAULT_USER_AGENT
        );
    }

    #[test]
    fn test_explicit_user_agent_overrides_default() {
        let mut s = spec("https://example.test/");
        s.user_agent = Some("custom-agent/1.0".to_string());
        let request = build_request(&s).unwrap();
        assert_eq!(
            request.headers.get(USER_AGENT).unwrap().to_str().unwrap(),
            "custom-agent/1.0"
        );
    }

    #[test]
    fn test_cookie_consolidation_exact_format() {
        let mut s = spec("https://example.test/");
        s.cookies = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ];
        let request = build_request(&s).unwrap();
        assert_eq!(
            request.headers.get(COOKIE).unwrap().to_str().unwrap(),
            "a=1; b=2"
        );
    }

    #[test]
    fn test_no_cookie_header_when_cookies_empty() {
        let request = build_request(&spec("https://example.test/")).unwrap();
        assert!(request.headers.get(COOKIE).is_none());
    }

    #[test]
    fn test_explicit_cookie_header_merges_with_cookie_map() {
        let mut s = spec("https://example.test/");
        s.headers = vec![("Cookie".to_string(), "session=xyz".to_string())];
        s.cookies = vec![("a".to_string(), "1".to_string())];
        let request = build_request(&s).unwrap();
        assert_eq!(
            request.headers.get(COOKIE).unwrap().to_str().unwrap(),
            "session=xyz; a=1"
        );
        // One Cookie header, never two
        assert_eq!(request.headers.get_all(COOKIE).iter().count(), 1);
    }

    #[test]
    fn test_later_duplicate_header_wins() {
        let mut s = spec("https://example.test/");
        s.headers = vec![
            ("X-Token".to_string(), "first".to_string()),
            ("X-Token".to_string(), "second".to_string()),
        ];
        let request = build_request(&s).unwrap();
        assert_eq!(
            request.headers.get("X-Token").unwrap().to_str().unwrap(),
            "second"
        );
    }

    #[test]
    fn test_body_and_content_type_only_when_body_nonempty() {
        let empty = build_request(&spec("https://example.test/")).unwrap();
        assert!(empty.body.is_none());
        assert!(empty.headers.get(CONTENT_TYPE).is_none());

        let mut s = spec("https://example.test/");
        s.method = Method::Post;
        s.body = "a=1&b=2".to_string();
        let request = build_request(&s).unwrap();
        assert_eq!(request.body.as_deref(), Some("a=1&b=2"));
        assert_eq!(
            request.headers.get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let mut s = spec("https://example.test/");
        s.headers = vec![("bad header\n".to_string(), "v".to_string())];
        assert!(matches!(
            build_request(&s),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut s = spec("https://example.test/path?q=1");
        s.method = Method::Post;
        s.body = "payload".to_string();
        s.headers = vec![("X-Test".to_string(), "1".to_string())];
        s.cookies = vec![("a".to_string(), "1".to_string())];
        let first = build_request(&s).unwrap();
        let second = build_request(&s).unwrap();
        assert_eq!(first, second);
    }
}
