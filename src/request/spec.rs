//! Request descriptions: method, protocol version, and the per-call spec.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_CONTENT_TYPE;
use crate::proxy::ProxyEndpoint;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
    /// HEAD request
    Head,
    /// PATCH request
    Patch,
    /// OPTIONS request
    Options,
}

impl Method {
    /// Converts to the transport-layer method type.
    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Patch => reqwest::Method::PATCH,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_reqwest().as_str())
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Get
    }
}

/// Requested HTTP protocol version.
///
/// The version is a preference, not a demand: the transport uses the
/// requested version when the server supports it and steps down to a lower
/// mutually supported version otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpVersion {
    /// HTTP/1.1
    Http11,
    /// HTTP/2
    Http2,
    /// HTTP/3
    Http3,
}

impl HttpVersion {
    /// Resolves a free-form version string: `"2.0"` maps to HTTP/2,
    /// `"3.0"` to HTTP/3, and anything else falls back to HTTP/1.1.
    pub fn from_version_str(version: &str) -> Self {
        match version {
            "2.0" => HttpVersion::Http2,
            "3.0" => HttpVersion::Http3,
            _ => HttpVersion::Http11,
        }
    }
}

impl std::fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HttpVersion::Http11 => "HTTP/1.1",
            HttpVersion::Http2 => "HTTP/2",
            HttpVersion::Http3 => "HTTP/3",
        })
    }
}

impl Default for HttpVersion {
    fn default() -> Self {
        HttpVersion::Http11
    }
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

fn default_retry_count() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Immutable description of one desired HTTP transaction.
///
/// Headers and cookies are ordered pairs: header iteration order decides
/// which duplicate key wins at send time, and cookie iteration order
/// decides the layout of the consolidated `Cookie` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Absolute target URL.
    pub url: String,
    /// HTTP method.
    #[serde(default)]
    pub method: Method,
    /// Preferred protocol version.
    #[serde(default)]
    pub http_version: HttpVersion,
    /// Whether redirects are followed automatically.
    #[serde(default = "default_true")]
    pub auto_redirect: bool,
    /// Request body; empty means no body.
    #[serde(default)]
    pub body: String,
    /// Content-Type for the body; ignored when the body is empty.
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Caller-supplied headers in send order; later duplicate keys win.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Cookies consolidated into one `Cookie` header at send time.
    #[serde(default)]
    pub cookies: Vec<(String, String)>,
    /// User-Agent override; the default constant applies when absent.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Request timeout in seconds; 0 means the default timeout.
    #[serde(default)]
    pub timeout_seconds: u64,
    /// Maximum number of attempts; values below 1 are treated as 1.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    /// Proxy rotation pool; empty means direct connection.
    #[serde(default)]
    pub proxy_pool: Vec<ProxyEndpoint>,
    /// Whether the trace includes the raw byte dump of the response body.
    #[serde(default)]
    pub output_raw: bool,
}

impl RequestSpec {
    /// Creates a GET spec for `url` with every other field at its default.
    pub fn new(url: impl Into<String>) -> Self {
        RequestTemplate::default().for_url(url)
    }
}

/// A [`RequestSpec`] missing only its URL, used to fan the same request
/// shape out across multiple URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestTemplate {
    /// HTTP method.
    pub method: Method,
    /// Preferred protocol version.
    pub http_version: HttpVersion,
    /// Whether redirects are followed automatically.
    pub auto_redirect: bool,
    /// Request body; empty means no body.
    pub body: String,
    /// Content-Type for the body; ignored when the body is empty.
    pub content_type: String,
    /// Caller-supplied headers in send order; later duplicate keys win.
    pub headers: Vec<(String, String)>,
    /// Cookies consolidated into one `Cookie` header at send time.
    pub cookies: Vec<(String, String)>,
    /// User-Agent override; the default constant applies when absent.
    pub user_agent: Option<String>,
    /// Request timeout in seconds; 0 means the default timeout.
    pub timeout_seconds: u64,
    /// Maximum number of attempts; values below 1 are treated as 1.
    pub retry_count: u32,
    /// Proxy rotation pool; empty means direct connection.
    pub proxy_pool: Vec<ProxyEndpoint>,
    /// Whether the trace includes the raw byte dump of the response body.
    pub output_raw: bool,
}

impl RequestTemplate {
    /// Derives an independent spec for `url`, sharing every other field.
    pub fn for_url(&self, url: impl Into<String>) -> RequestSpec {
        RequestSpec {
            url: url.into(),
            method: self.method,
            http_version: self.http_version,
            auto_redirect: self.auto_redirect,
            body: self.body.clone(),
            content_type: self.content_type.clone(),
            headers: self.headers.clone(),
            cookies: self.cookies.clone(),
            user_agent: self.user_agent.clone(),
            timeout_seconds: self.timeout_seconds,
            retry_count: self.retry_count,
            proxy_pool: self.proxy_pool.clone(),
            output_raw: self.output_raw,
        }
    }
}

impl Default for RequestTemplate {
    fn default() -> Self {
        RequestTemplate {
            method: Method::Get,
            http_version: HttpVersion::Http11,
            auto_redirect: true,
            body: String::new(),
            content_type: default_content_type(),
            headers: Vec::new(),
            cookies: Vec::new(),
            user_agent: None,
            timeout_seconds: 0,
            retry_count: 1,
            proxy_pool: Vec::new(),
            output_raw: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_fallback() {
        assert_eq!(HttpVersion::from_version_str("2.0"), HttpVersion::Http2);
        assert_eq!(HttpVersion::from_version_str("3.0"), HttpVersion::Http3);
        assert_eq!(HttpVersion::from_version_str("1.1"), HttpVersion::Http11);
        assert_eq!(HttpVersion::from_version_str("1.0"), HttpVersion::Http11);
        assert_eq!(HttpVersion::from_version_str(""), HttpVersion::Http11);
        assert_eq!(HttpVersion::from_version_str("h2"), HttpVersion::Http11);
    }

    #[test]
    fn test_version_display() {
        assert_eq!(HttpVersion::Http11.to_string(), "HTTP/1.1");
        assert_eq!(HttpVersion::Http2.to_string(), "HTTP/2");
        assert_eq!(HttpVersion::Http3.to_string(), "HTTP/3");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_template_derives_spec_per_url() {
        let template = RequestTemplate {
            method: Method::Post,
            body: "a=1".to_string(),
            headers: vec![("X-Test".to_string(), "1".to_string())],
            retry_count: 3,
            ..Default::default()
        };
        let spec = template.for_url("https://example.test/a");
        assert_eq!(spec.url, "https://example.test/a");
        assert_eq!(spec.method, Method::Post);
        assert_eq!(spec.body, "a=1");
        assert_eq!(spec.headers, template.headers);
        assert_eq!(spec.retry_count, 3);
    }

    #[test]
    fn test_spec_deserializes_with_defaults() {
        let spec: RequestSpec =
            serde_json::from_str(r#"{"url": "https://example.test/"}"#).unwrap();
        assert_eq!(spec.method, Method::Get);
        assert_eq!(spec.http_version, HttpVersion::Http11);
        assert!(spec.auto_redirect);
        assert_eq!(spec.retry_count, 1);
        assert_eq!(spec.timeout_seconds, 0);
        assert_eq!(spec.content_type, "application/x-www-form-urlencoded");
    }
}
