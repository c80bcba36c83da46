//! The outcome of a completed request execution.

use reqwest::header::HeaderMap;

/// Outcome of one completed request execution.
///
/// Constructed once per successful attempt and handed to the caller. Any
/// HTTP status is a valid outcome at this layer; only transport-level
/// failures are errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseResult {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in first-seen order, preserving multi-value headers.
    pub headers: Vec<(String, Vec<String>)>,
    /// Raw body bytes, fully drained into memory.
    pub raw: Vec<u8>,
    /// Body decoded as lossy UTF-8.
    pub text: String,
}

impl ResponseResult {
    /// Builds a result from a status code, a transport header map, and the
    /// drained body bytes.
    pub fn from_parts(status: u16, headers: &HeaderMap, raw: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&raw).into_owned();
        ResponseResult {
            status,
            headers: collect_headers(headers),
            raw,
            text,
        }
    }
}

/// Flattens a header map into ordered `(name, values)` pairs, grouping
/// repeated headers under one name in first-seen order.
fn collect_headers(headers: &HeaderMap) -> Vec<(String, Vec<String>)> {
    headers
        .keys()
        .map(|name| {
            let values = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            (name.as_str().to_string(), values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    #[test]
    fn test_from_parts_decodes_body() {
        let result = ResponseResult::from_parts(200, &HeaderMap::new(), b"ok".to_vec());
        assert_eq!(result.status, 200);
        assert_eq!(result.raw, b"ok");
        assert_eq!(result.text, "ok");
        assert!(result.headers.is_empty());
    }

    #[test]
    fn test_from_parts_lossy_on_invalid_utf8() {
        let result = ResponseResult::from_parts(200, &HeaderMap::new(), vec![0xff, 0x6f, 0x6b]);
        assert_eq!(result.text, "\u{fffd}ok");
        assert_eq!(result.raw, vec![0xff, 0x6f, 0x6b]);
    }

    #[test]
    fn test_multi_value_headers_grouped() {
        let mut headers = HeaderMap::new();
        let set_cookie = HeaderName::from_static("set-cookie");
        headers.append(set_cookie.clone(), HeaderValue::from_static("a=1"));
        headers.append(set_cookie, HeaderValue::from_static("b=2"));
        headers.insert("server", HeaderValue::from_static("test"));

        let result = ResponseResult::from_parts(200, &headers, Vec::new());
        let cookies = result
            .headers
            .iter()
            .find(|(name, _)| name == "set-cookie")
            .map(|(_, values)| values.clone())
            .unwrap();
        assert_eq!(cookies, vec!["a=1".to_string(), "b=2".to_string()]);
        assert_eq!(result.headers.len(), 2);
    }
}
