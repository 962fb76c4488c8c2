//! Outgoing request options and the header merge applied to every request.

use crate::config::MissingToken;
use crate::error::{FetchError, Result};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, Method};
use serde::Serialize;

/// Forces a CORS preflight on Apollo servers with CSRF prevention enabled.
pub const APOLLO_REQUIRE_PREFLIGHT: HeaderName =
    HeaderName::from_static("apollo-require-preflight");

/// Transport parameters supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl FetchOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// Appends a header; existing values for `name` are kept.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| FetchError::InvalidHeader(format!("invalid header name: {name}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| FetchError::InvalidHeader(format!("invalid value for header {name}")))?;
        self.headers.append(name, value);
        Ok(self)
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the request body.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let data = serde_json::to_vec(value)?;
        Ok(self.body(data))
    }
}

/// Builds the outgoing headers from the caller's headers and the stored token.
///
/// Precedence: a non-empty caller `Authorization` wins over `Bearer <token>`;
/// `Content-Type` and `Apollo-Require-Preflight` always replace caller values.
/// Every other caller header passes through untouched.
pub fn merge_headers(
    caller: &HeaderMap,
    token: Option<&str>,
    policy: MissingToken,
) -> Result<HeaderMap> {
    let mut headers = caller.clone();

    let explicit = caller
        .get(AUTHORIZATION)
        .is_some_and(|value| !value.is_empty());
    if !explicit {
        headers.remove(AUTHORIZATION);
        let bearer = match (token, policy) {
            (Some(token), _) => Some(format!("Bearer {token}")),
            (None, MissingToken::Undefined) => Some("Bearer undefined".to_string()),
            (None, MissingToken::Omit) => None,
        };
        if let Some(bearer) = bearer {
            let mut value = HeaderValue::from_str(&bearer).map_err(|_| {
                FetchError::InvalidHeader("stored token is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
    }

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(APOLLO_REQUIRE_PREFLIGHT, HeaderValue::from_static("true"));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(pairs: &[(&str, &str)]) -> HeaderMap {
        pairs
            .iter()
            .fold(FetchOptions::get(), |opts, (k, v)| opts.header(k, v).unwrap())
            .headers
    }

    #[test]
    fn injects_bearer_from_token() {
        let headers = merge_headers(&HeaderMap::new(), Some("abc"), MissingToken::Omit).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[APOLLO_REQUIRE_PREFLIGHT], "true");
    }

    #[test]
    fn explicit_authorization_is_kept_verbatim() {
        let headers = merge_headers(
            &caller(&[("Authorization", "Basic dXNlcjpwdw==")]),
            Some("abc"),
            MissingToken::Omit,
        )
        .unwrap();
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(headers[AUTHORIZATION], "Basic dXNlcjpwdw==");
    }

    #[test]
    fn empty_authorization_falls_back_to_token() {
        let headers = merge_headers(
            &caller(&[("authorization", "")]),
            Some("abc"),
            MissingToken::Omit,
        )
        .unwrap();
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn fixed_headers_override_caller_values() {
        let headers = merge_headers(
            &caller(&[
                ("Content-Type", "text/plain"),
                ("Apollo-Require-Preflight", "false"),
                ("X-Trace", "1"),
            ]),
            Some("abc"),
            MissingToken::Omit,
        )
        .unwrap();
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[APOLLO_REQUIRE_PREFLIGHT], "true");
        assert_eq!(headers["x-trace"], "1");
    }

    #[test]
    fn multi_valued_headers_pass_through() {
        let headers = merge_headers(
            &caller(&[("Accept", "application/json"), ("Accept", "text/html")]),
            None,
            MissingToken::Omit,
        )
        .unwrap();
        let accept: Vec<_> = headers.get_all("accept").iter().collect();
        assert_eq!(accept, ["application/json", "text/html"]);
    }

    #[test]
    fn missing_token_policies() {
        let omitted = merge_headers(&HeaderMap::new(), None, MissingToken::Omit).unwrap();
        assert!(omitted.get(AUTHORIZATION).is_none());

        let legacy = merge_headers(&HeaderMap::new(), None, MissingToken::Undefined).unwrap();
        assert_eq!(legacy[AUTHORIZATION], "Bearer undefined");
    }

    #[test]
    fn rejects_token_with_newline() {
        let err = merge_headers(&HeaderMap::new(), Some("a\nb"), MissingToken::Omit).unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader(_)));
    }

    #[test]
    fn json_body_is_serialized() {
        let opts = FetchOptions::post()
            .json(&serde_json::json!({"query": "{ me { id } }"}))
            .unwrap();
        assert_eq!(opts.method, Method::POST);
        assert_eq!(
            opts.body.as_deref(),
            Some(br#"{"query":"{ me { id } }"}"#.as_slice())
        );
    }
}
