use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Common result type for core operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("response body is not valid json: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("graphql error: {0}")]
    GraphQL(GraphQLError),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("response carries no data")]
    MissingData,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FetchError {
    /// The normalized envelope error, if this is one.
    pub fn as_graphql(&self) -> Option<&GraphQLError> {
        match self {
            FetchError::GraphQL(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GraphQLError> for FetchError {
    fn from(err: GraphQLError) -> Self {
        FetchError::GraphQL(err)
    }
}

/// Error code carried by a normalized error. The server may send either a
/// string (`"BAD_REQUEST"`) or a number, so both are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Text(String),
    Number(serde_json::Number),
}

impl ErrorCode {
    /// Used when the envelope has errors but no `extensions.code`.
    pub fn fallback() -> Self {
        ErrorCode::Number(500.into())
    }

    /// Used when the response body itself is absent.
    pub fn internal() -> Self {
        ErrorCode::Text("INTERNAL_SERVER_ERROR".to_string())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Text(s) => f.write_str(s),
            ErrorCode::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Normalized error built from a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: ErrorCode,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>, status_code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    pub fn unknown() -> Self {
        Self::new("Unknown error", ErrorCode::internal())
    }
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status_code)
    }
}

impl std::error::Error for GraphQLError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_status_code_field() {
        let err = GraphQLError::new("bad input", ErrorCode::Text("BAD_REQUEST".into()));
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value, json!({"message": "bad input", "statusCode": "BAD_REQUEST"}));

        let value = serde_json::to_value(GraphQLError::new("x", ErrorCode::fallback())).unwrap();
        assert_eq!(value["statusCode"], json!(500));
    }

    #[test]
    fn display_includes_code() {
        assert_eq!(
            GraphQLError::unknown().to_string(),
            "Unknown error (INTERNAL_SERVER_ERROR)"
        );
        let err: FetchError = GraphQLError::new("ab", ErrorCode::fallback()).into();
        assert_eq!(err.to_string(), "graphql error: ab (500)");
        assert!(err.as_graphql().is_some());
    }
}
