use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Upstream failure: {message}")]
    UpstreamFailure { message: String },

    #[error("Graph database error: {0}")]
    Graph(#[from] GraphError),

    #[error("Web search error: {0}")]
    Search(#[from] SearchError),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Processing error: {message}")]
    Processing { message: String },
}

/// Graph database HTTP errors
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Query error: {code} - {message}")]
    Query { code: String, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Web search API errors
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Completion API errors
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result of a collaborator that degrades instead of failing.
///
/// Every variant carries a usable value, so callers can always merge it
/// into a response. The variant only records why the value is reduced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The call succeeded.
    Complete(T),
    /// The collaborator was not configured (missing credential).
    Unavailable { value: T, reason: String },
    /// The call was attempted and failed.
    Failed { value: T, error: String },
}

impl<T> Outcome<T> {
    /// Borrow the carried value regardless of variant.
    pub fn value(&self) -> &T {
        match self {
            Outcome::Complete(value)
            | Outcome::Unavailable { value, .. }
            | Outcome::Failed { value, .. } => value,
        }
    }

    /// Take the carried value regardless of variant.
    pub fn into_value(self) -> T {
        match self {
            Outcome::Complete(value)
            | Outcome::Unavailable { value, .. }
            | Outcome::Failed { value, .. } => value,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    /// Failure message, if the call failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for graph database operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for web search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Result type alias for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config {
            message: "missing key".to_string(),
        };
        assert_eq!(err.to_string(), "Configuration error: missing key");

        let err = AppError::InvalidInput {
            message: "question too short".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid input: question too short");

        let err = AppError::UpstreamFailure {
            message: "all sources down".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream failure: all sources down");
    }

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::Api {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 401 - unauthorized");

        let err = GraphError::Query {
            code: "Neo.ClientError.Statement.SyntaxError".to_string(),
            message: "Invalid input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Query error: Neo.ClientError.Statement.SyntaxError - Invalid input"
        );

        let err = GraphError::Timeout { timeout_ms: 5000 };
        assert_eq!(err.to_string(), "Request timeout after 5000ms");
    }

    #[test]
    fn test_search_and_completion_error_display() {
        let err = SearchError::InvalidResponse {
            message: "malformed JSON".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid response: malformed JSON");

        let err = CompletionError::Api {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 429 - rate limited");
    }

    #[test]
    fn test_graph_error_conversion_to_app_error() {
        let graph_err = GraphError::Timeout { timeout_ms: 1000 };
        let app_err: AppError = graph_err.into();
        assert!(matches!(app_err, AppError::Graph(_)));
        assert!(app_err.to_string().contains("1000ms"));
    }

    #[test]
    fn test_outcome_value_access() {
        let complete = Outcome::Complete(3);
        assert_eq!(*complete.value(), 3);
        assert!(complete.is_complete());
        assert!(complete.error().is_none());

        let failed: Outcome<Vec<u8>> = Outcome::Failed {
            value: Vec::new(),
            error: "boom".to_string(),
        };
        assert!(failed.is_failed());
        assert_eq!(failed.error(), Some("boom"));
        assert!(failed.into_value().is_empty());

        let unavailable = Outcome::Unavailable {
            value: "text".to_string(),
            reason: "no key".to_string(),
        };
        assert!(!unavailable.is_failed());
        assert!(!unavailable.is_complete());
    }
}
