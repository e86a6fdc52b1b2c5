use std::env;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub completion: CompletionConfig,
    pub search: SearchConfig,
    pub graph: GraphConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub request: RequestConfig,
}

/// Completion API configuration
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Missing key degrades answers instead of failing startup
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Language the assistant is instructed to answer in
    pub locale: String,
}

/// Web search API configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_results: usize,
    pub query_suffix: String,
    pub include_domains: Vec<String>,
}

/// Graph database HTTP endpoint configuration
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub base_url: String,
    pub database: String,
    pub user: String,
    pub password: Option<String>,
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Outbound HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub timeout_ms: u64,
}

/// Upper bound on web results requested and formatted per search
pub const MAX_SEARCH_RESULTS: usize = 5;

const DEFAULT_INCLUDE_DOMAINS: &[&str] = &["rcp.ro", "anm.ro", "ms.ro", "medicinaregenerativa.ro"];

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let completion = CompletionConfig {
            api_key: non_empty_var("OPENAI_API_KEY"),
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            temperature: parsed_var("OPENAI_TEMPERATURE", 0.3),
            max_tokens: parsed_var("OPENAI_MAX_TOKENS", 1200),
            locale: env::var("ASSISTANT_LOCALE").unwrap_or_else(|_| "Romanian".to_string()),
        };

        if !(0.0..=2.0).contains(&completion.temperature) {
            return Err(AppError::Config {
                message: format!(
                    "OPENAI_TEMPERATURE must be between 0.0 and 2.0, got {}",
                    completion.temperature
                ),
            });
        }

        let search = SearchConfig {
            api_key: non_empty_var("TAVILY_API_KEY"),
            base_url: env::var("TAVILY_BASE_URL")
                .unwrap_or_else(|_| "https://api.tavily.com".to_string()),
            max_results: parsed_var("SEARCH_MAX_RESULTS", MAX_SEARCH_RESULTS)
                .clamp(1, MAX_SEARCH_RESULTS),
            query_suffix: env::var("SEARCH_QUERY_SUFFIX")
                .unwrap_or_else(|_| "medicament ghid clinic România".to_string()),
            include_domains: match env::var("SEARCH_INCLUDE_DOMAINS") {
                Ok(list) => split_list(&list),
                Err(_) => DEFAULT_INCLUDE_DOMAINS.iter().map(|d| d.to_string()).collect(),
            },
        };

        let graph = GraphConfig {
            base_url: env::var("GRAPH_HTTP_URL")
                .unwrap_or_else(|_| "http://localhost:7474".to_string()),
            database: env::var("GRAPH_DATABASE").unwrap_or_else(|_| "neo4j".to_string()),
            user: env::var("GRAPH_USER").unwrap_or_else(|_| "neo4j".to_string()),
            password: non_empty_var("GRAPH_PASSWORD"),
        };

        let server = ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed_var("SERVER_PORT", 8000),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let request = RequestConfig {
            timeout_ms: parsed_var("REQUEST_TIMEOUT_MS", 30000),
        };

        Ok(Config {
            completion,
            search,
            graph,
            server,
            logging,
            request,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 1200,
            locale: "Romanian".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.tavily.com".to_string(),
            max_results: MAX_SEARCH_RESULTS,
            query_suffix: "medicament ghid clinic România".to_string(),
            include_domains: DEFAULT_INCLUDE_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7474".to_string(),
            database: "neo4j".to_string(),
            user: "neo4j".to_string(),
            password: None,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self { timeout_ms: 30000 }
    }
}
