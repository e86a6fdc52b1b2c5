use serde::{Deserialize, Serialize};

/// Request body for the search API
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub api_key: String,
    pub query: String,
    pub search_depth: SearchDepth,
    pub include_answer: bool,
    pub include_raw_content: bool,
    pub max_results: usize,
    pub include_domains: Vec<String>,
    pub exclude_domains: Vec<String>,
}

/// Search depth
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Advanced,
}

/// Response from the search API
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One ranked result
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

impl SearchRequest {
    /// Create an advanced search request asking for a synthesized answer
    pub fn new(api_key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            query: query.into(),
            search_depth: SearchDepth::Advanced,
            include_answer: true,
            include_raw_content: true,
            max_results: 5,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_include_domains(mut self, domains: Vec<String>) -> Self {
        self.include_domains = domains;
        self
    }
}

impl SearchResponse {
    /// Format up to `limit` hits plus the optional synthesized answer.
    ///
    /// Returns `None` when there are no hits.
    pub fn format(&self, limit: usize) -> Option<String> {
        if self.results.is_empty() {
            return None;
        }

        let hits = self
            .results
            .iter()
            .take(limit)
            .map(|hit| format!("Source: {} ({})\nContent: {}\n", hit.title, hit.url, hit.content))
            .collect::<Vec<_>>()
            .join("\n---\n");

        let answer = match self.answer.as_deref().filter(|a| !a.trim().is_empty()) {
            Some(answer) => format!("\nSynthesized answer: {answer}"),
            None => String::new(),
        };

        Some(format!("Web information:\n{hits}{answer}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let request = SearchRequest::new("key", "paracetamol medicament")
            .with_max_results(3)
            .with_include_domains(vec!["anm.ro".to_string()]);
        let body = serde_json::to_value(request).unwrap();

        assert_eq!(body["search_depth"], "advanced");
        assert_eq!(body["include_answer"], true);
        assert_eq!(body["max_results"], 3);
        assert_eq!(body["include_domains"], json!(["anm.ro"]));
        assert_eq!(body["exclude_domains"], json!([]));
    }

    #[test]
    fn test_format_limits_hits_and_appends_answer() {
        let response: SearchResponse = serde_json::from_value(json!({
            "answer": "Take with water.",
            "results": [
                {"title": "A", "url": "https://anm.ro/a", "content": "first"},
                {"title": "B", "url": "https://anm.ro/b", "content": "second"},
                {"title": "C", "url": "https://anm.ro/c", "content": "third"}
            ]
        }))
        .unwrap();

        let text = response.format(2).unwrap();
        assert!(text.starts_with("Web information:\nSource: A (https://anm.ro/a)"));
        assert!(text.contains("\n---\nSource: B"));
        assert!(!text.contains("Source: C"));
        assert!(text.ends_with("\nSynthesized answer: Take with water."));
    }

    #[test]
    fn test_format_empty_results() {
        let response: SearchResponse = serde_json::from_value(json!({"results": []})).unwrap();
        assert!(response.format(5).is_none());
    }
}
