use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row: column name to value, in column order
pub type GraphRow = Map<String, Value>;

/// Ordered rows returned by a query; empty is a valid result
pub type GraphResultSet = Vec<GraphRow>;

/// A query ready to send, with a record of where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQuery {
    text: String,
    origin: QueryOrigin,
}

/// Where a query came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOrigin {
    /// Supplied by the caller
    Custom,
    /// Synthesized from the question
    Generated(QueryStrategy),
}

/// Strategy the heuristic generator picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStrategy {
    /// Drug keyword plus a detected drug-like token
    DrugByName(String),
    /// Drug keyword without a detectable name
    DrugListing,
    Interactions,
    Contraindications,
    Default,
}

impl GraphQuery {
    /// Wrap a caller-supplied query
    pub fn custom(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            origin: QueryOrigin::Custom,
        }
    }

    /// Wrap a synthesized query
    pub fn generated(text: impl Into<String>, strategy: QueryStrategy) -> Self {
        Self {
            text: text.into(),
            origin: QueryOrigin::Generated(strategy),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> &QueryOrigin {
        &self.origin
    }
}

impl QueryStrategy {
    /// Short description used in the thinking trace
    pub fn describe(&self) -> String {
        match self {
            QueryStrategy::DrugByName(name) => format!("Identified the drug \"{name}\" in the question"),
            QueryStrategy::DrugListing => {
                "No specific drug identified, searching general drug information".to_string()
            }
            QueryStrategy::Interactions => "The question is about drug interactions".to_string(),
            QueryStrategy::Contraindications => "The question is about contraindications".to_string(),
            QueryStrategy::Default => "Using the default general drug query".to_string(),
        }
    }
}

/// Body of a transactional commit request
#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest {
    pub statements: Vec<Statement>,
}

/// One statement in a commit request
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub statement: String,
}

impl CommitRequest {
    /// Request carrying a single statement
    pub fn single(statement: impl Into<String>) -> Self {
        Self {
            statements: vec![Statement {
                statement: statement.into(),
            }],
        }
    }
}

/// Columnar response of a transactional commit
#[derive(Debug, Clone, Deserialize)]
pub struct CommitResponse {
    #[serde(default)]
    pub results: Vec<StatementResult>,
    #[serde(default)]
    pub errors: Vec<StatementError>,
}

/// Result of one statement
#[derive(Debug, Clone, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<RowData>,
}

/// A single row in columnar form
#[derive(Debug, Clone, Deserialize)]
pub struct RowData {
    #[serde(default)]
    pub row: Vec<Value>,
}

/// Query-level error reported by the database
#[derive(Debug, Clone, Deserialize)]
pub struct StatementError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl CommitResponse {
    /// Decode the first statement's rows into column-keyed maps.
    ///
    /// Values beyond the column list are dropped; missing values are absent.
    pub fn into_rows(self) -> GraphResultSet {
        let Some(result) = self.results.into_iter().next() else {
            return Vec::new();
        };

        let columns = result.columns;
        result
            .data
            .into_iter()
            .map(|data| {
                columns
                    .iter()
                    .cloned()
                    .zip(data.row)
                    .collect::<GraphRow>()
            })
            .collect()
    }
}

/// Flatten rows into `key: value` lines for prompt context
pub fn render_rows(rows: &[GraphRow]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(key, value)| format!("{key}: {}", render_value(value)))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
