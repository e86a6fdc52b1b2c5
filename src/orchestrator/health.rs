use serde::Serialize;
use tracing::warn;

use crate::graph::{GraphQuery, GraphQueryClient};

/// Minimal query used to check that the graph database answers
pub const HEALTH_QUERY: &str = "MATCH (n) RETURN count(n) AS nodeCount LIMIT 1";

/// Result of a health check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub graph_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reports graph database reachability for status endpoints
#[derive(Clone)]
pub struct HealthProbe {
    graph: GraphQueryClient,
}

impl HealthProbe {
    pub fn new(graph: GraphQueryClient) -> Self {
        Self { graph }
    }

    /// Run the minimal query; any failure maps to unreachable
    pub async fn check(&self) -> HealthReport {
        match self.graph.run(&GraphQuery::custom(HEALTH_QUERY), None).await {
            Ok(_) => HealthReport {
                graph_reachable: true,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "Graph health check failed");
                HealthReport {
                    graph_reachable: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
