use std::sync::LazyLock;

use regex::Regex;

use super::types::{GraphQuery, QueryStrategy};

/// Turns a free-text question into a graph query.
///
/// Implementations must be deterministic and free of I/O.
#[cfg_attr(test, mockall::automock)]
pub trait QueryGenerator: Send + Sync {
    fn generate(&self, question: &str) -> GraphQuery;
}

const DRUG_KEYWORDS: &[&str] = &["medicament", "drug"];
const INTERACTION_KEYWORDS: &[&str] = &["interacțiun", "interactiun", "interaction"];
const CONTRAINDICATION_KEYWORDS: &[&str] = &["contraindicat", "contraindication"];

// Endings common in pharmaceutical names.
static DRUG_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([a-z]+(?:mol|cin|lin|ina|an|ol))\b").expect("drug name pattern is valid")
});

/// Keyword-based fallback generator.
///
/// Best effort only: the query may be irrelevant or overly broad.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicQueryGenerator;

impl HeuristicQueryGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl QueryGenerator for HeuristicQueryGenerator {
    fn generate(&self, question: &str) -> GraphQuery {
        let lower = question.to_lowercase();

        if contains_any(&lower, DRUG_KEYWORDS) {
            return match DRUG_NAME.captures(&lower).and_then(|c| c.get(1)) {
                Some(name) => {
                    let name = name.as_str();
                    GraphQuery::generated(
                        format!(
                            "MATCH (d:Drug) WHERE toLower(d.name) CONTAINS toLower('{name}') \
                             RETURN d.name, d.description, d.dosage, d.sideEffects LIMIT 5"
                        ),
                        QueryStrategy::DrugByName(name.to_string()),
                    )
                }
                None => GraphQuery::generated(
                    "MATCH (d:Drug) RETURN d.name, d.description, d.dosage LIMIT 10",
                    QueryStrategy::DrugListing,
                ),
            };
        }

        if contains_any(&lower, INTERACTION_KEYWORDS) {
            return GraphQuery::generated(
                "MATCH (d1:Drug)-[r:INTERACTS_WITH]->(d2:Drug) \
                 RETURN d1.name, r.severity, d2.name LIMIT 10",
                QueryStrategy::Interactions,
            );
        }

        if contains_any(&lower, CONTRAINDICATION_KEYWORDS) {
            return GraphQuery::generated(
                "MATCH (d:Drug)-[r:CONTRAINDICATED_IN]->(c:Condition) \
                 RETURN d.name, c.name, r.reason LIMIT 10",
                QueryStrategy::Contraindications,
            );
        }

        GraphQuery::generated(
            "MATCH (d:Drug) RETURN d.name, d.description LIMIT 5",
            QueryStrategy::Default,
        )
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::QueryOrigin;
    use pretty_assertions::assert_eq;

    fn strategy(query: &GraphQuery) -> QueryStrategy {
        match query.origin() {
            QueryOrigin::Generated(s) => s.clone(),
            QueryOrigin::Custom => panic!("expected a generated query"),
        }
    }

    #[test]
    fn test_drug_with_name() {
        let query = HeuristicQueryGenerator.generate("What drug is Paracetamol used for?");
        assert_eq!(
            strategy(&query),
            QueryStrategy::DrugByName("paracetamol".to_string())
        );
        assert!(query.text().contains("CONTAINS toLower('paracetamol')"));
        assert!(query.text().ends_with("LIMIT 5"));
    }

    #[test]
    fn test_drug_without_name() {
        let query = HeuristicQueryGenerator.generate("Medicament pentru durere?");
        assert_eq!(strategy(&query), QueryStrategy::DrugListing);
        assert_eq!(
            query.text(),
            "MATCH (d:Drug) RETURN d.name, d.description, d.dosage LIMIT 10"
        );
    }

    #[test]
    fn test_interactions_with_diacritics() {
        let query = HeuristicQueryGenerator.generate("Ce interacțiuni are paracetamolul?");
        assert_eq!(strategy(&query), QueryStrategy::Interactions);
        assert!(query.text().contains("INTERACTS_WITH"));
        assert!(query.text().ends_with("LIMIT 10"));
    }

    #[test]
    fn test_interactions_without_diacritics() {
        let query = HeuristicQueryGenerator.generate("Ce interactiuni are aspirina?");
        assert_eq!(strategy(&query), QueryStrategy::Interactions);
    }

    #[test]
    fn test_contraindications() {
        let query = HeuristicQueryGenerator.generate("Is aspirin contraindicated in asthma?");
        assert_eq!(strategy(&query), QueryStrategy::Contraindications);
        assert!(query.text().contains("CONTRAINDICATED_IN"));
    }

    #[test]
    fn test_drug_keyword_takes_priority() {
        let query = HeuristicQueryGenerator.generate("drug interaction checker");
        assert_eq!(strategy(&query), QueryStrategy::DrugListing);
    }

    #[test]
    fn test_default_query() {
        let query = HeuristicQueryGenerator.generate("What is ibuprofen?");
        assert_eq!(strategy(&query), QueryStrategy::Default);
        assert_eq!(
            query.text(),
            "MATCH (d:Drug) RETURN d.name, d.description LIMIT 5"
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = HeuristicQueryGenerator::new();
        for question in [
            "Which drug contains paracetamol?",
            "Ce interacțiuni are paracetamolul?",
            "hello there",
        ] {
            assert_eq!(
                generator.generate(question).text(),
                generator.generate(question).text()
            );
        }
    }
}
