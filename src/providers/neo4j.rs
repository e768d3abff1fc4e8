//! Neo4j-backed metadata index over the HTTP transaction API
//!
//! Documents relate to Owner/Company/Category/Year entities via typed
//! relationships (BELONGS_TO, FROM_COMPANY, HAS_CATEGORY, FROM_YEAR).
//! Filter queries are built as a conjunction of pattern predicates, one per
//! present filter field. Reads happen at query time; the annotation writes
//! belong to the ingestion path.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::{DocumentAnnotation, GraphConfig};
use crate::error::{Error, Result};
use crate::types::FilterSpec;

use super::metadata_index::{
    EntityKind, GraphEdge, GraphNode, GraphSnapshot, GraphStats, MetadataIndex,
};

/// Neo4j metadata index client. The underlying HTTP connection pool is
/// shared across queries; dropping the client releases it.
pub struct Neo4jMetadataIndex {
    client: reqwest::Client,
    tx_url: String,
    user: String,
    password: String,
}

/// One Cypher statement with parameters
struct Statement {
    cypher: String,
    parameters: Value,
}

impl Statement {
    fn new(cypher: impl Into<String>) -> Self {
        Self {
            cypher: cypher.into(),
            parameters: json!({}),
        }
    }

    fn with_params(cypher: impl Into<String>, parameters: Value) -> Self {
        Self {
            cypher: cypher.into(),
            parameters,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    #[serde(default)]
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl Neo4jMetadataIndex {
    /// Create a new index client from configuration
    pub fn new(config: &GraphConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build graph client: {}", e)))?;

        Ok(Self {
            client,
            tx_url: format!(
                "{}/db/{}/tx/commit",
                config.uri.trim_end_matches('/'),
                config.database
            ),
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// Run statements in one auto-commit transaction, returning rows per
    /// statement. Connectivity failures propagate; they are never converted
    /// into an empty result.
    async fn run(&self, statements: Vec<Statement>) -> Result<Vec<Vec<Vec<Value>>>> {
        let body = json!({
            "statements": statements
                .iter()
                .map(|s| json!({"statement": s.cypher, "parameters": s.parameters}))
                .collect::<Vec<_>>(),
        });

        let response = self
            .client
            .post(&self.tx_url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::graph(format!(
                "Graph store returned HTTP {}",
                response.status()
            )));
        }

        let parsed: TxResponse = response.json().await?;

        if let Some(err) = parsed.errors.first() {
            return Err(Error::graph(format!("{}: {}", err.code, err.message)));
        }

        Ok(parsed
            .results
            .into_iter()
            .map(|r| r.data.into_iter().map(|d| d.row).collect())
            .collect())
    }

    /// Rows of the first result of a single statement
    async fn run_single(&self, statement: Statement) -> Result<Vec<Vec<Value>>> {
        let mut results = self.run(vec![statement]).await?;
        let first = results.drain(..).next().unwrap_or_default();
        Ok(first)
    }

    /// First-column string values of a single statement
    async fn string_column(&self, statement: Statement) -> Result<Vec<String>> {
        Ok(self
            .run_single(statement)
            .await?
            .into_iter()
            .filter_map(|row| row.first().and_then(|v| v.as_str().map(String::from)))
            .collect())
    }

    /// Create lookup indexes for the common query patterns (ingestion path)
    pub async fn create_indexes(&self) -> Result<()> {
        self.run(vec![
            Statement::new("CREATE INDEX IF NOT EXISTS FOR (d:Document) ON (d.source)"),
            Statement::new("CREATE INDEX IF NOT EXISTS FOR (o:Owner) ON (o.name)"),
            Statement::new("CREATE INDEX IF NOT EXISTS FOR (c:Company) ON (c.name)"),
            Statement::new("CREATE INDEX IF NOT EXISTS FOR (cat:Category) ON (cat.name)"),
            Statement::new("CREATE INDEX IF NOT EXISTS FOR (y:Year) ON (y.value)"),
        ])
        .await?;
        Ok(())
    }

    /// Remove all nodes and relationships (ingestion path, used on re-index)
    pub async fn clear_graph(&self) -> Result<()> {
        self.run(vec![Statement::new("MATCH (n) DETACH DELETE n")])
            .await?;
        Ok(())
    }

    /// Upsert a document node with its metadata relationships (ingestion
    /// path). Each relationship is many-to-one from Document to entity.
    pub async fn annotate_document(
        &self,
        source: &str,
        filename: &str,
        annotation: &DocumentAnnotation,
    ) -> Result<()> {
        let mut statements = vec![Statement::with_params(
            "MERGE (d:Document {source: $source}) \
             SET d.filename = $filename, d.type = $type, d.description = $description",
            json!({
                "source": source,
                "filename": filename,
                "type": annotation.doc_type,
                "description": annotation.description,
            }),
        )];

        if let Some(owner) = &annotation.owner {
            statements.push(Statement::with_params(
                "MERGE (o:Owner {name: $owner}) \
                 MERGE (d:Document {source: $source}) \
                 MERGE (d)-[:BELONGS_TO]->(o)",
                json!({"owner": owner, "source": source}),
            ));
        }

        if let Some(company) = &annotation.company {
            statements.push(Statement::with_params(
                "MERGE (c:Company {name: $company}) \
                 MERGE (d:Document {source: $source}) \
                 MERGE (d)-[:FROM_COMPANY]->(c)",
                json!({"company": company, "source": source}),
            ));
        }

        if let Some(category) = &annotation.category {
            statements.push(Statement::with_params(
                "MERGE (cat:Category {name: $category}) \
                 MERGE (d:Document {source: $source}) \
                 MERGE (d)-[:HAS_CATEGORY]->(cat)",
                json!({"category": category, "source": source}),
            ));
        }

        if let Some(year) = annotation.year {
            statements.push(Statement::with_params(
                "MERGE (y:Year {value: $year}) \
                 MERGE (d:Document {source: $source}) \
                 MERGE (d)-[:FROM_YEAR]->(y)",
                json!({"year": year, "source": source}),
            ));
        }

        self.run(statements).await?;
        Ok(())
    }

    /// Build the conjunctive filter query. One pattern predicate per present
    /// field, joined with AND.
    fn build_filter_query(filters: &FilterSpec) -> Statement {
        let mut conditions = Vec::new();
        let mut params = serde_json::Map::new();

        if let Some(owner) = &filters.owner {
            conditions.push("(d)-[:BELONGS_TO]->(:Owner {name: $owner})");
            params.insert("owner".to_string(), json!(owner));
        }
        if let Some(company) = &filters.company {
            conditions.push("(d)-[:FROM_COMPANY]->(:Company {name: $company})");
            params.insert("company".to_string(), json!(company));
        }
        if let Some(category) = &filters.category {
            conditions.push("(d)-[:HAS_CATEGORY]->(:Category {name: $category})");
            params.insert("category".to_string(), json!(category));
        }
        if let Some(year) = filters.year {
            conditions.push("(d)-[:FROM_YEAR]->(:Year {value: $year})");
            params.insert("year".to_string(), json!(year));
        }
        if let Some(doc_type) = &filters.doc_type {
            conditions.push("d.type = $doc_type");
            params.insert("doc_type".to_string(), json!(doc_type));
        }

        let cypher = if conditions.is_empty() {
            "MATCH (d:Document) RETURN d.source AS source".to_string()
        } else {
            format!(
                "MATCH (d:Document) WHERE {} RETURN d.source AS source",
                conditions.join(" AND ")
            )
        };

        Statement::with_params(cypher, Value::Object(params))
    }
}

#[async_trait]
impl MetadataIndex for Neo4jMetadataIndex {
    async fn query(&self, filters: &FilterSpec) -> Result<Vec<String>> {
        let sources = self
            .string_column(Self::build_filter_query(filters))
            .await?;
        tracing::debug!(
            "graph filter matched {} document(s) for {:?}",
            sources.len(),
            filters
        );
        Ok(sources)
    }

    async fn list_values(&self, kind: EntityKind) -> Result<Vec<String>> {
        let cypher = match kind {
            EntityKind::Owner => "MATCH (o:Owner) RETURN o.name AS name",
            EntityKind::Company => "MATCH (c:Company) RETURN c.name AS name",
            EntityKind::Category => "MATCH (cat:Category) RETURN cat.name AS name",
            EntityKind::Year => "MATCH (y:Year) RETURN toString(y.value) AS name",
        };
        self.string_column(Statement::new(cypher)).await
    }

    async fn stats(&self) -> Result<GraphStats> {
        let results = self
            .run(vec![
                Statement::new("MATCH (d:Document) RETURN count(d) AS count"),
                Statement::new("MATCH (o:Owner) RETURN count(o) AS count"),
                Statement::new("MATCH (c:Company) RETURN count(c) AS count"),
                Statement::new("MATCH (cat:Category) RETURN count(cat) AS count"),
                Statement::new("MATCH (y:Year) RETURN count(y) AS count"),
            ])
            .await?;

        let count_at = |idx: usize| -> u64 {
            results
                .get(idx)
                .and_then(|rows| rows.first())
                .and_then(|row| row.first())
                .and_then(|v| v.as_u64())
                .unwrap_or(0)
        };

        Ok(GraphStats {
            documents: count_at(0),
            owners: count_at(1),
            companies: count_at(2),
            categories: count_at(3),
            years: count_at(4),
        })
    }

    async fn graph_snapshot(&self) -> Result<GraphSnapshot> {
        let mut snapshot = GraphSnapshot::default();

        let documents = self
            .run_single(Statement::new(
                "MATCH (d:Document) RETURN d.source AS id, d.filename AS label",
            ))
            .await?;
        for row in documents {
            let id = row
                .first()
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let label = row
                .get(1)
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| id.clone());
            snapshot.nodes.push(GraphNode {
                id,
                label,
                kind: "Document".to_string(),
            });
        }

        for (kind, prefix) in [
            (EntityKind::Owner, "owner"),
            (EntityKind::Company, "company"),
            (EntityKind::Category, "category"),
            (EntityKind::Year, "year"),
        ] {
            for name in self.list_values(kind).await? {
                snapshot.nodes.push(GraphNode {
                    id: format!("{}:{}", prefix, name),
                    label: name,
                    kind: format!("{:?}", kind),
                });
            }
        }

        let edges = self
            .run_single(Statement::new(
                "MATCH (d:Document)-[r]->(target) \
                 RETURN d.source AS source, type(r) AS rel, \
                 CASE labels(target)[0] \
                     WHEN 'Owner' THEN 'owner:' + target.name \
                     WHEN 'Company' THEN 'company:' + target.name \
                     WHEN 'Category' THEN 'category:' + target.name \
                     WHEN 'Year' THEN 'year:' + toString(target.value) \
                 END AS targetId",
            ))
            .await?;
        for row in edges {
            let source = row.first().and_then(|v| v.as_str()).unwrap_or_default();
            let rel = row.get(1).and_then(|v| v.as_str()).unwrap_or_default();
            let target = row.get(2).and_then(|v| v.as_str()).unwrap_or_default();
            if target.is_empty() {
                continue;
            }
            snapshot.edges.push(GraphEdge {
                source: source.to_string(),
                target: target.to_string(),
                relationship: rel.to_string(),
            });
        }

        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "neo4j"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconstrained_query_matches_all_documents() {
        let stmt = Neo4jMetadataIndex::build_filter_query(&FilterSpec::default());
        assert_eq!(stmt.cypher, "MATCH (d:Document) RETURN d.source AS source");
    }

    #[test]
    fn test_filter_query_is_conjunctive() {
        let filters = FilterSpec {
            company: Some("State Bank of India".to_string()),
            year: Some(2024),
            ..Default::default()
        };
        let stmt = Neo4jMetadataIndex::build_filter_query(&filters);

        assert!(stmt.cypher.contains("WHERE"));
        assert!(stmt
            .cypher
            .contains("(d)-[:FROM_COMPANY]->(:Company {name: $company})"));
        assert!(stmt.cypher.contains(" AND "));
        assert!(stmt.cypher.contains("(d)-[:FROM_YEAR]->(:Year {value: $year})"));
        assert_eq!(stmt.parameters["company"], "State Bank of India");
        assert_eq!(stmt.parameters["year"], 2024);
    }

    #[test]
    fn test_doc_type_filters_on_node_property() {
        let filters = FilterSpec {
            doc_type: Some("statement".to_string()),
            ..Default::default()
        };
        let stmt = Neo4jMetadataIndex::build_filter_query(&filters);
        assert!(stmt.cypher.contains("d.type = $doc_type"));
    }
}
