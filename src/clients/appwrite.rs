//! Minimal client for the Appwrite TablesDB REST API.
//!
//! Only the row operations needed by the trend store are covered: listing
//! with queries, creating a row and patching a row.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::AppwriteConfig;

#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("Appwrite API error: {status} - {message}")]
    Status { status: StatusCode, message: String },

    #[error("Appwrite request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid Appwrite URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A single query in Appwrite's JSON query syntax.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum Query {
    Equal {
        attribute: String,
        values: Vec<serde_json::Value>,
    },
    OrderDesc {
        attribute: String,
    },
    Limit {
        values: Vec<u32>,
    },
}

impl Query {
    pub fn equal(attribute: &str, value: impl Into<serde_json::Value>) -> Self {
        Self::Equal {
            attribute: attribute.to_string(),
            values: vec![value.into()],
        }
    }

    pub fn order_desc(attribute: &str) -> Self {
        Self::OrderDesc {
            attribute: attribute.to_string(),
        }
    }

    pub fn limit(limit: u32) -> Self {
        Self::Limit {
            values: vec![limit],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RowList<T> {
    #[serde(default)]
    pub total: u64,
    pub rows: Vec<Row<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Row<T> {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

#[derive(Serialize)]
struct CreateRowRequest<'a, T> {
    #[serde(rename = "rowId")]
    row_id: &'a str,
    data: &'a T,
}

#[derive(Serialize)]
struct UpdateRowRequest<'a, T> {
    data: &'a T,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct AppwriteClient {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
}

impl AppwriteClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &AppwriteConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    /// Generates a row id in the same shape as Appwrite's `ID.unique()`.
    #[must_use]
    pub fn unique_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    fn rows_url(&self, database_id: &str, table_id: &str) -> String {
        format!(
            "{}/tablesdb/{}/tables/{}/rows",
            self.endpoint, database_id, table_id
        )
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("X-Appwrite-Project", &self.project_id)
            .header(reqwest::header::ACCEPT, "application/json");

        match &self.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key),
            None => builder,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, AppwriteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.message)
            .unwrap_or(text);
        Err(AppwriteError::Status { status, message })
    }

    pub async fn list_rows<T: DeserializeOwned>(
        &self,
        database_id: &str,
        table_id: &str,
        queries: &[Query],
    ) -> Result<RowList<T>, AppwriteError> {
        let mut url = Url::parse(&self.rows_url(database_id, table_id))?;
        {
            let mut pairs = url.query_pairs_mut();
            for query in queries {
                // Query only holds strings and numbers.
                let encoded = serde_json::to_string(query).unwrap_or_default();
                pairs.append_pair("queries[]", &encoded);
            }
        }

        debug!(table = table_id, queries = queries.len(), "Listing Appwrite rows");

        let response = self.request(reqwest::Method::GET, url).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn create_row<T: Serialize + Sync>(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: &T,
    ) -> Result<(), AppwriteError> {
        let url = Url::parse(&self.rows_url(database_id, table_id))?;

        debug!(table = table_id, row_id, "Creating Appwrite row");

        let response = self
            .request(reqwest::Method::POST, url)
            .json(&CreateRowRequest { row_id, data })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn update_row<T: Serialize + Sync>(
        &self,
        database_id: &str,
        table_id: &str,
        row_id: &str,
        data: &T,
    ) -> Result<(), AppwriteError> {
        let url = Url::parse(&format!(
            "{}/{}",
            self.rows_url(database_id, table_id),
            urlencoding::encode(row_id)
        ))?;

        debug!(table = table_id, row_id, "Updating Appwrite row");

        let response = self
            .request(reqwest::Method::PATCH, url)
            .json(&UpdateRowRequest { data })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_json_shape() {
        let eq = serde_json::to_value(Query::equal("search_term", "dune")).unwrap();
        assert_eq!(
            eq,
            serde_json::json!({"method": "equal", "attribute": "search_term", "values": ["dune"]})
        );

        let order = serde_json::to_value(Query::order_desc("count")).unwrap();
        assert_eq!(
            order,
            serde_json::json!({"method": "orderDesc", "attribute": "count"})
        );

        let limit = serde_json::to_value(Query::limit(5)).unwrap();
        assert_eq!(limit, serde_json::json!({"method": "limit", "values": [5]}));
    }

    #[test]
    fn test_row_flattens_data() {
        #[derive(Deserialize)]
        struct Data {
            count: i64,
        }

        let list: RowList<Data> = serde_json::from_str(
            r#"{"total": 1, "rows": [{"$id": "abc", "$createdAt": "2025-01-01", "count": 3}]}"#,
        )
        .unwrap();
        assert_eq!(list.rows[0].id, "abc");
        assert_eq!(list.rows[0].data.count, 3);
    }

    #[test]
    fn test_unique_id_shape() {
        let id = AppwriteClient::unique_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
