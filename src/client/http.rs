use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{ClientError, ClientResult, Collection, DataClient, ListQuery, Record};

/// JSON client for the hosted backend's REST surface.
///
/// `POST {base}/{collection}/list`, `POST {base}/{collection}`,
/// `PATCH {base}/{collection}/{id}`, `DELETE {base}/{collection}/{id}`.
#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, collection.as_str())
    }

    pub fn record_url(&self, collection: Collection, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    /// A 404 on a record URL means the record itself is gone.
    fn record_missing(error: ClientError, collection: Collection, id: &str) -> ClientError {
        match error {
            ClientError::Backend { status: 404, .. } => ClientError::NotFound {
                collection,
                id: id.to_string(),
            },
            other => other,
        }
    }

    async fn read_record(response: Response) -> ClientResult<Record> {
        match Self::check(response).await?.json::<Value>().await? {
            Value::Object(record) => Ok(record),
            _ => Err(ClientError::NotAnObject),
        }
    }
}

#[async_trait]
impl DataClient for HttpClient {
    async fn list(&self, collection: Collection, query: ListQuery) -> ClientResult<Vec<Record>> {
        let url = format!("{}/list", self.collection_url(collection));
        tracing::debug!("POST {}", url);
        let response = self
            .authorize(self.http.post(&url))
            .json(&query.to_json())
            .send()
            .await?;
        Ok(Self::check(response).await?.json::<Vec<Record>>().await?)
    }

    async fn create(&self, collection: Collection, record: Record) -> ClientResult<Record> {
        let response = self
            .authorize(self.http.post(self.collection_url(collection)))
            .json(&record)
            .send()
            .await?;
        Self::read_record(response).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Record,
    ) -> ClientResult<Record> {
        let response = self
            .authorize(self.http.patch(self.record_url(collection, id)))
            .json(&fields)
            .send()
            .await?;
        Self::read_record(response)
            .await
            .map_err(|e| Self::record_missing(e, collection, id))
    }

    async fn delete(&self, collection: Collection, id: &str) -> ClientResult<()> {
        let response = self
            .authorize(self.http.delete(self.record_url(collection, id)))
            .send()
            .await?;
        Self::check(response)
            .await
            .map_err(|e| Self::record_missing(e, collection, id))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
