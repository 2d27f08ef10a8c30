use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
};

use study604_core::store::{self, Collection, Row, Store};

use crate::{
    ensure_success, into_json,
    util::{auth_header_value, eq_filter, order_column, table_url},
    Error, Result,
};

/// The hosted row store.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    url: String,
}

impl RestStore {
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key).map_err(|_| Error::Config("invalid API key".into()))?;
        let bearer = HeaderValue::from_str(&auth_header_value(api_key))
            .map_err(|_| Error::Config("invalid API key".into()))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| Error::Config(err.to_string()))?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get_rows(&self, url: String) -> Result<Vec<Row>> {
        log::debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        into_json(response).await
    }

    async fn insert_row(&self, collection: Collection, row: Row) -> Result<Row> {
        let url = table_url(&self.url, collection);
        log::debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let mut rows: Vec<Row> = into_json(response).await?;
        if rows.is_empty() {
            return Err(Error::Decode(format!("no row returned from '{collection}'")));
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete_row(&self, collection: Collection, id: &str) -> Result<()> {
        let url = format!("{}?{}", table_url(&self.url, collection), eq_filter("id", id));
        log::debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

fn select_all_url(base_url: &str, collection: Collection) -> String {
    format!(
        "{}?select=*&order={}.asc",
        table_url(base_url, collection),
        order_column(collection)
    )
}

fn select_where_url(base_url: &str, collection: Collection, field: &str, value: &str) -> String {
    format!(
        "{}?select=*&{}&order={}.asc",
        table_url(base_url, collection),
        eq_filter(field, value),
        order_column(collection)
    )
}

#[async_trait]
impl Store for RestStore {
    async fn select_all(&self, collection: Collection) -> store::Result<Vec<Row>> {
        Ok(self.get_rows(select_all_url(&self.url, collection)).await?)
    }

    async fn select_where(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> store::Result<Vec<Row>> {
        let url = select_where_url(&self.url, collection, field, value);
        Ok(self.get_rows(url).await?)
    }

    async fn insert(&self, collection: Collection, row: Row) -> store::Result<Row> {
        Ok(self.insert_row(collection, row).await?)
    }

    async fn delete(&self, collection: Collection, id: &str) -> store::Result<()> {
        Ok(self.delete_row(collection, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_urls() {
        let base = "https://db.example.org";
        assert_eq!(
            "https://db.example.org/rest/v1/spots?select=*&order=id.asc",
            select_all_url(base, Collection::Spots)
        );
        assert_eq!(
            "https://db.example.org/rest/v1/reviews?select=*&spot_id=eq.7&order=timestamp.asc",
            select_where_url(base, Collection::Reviews, "spot_id", "7")
        );
    }

    #[test]
    fn reject_invalid_api_key() {
        let res = RestStore::new("https://db.example.org", "line\nbreak", Duration::from_secs(1));
        assert!(matches!(res, Err(Error::Config(_))));
    }

    #[test]
    fn trim_trailing_slash() {
        let store = RestStore::new("https://db.example.org/", "key", Duration::from_secs(1)).unwrap();
        assert_eq!("https://db.example.org", store.url());
    }

    #[tokio::test]
    async fn unreachable_store() {
        // Nothing listens on port 9 (discard) of the loopback interface
        let store = RestStore::new("http://127.0.0.1:9", "key", Duration::from_secs(2)).unwrap();
        let err = store.select_all(Collection::Spots).await.unwrap_err();
        assert!(err.is_store_error());
    }

    #[tokio::test]
    async fn unanswered_request_times_out() {
        // Connections are queued by the kernel but never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let store = RestStore::new(&url, "key", Duration::from_millis(100)).unwrap();
        let err = store.select_all(Collection::Spots).await.unwrap_err();
        assert_eq!(store::Error::Timeout, err);
        drop(listener);
    }
}
