// src/api/client.rs
//! HTTP implementation of [`NotionRepository`](super::NotionRepository).
//!
//! A thin wrapper around reqwest: authentication headers, one request per
//! trait call, and parsing of the body. Retrying is not its business; every
//! call reaches it through [`ResilientRepository`](super::ResilientRepository).

use super::parser;
use super::types::{PageRequest, PaginatedResponse};
use crate::constants::{NOTION_API_BASE_URL, NOTION_API_VERSION, REQUEST_TIMEOUT};
use crate::error::AppError;
use crate::model::{Block, DatabaseInfo, PageInfo};
use crate::types::{ApiKey, BlockId, DataSourceId, DatabaseId, PageId};
use reqwest::{header, Client, Response};
use serde::Serialize;

#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        Self::with_base_url(api_key, NOTION_API_BASE_URL)
    }

    /// Points the client at another host, e.g. a local recording proxy.
    pub fn with_base_url(api_key: &ApiKey, base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );
        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&'static str, String)],
    ) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {} {:?}", url, query);
        Ok(self.client.get(url).query(query).send().await?)
    }

    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        Ok(self.client.post(url).json(body).send().await?)
    }

    async fn get_json(
        &self,
        endpoint: &str,
        query: &[(&'static str, String)],
    ) -> Result<serde_json::Value, AppError> {
        let response = self.get(endpoint, query).await?;
        parser::parse_api_response(extract_response_text(response).await?)
    }
}

#[async_trait::async_trait]
impl super::NotionRepository for NotionHttpClient {
    async fn retrieve_page(&self, id: &PageId) -> Result<PageInfo, AppError> {
        let body = self.get_json(&format!("pages/{}", id.to_dashed()), &[]).await?;
        Ok(parser::parse_page(&body))
    }

    async fn retrieve_database(&self, id: &DatabaseId) -> Result<DatabaseInfo, AppError> {
        let body = self
            .get_json(&format!("databases/{}", id.to_dashed()), &[])
            .await?;
        Ok(parser::parse_database(&body))
    }

    async fn list_children(
        &self,
        parent: &BlockId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_dashed());
        let body = self.get_json(&endpoint, &request.query_pairs()).await?;
        parser::parse_blocks_page(body)
    }

    async fn query_data_source(
        &self,
        data_source: &DataSourceId,
        request: PageRequest,
    ) -> Result<PaginatedResponse<PageInfo>, AppError> {
        let endpoint = format!("data_sources/{}/query", data_source.to_dashed());
        let response = self.post(&endpoint, &request).await?;
        let body = parser::parse_api_response(extract_response_text(response).await?)?;
        parser::parse_pages_page(body)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
