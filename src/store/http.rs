//! HTTP document store client.
//!
//! Wire format:
//! - `POST {base}/api/documents/upload` with a multipart `file` field;
//!   2xx returns JSON `{docId, filename, pages}` where `pages` may be null.
//! - `GET {base}/api/documents/{docId}/pages/{page}`; 2xx returns the page
//!   image as the raw body, with extracted text riding the `X-Page-Text`
//!   header.
//!
//! Error responses carry a JSON body with a `detail` message; when that is
//! absent the HTTP status stands in. No retries here — re-issuing the same
//! navigation transition re-triggers the fetch.

use crate::defaults;
use crate::error::{Result, TourneurError};
use crate::store::{DocumentStore, PageContent, UploadReceipt};
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::debug;

/// Document store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "docId")]
    doc_id: String,
    filename: String,
    #[serde(default)]
    pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl HttpDocumentStore {
    /// Create a client for the store at `base_url` (trailing slash
    /// tolerated).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a client reusing an existing `reqwest::Client` (connection
    /// pools, proxies, timeouts configured by the caller).
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, defaults::UPLOAD_PATH)
    }

    fn page_url(&self, doc_id: &str, page: u32) -> String {
        format!("{}/api/documents/{}/pages/{}", self.base_url, doc_id, page)
    }
}

/// Pull the `detail` message out of an error response, falling back to the
/// HTTP status line.
async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            detail: Some(detail),
        }) => detail,
        _ => format!("HTTP {status}"),
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn upload(&self, filename: &str, payload: Vec<u8>) -> Result<UploadReceipt> {
        let part = multipart::Part::bytes(payload).file_name(filename.to_string());
        let form = multipart::Form::new().part(defaults::UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| TourneurError::Upload {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TourneurError::Upload {
                message: error_detail(response).await,
            });
        }

        let body: UploadResponse =
            response
                .json()
                .await
                .map_err(|e| TourneurError::StoreResponse {
                    message: e.to_string(),
                })?;
        debug!(doc_id = %body.doc_id, pages = ?body.pages, "upload accepted");

        Ok(UploadReceipt {
            doc_id: body.doc_id,
            filename: body.filename,
            pages: body.pages,
        })
    }

    async fn fetch_page(&self, doc_id: &str, page: u32) -> Result<PageContent> {
        let response = self
            .client
            .get(self.page_url(doc_id, page))
            .send()
            .await
            .map_err(|e| TourneurError::PageFetch {
                page,
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TourneurError::PageFetch {
                page,
                message: error_detail(response).await,
            });
        }

        let text = response
            .headers()
            .get(defaults::PAGE_TEXT_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let image = response
            .bytes()
            .await
            .map_err(|e| TourneurError::PageFetch {
                page,
                message: e.to_string(),
            })?
            .to_vec();

        Ok(PageContent { image, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed_from_base_url() {
        let store = HttpDocumentStore::new("http://localhost:8000///");
        assert_eq!(
            store.upload_url(),
            "http://localhost:8000/api/documents/upload"
        );
    }

    #[test]
    fn page_url_layout() {
        let store = HttpDocumentStore::new("http://localhost:8000");
        assert_eq!(
            store.page_url("ab12cd34", 7),
            "http://localhost:8000/api/documents/ab12cd34/pages/7"
        );
    }

    #[test]
    fn upload_response_tolerates_null_pages() {
        let body: UploadResponse =
            serde_json::from_str(r#"{"docId":"ab12","filename":"photo.png","pages":null}"#)
                .unwrap();
        assert_eq!(body.doc_id, "ab12");
        assert_eq!(body.pages, None);
    }

    #[test]
    fn upload_response_tolerates_missing_pages() {
        let body: UploadResponse =
            serde_json::from_str(r#"{"docId":"ab12","filename":"photo.png"}"#).unwrap();
        assert_eq!(body.pages, None);
    }

    #[test]
    fn upload_response_reads_page_count() {
        let body: UploadResponse =
            serde_json::from_str(r#"{"docId":"ab12","filename":"livre.pdf","pages":5}"#).unwrap();
        assert_eq!(body.pages, Some(5));
    }

    #[test]
    fn error_body_detail_is_optional() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Type non supporte: .txt"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("Type non supporte: .txt"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.detail, None);
    }
}
