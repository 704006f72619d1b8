//! A thin, retrying wrapper around the upstream `flickr.photos.search`
//! endpoint.

use anyhow::{Context, Result, bail};
use flickr_core::PipelineConfig;
use flickr_store::SpatialBounds;
use serde::Deserialize;
use std::fmt;

/// One raw photo entry as returned by the API, fields still as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPhoto {
	pub id: String,
	pub latitude: String,
	pub longitude: String,
	pub accuracy: String,
	pub dateupload: String,
	pub owner: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PhotosEnvelope {
	total: String,
	pages: String,
	#[serde(default, rename = "photo")]
	photos: Vec<RawPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
	stat: String,
	photos: Option<PhotosEnvelope>,
}

/// One parsed page of search results.
#[derive(Debug, Clone)]
pub struct ApiPage {
	pub total: u64,
	pub pages: u64,
	pub photos: Vec<RawPhoto>,
}

/// API-level failure: either a transport error or a non-`"ok"` `stat`
/// field. Both are retried identically by [`ApiClient::search_page`].
#[derive(Debug)]
struct ApiError(String);

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::error::Error for ApiError {}

/// A pooled HTTP client bound to one upstream API key and base URL.
pub struct ApiClient {
	client: reqwest::Client,
	config: PipelineConfig,
}

impl ApiClient {
	/// Builds a client with the connect/read timeouts from `config`.
	///
	/// # Errors
	/// Returns an error if the underlying `reqwest` client cannot be built.
	pub fn new(config: PipelineConfig) -> Result<Self> {
		let client = reqwest::Client::builder()
			.connect_timeout(config.connect_timeout)
			.timeout(config.read_timeout)
			.build()
			.context("building HTTP client")?;
		Ok(ApiClient { client, config })
	}

	/// Fetches one page of results for `bounds`, retrying on any transport
	/// error or non-`"ok"` API status up to `config.retry_count` times with
	/// a fixed backoff. Upstream flakiness must not lose work, so the
	/// default policy is extremely persistent (1000 retries).
	///
	/// # Errors
	/// Returns an error once retries are exhausted.
	pub async fn search_page(&self, bounds: SpatialBounds, per_page: u32, page: u32) -> Result<ApiPage> {
		let bbox = format!("{},{},{},{}", bounds.min_lon, bounds.min_lat, bounds.max_lon, bounds.max_lat);

		let mut attempts_left = self.config.retry_count;
		loop {
			match self.search_page_once(&bbox, bounds, per_page, page).await {
				Ok(data) => return Ok(data),
				Err(err) => {
					if attempts_left == 0 {
						return Err(err).context("exhausted retries against the photo-search API");
					}
					attempts_left -= 1;
					log::warn!("photo-search request failed, retrying: {err}");
					tokio::time::sleep(self.config.retry_backoff).await;
				}
			}
		}
	}

	async fn search_page_once(&self, bbox: &str, bounds: SpatialBounds, per_page: u32, page: u32) -> Result<ApiPage> {
		let response = self
			.client
			.get(&self.config.api_base_url)
			.query(&[
				("method", "flickr.photos.search"),
				("api_key", self.config.api_key.as_str()),
				("format", "json"),
				("nojsoncallback", "1"),
				("per_page", &per_page.to_string()),
				("bbox", bbox),
				("min_upload_date", &bounds.min_date.to_string()),
				("max_upload_date", &bounds.max_date.to_string()),
				("page", &page.to_string()),
				("extras", "geo,date_upload"),
			])
			.send()
			.await?;

		let body: SearchResponse = response.json().await?;
		if body.stat != "ok" {
			bail!(ApiError(format!("upstream returned stat={:?}", body.stat)));
		}
		let envelope = body.photos.ok_or_else(|| ApiError("response missing \"photos\" field".to_string()))?;

		Ok(ApiPage {
			total: envelope.total.parse().context("parsing photos.total")?,
			pages: envelope.pages.parse().context("parsing photos.pages")?,
			photos: envelope.photos,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_a_successful_search_response() {
		let body = r#"{
			"stat": "ok",
			"photos": {
				"total": "3",
				"pages": "1",
				"photo": [
					{"id": "1", "latitude": "10.5", "longitude": "-20.25", "accuracy": "16", "dateupload": "1700000000", "owner": "alice"}
				]
			}
		}"#;
		let parsed: SearchResponse = serde_json::from_str(body).unwrap();
		assert_eq!(parsed.stat, "ok");
		let photos = parsed.photos.unwrap();
		assert_eq!(photos.total, "3");
		assert_eq!(photos.photos.len(), 1);
		assert_eq!(photos.photos[0].owner, "alice");
	}

	#[test]
	fn deserializes_a_failed_search_response_without_photos() {
		let body = r#"{"stat": "fail", "message": "Invalid API Key"}"#;
		let parsed: SearchResponse = serde_json::from_str(body).unwrap();
		assert_eq!(parsed.stat, "fail");
		assert!(parsed.photos.is_none());
	}
}
